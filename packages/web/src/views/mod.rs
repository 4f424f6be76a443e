mod apropos;
mod catalog;
mod contact;
mod dashboard;
mod home;
mod login;

pub use apropos::APropos;
pub use catalog::{ModuleView, YearBrowser};
pub use contact::Contact;
pub use dashboard::Dashboard;
pub use home::Home;
pub use login::Login;
