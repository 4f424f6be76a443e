//! Shared UI components for the course portal.

mod events;
mod link_form;
mod login_form;
mod modal_overlay;
mod module_dialog;
mod navbar;
mod resource_list;
mod session;
mod upload_form;
mod user_form;

pub use events::{notify_resources_changed, resources_version};
pub use link_form::LinkForm;
pub use login_form::LoginForm;
pub use modal_overlay::ModalOverlay;
pub use module_dialog::{ModuleDialog, ModuleDialogMode};
pub use navbar::Navbar;
pub use resource_list::ResourceList;
pub use session::{use_session, SessionProvider, SessionState};
pub use upload_form::UploadForm;
pub use user_form::UserForm;
