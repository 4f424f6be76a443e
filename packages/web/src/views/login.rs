//! Login page.

use dioxus::prelude::*;
use ui::{use_session, LoginForm};

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let nav = use_navigator();

    // Already logged in: nothing to do here.
    if !session().loading && session().user.is_some() {
        nav.replace("/");
    }

    rsx! {
        section {
            class: "login-page",
            LoginForm {
                on_success: move |_| {
                    let target = if session().is_admin() { "/dashboard" } else { "/" };
                    nav.replace(target);
                },
            }
        }
    }
}
