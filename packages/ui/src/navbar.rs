use dioxus::prelude::*;

use crate::session::{logout, use_session};

/// Top navigation bar. Route links come in as children from the router
/// crate; the session area (greeting, dashboard hint, login/logout) is
/// rendered here from the session context.
#[component]
pub fn Navbar(children: Element) -> Element {
    let session = use_session();

    let on_logout = move |_| async move {
        logout(session).await;
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/");
            }
        }
    };

    rsx! {
        nav {
            class: "navbar",
            div { class: "navbar-brand", "Portail des ressources" }
            div {
                class: "navbar-links",
                {children}
            }
            div {
                class: "navbar-session",
                match session().user {
                    Some(user) => rsx! {
                        span { class: "navbar-user", "{user.full_name}" }
                        button {
                            class: "btn btn-outline",
                            onclick: on_logout,
                            "Déconnexion"
                        }
                    },
                    None => rsx! {
                        a { class: "btn btn-primary", href: "/login", "Connexion" }
                    },
                }
            }
        }
    }
}
