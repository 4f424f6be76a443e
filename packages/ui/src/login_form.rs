use dioxus::prelude::*;

use crate::session::{login, use_session};

/// Username/password form. On success the session context is updated and
/// `on_success` fires so the page can redirect.
#[component]
pub fn LoginForm(on_success: EventHandler<()>) -> Element {
    let session = use_session();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        async move {
            if username().trim().is_empty() || password().is_empty() {
                error.set(Some("Veuillez remplir tous les champs".to_string()));
                return;
            }
            submitting.set(true);
            error.set(None);
            match login(session, username().trim().to_string(), password()).await {
                Ok(_) => on_success.call(()),
                Err(_) => {
                    error.set(Some("Nom d'utilisateur ou mot de passe incorrect".to_string()));
                }
            }
            submitting.set(false);
        }
    };

    rsx! {
        form {
            class: "login-form",
            onsubmit: handle_submit,
            h2 { "Connexion" }

            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            div {
                class: "form-field",
                label { r#for: "login-username", "Nom d'utilisateur" }
                input {
                    id: "login-username",
                    r#type: "text",
                    autocomplete: "username",
                    value: username(),
                    oninput: move |evt| username.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "login-password", "Mot de passe" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt| password.set(evt.value()),
                }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: submitting(),
                if submitting() { "Connexion..." } else { "Se connecter" }
            }
        }
    }
}
