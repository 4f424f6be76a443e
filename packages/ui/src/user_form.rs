use dioxus::prelude::*;
use store::{NewUser, Role, UserProfile, UserUpdate};

/// Create or edit a user account. With `existing` set the form pre-fills
/// and submits a partial update (empty password means unchanged); otherwise
/// it creates a new account.
#[component]
pub fn UserForm(
    existing: Option<UserProfile>,
    on_done: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let initial = existing.clone();
    let mut username = use_signal({
        let initial = initial.clone();
        move || initial.as_ref().map(|u| u.username.clone()).unwrap_or_default()
    });
    let mut full_name = use_signal({
        let initial = initial.clone();
        move || initial.as_ref().map(|u| u.full_name.clone()).unwrap_or_default()
    });
    let mut email = use_signal({
        let initial = initial.clone();
        move || initial.as_ref().map(|u| u.email.clone()).unwrap_or_default()
    });
    let mut year = use_signal({
        let initial = initial.clone();
        move || initial.as_ref().and_then(|u| u.year.clone()).unwrap_or_default()
    });
    let mut role = use_signal({
        let initial = initial.clone();
        move || {
            initial
                .as_ref()
                .map(|u| u.role.as_str().to_string())
                .unwrap_or_else(|| "student".to_string())
        }
    });
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let years = use_resource(|| async move { api::list_years().await.unwrap_or_default() });

    let editing = existing.is_some();
    let title = if editing { "Modifier l'utilisateur" } else { "Nouvel utilisateur" };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let existing = existing.clone();
        async move {
            let parsed_role: Role = match role().parse() {
                Ok(r) => r,
                Err(_) => Role::Student,
            };
            let year_value = if year().is_empty() { None } else { Some(year()) };

            let result = match existing {
                Some(profile) => {
                    let update = UserUpdate {
                        username: Some(username().trim().to_string()),
                        full_name: Some(full_name().trim().to_string()),
                        email: Some(email().trim().to_string()),
                        role: Some(parsed_role),
                        year: year_value.clone(),
                        password: if password().is_empty() { None } else { Some(password()) },
                    };
                    api::update_user(profile.uid, update).await
                }
                None => api::add_user(NewUser {
                    username: username().trim().to_string(),
                    password: password(),
                    full_name: full_name().trim().to_string(),
                    email: email().trim().to_string(),
                    role: parsed_role,
                    year: year_value,
                })
                .await
                .map(|_| ()),
            };

            match result {
                Ok(()) => on_done.call(()),
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    };

    rsx! {
        form {
            class: "user-form",
            onsubmit: handle_submit,
            h3 { "{title}" }

            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            div {
                class: "form-field",
                label { r#for: "user-username", "Nom d'utilisateur" }
                input {
                    id: "user-username",
                    r#type: "text",
                    value: username(),
                    oninput: move |evt| username.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-fullname", "Nom complet" }
                input {
                    id: "user-fullname",
                    r#type: "text",
                    value: full_name(),
                    oninput: move |evt| full_name.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-email", "E-mail" }
                input {
                    id: "user-email",
                    r#type: "email",
                    value: email(),
                    oninput: move |evt| email.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-role", "Rôle" }
                select {
                    id: "user-role",
                    value: role(),
                    onchange: move |evt| role.set(evt.value()),
                    option { value: "student", "Étudiant" }
                    option { value: "admin", "Administrateur" }
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-year", "Année" }
                select {
                    id: "user-year",
                    value: year(),
                    onchange: move |evt| year.set(evt.value()),
                    option { value: "", "—" }
                    for y in years().unwrap_or_default() {
                        option { key: "{y}", value: "{y}", "{y}" }
                    }
                }
            }

            div {
                class: "form-field",
                label { r#for: "user-password",
                    if editing { "Mot de passe (laisser vide pour conserver)" }
                    else { "Mot de passe" }
                }
                input {
                    id: "user-password",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: password(),
                    oninput: move |evt| password.set(evt.value()),
                }
            }

            div {
                class: "form-actions",
                button { class: "btn btn-primary", r#type: "submit", "Enregistrer" }
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Annuler"
                }
            }
        }
    }
}
