use dioxus::prelude::*;

use crate::events::notify_resources_changed;

/// What the dialog does when submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleDialogMode {
    Create,
    Rename { from: String },
}

/// Dialog body for creating or renaming a module. Meant to be shown inside
/// a [`crate::ModalOverlay`].
#[component]
pub fn ModuleDialog(
    catalog_type: String,
    year: String,
    mode: ModuleDialogMode,
    on_done: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut name = use_signal({
        let mode = mode.clone();
        move || match &mode {
            ModuleDialogMode::Create => String::new(),
            ModuleDialogMode::Rename { from } => from.clone(),
        }
    });
    let mut error = use_signal(|| None::<String>);

    let title = match &mode {
        ModuleDialogMode::Create => "Nouveau module",
        ModuleDialogMode::Rename { .. } => "Renommer le module",
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let (catalog_type, year, mode) = (catalog_type.clone(), year.clone(), mode.clone());
        async move {
            let value = name().trim().to_string();
            if value.is_empty() {
                error.set(Some("Le nom est requis".to_string()));
                return;
            }
            let result = match mode {
                ModuleDialogMode::Create => api::add_module(catalog_type, year, value).await,
                ModuleDialogMode::Rename { from } => {
                    api::rename_module(catalog_type, year, from, value).await
                }
            };
            match result {
                Ok(()) => {
                    notify_resources_changed();
                    on_done.call(());
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    };

    rsx! {
        form {
            class: "module-dialog",
            onsubmit: handle_submit,
            h3 { "{title}" }

            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            div {
                class: "form-field",
                label { r#for: "module-name", "Nom du module" }
                input {
                    id: "module-name",
                    r#type: "text",
                    placeholder: "analyse-1",
                    value: name(),
                    oninput: move |evt| name.set(evt.value()),
                }
            }

            div {
                class: "form-actions",
                button { class: "btn btn-primary", r#type: "submit", "Valider" }
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
