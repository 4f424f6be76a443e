use dioxus::prelude::*;

use crate::events::notify_resources_changed;

/// Add an external link to a module.
#[component]
pub fn LinkForm(catalog_type: String, year: String, module: String) -> Element {
    let mut name = use_signal(String::new);
    let mut url = use_signal(String::new);
    let mut status = use_signal(|| None::<Result<String, String>>);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let (catalog_type, year, module) = (catalog_type.clone(), year.clone(), module.clone());
        async move {
            match api::add_link(
                catalog_type,
                year,
                module,
                name().trim().to_string(),
                url().trim().to_string(),
            )
            .await
            {
                Ok(resource) => {
                    status.set(Some(Ok(format!("« {} » ajouté", resource.name))));
                    name.set(String::new());
                    url.set(String::new());
                    notify_resources_changed();
                }
                Err(e) => status.set(Some(Err(e.to_string()))),
            }
        }
    };

    rsx! {
        form {
            class: "link-form",
            onsubmit: handle_submit,
            h3 { "Ajouter un lien" }

            match status() {
                Some(Ok(msg)) => rsx! { p { class: "form-success", "{msg}" } },
                Some(Err(msg)) => rsx! { p { class: "form-error", "{msg}" } },
                None => rsx! {},
            }

            div {
                class: "form-field",
                label { r#for: "link-name", "Nom" }
                input {
                    id: "link-name",
                    r#type: "text",
                    placeholder: "Polycopié en ligne",
                    value: name(),
                    oninput: move |evt| name.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "link-url", "URL" }
                input {
                    id: "link-url",
                    r#type: "url",
                    placeholder: "https://",
                    value: url(),
                    oninput: move |evt| url.set(evt.value()),
                }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                "Ajouter"
            }
        }
    }
}
