use dioxus::prelude::*;

use crate::events::notify_resources_changed;

/// Upload a file into a module. The extension is taken from the picked
/// file name; the display name defaults to the file stem when left empty.
#[component]
pub fn UploadForm(catalog_type: String, year: String, module: String) -> Element {
    let mut name = use_signal(String::new);
    let mut picked = use_signal(|| None::<(String, Vec<u8>)>);
    let mut status = use_signal(|| None::<Result<String, String>>);
    let mut uploading = use_signal(|| false);

    let on_file = move |evt: FormEvent| async move {
        if let Some(engine) = evt.files() {
            if let Some(file_name) = engine.files().first().cloned() {
                if let Some(bytes) = engine.read_file(&file_name).await {
                    picked.set(Some((file_name, bytes)));
                }
            }
        }
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let (catalog_type, year, module) = (catalog_type.clone(), year.clone(), module.clone());
        async move {
            let Some((file_name, bytes)) = picked() else {
                status.set(Some(Err("Choisissez un fichier".to_string())));
                return;
            };
            let (stem, ext) = split_extension(&file_name);
            let display = if name().trim().is_empty() {
                stem.to_string()
            } else {
                name().trim().to_string()
            };

            uploading.set(true);
            match api::upload_resource(catalog_type, year, module, display, ext.to_string(), bytes)
                .await
            {
                Ok(resource) => {
                    status.set(Some(Ok(format!("« {} » ajouté", resource.name))));
                    name.set(String::new());
                    picked.set(None);
                    notify_resources_changed();
                }
                Err(e) => status.set(Some(Err(e.to_string()))),
            }
            uploading.set(false);
        }
    };

    rsx! {
        form {
            class: "upload-form",
            onsubmit: handle_submit,
            h3 { "Ajouter un fichier" }

            match status() {
                Some(Ok(msg)) => rsx! { p { class: "form-success", "{msg}" } },
                Some(Err(msg)) => rsx! { p { class: "form-error", "{msg}" } },
                None => rsx! {},
            }

            div {
                class: "form-field",
                label { r#for: "upload-name", "Nom affiché (optionnel)" }
                input {
                    id: "upload-name",
                    r#type: "text",
                    placeholder: "Chapitre 1",
                    value: name(),
                    oninput: move |evt| name.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "upload-file", "Fichier" }
                input {
                    id: "upload-file",
                    r#type: "file",
                    onchange: on_file,
                }
                if let Some((file_name, bytes)) = picked() {
                    span { class: "file-hint", "{file_name} ({bytes.len()} octets)" }
                }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: uploading(),
                if uploading() { "Envoi..." } else { "Téléverser" }
            }
        }
    }
}

fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (file_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::split_extension;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("cours-ch1.pdf"), ("cours-ch1", "pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_extension("sans-extension"), ("sans-extension", ""));
        assert_eq!(split_extension(".env"), (".env", ""));
    }
}
