use std::collections::HashSet;

use dioxus::prelude::*;
use store::{Resource, ResourceKind};

use crate::events::{notify_resources_changed, resources_version};

/// Resources of one module, newest first. With `admin` set, each row gets a
/// selection checkbox and a delete button, plus a bulk delete bar.
#[component]
pub fn ResourceList(catalog_type: String, year: String, module: String, admin: bool) -> Element {
    let mut selected = use_signal(HashSet::<String>::new);
    let mut error = use_signal(|| None::<String>);

    let (ct, y, m) = (catalog_type.clone(), year.clone(), module.clone());
    let resources = use_resource(use_reactive!(|(ct, y, m)| async move {
        let _ = resources_version();
        api::list_resources(ct, y, m).await
    }));

    let ct = catalog_type.clone();
    let y = year.clone();
    let m = module.clone();
    let delete_one = move |id: String| {
        let (ct, y, m) = (ct.clone(), y.clone(), m.clone());
        async move {
            match api::delete_resource(ct, y, m, id).await {
                Ok(()) => notify_resources_changed(),
                Err(e) => error.set(Some(e.to_string())),
            }
        }
    };

    let ct = catalog_type.clone();
    let y = year.clone();
    let m = module.clone();
    let delete_selected = move |_| {
        let (ct, y, m) = (ct.clone(), y.clone(), m.clone());
        async move {
            let ids: Vec<String> = selected().into_iter().collect();
            if ids.is_empty() {
                return;
            }
            match api::delete_resources(ct, y, m, ids).await {
                Ok(_) => error.set(None),
                // Succeeded deletions are kept, so refresh either way.
                Err(e) => error.set(Some(e.to_string())),
            }
            selected.set(HashSet::new());
            notify_resources_changed();
        }
    };

    rsx! {
        div {
            class: "resource-list",
            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            if admin && !selected().is_empty() {
                div {
                    class: "bulk-bar",
                    span { "{selected().len()} sélectionné(s)" }
                    button {
                        class: "btn btn-danger",
                        onclick: delete_selected,
                        "Supprimer la sélection"
                    }
                }
            }

            match &*resources.read() {
                Some(Ok(items)) if items.is_empty() => rsx! {
                    p { class: "empty-state", "Aucune ressource dans ce module." }
                },
                Some(Ok(items)) => rsx! {
                    ul {
                        for resource in items.clone() {
                            ResourceRow {
                                key: "{resource.id}",
                                resource: resource.clone(),
                                admin,
                                checked: selected().contains(&resource.id),
                                on_toggle: move |id: String| {
                                    let mut set = selected();
                                    if !set.remove(&id) {
                                        set.insert(id);
                                    }
                                    selected.set(set);
                                },
                                on_delete: delete_one.clone(),
                            }
                        }
                    }
                },
                Some(Err(e)) => rsx! {
                    p { class: "form-error", "Chargement impossible : {e}" }
                },
                None => rsx! {
                    p { class: "empty-state", "Chargement..." }
                },
            }
        }
    }
}

#[component]
fn ResourceRow(
    resource: Resource,
    admin: bool,
    checked: bool,
    on_toggle: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let id = resource.id.clone();
    let badge = match resource.kind {
        ResourceKind::File => resource.ext.clone().unwrap_or_else(|| "fichier".to_string()),
        ResourceKind::Link => "lien".to_string(),
    };

    rsx! {
        li {
            class: "resource-row",
            if admin {
                input {
                    r#type: "checkbox",
                    checked,
                    onchange: {
                        let id = id.clone();
                        move |_| on_toggle.call(id.clone())
                    },
                }
            }
            a {
                class: "resource-name",
                href: "{resource.url}",
                target: "_blank",
                "{resource.name}"
            }
            span { class: "resource-badge", "{badge}" }
            if let Some(size) = resource.size {
                span { class: "resource-size", "{format_size(size)}" }
            }
            span {
                class: "resource-date",
                {resource.created_at.format("%d/%m/%Y").to_string()}
            }
            if admin {
                button {
                    class: "btn btn-danger",
                    onclick: move |_| on_delete.call(id.clone()),
                    "Supprimer"
                }
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} Mo", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.0} Ko", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} o")
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 o");
        assert_eq!(format_size(20480), "20 Ko");
        assert_eq!(format_size(3 * 1024 * 1024 + 150 * 1024), "3.1 Mo");
    }
}
