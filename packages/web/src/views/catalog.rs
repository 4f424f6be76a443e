//! Public catalog browsing: pick a year, pick a module, list resources.
//!
//! When the live module list cannot be fetched or is empty, the view falls
//! back to the static published catalog so visitors still get something.

use dioxus::prelude::*;
use store::FallbackEntry;
use ui::{resources_version, use_session, LinkForm, ResourceList, UploadForm};

/// Year tabs and the modules of the selected year for one catalog type.
#[component]
pub fn YearBrowser(catalog_type: String) -> Element {
    let mut selected_year = use_signal(|| "1".to_string());

    let years = use_resource(|| async move { api::list_years().await.unwrap_or_default() });

    let ct = catalog_type.clone();
    let modules = use_resource(use_reactive!(|(ct,)| async move {
        let _ = resources_version();
        api::list_modules(ct, selected_year()).await
    }));

    let title = if catalog_type == "td" { "Travaux dirigés" } else { "Cours" };

    rsx! {
        section {
            class: "catalog",
            h1 { "{title}" }

            div {
                class: "year-tabs",
                for year in years().unwrap_or_default() {
                    button {
                        key: "{year}",
                        class: if year == selected_year() { "year-tab active" } else { "year-tab" },
                        onclick: {
                            let year = year.clone();
                            move |_| selected_year.set(year.clone())
                        },
                        "Année {year}"
                    }
                }
            }

            match &*modules.read() {
                Some(Ok(names)) if !names.is_empty() => rsx! {
                    ul {
                        class: "module-grid",
                        for name in names.clone() {
                            li {
                                key: "{name}",
                                a {
                                    class: "module-card",
                                    href: "/{catalog_type}/{selected_year()}/{name}",
                                    "{name}"
                                }
                            }
                        }
                    }
                },
                Some(Ok(_)) | Some(Err(_)) => rsx! {
                    FallbackCatalog { catalog_type: catalog_type.clone(), year: selected_year() }
                },
                None => rsx! {
                    p { class: "empty-state", "Chargement..." }
                },
            }
        }
    }
}

/// One module's resources. Admins also get the upload and link forms here.
#[component]
pub fn ModuleView(catalog_type: String, year: String, module: String) -> Element {
    let session = use_session();
    let admin = session().is_admin();
    let back = format!("/{catalog_type}");

    rsx! {
        section {
            class: "module-view",
            a { class: "back-link", href: "{back}", "← Retour" }
            h1 { "{module}" }
            p { class: "module-subtitle", "Année {year}" }

            ResourceList {
                catalog_type: catalog_type.clone(),
                year: year.clone(),
                module: module.clone(),
                admin,
            }

            if admin {
                div {
                    class: "admin-forms",
                    UploadForm {
                        catalog_type: catalog_type.clone(),
                        year: year.clone(),
                        module: module.clone(),
                    }
                    LinkForm { catalog_type, year, module }
                }
            }
        }
    }
}

/// Static published entries for a catalog type, filtered to the selected
/// year when the entry carries one.
#[component]
fn FallbackCatalog(catalog_type: String, year: String) -> Element {
    let ct = catalog_type.clone();
    let entries = use_resource(use_reactive!(|(ct,)| async move {
        api::fallback_catalog(ct).await.unwrap_or_default()
    }));

    let visible: Vec<FallbackEntry> = entries()
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.year.is_empty() || e.year == year)
        .collect();

    rsx! {
        div {
            class: "fallback-catalog",
            if visible.is_empty() {
                p { class: "empty-state", "Aucune ressource publiée pour cette année." }
            } else {
                p { class: "fallback-note", "Catalogue hors ligne" }
                ul {
                    for entry in visible {
                        li {
                            key: "{entry.url}",
                            class: "resource-row",
                            a {
                                class: "resource-name",
                                href: "{entry.url}",
                                target: "_blank",
                                "{entry.name}"
                            }
                            span { class: "resource-badge", "{entry.ext}" }
                            span { class: "resource-date", "{entry.uploaded_at}" }
                        }
                    }
                }
            }
        }
    }
}
