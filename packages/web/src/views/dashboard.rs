//! Admin dashboard: user accounts and module management.
//!
//! The guard here only drives rendering; every server function called from
//! this page re-checks the admin role against the server session.

use dioxus::prelude::*;
use store::UserProfile;
use ui::{
    notify_resources_changed, resources_version, use_session, ModalOverlay, ModuleDialog,
    ModuleDialogMode, UserForm,
};

#[component]
pub fn Dashboard() -> Element {
    let session = use_session();
    let nav = use_navigator();

    if !session().loading && !session().is_admin() {
        nav.replace("/login");
    }

    rsx! {
        section {
            class: "dashboard",
            h1 { "Tableau de bord" }
            UsersPanel {}
            ModulesPanel {}
        }
    }
}

#[derive(Clone, PartialEq)]
enum UserModal {
    Closed,
    Create,
    Edit(UserProfile),
}

#[component]
fn UsersPanel() -> Element {
    let mut modal = use_signal(|| UserModal::Closed);
    let mut version = use_signal(|| 0u64);
    let mut error = use_signal(|| None::<String>);

    let users = use_resource(move || async move {
        let _ = version();
        api::list_users().await
    });

    let mut refresh = move || {
        version += 1;
        modal.set(UserModal::Closed);
    };

    rsx! {
        div {
            class: "panel",
            div {
                class: "panel-header",
                h2 { "Utilisateurs" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| modal.set(UserModal::Create),
                    "Nouvel utilisateur"
                }
            }

            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            match &*users.read() {
                Some(Ok(list)) => rsx! {
                    table {
                        class: "user-table",
                        thead {
                            tr {
                                th { "Utilisateur" }
                                th { "Nom" }
                                th { "Rôle" }
                                th { "Année" }
                                th { "Statut" }
                                th {}
                            }
                        }
                        tbody {
                            for user in list.clone() {
                                UserRow {
                                    key: "{user.uid}",
                                    user: user.clone(),
                                    on_edit: move |u| modal.set(UserModal::Edit(u)),
                                    on_changed: move |_| refresh(),
                                    on_error: move |msg| error.set(Some(msg)),
                                }
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

            match modal() {
                UserModal::Closed => rsx! {},
                UserModal::Create => rsx! {
                    ModalOverlay {
                        on_close: move |_| modal.set(UserModal::Closed),
                        UserForm {
                            existing: None,
                            on_done: move |_| refresh(),
                            on_cancel: move |_| modal.set(UserModal::Closed),
                        }
                    }
                },
                UserModal::Edit(profile) => rsx! {
                    ModalOverlay {
                        on_close: move |_| modal.set(UserModal::Closed),
                        UserForm {
                            existing: Some(profile),
                            on_done: move |_| refresh(),
                            on_cancel: move |_| modal.set(UserModal::Closed),
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn UserRow(
    user: UserProfile,
    on_edit: EventHandler<UserProfile>,
    on_changed: EventHandler<()>,
    on_error: EventHandler<String>,
) -> Element {
    let status = if user.is_active { "actif" } else { "désactivé" };
    let toggle_label = if user.is_active { "Désactiver" } else { "Activer" };

    let toggle = {
        let user = user.clone();
        move |_| {
            let user = user.clone();
            async move {
                match api::toggle_user_status(user.uid, !user.is_active).await {
                    Ok(()) => on_changed.call(()),
                    Err(e) => on_error.call(e.to_string()),
                }
            }
        }
    };

    let delete = {
        let uid = user.uid.clone();
        move |_| {
            let uid = uid.clone();
            async move {
                match api::delete_user(uid).await {
                    Ok(()) => on_changed.call(()),
                    Err(e) => on_error.call(e.to_string()),
                }
            }
        }
    };

    let edit_user = user.clone();

    rsx! {
        tr {
            class: if user.is_active { "user-row" } else { "user-row inactive" },
            td { "{user.username}" }
            td { "{user.full_name}" }
            td { "{user.role.as_str()}" }
            td { {user.year.clone().unwrap_or_else(|| "—".to_string())} }
            td { "{status}" }
            td {
                class: "row-actions",
                button {
                    class: "btn btn-outline",
                    onclick: move |_| on_edit.call(edit_user.clone()),
                    "Modifier"
                }
                button { class: "btn btn-outline", onclick: toggle, "{toggle_label}" }
                button { class: "btn btn-danger", onclick: delete, "Supprimer" }
            }
        }
    }
}

#[derive(Clone, PartialEq)]
enum ModuleModal {
    Closed,
    Create,
    Rename(String),
}

#[component]
fn ModulesPanel() -> Element {
    let mut catalog_type = use_signal(|| "cours".to_string());
    let mut year = use_signal(|| "1".to_string());
    let mut modal = use_signal(|| ModuleModal::Closed);
    let mut error = use_signal(|| None::<String>);

    let years = use_resource(|| async move { api::list_years().await.unwrap_or_default() });

    let modules = use_resource(move || async move {
        let _ = resources_version();
        api::list_modules(catalog_type(), year()).await
    });

    let delete_module = move |name: String| async move {
        match api::delete_module(catalog_type(), year(), name).await {
            Ok(()) => {
                error.set(None);
                notify_resources_changed();
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    rsx! {
        div {
            class: "panel",
            div {
                class: "panel-header",
                h2 { "Modules" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| modal.set(ModuleModal::Create),
                    "Nouveau module"
                }
            }

            div {
                class: "module-filters",
                select {
                    value: catalog_type(),
                    onchange: move |evt| catalog_type.set(evt.value()),
                    option { value: "cours", "Cours" }
                    option { value: "td", "TD" }
                }
                select {
                    value: year(),
                    onchange: move |evt| year.set(evt.value()),
                    for y in years().unwrap_or_default() {
                        option { key: "{y}", value: "{y}", "Année {y}" }
                    }
                }
            }

            if let Some(msg) = error() {
                p { class: "form-error", "{msg}" }
            }

            match &*modules.read() {
                Some(Ok(names)) if names.is_empty() => rsx! {
                    p { class: "empty-state", "Aucun module pour cette sélection." }
                },
                Some(Ok(names)) => rsx! {
                    ul {
                        class: "module-admin-list",
                        for name in names.clone() {
                            li {
                                key: "{name}",
                                a {
                                    class: "resource-name",
                                    href: "/{catalog_type()}/{year()}/{name}",
                                    "{name}"
                                }
                                div {
                                    class: "row-actions",
                                    button {
                                        class: "btn btn-outline",
                                        onclick: {
                                            let name = name.clone();
                                            move |_| modal.set(ModuleModal::Rename(name.clone()))
                                        },
                                        "Renommer"
                                    }
                                    button {
                                        class: "btn btn-danger",
                                        onclick: {
                                            let name = name.clone();
                                            move |_| delete_module(name.clone())
                                        },
                                        "Supprimer"
                                    }
                                }
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

            match modal() {
                ModuleModal::Closed => rsx! {},
                ModuleModal::Create => rsx! {
                    ModalOverlay {
                        on_close: move |_| modal.set(ModuleModal::Closed),
                        ModuleDialog {
                            catalog_type: catalog_type(),
                            year: year(),
                            mode: ModuleDialogMode::Create,
                            on_done: move |_| modal.set(ModuleModal::Closed),
                            on_cancel: move |_| modal.set(ModuleModal::Closed),
                        }
                    }
                },
                ModuleModal::Rename(from) => rsx! {
                    ModalOverlay {
                        on_close: move |_| modal.set(ModuleModal::Closed),
                        ModuleDialog {
                            catalog_type: catalog_type(),
                            year: year(),
                            mode: ModuleDialogMode::Rename { from },
                            on_done: move |_| modal.set(ModuleModal::Closed),
                            on_cancel: move |_| modal.set(ModuleModal::Closed),
                        }
                    }
                },
            }
        }
    }
}
