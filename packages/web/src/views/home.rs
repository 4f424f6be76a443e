use dioxus::prelude::*;

/// Landing page.
#[component]
pub fn Home() -> Element {
    rsx! {
        section {
            class: "hero",
            h1 { "Ressources pédagogiques du département" }
            p {
                "Retrouvez les supports de cours et les séries de travaux dirigés, "
                "classés par année et par module."
            }
            div {
                class: "hero-actions",
                a { class: "btn btn-primary", href: "/cours", "Parcourir les cours" }
                a { class: "btn btn-outline", href: "/td", "Parcourir les TD" }
            }
        }
    }
}
