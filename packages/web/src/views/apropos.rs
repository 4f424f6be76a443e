use dioxus::prelude::*;

/// About page.
#[component]
pub fn APropos() -> Element {
    rsx! {
        section {
            class: "static-page",
            h1 { "À propos" }
            p {
                "Ce portail met à disposition des étudiants les supports de cours "
                "et les séries de travaux dirigés du département, organisés par "
                "année et par module."
            }
            p {
                "Les documents sont publiés par l'équipe pédagogique. Pour tout "
                "problème d'accès, contactez le secrétariat."
            }
        }
    }
}
