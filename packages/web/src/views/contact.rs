use dioxus::prelude::*;

/// Contact details for the department office.
#[component]
pub fn Contact() -> Element {
    rsx! {
        section {
            class: "static-page",
            h1 { "Contact" }
            p { "Secrétariat du département, bureau B12." }
            ul {
                li { "E-mail : " a { href: "mailto:departement@example.edu", "departement@example.edu" } }
                li { "Téléphone : 05 22 00 00 00" }
                li { "Horaires : lundi au vendredi, 9h à 16h" }
            }
        }
    }
}
