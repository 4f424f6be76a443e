use dioxus::prelude::*;

use ui::{Navbar, SessionProvider};
use views::{APropos, Contact, Dashboard, Home, Login, ModuleView, YearBrowser};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/cours")]
    Cours {},
    #[route("/cours/:year/:module")]
    CoursModule { year: String, module: String },
    #[route("/td")]
    Td {},
    #[route("/td/:year/:module")]
    TdModule { year: String, module: String },
    #[route("/contact")]
    Contact {},
    #[route("/a-propos")]
    APropos {},
    #[route("/login")]
    Login {},
    #[route("/dashboard")]
    Dashboard {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::time::Duration;
    use tower_http::services::ServeDir;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Initialize storage and seed the first admin account if needed.
    let backend = api::backend::backend()
        .await
        .expect("failed to initialize storage backend");

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            Duration::from_secs(60 * 60 * 24 * 7).try_into().unwrap(),
        )); // 7 days

    let router = axum::Router::new()
        // Uploaded files are served straight from disk.
        .nest_service("/media", ServeDir::new(&backend.media_dir))
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            Router::<Route> {}
        }
    }
}

/// Shared page chrome: navbar with the route links, then the active page.
#[component]
fn Shell() -> Element {
    rsx! {
        Navbar {
            Link { to: Route::Home {}, "Accueil" }
            Link { to: Route::Cours {}, "Cours" }
            Link { to: Route::Td {}, "TD" }
            Link { to: Route::Contact {}, "Contact" }
            Link { to: Route::APropos {}, "À propos" }
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
    }
}

#[component]
fn Cours() -> Element {
    rsx! {
        YearBrowser { catalog_type: "cours".to_string() }
    }
}

#[component]
fn Td() -> Element {
    rsx! {
        YearBrowser { catalog_type: "td".to_string() }
    }
}

#[component]
fn CoursModule(year: String, module: String) -> Element {
    rsx! {
        ModuleView { catalog_type: "cours".to_string(), year, module }
    }
}

#[component]
fn TdModule(year: String, module: String) -> Element {
    rsx! {
        ModuleView { catalog_type: "td".to_string(), year, module }
    }
}
