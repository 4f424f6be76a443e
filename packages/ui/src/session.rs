//! Session context for the UI.
//!
//! The server session cookie is the source of truth; this state is a client
//! cache of it. It is mirrored to `localStorage` so the navbar renders the
//! right links on a hard reload before `current_user` resolves. Authorization
//! always happens server-side, so a tampered mirror only mislabels the UI.

use api::SessionUser;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
const ROLE_KEY: &str = "encg_user_role";
#[cfg(target_arch = "wasm32")]
const USER_KEY: &str = "encg_current_user";

/// Session state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::is_admin)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: cached_user(),
            loading: true,
        }
    }
}

/// Get the current session state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Provider component that owns the session state. The only writers are the
/// mount-time `current_user` fetch and the [`login`]/[`logout`] helpers.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let mut state = use_signal(SessionState::default);

    // Revalidate the cached user against the server session on mount.
    let _ = use_resource(move || async move {
        let user = api::current_user().await.unwrap_or_default();
        persist_user(user.as_ref());
        state.set(SessionState {
            user,
            loading: false,
        });
    });

    use_context_provider(|| state);

    rsx! {
        {children}
    }
}

/// Log in and update the session context on success.
pub async fn login(
    mut state: Signal<SessionState>,
    username: String,
    password: String,
) -> Result<SessionUser, String> {
    match api::login(username, password).await {
        Ok(user) => {
            persist_user(Some(&user));
            state.set(SessionState {
                user: Some(user.clone()),
                loading: false,
            });
            Ok(user)
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Log out and clear the session context.
pub async fn logout(mut state: Signal<SessionState>) {
    if let Err(e) = api::logout().await {
        tracing::error!("logout failed: {e}");
    }
    persist_user(None);
    state.set(SessionState {
        user: None,
        loading: false,
    });
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn cached_user() -> Option<SessionUser> {
    let storage = local_storage()?;
    let raw = storage.get_item(USER_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

#[cfg(target_arch = "wasm32")]
fn persist_user(user: Option<&SessionUser>) {
    let Some(storage) = local_storage() else {
        return;
    };
    match user {
        Some(user) => {
            if let Ok(raw) = serde_json::to_string(user) {
                let _ = storage.set_item(USER_KEY, &raw);
                let _ = storage.set_item(ROLE_KEY, user.role.as_str());
            }
        }
        None => {
            let _ = storage.remove_item(USER_KEY);
            let _ = storage.remove_item(ROLE_KEY);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn cached_user() -> Option<SessionUser> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn persist_user(_user: Option<&SessionUser>) {}
