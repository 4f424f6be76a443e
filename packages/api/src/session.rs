//! Session data types shared between server functions and the UI.

use serde::{Deserialize, Serialize};
use store::Role;

/// Key for storing the user id in the server session.
pub const SESSION_UID_KEY: &str = "uid";
/// Key for storing the role in the server session.
pub const SESSION_ROLE_KEY: &str = "role";

/// The logged-in user as seen by the client. Never includes the password
/// digest or the email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
