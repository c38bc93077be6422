pub mod auth;

pub use auth::{AuthUser, Identity, ADMIN_USER_ID, SESSION_COOKIE};
