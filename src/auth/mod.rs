mod helpers;
mod middleware;
mod password;
mod session;

pub use helpers::{authenticate, session_id_from_cookie_header};
pub use middleware::{AdminPolicy, AuthError, RequireAdmin, RequireUser, role_based_policy};
pub use password::PasswordHasher;
pub use session::{SESSION_COOKIE, SessionStore};
