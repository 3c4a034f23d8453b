use super::PasswordHasher;
use super::session::SESSION_COOKIE;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::User;

/// Resolves credentials to a user record. Unknown email and wrong
/// password collapse into the same `InvalidCredentials` error so the
/// response body cannot reveal which one failed. The wrong-email path
/// still runs a verification against a throwaway hash to keep the two
/// failure paths on similar timing.
pub fn authenticate(
    store: &dyn Store,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<User> {
    let user = store.get_user_by_email(email)?;

    match user {
        Some(user) => {
            if hasher.verify(password, &user.password_hash)? {
                Ok(user)
            } else {
                Err(Error::InvalidCredentials)
            }
        }
        None => {
            let decoy = hasher.hash("wayfare-decoy")?;
            let _ = hasher.verify(password, &decoy);
            Err(Error::InvalidCredentials)
        }
    }
}

/// Extracts the session id from a Cookie header, if present.
/// Expects format: `name=value; name2=value2`
pub fn session_id_from_cookie_header(header: Option<&str>) -> Option<String> {
    let header = header?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::{NewUser, Role};

    fn store_with_user(hasher: &PasswordHasher) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
            .create_user(&NewUser {
                email: "ada@example.com".to_string(),
                password_hash: hasher.hash("secret-pw").unwrap(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                role: Role::User,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_authenticate_success() {
        let hasher = PasswordHasher::new();
        let store = store_with_user(&hasher);

        let user = authenticate(&store, &hasher, "ada@example.com", "secret-pw").unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_authenticate_failures_are_uniform() {
        let hasher = PasswordHasher::new();
        let store = store_with_user(&hasher);

        let wrong_password = authenticate(&store, &hasher, "ada@example.com", "bad-pw");
        let unknown_email = authenticate(&store, &hasher, "nobody@example.com", "secret-pw");

        assert!(matches!(wrong_password, Err(Error::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(Error::InvalidCredentials)));
    }

    #[test]
    fn test_session_cookie_parsing() {
        assert_eq!(
            session_id_from_cookie_header(Some("wayfare_session=abc123")),
            Some("abc123".to_string())
        );
        assert_eq!(
            session_id_from_cookie_header(Some("theme=dark; wayfare_session=abc123; lang=en")),
            Some("abc123".to_string())
        );
        assert_eq!(session_id_from_cookie_header(Some("theme=dark")), None);
        assert_eq!(session_id_from_cookie_header(Some("wayfare_session=")), None);
        assert_eq!(session_id_from_cookie_header(None), None);
    }
}
