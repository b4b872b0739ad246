use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Reasons a signup payload is rejected before the store is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("username must contain only ASCII letters and digits")]
    InvalidUsername,
}

/// Returns true when `username` is non-empty and matches `^[A-Za-z0-9]+$`.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Reads an explicit JSON `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Deserialize, Serialize, ToSchema)]
pub struct SignupParams {
    /// Alphanumeric login name. Must be unique.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// Plaintext password. Only a hash of it is ever stored.
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
}

impl SignupParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if !is_valid_username(&self.username) {
            return Err(ValidationError::InvalidUsername);
        }
        Ok(())
    }
}

impl fmt::Debug for SignupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginParams {
    /// The username of the user to authenticate as.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// The password of the user to authenticate as.
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
}

impl fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password: &str) -> SignupParams {
        SignupParams {
            username: username.into(),
            password: password.into(),
            age: 30,
            gender: "f".into(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert_eq!(signup("alice", "pw123").validate(), Ok(()));
        assert_eq!(signup("Bob42", "x").validate(), Ok(()));
        assert_eq!(signup("0", "x").validate(), Ok(()));
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(
            signup("", "pw123").validate(),
            Err(ValidationError::EmptyUsername)
        );
        assert_eq!(
            signup("alice", "").validate(),
            Err(ValidationError::EmptyPassword)
        );
        assert_eq!(signup("", "").validate(), Err(ValidationError::EmptyUsername));
    }

    #[test]
    fn test_non_alphanumeric_username_rejected() {
        for name in ["bob!", "al ice", "a-b", "a_b", "名前", "alice\n", "é"] {
            assert_eq!(
                signup(name, "pw").validate(),
                Err(ValidationError::InvalidUsername),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let params: SignupParams = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(params.password, "");
        assert_eq!(params.age, 0);
        assert_eq!(params.validate(), Err(ValidationError::EmptyPassword));
    }

    #[test]
    fn test_null_fields_default() {
        let params: SignupParams = serde_json::from_str(
            r#"{"username":"alice","password":"pw","age":null,"gender":null}"#,
        )
        .unwrap();
        assert_eq!(params.age, 0);
        assert_eq!(params.gender, "");
        assert_eq!(params.validate(), Ok(()));

        let login: LoginParams =
            serde_json::from_str(r#"{"username":null,"password":"pw"}"#).unwrap();
        assert_eq!(login.username, "");
    }

    #[test]
    fn test_age_accepts_any_integer() {
        for (raw, age) in [("-1", -1), ("0", 0), ("5000000000", 5_000_000_000)] {
            let params: SignupParams = serde_json::from_str(&format!(
                r#"{{"username":"alice","password":"pw","age":{raw}}}"#
            ))
            .unwrap();
            assert_eq!(params.age, age);
        }

        assert!(serde_json::from_str::<SignupParams>(r#"{"age":"thirty"}"#).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let params = signup("alice", "hunter2");
        let printed = format!("{params:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));

        let login = LoginParams {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }
}
