//! Login credentials, validated before any request is made.

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

pub const MIN_CREDENTIAL_LEN: usize = 3;

const REQUIRED: &str = "required";
const TOO_SHORT: &str = "too_short";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("请输入用户名和密码")]
    Missing,
    #[error("用户名和密码至少3个字符")]
    TooShort,
}

/// Username and password as typed.
///
/// Values are sent untrimmed; trimming only applies to the length rule.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn check_field(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.add(field, ValidationError::new(REQUIRED));
    } else if value.trim().chars().count() < MIN_CREDENTIAL_LEN {
        errors.add(field, ValidationError::new(TOO_SHORT));
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_field(&mut errors, "username", &self.username);
        check_field(&mut errors, "password", &self.password);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Credentials {
    /// Build credentials, rejecting empty or too-short values.
    ///
    /// A missing field wins over a short one.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let credentials = Self {
            username: username.into(),
            password: password.into(),
        };

        match credentials.validate() {
            Ok(()) => Ok(credentials),
            Err(errors) => {
                let missing = errors.errors().values().any(|kind| match kind {
                    ValidationErrorsKind::Field(errs) => errs.iter().any(|e| e.code == REQUIRED),
                    _ => false,
                });
                Err(if missing {
                    CredentialError::Missing
                } else {
                    CredentialError::TooShort
                })
            }
        }
    }
}
