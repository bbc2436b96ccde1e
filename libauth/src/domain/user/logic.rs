use std::{error::Error, fmt::Display, str::FromStr};

use super::{repository::UserRepositoryError, User};

#[derive(Debug, PartialEq)]
pub enum UserLogicError {
    /// Unknown user or wrong password. Deliberately not told apart.
    Unauthorized,
    UserRepositoryError(UserRepositoryError),
}

impl From<UserRepositoryError> for UserLogicError {
    fn from(value: UserRepositoryError) -> Self {
        UserLogicError::UserRepositoryError(value)
    }
}

impl Display for UserLogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserLogicError::Unauthorized => write!(f, "Unauthorized"),
            UserLogicError::UserRepositoryError(err) => write!(f, "{}", err),
        }
    }
}

impl Error for UserLogicError {}

/// What a caller sees when the store can't complete a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Store failures are returned as `UserLogicError::UserRepositoryError`.
    #[default]
    Distinct,
    /// Store failures are reported as `UserLogicError::Unauthorized`, which
    /// hides outages behind failed logins.
    Legacy,
}

impl FailureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Distinct => "distinct",
            FailureMode::Legacy => "legacy",
        }
    }
}

impl Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distinct" => Ok(FailureMode::Distinct),
            "legacy" => Ok(FailureMode::Legacy),
            other => Err(format!(
                "{} is not a supported failure mode. Use either `distinct` or `legacy`.",
                other
            )),
        }
    }
}

/// Business logic that's to be implemented by every BL provider.
pub trait UserLogic: Send + Sync {
    /// Returns the user when `password` matches the stored password of `user_id`.
    ///
    /// Never changes the store, so repeated calls give the same answer as
    /// long as nobody else does.
    fn authenticate(&self, user_id: &str, password: &str) -> Result<User, UserLogicError>;
}
