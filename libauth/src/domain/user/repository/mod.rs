use std::{error::Error, fmt::Display, sync::PoisonError};

use super::User;

pub mod memory;

/// Repository related errors.
///
/// An account that doesn't exist isn't an error for lookups, those return
/// `Ok(None)`. `NotFound` is only used by account management.
#[derive(Debug, PartialEq)]
pub enum UserRepositoryError {
    NotFound,
    DuplicateId,
    Other(String),
}

impl Display for UserRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output: &str = match self {
            UserRepositoryError::NotFound => "not found",
            UserRepositoryError::DuplicateId => "duplicate user id",
            UserRepositoryError::Other(err) => err,
        };
        write!(f, "{}", output)
    }
}

impl Error for UserRepositoryError {}

impl From<&str> for UserRepositoryError {
    fn from(value: &str) -> Self {
        UserRepositoryError::Other(value.to_owned())
    }
}

impl From<String> for UserRepositoryError {
    fn from(value: String) -> Self {
        UserRepositoryError::Other(value)
    }
}

impl<T> From<PoisonError<T>> for UserRepositoryError {
    fn from(value: PoisonError<T>) -> Self {
        UserRepositoryError::Other(value.to_string())
    }
}

/// Read access to the user store, as needed by authentication.
pub trait UserRepository: Send + Sync {
    /// Read the single user with the given id.
    ///
    /// Returns `Ok(None)` when no such user exists and `Err` when the store
    /// couldn't answer.
    fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, UserRepositoryError>;
}
