//! Provides functionality for dealing with user accounts.
use chrono::{DateTime, Utc};

use crate::foundation::id::UserId;

pub mod logic;
pub mod password;
pub mod repository;
pub mod service;

/// A single user account as held by the store.
///
/// Records are created and changed by account management. Authentication
/// only ever reads them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    password: String,
    pub name: String,
    pub email: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl User {
    /// Returns a new record storing `password` exactly as given.
    ///
    /// Whether that value is plaintext or an Argon2 hash is up to the
    /// [`password::PasswordPolicy`] the store is read with.
    pub fn new(id: UserId, password: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            password: password.to_string(),
            name: String::new(),
            email: None,
            date_created: now,
            date_updated: now,
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self
        }
    }

    pub fn with_email(self, email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..self
        }
    }

    /// The stored password value.
    pub fn stored_password(&self) -> &str {
        &self.password
    }

    pub fn set_password(&mut self, password: &str, now: DateTime<Utc>) {
        self.password = password.to_string();
        self.date_updated = now;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_keeps_the_stored_password_verbatim() {
        let now = Utc::now();
        let user = User::new(UserId::from("alice"), " secret1 ", now)
            .with_name("Alice")
            .with_email("alice@example.com");

        assert_eq!(user.stored_password(), " secret1 ");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.date_created, user.date_updated);
    }

    #[test]
    fn set_password_touches_date_updated() {
        let created = Utc::now();
        let mut user = User::new(UserId::from("alice"), "secret1", created);
        let later = created + chrono::Duration::seconds(5);
        user.set_password("secret2", later);

        assert_eq!(user.stored_password(), "secret2");
        assert_eq!(user.date_created, created);
        assert_eq!(user.date_updated, later);
    }
}
