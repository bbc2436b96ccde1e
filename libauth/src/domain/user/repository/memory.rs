use std::{collections::HashMap, sync::RwLock};

use crate::{domain::user::User, foundation::id::UserId};

use super::{UserRepository, UserRepositoryError};

/// In memory storage.
pub struct Memory {
    users: RwLock<HashMap<UserId, User>>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Add a new user to the store.
    pub fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write()?;
        if users.contains_key(&user.id) {
            return Err(UserRepositoryError::DuplicateId);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    /// Replace a stored user with the provided data.
    pub fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        match self.users.write()?.get_mut(&user.id) {
            None => Err(UserRepositoryError::NotFound),
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
        }
    }

    /// Delete a user from the store.
    pub fn delete(&self, user_id: &str) -> Result<(), UserRepositoryError> {
        match self.users.write()?.remove(user_id) {
            None => Err(UserRepositoryError::NotFound),
            Some(_) => Ok(()),
        }
    }

    pub fn len(&self) -> Result<usize, UserRepositoryError> {
        Ok(self.users.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, UserRepositoryError> {
        Ok(self.users.read()?.is_empty())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects users into a store. Later users replace earlier ones with the same id.
impl FromIterator<User> for Memory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let users = iter
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect::<HashMap<_, _>>();
        Self {
            users: RwLock::new(users),
        }
    }
}

impl UserRepository for Memory {
    fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read()?.get(user_id).cloned())
    }
}
