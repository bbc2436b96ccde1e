use libauth::domain::user::logic::UserLogic;
use std::sync::Arc;

/// Shared state handed to the request handlers.
#[derive(Clone)]
pub struct Store {
    pub user_logic: Arc<dyn UserLogic>,
}

impl Store {
    pub fn new(user_logic: Arc<dyn UserLogic>) -> Self {
        Self { user_logic }
    }
}
