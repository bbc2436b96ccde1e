use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    logic::{FailureMode, UserLogic, UserLogicError},
    password::PasswordPolicy,
    repository::UserRepository,
    User,
};

/// Authenticates users against a [`UserRepository`].
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    password_policy: PasswordPolicy,
    failure_mode: FailureMode,
}

/// Builder for [`UserService`].
pub struct UserServiceBuilder {
    repo: Arc<dyn UserRepository>,
    password_policy: PasswordPolicy,
    failure_mode: FailureMode,
}

impl UserServiceBuilder {
    pub fn with_password_policy(self, password_policy: PasswordPolicy) -> Self {
        Self {
            password_policy,
            ..self
        }
    }

    pub fn with_failure_mode(self, failure_mode: FailureMode) -> Self {
        Self {
            failure_mode,
            ..self
        }
    }

    pub fn finish(self) -> UserService {
        UserService {
            repo: self.repo,
            password_policy: self.password_policy,
            failure_mode: self.failure_mode,
        }
    }
}

impl UserService {
    /// Returns a service reading from `repo` with the default settings.
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self::build(repo).finish()
    }

    /// Returns a UserServiceBuilder with default values.
    ///
    /// The default settings are:
    /// - password policy: constant time, byte-exact comparison
    /// - failure mode: store failures are reported as such
    ///
    /// Example:
    /// ```
    /// use std::sync::Arc;
    /// use libauth::domain::user::{
    ///     logic::FailureMode, password::PasswordPolicy, repository::memory::Memory,
    ///     service::UserService,
    /// };
    ///
    /// let _service = UserService::build(Arc::new(Memory::new()))
    ///     .with_password_policy(PasswordPolicy::Argon2)
    ///     .with_failure_mode(FailureMode::Distinct)
    ///     .finish();
    /// ```
    pub fn build(repo: Arc<dyn UserRepository>) -> UserServiceBuilder {
        UserServiceBuilder {
            repo,
            password_policy: PasswordPolicy::default(),
            failure_mode: FailureMode::default(),
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        self.password_policy
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }
}

impl UserLogic for UserService {
    #[tracing::instrument(name = "authenticate", skip(self, password), fields(policy = %self.password_policy))]
    fn authenticate(&self, user_id: &str, password: &str) -> Result<User, UserLogicError> {
        let user = match self.repo.find_by_user_id(user_id) {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.password_policy.reject(password);
                debug!("unknown user");
                return Err(UserLogicError::Unauthorized);
            }
            Err(err) => {
                warn!(error = %err, "user lookup failed");
                return match self.failure_mode {
                    FailureMode::Distinct => Err(err.into()),
                    FailureMode::Legacy => Err(UserLogicError::Unauthorized),
                };
            }
        };

        if !self.password_policy.matches(user.stored_password(), password) {
            debug!("password mismatch");
            return Err(UserLogicError::Unauthorized);
        }

        debug!("authenticated");
        Ok(user)
    }
}
