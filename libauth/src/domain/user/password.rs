//! Provides the rules for checking a submitted password against a stored one.
use std::{fmt::Display, str::FromStr, sync::OnceLock};

use argon2::{
    password_hash::{Error, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};

use crate::foundation::compare::constant_time_eq;

/// Returns an Argon2id PHC string for the password, salted at random.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    let password_hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None)?,
    )
    .hash_password(password.as_bytes(), &salt)?
    .to_string();

    Ok(password_hash)
}

/// Returns whether the value parses as a PHC password hash string.
pub fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}

// Hash verified against when there is no account, so unknown users take as
// long as known ones.
fn absent_user_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_password("absent user").ok())
        .as_deref()
}

/// How the stored password value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordPolicy {
    /// Plain `==` on the stored value. Leaks timing information and only
    /// exists for compatibility with stores holding plaintext passwords.
    Exact,
    /// Byte-exact comparison that runs in constant time.
    #[default]
    ConstantTime,
    /// The stored value is an Argon2 PHC string.
    Argon2,
}

impl PasswordPolicy {
    /// Returns whether `submitted` satisfies the `stored` password value.
    pub fn matches(&self, stored: &str, submitted: &str) -> bool {
        match self {
            PasswordPolicy::Exact => stored == submitted,
            PasswordPolicy::ConstantTime => constant_time_eq(stored.as_bytes(), submitted.as_bytes()),
            PasswordPolicy::Argon2 => {
                // A value that doesn't parse as a hash can't be matched.
                let Ok(expected) = PasswordHash::new(stored) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(submitted.as_bytes(), &expected)
                    .is_ok()
            }
        }
    }

    /// Does the work of a failed check when there is no stored value to check
    /// against. Always returns `false`.
    pub fn reject(&self, submitted: &str) -> bool {
        if let (PasswordPolicy::Argon2, Some(hash)) = (self, absent_user_hash()) {
            let _ = self.matches(hash, submitted);
        }
        false
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordPolicy::Exact => "exact",
            PasswordPolicy::ConstantTime => "constant_time",
            PasswordPolicy::Argon2 => "argon2",
        }
    }
}

impl Display for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PasswordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(PasswordPolicy::Exact),
            "constant_time" => Ok(PasswordPolicy::ConstantTime),
            "argon2" => Ok(PasswordPolicy::Argon2),
            other => Err(format!(
                "{} is not a supported password policy. Use `exact`, `constant_time` or `argon2`.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_exact_policies_agree() {
        for policy in [PasswordPolicy::Exact, PasswordPolicy::ConstantTime] {
            assert!(policy.matches("secret1", "secret1"));
            assert!(!policy.matches("secret1", "Secret1"));
            assert!(!policy.matches("secret1", "secret1 "));
            assert!(!policy.matches("secret1", ""));
        }
    }

    #[test]
    fn argon2_policy_verifies_hashes() {
        let hash = hash_password("secret1").expect("Should be able to hash password");

        assert!(PasswordPolicy::Argon2.matches(&hash, "secret1"));
        assert!(!PasswordPolicy::Argon2.matches(&hash, "Secret1"));
        // A plaintext value isn't a hash and is never accepted.
        assert!(!PasswordPolicy::Argon2.matches("secret1", "secret1"));
    }

    #[test]
    fn it_recognizes_password_hashes() {
        let hash = hash_password("secret1").expect("Should be able to hash password");
        assert!(is_password_hash(&hash));
        assert!(!is_password_hash("secret1"));
        assert!(!is_password_hash(""));
    }

    #[test]
    fn reject_never_matches() {
        for policy in [PasswordPolicy::Exact, PasswordPolicy::ConstantTime, PasswordPolicy::Argon2] {
            assert!(!policy.reject("absent user"));
            assert!(!policy.reject(""));
        }
        assert!(absent_user_hash().is_some_and(is_password_hash));
    }

    #[test]
    fn policy_parses_from_configuration_values() {
        assert_eq!("exact".parse::<PasswordPolicy>(), Ok(PasswordPolicy::Exact));
        assert_eq!("Constant_Time".parse::<PasswordPolicy>(), Ok(PasswordPolicy::ConstantTime));
        assert_eq!("argon2".parse::<PasswordPolicy>(), Ok(PasswordPolicy::Argon2));
        assert!("bcrypt".parse::<PasswordPolicy>().is_err());
        assert_eq!(PasswordPolicy::default().to_string(), "constant_time");
    }
}
