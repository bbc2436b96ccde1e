use libauth::domain::user::{logic::FailureMode, password::PasswordPolicy};
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Runtime environment for the service.
#[derive(PartialEq, Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Server {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub api_port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub debug_port: u16,
    pub host: String,
    /// Origins the browser login form may be served from.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Authentication {
    #[serde(deserialize_with = "deserialize_from_str")]
    pub password_policy: PasswordPolicy,
    #[serde(deserialize_with = "deserialize_from_str")]
    pub failure_mode: FailureMode,
}

/// An account the in memory store is seeded with.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct Account {
    pub user_id: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub server: Server,
    pub authentication: Authentication,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr<Err = String>,
{
    let value = <String as serde::Deserialize>::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

impl Configuration {
    pub fn parse(key: &str) -> Result<Configuration, config::ConfigError> {
        let key = key.to_uppercase();
        let base_path = std::env::current_dir()
            .map_err(|err| config::ConfigError::Message(err.to_string()))?;
        let configuration_directory = base_path.join("configuration");

        // Detect the runtime environment, if none is provided use local.
        let environment: Environment = std::env::var(&key)
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;
        let environment_filename = format!("{}.yaml", environment.as_str());

        let conf = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            // Add in settings from environment variables (with a prefix of key and '__' as separator)
            // E.g. `<key>_SERVER__API_PORT=5001` would set `Settings.server.api_port`
            .add_source(
                config::Environment::with_prefix(&key)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let conf = conf.try_deserialize::<Configuration>()?;
        conf.check(&environment)?;
        Ok(conf)
    }

    /// Rejects settings that must not reach production.
    pub fn check(&self, environment: &Environment) -> Result<(), config::ConfigError> {
        if *environment != Environment::Production {
            return Ok(());
        }
        if self.authentication.password_policy == PasswordPolicy::Exact {
            return Err(config::ConfigError::Message(
                "Don't use the `exact` password policy in production.".to_string(),
            ));
        }
        if self.authentication.failure_mode == FailureMode::Legacy {
            return Err(config::ConfigError::Message(
                "Don't use the `legacy` failure mode in production.".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SETTINGS: &str = r#"
server:
  host: 127.0.0.1
  api_port: "3000"
  debug_port: 3001
  allowed_origins:
    - http://localhost:5173
authentication:
  password_policy: exact
  failure_mode: legacy
accounts:
  - user_id: alice
    password: secret1
    name: Alice
"#;

    fn parse(settings: &str) -> Result<Configuration, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(settings, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Configuration>()
    }

    #[test]
    fn it_parses_settings() {
        let conf = parse(SETTINGS).expect("Should be able to parse settings");

        assert_eq!(conf.server.api_port, 3000);
        assert_eq!(conf.server.debug_port, 3001);
        assert_eq!(conf.server.allowed_origins, vec!["http://localhost:5173".to_string()]);
        assert_eq!(conf.authentication.password_policy, PasswordPolicy::Exact);
        assert_eq!(conf.authentication.failure_mode, FailureMode::Legacy);
        assert_eq!(conf.accounts.len(), 1);
        assert_eq!(conf.accounts[0].user_id, "alice");
        assert_eq!(conf.accounts[0].email, None);
    }

    #[test]
    fn it_rejects_unknown_policies() {
        let settings = SETTINGS.replace("password_policy: exact", "password_policy: md5");
        assert!(parse(&settings).is_err());
    }

    #[test]
    fn production_rejects_legacy_settings() {
        let conf = parse(SETTINGS).expect("Should be able to parse settings");
        assert!(conf.check(&Environment::Local).is_ok());
        assert!(conf.check(&Environment::Production).is_err());

        let settings = SETTINGS
            .replace("password_policy: exact", "password_policy: argon2")
            .replace("failure_mode: legacy", "failure_mode: distinct");
        let conf = parse(&settings).expect("Should be able to parse settings");
        assert!(conf.check(&Environment::Production).is_ok());
    }

    #[test]
    fn environment_parses() {
        assert_eq!(Environment::try_from("LOCAL".to_string()), Ok(Environment::Local));
        assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Production));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }
}
