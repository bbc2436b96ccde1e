use std::{fmt::Display, net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::header,
    web::{Data, JsonConfig},
    App, HttpServer,
};
use chrono::Utc;
use futures::future;
use libauth::{
    domain::user::{
        password::{hash_password, is_password_hash, PasswordPolicy},
        repository::{memory::Memory, UserRepositoryError},
        service::UserService,
        User,
    },
    foundation::id::UserId,
};
use secrecy::ExposeSecret;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{Account, Authentication, Configuration},
    rest::{api::ApiError, v1},
    store::Store,
};

pub struct Application {
    api_port: u16,
    debug_port: u16,
    api_server: Server,
    debug_server: Server,
}

#[derive(Debug)]
pub enum ApplicationError {
    IoError(std::io::Error),
    SeedError(UserRepositoryError),
    HashError(String),
}

impl From<std::io::Error> for ApplicationError {
    fn from(value: std::io::Error) -> Self {
        ApplicationError::IoError(value)
    }
}

impl From<UserRepositoryError> for ApplicationError {
    fn from(value: UserRepositoryError) -> Self {
        ApplicationError::SeedError(value)
    }
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::IoError(err) => write!(f, "{}", err),
            ApplicationError::SeedError(err) => write!(f, "couldn't seed accounts: {}", err),
            ApplicationError::HashError(err) => write!(f, "couldn't hash account password: {}", err),
        }
    }
}

impl std::error::Error for ApplicationError {}

impl Application {
    /// Binds both listeners and prepares the servers without running them.
    ///
    /// Port 0 binds a random free port, see `api_port` and `debug_port`.
    pub async fn build(configuration: Configuration) -> Result<Self, ApplicationError> {
        let store = prepare_store(&configuration.authentication, &configuration.accounts)?;

        let api_address = format_address(&configuration.server.host, configuration.server.api_port);
        let api_listener = TcpListener::bind(api_address)?;
        let api_port = api_listener.local_addr()?.port();
        let api_server =
            run_api_server(api_listener, store, configuration.server.allowed_origins)?;

        let debug_address =
            format_address(&configuration.server.host, configuration.server.debug_port);
        let debug_listener = TcpListener::bind(debug_address)?;
        let debug_port = debug_listener.local_addr()?.port();
        let debug_server = run_debug_server(debug_listener)?;

        tracing::info!(api_port, debug_port, "listening");

        Ok(Self {
            api_port,
            debug_port,
            api_server,
            debug_server,
        })
    }

    pub fn api_port(&self) -> u16 {
        self.api_port
    }

    pub fn debug_port(&self) -> u16 {
        self.debug_port
    }

    pub async fn serve(self) -> Result<(), ApplicationError> {
        future::try_join(self.api_server, self.debug_server).await?;
        Ok(())
    }
}

fn format_address(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// CORS for the browser login form. Only the configured origins may call the API.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
}

/// Malformed request bodies answer 400 with the usual JSON error body.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _| ApiError::InvalidRequest(err.to_string()).into())
}

fn run_api_server(
    listener: TcpListener,
    store: Store,
    allowed_origins: Vec<String>,
) -> Result<Server, ApplicationError> {
    let store = Data::new(store);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors(&allowed_origins))
            .app_data(store.clone())
            .app_data(json_config())
            .service(v1::api())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

fn run_debug_server(listener: TcpListener) -> Result<Server, ApplicationError> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(v1::debug_handlers::api())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

/// Seeds an in memory store with the configured accounts and wraps it in a service.
pub fn prepare_store(
    auth_conf: &Authentication,
    accounts: &[Account],
) -> Result<Store, ApplicationError> {
    let now = Utc::now();
    let user_repo = Arc::new(Memory::new());
    for account in accounts {
        let password = seed_password(auth_conf.password_policy, account.password.expose_secret())?;
        let mut user = User::new(UserId::from(account.user_id.as_str()), &password, now)
            .with_name(&account.name);
        if let Some(email) = &account.email {
            user = user.with_email(email);
        }
        user_repo.create(&user)?;
    }
    tracing::info!(
        accounts = accounts.len(),
        password_policy = %auth_conf.password_policy,
        failure_mode = %auth_conf.failure_mode,
        "user store ready"
    );

    let user_service = UserService::build(user_repo)
        .with_password_policy(auth_conf.password_policy)
        .with_failure_mode(auth_conf.failure_mode)
        .finish();
    Ok(Store::new(Arc::new(user_service)))
}

// Under argon2 the store holds hashes, plaintext account passwords get hashed here.
fn seed_password(policy: PasswordPolicy, password: &str) -> Result<String, ApplicationError> {
    if policy != PasswordPolicy::Argon2 || is_password_hash(password) {
        return Ok(password.to_string());
    }
    hash_password(password).map_err(|err| ApplicationError::HashError(err.to_string()))
}
