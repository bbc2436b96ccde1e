use actix_web::{
    post,
    web::{Data, Json},
};
use libauth::domain::user::User;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{rest::api::ApiError, Store};

#[derive(Deserialize)]
pub struct LoginRequest {
    user_id: String,
    password: Secret<String>,
}

/// Checks the submitted credentials and returns the matching user.
///
/// Unknown users and wrong passwords both answer 401 with the same body.
#[post("/login")]
#[tracing::instrument(name = "Login", skip(store, request), fields(user_id = %request.user_id))]
pub async fn post_login(
    store: Data<Store>,
    request: Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let LoginRequest { user_id, password } = request.into_inner();
    let user_logic = store.user_logic.clone();

    // The lookup may block on the store, keep it off the async workers.
    let user = tokio::task::spawn_blocking(move || {
        user_logic.authenticate(&user_id, password.expose_secret())
    })
    .await
    .map_err(|err| ApiError::Other(err.to_string()))??;

    Ok(Json(user))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use libauth::{
        domain::user::{
            logic::FailureMode,
            repository::{memory::Memory, UserRepository, UserRepositoryError},
            service::UserService,
        },
        foundation::id::UserId,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::rest::v1;

    struct Unavailable;

    impl UserRepository for Unavailable {
        fn find_by_user_id(&self, _user_id: &str) -> Result<Option<User>, UserRepositoryError> {
            Err(UserRepositoryError::from("connection refused"))
        }
    }

    fn prepare_store() -> Store {
        let user_repo = Arc::new(Memory::new());
        let alice = User::new(UserId::from("alice"), "secret1", Utc::now())
            .with_name("Alice")
            .with_email("alice@example.com");
        user_repo.create(&alice).expect("Should be able to create user");
        Store::new(Arc::new(UserService::new(user_repo)))
    }

    async fn login(store: Store, body: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(store))
                .service(v1::api()),
        )
        .await;
        let request = test::TestRequest::post()
            .uri("/v1/login")
            .set_json(body)
            .to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_web::test]
    async fn login_returns_the_user() {
        let (status, body) = login(
            prepare_store(),
            json!({"user_id": "alice", "password": "secret1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "alice");
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["email"], "alice@example.com");
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn unknown_user_and_wrong_password_answer_alike() {
        let (wrong_status, wrong_body) = login(
            prepare_store(),
            json!({"user_id": "alice", "password": "Secret1"}),
        )
        .await;
        let (unknown_status, unknown_body) = login(
            prepare_store(),
            json!({"user_id": "bob", "password": "secret1"}),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body, json!({"error": "Unauthorized"}));
    }

    #[actix_web::test]
    async fn store_failure_is_reported_as_unavailable() {
        let store = Store::new(Arc::new(UserService::new(Arc::new(Unavailable))));
        let (status, body) = login(store, json!({"user_id": "alice", "password": "secret1"})).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"error": "Unavailable"}));
    }

    #[actix_web::test]
    async fn legacy_mode_hides_store_failure() {
        let service = UserService::build(Arc::new(Unavailable))
            .with_failure_mode(FailureMode::Legacy)
            .finish();
        let (status, _) = login(
            Store::new(Arc::new(service)),
            json!({"user_id": "alice", "password": "secret1"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
