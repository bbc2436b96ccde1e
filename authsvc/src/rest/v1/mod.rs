use actix_web::{web, Scope};

pub mod debug_handlers;
pub mod login_handlers;

pub fn api() -> Scope {
    web::scope("/v1").service(login_handlers::post_login)
}
