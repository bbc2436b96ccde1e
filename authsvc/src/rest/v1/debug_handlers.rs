use std::env;

use actix_web::{
    get,
    web::{self, Json},
    Scope,
};
use serde::Serialize;

use crate::rest::api::ApiError;

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: String,
}

#[get("/readiness")]
pub async fn readiness() -> Result<Json<ReadinessResponse>, ApiError> {
    Ok(Json(ReadinessResponse {
        status: "ok".to_string(),
    }))
}

#[derive(Serialize)]
pub struct LivenessReponse {
    status: String,
    version: String,
    hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pod_ip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

#[get("/liveness")]
pub async fn liveness() -> Result<Json<LivenessReponse>, ApiError> {
    Ok(Json(LivenessReponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: sys_info::hostname().ok(),
        name: env::var("KUBERNETES_NAME").ok(),
        pod_ip: env::var("KUBERNETES_POD_IP").ok(),
        node: env::var("KUBERNETES_NODE_NAME").ok(),
        namespace: env::var("KUBERNETES_NAMESPACE").ok(),
    }))
}

pub fn api() -> Scope {
    web::scope("/debug").service(readiness).service(liveness)
}
