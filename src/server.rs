//! HTTP submission boundary, enabled with the `server` feature.

use crate::{
    error::ArtError,
    models::{ActionResponse, RawSubmission},
    orchestrator::Orchestrator,
};
use actix_web::{
    error::{InternalError, JsonPayloadError},
    get,
    http::StatusCode,
    post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use serde_json::json;

/// Reference images arrive inline as base64, so the default 32KB JSON limit is far too small.
pub const MAX_SUBMISSION_BYTES: usize = 16 * 1024 * 1024;

#[post("/api/generate")]
async fn generate(
    orchestrator: web::Data<Orchestrator>,
    submission: web::Json<RawSubmission>,
) -> HttpResponse {
    let result = orchestrator.run(&submission).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) if e.is_validation() => StatusCode::BAD_REQUEST,
        Err(_) => StatusCode::BAD_GATEWAY,
    };
    HttpResponse::build(status).json(ActionResponse::from(result))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Unreadable bodies still get the `{ success: false, error }` shape.
fn reject_payload(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  Rejected unreadable submission: {}", err);
    let body = ActionResponse::failure(&ArtError::RequestError(err.to_string()));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_SUBMISSION_BYTES)
            .error_handler(reject_payload),
    )
        .service(generate)
        .service(health);
}

pub async fn serve(orchestrator: Orchestrator, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(orchestrator);
    log::info!("🌐 Listening on http://0.0.0.0:{}", port);

    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
