//! Push-style delivery: Telegram posts updates to our HTTP endpoint.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

use super::dispatch::dispatch;
use super::types::Update;
use crate::dialog::DialogController;
use crate::metrics;

/// Header Telegram uses to echo the secret given to `setWebhook`.
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub struct WebhookState {
    pub controller: Arc<DialogController>,
    pub secret_token: Option<String>,
}

impl WebhookState {
    pub fn new(controller: Arc<DialogController>, secret_token: Option<String>) -> Self {
        Self {
            controller,
            secret_token,
        }
    }

    fn is_authorized(&self, req: &HttpRequest) -> bool {
        match &self.secret_token {
            None => true,
            Some(expected) => req
                .headers()
                .get(SECRET_HEADER)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|provided| provided == expected),
        }
    }
}

/// Update handler - POST to the webhook path.
pub async fn update_handler(
    state: web::Data<WebhookState>,
    req: HttpRequest,
    body: web::Json<Update>,
) -> impl Responder {
    if !state.is_authorized(&req) {
        log::warn!("Rejected webhook call with missing or wrong secret token");
        return HttpResponse::Unauthorized().finish();
    }

    dispatch(&state.controller, body.into_inner()).await;
    HttpResponse::Ok().finish()
}

/// Health check - GET /health
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Prometheus scrape endpoint - GET /metrics
pub async fn metrics_handler() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::render())
}

/// Path component of the public webhook URL; Telegram posts there.
pub fn webhook_path(public_url: &str) -> String {
    reqwest::Url::parse(public_url)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

/// Configure webhook routes.
pub fn config(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource("/health").route(web::get().to(health_handler)))
        .service(web::resource("/metrics").route(web::get().to(metrics_handler)))
        .service(web::resource(path).route(web::post().to(update_handler)));
}
