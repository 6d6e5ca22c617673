use crate::analyzer::SeoAnalyzer;
use crate::error::AnalysisError;
use actix_web::{App, HttpResponse, HttpServer, web};
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Mounts the `/api` routes onto an actix app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().limit(1024 * 1024).error_handler(
                |err, _req| {
                    let response = HttpResponse::BadRequest().json(json!({
                        "error": "invalid_request",
                        "message": err.to_string(),
                    }));
                    actix_web::error::InternalError::from_response(err, response).into()
                },
            ))
            .route("/health", web::get().to(health))
            .route("/analyze", web::post().to(analyze))
            .default_service(web::to(not_found)),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "timestamp": chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn analyze(
    analyzer: web::Data<SeoAnalyzer>,
    request: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    match analyzer.analyze(&request.url).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(
            e @ (AnalysisError::EmptyUrl
            | AnalysisError::InvalidUrl { .. }
            | AnalysisError::UnsupportedScheme(_)),
        ) => HttpResponse::BadRequest().json(json!({
            "error": "invalid_request",
            "message": e.to_string(),
        })),
        Err(e) => {
            tracing::error!(url = %request.url, error = %e, "Analysis error");
            HttpResponse::InternalServerError().json(json!({
                "error": "analysis_failed",
                "message": e.to_string(),
            }))
        }
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "not_found" }))
}

/// Serves the API until the process is stopped.
pub async fn serve(addr: &str, analyzer: SeoAnalyzer) -> Result<()> {
    let analyzer = web::Data::new(analyzer);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(analyzer.clone())
            .configure(configure)
    })
    .bind(addr)
    .with_context(|| format!("Failed to bind API server to {}", addr))?;

    tracing::info!(addr = %addr, "SEO analyzer API listening");
    server.run().await.context("API server error")
}
