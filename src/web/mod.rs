// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::analysis::{Analyzer, LinkedInAnalysisRequest, ResumeAnalysisRequest};
use crate::environment::EnvironmentConfig;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));
        response.set_header(Header::new("Access-Control-Expose-Headers", "Content-Length"));
        response.set_header(Header::new("Access-Control-Max-Age", "600"));
    }
}

#[get("/health")]
pub async fn health(config: &State<ServerConfig>) -> Json<HealthResponse> {
    handlers::health_handler(config).await
}

#[post("/analyze-resume", data = "<request>")]
pub async fn analyze_resume(
    request: Json<StandardRequest<ResumeAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    handlers::analyze_resume_handler(request, analyzer).await
}

#[post("/analyze-resume-paid", data = "<request>")]
pub async fn analyze_resume_paid(
    request: Json<StandardRequest<ResumeAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    handlers::analyze_resume_paid_handler(request, analyzer).await
}

#[post("/analyze-linkedin", data = "<request>")]
pub async fn analyze_linkedin(
    request: Json<StandardRequest<LinkedInAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    handlers::analyze_linkedin_handler(request, analyzer).await
}

#[post("/analyze-linkedin-paid", data = "<request>")]
pub async fn analyze_linkedin_paid(
    request: Json<StandardRequest<LinkedInAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    handlers::analyze_linkedin_paid_handler(request, analyzer).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify the body is a single JSON object".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path and method".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request fields have the wrong type".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Text fields must be strings".to_string(),
            "isSpecificJob must be a boolean".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the server without launching it
pub fn build_rocket(config: &EnvironmentConfig, analyzer: Analyzer) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    let server_config = ServerConfig {
        model: config.completion.model.clone(),
    };

    rocket::custom(figment)
        .attach(Cors)
        .manage(server_config)
        .manage(analyzer)
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unprocessable_entity,
                internal_error
            ],
        )
        .mount(
            config.server.route_prefix.as_str(),
            routes![
                health,
                analyze_resume,
                analyze_resume_paid,
                analyze_linkedin,
                analyze_linkedin_paid,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig, analyzer: Analyzer) -> Result<()> {
    info!("Starting ATS optimizer API server");
    info!(
        "Listening on {}:{} under {}",
        config.server.address, config.server.port, config.server.route_prefix
    );
    info!("Completion model: {}", config.completion.model);

    build_rocket(&config, analyzer)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
