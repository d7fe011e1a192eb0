use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{Engine, EngineError, MatchOutcome, StopOutcome};
use crate::models::{
    ErrorResponse, EventsResponse, HealthResponse, MatchRequest, MatchResponse, MessageRequest,
    MessageResponse, ProfileResponse, RegisterRequest, RegisterResponse, StopRequest,
    StopResponse,
};
use crate::services::Mailboxes;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub mailboxes: Arc<Mailboxes>,
    pub max_message_len: usize,
}

/// Configure all chat-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/register", web::post().to(register))
        .route("/profile/{id}", web::get().to(get_profile))
        .route("/match", web::post().to(find_match))
        .route("/stop", web::post().to(stop))
        .route("/next", web::post().to(next))
        .route("/message", web::post().to(message))
        .route("/events/{id}", web::get().to(get_events))
        .route("/events/{id}", web::delete().to(disconnect));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Map an engine error onto a JSON error response
fn engine_error(e: EngineError) -> HttpResponse {
    match e {
        EngineError::NotRegistered(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_registered".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        EngineError::AlreadyInSession(_) => HttpResponse::Conflict().json(ErrorResponse {
            error: "already_in_session".to_string(),
            message: e.to_string(),
            status_code: 409,
        }),
        EngineError::Registry(_) => {
            tracing::error!("Registry inconsistency surfaced at the API: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

fn match_response(outcome: MatchOutcome) -> MatchResponse {
    match outcome {
        MatchOutcome::Matched { partner } => MatchResponse {
            status: "matched".to_string(),
            partner_id: Some(partner),
        },
        MatchOutcome::Waiting => MatchResponse { status: "waiting".to_string(), partner_id: None },
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Register (or re-register) a profile
///
/// POST /api/v1/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: {:?}", errors);
        return validation_error(errors);
    }

    let profile = crate::models::Profile {
        gender: req.gender,
        age: req.age,
        preference: req.preference,
    };
    state.engine.register(&req.user_id, profile);

    HttpResponse::Ok().json(RegisterResponse {
        user_id: req.user_id.clone(),
        status: "registered".to_string(),
    })
}

/// Look up a registered profile
///
/// GET /api/v1/profile/{id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    match state.engine.get_profile(&user_id) {
        Some(profile) => HttpResponse::Ok().json(ProfileResponse { user_id, profile }),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("no profile registered for {}", user_id),
            status_code: 404,
        }),
    }
}

/// Request a chat partner
///
/// POST /api/v1/match
async fn find_match(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.engine.request_match(&req.user_id).await {
        Ok(outcome) => HttpResponse::Ok().json(match_response(outcome)),
        Err(e) => engine_error(e),
    }
}

/// Leave the current chat or cancel a pending wait
///
/// POST /api/v1/stop
async fn stop(state: web::Data<AppState>, req: web::Json<StopRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let outcome = state.engine.stop(&req.user_id).await;
    HttpResponse::Ok().json(StopResponse {
        status: "stopped".to_string(),
        partner_notified: matches!(outcome, StopOutcome::LeftSession { .. }),
    })
}

/// Leave the current chat and immediately look for a new partner
///
/// POST /api/v1/next
async fn next(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.engine.next(&req.user_id).await {
        Ok(outcome) => HttpResponse::Ok().json(match_response(outcome)),
        Err(e) => engine_error(e),
    }
}

/// Relay a text message to the current partner
///
/// POST /api/v1/message
///
/// `delivered: false` means the sender has no active partner and the
/// message was dropped; clients may surface a soft warning.
async fn message(state: web::Data<AppState>, req: web::Json<MessageRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    if req.text.len() > state.max_message_len {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "message_too_long".to_string(),
            message: format!("message exceeds {} bytes", state.max_message_len),
            status_code: 400,
        });
    }

    let delivered = state.engine.message(&req.user_id, &req.text).await;
    HttpResponse::Ok().json(MessageResponse { delivered })
}

/// Drain pending events for a user
///
/// GET /api/v1/events/{id}
async fn get_events(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    let events = state.mailboxes.drain(&user_id);
    let count = events.len();
    HttpResponse::Ok().json(EventsResponse { user_id, events, count })
}

/// Disconnect a user: implicit stop plus mailbox teardown
///
/// DELETE /api/v1/events/{id}
async fn disconnect(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();
    let outcome = state.engine.stop(&user_id).await;
    state.mailboxes.remove(&user_id);
    tracing::info!("Disconnected {}", user_id);
    HttpResponse::Ok().json(StopResponse {
        status: "disconnected".to_string(),
        partner_notified: matches!(outcome, StopOutcome::LeftSession { .. }),
    })
}
