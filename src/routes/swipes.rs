use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, SwipeAction, SwipeRequest};
use crate::routes::{engine_error_response, AppState};

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes", web::post().to(record_swipe));
}

/// Swipe action endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "swiperId": "string",
///   "targetId": "string",
///   "action": "like|skip"
/// }
/// ```
async fn record_swipe(state: web::Data<AppState>, req: web::Json<SwipeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let action = match req.action.to_lowercase().as_str() {
        "like" => SwipeAction::Like,
        "skip" => SwipeAction::Skip,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_action".to_string(),
                message: "Action must be one of: like, skip".to_string(),
                status_code: 400,
            });
        }
    };

    match state
        .engine
        .record_swipe(&req.swiper_id, &req.target_id, action)
        .await
    {
        Ok(response) => {
            tracing::debug!(
                "Recorded swipe {} -> {} ({:?}), match: {}",
                req.swiper_id,
                req.target_id,
                action,
                response.is_match
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::error!(
                "Swipe failed {} -> {}: {}",
                req.swiper_id,
                req.target_id,
                e
            );
            engine_error_response(e)
        }
    }
}
