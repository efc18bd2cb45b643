use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, FeedRequest, PoolFilters};
use crate::routes::{engine_error_response, AppState};

/// Configure feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/feed", web::post().to(get_feed));
}

/// Recommendation feed endpoint
///
/// POST /api/v1/feed
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "page": 1,
///   "pageSize": 20,
///   "filters": {"sameSchool": false, "sameProgram": false, "minAge": 18, "maxAge": 100}
/// }
/// ```
async fn get_feed(state: web::Data<AppState>, req: web::Json<FeedRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for feed request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let filters = match pool_filters(&req) {
        Ok(filters) => filters,
        Err(message) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_filters".to_string(),
                message,
                status_code: 400,
            });
        }
    };

    tracing::info!(
        "Feed request: user={}, page={}, pageSize={}",
        req.user_id,
        req.page,
        req.page_size
    );

    match state
        .engine
        .build_feed(&req.user_id, req.page, req.page_size, filters)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("Feed failed for {}: {}", req.user_id, e);
            engine_error_response(e)
        }
    }
}

fn pool_filters(req: &FeedRequest) -> Result<PoolFilters, String> {
    let defaults = PoolFilters::default();
    let Some(filters) = &req.filters else {
        return Ok(defaults);
    };

    let min_age = filters.min_age.unwrap_or(defaults.min_age);
    let max_age = filters.max_age.unwrap_or(defaults.max_age);
    if min_age > max_age {
        return Err(format!("minAge {} exceeds maxAge {}", min_age, max_age));
    }

    Ok(PoolFilters {
        same_school: filters.same_school,
        same_program: filters.same_program,
        min_age,
        max_age,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedFilters;

    fn request() -> FeedRequest {
        FeedRequest {
            user_id: "alice".to_string(),
            page: 1,
            page_size: 20,
            filters: None,
        }
    }

    #[test]
    fn test_missing_filters_use_defaults() {
        let filters = pool_filters(&request()).unwrap();
        assert_eq!(filters.min_age, 18);
        assert_eq!(filters.max_age, 100);
        assert!(!filters.same_school);
    }

    #[test]
    fn test_inverted_age_range_rejected() {
        let mut req = request();
        req.filters = Some(FeedFilters {
            same_school: false,
            same_program: false,
            min_age: Some(30),
            max_age: Some(20),
        });
        assert!(pool_filters(&req).is_err());
    }
}
