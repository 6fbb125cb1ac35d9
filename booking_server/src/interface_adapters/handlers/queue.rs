use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use tracing::warn;

use crate::domain::entities::QueueStats;
use crate::domain::errors::QueueError;
use crate::interface_adapters::protocol::{
    ApiError, QueueDto, QueueEntryDto, QueueListResponse, QueueStatsResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::list_queues::ListQueuesUseCase;
use crate::use_cases::queue_entry::QueueEntryUseCase;

// Handler for the public live-queue listing. Storage failures are served as
// an empty list to keep the board rendering; the failure itself is logged.
pub async fn list_queues(State(state): State<AppState>) -> Json<QueueListResponse> {
    let use_case = ListQueuesUseCase {
        store: state.queues.clone(),
    };

    let queues = match use_case.execute().await {
        Ok(queues) => queues,
        Err(_) => {
            warn!("queue listing unavailable, serving empty set");
            Vec::new()
        }
    };

    Json(QueueListResponse {
        success: true,
        data: queues.into_iter().map(QueueDto::from).collect(),
    })
}

// Handler for aggregate queue statistics.
pub async fn queue_stats(State(state): State<AppState>) -> Json<QueueStatsResponse> {
    let use_case = ListQueuesUseCase {
        store: state.queues.clone(),
    };

    let queues = match use_case.execute().await {
        Ok(queues) => queues,
        Err(_) => {
            warn!("queue listing unavailable, serving zeroed stats");
            Vec::new()
        }
    };

    Json(QueueStatsResponse {
        success: true,
        data: QueueStats::from_queues(&queues).into(),
    })
}

// Handler for looking up the queue entry behind a booking. Requires a live
// session token.
pub async fn queue_entry(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<QueueEntryDto>, (StatusCode, Json<ApiError>)> {
    let token = bearer_token(&headers)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))?;

    let authorized = state
        .gate
        .is_valid(token)
        .await
        .map_err(|_| error_response(StatusCode::BAD_GATEWAY, "storage error"))?;
    if !authorized {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid session token",
        ));
    }

    let use_case = QueueEntryUseCase {
        store: state.queues.clone(),
    };

    let entry = use_case.execute(&booking_id).await.map_err(|err| match err {
        QueueError::EntryNotFound => {
            error_response(StatusCode::NOT_FOUND, "no queue entry for this booking")
        }
        QueueError::Unavailable => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    })?;

    Ok(Json(QueueEntryDto::from(entry)))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            success: false,
            message: message.to_string(),
            retry_after: None,
        }),
    )
}
