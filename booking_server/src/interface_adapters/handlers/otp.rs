use axum::{extract::State, http::StatusCode, Json};

use crate::domain::errors::OtpError;
use crate::interface_adapters::protocol::{
    ApiError, SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse,
};
use crate::interface_adapters::state::{AppState, InMemoryOtpStore, SystemClock};
use crate::use_cases::request_code::RequestCodeUseCase;
use crate::use_cases::verify_code::VerifyCodeUseCase;

// Handler for issuing a one-time code.
#[tracing::instrument(name = "otp_send", skip_all, fields(purpose = ?payload.purpose))]
pub async fn send_code(
    State(state): State<AppState>,
    Json(payload): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, (StatusCode, Json<ApiError>)> {
    let use_case = RequestCodeUseCase {
        clock: SystemClock,
        store: InMemoryOtpStore {
            codes: state.codes.clone(),
        },
        notifier: state.notifier.clone(),
        locks: state.phone_locks.clone(),
    };

    let result = use_case
        .execute(payload)
        .await
        .map_err(|err| map_otp_error(err, OtpErrorContext::Send))?;

    Ok(Json(SendCodeResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        expires_in: result.expires_in,
    }))
}

// Handler for verifying a one-time code.
#[tracing::instrument(name = "otp_verify", skip_all, fields(purpose = ?payload.purpose))]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, (StatusCode, Json<ApiError>)> {
    let use_case = VerifyCodeUseCase {
        clock: SystemClock,
        store: InMemoryOtpStore {
            codes: state.codes.clone(),
        },
        directory: state.directory.clone(),
        locks: state.phone_locks.clone(),
    };

    let result = use_case
        .execute(payload)
        .await
        .map_err(|err| map_otp_error(err, OtpErrorContext::Verify))?;

    Ok(Json(VerifyCodeResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
        user_exists: result.user_exists,
    }))
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

// Maps domain errors to HTTP responses by endpoint context.
enum OtpErrorContext {
    Send,
    Verify,
}

fn map_otp_error(err: OtpError, context: OtpErrorContext) -> (StatusCode, Json<ApiError>) {
    match context {
        OtpErrorContext::Send => match err {
            OtpError::InvalidPhone => error_response(StatusCode::BAD_REQUEST, "invalid phone number"),
            OtpError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ApiError {
                    success: false,
                    message: "too many OTP requests, try again later".to_string(),
                    retry_after: Some(retry_after),
                }),
            ),
            OtpError::DeliveryFailed => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to deliver OTP",
            ),
            OtpError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
            OtpError::InvalidCode
            | OtpError::NotFound
            | OtpError::Expired
            | OtpError::Mismatch => error_response(StatusCode::BAD_REQUEST, "invalid request"),
        },
        OtpErrorContext::Verify => match err {
            OtpError::InvalidPhone => error_response(StatusCode::BAD_REQUEST, "invalid phone number"),
            OtpError::InvalidCode => error_response(StatusCode::BAD_REQUEST, "invalid OTP format"),
            OtpError::NotFound => {
                error_response(StatusCode::BAD_REQUEST, "no OTP pending for this number")
            }
            OtpError::Expired => error_response(StatusCode::BAD_REQUEST, "OTP expired"),
            OtpError::Mismatch => error_response(StatusCode::BAD_REQUEST, "incorrect OTP"),
            OtpError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
            OtpError::RateLimited { .. } | OtpError::DeliveryFailed => {
                error_response(StatusCode::BAD_REQUEST, "invalid request")
            }
        },
    }
}
