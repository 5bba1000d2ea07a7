use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::domain::errors::TokenError;
use crate::interface_adapters::protocol::{
    ErrorResponse, GenerateTokensRequest, GenerateTokensResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::generate_tokens::GenerateTokensUseCase;

// Handler for issuing the current QR token batch of a ticket.
//
// A body that does not decode (non-string ids, non-JSON) is answered like a
// missing id, with the same JSON error envelope.
pub async fn generate_tokens(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTokensRequest>, JsonRejection>,
) -> Result<Json<GenerateTokensResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "undecodable token request");
        map_token_error(TokenError::Validation)
    })?;

    let use_case = GenerateTokensUseCase {
        clock: SystemClock,
        signer: state.signer.clone(),
        lookahead: state.lookahead,
    };

    let batch = use_case
        .execute(
            payload.booking_id.as_deref().unwrap_or_default(),
            payload.ticket_id.as_deref().unwrap_or_default(),
        )
        .map_err(map_token_error)?;

    Ok(Json(GenerateTokensResponse::from(batch)))
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { message }))
}

fn map_token_error(err: TokenError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        TokenError::Validation => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        TokenError::Config => {
            tracing::error!("token issuance requested without a configured secret");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        TokenError::Crypto(ref cause) => {
            tracing::error!(%cause, "token issuance failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
