use serde::{Deserialize, Serialize};

use crate::domain::entities::{Token, TokenBatch};

// Request payload for token generation.
//
// Fields are optional so a missing id reaches validation instead of being
// rejected by the JSON extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokensRequest {
    pub booking_id: Option<String>,
    pub ticket_id: Option<String>,
}

// Response payload for token generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokensResponse {
    pub window_ms: u64,
    pub tokens: Vec<TokenResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub qr_value: String,
    pub expires_at: u64,
}

impl From<TokenBatch> for GenerateTokensResponse {
    fn from(batch: TokenBatch) -> Self {
        Self {
            window_ms: batch.window_ms,
            tokens: batch.tokens.into_iter().map(TokenResponse::from).collect(),
        }
    }
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            qr_value: token.qr_value,
            expires_at: token.expires_at,
        }
    }
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
