// Failures surfaced to callers that request a token batch.
//
// Display strings are part of the host-application contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    // Missing or empty booking/ticket identifiers.
    #[error("bookingId and ticketId are required")]
    Validation,
    // Secret missing or empty; a deployment defect, never retried.
    #[error("QR_SECRET not configured in build")]
    Config,
    // The HMAC primitive rejected the key or encoding failed.
    #[error("Failed to generate QR tokens: {0}")]
    Crypto(String),
}

// Why a scanned QR value was not accepted.
//
// Operator diagnostics only: verifiers collapse every variant into a single
// rejection before answering the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    InvalidPayload,
    SignatureMismatch,
    Expired,
    NotYetValid,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Malformed => "malformed qr code",
            Rejection::InvalidPayload => "invalid qr payload",
            Rejection::SignatureMismatch => "signature mismatch",
            Rejection::Expired => "token expired",
            Rejection::NotYetValid => "token not yet valid",
        }
    }
}
