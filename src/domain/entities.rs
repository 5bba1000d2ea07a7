use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{Rejection, TokenError};
use crate::domain::window::{TimeSlot, WINDOW_MS};

// What a QR token authenticates. Supplied per request, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TicketIdentity {
    booking_id: String,
    ticket_id: String,
}

impl TicketIdentity {
    pub fn new(
        booking_id: impl Into<String>,
        ticket_id: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let booking_id = booking_id.into();
        let ticket_id = ticket_id.into();

        if booking_id.is_empty() || ticket_id.is_empty() {
            return Err(TokenError::Validation);
        }

        Ok(Self {
            booking_id,
            ticket_id,
        })
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }
}

// Opaque signing key. Never rendered by Debug and never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TokenError::Config);
        }
        Ok(Self(value))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

// A rendered QR token and the instant it stops being acceptable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub qr_value: String,
    pub expires_at: u64,
}

// Ordered, slot-ascending set of tokens for one identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBatch {
    pub window_ms: u64,
    pub tokens: Vec<Token>,
}

impl TokenBatch {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            window_ms: WINDOW_MS,
            tokens,
        }
    }
}

// Wire form of `qr_value`.
//
// Field names and order are a contract with every verifier: a JSON object
// `{"bookingId","ticketId","ts","sig"}` with `ts` an integer slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub booking_id: String,
    pub ticket_id: String,
    #[serde(
        serialize_with = "serialize_slot",
        deserialize_with = "deserialize_slot"
    )]
    pub ts: TimeSlot,
    pub sig: String,
}

impl QrPayload {
    pub fn to_qr_value(&self) -> Result<String, TokenError> {
        serde_json::to_string(self).map_err(|err| TokenError::Crypto(err.to_string()))
    }

    // Unknown keys are ignored so a later version field does not break this reader.
    pub fn parse(qr_value: &str) -> Result<Self, Rejection> {
        let value: serde_json::Value =
            serde_json::from_str(qr_value).map_err(|_| Rejection::Malformed)?;
        if !value.is_object() {
            return Err(Rejection::InvalidPayload);
        }
        serde_json::from_value(value).map_err(|_| Rejection::InvalidPayload)
    }
}

fn serialize_slot<S>(slot: &TimeSlot, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(slot.value())
}

// Scanners in the field have sent `ts` as an integer, as an integral float
// (`1000.0`) and as a decimal string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlotRepr {
    Number(u64),
    Float(f64),
    Text(String),
}

// 2^64 as f64; anything at or above it does not fit a slot.
const SLOT_FLOAT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn deserialize_slot<'de, D>(deserializer: D) -> Result<TimeSlot, D::Error>
where
    D: Deserializer<'de>,
{
    match SlotRepr::deserialize(deserializer)? {
        SlotRepr::Number(value) => Ok(TimeSlot::new(value)),
        SlotRepr::Float(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value < SLOT_FLOAT_LIMIT =>
        {
            Ok(TimeSlot::new(value as u64))
        }
        SlotRepr::Float(_) => Err(de::Error::custom("ts must be a non-negative integer")),
        SlotRepr::Text(text) => text
            .parse::<u64>()
            .map(TimeSlot::new)
            .map_err(|_| de::Error::custom("ts must be a non-negative integer")),
    }
}
