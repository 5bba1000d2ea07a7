use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::{Secret, TicketIdentity};
use crate::domain::errors::TokenError;
use crate::domain::window::TimeSlot;

type HmacSha256 = Hmac<Sha256>;

// Hex characters in a signature (32-byte digest).
pub(crate) const SIGNATURE_HEX_LEN: usize = 64;

// HMAC-SHA256 signer bound to a single secret.
//
// The keyed state is computed once and cloned per signature, so a signer is
// read-only after construction and can be shared freely across tasks.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl TokenSigner {
    pub fn new(secret: &Secret) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| TokenError::Crypto(err.to_string()))?;
        Ok(Self { mac })
    }

    // Lowercase hex HMAC over `bookingId:ticketId:slot`.
    pub fn sign(&self, identity: &TicketIdentity, slot: TimeSlot) -> String {
        hex::encode(self.keyed(identity, slot).finalize().into_bytes())
    }

    // Recompute the signature for a claimed slot and compare in constant time.
    //
    // Only the lowercase wire form is accepted; anything else is a mismatch.
    pub fn matches(&self, identity: &TicketIdentity, slot: TimeSlot, claimed_sig: &str) -> bool {
        if claimed_sig.len() != SIGNATURE_HEX_LEN
            || claimed_sig.bytes().any(|b| b.is_ascii_uppercase())
        {
            return false;
        }
        let Ok(claimed) = hex::decode(claimed_sig) else {
            return false;
        };
        self.keyed(identity, slot).verify_slice(&claimed).is_ok()
    }

    fn keyed(&self, identity: &TicketIdentity, slot: TimeSlot) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload_base(identity.booking_id(), identity.ticket_id(), slot).as_bytes());
        mac
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

// Canonical signed message. Field order and separator are a wire contract.
pub fn payload_base(booking_id: &str, ticket_id: &str, slot: TimeSlot) -> String {
    format!("{booking_id}:{ticket_id}:{slot}")
}
