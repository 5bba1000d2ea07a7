use std::num::NonZeroU32;
use std::sync::Arc;

use crate::domain::entities::{QrPayload, Secret, TicketIdentity, Token, TokenBatch};
use crate::domain::errors::TokenError;
use crate::domain::ports::Clock;
use crate::domain::signing::TokenSigner;
use crate::domain::window::TimeSlot;

/// Derive the current token and `lookahead - 1` successors for an identity.
///
/// Validation runs in contract order: identity fields first, then the secret.
/// The function is pure; the caller supplies `now_epoch_millis`.
pub fn generate_tokens(
    booking_id: &str,
    ticket_id: &str,
    secret: Option<&str>,
    now_epoch_millis: u64,
    lookahead: NonZeroU32,
) -> Result<TokenBatch, TokenError> {
    let identity = TicketIdentity::new(booking_id, ticket_id)?;
    let secret = Secret::new(secret.unwrap_or_default())?;
    let signer = TokenSigner::new(&secret)?;

    derive_batch(&identity, &signer, now_epoch_millis, lookahead)
}

/// Same derivation as [`generate_tokens`] for callers holding validated inputs
/// and a prepared signer.
pub fn derive_batch(
    identity: &TicketIdentity,
    signer: &TokenSigner,
    now_epoch_millis: u64,
    lookahead: NonZeroU32,
) -> Result<TokenBatch, TokenError> {
    let base_slot = TimeSlot::containing(now_epoch_millis);

    let tokens = (0..lookahead.get())
        .map(|i| sign_slot(identity, signer, base_slot.offset(u64::from(i))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TokenBatch::new(tokens))
}

fn sign_slot(
    identity: &TicketIdentity,
    signer: &TokenSigner,
    slot: TimeSlot,
) -> Result<Token, TokenError> {
    let payload = QrPayload {
        booking_id: identity.booking_id().to_string(),
        ticket_id: identity.ticket_id().to_string(),
        ts: slot,
        sig: signer.sign(identity, slot),
    };

    Ok(Token {
        qr_value: payload.to_qr_value()?,
        expires_at: slot.expires_at(),
    })
}

// Token issuance use case with injected dependencies.
pub struct GenerateTokensUseCase<C> {
    pub clock: C,
    // None when no secret was provisioned for this deployment.
    pub signer: Option<Arc<TokenSigner>>,
    pub lookahead: NonZeroU32,
}

impl<C> GenerateTokensUseCase<C>
where
    C: Clock,
{
    pub fn execute(&self, booking_id: &str, ticket_id: &str) -> Result<TokenBatch, TokenError> {
        let identity = TicketIdentity::new(booking_id, ticket_id)?;
        let signer = self.signer.as_deref().ok_or(TokenError::Config)?;
        let now = self.clock.now_epoch_millis();

        let batch = derive_batch(&identity, signer, now, self.lookahead)?;

        tracing::debug!(
            booking_id,
            ticket_id,
            slot = %TimeSlot::containing(now),
            tokens = batch.tokens.len(),
            "issued qr tokens"
        );

        Ok(batch)
    }
}
