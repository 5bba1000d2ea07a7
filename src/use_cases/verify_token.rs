use std::sync::Arc;

use crate::domain::entities::{QrPayload, TicketIdentity};
use crate::domain::errors::Rejection;
use crate::domain::ports::Clock;
use crate::domain::signing::TokenSigner;
use crate::domain::window::TimeSlot;

/// Slots a verifier accepts relative to its own current slot:
/// `[now - past_slots, now + future_slots]`.
///
/// With `past_slots = 0` the lower bound is exactly the token expiry
/// (`now < (ts + 1) * WINDOW_MS`); each past slot extends it by one window to
/// absorb clock skew and scan latency. `future_slots` admits tokens from a
/// generator whose clock runs ahead, including its lookahead token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkewPolicy {
    pub past_slots: u64,
    pub future_slots: u64,
}

impl SkewPolicy {
    pub const fn current_only() -> Self {
        Self {
            past_slots: 0,
            future_slots: 0,
        }
    }

    pub fn check(&self, claimed: TimeSlot, now: TimeSlot) -> Result<(), Rejection> {
        if claimed.value().saturating_add(self.past_slots) < now.value() {
            return Err(Rejection::Expired);
        }
        if claimed.value() > now.value().saturating_add(self.future_slots) {
            return Err(Rejection::NotYetValid);
        }
        Ok(())
    }
}

impl Default for SkewPolicy {
    // Current slot plus one either side.
    fn default() -> Self {
        Self {
            past_slots: 1,
            future_slots: 1,
        }
    }
}

// Identity recovered from an accepted QR value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedTicket {
    pub identity: TicketIdentity,
    pub slot: TimeSlot,
}

// The only answer a presenter ever sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Accepted(VerifiedTicket),
    Rejected,
}

/// Check a scanned QR value against the signer and the verifier's clock.
///
/// The signature comparison and the slot-range check both run before either
/// result is inspected, so every well-formed token costs the same work.
pub fn verify_qr_value(
    qr_value: &str,
    signer: &TokenSigner,
    now_epoch_millis: u64,
    policy: SkewPolicy,
) -> Result<VerifiedTicket, Rejection> {
    let payload = QrPayload::parse(qr_value)?;
    let identity = TicketIdentity::new(payload.booking_id, payload.ticket_id)
        .map_err(|_| Rejection::InvalidPayload)?;

    let signature_ok = signer.matches(&identity, payload.ts, &payload.sig);
    let in_window = policy.check(payload.ts, TimeSlot::containing(now_epoch_millis));

    if !signature_ok {
        return Err(Rejection::SignatureMismatch);
    }
    in_window?;

    Ok(VerifiedTicket {
        identity,
        slot: payload.ts,
    })
}

// Offline verification use case with injected dependencies.
pub struct VerifyTokenUseCase<C> {
    pub clock: C,
    pub signer: Arc<TokenSigner>,
    pub policy: SkewPolicy,
}

impl<C> VerifyTokenUseCase<C>
where
    C: Clock,
{
    pub fn execute(&self, qr_value: &str) -> VerifyOutcome {
        let now = self.clock.now_epoch_millis();
        match verify_qr_value(qr_value, &self.signer, now, self.policy) {
            Ok(ticket) => VerifyOutcome::Accepted(ticket),
            Err(reason) => {
                tracing::debug!(reason = reason.as_str(), "qr token rejected");
                VerifyOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Secret;
    use crate::domain::window::{DEFAULT_LOOKAHEAD, WINDOW_MS};
    use crate::use_cases::generate_tokens::derive_batch;
    use crate::use_cases::test_support::{test_signer, FixedClock, SCENARIO_NOW};

    fn scenario_tokens() -> Vec<String> {
        let identity = TicketIdentity::new("B1", "T1").expect("expected identity");
        derive_batch(&identity, &test_signer(), SCENARIO_NOW, DEFAULT_LOOKAHEAD)
            .expect("expected generation to succeed")
            .tokens
            .into_iter()
            .map(|token| token.qr_value)
            .collect()
    }

    fn use_case_at(now: u64, policy: SkewPolicy) -> VerifyTokenUseCase<FixedClock> {
        VerifyTokenUseCase {
            clock: FixedClock(now),
            signer: Arc::new(test_signer()),
            policy,
        }
    }

    #[test]
    fn when_token_is_verified_in_its_own_window_then_identity_is_returned() {
        let tokens = scenario_tokens();

        let ticket = verify_qr_value(
            &tokens[0],
            &test_signer(),
            SCENARIO_NOW,
            SkewPolicy::current_only(),
        )
        .expect("expected token to be accepted");

        assert_eq!(ticket.identity.booking_id(), "B1");
        assert_eq!(ticket.identity.ticket_id(), "T1");
        assert_eq!(ticket.slot, TimeSlot::new(1000));
    }

    #[test]
    fn when_verifier_only_accepts_current_slot_then_token_expires_with_its_window() {
        let tokens = scenario_tokens();

        let at_start = use_case_at(SCENARIO_NOW, SkewPolicy::current_only());
        let late_same_window = use_case_at(SCENARIO_NOW + 9_999, SkewPolicy::current_only());
        let next_window = use_case_at(SCENARIO_NOW + WINDOW_MS + 1, SkewPolicy::current_only());

        assert!(matches!(at_start.execute(&tokens[0]), VerifyOutcome::Accepted(_)));
        assert!(matches!(
            late_same_window.execute(&tokens[0]),
            VerifyOutcome::Accepted(_)
        ));
        assert_eq!(next_window.execute(&tokens[0]), VerifyOutcome::Rejected);
    }

    #[test]
    fn when_policy_allows_previous_slot_then_token_survives_one_extra_window() {
        let tokens = scenario_tokens();
        let policy = SkewPolicy::default();

        assert!(
            verify_qr_value(&tokens[0], &test_signer(), SCENARIO_NOW + WINDOW_MS, policy).is_ok()
        );
        assert_eq!(
            verify_qr_value(&tokens[0], &test_signer(), SCENARIO_NOW + 2 * WINDOW_MS, policy),
            Err(Rejection::Expired)
        );
    }

    #[test]
    fn when_lookahead_token_is_scanned_early_then_future_skew_decides() {
        let tokens = scenario_tokens();

        assert_eq!(
            verify_qr_value(&tokens[1], &test_signer(), SCENARIO_NOW, SkewPolicy::current_only()),
            Err(Rejection::NotYetValid)
        );
        assert!(
            verify_qr_value(&tokens[1], &test_signer(), SCENARIO_NOW, SkewPolicy::default())
                .is_ok()
        );
    }

    #[test]
    fn when_token_is_from_far_future_then_returns_not_yet_valid() {
        let tokens = scenario_tokens();

        let result = verify_qr_value(
            &tokens[0],
            &test_signer(),
            SCENARIO_NOW - 2 * WINDOW_MS,
            SkewPolicy::default(),
        );

        assert_eq!(result, Err(Rejection::NotYetValid));
    }

    #[test]
    fn when_signature_is_forged_then_returns_signature_mismatch() {
        let forged = format!(
            r#"{{"bookingId":"B1","ticketId":"T1","ts":1000,"sig":"{}"}}"#,
            "0".repeat(64)
        );

        let result = verify_qr_value(&forged, &test_signer(), SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(result, Err(Rejection::SignatureMismatch));
    }

    #[test]
    fn when_slot_is_tampered_then_returns_signature_mismatch() {
        let tokens = scenario_tokens();
        let tampered = tokens[0].replace("\"ts\":1000", "\"ts\":1001");

        let result =
            verify_qr_value(&tampered, &test_signer(), SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(result, Err(Rejection::SignatureMismatch));
    }

    #[test]
    fn when_identity_is_swapped_then_returns_signature_mismatch() {
        let tokens = scenario_tokens();
        let tampered = tokens[0].replace("\"ticketId\":\"T1\"", "\"ticketId\":\"T2\"");

        let result =
            verify_qr_value(&tampered, &test_signer(), SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(result, Err(Rejection::SignatureMismatch));
    }

    #[test]
    fn when_verifier_holds_a_different_secret_then_returns_signature_mismatch() {
        let tokens = scenario_tokens();
        let other = TokenSigner::new(&Secret::new("other-secret").expect("expected secret"))
            .expect("expected signer");

        let result = verify_qr_value(&tokens[0], &other, SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(result, Err(Rejection::SignatureMismatch));
    }

    #[test]
    fn when_forged_token_is_also_expired_then_signature_mismatch_is_reported() {
        let forged = format!(
            r#"{{"bookingId":"B1","ticketId":"T1","ts":1,"sig":"{}"}}"#,
            "f".repeat(64)
        );

        let result = verify_qr_value(&forged, &test_signer(), SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(result, Err(Rejection::SignatureMismatch));
    }

    #[test]
    fn when_payload_has_empty_identity_then_returns_invalid_payload() {
        let result = verify_qr_value(
            r#"{"bookingId":"","ticketId":"T1","ts":1000,"sig":"x"}"#,
            &test_signer(),
            SCENARIO_NOW,
            SkewPolicy::default(),
        );

        assert_eq!(result, Err(Rejection::InvalidPayload));
    }

    #[test]
    fn when_qr_value_is_garbage_then_use_case_returns_rejected() {
        let use_case = use_case_at(SCENARIO_NOW, SkewPolicy::default());

        assert_eq!(use_case.execute("%%%not-a-token%%%"), VerifyOutcome::Rejected);
        assert_eq!(use_case.execute(""), VerifyOutcome::Rejected);
    }

    #[test]
    fn when_ts_is_sent_as_string_then_token_is_still_accepted() {
        let tokens = scenario_tokens();
        let stringly = tokens[0].replace("\"ts\":1000", "\"ts\":\"1000\"");

        let result =
            verify_qr_value(&stringly, &test_signer(), SCENARIO_NOW, SkewPolicy::default());

        assert!(result.is_ok());
    }
}
