use crate::domain::entities::Secret;
use crate::domain::ports::Clock;
use crate::domain::signing::TokenSigner;
use crate::domain::window::WINDOW_MS;

pub(crate) const TEST_SECRET: &str = "test-secret";

// 5 seconds into slot 1000.
pub(crate) const SCENARIO_NOW: u64 = 1000 * WINDOW_MS + 5000;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0
    }
}

pub(crate) fn test_signer() -> TokenSigner {
    let secret = Secret::new(TEST_SECRET).expect("test secret should be valid");
    TokenSigner::new(&secret).expect("test signer should build")
}
