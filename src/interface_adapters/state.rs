use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::ports::Clock;
use crate::domain::signing::TokenSigner;

// Application state shared by the HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    // Absent when no secret was provisioned; issuance then reports a config error.
    pub signer: Option<Arc<TokenSigner>>,
    pub lookahead: NonZeroU32,
}

// System clock adapter used by the use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}
