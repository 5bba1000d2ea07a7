pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{
    Clock, QrPayload, Rejection, Secret, TicketIdentity, TimeSlot, Token, TokenBatch, TokenError,
    TokenSigner, DEFAULT_LOOKAHEAD, WINDOW_MS,
};
pub use frameworks::config::Settings;
pub use frameworks::server::{run, run_with_config};
pub use use_cases::{
    derive_batch, generate_tokens, verify_qr_value, GenerateTokensUseCase, SkewPolicy,
    VerifiedTicket, VerifyOutcome, VerifyTokenUseCase,
};
