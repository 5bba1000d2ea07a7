// Use cases layer: token issuance and offline verification workflows.

pub mod generate_tokens;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;

pub use generate_tokens::{derive_batch, generate_tokens, GenerateTokensUseCase};
pub use verify_token::{
    verify_qr_value, SkewPolicy, VerifiedTicket, VerifyOutcome, VerifyTokenUseCase,
};
