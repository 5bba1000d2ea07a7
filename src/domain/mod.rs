// Domain layer: token identity, time windows and signing rules.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod signing;
pub mod window;

pub use entities::{QrPayload, Secret, TicketIdentity, Token, TokenBatch};
pub use errors::{Rejection, TokenError};
pub use ports::Clock;
pub use signing::TokenSigner;
pub use window::{DEFAULT_LOOKAHEAD, TimeSlot, WINDOW_MS};
