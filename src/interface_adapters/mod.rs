// Interface adapters: HTTP protocol, handlers and runtime state.

pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
