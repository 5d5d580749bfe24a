mod dto;
mod error;
mod handlers;
mod router;

pub use dto::Envelope;
pub use router::{create_router, AppState};
