pub mod engine;
pub mod session;

pub use engine::QuoteEngine;
pub use session::QuoteSession;
