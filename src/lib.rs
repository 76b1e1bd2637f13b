pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::{QuoteEngine, QuoteSession};
pub use crate::config::cli::LocalStorage;
pub use crate::config::toml_config::{load_rate_card, RateCardConfig};
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::catalog::{Selection, ServiceCatalog};
pub use crate::core::pricing::{compute_pricing, parse_enrollment, TierTable};
pub use crate::core::proposal::{
    format_proposal, proposal_filename, ProposalDocument, ProposalFormatter,
};
pub use crate::core::rate_card::RateCard;
pub use crate::utils::error::{QuoteError, Result};
