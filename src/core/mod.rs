pub mod catalog;
pub mod pricing;
pub mod proposal;
pub mod rate_card;

pub use crate::domain::model::{
    CalculationResult, ClientInfo, PricingTier, ServiceCategory, ServiceDefinition,
};
pub use crate::domain::ports::ProposalStore;
pub use crate::utils::error::Result;
