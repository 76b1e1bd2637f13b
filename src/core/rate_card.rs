use crate::core::catalog::{Selection, ServiceCatalog};
use crate::core::pricing::{compute_pricing, TierTable};
use crate::core::proposal::{ProposalFormatter, DEFAULT_CONTACT_LINE};
use crate::domain::model::CalculationResult;

/// Catalog, tier table and proposal boilerplate that one quote is priced against.
#[derive(Debug, Clone)]
pub struct RateCard {
    catalog: ServiceCatalog,
    tiers: TierTable,
    formatter: ProposalFormatter,
}

impl RateCard {
    pub fn new(catalog: ServiceCatalog, tiers: TierTable, contact_line: Option<String>) -> Self {
        let formatter = contact_line
            .map(ProposalFormatter::new)
            .unwrap_or_else(|| ProposalFormatter::new(DEFAULT_CONTACT_LINE));
        Self {
            catalog,
            tiers,
            formatter,
        }
    }

    pub fn builtin() -> Self {
        Self::new(ServiceCatalog::builtin(), TierTable::builtin(), None)
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn formatter(&self) -> &ProposalFormatter {
        &self.formatter
    }

    pub fn compute(&self, enrollment_raw: &str, selection: &Selection) -> CalculationResult {
        compute_pricing(enrollment_raw, &self.catalog, selection, &self.tiers)
    }
}

impl Default for RateCard {
    fn default() -> Self {
        Self::builtin()
    }
}
