use crate::app::session::QuoteSession;
use crate::domain::ports::ProposalStore;
use crate::utils::error::{QuoteError, Result};
use chrono::NaiveDate;

/// Renders a session's proposal and hands it to the file-save collaborator.
pub struct QuoteEngine<S: ProposalStore> {
    store: S,
}

impl<S: ProposalStore> QuoteEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generate(&self, session: &QuoteSession, generated_on: NaiveDate) -> Result<String> {
        if !session.can_generate_proposal() {
            return Err(QuoteError::MissingSchoolName);
        }

        let result = session.calculate();
        tracing::info!(
            "Pricing: tier '{}', {} hrs/month, ${} monthly",
            result.tier.label,
            result.total_hours,
            result.estimated_monthly
        );

        let document = session.proposal(generated_on);
        tracing::debug!("Rendered {} ({} bytes)", document.filename, document.body.len());

        let location = self
            .store
            .save(&document.filename, &document.mime_type, &document.body)?;
        tracing::info!("📁 Proposal saved to: {}", location);

        Ok(location)
    }
}
