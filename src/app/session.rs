use crate::core::catalog::Selection;
use crate::core::proposal::ProposalDocument;
use crate::core::rate_card::RateCard;
use crate::domain::model::{CalculationResult, ClientInfo};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::sync::Arc;

/// One discovery call: the operator's inputs plus the selection snapshot.
///
/// The rate card is shared read-only; the session is the only owner of
/// mutable state, and every calculation is recomputed from scratch.
#[derive(Debug, Clone)]
pub struct QuoteSession {
    rate_card: Arc<RateCard>,
    client: ClientInfo,
    selection: Selection,
}

impl QuoteSession {
    pub fn new(rate_card: Arc<RateCard>) -> Self {
        let selection = rate_card.catalog().default_selection();
        Self {
            rate_card,
            client: ClientInfo::default(),
            selection,
        }
    }

    pub fn rate_card(&self) -> &RateCard {
        &self.rate_card
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_school_name(&mut self, value: impl Into<String>) {
        self.client.school_name = value.into();
    }

    pub fn set_contact_name(&mut self, value: impl Into<String>) {
        self.client.contact_name = value.into();
    }

    pub fn set_contact_email(&mut self, value: impl Into<String>) {
        self.client.contact_email = value.into();
    }

    pub fn set_enrollment(&mut self, value: impl Into<String>) {
        self.client.enrollment = value.into();
    }

    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        let selected = self.selection.toggle(key)?;
        tracing::debug!(
            "Service '{}' is now {}",
            key,
            if selected { "selected" } else { "deselected" }
        );
        Ok(selected)
    }

    pub fn select(&mut self, key: &str) -> Result<()> {
        self.selection.set(key, true)
    }

    pub fn deselect(&mut self, key: &str) -> Result<()> {
        self.selection.set(key, false)
    }

    pub fn calculate(&self) -> CalculationResult {
        self.rate_card.compute(&self.client.enrollment, &self.selection)
    }

    /// 沒有學校名稱時不開放產生報價 (對應 UI 上停用的按鈕)
    pub fn can_generate_proposal(&self) -> bool {
        self.client.has_school_name()
    }

    pub fn proposal(&self, generated_on: NaiveDate) -> ProposalDocument {
        ProposalDocument::render(
            self.rate_card.formatter(),
            &self.client,
            &self.calculate(),
            generated_on,
        )
    }
}
