use crate::utils::error::Result;

/// File-save capability: persists a generated proposal and returns where it went.
pub trait ProposalStore {
    fn save(&self, filename: &str, mime_type: &str, contents: &str) -> Result<String>;
}
