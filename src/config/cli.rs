use crate::domain::ports::ProposalStore;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Writes proposals into a local directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl ProposalStore for LocalStorage {
    fn save(&self, filename: &str, mime_type: &str, contents: &str) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(filename);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Writing {} ({})", full_path.display(), mime_type);
        fs::write(&full_path, contents)?;
        Ok(full_path.display().to_string())
    }
}
