pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "service-quote")]
#[command(about = "Preliminary pricing estimator for school accounting services")]
pub struct CliConfig {
    /// School name (required to generate a proposal)
    #[arg(long)]
    pub school: Option<String>,

    /// Contact name
    #[arg(long)]
    pub contact: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Student enrollment; non-numeric input counts as 0
    #[arg(long)]
    pub enrollment: Option<String>,

    /// Toggle a service by key (repeatable, or comma separated)
    #[arg(long = "toggle", value_name = "KEY", value_delimiter = ',')]
    pub toggles: Vec<String>,

    /// TOML rate card replacing the built-in catalog and tiers
    #[arg(long, value_name = "PATH")]
    pub rate_card: Option<String>,

    #[arg(long, default_value = "./proposals")]
    pub output_path: String,

    /// List the service catalog and tiers, then exit
    #[arg(long)]
    pub list: bool,

    /// Print the active rate card as TOML, then exit
    #[arg(long)]
    pub print_rate_card: bool,

    /// Print the calculation result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the proposal to stdout instead of saving it
    #[arg(long)]
    pub stdout: bool,

    /// Show the estimate without writing the proposal
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        if let Some(path) = &self.rate_card {
            validate_path("rate_card", path)?;
        }
        Ok(())
    }
}
