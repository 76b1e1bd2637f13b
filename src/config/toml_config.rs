use crate::core::catalog::ServiceCatalog;
use crate::core::pricing::{worst_case_monthly, TierTable, MAX_MONTHLY_FEE};
use crate::core::rate_card::RateCard;
use crate::domain::model::{PricingTier, ServiceDefinition};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_required_field,
    validate_unique_keys, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML rate card. Omitted sections fall back to the built-in catalog/tiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateCardConfig {
    pub proposal: Option<ProposalConfig>,
    pub tiers: Option<Vec<TierConfig>>,
    pub services: Option<Vec<ServiceDefinition>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalConfig {
    pub contact_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub min: u32,
    /// 最後一級可省略，代表無上限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    pub base_monthly: f64,
    pub label: String,
}

impl RateCardConfig {
    /// 從 TOML 檔案載入價目表
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuoteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析價目表
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuoteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONTACT_EMAIL})，找不到時保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuoteError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 匯出現有價目表，作為自訂檔案的起點
    pub fn from_rate_card(rate_card: &RateCard) -> Self {
        let tiers = rate_card
            .tiers()
            .tiers()
            .iter()
            .map(|t| TierConfig {
                min: t.min,
                max: (!t.is_open_ended()).then_some(t.max),
                base_monthly: t.base_monthly,
                label: t.label.clone(),
            })
            .collect();

        Self {
            proposal: Some(ProposalConfig {
                contact_line: Some(rate_card.formatter().contact_line().to_string()),
            }),
            tiers: Some(tiers),
            services: Some(rate_card.catalog().services().to_vec()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| QuoteError::ConfigValidationError {
            field: "toml_serialization".to_string(),
            message: e.to_string(),
        })
    }

    fn pricing_tiers(&self) -> Result<Option<Vec<PricingTier>>> {
        let Some(tiers) = &self.tiers else {
            return Ok(None);
        };

        let mut converted = Vec::with_capacity(tiers.len());
        for (i, tier) in tiers.iter().enumerate() {
            let max = if i + 1 == tiers.len() {
                tier.max.unwrap_or(u32::MAX)
            } else {
                *validate_required_field(&format!("tiers[{}].max", i), &tier.max)?
            };
            converted.push(PricingTier {
                min: tier.min,
                max,
                base_monthly: tier.base_monthly,
                label: tier.label.clone(),
            });
        }
        Ok(Some(converted))
    }

    fn validate_services(services: &[ServiceDefinition]) -> Result<()> {
        if services.is_empty() {
            return Err(QuoteError::InvalidConfigValueError {
                field: "services".to_string(),
                value: "[]".to_string(),
                reason: "At least one service is required".to_string(),
            });
        }

        validate_unique_keys("services.key", services.iter().map(|s| s.key.as_str()))?;

        for (i, service) in services.iter().enumerate() {
            let field = format!("services[{}]", i);
            validate_non_empty_string(&format!("{}.key", field), &service.key)?;
            validate_non_empty_string(&format!("{}.name", field), &service.name)?;
            validate_non_negative(&format!("{}.hours", field), service.hours)?;
            if let Some(multiplier) = service.complexity_multiplier {
                validate_non_negative(&format!("{}.complexity_multiplier", field), multiplier)?;
            }
        }
        Ok(())
    }

    /// 驗證後轉成 `RateCard`
    pub fn into_rate_card(self) -> Result<RateCard> {
        self.validate()?;

        let tiers = match self.pricing_tiers()? {
            Some(tiers) => TierTable::new(tiers)?,
            None => TierTable::builtin(),
        };
        let catalog = match self.services {
            Some(services) => ServiceCatalog::new(services),
            None => ServiceCatalog::builtin(),
        };
        let contact_line = self.proposal.and_then(|p| p.contact_line);

        Ok(RateCard::new(catalog, tiers, contact_line))
    }
}

impl Validate for RateCardConfig {
    fn validate(&self) -> Result<()> {
        if let Some(services) = &self.services {
            Self::validate_services(services)?;
        }
        let tiers = match self.pricing_tiers()? {
            Some(tiers) => TierTable::new(tiers)?,
            None => TierTable::builtin(),
        };
        let catalog = match &self.services {
            Some(services) => ServiceCatalog::new(services.clone()),
            None => ServiceCatalog::builtin(),
        };

        // 全選時的月費也必須算得出年費
        let worst = worst_case_monthly(&catalog, &tiers);
        if !(worst <= MAX_MONTHLY_FEE as f64) {
            return Err(QuoteError::InvalidConfigValueError {
                field: "rate_card".to_string(),
                value: worst.to_string(),
                reason: format!("Worst-case monthly fee must not exceed {}", MAX_MONTHLY_FEE),
            });
        }

        if let Some(line) = self.proposal.as_ref().and_then(|p| p.contact_line.as_deref()) {
            validate_non_empty_string("proposal.contact_line", line)?;
        }
        Ok(())
    }
}

/// 有指定檔案就載入，否則使用內建價目表
pub fn load_rate_card(path: Option<&str>) -> Result<RateCard> {
    match path {
        Some(path) => {
            tracing::info!("📁 Loading rate card from: {}", path);
            RateCardConfig::from_file(path)?.into_rate_card()
        }
        None => {
            tracing::debug!("Using built-in rate card");
            Ok(RateCard::builtin())
        }
    }
}
