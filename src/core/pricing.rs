use crate::core::catalog::{Selection, ServiceCatalog};
use crate::domain::model::{CalculationResult, PricingTier, ServiceDefinition};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative};

/// 每 10 小時計 $100，即每小時 $10
const HOURS_PER_BLOCK: f64 = 10.0;
const PRICE_PER_BLOCK: f64 = 100.0;

/// 月費上限，年費 (月費 × 12) 才不會溢位
pub const MAX_MONTHLY_FEE: u64 = u64::MAX / 12;

/// Ordered, contiguous tier table covering every enrollment from 0 upward.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<PricingTier>,
}

impl TierTable {
    /// 驗證級距：從 0 開始、連續不重疊、最後一級無上限
    pub fn new(tiers: Vec<PricingTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(QuoteError::MissingConfigError {
                field: "tiers".to_string(),
            });
        }

        let mut expected_min: u32 = 0;
        for (i, tier) in tiers.iter().enumerate() {
            let field = format!("tiers[{}]", i);
            validate_non_empty_string(&format!("{}.label", field), &tier.label)?;
            validate_non_negative(&format!("{}.base_monthly", field), tier.base_monthly)?;

            if tier.min != expected_min {
                return Err(QuoteError::InvalidConfigValueError {
                    field: format!("{}.min", field),
                    value: tier.min.to_string(),
                    reason: format!("Tiers must be contiguous, expected min = {}", expected_min),
                });
            }
            if tier.max < tier.min {
                return Err(QuoteError::InvalidConfigValueError {
                    field: format!("{}.max", field),
                    value: tier.max.to_string(),
                    reason: "max must be >= min".to_string(),
                });
            }

            let is_last = i + 1 == tiers.len();
            if tier.is_open_ended() != is_last {
                return Err(QuoteError::InvalidConfigValueError {
                    field: format!("{}.max", field),
                    value: tier.max.to_string(),
                    reason: "Only the last tier may be open-ended, and it must be".to_string(),
                });
            }
            if !is_last {
                expected_min = tier.max + 1;
            }
        }

        Ok(Self { tiers })
    }

    /// 內建的學校級距
    pub fn builtin() -> Self {
        let tier = |min: u32, max: u32, base_monthly: f64, label: &str| PricingTier {
            min,
            max,
            base_monthly,
            label: label.to_string(),
        };

        Self {
            tiers: vec![
                tier(0, 50, 2200.0, "Small Day School"),
                tier(51, 100, 2500.0, "Medium Day School"),
                tier(101, 150, 2800.0, "Large Day School / Small Boarding"),
                tier(151, 250, 3200.0, "Medium Boarding Academy"),
                tier(251, u32::MAX, 3500.0, "Large Boarding Academy"),
            ],
        }
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    /// First tier containing `enrollment`, falling back to the first tier.
    pub fn find(&self, enrollment: u32) -> &PricingTier {
        self.tiers
            .iter()
            .find(|t| t.contains(enrollment))
            .unwrap_or(&self.tiers[0])
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lenient enrollment parsing: leading integer of the text, anything else is 0.
///
/// Leading whitespace and a sign are accepted, trailing garbage is ignored
/// (`"75 students"` is 75). Negative values become 0 and values beyond
/// `u32::MAX` saturate.
pub fn parse_enrollment(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() || negative {
        if !raw.trim().is_empty() {
            tracing::debug!("Enrollment '{}' treated as 0", raw);
        }
        return 0;
    }

    // 只剩溢位會失敗
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Strict variant for callers that want to surface bad input instead of
/// silently using 0.
pub fn parse_enrollment_strict(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| QuoteError::InvalidEnrollment {
            raw: raw.to_string(),
        })
}

fn service_cost(service: &ServiceDefinition) -> f64 {
    if service.base_included {
        return 0.0;
    }
    (service.hours / HOURS_PER_BLOCK) * PRICE_PER_BLOCK * service.multiplier()
}

/// Monthly cost added on top of the tier base by selected non-base services.
pub fn additional_cost(catalog: &ServiceCatalog, selection: &Selection) -> f64 {
    catalog
        .services()
        .iter()
        .filter(|s| selection.is_selected(&s.key))
        .map(service_cost)
        .sum()
}

/// Highest monthly fee the rate card can produce: the largest tier base plus
/// every non-base service selected.
pub fn worst_case_monthly(catalog: &ServiceCatalog, tiers: &TierTable) -> f64 {
    let base = tiers
        .tiers()
        .iter()
        .map(|t| t.base_monthly)
        .fold(0.0, f64::max);
    base + catalog.services().iter().map(service_cost).sum::<f64>()
}

pub fn compute_pricing(
    enrollment_raw: &str,
    catalog: &ServiceCatalog,
    selection: &Selection,
    tiers: &TierTable,
) -> CalculationResult {
    let enrollment = parse_enrollment(enrollment_raw);
    let tier = tiers.find(enrollment);
    tracing::trace!("Enrollment {} matched tier '{}'", enrollment, tier.label);

    let selected_services: Vec<ServiceDefinition> = catalog
        .services()
        .iter()
        .filter(|s| selection.is_selected(&s.key))
        .cloned()
        .collect();

    // 總時數包含底價內的核心服務
    let total_hours: f64 = selected_services.iter().map(|s| s.hours).sum();
    let additional_cost: f64 = selected_services.iter().map(service_cost).sum();

    let estimated_monthly =
        ((tier.base_monthly + additional_cost).round() as u64).min(MAX_MONTHLY_FEE);
    let estimated_annual = estimated_monthly * 12;

    CalculationResult {
        enrollment,
        tier: tier.clone(),
        total_hours,
        additional_cost,
        estimated_monthly,
        estimated_annual,
        selected_services,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ServiceCatalog, Selection, TierTable) {
        let catalog = ServiceCatalog::builtin();
        let selection = catalog.default_selection();
        (catalog, selection, TierTable::builtin())
    }

    #[test]
    fn test_parse_enrollment() {
        assert_eq!(parse_enrollment("75"), 75);
        assert_eq!(parse_enrollment("  120"), 120);
        assert_eq!(parse_enrollment("75 students"), 75);
        assert_eq!(parse_enrollment("12.7"), 12);
        assert_eq!(parse_enrollment("+30"), 30);
        assert_eq!(parse_enrollment(""), 0);
        assert_eq!(parse_enrollment("abc"), 0);
        assert_eq!(parse_enrollment("-5"), 0);
        assert_eq!(parse_enrollment("99999999999999"), u32::MAX);
    }

    #[test]
    fn test_parse_enrollment_strict() {
        assert_eq!(parse_enrollment_strict(" 75 ").unwrap(), 75);
        assert!(matches!(
            parse_enrollment_strict("75 students"),
            Err(QuoteError::InvalidEnrollment { .. })
        ));
        assert!(parse_enrollment_strict("-1").is_err());
        assert!(parse_enrollment_strict("").is_err());
    }

    #[test]
    fn test_builtin_tiers_are_valid() {
        let tiers = TierTable::builtin();
        assert!(TierTable::new(tiers.tiers().to_vec()).is_ok());
    }

    #[test]
    fn test_every_enrollment_matches_exactly_one_tier() {
        let tiers = TierTable::builtin();
        for enrollment in (0..=1200).chain([u32::MAX - 1, u32::MAX]) {
            let matches = tiers.tiers().iter().filter(|t| t.contains(enrollment)).count();
            assert_eq!(matches, 1, "enrollment {}", enrollment);
        }
    }

    #[test]
    fn test_tier_boundaries() {
        let tiers = TierTable::builtin();
        assert_eq!(tiers.find(0).label, "Small Day School");
        assert_eq!(tiers.find(50).label, "Small Day School");
        assert_eq!(tiers.find(51).label, "Medium Day School");
        assert_eq!(tiers.find(150).label, "Large Day School / Small Boarding");
        assert_eq!(tiers.find(250).label, "Medium Boarding Academy");
        assert_eq!(tiers.find(251).label, "Large Boarding Academy");
        assert_eq!(tiers.find(5000).label, "Large Boarding Academy");
    }

    #[test]
    fn test_tier_table_rejects_gap() {
        let mut tiers = TierTable::builtin().tiers().to_vec();
        tiers[1].min = 60;
        assert!(TierTable::new(tiers).is_err());
    }

    #[test]
    fn test_tier_table_rejects_overlap() {
        let mut tiers = TierTable::builtin().tiers().to_vec();
        tiers[1].min = 50;
        assert!(TierTable::new(tiers).is_err());
    }

    #[test]
    fn test_tier_table_requires_open_last_tier() {
        let mut tiers = TierTable::builtin().tiers().to_vec();
        tiers[4].max = 999;
        assert!(TierTable::new(tiers).is_err());
        assert!(TierTable::new(vec![]).is_err());
    }

    #[test]
    fn test_core_only_at_75() {
        let (catalog, selection, tiers) = setup();
        let result = compute_pricing("75", &catalog, &selection, &tiers);

        assert_eq!(result.tier.label, "Medium Day School");
        assert_eq!(result.estimated_monthly, 2500);
        assert_eq!(result.estimated_annual, 30000);
        assert!((result.total_hours - 36.4).abs() < 1e-9);
        assert_eq!(result.additional_cost, 0.0);
        assert_eq!(result.selected_services.len(), 3);
    }

    #[test]
    fn test_student_ar_at_75() {
        let (catalog, mut selection, tiers) = setup();
        selection.toggle("studentAR").unwrap();

        let result = compute_pricing("75", &catalog, &selection, &tiers);
        assert!((result.additional_cost - 620.0).abs() < 1e-9);
        assert_eq!(result.estimated_monthly, 3120);
        assert_eq!(result.estimated_annual, 3120 * 12);
        assert!((result.total_hours - 98.4).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_hours_round_to_nearest() {
        let (catalog, mut selection, tiers) = setup();
        // 6.8 + 7.4 + 2.2 = 16.4 小時 => $164
        selection.set("studentAP", true).unwrap();
        selection.set("transportation", true).unwrap();
        selection.set("hr", true).unwrap();

        let result = compute_pricing("10", &catalog, &selection, &tiers);
        assert_eq!(result.tier.label, "Small Day School");
        assert_eq!(result.estimated_monthly, 2364);
        assert_eq!(result.estimated_annual, 2364 * 12);
    }

    #[test]
    fn test_complexity_multiplier_scales_cost() {
        let mut services = ServiceCatalog::builtin().services().to_vec();
        if let Some(service) = services.iter_mut().find(|s| s.key == "studentAR") {
            service.complexity_multiplier = Some(1.5);
        }
        let catalog = ServiceCatalog::new(services);
        let mut selection = catalog.default_selection();
        selection.toggle("studentAR").unwrap();

        assert!((additional_cost(&catalog, &selection) - 930.0).abs() < 1e-9);
    }

    #[test]
    fn test_deselecting_base_service_keeps_price() {
        let (catalog, mut selection, tiers) = setup();
        selection.toggle("bankRec").unwrap();

        let result = compute_pricing("75", &catalog, &selection, &tiers);
        assert_eq!(result.estimated_monthly, 2500);
        assert!((result.total_hours - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unselected_optional_services_cost_nothing() {
        let (catalog, selection, tiers) = setup();
        assert_eq!(additional_cost(&catalog, &selection), 0.0);

        let result = compute_pricing("0", &catalog, &selection, &tiers);
        assert_eq!(result.estimated_monthly, 2200);
    }

    #[test]
    fn test_invalid_enrollment_equals_zero() {
        let (catalog, mut selection, tiers) = setup();
        selection.toggle("payroll").unwrap();

        let zero = compute_pricing("0", &catalog, &selection, &tiers);
        for raw in ["", "abc", "-40", "   "] {
            let result = compute_pricing(raw, &catalog, &selection, &tiers);
            assert_eq!(result, zero, "input {:?}", raw);
        }
    }

    #[test]
    fn test_monthly_fee_is_capped() {
        let tiers = TierTable::new(vec![PricingTier {
            min: 0,
            max: u32::MAX,
            base_monthly: 1e19,
            label: "Huge".to_string(),
        }])
        .unwrap();
        let catalog = ServiceCatalog::builtin();
        let selection = catalog.default_selection();

        let result = compute_pricing("10", &catalog, &selection, &tiers);
        assert_eq!(result.estimated_monthly, MAX_MONTHLY_FEE);
        assert_eq!(result.estimated_annual, MAX_MONTHLY_FEE * 12);
    }

    #[test]
    fn test_worst_case_monthly_builtin() {
        // 3500 + (62 + 30 + 6.8 + 16 + 7.4 + 12 + 8 + 2.2) * 10
        let worst = worst_case_monthly(&ServiceCatalog::builtin(), &TierTable::builtin());
        assert!((worst - 4944.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_pricing_is_deterministic() {
        let (catalog, mut selection, tiers) = setup();
        selection.toggle("endowment").unwrap();
        selection.toggle("squareDeposits").unwrap();

        let first = compute_pricing("180", &catalog, &selection, &tiers);
        let second = compute_pricing("180", &catalog, &selection, &tiers);
        assert_eq!(first, second);
        assert_eq!(first.estimated_annual, first.estimated_monthly * 12);
    }
}
