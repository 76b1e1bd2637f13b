use serde::{Deserialize, Serialize};
use std::fmt;

/// 服務分類，定義時固定，使用者不可修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    CoreServices,
    StudentAccounts,
    Specialized,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 3] = [
        ServiceCategory::CoreServices,
        ServiceCategory::StudentAccounts,
        ServiceCategory::Specialized,
    ];

    /// 分類區塊標題
    pub fn title(&self) -> &'static str {
        match self {
            ServiceCategory::CoreServices => "Core Services (Included in Base)",
            ServiceCategory::StudentAccounts => "Student Accounts (Select if applicable)",
            ServiceCategory::Specialized => "Specialized Services (Select if applicable)",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceCategory::CoreServices => "Core Services",
            ServiceCategory::StudentAccounts => "Student Accounts",
            ServiceCategory::Specialized => "Specialized",
        };
        f.write_str(name)
    }
}

/// One billable service line of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub key: String,
    pub name: String,
    pub category: ServiceCategory,
    /// 初始勾選狀態
    #[serde(default)]
    pub default_selected: bool,
    /// 已含在級距底價內，永遠不計入額外費用
    #[serde(default)]
    pub base_included: bool,
    /// 每月時數
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_multiplier: Option<f64>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl ServiceDefinition {
    /// 未設定倍率時為 1.0
    pub fn multiplier(&self) -> f64 {
        self.complexity_multiplier.unwrap_or(1.0)
    }
}

/// Enrollment bracket with a flat base monthly price. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub min: u32,
    pub max: u32,
    pub base_monthly: f64,
    pub label: String,
}

impl PricingTier {
    pub fn contains(&self, enrollment: u32) -> bool {
        enrollment >= self.min && enrollment <= self.max
    }

    pub fn is_open_ended(&self) -> bool {
        self.max == u32::MAX
    }
}

/// Derived pricing for one (enrollment, selection) snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub enrollment: u32,
    pub tier: PricingTier,
    pub total_hours: f64,
    pub additional_cost: f64,
    pub estimated_monthly: u64,
    pub estimated_annual: u64,
    pub selected_services: Vec<ServiceDefinition>,
}

/// 操作員輸入的學校資料，全部為自由文字
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub school_name: String,
    pub contact_name: String,
    pub contact_email: String,
    /// 原始輸入文字，可能為空或無效
    pub enrollment: String,
}

impl ClientInfo {
    pub fn has_school_name(&self) -> bool {
        !self.school_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_defaults_to_one() {
        let service = ServiceDefinition {
            key: "payroll".to_string(),
            name: "Payroll Processing Support".to_string(),
            category: ServiceCategory::Specialized,
            default_selected: false,
            base_included: false,
            hours: 8.0,
            complexity_multiplier: None,
            tasks: vec![],
        };
        assert_eq!(service.multiplier(), 1.0);

        let weighted = ServiceDefinition {
            complexity_multiplier: Some(1.5),
            ..service
        };
        assert_eq!(weighted.multiplier(), 1.5);
    }

    #[test]
    fn test_tier_bounds_are_inclusive() {
        let tier = PricingTier {
            min: 51,
            max: 100,
            base_monthly: 2500.0,
            label: "Medium Day School".to_string(),
        };
        assert!(tier.contains(51));
        assert!(tier.contains(100));
        assert!(!tier.contains(50));
        assert!(!tier.contains(101));
        assert!(!tier.is_open_ended());
    }

    #[test]
    fn test_blank_school_name() {
        let client = ClientInfo {
            school_name: "   ".to_string(),
            ..Default::default()
        };
        assert!(!client.has_school_name());
    }
}
