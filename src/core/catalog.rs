use crate::domain::model::{ServiceCategory, ServiceDefinition};
use crate::utils::error::{QuoteError, Result};
use std::collections::HashMap;

/// Immutable, ordered registry of service definitions.
///
/// Definition order is the order services are listed in results and
/// proposals. Which services the operator picked lives in [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCatalog {
    services: Vec<ServiceDefinition>,
}

impl ServiceCatalog {
    /// 呼叫端需先確認 key 不重複 (見 `RateCardConfig::validate`)
    pub fn new(services: Vec<ServiceDefinition>) -> Self {
        Self { services }
    }

    /// 內建的學校會計服務目錄
    pub fn builtin() -> Self {
        use ServiceCategory::*;

        let services = vec![
            // 核心服務 (含在底價內)
            core_service(
                "coreAccounting",
                "Core Accounting & Monthly Close",
                16.0,
                &[
                    "Monthly closing",
                    "Financial statements",
                    "Board reporting packages",
                    "Depreciation",
                ],
            ),
            core_service(
                "bankRec",
                "Bank Reconciliations (All Accounts)",
                16.4,
                &[
                    "Operating",
                    "Insurance",
                    "Endowment",
                    "Donation",
                    "Capital accounts",
                ],
            ),
            core_service(
                "auditPrep",
                "Audit Preparation",
                4.0,
                &[
                    "Documentation organization",
                    "Digital backup systems",
                    "Auditor support",
                ],
            ),
            // 學生帳務 (複雜度主要來源)
            ServiceDefinition {
                complexity_multiplier: Some(1.0),
                ..optional_service(
                    "studentAR",
                    "Student Accounts Receivable",
                    StudentAccounts,
                    62.0,
                    &[
                        "Tuition tracking",
                        "Invoicing in FACTS",
                        "Aging monitoring",
                        "Delinquent letters",
                        "Dorm/Cafeteria/Athletic fees",
                        "ASP deposits",
                        "Wire transfers",
                    ],
                )
            },
            optional_service(
                "studentAccounts",
                "Student Account Management",
                StudentAccounts,
                30.0,
                &[
                    "Payment tracking",
                    "Financial plans",
                    "Parent communications",
                    "Scholarship management",
                ],
            ),
            optional_service(
                "studentAP",
                "Student Payables",
                StudentAccounts,
                6.8,
                &["Student tithe", "Student payroll", "Annual 1099 preparation"],
            ),
            // 專項服務
            optional_service(
                "endowment",
                "Endowment Fund Management",
                Specialized,
                16.0,
                &[
                    "Interest tracking",
                    "Fluctuation monitoring",
                    "Contributions",
                    "Distribution calculations",
                ],
            ),
            optional_service(
                "transportation",
                "Transportation Accounting",
                Specialized,
                7.4,
                &[
                    "IFTA reporting",
                    "Transportation transfers",
                    "Fuel documentation",
                ],
            ),
            optional_service(
                "squareDeposits",
                "Square/POS Reconciliation",
                Specialized,
                12.0,
                &[
                    "Mission sale",
                    "Farm store",
                    "Business office transactions",
                ],
            ),
            optional_service(
                "payroll",
                "Payroll Processing Support",
                Specialized,
                8.0,
                &[
                    "Expensing",
                    "Bank charges",
                    "Payroll withholding tracking",
                ],
            ),
            optional_service(
                "hr",
                "HR Documentation",
                Specialized,
                2.2,
                &[
                    "Taskforce paperwork",
                    "Volunteer insurance",
                    "Per diem tracking",
                    "Education reimbursements",
                ],
            ),
        ];

        Self { services }
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn get(&self, key: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn by_category(
        &self,
        category: ServiceCategory,
    ) -> impl Iterator<Item = &ServiceDefinition> + '_ {
        self.services.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// 每個服務的初始勾選狀態
    pub fn default_selection(&self) -> Selection {
        Selection {
            states: self
                .services
                .iter()
                .map(|s| (s.key.clone(), s.default_selected))
                .collect(),
        }
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn core_service(key: &str, name: &str, hours: f64, tasks: &[&str]) -> ServiceDefinition {
    ServiceDefinition {
        key: key.to_string(),
        name: name.to_string(),
        category: ServiceCategory::CoreServices,
        default_selected: true,
        base_included: true,
        hours,
        complexity_multiplier: None,
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
    }
}

fn optional_service(
    key: &str,
    name: &str,
    category: ServiceCategory,
    hours: f64,
    tasks: &[&str],
) -> ServiceDefinition {
    ServiceDefinition {
        key: key.to_string(),
        name: name.to_string(),
        category,
        default_selected: false,
        base_included: false,
        hours,
        complexity_multiplier: None,
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
    }
}

/// Per-session selection state, keyed by service key.
///
/// Built from [`ServiceCatalog::default_selection`], so it holds exactly the
/// catalog's keys; any other key is rejected with `UnknownServiceKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    states: HashMap<String, bool>,
}

impl Selection {
    /// 切換單一服務的勾選狀態，回傳切換後的狀態
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        let state = self.state_mut(key)?;
        *state = !*state;
        Ok(*state)
    }

    pub fn set(&mut self, key: &str, selected: bool) -> Result<()> {
        *self.state_mut(key)? = selected;
        Ok(())
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.states.get(key).copied().unwrap_or(false)
    }

    /// 依目錄順序列出已勾選的 key
    pub fn selected_keys<'a>(&'a self, catalog: &'a ServiceCatalog) -> Vec<&'a str> {
        catalog
            .services()
            .iter()
            .filter(|s| self.is_selected(&s.key))
            .map(|s| s.key.as_str())
            .collect()
    }

    fn state_mut(&mut self, key: &str) -> Result<&mut bool> {
        self.states
            .get_mut(key)
            .ok_or_else(|| QuoteError::UnknownServiceKey {
                key: key.to_string(),
            })
    }
}
