use crate::domain::model::{CalculationResult, ClientInfo};
use chrono::NaiveDate;
use serde::Serialize;

pub const PROPOSAL_MIME_TYPE: &str = "text/plain";
pub const SCHOOL_NAME_PLACEHOLDER: &str = "[School Name]";
pub const FILENAME_PLACEHOLDER: &str = "School";
pub const DEFAULT_CONTACT_LINE: &str = "Questions? Contact Kevin at [your email]";

const NOTE: &str = "\
Note: This is a preliminary estimate based on our discovery conversation.
A formal proposal with exact pricing will be provided after reviewing your
specific systems, enrollment details, and operational complexity.

On-site assistant (15-20 hrs/week): School's responsibility (~$20-25K annually)";

const NEXT_STEPS: &str = "\
NEXT STEPS:
1. Review current accounting systems and workload
2. Discuss transition timeline
3. Provide formal proposal with exact pricing
4. Answer any questions about service delivery";

/// Renders the plain-text preliminary proposal.
#[derive(Debug, Clone)]
pub struct ProposalFormatter {
    contact_line: String,
}

impl ProposalFormatter {
    pub fn new(contact_line: impl Into<String>) -> Self {
        Self {
            contact_line: contact_line.into(),
        }
    }

    pub fn contact_line(&self) -> &str {
        &self.contact_line
    }

    /// 產生報價文字；沒有學校名稱時使用佔位字串，不會失敗
    pub fn format(
        &self,
        client: &ClientInfo,
        result: &CalculationResult,
        generated_on: NaiveDate,
    ) -> String {
        let mut lines = vec![
            "PRELIMINARY SERVICE PROPOSAL".to_string(),
            format!("Generated: {}", generated_on.format("%-m/%-d/%Y")),
            String::new(),
            "SCHOOL INFORMATION:".to_string(),
        ];

        let school_name = client.school_name.trim();
        lines.push(if school_name.is_empty() {
            SCHOOL_NAME_PLACEHOLDER.to_string()
        } else {
            school_name.to_string()
        });

        // 空白欄位整行省略
        if let Some(contact) = non_blank(&client.contact_name) {
            lines.push(format!("Contact: {}", contact));
        }
        if let Some(email) = non_blank(&client.contact_email) {
            lines.push(format!("Email: {}", email));
        }
        if let Some(enrollment) = non_blank(&client.enrollment) {
            lines.push(format!("Enrollment: {} students", enrollment));
        }

        lines.push(String::new());
        lines.push("SERVICES SELECTED:".to_string());
        let services: Vec<String> = result
            .selected_services
            .iter()
            .map(|s| {
                format!(
                    "✓ {} ({} hrs/month)\n  {}",
                    s.name,
                    s.hours,
                    s.tasks.join(", ")
                )
            })
            .collect();
        if !services.is_empty() {
            lines.push(services.join("\n\n"));
        }

        lines.push(String::new());
        lines.push("ESTIMATED PRICING:".to_string());
        lines.push(format!("Base Tier: {}", result.tier.label));
        lines.push(format!(
            "Monthly Service Fee: {}",
            format_currency(result.estimated_monthly)
        ));
        lines.push(format!(
            "Annual Investment: {}",
            format_currency(result.estimated_annual)
        ));

        lines.push(String::new());
        lines.push(NOTE.to_string());
        lines.push(String::new());
        lines.push(NEXT_STEPS.to_string());
        lines.push(String::new());
        lines.push(self.contact_line.clone());

        lines.join("\n")
    }
}

impl Default for ProposalFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CONTACT_LINE)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Proposal text using the built-in boilerplate.
pub fn format_proposal(
    client: &ClientInfo,
    result: &CalculationResult,
    generated_on: NaiveDate,
) -> String {
    ProposalFormatter::default().format(client, result, generated_on)
}

/// `3120` -> `$3,120`
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}

/// `<School_Name>_Preliminary_Proposal.txt`, `School` when the name is blank.
pub fn proposal_filename(school_name: &str) -> String {
    let words: Vec<&str> = school_name.split_whitespace().collect();
    let stem = if words.is_empty() {
        FILENAME_PLACEHOLDER.to_string()
    } else {
        // 路徑分隔字元一律換成底線
        words.join("_").replace(['/', '\\'], "_")
    };
    format!("{}_Preliminary_Proposal.txt", stem)
}

/// A rendered proposal ready to hand to a [`ProposalStore`](crate::domain::ports::ProposalStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalDocument {
    pub filename: String,
    pub mime_type: String,
    pub body: String,
}

impl ProposalDocument {
    pub fn render(
        formatter: &ProposalFormatter,
        client: &ClientInfo,
        result: &CalculationResult,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            filename: proposal_filename(&client.school_name),
            mime_type: PROPOSAL_MIME_TYPE.to_string(),
            body: formatter.format(client, result, generated_on),
        }
    }
}
