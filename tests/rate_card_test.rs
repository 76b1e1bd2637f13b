use anyhow::Result;
use service_quote::{load_rate_card, QuoteSession, RateCardConfig};
use std::sync::Arc;
use tempfile::TempDir;

/// 自訂價目表檔案取代內建目錄與級距
#[test]
fn test_custom_rate_card_drives_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("rate-card.toml");

    std::fs::write(
        &config_path,
        r#"
[proposal]
contact_line = "Questions? Contact the business office"

[[tiers]]
min = 0
max = 200
base_monthly = 2000
label = "Day School"

[[tiers]]
min = 201
base_monthly = 4000
label = "Boarding Academy"

[[services]]
key = "core"
name = "Core Accounting"
category = "core_services"
default_selected = true
base_included = true
hours = 30
tasks = ["Monthly closing", "Board reports"]

[[services]]
key = "endowment"
name = "Endowment Fund Management"
category = "specialized"
hours = 16
complexity_multiplier = 2.0
tasks = ["Interest tracking"]
"#,
    )?;

    let rate_card = load_rate_card(config_path.to_str())?;
    let mut session = QuoteSession::new(Arc::new(rate_card));
    session.set_school_name("Hillcrest");
    session.set_enrollment("350");
    session.toggle("endowment")?;

    let result = session.calculate();
    assert_eq!(result.tier.label, "Boarding Academy");
    // 4000 + (16 / 10) * 100 * 2.0
    assert_eq!(result.estimated_monthly, 4320);
    assert!((result.total_hours - 46.0).abs() < 1e-9);

    let doc = session.proposal(chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    assert!(doc.body.ends_with("Questions? Contact the business office"));
    assert!(doc.body.contains("Monthly Service Fee: $4,320"));
    Ok(())
}

#[test]
fn test_invalid_rate_card_file_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("bad.toml");

    std::fs::write(
        &config_path,
        r#"
[[tiers]]
min = 10
base_monthly = 2000
label = "Starts too high"
"#,
    )?;

    assert!(load_rate_card(config_path.to_str()).is_err());
    Ok(())
}

#[test]
fn test_exported_builtin_rate_card_is_loadable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("builtin.toml");

    let builtin = load_rate_card(None)?;
    std::fs::write(
        &config_path,
        RateCardConfig::from_rate_card(&builtin).to_toml_string()?,
    )?;

    let reloaded = load_rate_card(config_path.to_str())?;
    assert_eq!(reloaded.catalog(), builtin.catalog());
    assert_eq!(reloaded.tiers(), builtin.tiers());

    let mut session = QuoteSession::new(Arc::new(reloaded));
    session.set_enrollment("75");
    assert_eq!(session.calculate().estimated_monthly, 2500);
    Ok(())
}
