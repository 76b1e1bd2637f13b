use chrono::Local;
use clap::Parser;
use service_quote::core::proposal::format_currency;
use service_quote::domain::model::{CalculationResult, ServiceCategory};
use service_quote::utils::error::{ErrorSeverity, QuoteError};
use service_quote::utils::{logger, validation::Validate};
use service_quote::{
    load_rate_card, CliConfig, LocalStorage, QuoteEngine, QuoteSession, RateCard, RateCardConfig,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting service-quote");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let rate_card = match load_rate_card(config.rate_card.as_deref()) {
        Ok(rate_card) => Arc::new(rate_card),
        Err(e) => exit_with(&e),
    };

    if config.print_rate_card {
        let content = RateCardConfig::from_rate_card(&rate_card).to_toml_string()?;
        println!("{}", content);
        return Ok(());
    }

    if config.list {
        display_rate_card(&rate_card);
        return Ok(());
    }

    let mut session = QuoteSession::new(rate_card);
    session.set_school_name(config.school.clone().unwrap_or_default());
    session.set_contact_name(config.contact.clone().unwrap_or_default());
    session.set_contact_email(config.email.clone().unwrap_or_default());
    session.set_enrollment(config.enrollment.clone().unwrap_or_default());

    for key in &config.toggles {
        if let Err(e) = session.toggle(key) {
            exit_with(&e);
        }
    }

    let result = session.calculate();
    if config.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_summary(&result);
    }

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - proposal not written");
        return Ok(());
    }

    let today = Local::now().date_naive();

    if config.stdout {
        println!("{}", session.proposal(today).body);
        return Ok(());
    }

    if !session.can_generate_proposal() {
        tracing::info!("No school name given, skipping proposal (use --school)");
        return Ok(());
    }

    let engine = QuoteEngine::new(LocalStorage::new(config.output_path.clone()));
    match engine.generate(&session, today) {
        Ok(location) => {
            println!("✅ Proposal generated!");
            println!("📁 Output saved to: {}", location);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &QuoteError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_summary(result: &CalculationResult) {
    println!("📋 Estimate Summary:");
    println!("  Enrollment: {}", result.enrollment);
    println!("  Tier: {}", result.tier.label);
    println!("  Services: {}", result.selected_services.len());
    println!("  Total Hours/Month: {} hours", result.total_hours);
    println!(
        "  Monthly Service Fee: {}",
        format_currency(result.estimated_monthly)
    );
    println!(
        "  Annual Investment: {}",
        format_currency(result.estimated_annual)
    );
    println!();
}

fn display_rate_card(rate_card: &RateCard) {
    let catalog = rate_card.catalog();
    let selection = catalog.default_selection();

    for category in ServiceCategory::ALL {
        println!("{}", category.title());
        for service in catalog.by_category(category) {
            let mark = if selection.is_selected(&service.key) {
                "x"
            } else {
                " "
            };
            println!(
                "  [{}] {:<16} {} ({} hrs/mo)",
                mark, service.key, service.name, service.hours
            );
            if !service.tasks.is_empty() {
                println!("      {}", service.tasks.join(" • "));
            }
        }
        println!();
    }

    println!("Pricing Tiers");
    for tier in rate_card.tiers().tiers() {
        let range = if tier.is_open_ended() {
            format!("{}+", tier.min)
        } else {
            format!("{}-{}", tier.min, tier.max)
        };
        println!(
            "  {:<9} {:<36} {}",
            range,
            tier.label,
            format_currency(tier.base_monthly.round() as u64)
        );
    }
}
