use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 預設過濾條件，`RUST_LOG` 優先
fn default_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "service_quote=debug,info"
    } else {
        "service_quote=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// 日誌一律寫到 stderr，stdout 留給報價輸出 (--json / --stdout)
fn init_logger(verbose: bool, json: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(default_filter(verbose));
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(verbose, false);
}

/// JSON lines, for a UI that collects the estimator's logs
pub fn init_json_logger(verbose: bool) {
    init_logger(verbose, true);
}
