use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use phishguard_core::config::expand_tilde;
use phishguard_core::normalize::{has_scheme_prefix, normalize_url};
use phishguard_core::scan::find_target_url;
use phishguard_core::service::{STANDARD_THRESHOLD, ScoreResponse, featurize};
use phishguard_core::{FeatureSchema, ScoringService, ServiceConfig};
use phishguard_model::{FeatureValue, FeatureVector};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::routes::{AppState, create_router};

/// URLs scored by `check` when none are given.
pub const DEFAULT_CHECK_URLS: [&str; 5] = [
    "https://www.google.com",
    "https://secure-paypa1.com.verify-account.co/reset?session=abc123",
    "http://192.168.1.1/login.php",
    "http://example.com/%2F%2E%2E/redirect",
    "https://www.uni-mainz.de",
];

// Configuration

/// Values given on the command line, applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub bind: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn from_matches(args: &ArgMatches) -> Self {
        // Not every subcommand defines every flag.
        fn optional<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Option<T> {
            args.try_get_one::<T>(id).ok().flatten().cloned()
        }

        Self {
            config: optional(args, "config"),
            schema: optional(args, "schema"),
            model: optional(args, "model"),
            threshold: optional(args, "threshold"),
            bind: optional(args, "bind"),
            static_dir: optional(args, "static-dir"),
        }
    }
}

/// Build the effective configuration: defaults, then the TOML file, then flags.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ServiceConfig> {
    let mut config = match &overrides.config {
        Some(path) => {
            let expanded = expand_tilde(path);
            ServiceConfig::load(&expanded)
                .with_context(|| format!("Failed to load config file {}", expanded.display()))?
        }
        None => ServiceConfig::default(),
    };

    if let Some(schema) = &overrides.schema {
        config.schema_path = schema.clone();
    }
    if let Some(model) = &overrides.model {
        config.model_path = model.clone();
    }
    if let Some(threshold) = overrides.threshold {
        config.high_recall_threshold = threshold;
    }
    if let Some(bind) = &overrides.bind {
        config.bind = bind.clone();
    }
    if let Some(static_dir) = &overrides.static_dir {
        config.static_dir = static_dir.clone();
    }

    let config = config.expand_paths();
    config.validate()?;
    Ok(config)
}

// URL lists

/// Load and parse URLs from a newline-delimited file. Blank lines and lines
/// starting with `#` are skipped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        anyhow::bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Accept a line that is a URL or a bare domain, adding `http://` if needed.
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if has_scheme_prefix(line) && !line.contains(char::is_whitespace) {
        return Some(line.to_string());
    }

    match find_target_url(line) {
        Some(url) if url == line => Some(normalize_url(url)),
        _ => {
            warn!("Skipping invalid URL '{}'", line);
            None
        }
    }
}

// Handlers

pub fn load_service(config: &ServiceConfig) -> Option<Arc<ScoringService>> {
    match ScoringService::from_config(config) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            error!("Failed to load model or schema: {}", e);
            None
        }
    }
}

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    let config = resolve_config(&ConfigOverrides::from_matches(args))?;
    let addr = config.socket_addr()?;

    let state = AppState::new(load_service(&config));
    if !state.model_loaded() {
        warn!("Serving without a model; /api/score will answer 500");
    }
    let router = create_router(state, &config.static_dir);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("PhishGuard listening on http://{}", addr);
    info!("Static files served from {}", config.static_dir.display());

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}

pub fn handle_features(args: &ArgMatches) -> Result<()> {
    let url = args
        .get_one::<String>("URL")
        .context("a URL is required")?;
    let config = resolve_config(&ConfigOverrides::from_matches(args))?;
    let schema = FeatureSchema::load(&config.schema_path)
        .with_context(|| format!("Failed to load schema {}", config.schema_path.display()))?;

    let vector = featurize(&schema, url)?;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&vector)?);
    } else {
        print!("{}", format_feature_table(&vector));
    }
    Ok(())
}

/// One `column  value` line per feature, columns padded to a common width.
pub fn format_feature_table(vector: &FeatureVector) -> String {
    let width = vector.columns().map(|c| c.chars().count()).max().unwrap_or(0);
    vector
        .iter()
        .map(|(column, value)| {
            let shown = match value {
                FeatureValue::Number(n) => n.to_string(),
                FeatureValue::Category(label) => label.clone(),
            };
            format!("{:<width$}  {}\n", column, shown, width = width)
        })
        .collect()
}

pub fn handle_check(args: &ArgMatches) -> Result<()> {
    let config = resolve_config(&ConfigOverrides::from_matches(args))?;

    let urls: Vec<String> = if let Some(path) = args.get_one::<PathBuf>("hosts-file") {
        load_urls_from_file(path)?
    } else {
        match args.get_many::<String>("URL") {
            Some(values) => values.cloned().collect(),
            None => DEFAULT_CHECK_URLS.iter().map(|u| u.to_string()).collect(),
        }
    };

    let service = ScoringService::from_config(&config)?;
    print_divider();
    println!(
        "{} {} classifier, {} feature columns, {} TLD categories",
        "→".blue(),
        service.classifier_kind().bright_white(),
        service.schema().feature_columns().len(),
        service.schema().tld_categories().len()
    );
    print_divider();

    let mut failures = 0;
    for url in &urls {
        println!();
        println!("{} {}", "URL:".bright_cyan().bold(), url);
        match service.score_url(url) {
            Ok(response) => print_score(&response),
            Err(e) => {
                failures += 1;
                println!("  {} {}", "✗".red().bold(), e);
            }
        }
    }
    println!();

    if failures > 0 {
        anyhow::bail!("{} of {} URLs could not be scored", failures, urls.len());
    }
    Ok(())
}

fn print_score(response: &ScoreResponse) {
    println!("  Probability: {:.4}", response.probability);
    println!(
        "  Standard threshold ({}): {}",
        STANDARD_THRESHOLD,
        verdict(response.is_phishing_std)
    );
    println!(
        "  High recall threshold ({}): {}",
        response.high_recall_threshold,
        verdict(response.is_phishing_hr)
    );
    if !response.risk_factors.is_empty() {
        println!("  Risk factors:");
        for factor in &response.risk_factors {
            println!("    {} {}", "•".yellow(), factor);
        }
    }
}

fn verdict(phishing: bool) -> colored::ColoredString {
    if phishing {
        "PHISHING".red().bold()
    } else {
        "BENIGN".green().bold()
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}
