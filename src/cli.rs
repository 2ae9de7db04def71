//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::alert::AlertThresholds;
use crate::domain::classify::Action;
use crate::domain::config_validation::{validate_data_config, validate_screen_config};
use crate::domain::error::OppscanError;
use crate::domain::fundamentals::FundRules;
use crate::domain::holdings::{price_holdings, top_gainers, top_losers, HoldingRow};
use crate::domain::screen::{run_screen, ScreenReport, ScreenRow, ScreenSettings};
use crate::domain::scoring::GrowthSectors;
use crate::domain::symbol::{normalize_symbol, SymbolAliases};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_REPORT_PATH: &str = "report.html";

#[derive(Parser, Debug)]
#[command(name = "oppscan", about = "Rule-based equity opportunity screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the universe and write the HTML report
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Universe CSV, overrides [screen] universe
        #[arg(long)]
        universe: Option<PathBuf>,
        /// Comma-separated symbols, overrides any universe file
        #[arg(long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also mail the report using [mail]
        #[arg(long)]
        mail: bool,
    },
    /// Print the alert table for the universe
    Alerts {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        universe: Option<PathBuf>,
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Show today's biggest losers and gainers in a holdings export
    Holdings {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        holdings: PathBuf,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            universe,
            symbols,
            output,
            mail,
        } => run_screen_command(
            &config,
            universe.as_deref(),
            symbols.as_deref(),
            output.as_deref(),
            mail,
        ),
        Command::Alerts {
            config,
            universe,
            symbols,
        } => run_alerts(&config, universe.as_deref(), symbols.as_deref()),
        Command::Holdings {
            config,
            holdings,
            top,
        } => run_holdings(&config, &holdings, top),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: OppscanError) -> ExitCode {
    tracing::error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

fn non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<usize, OppscanError> {
    let value = config.get_int(section, key, default);
    usize::try_from(value).map_err(|_| OppscanError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("{} must not be negative", value),
    })
}

pub fn build_screen_settings(config: &dyn ConfigPort) -> Result<ScreenSettings, OppscanError> {
    let defaults = ScreenSettings::default();
    let default_fund_rules = FundRules::default();

    let streak_days = config.get_int("screen", "streak_days", 7);
    let streak_days = u32::try_from(streak_days).map_err(|_| OppscanError::ConfigInvalid {
        section: "screen".into(),
        key: "streak_days".into(),
        reason: format!("{} is out of range", streak_days),
    })?;

    let growth_sectors = match config.get_list("screen", "growth_sectors") {
        Some(keywords) => GrowthSectors::new(keywords),
        None => defaults.growth_sectors,
    };

    let fund_rules = FundRules {
        suffixes: config
            .get_list("symbols", "fund_suffixes")
            .map(|suffixes| suffixes.iter().map(|s| s.to_uppercase()).collect())
            .unwrap_or(default_fund_rules.suffixes),
        symbols: config
            .get_list("symbols", "funds")
            .map(|funds| funds.iter().map(|f| f.to_uppercase()).collect())
            .unwrap_or(default_fund_rules.symbols),
    };

    Ok(ScreenSettings {
        lookback: non_negative(config, "screen", "lookback", 120)?,
        thresholds: AlertThresholds {
            streak_days,
            drawdown_pct: config.get_double("alerts", "drawdown_pct", 8.0),
            runup_pct: config.get_double("alerts", "runup_pct", 10.0),
        },
        growth_sectors,
        fund_rules,
        exchange_suffixes: config
            .get_list("symbols", "exchange_suffixes")
            .unwrap_or(defaults.exchange_suffixes),
        top_n: non_negative(config, "screen", "top_n", 10)?,
    })
}

pub fn build_aliases(config: &dyn ConfigPort) -> Result<SymbolAliases, OppscanError> {
    match config.get_string("symbols", "aliases") {
        Some(raw) => SymbolAliases::parse(&raw).map_err(|e| OppscanError::ConfigInvalid {
            section: "symbols".into(),
            key: "aliases".into(),
            reason: e.to_string(),
        }),
        None => Ok(SymbolAliases::default()),
    }
}

/// Symbol source precedence: `--symbols`, `--universe`, `[screen] symbols`,
/// `[screen] universe`.
pub fn resolve_symbols(
    universe_override: Option<&Path>,
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
    aliases: &SymbolAliases,
) -> Result<Vec<String>, OppscanError> {
    if let Some(list) = symbols_override {
        return Ok(parse_symbols(list, aliases)?);
    }
    if let Some(path) = universe_override {
        return load_universe(path, aliases);
    }
    if let Some(list) = config.get_string("screen", "symbols").filter(|s| !s.trim().is_empty()) {
        return Ok(parse_symbols(&list, aliases)?);
    }
    match config.get_string("screen", "universe").filter(|s| !s.trim().is_empty()) {
        Some(path) => load_universe(Path::new(path.trim()), aliases),
        None => Err(OppscanError::ConfigMissing {
            section: "screen".into(),
            key: "universe".into(),
        }),
    }
}

fn load_universe(path: &Path, aliases: &SymbolAliases) -> Result<Vec<String>, OppscanError> {
    tracing::info!("Reading universe from {}", path.display());
    let table = csv_adapter::read_universe(path)?;
    Ok(table.symbols(aliases)?)
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, OppscanError> {
    validate_data_config(config)?;
    let dir = config.get_string("data", "dir").unwrap_or_default();
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

struct ScreenRun {
    config: FileConfigAdapter,
    settings: ScreenSettings,
    report: ScreenReport,
}

/// Shared by `screen` and `alerts`: config, validation, universe, screening.
fn prepare_and_screen(
    config_path: &Path,
    universe: Option<&Path>,
    symbols: Option<&str>,
) -> Result<ScreenRun, ExitCode> {
    let config = load_config(config_path)?;

    validate_screen_config(&config).map_err(fail)?;
    let data = data_adapter(&config).map_err(fail)?;
    let settings = build_screen_settings(&config).map_err(fail)?;
    let aliases = build_aliases(&config).map_err(fail)?;
    let symbols = resolve_symbols(universe, symbols, &config, &aliases).map_err(fail)?;

    tracing::info!("Screening {} symbols", symbols.len());
    let report = run_screen(&data, &symbols, &settings);

    Ok(ScreenRun {
        config,
        settings,
        report,
    })
}

fn run_screen_command(
    config_path: &Path,
    universe: Option<&Path>,
    symbols: Option<&str>,
    output: Option<&Path>,
    mail: bool,
) -> ExitCode {
    let ScreenRun {
        config,
        settings,
        report,
    } = match prepare_and_screen(config_path, universe, symbols) {
        Ok(run) => run,
        Err(code) => return code,
    };

    let run_date = chrono::Local::now().date_naive();
    let output = output
        .map(|p| p.display().to_string())
        .or_else(|| config.get_string("report", "output"))
        .unwrap_or_else(|| DEFAULT_REPORT_PATH.to_string());

    if let Err(e) = HtmlReportAdapter::new(settings.top_n).write(&report, run_date, &output) {
        return fail(e);
    }
    tracing::info!("Report written to: {}", output);

    print!("{}", format_summary(&report, settings.top_n));

    if mail {
        if let Err(code) = send_report_mail(&config, &report, run_date, settings.top_n) {
            return code;
        }
    }

    if report.is_empty() {
        return fail(OppscanError::NoData {
            symbol: "universe".into(),
        });
    }
    ExitCode::SUCCESS
}

#[cfg(feature = "mail")]
fn send_report_mail(
    config: &dyn ConfigPort,
    report: &ScreenReport,
    run_date: chrono::NaiveDate,
    top_n: usize,
) -> Result<(), ExitCode> {
    use crate::adapters::html_report_adapter::{render_html, subject_for};
    use crate::adapters::mail_adapter::MailAdapter;

    let mailer = MailAdapter::from_config(config).map_err(fail)?;
    let html = render_html(report, run_date, top_n).map_err(fail)?;
    mailer.send(&subject_for(report, run_date), html).map_err(fail)
}

#[cfg(not(feature = "mail"))]
fn send_report_mail(
    config: &dyn ConfigPort,
    report: &ScreenReport,
    run_date: chrono::NaiveDate,
    top_n: usize,
) -> Result<(), ExitCode> {
    let _ = (config, report, run_date, top_n);
    tracing::error!("mail feature is required for --mail");
    Err(ExitCode::from(1))
}

fn run_alerts(config_path: &Path, universe: Option<&Path>, symbols: Option<&str>) -> ExitCode {
    let run = match prepare_and_screen(config_path, universe, symbols) {
        Ok(run) => run,
        Err(code) => return code,
    };

    if run.report.is_empty() {
        return fail(OppscanError::NoData {
            symbol: "universe".into(),
        });
    }

    let rows = run.report.alert_rows();
    if rows.is_empty() {
        println!("No alerts.");
    } else {
        print!("{}", format_alert_table(&rows));
    }
    ExitCode::SUCCESS
}

fn run_holdings(config_path: &Path, holdings_path: &Path, top: usize) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_screen_config(&config) {
        return fail(e);
    }
    let data = match data_adapter(&config) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let settings = match build_screen_settings(&config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let aliases = match build_aliases(&config) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    tracing::info!("Reading holdings from {}", holdings_path.display());
    let mut holdings = match csv_adapter::read_holdings(holdings_path) {
        Ok(h) => h,
        Err(e) => return fail(e),
    };
    for holding in &mut holdings {
        holding.symbol = normalize_symbol(&holding.symbol, &aliases);
    }

    let rows = price_holdings(&data, &holdings, &settings.exchange_suffixes);
    let priced = rows.iter().filter(|r| r.todays_profit.is_some()).count();
    tracing::info!("Priced {} of {} holdings", priced, rows.len());

    print!(
        "{}",
        format_holdings_table("Top losers today", &top_losers(&rows, top))
    );
    println!();
    print!(
        "{}",
        format_holdings_table("Top gainers today", &top_gainers(&rows, top))
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_screen_config(&config) {
        return fail(e);
    }
    if let Err(e) = validate_data_config(&config) {
        return fail(e);
    }
    let settings = match build_screen_settings(&config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    println!("Screen settings:");
    println!("  streak_days:       {}", settings.thresholds.streak_days);
    println!("  lookback:          {}", settings.lookback);
    println!("  top_n:             {}", settings.top_n);
    println!("  drawdown_pct:      {:.1}", settings.thresholds.drawdown_pct);
    println!("  runup_pct:         {:.1}", settings.thresholds.runup_pct);
    println!("  growth_sectors:    {}", settings.growth_sectors.keywords().join(", "));
    println!("  exchange_suffixes: {}", settings.exchange_suffixes.join(", "));

    let has_source = config.get_string("screen", "symbols").is_some()
        || config.get_string("screen", "universe").is_some();
    if has_source {
        let symbols = match build_aliases(&config)
            .and_then(|aliases| resolve_symbols(None, None, &config, &aliases))
        {
            Ok(s) => s,
            Err(e) => return fail(e),
        };
        println!("  universe:          {} symbols", symbols.len());
    }

    println!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

/// Bucket counts and the top rows of each bucket, for stdout.
pub fn format_summary(report: &ScreenReport, top_n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Processed {} / {} symbols ({} unresolved)",
        report.processed(),
        report.universe_size,
        report.unresolved.len()
    );
    for action in Action::ALL {
        let rows = report.bucket(action, top_n);
        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        let _ = writeln!(
            out,
            "  {:<11} {:>3}  {}",
            action.to_string(),
            rows.len(),
            symbols.join(", ")
        );
    }
    out
}

pub fn format_alert_table(rows: &[&ScreenRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<16} {:<5} {:>9} {:>9} {:>4}  Alerts",
        "Symbol", "Ticker", "Trend", "DD %", "RU %", "Sev"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<14} {:<16} {:<5} {:>9.2} {:>9.2} {:>4}  {}",
            row.symbol,
            row.ticker,
            row.indicators.trend.to_string(),
            row.indicators.drawdown_pct,
            row.indicators.runup_pct,
            row.severity,
            row.alerts
        );
    }
    out
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn format_holdings_table(title: &str, rows: &[&HoldingRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", title);
    let _ = writeln!(
        out,
        "{:<14} {:>8} {:>10} {:>10} {:>10} {:>12} {:>12}",
        "Symbol", "Qty", "Avg", "Prev", "Today", "Day P&L", "Total P&L"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<14} {:>8} {:>10.2} {:>10} {:>10} {:>12} {:>12}",
            row.symbol,
            row.quantity,
            row.average_price,
            cell(row.previous_close),
            cell(row.today_price),
            cell(row.todays_profit),
            cell(row.total_profit)
        );
    }
    out
}
