//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Settings and symbol resolution from INI files on disk
//! - `validate` exit codes for good and broken configs
//! - `screen`, `alerts` and `holdings` against a CSV data directory

mod common;

use clap::Parser;
use common::*;
use oppscan::adapters::file_config_adapter::FileConfigAdapter;
use oppscan::cli::{self, Cli};
use oppscan::domain::symbol::SymbolAliases;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode doesn't implement PartialEq on every toolchain, compare via Debug
fn assert_exit(code: ExitCode, expected: u8) {
    assert_eq!(
        format!("{code:?}"),
        format!("{:?}", ExitCode::from(expected)),
        "expected exit code {expected}"
    );
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["oppscan"];
    argv.extend_from_slice(args);
    cli::run(Cli::parse_from(argv))
}

fn write_prices(dir: &Path, ticker: &str, closes: &[f64]) {
    let mut body = String::from("date,close\n");
    for (i, close) in closes.iter().enumerate() {
        body.push_str(&format!("2024-03-{:02},{}\n", i + 1, close));
    }
    fs::write(dir.join("prices").join(format!("{}.csv", ticker)), body).unwrap();
}

/// Data directory with two screenable symbols, a universe and holdings.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data").join("prices")).unwrap();

        let data = root.join("data");
        write_prices(&data, "BEL.NS", &falling_tail(10, 100.0, 8, 3.0));
        write_prices(&data, "TCS.NS", &rising(20, 100.0, 1.0));
        fs::write(
            data.join("fundamentals.csv"),
            "ticker,sector,returnOnEquity,earningsGrowth,revenueGrowth,debtToEquity\n\
             BEL.NS,Defence,0.18,0.20,0.12,0.5\n",
        )
        .unwrap();
        fs::write(root.join("universe.csv"), "Symbol\nBEL\nTCS\nNOPE\n").unwrap();
        fs::write(
            root.join("holdings.csv"),
            "Symbol,Quantity Available,Average Price\nBEL,10,80\nTCS,5,110\n",
        )
        .unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn config(&self, extra: &str) -> String {
        let ini = format!(
            "[screen]\nuniverse = {}\n{}\n[data]\ndir = {}\n",
            self.path("universe.csv"),
            extra,
            self.path("data")
        );
        let path = self.dir.path().join("oppscan.ini");
        fs::write(&path, ini).unwrap();
        path.display().to_string()
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn settings_from_ini_file() {
        let file = write_temp_ini(
            "[screen]\nstreak_days = 4\ntop_n = 2\n\n[alerts]\nrunup_pct = 15\n\n\
             [symbols]\nexchange_suffixes = .BO, .NS\n",
        );
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let settings = cli::build_screen_settings(&adapter).unwrap();

        assert_eq!(settings.thresholds.streak_days, 4);
        assert_eq!(settings.thresholds.runup_pct, 15.0);
        assert_eq!(settings.top_n, 2);
        assert_eq!(settings.exchange_suffixes, vec![".BO", ".NS"]);
    }

    #[test]
    fn universe_from_config_path() {
        let ws = Workspace::new();
        let adapter = FileConfigAdapter::from_file(ws.config("")).unwrap();
        let symbols = cli::resolve_symbols(None, None, &adapter, &SymbolAliases::default()).unwrap();
        assert_eq!(symbols, vec!["BEL", "TCS", "NOPE"]);
    }

    #[test]
    fn universe_override_beats_config() {
        let ws = Workspace::new();
        let other = ws.dir.path().join("other.csv");
        fs::write(&other, "Ticker\nINFY\n").unwrap();

        let adapter = FileConfigAdapter::from_file(ws.config("")).unwrap();
        let symbols =
            cli::resolve_symbols(Some(other.as_path()), None, &adapter, &SymbolAliases::default()).unwrap();
        assert_eq!(symbols, vec!["INFY"]);
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let ws = Workspace::new();
        assert_exit(run(&["validate", "-c", &ws.config("")]), 0);
    }

    #[test]
    fn missing_file_is_config_error() {
        assert_exit(run(&["validate", "-c", "/nonexistent/oppscan.ini"]), 2);
    }

    #[test]
    fn missing_data_dir_is_config_error() {
        let file = write_temp_ini("[screen]\nsymbols = TCS\n");
        assert_exit(run(&["validate", "-c", file.path().to_str().unwrap()]), 2);
    }

    #[test]
    fn invalid_threshold_is_config_error() {
        let ws = Workspace::new();
        let config = ws.config("streak_days = 0");
        assert_exit(run(&["validate", "-c", &config]), 2);
    }

    #[test]
    fn universe_without_symbols_is_universe_error() {
        let ws = Workspace::new();
        fs::write(ws.dir.path().join("universe.csv"), "Symbol\nnan\n\n").unwrap();
        assert_exit(run(&["validate", "-c", &ws.config("")]), 4);
    }
}

mod screen_command {
    use super::*;

    #[test]
    fn writes_html_report() {
        let ws = Workspace::new();
        let output = ws.path("out/report.html");

        assert_exit(run(&["screen", "-c", &ws.config(""), "-o", &output]), 0);

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("STRONG ADD (Panic + Growth)"));
        assert!(html.contains("BEL.NS"));
        assert!(html.contains("TCS.NS"));
        assert!(html.contains("NOPE"));
    }

    #[test]
    fn report_path_from_config() {
        let ws = Workspace::new();
        let output = ws.path("configured.html");
        let config = ws.config(&format!("\n[report]\noutput = {}", output));

        assert_exit(run(&["screen", "-c", &config]), 0);
        assert!(Path::new(&output).exists());
    }

    #[test]
    fn nothing_resolved_exits_no_data() {
        let ws = Workspace::new();
        let output = ws.path("empty.html");

        let code = run(&["screen", "-c", &ws.config(""), "--symbols", "AAA,BBB", "-o", &output]);
        assert_exit(code, 5);

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("(No Data)"));
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let ws = Workspace::new();
        let code = run(&["screen", "-c", &ws.config(""), "--symbols", "TCS,tcs-eq"]);
        assert_exit(code, 4);
    }

    #[cfg(not(feature = "mail"))]
    #[test]
    fn mail_requires_feature() {
        let ws = Workspace::new();
        let output = ws.path("mail.html");
        let code = run(&["screen", "-c", &ws.config(""), "-o", &output, "--mail"]);
        assert_exit(code, 1);
    }
}

mod other_commands {
    use super::*;

    #[test]
    fn alerts_succeeds() {
        let ws = Workspace::new();
        assert_exit(run(&["alerts", "-c", &ws.config("")]), 0);
    }

    #[test]
    fn holdings_succeeds() {
        let ws = Workspace::new();
        let holdings = ws.path("holdings.csv");
        assert_exit(
            run(&["holdings", "-c", &ws.config(""), "--holdings", &holdings, "--top", "3"]),
            0,
        );
    }

    #[test]
    fn holdings_missing_file_is_data_error() {
        let ws = Workspace::new();
        let holdings = ws.path("absent.csv");
        assert_exit(
            run(&["holdings", "-c", &ws.config(""), "--holdings", &holdings]),
            3,
        );
    }
}
