//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::chart_analysis::ChartAnalysis;
use crate::domain::error::SignaldeskError;
use crate::domain::price_series::{PriceSeries, parse_prices};
use crate::domain::settings::Settings;
use crate::domain::signal::SignalGenerator;

#[derive(Parser, Debug)]
#[command(name = "signaldesk", about = "Technical indicator signal generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a BUY/SELL/HOLD recommendation from closing prices
    Signal {
        /// Comma-separated closes, oldest first
        #[arg(short, long, conflicts_with = "csv", required_unless_present = "csv")]
        prices: Option<String>,
        /// CSV file with a close column
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Defaults to the last close
        #[arg(long)]
        current_price: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Coerce model output into a validated chart analysis
    Analysis {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "H1")]
        timeframe: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Signal {
            prices,
            csv,
            current_price,
            config,
        } => run_signal(prices.as_deref(), csv.as_ref(), current_price, config.as_ref()),
        Command::Analysis { input, timeframe } => run_analysis(&input, &timeframe),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

fn fail(err: SignaldeskError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

/// Settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings, ExitCode> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            Settings::from_config(&config).map_err(fail)
        }
        None => Ok(Settings::default()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(SignaldeskError::Io(e.into())),
    }
}

fn run_signal(
    prices: Option<&str>,
    csv: Option<&PathBuf>,
    current_price: Option<f64>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let series = match (prices, csv) {
        (Some(raw), _) => parse_prices(raw),
        (None, Some(path)) => csv_adapter::read_closes(path)
            .map_err(SignaldeskError::invalid_input)
            .and_then(PriceSeries::new),
        (None, None) => Err(SignaldeskError::invalid_input(
            "either --prices or --csv is required",
        )),
    };
    let series = match series {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let current_price = current_price.unwrap_or_else(|| series.last());
    if !current_price.is_finite() {
        return fail(SignaldeskError::invalid_input("current price must be finite"));
    }

    let generator = SignalGenerator::new(settings.indicators, settings.signal);
    let recommendation = generator.generate_signal(&series, current_price);
    print_json(&recommendation)
}

fn run_analysis(input: &PathBuf, timeframe: &str) -> ExitCode {
    let text = match fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => return fail(SignaldeskError::Io(e)),
    };
    let analysis = ChartAnalysis::from_model_output(&text, timeframe, chrono::Utc::now());
    print_json(&analysis)
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(Some(config_path)) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("Config validated successfully");
    let generator = SignalGenerator::new(settings.indicators, settings.signal);

    eprintln!("\nIndicators:");
    for indicator in generator.engine().indicator_types() {
        eprintln!("  {}", indicator);
    }

    let s = generator.params();
    eprintln!("\nSignal:");
    eprintln!("  rsi oversold/overbought: {}/{}", s.rsi_oversold, s.rsi_overbought);
    eprintln!("  confidence cap:          {}", s.confidence_cap);
    eprintln!("  min confidence:          {}", s.min_confidence);

    eprintln!("\nMarket data:");
    match &settings.market_data.csv_dir {
        Some(dir) => eprintln!("  csv_dir: {}", dir.display()),
        None => eprintln!("  csv_dir: (not set)"),
    }
    if settings.market_data.pairs.is_empty() {
        eprintln!("  pairs:   (scan csv_dir)");
    } else {
        eprintln!("  pairs:   {}", settings.market_data.pairs.join(", "));
    }

    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::csv_adapter::CsvAdapter;
        use crate::adapters::memory_repository::InMemoryAnalysisRepository;
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let settings = match load_settings(Some(config_path)) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let Some(csv_dir) = settings.market_data.csv_dir.clone() else {
            return fail(SignaldeskError::ConfigMissing {
                section: "market_data".into(),
                key: "csv_dir".into(),
            });
        };

        let addr: SocketAddr = match settings.server.bind.parse() {
            Ok(a) => a,
            Err(e) => {
                return fail(SignaldeskError::ConfigInvalid {
                    section: "server".into(),
                    key: "bind".into(),
                    reason: format!("{e}"),
                });
            }
        };

        let state = AppState {
            generator: Arc::new(SignalGenerator::new(settings.indicators, settings.signal)),
            market_data: Arc::new(CsvAdapter::new(csv_dir, settings.market_data.pairs)),
            repository: Arc::new(InMemoryAnalysisRepository::new()),
            history_limit: settings.server.history_limit,
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(SignaldeskError::Io(e)),
        };

        let served: std::io::Result<()> = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "web server listening");
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(SignaldeskError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
