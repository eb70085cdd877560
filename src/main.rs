mod presenter;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use skycast_core::{AppError, Config, Units};
use skycast_weather::{HistoryStore, LookupOrchestrator, SqliteKeyValueStore, WeatherProvider};

use crate::presenter::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// City to look up (e.g. "Austin" or "Paris, FR"). Defaults to the most
    /// recently searched city.
    city: Vec<String>,

    /// Print the search history and exit
    #[arg(long, default_value_t = false)]
    history: bool,

    /// Units for this lookup (imperial, metric or standard)
    #[arg(long)]
    units: Option<Units>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            let message = match e.downcast::<AppError>() {
                Ok(app_err) => app_err.user_message(),
                Err(e) => format!("{:#}", e),
            };
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    skycast_core::init()?;

    let (mut config, _) = Config::load_validated()?;
    if let Some(units) = args.units {
        config.weather.units = units;
    }

    let store =
        SqliteKeyValueStore::open_or_memory(config.history_path()).map_err(AppError::from)?;
    let history = HistoryStore::load(store);
    let presenter = TerminalPresenter::new(config.weather.units);

    if args.history {
        presenter.print_history(history.list());
        return Ok(ExitCode::SUCCESS);
    }

    let provider = WeatherProvider::new(&config.weather).map_err(|e| {
        match e.downcast::<skycast_core::ConfigError>() {
            Ok(config_err) => anyhow::Error::new(AppError::from(config_err)),
            Err(e) => e,
        }
    })?;
    let orchestrator = LookupOrchestrator::new(provider, history);

    let city = args.city.join(" ");
    let result = if args.city.is_empty() {
        match orchestrator.lookup_most_recent(&presenter).await {
            Some(result) => result,
            None => {
                eprintln!("No search history yet. Pass a city to look up, e.g. `skycast Austin`.");
                return Ok(ExitCode::FAILURE);
            }
        }
    } else if city.trim().is_empty() {
        eprintln!("Please enter a city to search for!");
        return Ok(ExitCode::FAILURE);
    } else {
        orchestrator.lookup(city.trim(), &presenter).await
    };

    tracing::info!("SkyCast lookup finished");

    // The presenter has already shown any error
    Ok(match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}
