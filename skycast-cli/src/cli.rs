use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use skycast_core::{
    Config, FallbackChain, JsonFileStore, KvStore, MemoryStore, ProviderId, SearchHandle,
    SearchStatus, WeatherRecord, format, validate_city,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "weatherapi", "openweather" or
        /// "visualcrossing".
        provider: String,
    },

    /// Show current weather for a city, once.
    Show {
        /// City name.
        city: String,

        /// Print the normalized record as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive search loop with recent-search history.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, json } => show(&city, json).await,
            Command::Search => search().await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.requires_api_key() {
        bail!("Provider '{id}' does not use an API key.");
    }

    let mut config = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for provider '{id}'.");
    Ok(())
}

async fn show(city: &str, json: bool) -> anyhow::Result<()> {
    validate_city(city)?;

    let config = Config::load()?;
    let chain = FallbackChain::from_config(&config)?;

    let record = chain.resolve(city).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

async fn search() -> anyhow::Result<()> {
    let config = Config::load()?;
    let chain = FallbackChain::from_config(&config)?;

    let store: Box<dyn KvStore> = match JsonFileStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            eprintln!("Recent searches will not persist: {err}");
            Box::new(MemoryStore::new())
        }
    };

    let handle = SearchHandle::spawn(chain, store);
    let mut last_query: Option<String> = None;

    println!(
        "Type a city name to search, ':retry' to repeat the last search, \
         ':clear' to forget recent searches, Esc to quit."
    );

    loop {
        let recents = handle.state().recent_searches;
        let help = format!("recent: {}", recents.join(", "));
        let mut prompt = inquire::Text::new("city:");
        if !recents.is_empty() {
            prompt = prompt.with_help_message(&help);
        }
        let prompt = prompt.prompt();

        let Ok(input) = prompt else {
            // Esc or Ctrl-C
            break;
        };
        let mut input = input.trim().to_string();
        if input.is_empty() {
            continue;
        }
        if input == ":clear" {
            handle.clear_recent_searches();
            continue;
        }
        if input == ":retry" {
            match &last_query {
                Some(query) => input = query.clone(),
                None => {
                    println!("Nothing to retry yet.");
                    continue;
                }
            }
        }
        if let Err(err) = validate_city(&input) {
            println!("{err}");
            continue;
        }

        last_query = Some(input.clone());
        let state = handle.submit_and_wait(input).await;
        match state.status {
            SearchStatus::Success => {
                if let Some(record) = &state.current_weather {
                    print_record(record);
                }
            }
            SearchStatus::Error => {
                if let Some(message) = &state.error_message {
                    println!("{message} (type ':retry' to try again)");
                }
            }
            SearchStatus::Idle | SearchStatus::Loading => {}
        }
    }

    Ok(())
}

fn print_record(record: &WeatherRecord) {
    println!(
        "{}, {} ({:.2}°, {:.2}°)",
        record.city_name, record.country_code, record.coordinates.lat, record.coordinates.lon
    );
    println!(
        "  {} (feels like {}), {} - {}",
        format::format_temperature(record.temperature_c),
        format::format_temperature(record.feels_like_c),
        record.condition_main,
        record.condition_description,
    );
    println!(
        "  Wind: {}   Humidity: {}   Pressure: {}",
        format::format_wind(record.wind_speed_mps, record.wind_direction_deg),
        format::format_humidity(record.humidity_pct),
        format::format_pressure(record.pressure_hpa),
    );
    println!(
        "  Visibility: {}   Cloudiness: {}%",
        format::format_visibility(record.visibility_meters),
        record.cloudiness_pct,
    );
    println!(
        "  Observed {} at {}",
        format::day_name(record.observed_at),
        format::clock_time(record.observed_at),
    );
}
