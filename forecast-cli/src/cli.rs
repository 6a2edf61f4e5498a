use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, Favorite, FavoritesController, FavoritesStore, FetchState, ForecastController,
    SettingsStore, TemperatureUnit, fetcher_from_config,
};
use inquire::{Confirm, Password, Select, Text};
use std::sync::Arc;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and default city in the config file.
    Configure,

    /// Show the forecast for a city.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        /// Remember this unit system (metric, imperial or standard) before loading.
        #[arg(long)]
        units: Option<TemperatureUnit>,

        /// Save the city to favorites once loaded.
        #[arg(long)]
        save: bool,

        /// Exit on failure instead of offering a retry.
        #[arg(long)]
        no_retry: bool,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },

    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommand>,
    },

    /// About this app.
    About,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved cities.
    List,
    /// Save a city.
    Add { city: String, country: String },
    /// Remove a city.
    Remove { city: String },
    /// Remove every saved city.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show current settings.
    Show,
    /// Set the temperature unit; prompts when omitted.
    Units { unit: Option<TemperatureUnit> },
}

/// Stores opened from the configured data directory.
struct AppContext {
    config: Config,
    settings: Arc<SettingsStore>,
    favorites: FavoritesController,
}

impl AppContext {
    fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let data_dir = config.data_dir()?;
        debug!(data_dir = %data_dir.display(), "opening stores");

        let settings = SettingsStore::in_dir(&data_dir).context("Failed to open settings")?;
        let favorites = FavoritesStore::in_dir(&data_dir).context("Failed to open favorites")?;

        Ok(Self {
            config,
            settings: Arc::new(settings),
            favorites: FavoritesController::new(Arc::new(favorites)),
        })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                units,
                save,
                no_retry,
            } => show(city, units, save, no_retry).await,
            Command::Favorites { action } => favorites(action.unwrap_or(FavoritesCommand::List)),
            Command::Settings { action } => settings(action.unwrap_or(SettingsCommand::Show)),
            Command::About => {
                print!("{}", render::about());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    city: Option<String>,
    units: Option<TemperatureUnit>,
    save: bool,
    no_retry: bool,
) -> anyhow::Result<()> {
    let ctx = AppContext::open()?;

    let city = match city {
        Some(city) => city.trim().to_string(),
        None => ctx.config.default_city().to_string(),
    };

    if let Some(unit) = units {
        ctx.settings.set_unit(unit)?;
    }

    let fetcher = fetcher_from_config(&ctx.config)?;
    let controller = ForecastController::new(fetcher, Arc::clone(&ctx.settings));

    controller.load(&city);
    loop {
        if controller.state().is_loading() {
            eprintln!("Loading weather data for {city}...");
        }

        match controller.wait_settled().await {
            FetchState::Success(forecast) => {
                print!("{}", render::forecast(&forecast, ctx.settings.unit()));

                if save {
                    ctx.favorites.save(Favorite::from(&forecast.city))?;
                    println!("\nSaved {} to favorites.", forecast.city.name);
                } else if ctx.favorites.is_favorite(&forecast.city.name) {
                    println!("\n★ {} is in your favorites.", forecast.city.name);
                }
                return Ok(());
            }
            FetchState::Failure { kind, message, .. } => {
                eprintln!("⚠️ Oops! {message}");

                let retry = !no_retry
                    && matches!(
                        Confirm::new("Retry?")
                            .with_default(kind.is_retryable())
                            .prompt(),
                        Ok(true)
                    );
                if !retry {
                    bail!("Could not load the forecast for '{city}'");
                }
                controller.refresh(&city);
            }
            FetchState::Idle | FetchState::Loading { .. } => {
                bail!("Forecast request for '{city}' ended without a result");
            }
        }
    }
}

fn favorites(action: FavoritesCommand) -> anyhow::Result<()> {
    let ctx = AppContext::open()?;

    match action {
        FavoritesCommand::List => print!("{}", render::favorites(&ctx.favorites.list())),
        FavoritesCommand::Add { city, country } => {
            let favorite = Favorite::new(city.trim(), country.trim());
            ctx.favorites.save(favorite.clone())?;
            println!("Saved {} ({}).", favorite.city, favorite.country);
        }
        FavoritesCommand::Remove { city } => {
            let city = city.trim();
            if !ctx.favorites.is_favorite(city) {
                println!("{city} is not in your favorites.");
                return Ok(());
            }
            ctx.favorites.remove(city)?;
            println!("Removed {city}.");
        }
        FavoritesCommand::Clear { yes } => {
            let confirmed = yes
                || Confirm::new("Remove all favorite cities?")
                    .with_default(false)
                    .prompt()
                    .context("Failed to read confirmation")?;
            if confirmed {
                ctx.favorites.clear()?;
                println!("Removed all favorites.");
            }
        }
    }

    Ok(())
}

fn settings(action: SettingsCommand) -> anyhow::Result<()> {
    let ctx = AppContext::open()?;

    match action {
        SettingsCommand::Show => print!("{}", render::settings(ctx.settings.unit())),
        SettingsCommand::Units { unit } => {
            let unit = match unit {
                Some(unit) => unit,
                None => {
                    let labels: Vec<&str> =
                        TemperatureUnit::all().iter().map(|u| u.display_label()).collect();
                    let current = TemperatureUnit::all()
                        .iter()
                        .position(|u| *u == ctx.settings.unit())
                        .unwrap_or(0);
                    let label = Select::new("Temperature unit:", labels)
                        .with_starting_cursor(current)
                        .prompt()
                        .context("Failed to read temperature unit")?;
                    TemperatureUnit::from_display_label(label)
                }
            };

            ctx.settings.set_unit(unit)?;
            println!("Temperature unit set to {}.", ctx.settings.unit_display_label());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_units() {
        let cli = Cli::try_parse_from(["forecast", "show", "Lisbon", "--units", "imperial", "--save"])
            .unwrap();
        match cli.command {
            Command::Show {
                city, units, save, ..
            } => {
                assert_eq!(city.as_deref(), Some("Lisbon"));
                assert_eq!(units, Some(TemperatureUnit::Imperial));
                assert!(save);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Cli::try_parse_from(["forecast", "show", "Lisbon", "--units", "kelvin"]).unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn favorites_defaults_to_list() {
        let cli = Cli::try_parse_from(["forecast", "favorites"]).unwrap();
        assert!(matches!(cli.command, Command::Favorites { action: None }));

        let cli = Cli::try_parse_from(["forecast", "favorites", "add", "Seattle", "US"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Favorites {
                action: Some(FavoritesCommand::Add { .. })
            }
        ));
    }

    #[test]
    fn settings_units_without_value_parses() {
        let cli = Cli::try_parse_from(["forecast", "settings", "units"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings {
                action: Some(SettingsCommand::Units { unit: None })
            }
        ));
    }
}
