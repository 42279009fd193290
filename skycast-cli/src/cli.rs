use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select, Text};

use skycast_core::{
    AppStore, Config, Coordinator, IpLocationSource, LocationSource, OpenWeatherProvider,
    SavedCity, Units,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookup CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions and the 5-day outlook for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Unit system for this query: metric or imperial.
        #[arg(long)]
        units: Option<String>,
    },

    /// Show weather for your approximate location (IP-based).
    Here {
        /// Unit system for this query: metric or imperial.
        #[arg(long)]
        units: Option<String>,
    },

    /// Look up a city and bookmark the result.
    Save {
        /// City name to look up and save.
        city: String,
    },

    /// Remove a bookmarked city by exact name.
    Remove {
        /// Saved city name.
        name: String,
    },

    /// List bookmarked cities.
    Cities,

    /// Set the persisted unit preference: metric or imperial.
    Units {
        /// metric or imperial.
        units: String,
    },

    /// Start an interactive session.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(&city, units.as_deref()).await,
            Command::Here { units } => here(units.as_deref()).await,
            Command::Save { city } => save(&city).await,
            Command::Remove { name } => remove(&name),
            Command::Cities => cities(),
            Command::Units { units } => set_units(&units),
            Command::Interactive => interactive().await,
        }
    }
}

fn build_coordinator() -> Result<Coordinator> {
    let config = Config::load()?;
    let api_key = config.resolved_api_key()?;
    let provider = OpenWeatherProvider::new(api_key)?;
    Ok(Coordinator::new(Box::new(provider)))
}

fn load_store(units_override: Option<&str>) -> Result<AppStore> {
    let mut store = AppStore::load()?;
    if let Some(units) = units_override {
        store.set_units(Units::try_from(units)?);
    }
    Ok(store)
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key cannot be empty.");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, units_override: Option<&str>) -> Result<()> {
    let mut store = load_store(units_override)?;
    let mut coordinator = build_coordinator()?;

    coordinator.query_city(&mut store, city).await;

    if let Some(message) = &store.error {
        bail!("{message}");
    }

    output::print_query_result(&store);
    Ok(())
}

async fn here(units_override: Option<&str>) -> Result<()> {
    let mut store = load_store(units_override)?;
    let mut coordinator = build_coordinator()?;

    let source = IpLocationSource::new()?;
    let coords = source
        .current_location()
        .await
        .context("Could not determine your location")?;

    coordinator.query_coordinates(&mut store, coords.lat, coords.lon).await;

    if let Some(message) = &store.error {
        bail!("{message}");
    }

    output::print_query_result(&store);
    Ok(())
}

async fn save(city: &str) -> Result<()> {
    let mut store = AppStore::load()?;
    let mut coordinator = build_coordinator()?;

    coordinator.query_city(&mut store, city).await;

    if let Some(message) = &store.error {
        bail!("{message}");
    }

    let Some(current) = &store.current_weather else {
        bail!("The query returned no current conditions to save.");
    };

    let entry = SavedCity::from_current(current);
    let name = entry.name.clone();
    store.add_saved_city(entry);
    store.save()?;

    println!("Saved {name}.");
    Ok(())
}

fn remove(name: &str) -> Result<()> {
    let mut store = AppStore::load()?;

    let before = store.saved_cities.len();
    store.remove_saved_city(name);

    if store.saved_cities.len() == before {
        println!("No saved city named '{name}'.");
        return Ok(());
    }

    store.save()?;
    println!("Removed {name}.");
    Ok(())
}

fn cities() -> Result<()> {
    let store = AppStore::load()?;
    output::print_saved_cities(&store.saved_cities, store.units);
    Ok(())
}

fn set_units(units: &str) -> Result<()> {
    let mut store = AppStore::load()?;
    store.set_units(Units::try_from(units)?);
    store.save()?;

    println!("Units set to {}.", store.units);
    Ok(())
}

const ACTION_SEARCH: &str = "Search city";
const ACTION_RECENT: &str = "Search again (recent)";
const ACTION_LOCATION: &str = "Use my location";
const ACTION_SAVE: &str = "Save shown city";
const ACTION_CITIES: &str = "Saved cities";
const ACTION_REMOVE: &str = "Remove a saved city";
const ACTION_UNITS: &str = "Change units";
const ACTION_DISMISS: &str = "Dismiss error";
const ACTION_QUIT: &str = "Quit";

async fn interactive() -> Result<()> {
    let mut store = AppStore::load()?;
    let mut coordinator = build_coordinator()?;

    println!("skycast interactive session. Units: {}.", store.units);

    loop {
        if let Some(message) = &store.error {
            println!("\n[error] {message}");
        }

        let mut actions = vec![ACTION_SEARCH];
        if !coordinator.recent_searches().is_empty() {
            actions.push(ACTION_RECENT);
        }
        actions.push(ACTION_LOCATION);
        if store.current_weather.is_some() {
            actions.push(ACTION_SAVE);
        }
        actions.push(ACTION_CITIES);
        if !store.saved_cities.is_empty() {
            actions.push(ACTION_REMOVE);
        }
        actions.push(ACTION_UNITS);
        if store.error.is_some() {
            actions.push(ACTION_DISMISS);
        }
        actions.push(ACTION_QUIT);

        let action = Select::new("What next?", actions)
            .prompt()
            .context("Prompt failed")?;

        match action {
            ACTION_SEARCH => {
                let city = Text::new("City:").prompt().context("Prompt failed")?;
                let city = city.trim();
                if city.is_empty() {
                    continue;
                }
                coordinator.query_city(&mut store, city).await;
                if store.error.is_none() {
                    output::print_query_result(&store);
                }
            }
            ACTION_RECENT => {
                let recents = coordinator.recent_searches().to_vec();
                let city = Select::new("Recent searches:", recents)
                    .prompt()
                    .context("Prompt failed")?;
                coordinator.query_city(&mut store, &city).await;
                if store.error.is_none() {
                    output::print_query_result(&store);
                }
            }
            ACTION_LOCATION => {
                let source = IpLocationSource::new()?;
                match source.current_location().await {
                    Ok(coords) => {
                        coordinator.query_coordinates(&mut store, coords.lat, coords.lon).await;
                        if store.error.is_none() {
                            output::print_query_result(&store);
                        }
                    }
                    Err(err) => println!("[error] {err}"),
                }
            }
            ACTION_SAVE => {
                if let Some(current) = &store.current_weather {
                    let entry = SavedCity::from_current(current);
                    let name = entry.name.clone();
                    store.add_saved_city(entry);
                    store.save()?;
                    println!("Saved {name}.");
                }
            }
            ACTION_CITIES => {
                output::print_saved_cities(&store.saved_cities, store.units);
            }
            ACTION_REMOVE => {
                let names: Vec<String> =
                    store.saved_cities.iter().map(|city| city.name.clone()).collect();
                let name = Select::new("Remove which city?", names)
                    .prompt()
                    .context("Prompt failed")?;
                let confirmed = Confirm::new(&format!("Remove {name}?"))
                    .with_default(false)
                    .prompt()
                    .context("Prompt failed")?;
                if confirmed {
                    store.remove_saved_city(&name);
                    store.save()?;
                    println!("Removed {name}.");
                }
            }
            ACTION_UNITS => {
                let choice = Select::new("Units:", vec!["metric", "imperial"])
                    .prompt()
                    .context("Prompt failed")?;
                store.set_units(Units::try_from(choice)?);
                store.save()?;
                println!("Units set to {}. Applies from the next query.", store.units);
            }
            ACTION_DISMISS => {
                store.clear_error();
            }
            ACTION_QUIT => {
                store.save()?;
                break;
            }
            _ => unreachable!("unknown action"),
        }
    }

    Ok(())
}
