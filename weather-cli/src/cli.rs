use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Select};

use weather_core::{
    Config, County, HomeView, HourlyView, Timeline, TimelineRequest, UiState, UnitGroup,
    WeeklyView,
    county::{find_county, refresh_counties},
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "County weather forecasts")]
pub struct Cli {
    /// Use this county for one run instead of the saved selection (name or API key).
    #[arg(long, global = true)]
    pub county: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and optional preferences.
    Configure {
        /// Unit system: metric, us, uk or base.
        #[arg(long)]
        units: Option<String>,

        /// URL serving the county list as JSON.
        #[arg(long)]
        counties_url: Option<String>,
    },

    /// List or select counties.
    County {
        #[command(subcommand)]
        action: CountyAction,
    },

    /// Current conditions, the next hours and the week at a glance.
    Home,

    /// Every hour of one day.
    Hourly {
        /// Days after today (0 = today).
        #[arg(long, default_value_t = 0)]
        day: u64,
    },

    /// Daily detail for the week.
    Weekly,
}

#[derive(Debug, Subcommand)]
pub enum CountyAction {
    /// Show all selectable counties.
    List,

    /// Select the county used by default; prompts when no name is given.
    Select { name: Option<String> },
}

#[derive(Debug, Clone, Copy)]
enum Screen {
    Home,
    Hourly(u64),
    Weekly,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure { units, counties_url } => {
                configure(&mut config, units, counties_url)?;
            }
            Command::County { action } => match action {
                CountyAction::List => list_counties(&mut config).await?,
                CountyAction::Select { name } => select_county(&mut config, name).await?,
            },
            Command::Home => show(&mut config, self.county, Screen::Home).await?,
            Command::Hourly { day } => show(&mut config, self.county, Screen::Hourly(day)).await?,
            Command::Weekly => show(&mut config, self.county, Screen::Weekly).await?,
        }

        Ok(())
    }
}

fn configure(config: &mut Config, units: Option<String>, counties_url: Option<String>) -> Result<()> {
    let api_key = Password::new("Visual Crossing API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if let Some(url) = counties_url {
        config.counties_url = Some(url);
    }

    // The remote config document can supply the key instead.
    match api_key.trim() {
        "" if config.counties_url.is_none() => bail!("API key must not be empty"),
        "" => {}
        key => config.set_api_key(key.to_string()),
    }

    if let Some(units) = units {
        config.unit_group = Some(UnitGroup::try_from(units.as_str())?);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn counties(config: &mut Config) -> Result<Vec<County>> {
    let (counties, changed) = refresh_counties(config).await?;
    if changed {
        config.save()?;
    }
    Ok(counties)
}

async fn list_counties(config: &mut Config) -> Result<()> {
    let counties = counties(config).await?;
    let selected = config.selected_county();
    render::counties(&counties, &selected);
    Ok(())
}

async fn select_county(config: &mut Config, name: Option<String>) -> Result<()> {
    let counties = counties(config).await?;

    let county = match name {
        Some(name) => find_county(&counties, &name)
            .cloned()
            .ok_or_else(|| unknown_county(&name))?,
        None => {
            let current = config.selected_county();
            let cursor = counties.iter().position(|c| *c == current).unwrap_or(0);
            Select::new("選擇縣市", counties)
                .with_starting_cursor(cursor)
                .prompt()
                .context("County selection cancelled")?
        }
    };

    config.set_selected_county(&county)?;
    config.save()?;
    println!("Selected {county}");
    Ok(())
}

fn unknown_county(name: &str) -> anyhow::Error {
    anyhow!("Unknown county '{name}'.\nHint: run `weather county list` to see the options.")
}

/// Refreshes the remote config first when one is configured, since it may carry the API key.
async fn resolve_county(config: &mut Config, requested: Option<String>) -> Result<County> {
    if requested.is_none() && config.counties_url.is_none() {
        return Ok(config.selected_county());
    }

    let counties = counties(config).await?;
    match requested {
        Some(name) => find_county(&counties, &name)
            .cloned()
            .ok_or_else(|| unknown_county(&name)),
        None => Ok(config.selected_county()),
    }
}

async fn show(config: &mut Config, requested: Option<String>, screen: Screen) -> Result<()> {
    let county = resolve_county(config, requested).await?;
    let provider = provider_from_config(config)?;
    let units = config.unit_group();
    tracing::debug!(county = %county.key, ?screen, units = units.as_str(), "loading screen");

    loop {
        render::status(&county, &UiState::<Timeline>::Loading);

        let now = Local::now();
        let request =
            TimelineRequest::for_county(&county, now.date_naive()).with_unit_group(units);
        let state: UiState<Timeline> = provider.get_timeline(&request).await.into();

        match &state {
            UiState::Success(timeline) => {
                let now = Local::now();
                match screen {
                    Screen::Home => {
                        let view = HomeView::build(county.clone(), timeline, &now, units);
                        render::home(&view, units);
                    }
                    Screen::Hourly(day) => {
                        let view = HourlyView::build(county.clone(), timeline, &now, day)
                            .ok_or_else(|| anyhow!("No forecast for {day} day(s) from today"))?;
                        render::hourly(&view, units);
                    }
                    Screen::Weekly => {
                        render::weekly(&WeeklyView::build(county.clone(), timeline, &now), units)
                    }
                }
                return Ok(());
            }
            UiState::Error(message) => {
                render::status(&county, &state);
                if !ask_retry() {
                    return Err(anyhow!(message.clone()));
                }
            }
            UiState::Loading => {}
        }
    }
}

/// Non-interactive sessions cannot answer, which counts as "no".
fn ask_retry() -> bool {
    Confirm::new("重試？")
        .with_default(true)
        .prompt()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hourly_defaults_to_today() {
        let cli = Cli::try_parse_from(["weather", "hourly"]).unwrap();
        assert!(matches!(cli.command, Command::Hourly { day: 0 }));
    }

    #[test]
    fn county_override_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["weather", "weekly", "--county", "高雄市"]).unwrap();
        assert_eq!(cli.county.as_deref(), Some("高雄市"));
    }

    #[test]
    fn county_select_name_is_optional() {
        let cli = Cli::try_parse_from(["weather", "county", "select"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::County { action: CountyAction::Select { name: None } }
        ));
    }
}
