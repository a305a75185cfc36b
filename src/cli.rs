use std::io::Write;

use clap::{Parser, Subcommand};
use hot100::{
    clients::{
        ChartExtractor,
        entities::ChartDate,
        errors::{Error, Result},
    },
    runner::{Config, Runner},
};
use log::info;

const DEFAULT_DATE: &str = "2020-07-04";
const DEFAULT_MONTH_DAY: &str = "07-04";

#[derive(Parser)]
#[command(name = "hot100")]
#[command(version, about = "Turn Billboard Hot 100 charts into private Spotify playlists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one playlist per chart date
    Create {
        /// Chart dates as YYYY-MM-DD
        #[arg(default_value = DEFAULT_DATE, value_parser = parse_date)]
        dates: Vec<ChartDate>,
    },
    /// Create playlists for the same day of every year in FROM..=TO
    Years {
        from: i32,
        to: i32,
        /// Day of the year to take the chart from, as MM-DD
        #[arg(long, default_value = DEFAULT_MONTH_DAY)]
        day: String,
    },
    /// Print a chart without touching Spotify
    Show {
        #[arg(value_parser = parse_date)]
        date: ChartDate,
        /// Print the chart as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create { dates } => create_playlists(&dates).await,
        Commands::Years { from, to, day } => {
            let dates = year_range(from, to, &day)?;
            create_playlists(&dates).await
        }
        Commands::Show { date, json } => show_chart(&date, json).await,
    }
}

async fn create_playlists(dates: &[ChartDate]) -> Result<()> {
    info!("Building config ...");
    let config = Config::try_default()?;
    let runner = Runner::new(config);
    runner.run(dates).await?;
    Ok(())
}

async fn show_chart(date: &ChartDate, json: bool) -> Result<()> {
    let snapshot = ChartExtractor::try_default()?.fetch_chart(date).await?;
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &snapshot)?;
        writeln!(out)?;
    } else {
        for entry in snapshot.iter() {
            writeln!(out, "{:>3}. {} - {}", entry.rank, entry.title, entry.artist)?;
        }
    }
    Ok(())
}

fn parse_date(value: &str) -> std::result::Result<ChartDate, String> {
    value.parse().map_err(|e: Error| e.to_string())
}

fn year_range(from: i32, to: i32, month_day: &str) -> Result<Vec<ChartDate>> {
    if from > to {
        return Err(Error::InvalidDate(format!("{from}..={to}")));
    }
    (from..=to)
        .map(|year| ChartDate::from_year(year, month_day))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_to_independence_day_2020() {
        let cli = Cli::try_parse_from(["hot100", "create"]).unwrap();
        match cli.command {
            Commands::Create { dates } => {
                assert_eq!(dates, vec!["2020-07-04".parse::<ChartDate>().unwrap()]);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn create_accepts_several_dates() {
        let cli = Cli::try_parse_from(["hot100", "create", "1990-01-06", "2001-12-29"]).unwrap();
        let Commands::Create { dates } = cli.command else {
            panic!("expected create");
        };
        let dates: Vec<String> = dates.iter().map(ToString::to_string).collect();
        assert_eq!(dates, ["1990-01-06", "2001-12-29"]);
    }

    #[test]
    fn create_rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["hot100", "create", "2020-7-4x"]).is_err());
    }

    #[test]
    fn years_uses_july_fourth_by_default() {
        let cli = Cli::try_parse_from(["hot100", "years", "2018", "2020"]).unwrap();
        let Commands::Years { from, to, day } = cli.command else {
            panic!("expected years");
        };
        assert_eq!((from, to, day.as_str()), (2018, 2020, "07-04"));
    }

    #[test]
    fn show_parses_json_flag() {
        let cli = Cli::try_parse_from(["hot100", "show", "2020-07-04", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { json: true, .. }));
    }

    #[test]
    fn year_range_is_inclusive() {
        let dates: Vec<String> = year_range(2018, 2020, "07-04")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(dates, ["2018-07-04", "2019-07-04", "2020-07-04"]);
    }

    #[test]
    fn year_range_rejects_reversed_bounds_and_bad_days() {
        assert!(year_range(2021, 2020, "07-04").is_err());
        assert!(year_range(2020, 2021, "02-30").is_err());
    }
}
