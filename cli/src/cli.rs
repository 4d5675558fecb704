//! Command-line arguments for `statsapi`.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query the MLB Stats API through its endpoint registry
#[derive(Parser, Debug)]
#[command(name = "statsapi", version, about)]
pub struct Cli {
    /// Override the registry's base URL
    #[arg(long, env = "STATSAPI_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Load endpoints from a registry JSON file instead of the embedded one
    #[arg(long, env = "STATSAPI_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "STATSAPI_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List endpoint names and URL templates
    Endpoints {
        /// Also print usage notes
        #[arg(long)]
        notes: bool,
    },
    /// Print the URL a call would request, without sending it
    Url(CallArgs),
    /// Call an endpoint and print the JSON response
    Get(CallArgs),
    /// Find teams by name, code or location
    LookupTeam(LookupTeamArgs),
    /// Show a team's statistical leaders
    TeamLeaders(TeamLeadersArgs),
    /// List scheduled games, today's by default
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Endpoint name (see `statsapi endpoints`)
    pub endpoint: String,

    /// Parameters as key=value
    #[arg(value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct LookupTeamArgs {
    /// Text to look for in team names
    pub value: String,

    #[arg(long)]
    pub season: Option<u16>,

    /// Y for active teams, N for inactive, B for both
    #[arg(long, default_value = "Y")]
    pub active_status: String,

    #[arg(long, value_delimiter = ',', default_value = "1")]
    pub sport_ids: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct TeamLeadersArgs {
    #[arg(long)]
    pub team_id: u32,

    /// Comma-separated leader categories, e.g. homeRuns,hits
    #[arg(long, value_delimiter = ',', required = true)]
    pub categories: Vec<String>,

    /// Defaults to the current year
    #[arg(long)]
    pub season: Option<u16>,

    #[arg(long, default_value = "R")]
    pub game_types: String,

    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Single date, YYYY-MM-DD
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub team_id: Option<u32>,

    #[arg(long)]
    pub opponent_id: Option<u32>,

    #[arg(long, default_value_t = 1)]
    pub sport_id: u32,

    #[arg(long)]
    pub game_pk: Option<u64>,

    #[arg(long)]
    pub league_id: Option<u32>,

    #[arg(long)]
    pub season: Option<u16>,

    /// Skip the playoff series status
    #[arg(long)]
    pub no_series_status: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("fields=a=b").unwrap(),
            ("fields".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_key_value("year=").unwrap(), ("year".to_string(), String::new()));
        assert!(parse_key_value("year").is_err());
        assert!(parse_key_value("=2023").is_err());
    }

    #[test]
    fn parses_get_with_params() {
        let cli = Cli::try_parse_from([
            "statsapi",
            "--base-url",
            "http://localhost:3000/api",
            "get",
            "draft",
            "prospects=true",
            "year=2023",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000/api"));
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.endpoint, "draft");
                assert_eq!(args.params.len(), 2);
                assert_eq!(args.params[1], ("year".to_string(), "2023".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lookup_team_defaults() {
        let cli = Cli::try_parse_from(["statsapi", "lookup-team", "Tigers"]).unwrap();
        match cli.command {
            Commands::LookupTeam(args) => {
                assert_eq!(args.value, "Tigers");
                assert_eq!(args.active_status, "Y");
                assert_eq!(args.sport_ids, vec![1]);
                assert!(args.season.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn team_leaders_requires_categories() {
        assert!(Cli::try_parse_from(["statsapi", "team-leaders", "--team-id", "116"]).is_err());
        let cli = Cli::try_parse_from([
            "statsapi",
            "team-leaders",
            "--team-id",
            "116",
            "--season",
            "2024",
            "--categories",
            "homeRuns,hits",
        ])
        .unwrap();
        match cli.command {
            Commands::TeamLeaders(args) => {
                assert_eq!(args.categories, vec!["homeRuns", "hits"]);
                assert_eq!(args.limit, 10);
                assert_eq!(args.season, Some(2024));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn schedule_parses_dates_and_defaults() {
        let cli = Cli::try_parse_from([
            "statsapi",
            "schedule",
            "--start-date",
            "2024-07-01",
            "--end-date",
            "2024-07-07",
            "--team-id",
            "147",
        ])
        .unwrap();
        match cli.command {
            Commands::Schedule(args) => {
                assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 7, 1));
                assert_eq!(args.end_date, NaiveDate::from_ymd_opt(2024, 7, 7));
                assert_eq!(args.team_id, Some(147));
                assert_eq!(args.sport_id, 1);
                assert!(!args.no_series_status);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn schedule_rejects_date_with_range() {
        assert!(Cli::try_parse_from([
            "statsapi",
            "schedule",
            "--date",
            "2024-07-04",
            "--start-date",
            "2024-07-01",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["statsapi", "schedule", "--date", "07/04/2024"]).is_err());
    }
}
