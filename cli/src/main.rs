mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use statsapi_core::{
    lookup_team, schedule, team_leaders, LeaderQuery, Registry, ScheduleQuery, StatsClient,
    TeamLookup, TransportOptions, UreqTransport,
};
use tracing::debug;

use cli::{CallArgs, Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let registry = match &cli.registry {
        Some(path) => Arc::new(
            Registry::from_path(path)
                .with_context(|| format!("loading registry {}", path.display()))?,
        ),
        None => Registry::builtin()?,
    };
    debug!(endpoints = registry.len(), "registry loaded");

    let client = match &cli.base_url {
        Some(base_url) => StatsClient::with_base_url(registry, base_url)?,
        None => StatsClient::new(registry)?,
    };
    let transport = UreqTransport::new(&TransportOptions {
        timeout_secs: Some(cli.timeout_secs),
        ..TransportOptions::default()
    });

    match cli.command {
        Commands::Endpoints { notes } => {
            for descriptor in client.registry().iter() {
                println!("{:<28} {}", descriptor.name(), descriptor.template().as_str());
                if notes {
                    if let Some(note) = descriptor.note() {
                        println!("{:<28} note: {note}", "");
                    }
                }
            }
        }
        Commands::Url(args) => {
            let request = client.build_request(&args.endpoint, &call_args(&args))?;
            println!("{}", request.url);
        }
        Commands::Get(args) => {
            let payload = client
                .call(&transport, &args.endpoint, &call_args(&args))
                .with_context(|| format!("calling {}", args.endpoint))?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::LookupTeam(args) => {
            let lookup = TeamLookup {
                season: args.season,
                active_status: args.active_status,
                sport_ids: args.sport_ids,
                ..TeamLookup::new(&args.value)
            };
            let teams = lookup_team(&client, &transport, &lookup)?;
            println!("{}", serde_json::to_string_pretty(&teams)?);
        }
        Commands::TeamLeaders(args) => {
            let query = LeaderQuery {
                team_id: args.team_id,
                categories: args.categories,
                season: args.season,
                game_types: args.game_types,
                limit: args.limit,
            };
            let payload = team_leaders(&client, &transport, &query)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Schedule(args) => {
            let query = ScheduleQuery {
                date: args.date,
                start_date: args.start_date,
                end_date: args.end_date,
                team_id: args.team_id,
                opponent_id: args.opponent_id,
                sport_id: args.sport_id,
                game_pk: args.game_pk,
                league_id: args.league_id,
                season: args.season,
                include_series_status: !args.no_series_status,
            };
            let games = schedule(&client, &transport, &query)?;
            println!("{}", serde_json::to_string_pretty(&games)?);
        }
    }
    Ok(())
}

fn call_args(args: &CallArgs) -> Value {
    let map: Map<String, Value> = args
        .params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(map)
}
