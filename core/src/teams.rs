//! Convenience lookups built on the generic `call` path.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::StatsClient;
use crate::error::ApiError;
use crate::response::Payload;
use crate::transport::Transport;

/// Name fields searched by [`lookup_team`].
const TEAM_NAME_FIELDS: [&str; 6] = [
    "name",
    "teamCode",
    "fileCode",
    "teamName",
    "locationName",
    "shortName",
];

/// A team record as returned by the `teams` endpoint, reduced to its
/// identifying fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub team_code: String,
    pub file_code: String,
    pub team_name: String,
    pub location_name: String,
    pub short_name: String,
}

/// Parameters for [`lookup_team`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLookup {
    /// Matched case-insensitively as a substring of any team name field.
    pub value: String,
    pub active_status: String,
    pub season: Option<u16>,
    pub sport_ids: Vec<u32>,
}

impl TeamLookup {
    /// Active major-league teams matching `value`.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            active_status: "Y".to_string(),
            season: None,
            sport_ids: vec![1],
        }
    }
}

/// Parameters for [`team_leaders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderQuery {
    pub team_id: u32,
    pub categories: Vec<String>,
    /// Defaults to the current calendar year.
    pub season: Option<u16>,
    /// `R` regular season, `P` postseason, and so on.
    pub game_types: String,
    pub limit: u32,
}

impl LeaderQuery {
    pub fn new(team_id: u32, categories: &[&str]) -> Self {
        Self {
            team_id,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            season: None,
            game_types: "R".to_string(),
            limit: 10,
        }
    }
}

/// Teams whose name, code or location contains `lookup.value`.
pub fn lookup_team<T: Transport + ?Sized>(
    client: &StatsClient,
    transport: &T,
    lookup: &TeamLookup,
) -> Result<Vec<Team>, ApiError> {
    let args = json!({
        "activeStatus": lookup.active_status,
        "season": lookup.season,
        "sportIds": lookup.sport_ids,
    });
    let request = client.build_request("teams", &args)?;
    let response = transport.get(&request)?;
    let payload = client.parse_response(&request, response)?;
    let needle = lookup.value.to_lowercase();

    let mut matches = Vec::new();
    for team in teams_array(&request.url, &payload)? {
        let hit = TEAM_NAME_FIELDS.iter().any(|field| {
            team.get(*field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        });
        if hit {
            let team: Team = serde_json::from_value(team.clone()).map_err(|e| {
                ApiError::ResponseShape {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            })?;
            matches.push(team);
        }
    }
    Ok(matches)
}

/// Leader board for one team. The payload is returned as validated by the
/// generic envelope check.
pub fn team_leaders<T: Transport + ?Sized>(
    client: &StatsClient,
    transport: &T,
    query: &LeaderQuery,
) -> Result<Payload, ApiError> {
    let args = json!({
        "teamId": query.team_id,
        "leaderCategories": query.categories,
        "season": query.season.map_or_else(current_season, i32::from),
        "leaderGameTypes": query.game_types,
        "limit": query.limit,
    });
    client.call(transport, "team_leaders", &args)
}

fn current_season() -> i32 {
    Utc::now().year()
}

fn teams_array<'a>(url: &str, payload: &'a Payload) -> Result<&'a Vec<Value>, ApiError> {
    payload
        .get("teams")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::ResponseShape {
            url: url.to_string(),
            message: "missing \"teams\" array".to_string(),
        })
}
