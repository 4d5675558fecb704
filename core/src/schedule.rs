//! Game schedule lookups, flattened into one record per game.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::StatsClient;
use crate::error::ApiError;
use crate::transport::Transport;

/// Date format accepted by the `schedule` endpoint.
const DATE_FORMAT: &str = "%Y-%m-%d";

const HYDRATE: &str = "decisions,probablePitcher,linescore";

/// Parameters for [`schedule`]. Unset filters are left out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub team_id: Option<u32>,
    pub opponent_id: Option<u32>,
    pub sport_id: u32,
    pub game_pk: Option<u64>,
    pub league_id: Option<u32>,
    pub season: Option<u16>,
    /// Also hydrate the playoff series status of each game.
    pub include_series_status: bool,
}

impl Default for ScheduleQuery {
    /// Today's major-league games.
    fn default() -> Self {
        Self {
            date: None,
            start_date: None,
            end_date: None,
            team_id: None,
            opponent_id: None,
            sport_id: 1,
            game_pk: None,
            league_id: None,
            season: None,
            include_series_status: true,
        }
    }
}

/// One scheduled game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleGame {
    pub game_id: u64,
    pub game_datetime: String,
    pub game_date: String,
    pub game_type: String,
    pub status: String,
    pub away_name: String,
    pub home_name: String,
    pub away_id: u32,
    pub home_id: u32,
    pub doubleheader: bool,
    pub game_num: u32,
    pub away_score: Option<u32>,
    pub home_score: Option<u32>,
    pub current_inning: Option<u32>,
    pub inning_state: Option<String>,
    pub venue_id: Option<u32>,
    pub venue_name: Option<String>,
    pub away_probable_pitcher: Option<String>,
    pub home_probable_pitcher: Option<String>,
    pub series_status: Option<String>,
    pub winning_team: Option<String>,
    pub losing_team: Option<String>,
    pub winning_pitcher: Option<String>,
    pub losing_pitcher: Option<String>,
    pub save_pitcher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    #[serde(default)]
    dates: Vec<RawDate>,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    #[serde(default)]
    games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    game_pk: u64,
    game_date: String,
    official_date: String,
    game_type: String,
    status: RawStatus,
    teams: RawMatchup,
    #[serde(default)]
    double_header: String,
    #[serde(default)]
    game_number: u32,
    venue: Option<RawNamed>,
    linescore: Option<RawLinescore>,
    decisions: Option<RawDecisions>,
    series_status: Option<RawSeriesStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    detailed_state: String,
}

#[derive(Debug, Deserialize)]
struct RawMatchup {
    away: RawSide,
    home: RawSide,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSide {
    team: RawNamed,
    score: Option<u32>,
    is_winner: Option<bool>,
    probable_pitcher: Option<RawPerson>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    id: u32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLinescore {
    current_inning: Option<u32>,
    inning_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDecisions {
    winner: Option<RawPerson>,
    loser: Option<RawPerson>,
    save: Option<RawPerson>,
}

#[derive(Debug, Deserialize)]
struct RawSeriesStatus {
    result: Option<String>,
}

impl From<RawGame> for ScheduleGame {
    fn from(game: RawGame) -> Self {
        let RawMatchup { away, home } = game.teams;
        let (winning_team, losing_team) = match (away.is_winner, home.is_winner) {
            (Some(true), _) => (Some(away.team.name.clone()), Some(home.team.name.clone())),
            (_, Some(true)) => (Some(home.team.name.clone()), Some(away.team.name.clone())),
            _ => (None, None),
        };
        let (current_inning, inning_state) = game
            .linescore
            .map_or((None, None), |l| (l.current_inning, l.inning_state));
        let (winning_pitcher, losing_pitcher, save_pitcher) = match game.decisions {
            Some(d) => (
                d.winner.map(|p| p.full_name),
                d.loser.map(|p| p.full_name),
                d.save.map(|p| p.full_name),
            ),
            None => (None, None, None),
        };

        Self {
            game_id: game.game_pk,
            game_datetime: game.game_date,
            game_date: game.official_date,
            game_type: game.game_type,
            status: game.status.detailed_state,
            away_name: away.team.name,
            home_name: home.team.name,
            away_id: away.team.id,
            home_id: home.team.id,
            doubleheader: !matches!(game.double_header.as_str(), "" | "N"),
            game_num: game.game_number,
            away_score: away.score,
            home_score: home.score,
            current_inning,
            inning_state,
            venue_id: game.venue.as_ref().map(|v| v.id),
            venue_name: game.venue.map(|v| v.name),
            away_probable_pitcher: away.probable_pitcher.map(|p| p.full_name),
            home_probable_pitcher: home.probable_pitcher.map(|p| p.full_name),
            series_status: game.series_status.and_then(|s| s.result),
            winning_team,
            losing_team,
            winning_pitcher,
            losing_pitcher,
            save_pitcher,
        }
    }
}

/// Games matching `query`, across every date in the response.
pub fn schedule<T: Transport + ?Sized>(
    client: &StatsClient,
    transport: &T,
    query: &ScheduleQuery,
) -> Result<Vec<ScheduleGame>, ApiError> {
    let format_date = |date: Option<NaiveDate>| date.map(|d| d.format(DATE_FORMAT).to_string());
    let hydrate = if query.include_series_status {
        format!("{HYDRATE},seriesStatus")
    } else {
        HYDRATE.to_string()
    };
    let args = json!({
        "hydrate": hydrate,
        "date": format_date(query.date),
        "startDate": format_date(query.start_date),
        "endDate": format_date(query.end_date),
        "teamId": query.team_id,
        "opponentId": query.opponent_id,
        "sportId": query.sport_id,
        "gamePk": query.game_pk,
        "leagueId": query.league_id,
        "season": query.season,
    });

    let request = client.build_request("schedule", &args)?;
    let response = transport.get(&request)?;
    let payload = client.parse_response(&request, response)?;

    let raw: RawSchedule =
        serde_json::from_value(Value::Object(payload)).map_err(|e| ApiError::ResponseShape {
            url: request.url.clone(),
            message: e.to_string(),
        })?;
    let games: Vec<ScheduleGame> = raw
        .dates
        .into_iter()
        .flat_map(|date| date.games)
        .map(ScheduleGame::from)
        .collect();
    debug!(url = %request.url, games = games.len(), "schedule loaded");
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::registry::Registry;
    use std::cell::RefCell;

    const SCHEDULE: &str = r#"{"totalGames": 2, "dates": [
        {"date": "2024-07-04", "games": [
            {"gamePk": 745804, "gameDate": "2024-07-04T17:05:00Z", "officialDate": "2024-07-04",
             "gameType": "R", "doubleHeader": "N", "gameNumber": 1,
             "status": {"detailedState": "Final"},
             "teams": {
                "away": {"team": {"id": 116, "name": "Detroit Tigers"}, "score": 3, "isWinner": false},
                "home": {"team": {"id": 147, "name": "New York Yankees"}, "score": 5, "isWinner": true}
             },
             "venue": {"id": 3313, "name": "Yankee Stadium"},
             "linescore": {"currentInning": 9, "inningState": "Bottom"},
             "decisions": {"winner": {"id": 1, "fullName": "Gerrit Cole"},
                           "loser": {"id": 2, "fullName": "Tarik Skubal"}}}
        ]},
        {"date": "2024-07-05", "games": [
            {"gamePk": 745820, "gameDate": "2024-07-05T23:05:00Z", "officialDate": "2024-07-05",
             "gameType": "R", "doubleHeader": "S", "gameNumber": 2,
             "status": {"detailedState": "Scheduled"},
             "teams": {
                "away": {"team": {"id": 116, "name": "Detroit Tigers"},
                         "probablePitcher": {"id": 3, "fullName": "Jack Flaherty"}},
                "home": {"team": {"id": 147, "name": "New York Yankees"}}
             }}
        ]}
    ]}"#;

    fn client() -> StatsClient {
        StatsClient::with_base_url(Registry::builtin().unwrap(), "http://mock/api").unwrap()
    }

    fn respond<'a>(
        body: &'static str,
        seen: &'a RefCell<Vec<String>>,
    ) -> impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + 'a {
        move |req: &HttpRequest| {
            seen.borrow_mut().push(req.url.clone());
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    #[test]
    fn flattens_games_across_dates() {
        let seen = RefCell::new(Vec::new());
        let transport = respond(SCHEDULE, &seen);
        let games = schedule(&client(), &transport, &ScheduleQuery::default()).unwrap();

        assert_eq!(games.len(), 2);
        let final_game = &games[0];
        assert_eq!(final_game.game_id, 745804);
        assert_eq!(final_game.game_date, "2024-07-04");
        assert_eq!(final_game.status, "Final");
        assert_eq!(final_game.home_score, Some(5));
        assert_eq!(final_game.winning_team.as_deref(), Some("New York Yankees"));
        assert_eq!(final_game.losing_team.as_deref(), Some("Detroit Tigers"));
        assert_eq!(final_game.winning_pitcher.as_deref(), Some("Gerrit Cole"));
        assert_eq!(final_game.save_pitcher, None);
        assert_eq!(final_game.venue_name.as_deref(), Some("Yankee Stadium"));
        assert_eq!(final_game.current_inning, Some(9));
        assert!(!final_game.doubleheader);

        let upcoming = &games[1];
        assert!(upcoming.doubleheader);
        assert_eq!(upcoming.game_num, 2);
        assert_eq!(upcoming.away_probable_pitcher.as_deref(), Some("Jack Flaherty"));
        assert_eq!(upcoming.home_probable_pitcher, None);
        assert_eq!(upcoming.winning_team, None);
        assert_eq!(upcoming.venue_id, None);

        assert_eq!(
            seen.borrow()[0],
            "http://mock/api/v1/schedule?hydrate=decisions%2CprobablePitcher%2Clinescore%2CseriesStatus&sportId=1"
        );
    }

    #[test]
    fn filters_follow_registry_order() {
        let seen = RefCell::new(Vec::new());
        let transport = respond(r#"{"dates": []}"#, &seen);
        let query = ScheduleQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 7),
            team_id: Some(147),
            opponent_id: Some(116),
            include_series_status: false,
            ..ScheduleQuery::default()
        };
        let games = schedule(&client(), &transport, &query).unwrap();
        assert!(games.is_empty());
        assert_eq!(
            seen.borrow()[0],
            "http://mock/api/v1/schedule?hydrate=decisions%2CprobablePitcher%2Clinescore\
             &teamId=147&sportId=1&startDate=2024-07-01&endDate=2024-07-07&opponentId=116"
        );
    }

    #[test]
    fn missing_dates_is_an_empty_schedule() {
        let seen = RefCell::new(Vec::new());
        let transport = respond(r#"{"copyright": "x"}"#, &seen);
        let query = ScheduleQuery {
            game_pk: Some(745804),
            ..ScheduleQuery::default()
        };
        assert!(schedule(&client(), &transport, &query).unwrap().is_empty());
        assert!(seen.borrow()[0].contains("&gamePk=745804"));
    }

    #[test]
    fn game_without_teams_is_a_shape_error() {
        let seen = RefCell::new(Vec::new());
        let transport = respond(r#"{"dates": [{"games": [{"gamePk": 1}]}]}"#, &seen);
        let err = schedule(&client(), &transport, &ScheduleQuery::default()).unwrap_err();
        assert!(matches!(err, ApiError::ResponseShape { .. }));
    }
}
