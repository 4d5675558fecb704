//! In-process stand-in for the MLB Stats API, used by end-to-end tests.
//!
//! Every path under `/api` is echoed back as JSON (path, raw query and
//! decoded query) so tests can check URL construction over real HTTP. A few
//! fixed `v1/...` paths return canned teams or deliberately bad responses.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, RawQuery},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// The subset of a team record the mock serves.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
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

fn team(id: u32, name: &str, code: &str, file: &str, team_name: &str, location: &str, short: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        team_code: code.to_string(),
        file_code: file.to_string(),
        team_name: team_name.to_string(),
        location_name: location.to_string(),
        short_name: short.to_string(),
    }
}

pub fn teams() -> Vec<Team> {
    vec![
        team(116, "Detroit Tigers", "det", "det", "Tigers", "Detroit", "Detroit"),
        team(147, "New York Yankees", "nya", "nyy", "Yankees", "Bronx", "NY Yankees"),
        team(121, "New York Mets", "nyn", "nym", "Mets", "Flushing", "NY Mets"),
        team(111, "Boston Red Sox", "bos", "bos", "Red Sox", "Boston", "Boston"),
    ]
}

pub fn app() -> Router {
    Router::new()
        .route("/api/v1/teams", get(list_teams))
        .route("/api/v1/notJson", get(not_json))
        .route("/api/v1/listShaped", get(list_shaped))
        .route("/api/v1/unavailable", get(unavailable))
        .route("/api/{*path}", get(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_teams(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "copyright": "mock",
        "query": query,
        "teams": teams(),
    }))
}

async fn echo(
    uri: Uri,
    RawQuery(raw): RawQuery,
    Query(decoded): Query<BTreeMap<String, String>>,
) -> Json<Value> {
    Json(json!({
        "path": uri.path(),
        "rawQuery": raw,
        "query": decoded,
    }))
}

async fn not_json() -> Response {
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

async fn list_shaped() -> Json<Value> {
    Json(json!([{"id": 1}, {"id": 2}]))
}

async fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream maintenance").into_response()
}
