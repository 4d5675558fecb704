//! Declarative client core for the MLB Stats API.
//!
//! # Overview
//! Endpoints are described as data (URL templates, path and query
//! parameters, required-parameter groups) in a [`Registry`]. A
//! [`StatsClient`] turns an endpoint name plus JSON arguments into a
//! concrete GET request and validates the JSON response.
//!
//! # Design
//! - The registry is loaded once and immutable; the embedded upstream table
//!   is available through [`Registry::builtin`].
//! - Building (`build_request`) and parsing (`parse_response`) are pure; the
//!   network round trip is delegated to a [`Transport`], so the engine is
//!   deterministic and testable without sockets.
//! - Missing required parameters are reported before any request is sent.

pub mod classify;
pub mod client;
pub mod encode;
pub mod error;
pub mod http;
pub mod query;
pub mod registry;
pub mod resolve;
pub mod response;
pub mod schedule;
pub mod teams;
pub mod template;
pub mod transport;

pub use client::StatsClient;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use registry::{BoolParam, EndpointDescriptor, ParamSpec, Registry, StrParam};
pub use response::Payload;
pub use schedule::{schedule, ScheduleGame, ScheduleQuery};
pub use teams::{lookup_team, team_leaders, LeaderQuery, Team, TeamLookup};
pub use transport::{Transport, TransportOptions, UreqTransport};
