//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};

use crate::domain::{Coordinates, TransitError};
use crate::graph::{GraphMutator, InsertionOutcome, Snapshot, StationInsertion};
use crate::planner::{TimePlanner, TransferPlanner};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query", post(plan_route))
        .route("/stations", get(list_stations))
        .route("/network", get(network_snapshot))
        .route("/network/stations", post(insert_station))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a route between two stations.
async fn plan_route(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: RouteQueryRequest = parse_body(&body)?;

    // One read guard for the whole search: the query never observes a
    // half-applied mutation.
    let network = state.network.read().await;

    match request.mode {
        QueryMode::Time => {
            let path = TimePlanner::new(&network, &state.search)
                .shortest_path(&request.start, &request.end)?;
            info!(start = %request.start, end = %request.end, time = path.total_minutes,
                "time query served");
            Ok(Json(RouteResult::from_path(&path)).into_response())
        }
        QueryMode::Transfers => {
            let paths = TransferPlanner::new(&network, &state.search)
                .fewest_transfers(&request.start, &request.end)?;
            info!(start = %request.start, end = %request.end, alternatives = paths.len(),
                "transfer query served");
            Ok(Json(AlternativesResponse {
                all_paths: paths.iter().map(RouteResult::from_path).collect(),
            })
            .into_response())
        }
    }
}

/// List every station with the lines passing through it.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationSummary>> {
    let network = state.network.read().await;
    let mut stations: Vec<StationSummary> = network
        .graph
        .stations()
        .map(|station| StationSummary {
            name: station.name.clone(),
            lines: network
                .index
                .links(&station.name)
                .map(|links| links.lines.iter().cloned().collect())
                .unwrap_or_default(),
        })
        .collect();
    stations.sort_by(|a, b| a.name.cmp(&b.name));
    Json(stations)
}

/// The current network in the durable snapshot format.
async fn network_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    let network = state.network.read().await;
    Json(network.snapshot())
}

/// Insert a station onto an existing or brand-new line.
///
/// Always answers 200 with `{success, message}`; failed validation is a
/// business outcome here, not a transport error.
async fn insert_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MutationResponse>, ApiError> {
    let request: InsertStationRequest = parse_body(&body)?;

    let insertion = match build_insertion(&request) {
        Ok(insertion) => insertion,
        Err(err) => return Ok(Json(rejection(err))),
    };

    let mut network = state.network.write().await;
    let mut mutator = GraphMutator::new(&mut network, &state.mutator);
    match mutator.insert_station(&insertion) {
        Ok(outcome) => Ok(Json(MutationResponse {
            success: true,
            message: insertion_message(&outcome),
        })),
        Err(err) => Ok(Json(rejection(err))),
    }
}

fn build_insertion(request: &InsertStationRequest) -> Result<StationInsertion, TransitError> {
    let coords = Coordinates::new(request.station.lat, request.station.lng)?;
    Ok(StationInsertion {
        name: request.station.name.clone(),
        coords,
        line: request.line.name.clone(),
        line_speed: request.line.speed,
        new_line: request.is_new_line,
        seed_stations: request.line_stations.clone(),
        connections: request.connections.clone(),
    })
}

fn rejection(err: TransitError) -> MutationResponse {
    warn!(error = %err, "station insertion rejected");
    MutationResponse {
        success: false,
        message: err.to_string(),
    }
}

fn insertion_message(outcome: &InsertionOutcome) -> String {
    let connections = if outcome.connected.is_empty() {
        "no connections".to_string()
    } else {
        outcome
            .connected
            .iter()
            .map(|(station, meters)| format!("{station} ({meters:.0} m)"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    if outcome.created_line {
        format!(
            "station {} added on new line {}; connected to: {connections}",
            outcome.station, outcome.line
        )
    } else {
        format!(
            "station {} added to line {}; connected to: {connections}",
            outcome.station, outcome.line
        )
    }
}

/// Parse JSON manually so malformed bodies get the `{error}` shape too.
fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::BadRequest {
        message: format!("invalid request body: {err}"),
    })
}

/// Application error type, mapped onto the `{error}` wire shape.
#[derive(Debug)]
enum ApiError {
    BadRequest { message: String },
    Transit(TransitError),
}

impl From<TransitError> for ApiError {
    fn from(err: TransitError) -> Self {
        ApiError::Transit(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Transit(err) => {
                let status = match err {
                    TransitError::StationNotFound(_)
                    | TransitError::LineNotFound(_)
                    | TransitError::NoRouteFound { .. } => StatusCode::NOT_FOUND,
                    TransitError::ComputationTimeout => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        };

        warn!(%status, %message, "request failed");
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_message_lists_connections() {
        let outcome = InsertionOutcome {
            station: "Hub".into(),
            line: "Blue".into(),
            created_line: true,
            connected: vec![("Central".into(), 750.0)],
        };
        assert_eq!(
            insertion_message(&outcome),
            "station Hub added on new line Blue; connected to: Central (750 m)"
        );
    }

    #[test]
    fn insertion_message_without_connections() {
        let outcome = InsertionOutcome {
            station: "Outpost".into(),
            line: "Ferry".into(),
            created_line: true,
            connected: vec![],
        };
        assert_eq!(
            insertion_message(&outcome),
            "station Outpost added on new line Ferry; connected to: no connections"
        );
    }

    #[test]
    fn parse_body_reports_bad_json() {
        let err = parse_body::<RouteQueryRequest>(&Bytes::from_static(b"{nope")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }
}
