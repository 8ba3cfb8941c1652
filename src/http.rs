//! HTTP transport for the match engine.

use axum::{
    Json, Router,
    body::Body,
    extract::{FromRequest, Path, State, rejection::JsonRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

use crate::dto::{
    CreateMatchResponse, ErrorResponse, MatchView, MoveResponse, MovementRequest, StatusResponse,
};
use crate::engine::{ErrorClass, MatchEngine, MatchError, run_blocking};
use crate::games::tictactoe::MatchId;

/// HTTP status for each error class.
const STATUS_BY_CLASS: [(ErrorClass, StatusCode); 4] = [
    (ErrorClass::Client, StatusCode::BAD_REQUEST),
    (ErrorClass::NotFound, StatusCode::NOT_FOUND),
    (ErrorClass::Conflict, StatusCode::CONFLICT),
    (ErrorClass::Server, StatusCode::INTERNAL_SERVER_ERROR),
];

/// Looks up the HTTP status for an error class.
pub fn status_code(class: ErrorClass) -> StatusCode {
    STATUS_BY_CLASS
        .iter()
        .find(|(c, _)| *c == class)
        .map(|(_, code)| *code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for MatchError {
    fn into_response(self) -> Response {
        let status = status_code(self.class());
        let detail = if status.is_server_error() {
            error!(kind = ?self.kind(), error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            warn!(kind = ?self.kind(), error = %self, "Request rejected");
            self.message().to_string()
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// JSON body extractor whose rejections use the `{"detail": ...}` error body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_body(rejection)),
        }
    }
}

fn reject_body(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let detail = rejection.body_text();
    warn!(status = %status, detail = %detail, "Request body rejected");
    (status, Json(ErrorResponse { detail })).into_response()
}

/// Builds the router serving match operations.
///
/// Routes:
/// - `GET /create`
/// - `POST /move`
/// - `GET /status/{match_id}`
/// - `GET /matches/{match_id}`
#[instrument(skip(engine))]
pub fn router(engine: MatchEngine) -> Router {
    Router::new()
        .route("/create", get(create_match))
        .route("/move", post(make_move))
        .route("/status/{match_id}", get(match_status))
        .route("/matches/{match_id}", get(get_match))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(engine)
}

/// Unparseable ids cannot name a stored match.
fn parse_match_id(raw: &str) -> Result<MatchId, MatchError> {
    raw.parse::<MatchId>()
        .map_err(|_| MatchError::match_not_found(raw))
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

#[instrument(skip(engine))]
async fn create_match(
    State(engine): State<MatchEngine>,
) -> Result<Json<CreateMatchResponse>, MatchError> {
    info!("Create match request received");
    let created = run_blocking(move || engine.create()).await?;
    Ok(Json(CreateMatchResponse::from(&created)))
}

#[instrument(skip(engine, request), fields(match_id = %request.match_id, player = %request.player_id))]
async fn make_move(
    State(engine): State<MatchEngine>,
    JsonBody(request): JsonBody<MovementRequest>,
) -> Result<Json<MoveResponse>, MatchError> {
    info!(square = ?request.square, "Move request received");
    let movement = request.into_movement()?;
    let message = run_blocking(move || engine.make_move(&movement)).await?;
    Ok(Json(MoveResponse { message }))
}

#[instrument(skip(engine), fields(match_id = %match_id))]
async fn match_status(
    State(engine): State<MatchEngine>,
    Path(match_id): Path<String>,
) -> Result<Json<StatusResponse>, MatchError> {
    info!("Get match status request received");
    let match_id = parse_match_id(&match_id)?;
    let status = run_blocking(move || engine.status(&match_id)).await?;
    Ok(Json(StatusResponse { status }))
}

#[instrument(skip(engine), fields(match_id = %match_id))]
async fn get_match(
    State(engine): State<MatchEngine>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchView>, MatchError> {
    info!("Get match request received");
    let match_id = parse_match_id(&match_id)?;
    let record = run_blocking(move || engine.get(&match_id)).await?;
    Ok(Json(MatchView::from(record)))
}
