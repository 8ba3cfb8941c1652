//! Request and response bodies shared by the HTTP and MCP transports.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::engine::MatchError;
use crate::games::tictactoe::{Board, Coordinates, Mark, Match, MatchId, MatchStatus, Movement};

/// Target square as submitted. `x` is the row and `y` the column.
///
/// Each axis may be sent under a lower- or upper-case key. The lower-case
/// key wins unless it is absent or `null`. Values are kept raw so that a
/// malformed coordinate reaches the engine as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SquareRequest {
    /// Row index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    /// Row index, upper-case spelling.
    #[serde(default, rename = "X", skip_serializing_if = "Option::is_none")]
    pub upper_x: Option<Value>,
    /// Column index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    /// Column index, upper-case spelling.
    #[serde(default, rename = "Y", skip_serializing_if = "Option::is_none")]
    pub upper_y: Option<Value>,
}

impl SquareRequest {
    /// Square with both axes under the lower-case keys.
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            x: Some(Value::from(x)),
            y: Some(Value::from(y)),
            ..Self::default()
        }
    }

    /// Resolves both axes, `None` if either is missing or not an integer.
    pub fn resolve(&self) -> Option<Coordinates> {
        let row = axis(self.x.as_ref(), self.upper_x.as_ref())?;
        let col = axis(self.y.as_ref(), self.upper_y.as_ref())?;
        Some(Coordinates::new(row, col))
    }
}

fn axis(lower: Option<&Value>, upper: Option<&Value>) -> Option<i64> {
    lower
        .filter(|v| !v.is_null())
        .or(upper)
        .and_then(Value::as_i64)
}

/// Reads any JSON value as text: strings as is, `null` as empty, anything
/// else in its JSON form. The engine decides whether the text is a mark.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Body of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    /// Match to play in.
    pub match_id: String,
    /// Acting mark, `X` or `O`.
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "String")]
    pub player_id: String,
    /// Target square.
    #[serde(default)]
    pub square: SquareRequest,
}

impl MovementRequest {
    /// Normalizes the request into an engine [`Movement`].
    ///
    /// # Errors
    ///
    /// Returns a `MatchNotFound` [`MatchError`] if the match id is not a UUID,
    /// since no match can have that id.
    #[instrument(skip(self), fields(match_id = %self.match_id))]
    pub fn into_movement(self) -> Result<Movement, MatchError> {
        let match_id = self
            .match_id
            .parse::<MatchId>()
            .map_err(|_| MatchError::match_not_found(&self.match_id))?;
        Ok(Movement::new(match_id, self.player_id, self.square.resolve()))
    }
}

/// Body of a status request for transports without path parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    /// Match to inspect.
    pub match_id: String,
}

impl StatusRequest {
    /// Parses the match id.
    ///
    /// # Errors
    ///
    /// Returns a `MatchNotFound` [`MatchError`] if the id is not a UUID.
    pub fn match_id(&self) -> Result<MatchId, MatchError> {
        self.match_id
            .parse::<MatchId>()
            .map_err(|_| MatchError::match_not_found(&self.match_id))
    }
}

/// Reply to a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchResponse {
    /// New match id.
    pub match_id: MatchId,
    /// Mark that moves first.
    pub turn: Mark,
}

impl From<&Match> for CreateMatchResponse {
    fn from(record: &Match) -> Self {
        Self {
            match_id: *record.id(),
            turn: *record.turn(),
        }
    }
}

/// Reply to a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Outcome announcement.
    pub message: String,
}

/// Reply to a status request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Current status.
    pub status: MatchStatus,
}

/// Full view of a match for clients that render the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    /// Match id.
    pub match_id: MatchId,
    /// Board as a list of rows.
    pub board: Board,
    /// Mark to move next.
    pub turn: Mark,
    /// Current status.
    pub status: MatchStatus,
}

impl From<Match> for MatchView {
    fn from(record: Match) -> Self {
        Self {
            match_id: *record.id(),
            turn: *record.turn(),
            status: *record.status(),
            board: record.board().clone(),
        }
    }
}

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub detail: String,
}
