//! MCP tool server exposing the match engine.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::dto::{CreateMatchResponse, MoveResponse, MovementRequest, StatusRequest, StatusResponse};
use crate::engine::{ErrorClass, MatchEngine, MatchError, run_blocking};

/// Converts an engine error into an MCP error of the matching class.
pub fn to_mcp_error(err: MatchError) -> McpError {
    match err.class() {
        ErrorClass::Server => {
            error!(kind = ?err.kind(), error = %err, "Tool call failed");
            McpError::internal_error("Internal server error", None)
        }
        ErrorClass::NotFound => {
            warn!(kind = ?err.kind(), error = %err, "Tool call rejected");
            McpError::resource_not_found(err.message().to_string(), None)
        }
        ErrorClass::Client | ErrorClass::Conflict => {
            warn!(kind = ?err.kind(), error = %err, "Tool call rejected");
            McpError::invalid_params(err.message().to_string(), None)
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(value).map_err(|e| {
        error!(error = %e, "Failed to encode tool result");
        McpError::internal_error(format!("Failed to encode result: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP handler serving match tools.
pub struct MatchServer {
    engine: MatchEngine,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MatchServer {
    /// Creates a server over the given engine.
    #[instrument(skip(engine))]
    pub fn new(engine: MatchEngine) -> Self {
        info!("Creating MCP match server");
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    /// Creates a new match.
    #[instrument(skip(self))]
    #[tool(description = "Create a new tic-tac-toe match. Returns the match id and the mark that moves first (X).")]
    pub async fn create_match(&self) -> Result<CallToolResult, McpError> {
        info!("Create match tool called");
        let engine = self.engine.clone();
        let created = run_blocking(move || engine.create())
            .await
            .map_err(to_mcp_error)?;
        json_result(&CreateMatchResponse::from(&created))
    }

    /// Places a mark.
    #[instrument(skip(self, req), fields(match_id = %req.match_id, player = %req.player_id))]
    #[tool(description = "Place your mark. playerId is X or O; square.x is the row and square.y the column, both 0-2.")]
    pub async fn make_move(
        &self,
        Parameters(req): Parameters<MovementRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!(square = ?req.square, "Make move tool called");
        let movement = req.into_movement().map_err(to_mcp_error)?;
        let engine = self.engine.clone();
        let message = run_blocking(move || engine.make_move(&movement))
            .await
            .map_err(to_mcp_error)?;
        json_result(&MoveResponse { message })
    }

    /// Reports a match status.
    #[instrument(skip(self, req), fields(match_id = %req.match_id))]
    #[tool(description = "Get the status of a match: PLAYING, WINNER or DRAW.")]
    pub async fn get_status(
        &self,
        Parameters(req): Parameters<StatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!("Get status tool called");
        let match_id = req.match_id().map_err(to_mcp_error)?;
        let engine = self.engine.clone();
        let status = run_blocking(move || engine.status(&match_id))
            .await
            .map_err(to_mcp_error)?;
        json_result(&StatusResponse { status })
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for MatchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Tic-tac-toe match service: create_match, make_move, get_status".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryMatchStore;
    use crate::dto::SquareRequest;
    use crate::engine::MatchErrorKind;
    use rmcp::model::ErrorCode;
    use std::sync::Arc;

    fn server() -> MatchServer {
        MatchServer::new(MatchEngine::with_tracing(Arc::new(InMemoryMatchStore::new())))
    }

    #[test]
    fn test_error_classes_map_to_mcp_codes() {
        let not_found = to_mcp_error(MatchError::match_not_found("abc"));
        assert_eq!(not_found.code, ErrorCode::RESOURCE_NOT_FOUND);

        let client = to_mcp_error(MatchError::new(MatchErrorKind::NotYourTurn, "turn"));
        assert_eq!(client.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(client.message, "turn");

        let server = to_mcp_error(MatchError::internal("boom"));
        assert_eq!(server.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(server.message, "Internal server error");
    }

    fn tool_json(result: &CallToolResult) -> serde_json::Value {
        assert_ne!(result.is_error, Some(true));
        let text = result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|content| content.text.clone())
            .expect("Tool returned no text content");
        serde_json::from_str(&text).expect("Tool returned invalid JSON")
    }

    #[tokio::test]
    async fn test_tools_play_a_move() {
        let server = server();
        let created = tool_json(&server.create_match().await.expect("create_match failed"));
        assert_eq!(created["turn"], "X");
        let id = created["matchId"]
            .as_str()
            .expect("matchId missing")
            .to_string();

        let request = MovementRequest {
            match_id: id.clone(),
            player_id: "X".to_string(),
            square: SquareRequest::at(1, 1),
        };
        let moved = tool_json(
            &server
                .make_move(Parameters(request))
                .await
                .expect("make_move failed"),
        );
        assert_eq!(moved["message"], "Movement performed. Next turn: O");

        let status = tool_json(
            &server
                .get_status(Parameters(StatusRequest { match_id: id }))
                .await
                .expect("get_status failed"),
        );
        assert_eq!(status["status"], "PLAYING");
    }

    #[tokio::test]
    async fn test_unknown_match_tool_call_fails() {
        let err = server()
            .get_status(Parameters(StatusRequest {
                match_id: "not-a-uuid".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }
}
