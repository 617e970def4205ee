use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Mode, Phase, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedResult {
    pub mode: Mode,
    pub item: String,
    pub index: usize,
    pub revealed_at: DateTime<Utc>,
}

/// Everything the presentation layer needs to redraw one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub mode: Mode,
    pub jar: Vec<String>,
    pub wheel: Vec<String>,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RevealedResult>,
    pub can_draw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    SessionUpdated {
        view: SessionView,
    },
    DrawStarted {
        session_id: SessionId,
        mode: Mode,
    },
    ResultRevealed {
        session_id: SessionId,
        result: RevealedResult,
    },
    SessionEnded {
        session_id: SessionId,
    },
}

impl ServerEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            ServerEvent::SessionUpdated { view } => view.session_id,
            ServerEvent::DrawStarted { session_id, .. }
            | ServerEvent::ResultRevealed { session_id, .. }
            | ServerEvent::SessionEnded { session_id } => *session_id,
        }
    }
}
