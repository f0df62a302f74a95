use serde::{Deserialize, Serialize};
use typeahead_core::{Key, View};

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub event: FrontendEvent,
}

/// Events a frontend reports for its input box and dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrontendEvent {
    InputChanged { value: String },
    KeyPressed { key: Key },
    RowClicked { index: usize },
    TrendingClicked { index: usize },
    ClickedOutside,
    Ping,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontendResponse {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl FrontendResponse {
    /// Unsolicited update pushed by the session.
    pub fn push(body: ResponseBody) -> Self {
        Self {
            id: String::new(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBody {
    View(View),
    SetInput { value: String },
    Trending { items: Vec<String>, visible: bool },
    Status { message: String },
    Pong,
    Error(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    SessionClosed,
}
