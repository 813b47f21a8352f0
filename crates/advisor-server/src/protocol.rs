//! Request and response bodies of the chat API.

use serde::{Deserialize, Serialize};

use advisor_common::SessionId;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SendMessageResponse {
    pub session_id: SessionId,
    pub reply: String,
    /// The tool round ceiling cut the exchange short.
    pub capped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_session_ids_are_accepted() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"session_id": 12, "message": "hi"}"#).unwrap();
        assert_eq!(req.session_id.as_str(), "12");
    }

    #[test]
    fn blank_session_id_is_rejected() {
        let res: Result<CreateSessionRequest, _> = serde_json::from_str(r#"{"session_id": " "}"#);
        assert!(res.is_err());
    }
}
