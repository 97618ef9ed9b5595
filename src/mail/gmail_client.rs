use anyhow::{Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Opaque handle for one remote message, valid only within the query
/// result that produced it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MessageRef {
    pub id: String,
}

/// Delete failures, classified the way the retry policy needs them.
#[derive(Debug, Error)]
pub enum MailboxError {
    /// Rate limiting or a server-side failure; expected to clear on retry.
    #[error("rate limit or server error (status {status})")]
    Transient { status: u16 },
    /// The message is no longer in a deletable state.
    #[error("precondition failed")]
    Precondition,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The two remote operations the deletion loop consumes.
pub trait Mailbox {
    fn search(&self, query: &str) -> Result<Vec<MessageRef>>;
    fn delete(&self, message: &MessageRef) -> Result<(), MailboxError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

/// Blocking Gmail REST client, authenticated with a bearer token.
pub struct GmailClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(GMAIL_API_BASE, access_token)
    }

    pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }
}

impl Mailbox for GmailClient {
    fn search(&self, query: &str) -> Result<Vec<MessageRef>> {
        let resp = self
            .http
            .get(format!("{}/messages", self.base_url))
            .query(&[("q", query)])
            .bearer_auth(&self.access_token)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("message search failed: status {status}: {body}"));
        }

        let list: ListResponse = resp.json()?;
        Ok(list.messages)
    }

    fn delete(&self, message: &MessageRef) -> Result<(), MailboxError> {
        let resp = self
            .http
            .delete(format!("{}/messages/{}", self.base_url, message.id))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| MailboxError::Other(e.into()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Map a non-success delete response onto the retry policy's taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> MailboxError {
    match status.as_u16() {
        429 | 500 | 503 => MailboxError::Transient {
            status: status.as_u16(),
        },
        400 if body.contains("failedPrecondition") => MailboxError::Precondition,
        _ => MailboxError::Other(anyhow!("delete failed: status {status}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        for code in [429u16, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            match classify_failure(status, "") {
                MailboxError::Transient { status } => assert_eq!(status, code),
                other => panic!("status {code} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn failed_precondition_is_precondition() {
        let body = r#"{"error": {"code": 400, "status": "FAILED_PRECONDITION", "errors": [{"reason": "failedPrecondition"}]}}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body),
            MailboxError::Precondition
        ));
    }

    #[test]
    fn plain_bad_request_is_other() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, "invalid argument"),
            MailboxError::Other(_)
        ));
    }

    #[test]
    fn not_found_is_other() {
        assert!(matches!(
            classify_failure(StatusCode::NOT_FOUND, ""),
            MailboxError::Other(_)
        ));
    }

    #[test]
    fn list_response_parses_message_ids() {
        let json = r#"{"messages": [{"id": "m1"}, {"id": "m2", "threadId": "t2"}], "resultSizeEstimate": 2}"#;
        let list: ListResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = list.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn empty_list_response_has_no_messages() {
        // Gmail omits "messages" entirely when nothing matches
        let list: ListResponse = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(list.messages.is_empty());
    }
}
