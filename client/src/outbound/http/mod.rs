//! Reqwest-backed adapters for the review service's JSON API.
//!
//! These adapters own transport details only: request serialisation,
//! timeout, HTTP status mapping, and JSON decoding into domain types. The
//! service reports failures as `{ "message": ... }` payloads; that wording
//! is carried into the port errors so the application layer can surface it
//! verbatim.

mod auth;
mod dto;
mod gateway;

pub use auth::HttpAuthenticationService;
pub use gateway::HttpManualGateway;

use serde::Deserialize;

/// Extract the service's human-readable error message, when the body is the
/// conventional error payload.
pub(crate) fn server_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ServerErrorDto {
        message: String,
    }

    serde_json::from_slice::<ServerErrorDto>(body)
        .ok()
        .map(|payload| payload.message)
        .filter(|message| !message.trim().is_empty())
}

/// Compact, length-capped rendering of an error body for diagnostics.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Status-line detail used when the body carries no service message.
pub(crate) fn status_detail(status: reqwest::StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared response helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"message":"Unauthorized PJ Number"}"#, Some("Unauthorized PJ Number"))]
    #[case(br#"{"message":"   "}"#, None)]
    #[case(br#"{"error":"nope"}"#, None)]
    #[case(b"<html>gateway timeout</html>", None)]
    fn server_message_requires_the_conventional_payload(
        #[case] body: &[u8],
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(server_message(body).as_deref(), expected);
    }

    #[test]
    fn body_preview_collapses_whitespace_and_caps_length() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }

    #[test]
    fn status_detail_without_body_reports_the_code_alone() {
        let detail = status_detail(reqwest::StatusCode::BAD_GATEWAY, b"");
        assert_eq!(detail, "status 502");
    }
}
