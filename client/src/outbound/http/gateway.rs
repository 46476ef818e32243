//! Reqwest-backed manual gateway adapter.
//!
//! Every route the review service exposes for sections and entries lives
//! here; responses are decoded through the wire DTOs and section-returning
//! writes hand back the full updated section.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{
    ManualGateway, ManualGatewayError, NewEntry, ReportDocument, SectionPatch,
};
use crate::domain::{AccessToken, EntryId, EntryKind, ManualSection, SectionId, UserId};

use super::dto::{
    DataEnvelopeDto, ManualSectionDto, NewEntryBodyDto, SectionPatchBodyDto, sections_into_domain,
};
use super::{server_message, status_detail};

/// Manual gateway adapter performing JSON requests against one base URL.
pub struct HttpManualGateway {
    client: Client,
    base: Url,
}

impl HttpManualGateway {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ManualGatewayError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ManualGatewayError::decode("base URL cannot carry paths"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn read_success_bytes(
        response: reqwest::Response,
    ) -> Result<Vec<u8>, ManualGatewayError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(&err))?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }

    async fn fetch_section_list(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        let response = self
            .client
            .get(self.endpoint(segments)?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let bytes = Self::read_success_bytes(response).await?;

        let decoded: DataEnvelopeDto<Vec<ManualSectionDto>> = serde_json::from_slice(&bytes)
            .map_err(|err| {
                ManualGatewayError::decode(format!("invalid section listing: {err}"))
            })?;
        sections_into_domain(decoded.data).map_err(ManualGatewayError::decode)
    }

    fn decode_section(bytes: &[u8]) -> Result<ManualSection, ManualGatewayError> {
        let decoded: DataEnvelopeDto<ManualSectionDto> = serde_json::from_slice(bytes)
            .map_err(|err| ManualGatewayError::decode(format!("invalid section payload: {err}")))?;
        decoded.data.into_domain().map_err(ManualGatewayError::decode)
    }
}

fn map_transport_error(error: &reqwest::Error) -> ManualGatewayError {
    if error.is_timeout() {
        ManualGatewayError::timeout(error.to_string())
    } else {
        ManualGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ManualGatewayError {
    let message = server_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ManualGatewayError::unauthorized(
            message.unwrap_or_else(|| status_detail(status, body)),
        ),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ManualGatewayError::timeout(status_detail(status, body))
        }
        _ => match message {
            Some(text) => ManualGatewayError::rejected(text),
            None if status.is_client_error() => {
                ManualGatewayError::rejected(status_detail(status, body))
            }
            None => ManualGatewayError::transport(status_detail(status, body)),
        },
    }
}

#[async_trait]
impl ManualGateway for HttpManualGateway {
    async fn fetch_sections(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.fetch_section_list(token, &["manual", "get"]).await
    }

    async fn fetch_sections_admin(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ManualSection>, ManualGatewayError> {
        self.fetch_section_list(token, &["manual", "admin"]).await
    }

    async fn create_entry(
        &self,
        token: &AccessToken,
        entry: &NewEntry,
    ) -> Result<ManualSection, ManualGatewayError> {
        let body = NewEntryBodyDto {
            section_id: entry.section_id.as_ref(),
            user_id: entry.author_id.as_ref(),
            content: entry.content.as_str(),
            kind: entry.kind.as_str(),
        };
        let response = self
            .client
            .post(self.endpoint(&["manual", "entry"])?)
            .bearer_auth(token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let bytes = Self::read_success_bytes(response).await?;
        Self::decode_section(&bytes)
    }

    async fn update_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
        patch: &SectionPatch,
    ) -> Result<ManualSection, ManualGatewayError> {
        let body = SectionPatchBodyDto {
            code: patch.code.as_deref(),
            title: patch.title.as_deref(),
            part: patch.part.as_deref(),
            content: patch.content.as_deref(),
        };
        let response = self
            .client
            .put(self.endpoint(&["manual", section.as_ref()])?)
            .bearer_auth(token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let bytes = Self::read_success_bytes(response).await?;
        Self::decode_section(&bytes)
    }

    async fn delete_section(
        &self,
        token: &AccessToken,
        section: &SectionId,
    ) -> Result<(), ManualGatewayError> {
        let response = self
            .client
            .delete(self.endpoint(&["manual", section.as_ref()])?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        Self::read_success_bytes(response).await.map(|_| ())
    }

    async fn delete_entry(
        &self,
        token: &AccessToken,
        section: &SectionId,
        kind: EntryKind,
        entry: &EntryId,
    ) -> Result<ManualSection, ManualGatewayError> {
        let response = self
            .client
            .delete(self.endpoint(&[
                "manual",
                "section",
                section.as_ref(),
                kind.as_str(),
                entry.as_ref(),
            ])?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let bytes = Self::read_success_bytes(response).await?;
        Self::decode_section(&bytes)
    }

    async fn download_report(
        &self,
        token: &AccessToken,
        for_user: Option<UserId>,
    ) -> Result<ReportDocument, ManualGatewayError> {
        let mut url = self.endpoint(&["manual", "admin", "download"])?;
        if let Some(user) = &for_user {
            url.query_pairs_mut().append_pair("userId", user.as_ref());
        }
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let bytes = Self::read_success_bytes(response).await?;
        Ok(ReportDocument { bytes })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.
    use super::*;
    use rstest::rstest;

    fn gateway() -> HttpManualGateway {
        HttpManualGateway::new(
            Url::parse("http://localhost:5000/api").expect("valid url"),
            Duration::from_secs(5),
        )
        .expect("client should build")
    }

    #[rstest]
    #[case(&["manual", "get"], "http://localhost:5000/api/manual/get")]
    #[case(
        &["manual", "section", "s1", "reference", "e9"],
        "http://localhost:5000/api/manual/section/s1/reference/e9"
    )]
    fn endpoints_extend_the_base_path(#[case] segments: &[&str], #[case] expected: &str) {
        let url = gateway().endpoint(segments).expect("endpoint should build");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case(StatusCode::FORBIDDEN, "Unauthorized")]
    #[case(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case(StatusCode::NOT_FOUND, "Rejected")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_port_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"");
        let matches_expected = match expected {
            "Unauthorized" => matches!(error, ManualGatewayError::Unauthorized { .. }),
            "Timeout" => matches!(error, ManualGatewayError::Timeout { .. }),
            "Rejected" => matches!(error, ManualGatewayError::Rejected { .. }),
            "Transport" => matches!(error, ManualGatewayError::Transport { .. }),
            _ => false,
        };
        assert!(matches_expected, "unexpected mapping: {error:?}");
    }

    #[test]
    fn service_wording_is_preserved_for_rejections() {
        let error = map_status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"message":"Section not found"}"#,
        );
        assert_eq!(error, ManualGatewayError::rejected("Section not found"));
    }

    #[test]
    fn section_payloads_decode_through_the_envelope() {
        let raw = br#"{"data":{"_id":"s1","code":"1.1","title":"t","part":"PART I"}}"#;
        let section = HttpManualGateway::decode_section(raw).expect("payload should decode");
        assert_eq!(section.id.as_ref(), "s1");
    }
}
