use log::{debug, error};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::EditorConfig;
use crate::errors::{EditorError, Result};
use crate::models::{deck::Deck, template::TemplateDescriptor};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "presentation.pptx";
const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Body of a save request. Carries `presentationId` once the backend assigned one,
/// which turns the save into an update of the same presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub slides: Deck,
    pub template_id: Option<String>,
    pub presentation_type: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    #[serde(alias = "presentation_id", alias = "id")]
    pub presentation_id: String,
}

/// The template sent with an export: the full catalog entry when known, else its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Descriptor(TemplateDescriptor),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub slides: Deck,
    pub template: Option<TemplateRef>,
    pub presentation_type: String,
}

/// Bytes returned by an export, ready to hand to a download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// JSON client for the presentation backend.
#[derive(Debug, Clone)]
pub struct PresentationClient {
    http: reqwest::Client,
    save_url: String,
    export_url: String,
}

impl PresentationClient {
    pub fn new(http: reqwest::Client, config: &EditorConfig) -> Self {
        PresentationClient {
            http,
            save_url: config.save_url(),
            export_url: config.export_url(),
        }
    }

    /// Saves (creates or updates) a presentation and returns its id.
    pub async fn save(&self, payload: &SavePayload) -> Result<SaveResponse> {
        debug!(
            "Saving {} slide(s) to {} (id: {:?})",
            payload.slides.len(),
            self.save_url,
            payload.presentation_id
        );
        let response = self
            .http
            .post(&self.save_url)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(EditorError::Network)?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(EditorError::Network)?;
            let saved: SaveResponse = serde_json::from_slice(&bytes)?;
            debug!("Saved presentation {}", saved.presentation_id);
            Ok(saved)
        } else {
            let body = response.text().await.map_err(EditorError::Network)?;
            Err(api_error(status, &body))
        }
    }

    /// Requests a PowerPoint rendering of the deck.
    pub async fn export(&self, payload: &ExportPayload) -> Result<ExportedDocument> {
        debug!("Exporting {} slide(s) via {}", payload.slides.len(), self.export_url);
        let response = self
            .http
            .post(&self.export_url)
            .header(ACCEPT, PPTX_MIME)
            .json(payload)
            .send()
            .await
            .map_err(EditorError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(EditorError::Network)?;
            return Err(api_error(status, &body));
        }
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| DEFAULT_EXPORT_FILE_NAME.to_string());
        let bytes = response.bytes().await.map_err(EditorError::Network)?;
        Ok(ExportedDocument {
            bytes: bytes.to_vec(),
            file_name,
        })
    }
}

/// Builds an API error, pulling a human-readable message out of the body when it
/// is JSON with `message`, `detail` or `error`.
fn api_error(status: reqwest::StatusCode, body: &str) -> EditorError {
    let message = serde_json::from_str::<JsonValue>(body).ok().and_then(|value| {
        ["message", "detail", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(JsonValue::as_str).map(str::to_string))
    });
    error!("Backend returned {}: {}", status, body);
    EditorError::Api { status, message }
}

fn file_name_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn save_payload_omits_missing_presentation_id() {
        let payload = SavePayload {
            slides: Deck::default(),
            template_id: None,
            presentation_type: "slides".to_string(),
            user_id: "u-1".to_string(),
            presentation_id: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("presentationId").is_none());
        assert_eq!(value["templateId"], JsonValue::Null);
        assert_eq!(value["userId"], "u-1");
        assert_eq!(value["slides"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn export_template_is_id_or_descriptor() {
        let by_id = ExportPayload {
            slides: Deck::default(),
            template: Some(TemplateRef::Id("modern-gradient".to_string())),
            presentation_type: "slides".to_string(),
        };
        assert_eq!(serde_json::to_value(&by_id).unwrap()["template"], "modern-gradient");

        let full = ExportPayload {
            template: Some(TemplateRef::Descriptor(TemplateDescriptor::new("custom-1"))),
            ..by_id
        };
        assert_eq!(serde_json::to_value(&full).unwrap()["template"]["id"], "custom-1");
    }

    #[test]
    fn save_response_accepts_snake_case() {
        let parsed: SaveResponse =
            serde_json::from_value(json!({ "presentation_id": "p-9" })).unwrap();
        assert_eq!(parsed.presentation_id, "p-9");
    }

    #[test]
    fn api_error_surfaces_server_message() {
        let err = api_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"Slides missing"}"#);
        assert_eq!(err.user_message(), "Slides missing");

        let err = api_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, EditorError::Api { message: None, .. }));
    }

    #[test]
    fn reads_file_name_from_content_disposition() {
        assert_eq!(
            file_name_from_disposition(r#"attachment; filename="deck.pptx""#).as_deref(),
            Some("deck.pptx")
        );
        assert_eq!(file_name_from_disposition("attachment"), None);
    }
}
