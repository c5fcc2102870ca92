//! Client for the hosted SQL translation endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteResult};

/// One of the deployed translation models behind the shared host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// The base pretrained model.
    Base,
    /// The model fine-tuned on text-to-SQL pairs.
    Finetuned,
}

impl ModelVariant {
    /// Path segment identifying the deployed model.
    pub fn as_path(&self) -> &'static str {
        match self {
            ModelVariant::Base => "base",
            ModelVariant::Finetuned => "finetuned",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    input_text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    output_text: Option<String>,
}

/// Client for `POST {base_url}/{variant}`.
pub struct TranslationClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TranslationClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout,
        }
    }

    fn endpoint(&self, variant: ModelVariant) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), variant.as_path())
    }

    /// Send a serialized prompt to the chosen model, returning the
    /// predicted SQL. Single attempt; any failure surfaces to the caller.
    pub async fn translate(&self, variant: ModelVariant, prompt: &str) -> RemoteResult<String> {
        let url = self.endpoint(variant);

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&TranslateRequest { input_text: prompt })
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status { url, status });
        }

        let body: TranslateResponse =
            response
                .json()
                .await
                .map_err(|source| RemoteError::Decode {
                    url: url.clone(),
                    source,
                })?;

        body.output_text.ok_or(RemoteError::MissingField {
            url,
            field: "output_text",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_paths() {
        assert_eq!(ModelVariant::Base.as_path(), "base");
        assert_eq!(ModelVariant::Finetuned.as_path(), "finetuned");
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = TranslationClient::new(
            reqwest::Client::new(),
            "https://example.com/",
            Duration::from_secs(30),
        );
        assert_eq!(
            client.endpoint(ModelVariant::Finetuned),
            "https://example.com/finetuned"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(TranslateRequest {
            input_text: "<db_id>mydb<question>q",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "input_text": "<db_id>mydb<question>q" }));
    }

    #[test]
    fn test_response_missing_output_text() {
        let parsed: TranslateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.output_text.is_none());

        let parsed: TranslateResponse =
            serde_json::from_str(r#"{"output_text": "SELECT 1"}"#).unwrap();
        assert_eq!(parsed.output_text.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_variant_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ModelVariant::Base).unwrap(), "\"base\"");
        let v: ModelVariant = serde_json::from_str("\"finetuned\"").unwrap();
        assert_eq!(v, ModelVariant::Finetuned);
    }
}
