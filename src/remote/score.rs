//! Client for the hosted BLEU scoring endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteResult};

#[derive(Serialize)]
struct ScoreRequest<'a> {
    reference: &'a str,
    candidate: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
    bleu_score: Option<f64>,
}

/// Client for `POST {base_url}/bleu`.
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ScoringClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bleu", self.base_url.trim_end_matches('/'))
    }

    /// Score a (reference, candidate) SQL pair, returning BLEU in [0, 1].
    ///
    /// A response without `bleu_score` is a contract error, reported
    /// separately from transport failures.
    pub async fn score(&self, reference: &str, candidate: &str) -> RemoteResult<f64> {
        let url = self.endpoint();

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&ScoreRequest {
                reference,
                candidate,
            })
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

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|source| RemoteError::Decode {
                url: url.clone(),
                source,
            })?;

        body.bleu_score.ok_or(RemoteError::MissingField {
            url,
            field: "bleu_score",
        })
    }
}

/// Format a BLEU score for display, rounded to 8 decimal digits.
pub fn format_score(score: f64) -> String {
    format!("{:.8}", score)
}
