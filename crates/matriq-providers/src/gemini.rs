//! Gemini API provider implementation.
//!
//! Calls the `generateContent` endpoint with a JSON response schema so the
//! model answers in the puzzle wire format directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use matriq_core::error::ProviderError;
use matriq_core::puzzle::Puzzle;
use matriq_core::traits::PuzzleProvider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini generative API provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

fn build_prompt(difficulty: u8) -> String {
    format!(
        "Generate a 3x3 matrix reasoning problem with a difficulty level of {difficulty}/10.\n\
         The problem should consist of simple geometric shapes, patterns, or logical progressions.\n\
         The last cell (bottom right) must be the missing element, represented by '?'.\n\
         Provide a brief explanation of the underlying logic.\n\
         The output must be a JSON object adhering to the provided schema.\n\
         The grid items and options can be simple characters or emojis that represent shapes or patterns."
    )
}

/// The structured-output schema sent with every request. Mirrors the puzzle
/// wire format so the response body parses straight into [`Puzzle`].
fn puzzle_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "reasoning": {
                "type": "STRING",
                "description": "A brief explanation of the logic behind the matrix pattern."
            },
            "grid": {
                "type": "ARRAY",
                "description": "A 9-element array representing the 3x3 grid. The last element should be '?' representing the missing piece.",
                "items": { "type": "STRING" }
            },
            "options": {
                "type": "ARRAY",
                "description": "An array of 6 possible answers as strings. One of them is correct.",
                "items": { "type": "STRING" }
            },
            "correctOptionIndex": {
                "type": "INTEGER",
                "description": "The 0-based index of the correct answer in the 'options' array."
            }
        },
        "required": ["reasoning", "grid", "options", "correctOptionIndex"]
    })
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[async_trait]
impl PuzzleProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, difficulty: u8) -> Result<Puzzle, ProviderError> {
        let body = GeminiRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: build_prompt(difficulty),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: puzzle_response_schema(),
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError { status, message });
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ProviderError::InvalidPuzzle("response has no candidate text".into()))?;

        let puzzle: Puzzle = serde_json::from_str(text)
            .map_err(|e| ProviderError::InvalidPuzzle(format!("candidate is not puzzle JSON: {e}")))?;
        puzzle.validate().map_err(ProviderError::InvalidPuzzle)?;

        Ok(puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{"text": text}], "role": "model" },
                "finishReason": "STOP"
            }]
        })
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("test-key", Some(server.uri()), None)
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let puzzle_json = serde_json::json!({
            "reasoning": "Each row shifts left by one.",
            "grid": ["a", "b", "c", "b", "c", "a", "c", "a", "?"],
            "options": ["b", "a", "c", "d", "e", "f"],
            "correctOptionIndex": 0
        });

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(&puzzle_json.to_string())),
            )
            .mount(&server)
            .await;

        let puzzle = provider(&server).fetch(4).await.unwrap();
        assert_eq!(puzzle.correct_option_index, 0);
        assert_eq!(puzzle.grid.len(), 9);
        assert_eq!(puzzle.explanation, "Each row shifts left by one.");
    }

    #[tokio::test]
    async fn candidate_text_that_is_not_json_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("not json at all")),
            )
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPuzzle(_)));
    }

    #[tokio::test]
    async fn schema_violations_are_rejected() {
        let server = MockServer::start().await;

        // Eight grid cells: parses as JSON but fails puzzle validation.
        let bad_puzzle = serde_json::json!({
            "reasoning": "truncated",
            "grid": ["a", "b", "c", "a", "b", "c", "a", "?"],
            "options": ["a", "b", "c", "d", "e", "f"],
            "correctOptionIndex": 1
        });

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(&bad_puzzle.to_string())),
            )
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert!(err.to_string().contains("8 cells"), "got: {err}");
    }

    #[tokio::test]
    async fn empty_candidates_are_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert!(err.to_string().contains("no candidate text"));
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("key rejected"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert!(err.is_permanent());
        assert!(err.to_string().contains("authentication"));
    }

    #[tokio::test]
    async fn rate_limiting_carries_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(5000));
    }

    #[tokio::test]
    async fn model_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound(_)));
    }

    #[tokio::test]
    async fn api_error_message_is_extracted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"code": 500, "message": "internal failure", "status": "INTERNAL"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(3).await.unwrap_err();
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal failure");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
