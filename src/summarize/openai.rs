use crate::errors::SummarizeError;
use crate::summarize::Summarizer;
use reqwest::blocking::Client;
use reqwest::StatusCode;

const MAX_ATTEMPTS: u64 = 3;

/// OpenAI-compatible chat completions backend.
pub struct OpenAiSummarizer {
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

impl OpenAiSummarizer {
    pub fn new(api_base: String, api_key: String, model: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            api_base,
            api_key,
            model,
            temperature,
            max_tokens,
            client: Client::new(),
        }
    }
}

fn instruction(target_length: usize) -> String {
    format!(
        "You are a concise, factual summarizer. Summarize the user's text in approximately {target_length} characters or fewer. Reply with the summary only."
    )
}

fn extract_summary(v: &serde_json::Value) -> Result<String, SummarizeError> {
    v.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|x| x.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SummarizeError::Decode("missing choices[0].message.content".into()))
}

impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn summarize(&self, text: &str, target_length: usize) -> Result<String, SummarizeError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": instruction(target_length) },
                { "role": "user", "content": text },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        // Retry transient failures only; a rejected key will not get better
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.client.post(&url).bearer_auth(&self.api_key).json(&body).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let v: serde_json::Value = resp
                            .json()
                            .map_err(|e| SummarizeError::Decode(format!("decode response: {e}")))?;
                        return extract_summary(&v);
                    }
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(SummarizeError::Auth(format!("status {status} from {}", self.api_base)));
                    }
                    let err = SummarizeError::Http(format!("status {status} from {}", self.api_base));
                    if !(status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => SummarizeError::Http(format!("connect {}: {}", self.api_base, e)),
            };
            if attempt >= MAX_ATTEMPTS {
                return Err(err);
            }
            tracing::debug!(attempt, error = %err, "retrying remote summarization");
            std::thread::sleep(std::time::Duration::from_millis(100 * attempt));
        }
    }
}
