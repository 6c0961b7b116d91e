use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AskError;
use crate::domain::models::AssistantAnswer;
use crate::domain::models::AssistantClient;
use crate::domain::models::AssistantQuestion;

#[derive(Debug, Default, Deserialize)]
struct AskResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

pub struct HttpAssistant {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl Default for HttpAssistant {
    fn default() -> HttpAssistant {
        let timeout_secs = Config::get(ConfigKey::RequestTimeout)
            .parse::<u64>()
            .unwrap_or(60);

        return HttpAssistant::new(
            Config::get(ConfigKey::BackendURL),
            Duration::from_secs(timeout_secs),
        );
    }
}

impl HttpAssistant {
    pub fn new(url: String, timeout: Duration) -> HttpAssistant {
        return HttpAssistant {
            url: url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        };
    }

    pub fn url(&self) -> &str {
        return &self.url;
    }
}

#[async_trait]
impl AssistantClient for HttpAssistant {
    async fn ask(&self, question: AssistantQuestion) -> Result<AssistantAnswer, AskError> {
        let ask_url = format!("{}/ask", self.url);
        tracing::debug!(url = %ask_url, chars = question.question.len(), "sending question");

        let res = self
            .client
            .post(&ask_url)
            .timeout(self.timeout)
            .json(&question)
            .send()
            .await;

        let response = match res {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = ?err, "assistant is not reachable");
                return Err(AskError::Transport(err.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "assistant request failed");
            return Err(AskError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| AskError::Transport(err.to_string()))?;

        let parsed = serde_json::from_str::<AskResponse>(&body).map_err(|err| {
            tracing::error!(error = %err, "assistant returned an unexpected body");
            AskError::InvalidResponse(err.to_string())
        })?;

        let answer = AssistantAnswer {
            answer: parsed.answer.unwrap_or_default(),
            sources: parsed.sources.unwrap_or_default(),
        };
        tracing::debug!(
            chars = answer.answer.len(),
            sources = answer.sources.len(),
            "received answer"
        );

        return Ok(answer);
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn question(text: &str) -> AssistantQuestion {
        AssistantQuestion {
            question: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ask_posts_question_and_reads_answer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ask")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"question": "What is a fraud alert?"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "answer": "A fraud alert flags suspicious activity.",
                    "sources": ["https://example.com/help"]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = HttpAssistant::new(server.url(), Duration::from_secs(5));
        let answer = client.ask(question("What is a fraud alert?")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer.answer, "A fraud alert flags suspicious activity.");
        assert_eq!(answer.sources, vec!["https://example.com/help".to_string()]);
    }

    #[tokio::test]
    async fn test_ask_defaults_missing_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(200)
            .with_body(r#"{"sources": null}"#)
            .create_async()
            .await;

        let client = HttpAssistant::new(server.url(), Duration::from_secs(5));
        let answer = client.ask(question("hi")).await.unwrap();

        assert_eq!(answer, AssistantAnswer::default());
    }

    #[tokio::test]
    async fn test_ask_trims_trailing_slash_from_base_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ask")
            .with_status(200)
            .with_body(r#"{"answer": "ok"}"#)
            .create_async()
            .await;

        let client = HttpAssistant::new(format!("{}/", server.url()), Duration::from_secs(5));
        let answer = client.ask(question("hi")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer.answer, "ok");
    }

    #[tokio::test]
    async fn test_ask_maps_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(500)
            .with_body(r#"{"answer": "ignored"}"#)
            .create_async()
            .await;

        let client = HttpAssistant::new(server.url(), Duration::from_secs(5));
        let err = client.ask(question("hi")).await.unwrap_err();

        assert_eq!(err, AskError::Status(500));
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_ask_rejects_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = HttpAssistant::new(server.url(), Duration::from_secs(5));
        let err = client.ask(question("hi")).await.unwrap_err();

        assert!(matches!(err, AskError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_ask_maps_transport_failure() {
        let client = HttpAssistant::new("http://127.0.0.1:1".to_string(), Duration::from_secs(5));
        let err = client.ask(question("hi")).await.unwrap_err();

        assert!(matches!(err, AskError::Transport(_)));
    }
}
