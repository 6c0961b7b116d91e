use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use super::reveal::reveal_answer;
use crate::domain::models::Action;
use crate::domain::models::AssistantClient;
use crate::domain::models::AssistantClientBox;
use crate::domain::models::AssistantQuestion;
use crate::domain::models::Event;

async fn answer_question(
    assistant_client: &dyn AssistantClient,
    message_id: String,
    question: AssistantQuestion,
    reveal_delay: Duration,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match assistant_client.ask(question).await {
        Ok(answer) => {
            tracing::debug!(message_id = %message_id, "revealing answer");
            reveal_answer(&message_id, answer, reveal_delay, event_tx).await?;
        }
        Err(err) => {
            tracing::error!(message_id = %message_id, error = %err, "assistant client failed");
            event_tx.send(Event::AssistantFailed {
                message_id,
                reason: err.to_string(),
            })?;
        }
    }

    Ok(())
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        assistant_client: AssistantClientBox,
        reveal_delay: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let assistant_client_arc: Arc<AssistantClientBox> = Arc::new(assistant_client);

        while let Some(action) = rx.recv().await {
            let worker_event_tx = event_tx.clone();
            match action {
                Action::AssistantRequest {
                    message_id,
                    question,
                } => {
                    let client_worker = assistant_client_arc.clone();
                    tokio::spawn(async move {
                        answer_question(
                            &**client_worker,
                            message_id,
                            question,
                            reveal_delay,
                            &worker_event_tx,
                        )
                        .await
                    });
                }
            }
        }

        tracing::debug!("action channel closed, stopping actions service");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AskError;
    use crate::domain::models::AssistantAnswer;
    use async_trait::async_trait;

    struct MockAssistantClient {
        ask_fn: Box<dyn Fn(AssistantQuestion) -> Result<AssistantAnswer, AskError> + Send + Sync>,
    }

    #[async_trait]
    impl AssistantClient for MockAssistantClient {
        async fn ask(&self, question: AssistantQuestion) -> Result<AssistantAnswer, AskError> {
            (self.ask_fn)(question)
        }
    }

    fn request(message_id: &str, question: &str) -> Action {
        Action::AssistantRequest {
            message_id: message_id.to_string(),
            question: AssistantQuestion {
                question: question.to_string(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_reveals_answer_for_message() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let assistant_client = MockAssistantClient {
            ask_fn: Box::new(|question| {
                assert_eq!(question.question, "Hi?");
                Ok(AssistantAnswer {
                    answer: "Yo".to_string(),
                    sources: vec![],
                })
            }),
        };

        tokio::spawn(async move {
            ActionsService::start(
                Box::new(assistant_client),
                Duration::from_millis(15),
                event_tx,
                &mut action_rx,
            )
            .await
            .unwrap();
        });

        action_tx.send(request("m1", "Hi?")).unwrap();

        let mut revealed = String::new();
        loop {
            match event_rx.recv().await.unwrap() {
                Event::AssistantDelta { message_id, delta } => {
                    assert_eq!(message_id, "m1");
                    revealed.push_str(&delta);
                }
                Event::AssistantAnswered { message_id, answer } => {
                    assert_eq!(message_id, "m1");
                    assert_eq!(answer.answer, "Yo");
                    break;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(revealed, "Yo");
    }

    #[tokio::test]
    async fn test_request_failure_emits_failed_event() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let assistant_client = MockAssistantClient {
            ask_fn: Box::new(|_| Err(AskError::Status(503))),
        };

        tokio::spawn(async move {
            ActionsService::start(
                Box::new(assistant_client),
                Duration::from_millis(15),
                event_tx,
                &mut action_rx,
            )
            .await
            .unwrap();
        });

        action_tx.send(request("m2", "Hi?")).unwrap();

        match event_rx.recv().await.unwrap() {
            Event::AssistantFailed { message_id, reason } => {
                assert_eq!(message_id, "m2");
                assert_eq!(reason, "HTTP 503");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
