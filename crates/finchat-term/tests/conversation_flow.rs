use std::time::Duration;

use anyhow::Result;
use finchat_term::domain::models::Action;
use finchat_term::domain::models::Event;
use finchat_term::domain::models::Role;
use finchat_term::domain::services::ActionsService;
use finchat_term::domain::services::AppState;
use finchat_term::domain::services::AppStateProps;
use finchat_term::domain::services::SessionStore;
use finchat_term::infrastructure::clients::HttpAssistant;
use finchat_term::infrastructure::storage::FileStorage;
use tempfile::TempDir;
use tokio::sync::mpsc;

struct Harness<'a> {
    app_state: AppState<'a>,
    action_tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

fn harness<'a>(base_url: String, data_dir: &TempDir) -> Harness<'a> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let client = HttpAssistant::new(base_url, Duration::from_secs(5));
    tokio::spawn(async move {
        return ActionsService::start(
            Box::new(client),
            Duration::from_millis(0),
            event_tx,
            &mut action_rx,
        )
        .await;
    });

    let app_state = AppState::new(AppStateProps {
        storage: Box::new(FileStorage::new(data_dir.path().to_path_buf())),
    });

    return Harness {
        app_state,
        action_tx,
        event_rx,
    };
}

impl Harness<'_> {
    fn ask(&mut self, question: &str) -> Result<()> {
        self.app_state
            .handle_event(Event::SessionNew, &self.action_tx)?;
        self.app_state
            .handle_event(Event::KeyboardPaste(question.to_string()), &self.action_tx)?;
        self.app_state
            .handle_event(Event::KeyboardEnter, &self.action_tx)?;
        return Ok(());
    }

    /// Feeds worker events into the app until the exchange settles. Returns the
    /// revealed text lengths seen along the way.
    async fn settle(&mut self) -> Result<Vec<usize>> {
        let mut lengths = vec![];

        while self.app_state.conversation.is_loading() {
            let event = tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv())
                .await?
                .ok_or_else(|| anyhow::anyhow!("worker stopped"))?;

            let is_delta = matches!(event, Event::AssistantDelta { .. });
            self.app_state.handle_event(event, &self.action_tx)?;

            if is_delta {
                let session = self.app_state.conversation.store().active().unwrap();
                lengths.push(session.messages.last().unwrap().text.chars().count());
            }
        }

        return Ok(lengths);
    }
}

#[tokio::test]
async fn it_reveals_answer_and_persists_the_exchange() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ask")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "question": "What is a fraud alert?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer":"A fraud alert flags suspicious activity.","sources":["https://example.com/fraud"]}"#)
        .create_async()
        .await;

    let data_dir = TempDir::new()?;
    let mut harness = harness(server.url(), &data_dir);

    harness.ask("What is a fraud alert?")?;
    let lengths = harness.settle().await?;

    let answer = "A fraud alert flags suspicious activity.";
    let expected: Vec<usize> = (1..=answer.chars().count()).collect();
    assert_eq!(lengths, expected);

    let session = harness.app_state.conversation.store().active().unwrap();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].role, Role::User);
    assert_eq!(session.messages[0].text, "What is a fraud alert?");
    assert_eq!(session.messages[1].role, Role::Bot);
    assert_eq!(session.messages[1].text, answer);
    assert_eq!(
        session.messages[1].sources(),
        &["https://example.com/fraud".to_string()]
    );
    mock.assert_async().await;

    let reloaded = SessionStore::load(Box::new(FileStorage::new(data_dir.path().to_path_buf())));
    assert_eq!(reloaded.sessions().len(), 1);
    assert_eq!(reloaded.sessions()[0].messages[1].text, answer);

    let raw = std::fs::read_to_string(data_dir.path().join("finchat_sessions.json"))?;
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.contains("\"role\":\"bot\""));

    return Ok(());
}

#[tokio::test]
async fn it_shows_server_errors_inline() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/ask")
        .with_status(500)
        .create_async()
        .await;

    let data_dir = TempDir::new()?;
    let mut harness = harness(server.url(), &data_dir);

    harness.ask("Why was my card declined?")?;
    let lengths = harness.settle().await?;

    assert!(lengths.is_empty());
    let session = harness.app_state.conversation.store().active().unwrap();
    assert_eq!(session.messages[0].text, "Why was my card declined?");
    assert_eq!(session.messages[1].text, "⚠️ Error: HTTP 500");
    assert!(session.messages[1].sources().is_empty());
    assert!(!harness.app_state.conversation.is_loading());

    return Ok(());
}

#[tokio::test]
async fn it_accepts_a_new_question_after_a_failure() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/ask")
        .match_body(mockito::Matcher::PartialJsonString(r#"{"question":"First?"}"#.to_string()))
        .with_status(503)
        .create_async()
        .await;
    let succeeding = server
        .mock("POST", "/ask")
        .match_body(mockito::Matcher::PartialJsonString(r#"{"question":"Second?"}"#.to_string()))
        .with_status(200)
        .with_body(r#"{"answer":"ok"}"#)
        .create_async()
        .await;

    let data_dir = TempDir::new()?;
    let mut harness = harness(server.url(), &data_dir);

    harness.ask("First?")?;
    harness.settle().await?;

    harness
        .app_state
        .handle_event(Event::KeyboardPaste("Second?".to_string()), &harness.action_tx)?;
    harness
        .app_state
        .handle_event(Event::KeyboardEnter, &harness.action_tx)?;
    harness.settle().await?;

    let session = harness.app_state.conversation.store().active().unwrap();
    assert_eq!(session.messages.len(), 4);
    assert_eq!(session.messages[1].text, "⚠️ Error: HTTP 503");
    assert_eq!(session.messages[3].text, "ok");
    assert!(session.messages[3].sources().is_empty());
    failing.assert_async().await;
    succeeding.assert_async().await;

    return Ok(());
}
