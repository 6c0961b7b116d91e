use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use finchat_term::application::ui::destruct_terminal_for_panic;
use finchat_term::application::ui::start_loop;
use finchat_term::configuration::Config;
use finchat_term::configuration::ConfigKey;
use finchat_term::domain::models::Action;
use finchat_term::domain::models::Event;
use finchat_term::domain::models::SessionStorageBox;
use finchat_term::domain::services::ActionsService;
use finchat_term::domain::services::AppStateProps;
use finchat_term::infrastructure::clients::HttpAssistant;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task;

async fn start_ui(
    storage: SessionStorageBox,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let result = start_loop(&mut terminal, AppStateProps { storage }, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;

    let _ = crossterm::execute!(io::stdout(), cursor::Show);

    return result;
}

/// Runs the interactive chat until the user quits.
pub async fn run(storage: SessionStorageBox) -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let typing_delay = Config::get(ConfigKey::TypingDelay)
        .parse::<u64>()
        .unwrap_or(15);
    let assistant_client = Box::new(HttpAssistant::default());
    tracing::info!(
        backend_url = assistant_client.url(),
        typing_delay,
        "starting chat"
    );

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(
            assistant_client,
            Duration::from_millis(typing_delay),
            event_tx,
            &mut action_rx,
        )
        .await;
    });

    let ui_future = start_ui(storage, action_tx, event_rx);

    let result = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    if result.is_err() {
        destruct_terminal_for_panic();
    }

    return result;
}
