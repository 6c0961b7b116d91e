#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use chrono::Local;
use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::Session;
use crate::domain::services::AppState;
use crate::domain::services::ERROR_PREFIX;

const SIDEBAR_WIDTH: u16 = 32;
const SOURCE_INDENT: usize = 6;

const TAB: &str = "  ";

/// Greedy word wrap on character counts. Words longer than `width` are split.
/// Tabs are drawn as two spaces.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![];

    let text = text.replace('\t', TAB);
    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw_line.split(' ') {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > width && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        lines.push(current);
    }

    return lines;
}

fn typing_indicator(tick: usize) -> String {
    return format!("typing{}", ".".repeat(tick % 4));
}

fn message_lines(message: &Message, loading: bool, tick: usize, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![];

    let role_style = match message.role {
        Role::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Role::Bot => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    };
    let mut header = vec![Span::styled(message.role.label(), role_style)];
    if let Some(time) = message.time {
        header.push(Span::styled(
            format!("  {}", time.with_timezone(&Local).format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(header));

    if message.is_pending() {
        if loading {
            lines.push(Line::from(Span::styled(
                typing_indicator(tick),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    } else {
        let body_style = if message.role == Role::Bot && message.text.starts_with(ERROR_PREFIX) {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        for line in wrap_text(&message.text, width) {
            lines.push(Line::from(Span::styled(line, body_style)));
        }
    }

    let sources = message.sources();
    if !sources.is_empty() {
        lines.push(Line::from(Span::styled(
            "Sources:",
            Style::default().fg(Color::DarkGray),
        )));

        let link_style = Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED);
        for (idx, source) in sources.iter().enumerate() {
            let chunks = wrap_text(source, width.saturating_sub(SOURCE_INDENT));
            for (chunk_idx, chunk) in chunks.into_iter().enumerate() {
                let prefix = if chunk_idx == 0 {
                    format!("{:>width$} ", format!("[{}]", idx + 1), width = SOURCE_INDENT - 1)
                } else {
                    " ".repeat(SOURCE_INDENT)
                };
                lines.push(Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(chunk, link_style),
                ]));
            }
        }
    }

    return lines;
}

/// Every line of the active conversation, wrapped to `width`.
pub fn conversation_lines(app_state: &AppState, width: usize) -> Vec<Line<'static>> {
    let store = app_state.conversation.store();
    let hint_style = Style::default().fg(Color::DarkGray);

    let Some(session) = store.active() else {
        return vec![
            Line::from(""),
            Line::from(Span::styled("No chat selected.", hint_style)),
            Line::from(Span::styled("Press Ctrl+N to start a new chat.", hint_style)),
        ];
    };

    if session.messages.is_empty() {
        return vec![
            Line::from(""),
            Line::from(Span::styled(
                "Ask a question about your finances to get started.",
                hint_style,
            )),
        ];
    }

    let loading = app_state.conversation.is_loading();
    let mut lines = vec![];
    for (idx, message) in session.messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(message, loading, app_state.tick, width));
    }

    return lines;
}

fn session_item(session: &Session, active: bool, width: usize) -> ListItem<'static> {
    let marker = if active { "● " } else { "  " };
    let title_style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let created = session
        .created_at
        .with_timezone(&Local)
        .format("%b %d, %H:%M")
        .to_string();

    return ListItem::new(vec![
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::styled(session.title(width.saturating_sub(2)), title_style),
        ]),
        Line::from(Span::styled(
            format!("  {created}"),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
}

fn render_sidebar(frame: &mut Frame, app_state: &mut AppState, area: Rect) {
    let block = Block::bordered()
        .title(" Chats ")
        .title_bottom(Line::from(" ^N new ^D del ^X clear ").alignment(Alignment::Center));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app_state.sidebar_area = inner;

    let store = app_state.conversation.store();
    if store.sessions().is_empty() {
        app_state.sidebar_offset = 0;
        frame.render_widget(
            Paragraph::new(vec![
                Line::from("No chats yet."),
                Line::from("Press Ctrl+N to start."),
            ])
            .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let width = usize::from(inner.width);
    let items: Vec<ListItem> = store
        .sessions()
        .iter()
        .map(|session| session_item(session, store.active_id() == Some(session.id.as_str()), width))
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default()
        .with_offset(app_state.sidebar_offset)
        .with_selected(Some(app_state.sidebar_cursor));
    frame.render_stateful_widget(list, inner, &mut state);
    app_state.sidebar_offset = state.offset();
}

fn render_conversation(frame: &mut Frame, app_state: &mut AppState, area: Rect) {
    let title = match app_state.conversation.store().active() {
        Some(session) => format!(" {} ", session.title(usize::from(area.width).saturating_sub(4))),
        None => " finchat ".to_string(),
    };
    let block = Block::bordered().title(title);
    let inner = block.inner(area);

    let lines = conversation_lines(app_state, usize::from(inner.width));
    app_state
        .scroll
        .set_state(lines.len(), usize::from(inner.height));
    let position = u16::try_from(app_state.scroll.position).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((position, 0)), area);
}

fn render_input(frame: &mut Frame, app_state: &mut AppState, area: Rect) {
    let loading = app_state.conversation.is_loading();
    let title = if loading {
        " Waiting for the assistant… "
    } else {
        " Message · Enter send · Alt+Enter newline "
    };

    let (style, cursor_style) = if loading {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            Style::default(),
            Style::default().add_modifier(Modifier::REVERSED),
        )
    };

    app_state.textarea.set_block(Block::bordered().title(title));
    app_state.textarea.set_style(style);
    app_state.textarea.set_cursor_style(cursor_style);
    frame.render_widget(&app_state.textarea, area);
}

pub fn render(frame: &mut Frame, app_state: &mut AppState) {
    let [sidebar_area, main_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .areas(frame.area());

    let input_rows = u16::try_from(app_state.textarea.lines().len()).unwrap_or(u16::MAX);
    let input_height = input_rows.saturating_add(2).clamp(3, 8);
    let [messages_area, input_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(input_height)]).areas(main_area);

    render_sidebar(frame, app_state, sidebar_area);
    render_conversation(frame, app_state, messages_area);
    render_input(frame, app_state, input_area);
}
