#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use ratatui::style::Style;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use super::Conversation;
use super::Scroll;
use super::SessionStore;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::SessionStorageBox;

pub struct AppStateProps {
    pub storage: SessionStorageBox,
}

pub struct AppState<'a> {
    pub conversation: Conversation,
    pub textarea: TextArea<'a>,
    pub scroll: Scroll,
    pub sidebar_cursor: usize,
    /// Inner area of the sidebar list from the last frame, used to map clicks.
    pub sidebar_area: Rect,
    pub sidebar_offset: usize,
    pub tick: usize,
}

pub fn new_textarea<'a>() -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("Ask about accounts, cards, fraud, budgeting…");
    return textarea;
}

impl<'a> AppState<'a> {
    pub fn new(props: AppStateProps) -> AppState<'a> {
        let store = SessionStore::load(props.storage);

        let mut app_state = AppState {
            conversation: Conversation::new(store),
            textarea: new_textarea(),
            scroll: Scroll::default(),
            sidebar_cursor: 0,
            sidebar_area: Rect::default(),
            sidebar_offset: 0,
            tick: 0,
        };
        app_state.scroll.last();

        return app_state;
    }

    pub fn input_text(&self) -> String {
        return self.textarea.lines().join("\n");
    }

    /// Applies one event. Returns true when the loop should exit.
    pub fn handle_event(&mut self, event: Event, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        match event {
            Event::AssistantDelta { message_id, delta } => {
                self.conversation.reveal(&message_id, &delta);
                self.sessions_changed();
            }
            Event::AssistantAnswered { message_id, answer } => {
                self.conversation.complete(&message_id, answer);
                self.sessions_changed();
            }
            Event::AssistantFailed { message_id, reason } => {
                self.conversation.fail(&message_id, &reason);
                self.sessions_changed();
            }
            Event::KeyboardCharInput(input) => {
                self.textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                self.textarea
                    .insert_str(text.replace("\r\n", "\n").replace('\r', "\n"));
            }
            Event::KeyboardNewline => {
                self.textarea.insert_newline();
            }
            Event::KeyboardEnter => {
                self.submit(tx)?;
            }
            Event::KeyboardCTRLC => {
                return Ok(true);
            }
            Event::SessionNew => {
                self.conversation.store_mut().start_new_session();
                self.sidebar_cursor = 0;
                self.sessions_changed();
            }
            Event::SessionActivate => {
                self.activate(self.sidebar_cursor);
            }
            Event::SessionDelete => {
                self.delete_highlighted();
            }
            Event::SessionsClear => {
                self.conversation.store_mut().clear_all();
                self.sidebar_cursor = 0;
                self.sessions_changed();
            }
            Event::SidebarNext => {
                let count = self.conversation.store().sessions().len();
                if count > 0 {
                    self.sidebar_cursor = (self.sidebar_cursor + 1) % count;
                }
            }
            Event::SidebarPrevious => {
                let count = self.conversation.store().sessions().len();
                if count > 0 {
                    self.sidebar_cursor = (self.sidebar_cursor + count - 1) % count;
                }
            }
            Event::UIClick { column, row } => {
                self.click(column, row);
            }
            Event::UITick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Event::UIScrollDown => {
                self.scroll.down();
            }
            Event::UIScrollUp => {
                self.scroll.up();
            }
            Event::UIScrollPageDown => {
                self.scroll.down_page();
            }
            Event::UIScrollPageUp => {
                self.scroll.up_page();
            }
        }

        return Ok(false);
    }

    fn submit(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let text = self.input_text();
        if self.conversation.send_message(&text, tx)? {
            self.textarea = new_textarea();
            self.sessions_changed();
        }

        return Ok(());
    }

    fn activate(&mut self, index: usize) {
        let Some(id) = self
            .conversation
            .store()
            .sessions()
            .get(index)
            .map(|session| session.id.clone())
        else {
            return;
        };

        if self.conversation.store_mut().select(&id) {
            self.sidebar_cursor = index;
            self.scroll.last();
        }
    }

    fn delete_highlighted(&mut self) {
        let Some(id) = self
            .conversation
            .store()
            .sessions()
            .get(self.sidebar_cursor)
            .map(|session| session.id.clone())
        else {
            return;
        };

        self.conversation.store_mut().delete_session(&id);
        self.sessions_changed();
    }

    fn click(&mut self, column: u16, row: u16) {
        let area = self.sidebar_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return;
        }

        // Each sidebar entry is two rows tall.
        let index = self.sidebar_offset + usize::from(row - area.y) / 2;
        self.activate(index);
    }

    fn sessions_changed(&mut self) {
        let count = self.conversation.store().sessions().len();
        if self.sidebar_cursor >= count {
            self.sidebar_cursor = count.saturating_sub(1);
        }
        self.scroll.last();
    }
}
