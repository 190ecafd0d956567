//! Key handling for the terminal frontend.
//!
//! [`App`] holds only presentation state (mode and selection). Everything the
//! user changes is expressed as [`Intent`]s returned from
//! [`App::handle_key_event`] for the controller to apply.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todos_proto::filter::Filter;
use todos_proto::task::TaskId;

use crate::controller::{Intent, TodoView};

/// What keystrokes currently act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigate rows and issue row commands.
    Browse,
    /// Type into the new-task input.
    Compose,
    /// Type into the inline editor of a row.
    Edit(TaskId),
}

/// Frontend state.
#[derive(Debug)]
pub struct App {
    /// Current mode.
    pub mode: Mode,
    /// Index of the highlighted row.
    pub selected: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create an app in browse mode with the first row selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Browse,
            selected: 0,
            should_quit: false,
        }
    }

    /// Reconcile presentation state with a fresh view.
    ///
    /// Clamps the selection and leaves edit mode once the row's session is
    /// gone or belongs to another row.
    pub fn sync(&mut self, view: &TodoView) {
        self.selected = self.selected.min(view.rows.len().saturating_sub(1));
        if let Mode::Edit(id) = self.mode {
            if view.editing != Some(id) {
                self.mode = Mode::Browse;
            }
        }
    }

    /// Handle a key event against the current view.
    pub fn handle_key_event(&mut self, key: KeyEvent, view: &TodoView) -> Vec<Intent> {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.should_quit = true;
            return Vec::new();
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key, view),
            Mode::Compose => self.handle_compose_key(key, view),
            Mode::Edit(id) => self.handle_edit_key(id, key, view),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, view: &TodoView) -> Vec<Intent> {
        let intent = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(view);
                None
            }
            KeyCode::Char(' ') => self.actionable(view).map(Intent::ToggleStatus),
            KeyCode::Char('d') | KeyCode::Delete => self.actionable(view).map(Intent::Delete),
            KeyCode::Enter => self.actionable(view).map(|id| {
                self.mode = Mode::Edit(id);
                Intent::StartEdit(id)
            }),
            KeyCode::Char('a') => {
                self.mode = Mode::Compose;
                None
            }
            KeyCode::Char('t') if !view.is_empty() => Some(Intent::ToggleAll),
            KeyCode::Char('c') if view.completed_count > 0 => Some(Intent::ClearCompleted),
            KeyCode::Char('1') => Some(Intent::SetFilter(Filter::All)),
            KeyCode::Char('2') => Some(Intent::SetFilter(Filter::Active)),
            KeyCode::Char('3') => Some(Intent::SetFilter(Filter::Completed)),
            KeyCode::Char('f') => Some(Intent::SetFilter(view.filter.next())),
            KeyCode::Char('x') if view.error.is_some() => Some(Intent::DismissError),
            // A session left open in Saving can still be abandoned.
            KeyCode::Esc if view.editing.is_some() => Some(Intent::CancelEdit),
            _ => None,
        };
        intent.into_iter().collect()
    }

    fn handle_compose_key(&mut self, key: KeyEvent, view: &TodoView) -> Vec<Intent> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                Vec::new()
            }
            KeyCode::Enter => vec![Intent::SubmitNew],
            _ if view.input_locked => Vec::new(),
            KeyCode::Char(c) => {
                let mut text = view.new_title.clone();
                text.push(c);
                vec![Intent::SetNewTitle(text)]
            }
            KeyCode::Backspace => {
                let mut text = view.new_title.clone();
                text.pop();
                vec![Intent::SetNewTitle(text)]
            }
            _ => Vec::new(),
        }
    }

    fn handle_edit_key(&mut self, id: TaskId, key: KeyEvent, view: &TodoView) -> Vec<Intent> {
        let draft = view
            .rows
            .iter()
            .find(|row| row.task.id == id)
            .and_then(|row| row.draft.as_deref())
            .unwrap_or_default();
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                vec![Intent::CommitEdit]
            }
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                vec![Intent::CancelEdit]
            }
            // Leaving the row submits like a blur.
            KeyCode::Up => {
                self.mode = Mode::Browse;
                self.select_prev();
                vec![Intent::CommitEdit]
            }
            KeyCode::Down => {
                self.mode = Mode::Browse;
                self.select_next(view);
                vec![Intent::CommitEdit]
            }
            KeyCode::Char(c) => {
                let mut text = draft.to_string();
                text.push(c);
                vec![Intent::EditDraft(text)]
            }
            KeyCode::Backspace => {
                let mut text = draft.to_string();
                text.pop();
                vec![Intent::EditDraft(text)]
            }
            _ => Vec::new(),
        }
    }

    /// Id of the selected row if it accepts commands.
    ///
    /// Busy rows and the pending create row ignore input.
    fn actionable(&self, view: &TodoView) -> Option<TaskId> {
        view.rows
            .get(self.selected)
            .filter(|row| !row.busy && !row.is_pending())
            .map(|row| row.task.id)
    }

    const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn select_next(&mut self, view: &TodoView) {
        if self.selected + 1 < view.rows.len() {
            self.selected += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
