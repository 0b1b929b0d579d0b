//! Keyboard selection
//!
//! Tracks whether the result list is open and which entry is highlighted.
//! Pure state: the instance applies the returned [`Transition`] to the DOM.

use crate::event::Key;

/// List state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Closed,
    /// Visible, nothing highlighted
    Open,
    Highlighted(usize),
}

/// Where focus should move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Entry(usize),
}

/// Outcome of a handled key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: Selection,
    pub focus: Option<Focus>,
    /// Entry to activate
    pub activate: Option<usize>,
}

impl Transition {
    fn to(state: Selection) -> Self {
        Self { state, focus: None, activate: None }
    }

    fn focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
    /// Interactive entry count of the current list, if one exists
    len: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != Selection::Closed
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            Selection::Highlighted(i) => Some(i),
            _ => None,
        }
    }

    /// A fresh list with `len` entries was rendered and opened
    pub fn reset(&mut self, len: usize) {
        self.len = Some(len);
        self.state = Selection::Open;
    }

    /// The list was discarded
    pub fn clear(&mut self) {
        self.len = None;
        self.state = Selection::Closed;
    }

    /// Reopen the existing list with nothing highlighted; false if there is none
    pub fn reopen(&mut self) -> bool {
        if self.len.is_none() {
            return false;
        }
        self.state = Selection::Open;
        true
    }

    pub fn close(&mut self) {
        self.state = Selection::Closed;
    }

    /// Highlight an entry directly, e.g. when it receives focus
    pub fn highlight(&mut self, index: usize) -> bool {
        match self.len {
            Some(len) if index < len => {
                self.state = Selection::Highlighted(index);
                true
            }
            _ => false,
        }
    }

    /// Apply a key; `None` means the key is not handled here
    pub fn on_key(&mut self, key: Key) -> Option<Transition> {
        if self.state == Selection::Closed {
            return None;
        }
        let len = self.len.unwrap_or(0);

        let transition = match (key, self.state) {
            (Key::ArrowDown | Key::ArrowUp, _) if len == 0 => return None,
            (Key::ArrowDown | Key::ArrowUp, Selection::Open) => {
                Transition::to(Selection::Highlighted(0)).focus(Focus::Entry(0))
            }
            (Key::ArrowDown, Selection::Highlighted(i)) if i + 1 >= len => {
                Transition::to(Selection::Open).focus(Focus::Input)
            }
            (Key::ArrowDown, Selection::Highlighted(i)) => {
                Transition::to(Selection::Highlighted(i + 1)).focus(Focus::Entry(i + 1))
            }
            (Key::ArrowUp, Selection::Highlighted(0)) => {
                Transition::to(Selection::Open).focus(Focus::Input)
            }
            (Key::ArrowUp, Selection::Highlighted(i)) => {
                Transition::to(Selection::Highlighted(i - 1)).focus(Focus::Entry(i - 1))
            }
            (Key::Escape, Selection::Highlighted(_)) => {
                Transition::to(Selection::Closed).focus(Focus::Input)
            }
            (Key::Escape | Key::Tab, _) => Transition::to(Selection::Closed),
            (Key::Enter, Selection::Highlighted(i)) => Transition {
                state: Selection::Closed,
                focus: Some(Focus::Input),
                activate: Some(i),
            },
            (Key::Enter, _) => Transition::to(Selection::Closed),
            _ => return None,
        };

        self.state = transition.state;
        Some(transition)
    }
}
