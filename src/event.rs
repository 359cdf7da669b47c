use std::thread;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::item::{Category, CommentNode, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    NextCategory,
    PrevCategory,
    GoToStart,
    GoToEnd,
    OpenThread,
    OpenLink,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Action::NextPage,
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Action::PrevPage,
            KeyCode::Tab => Action::NextCategory,
            KeyCode::BackTab => Action::PrevCategory,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToStart,
            KeyCode::Char('G') | KeyCode::End => Action::GoToEnd,
            KeyCode::Enter => Action::OpenThread,
            KeyCode::Char('o') => Action::OpenLink,
            _ => Action::None,
        }
    }
}

/// Everything the event loop feeds into the list and the façade.
#[derive(Debug)]
pub enum Message {
    Action(Action),
    Resize { width: u16, height: u16 },
    Tick,
    FetchFinished {
        category: Category,
        result: Result<Vec<Item>>,
    },
    StatusTimeout {
        generation: u64,
    },
    ThreadFetched {
        id: u64,
        result: Result<CommentNode>,
    },
}

/// Deferred unit of work. Runs off the loop thread; its message is delivered back onto the loop.
pub type Task = Box<dyn FnOnce() -> Message + Send + 'static>;

pub struct Dispatcher {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn spawn(&self, task: Task) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(task());
        });
    }

    pub fn spawn_all(&self, tasks: Vec<Task>) {
        for task in tasks {
            self.spawn(task);
        }
    }

    pub fn try_recv(&self) -> Option<Message> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Message> {
        self.rx.recv_timeout(timeout).ok()
    }
}
