use std::collections::HashSet;

use crate::ansi::{self, BOLD, DIMMED, NORMAL, REVERSE, YELLOW};
use crate::event::{Action, Message, Task};
use crate::item::Item;

/// What a delegate needs to know about the row it is drawing.
#[derive(Debug, Clone, Copy)]
pub struct RowContext {
    /// Position in the whole category, not just the page.
    pub index: usize,
    pub selected: bool,
    pub width: usize,
}

/// Layout strategy for one list row. Pagination only reads `height` and `spacing`.
pub trait ItemDelegate: Send {
    /// Writes exactly `height()` lines, without a trailing newline.
    fn render(&self, out: &mut String, row: &RowContext, item: &Item);
    fn height(&self) -> usize;
    fn spacing(&self) -> usize;
    fn update(&mut self, message: &Message, selected: Option<&Item>) -> Option<Task>;
}

const RANK_WIDTH: usize = 4;

/// Two-line story row: rank and title, then score/author/age/comments.
#[derive(Debug, Default)]
pub struct StoryDelegate {
    mark_as_read: bool,
    read: HashSet<u64>,
}

impl StoryDelegate {
    pub fn new(mark_as_read: bool) -> Self {
        Self {
            mark_as_read,
            read: HashSet::new(),
        }
    }

    pub fn is_read(&self, id: u64) -> bool {
        self.read.contains(&id)
    }
}

impl ItemDelegate for StoryDelegate {
    fn render(&self, out: &mut String, row: &RowContext, item: &Item) {
        let rank = format!("{:>width$}.", row.index + 1, width = RANK_WIDTH - 1);
        let domain = if item.domain.is_empty() {
            String::new()
        } else {
            format!(" ({})", item.domain)
        };
        let title_room = row
            .width
            .saturating_sub(RANK_WIDTH + 1 + ansi::visible_width(&domain));
        let title = ansi::truncate(&item.title, title_room);

        if row.selected {
            out.push_str(&format!("{YELLOW}{BOLD}{rank}{NORMAL} {REVERSE}{title}{NORMAL}"));
        } else if self.is_read(item.id) {
            out.push_str(&format!("{DIMMED}{rank} {title}{NORMAL}"));
        } else {
            out.push_str(&format!("{DIMMED}{rank}{NORMAL} {title}"));
        }
        out.push_str(&format!("{DIMMED}{domain}{NORMAL}\n"));

        let plural = if item.comments_count == 1 { "" } else { "s" };
        let meta = format!(
            "{} points by {} {} | {} comment{plural}",
            item.score, item.author, item.time_ago, item.comments_count
        );
        let meta = ansi::truncate(&meta, row.width.saturating_sub(RANK_WIDTH + 1));
        out.push_str(&format!(
            "{}{DIMMED}{meta}{NORMAL}",
            " ".repeat(RANK_WIDTH + 1)
        ));
    }

    fn height(&self) -> usize {
        2
    }

    fn spacing(&self) -> usize {
        1
    }

    fn update(&mut self, message: &Message, selected: Option<&Item>) -> Option<Task> {
        if let (Message::Action(Action::OpenThread), Some(item)) = (message, selected) {
            if self.mark_as_read {
                self.read.insert(item.id);
            }
        }
        None
    }
}
