//! Paginated, per-category story list.
//!
//! All mutation happens on the caller's loop thread. Fetches and status
//! expiry are handed back as [`Task`]s whose [`Message`]s must be fed into
//! [`StoryList::update`].

mod delegate;
mod paginator;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use rand::seq::SliceRandom;

use crate::ansi::{self, BOLD, DIMMED, NORMAL, REVERSE, YELLOW};
use crate::data::ItemSource;
use crate::event::{Action, Message, Task};
use crate::item::{Category, Item, NUMBER_OF_CATEGORIES};

pub use delegate::{ItemDelegate, RowContext, StoryDelegate};
pub use paginator::Paginator;

pub const NO_ITEMS: &str = "No items.";
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const STATUS_SIDE_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// How a category switch onto an empty buffer gets its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Fetch inline before switching. Used with the offline source.
    Blocking,
    /// Return a task and disable input until it completes.
    Deferred,
}

pub struct Options {
    pub source: Arc<dyn ItemSource>,
    pub delegate: Box<dyn ItemDelegate>,
    pub fetch_mode: FetchMode,
    pub shuffle_categories: bool,
    pub status_lifetime: Duration,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Default)]
struct Spinner {
    index: usize,
}

impl Spinner {
    fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.index % SPINNER_FRAMES.len()]
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % SPINNER_FRAMES.len();
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}

pub struct StoryList {
    show_title: bool,
    show_status_bar: bool,
    disable_input: bool,
    on_startup: bool,

    width: usize,
    height: usize,
    paginator: Paginator,
    cursor: usize,

    spinner: Spinner,
    show_spinner: bool,

    status_lifetime: Duration,
    status_message: String,
    status_generation: u64,

    category: Category,
    items: [Vec<Item>; NUMBER_OF_CATEGORIES],

    delegate: Box<dyn ItemDelegate>,
    source: Arc<dyn ItemSource>,
    fetch_mode: FetchMode,
    shuffle_categories: bool,
}

impl StoryList {
    pub fn new(opts: Options) -> Self {
        let mut list = Self {
            show_title: true,
            show_status_bar: true,
            disable_input: true,
            on_startup: true,
            width: opts.width,
            height: opts.height,
            paginator: Paginator::default(),
            cursor: 0,
            spinner: Spinner::default(),
            show_spinner: false,
            status_lifetime: opts.status_lifetime,
            status_message: String::new(),
            status_generation: 0,
            category: Category::FrontPage,
            items: Default::default(),
            delegate: opts.delegate,
            source: opts.source,
            fetch_mode: opts.fetch_mode,
            shuffle_categories: opts.shuffle_categories,
        };
        list.update_pagination();
        list
    }

    /// Starts the initial front page load. Input stays disabled until it lands.
    pub fn fetch_front_page(&mut self) -> Task {
        self.fetch_task(Category::FrontPage)
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
        self.update_pagination();
    }

    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn set_show_status_bar(&mut self, show: bool) {
        self.show_status_bar = show;
        self.update_pagination();
    }

    pub fn show_status_bar(&self) -> bool {
        self.show_status_bar
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.update_pagination();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn items(&self) -> &[Item] {
        &self.items[self.category.index()]
    }

    /// Replaces the active category's items, keeping the selection index where possible.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items[self.category.index()] = items;
        self.update_pagination();
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selection index across every page of the active category.
    pub fn index(&self) -> usize {
        self.paginator.page * self.paginator.per_page + self.cursor
    }

    pub fn select(&mut self, index: usize) {
        let per_page = self.paginator.per_page.max(1);
        self.paginator.page = index / per_page;
        self.cursor = index % per_page;
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items().get(self.index())
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Prev => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Direction::Next => {
                let on_page = self.items_on_page();
                self.cursor = (self.cursor + 1).min(on_page.saturating_sub(1));
            }
        }
    }

    pub fn change_page(&mut self, direction: Direction) {
        match direction {
            Direction::Prev => self.paginator.prev_page(),
            Direction::Next => self.paginator.next_page(),
        }
        self.clamp_cursor();
    }

    pub fn go_to_start(&mut self) {
        self.paginator.page = 0;
        self.cursor = 0;
    }

    pub fn go_to_end(&mut self) {
        self.paginator.page = self.paginator.total_pages.saturating_sub(1);
        self.cursor = self.items_on_page().saturating_sub(1);
    }

    /// Cycles through categories. Landing on an empty buffer fetches it, either
    /// inline or through the returned task depending on the fetch mode.
    pub fn switch_category(&mut self, direction: Direction) -> Option<Task> {
        let target = match direction {
            Direction::Prev => self.category.previous(),
            Direction::Next => self.category.next(),
        };
        self.select_category(target)
    }

    fn select_category(&mut self, category: Category) -> Option<Task> {
        tracing::debug!(category = category.label(), "switch category");
        self.category = category;
        self.paginator.page = 0;
        self.cursor = 0;

        if !self.items[category.index()].is_empty() {
            self.update_pagination();
            return None;
        }

        match self.fetch_mode {
            FetchMode::Blocking => {
                let result = self.source.fetch_stories(0, category);
                let task = self.store_fetched(category, result);
                self.update_pagination();
                task
            }
            FetchMode::Deferred => {
                self.update_pagination();
                Some(self.fetch_task(category))
            }
        }
    }

    fn fetch_task(&mut self, category: Category) -> Task {
        tracing::info!(category = category.label(), "fetching stories");
        self.disable_input = true;
        self.start_spinner();
        let source = self.source.clone();
        Box::new(move || Message::FetchFinished {
            category,
            result: source.fetch_stories(0, category),
        })
    }

    fn store_fetched(&mut self, category: Category, result: Result<Vec<Item>>) -> Option<Task> {
        match result {
            Ok(mut stories) => {
                tracing::info!(
                    category = category.label(),
                    count = stories.len(),
                    "stories fetched"
                );
                if self.shuffle_categories && category != Category::FrontPage {
                    stories.shuffle(&mut rand::thread_rng());
                }
                self.items[category.index()] = stories;
                None
            }
            Err(err) => {
                tracing::warn!(category = category.label(), error = %err, "fetch failed");
                Some(self.new_status_message(format!(
                    "Could not fetch {}: {err}",
                    category.label()
                )))
            }
        }
    }

    fn finish_fetch(&mut self, category: Category, result: Result<Vec<Item>>) -> Option<Task> {
        let task = self.store_fetched(category, result);
        self.stop_spinner();
        self.disable_input = false;
        self.on_startup = false;
        self.update_pagination();
        task
    }

    pub fn is_input_disabled(&self) -> bool {
        self.disable_input
    }

    pub fn set_disabled_input(&mut self, value: bool) {
        self.disable_input = value;
    }

    pub fn on_startup(&self) -> bool {
        self.on_startup
    }

    pub fn start_spinner(&mut self) {
        self.show_spinner = true;
        self.spinner.reset();
    }

    pub fn stop_spinner(&mut self) {
        self.show_spinner = false;
    }

    pub fn is_spinning(&self) -> bool {
        self.show_spinner
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Shows `text` using the configured lifetime.
    pub fn new_status_message(&mut self, text: impl Into<String>) -> Task {
        let lifetime = self.status_lifetime;
        self.set_status_message(text, lifetime)
    }

    /// Shows `text` until `duration` passes. Any expiry armed for an earlier
    /// message is disarmed; a zero duration expires right away.
    pub fn set_status_message(&mut self, text: impl Into<String>, duration: Duration) -> Task {
        self.status_message = text.into();
        self.status_generation = self.status_generation.wrapping_add(1);
        let generation = self.status_generation;
        Box::new(move || {
            if !duration.is_zero() {
                thread::sleep(duration);
            }
            Message::StatusTimeout { generation }
        })
    }

    fn hide_status_message(&mut self) {
        self.status_message.clear();
    }

    pub fn update(&mut self, message: Message) -> Vec<Task> {
        match message {
            Message::Tick => {
                if self.show_spinner {
                    self.spinner.advance();
                }
                Vec::new()
            }
            Message::Resize { width, height } => {
                self.set_viewport(width as usize, height as usize);
                Vec::new()
            }
            Message::FetchFinished { category, result } => {
                self.finish_fetch(category, result).into_iter().collect()
            }
            Message::StatusTimeout { generation } => {
                if generation == self.status_generation {
                    self.hide_status_message();
                }
                Vec::new()
            }
            Message::Action(action) => self.handle_browsing(action),
            Message::ThreadFetched { .. } => Vec::new(),
        }
    }

    fn handle_browsing(&mut self, action: Action) -> Vec<Task> {
        if self.disable_input {
            return Vec::new();
        }

        let mut tasks = Vec::new();
        match action {
            Action::MoveUp => self.move_cursor(Direction::Prev),
            Action::MoveDown => self.move_cursor(Direction::Next),
            Action::PrevPage => self.change_page(Direction::Prev),
            Action::NextPage => self.change_page(Direction::Next),
            Action::NextCategory => tasks.extend(self.switch_category(Direction::Next)),
            Action::PrevCategory => tasks.extend(self.switch_category(Direction::Prev)),
            Action::GoToStart => self.go_to_start(),
            Action::GoToEnd => self.go_to_end(),
            Action::Quit | Action::OpenThread | Action::OpenLink | Action::None => {}
        }

        let selected = self.items[self.category.index()]
            .get(self.paginator.page * self.paginator.per_page + self.cursor);
        tasks.extend(self.delegate.update(&Message::Action(action), selected));

        self.clamp_cursor();
        tasks
    }

    fn items_on_page(&self) -> usize {
        self.paginator.items_on_page(self.items().len())
    }

    fn clamp_cursor(&mut self) {
        let on_page = self.items_on_page();
        if self.cursor + 1 > on_page {
            self.cursor = on_page.saturating_sub(1);
        }
    }

    fn available_height(&self) -> usize {
        let mut available = self.height;
        if self.show_title {
            available = available.saturating_sub(ansi::height(&self.title_view()));
        }
        if self.show_status_bar {
            available = available.saturating_sub(ansi::height(&self.status_view()));
        }
        available
    }

    fn update_pagination(&mut self) {
        let index = self.index();
        let row_height = (self.delegate.height() + self.delegate.spacing()).max(1);

        self.paginator.per_page = (self.available_height() / row_height).max(1);
        self.paginator.set_total_pages(self.items().len());

        let per_page = self.paginator.per_page;
        self.paginator.page = index / per_page;
        self.cursor = index % per_page;

        if self.paginator.page >= self.paginator.total_pages {
            self.paginator.page = self.paginator.total_pages.saturating_sub(1);
        }
        self.clamp_cursor();
    }

    pub fn title_view(&self) -> String {
        let categories = Category::ALL
            .iter()
            .map(|category| {
                if *category == self.category {
                    format!("{BOLD}{YELLOW}{}{NORMAL}", category.label())
                } else {
                    format!("{DIMMED}{}{NORMAL}", category.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{REVERSE}{BOLD} Y {NORMAL} {BOLD}Hacker News{NORMAL}  {categories}\n")
    }

    pub fn status_view(&self) -> String {
        let center = if self.show_spinner {
            format!("{} fetching", self.spinner.frame())
        } else {
            self.status_message.clone()
        };
        let center_width = self.width.saturating_sub(STATUS_SIDE_WIDTH * 2);
        let center = ansi::truncate(&ansi::strip(&center), center_width);

        format!(
            "{}{}{}",
            " ".repeat(STATUS_SIDE_WIDTH),
            ansi::center(&center, center_width),
            ansi::center(&self.paginator.view(), STATUS_SIDE_WIDTH)
        )
    }

    /// Rows of the current page. Short and empty pages are padded so every
    /// page has the same height.
    pub fn render(&self) -> String {
        let items = self.items();
        let height = self.delegate.height();
        let spacing = self.delegate.spacing();
        let per_page = self.paginator.per_page;
        let page_newlines = (per_page * (height + spacing)).saturating_sub(spacing + 1);

        let mut out = String::new();

        if items.is_empty() {
            out.push_str(&format!("{DIMMED}{NO_ITEMS}{NORMAL}"));
            out.push_str(&"\n".repeat(page_newlines));
            return out;
        }

        let (start, end) = self.paginator.slice_bounds(items.len());
        let page = &items[start..end];
        for (offset, item) in page.iter().enumerate() {
            let row = RowContext {
                index: start + offset,
                selected: offset == self.cursor,
                width: self.width,
            };
            self.delegate.render(&mut out, &row, item);
            if offset + 1 != page.len() {
                out.push_str(&"\n".repeat(spacing + 1));
            }
        }

        let on_page = page.len();
        if on_page < per_page {
            out.push_str(&"\n".repeat((per_page - on_page) * (height + spacing)));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        per_category: usize,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(per_category: usize) -> Arc<Self> {
            Arc::new(Self {
                per_category,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ItemSource for CountingSource {
        fn fetch_stories(&self, _page: usize, category: Category) -> Result<Vec<Item>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(stories(category, self.per_category))
        }
    }

    struct FailingSource;

    impl ItemSource for FailingSource {
        fn fetch_stories(&self, _page: usize, _category: Category) -> Result<Vec<Item>> {
            anyhow::bail!("connection refused")
        }
    }

    struct LineDelegate;

    impl ItemDelegate for LineDelegate {
        fn render(&self, out: &mut String, row: &RowContext, item: &Item) {
            let marker = if row.selected { ">" } else { " " };
            out.push_str(&format!("{marker}{}", item.title));
        }

        fn height(&self) -> usize {
            1
        }

        fn spacing(&self) -> usize {
            0
        }

        fn update(&mut self, _message: &Message, _selected: Option<&Item>) -> Option<Task> {
            None
        }
    }

    fn stories(category: Category, count: usize) -> Vec<Item> {
        (0..count)
            .map(|n| Item {
                id: n as u64,
                title: format!("{} {n}", category.label()),
                ..Item::default()
            })
            .collect()
    }

    fn list_with(
        source: Arc<dyn ItemSource>,
        delegate: Box<dyn ItemDelegate>,
        fetch_mode: FetchMode,
        height: usize,
    ) -> StoryList {
        StoryList::new(Options {
            source,
            delegate,
            fetch_mode,
            shuffle_categories: false,
            status_lifetime: Duration::from_millis(10),
            width: 80,
            height,
        })
    }

    /// Story rows are 2 lines + 1 spacing; title chrome 2 lines, status 1.
    /// A height of 33 leaves 30 rows, so 10 items per page.
    fn loaded_list(count: usize) -> StoryList {
        let source = CountingSource::new(count);
        let mut list = list_with(
            source,
            Box::new(StoryDelegate::new(true)),
            FetchMode::Blocking,
            33,
        );
        let task = list.fetch_front_page();
        let tasks = list.update(task());
        assert!(tasks.is_empty());
        list
    }

    #[test]
    fn shrinking_items_clamps_cursor_on_the_same_page() {
        let mut list = loaded_list(25);
        assert_eq!(list.paginator().per_page, 10);
        list.select(9);

        let first_five = list.items()[..5].to_vec();
        list.set_items(first_five);

        assert_eq!(list.paginator().page, 0);
        assert_eq!(list.cursor(), 4);
        assert_eq!(list.selected_item().map(|item| item.id), Some(4));
    }

    #[test]
    fn front_page_fetch_enables_input() {
        let source = CountingSource::new(3);
        let mut list = list_with(
            source,
            Box::new(LineDelegate),
            FetchMode::Deferred,
            20,
        );
        assert!(list.is_input_disabled());
        assert!(list.on_startup());
        let task = list.fetch_front_page();
        assert!(list.is_spinning());
        list.update(task());
        assert!(!list.is_input_disabled());
        assert!(!list.is_spinning());
        assert!(!list.on_startup());
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn failed_fetch_still_enables_input() {
        let mut list = list_with(
            Arc::new(FailingSource),
            Box::new(LineDelegate),
            FetchMode::Deferred,
            20,
        );
        let task = list.fetch_front_page();
        let tasks = list.update(task());
        assert_eq!(tasks.len(), 1);
        assert!(!list.is_input_disabled());
        assert!(list.items().is_empty());
        assert!(list.status_message().contains("connection refused"));
    }

    #[test]
    fn pagination_follows_viewport() {
        let list = loaded_list(25);
        assert_eq!(list.paginator().per_page, 10);
        assert_eq!(list.paginator().total_pages, 3);
    }

    #[test]
    fn degenerate_viewport_keeps_one_item_per_page() {
        let mut list = loaded_list(5);
        list.set_viewport(0, 0);
        assert_eq!(list.paginator().per_page, 1);
        assert_eq!(list.paginator().total_pages, 5);
    }

    #[test]
    fn selection_index_round_trips() {
        let mut list = loaded_list(95);
        for index in 0..95 {
            list.select(index);
            assert_eq!(list.index(), index);
            let per_page = list.paginator().per_page;
            assert_eq!(list.paginator().page * per_page + list.cursor(), index);
        }
    }

    #[test]
    fn total_pages_never_shrink_as_items_grow() {
        let mut list = loaded_list(0);
        let mut previous = list.paginator().total_pages;
        for count in 0..60 {
            list.set_items(stories(Category::FrontPage, count));
            let total = list.paginator().total_pages;
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn chrome_never_increases_items_per_page() {
        let mut list = loaded_list(30);
        list.set_show_title(false);
        list.set_show_status_bar(false);
        let bare = list.paginator().per_page;
        list.set_show_title(true);
        let with_title = list.paginator().per_page;
        list.set_show_status_bar(true);
        let with_both = list.paginator().per_page;
        assert!(with_title <= bare);
        assert!(with_both <= with_title);
    }

    #[test]
    fn set_viewport_is_idempotent() {
        let mut list = loaded_list(42);
        list.select(17);
        list.set_viewport(100, 40);
        let first = (*list.paginator(), list.cursor());
        list.set_viewport(100, 40);
        assert_eq!((*list.paginator(), list.cursor()), first);
    }

    #[test]
    fn resize_keeps_the_selected_item() {
        let mut list = loaded_list(30);
        list.select(14);
        let before = list.selected_item().cloned();
        list.set_viewport(80, 63);
        assert_eq!(list.selected_item().cloned(), before);
    }

    #[test]
    fn cursor_clamps_within_page() {
        let mut list = loaded_list(25);
        for _ in 0..50 {
            list.move_cursor(Direction::Next);
        }
        assert_eq!(list.cursor(), 9);
        assert_eq!(list.paginator().page, 0);
        for _ in 0..50 {
            list.move_cursor(Direction::Prev);
        }
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn cursor_clamps_on_short_last_page() {
        let mut list = loaded_list(25);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.move_cursor(Direction::Next);
        list.change_page(Direction::Next);
        list.change_page(Direction::Next);
        assert_eq!(list.paginator().page, 2);
        assert_eq!(list.cursor(), 4);
        for _ in 0..10 {
            list.move_cursor(Direction::Next);
        }
        assert_eq!(list.cursor(), 4);
    }

    #[test]
    fn change_page_is_noop_at_ends() {
        let mut list = loaded_list(25);
        list.change_page(Direction::Prev);
        assert_eq!(list.paginator().page, 0);
        list.go_to_end();
        list.change_page(Direction::Next);
        assert_eq!(list.paginator().page, 2);
    }

    #[test]
    fn go_to_end_and_start() {
        let mut list = loaded_list(25);
        list.go_to_end();
        assert_eq!(list.index(), 24);
        assert_eq!(list.selected_item().map(|item| item.id), Some(24));
        list.go_to_start();
        assert_eq!(list.index(), 0);
    }

    #[test]
    fn categories_wrap_around() {
        let mut list = loaded_list(12);
        for _ in 0..NUMBER_OF_CATEGORIES {
            list.switch_category(Direction::Next);
        }
        assert_eq!(list.category(), Category::FrontPage);
        list.switch_category(Direction::Prev);
        assert_eq!(list.category(), Category::Show);
    }

    #[test]
    fn blocking_switch_fetches_empty_category_once() {
        let source = CountingSource::new(12);
        let mut list = list_with(
            source.clone(),
            Box::new(LineDelegate),
            FetchMode::Blocking,
            20,
        );
        let task = list.fetch_front_page();
        list.update(task());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        list.select(5);
        assert!(list.switch_category(Direction::Next).is_none());
        assert_eq!(list.category(), Category::New);
        assert_eq!(list.items().len(), 12);
        assert_eq!(list.index(), 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        list.switch_category(Direction::Prev);
        list.switch_category(Direction::Next);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn deferred_switch_disables_input_until_completion() {
        let source = CountingSource::new(7);
        let mut list = list_with(
            source,
            Box::new(LineDelegate),
            FetchMode::Deferred,
            20,
        );
        let task = list.fetch_front_page();
        list.update(task());

        let mut tasks = list.update(Message::Action(Action::NextCategory));
        assert_eq!(tasks.len(), 1);
        assert_eq!(list.category(), Category::New);
        assert!(list.is_input_disabled());
        assert!(list.update(Message::Action(Action::MoveDown)).is_empty());
        assert_eq!(list.cursor(), 0);

        let task = tasks.remove(0);
        list.update(task());
        assert!(!list.is_input_disabled());
        assert_eq!(list.items().len(), 7);
        assert_eq!(list.items()[0].title, "new 0");
    }

    #[test]
    fn shuffle_keeps_every_story() {
        let source = CountingSource::new(40);
        let mut list = StoryList::new(Options {
            source,
            delegate: Box::new(LineDelegate),
            fetch_mode: FetchMode::Blocking,
            shuffle_categories: true,
            status_lifetime: Duration::from_millis(10),
            width: 80,
            height: 20,
        });
        let task = list.fetch_front_page();
        list.update(task());
        assert_eq!(list.items()[0].title, "top 0");

        list.switch_category(Direction::Next);
        let mut ids: Vec<u64> = list.items().iter().map(|item| item.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..40).collect::<Vec<u64>>());
    }

    #[test]
    fn zero_duration_status_expires() {
        let mut list = loaded_list(3);
        let task = list.set_status_message("x", Duration::ZERO);
        assert_eq!(list.status_message(), "x");
        list.update(task());
        assert_eq!(list.status_message(), "");
    }

    #[test]
    fn newer_status_disarms_older_expiry() {
        let mut list = loaded_list(3);
        let first = list.set_status_message("first", Duration::ZERO);
        let second = list.set_status_message("second", Duration::ZERO);
        list.update(first());
        assert_eq!(list.status_message(), "second");
        list.update(second());
        assert_eq!(list.status_message(), "");
    }

    #[test]
    fn empty_buffer_renders_placeholder() {
        let list = loaded_list(0);
        let body = list.render();
        assert!(!body.is_empty());
        assert!(ansi::strip(&body).starts_with(NO_ITEMS));
    }

    #[test]
    fn rendered_height_is_constant_across_pages() {
        let mut list = loaded_list(25);
        let full = ansi::height(&list.render());
        list.go_to_end();
        let short = ansi::height(&list.render());
        list.set_items(Vec::new());
        let empty = ansi::height(&list.render());
        assert_eq!(full, short);
        assert_eq!(full, empty);
        assert_eq!(full, 10 * 3 - 1);
    }

    #[test]
    fn render_marks_the_cursor_row() {
        let source = CountingSource::new(3);
        let mut list = list_with(
            source,
            Box::new(LineDelegate),
            FetchMode::Blocking,
            20,
        );
        let task = list.fetch_front_page();
        list.update(task());
        list.move_cursor(Direction::Next);
        let body = list.render();
        let rows: Vec<&str> = body.split('\n').collect();
        assert_eq!(rows[0], " top 0");
        assert_eq!(rows[1], ">top 1");
    }

    #[test]
    fn spinner_shows_while_fetching() {
        let source = CountingSource::new(3);
        let mut list = list_with(
            source,
            Box::new(LineDelegate),
            FetchMode::Deferred,
            20,
        );
        let _task = list.fetch_front_page();
        assert!(ansi::strip(&list.status_view()).contains("fetching"));
        list.update(Message::Tick);
        assert!(list.is_spinning());
    }
}
