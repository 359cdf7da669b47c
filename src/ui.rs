use std::io::{self, Stdout, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self as term, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::ansi;
use crate::comments::Formatter;
use crate::data::CommentSource;
use crate::event::{Action, Dispatcher, Message, Task};
use crate::hackernews;
use crate::list::{self, StoryList};

const TICK_RATE: Duration = Duration::from_millis(120);

pub struct Options {
    pub list: list::Options,
    pub comments: Arc<dyn CommentSource>,
    pub formatter: Formatter,
    pub pager: Vec<String>,
}

/// What the loop has to do after a message was handled.
#[derive(Debug, PartialEq)]
enum Outcome {
    Continue,
    Quit,
    Page(String),
}

pub struct Model {
    list: StoryList,
    comments: Arc<dyn CommentSource>,
    formatter: Formatter,
    pager: Vec<String>,
    dispatcher: Dispatcher,
    pending_thread: Option<u64>,
    needs_redraw: bool,
}

impl Model {
    pub fn new(options: Options) -> Self {
        Self {
            list: StoryList::new(options.list),
            comments: options.comments,
            formatter: options.formatter,
            pager: options.pager,
            dispatcher: Dispatcher::new(),
            pending_thread: None,
            needs_redraw: true,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let (width, height) = term::size().context("read terminal size")?;
        self.list.set_viewport(width as usize, height as usize);
        let startup = self.list.fetch_front_page();
        self.dispatcher.spawn(startup);

        let mut last_tick = Instant::now();

        loop {
            while let Some(message) = self.dispatcher.try_recv() {
                match self.handle_message(message) {
                    Outcome::Quit => return Ok(()),
                    Outcome::Page(text) => self.page(terminal, &text)?,
                    Outcome::Continue => {}
                }
            }

            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }

            let timeout = TICK_RATE
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(16));

            if event::poll(timeout)? {
                let message = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        Some(Message::Action(Action::from(key)))
                    }
                    Event::Resize(width, height) => Some(Message::Resize { width, height }),
                    _ => None,
                };
                if let Some(message) = message {
                    match self.handle_message(message) {
                        Outcome::Quit => break,
                        Outcome::Page(text) => self.page(terminal, &text)?,
                        Outcome::Continue => {}
                    }
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                last_tick = Instant::now();
                if self.list.is_spinning() {
                    self.handle_message(Message::Tick);
                }
            }
        }

        Ok(())
    }

    fn handle_message(&mut self, message: Message) -> Outcome {
        self.needs_redraw = true;
        match message {
            Message::Action(Action::Quit) => Outcome::Quit,
            Message::Action(Action::OpenThread) => {
                let tasks = self.list.update(Message::Action(Action::OpenThread));
                self.dispatcher.spawn_all(tasks);
                self.open_thread();
                Outcome::Continue
            }
            Message::Action(Action::OpenLink) => {
                self.open_link();
                Outcome::Continue
            }
            Message::ThreadFetched { id, result } => {
                if self.pending_thread != Some(id) {
                    return Outcome::Continue;
                }
                self.pending_thread = None;
                self.list.stop_spinner();
                self.list.set_disabled_input(false);
                match result {
                    Ok(thread) => {
                        Outcome::Page(self.formatter.format_thread(&thread, self.list.width()))
                    }
                    Err(err) => {
                        tracing::warn!(id, error = %format!("{err:#}"), "loading comments failed");
                        let task = self.list.new_status_message("Could not load comments.");
                        self.dispatcher.spawn(task);
                        Outcome::Continue
                    }
                }
            }
            other => {
                let tasks = self.list.update(other);
                self.dispatcher.spawn_all(tasks);
                Outcome::Continue
            }
        }
    }

    fn open_thread(&mut self) {
        if self.list.is_input_disabled() {
            return;
        }
        let Some(item) = self.list.selected_item() else {
            return;
        };
        let id = item.id;
        tracing::debug!(id, "opening comments");

        self.pending_thread = Some(id);
        self.list.set_disabled_input(true);
        self.list.start_spinner();
        self.dispatcher.spawn(self.fetch_thread_task(id));
    }

    fn fetch_thread_task(&self, id: u64) -> Task {
        let source = Arc::clone(&self.comments);
        Box::new(move || Message::ThreadFetched {
            id,
            result: source.fetch_thread(id),
        })
    }

    fn open_link(&mut self) {
        if self.list.is_input_disabled() {
            return;
        }
        let Some(item) = self.list.selected_item() else {
            return;
        };
        let target = if item.url.is_empty() {
            hackernews::permalink(item.id)
        } else {
            item.url.clone()
        };
        if let Err(err) = webbrowser::open(&target) {
            tracing::warn!(url = %target, error = %err, "opening browser failed");
            let task = self.list.new_status_message("Could not open browser.");
            self.dispatcher.spawn(task);
        }
    }

    /// Hands `text` to the pager with the terminal temporarily restored.
    fn page(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>, text: &str) -> Result<()> {
        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        let result = run_pager(&self.pager, text);

        enable_raw_mode()?;
        terminal.backend_mut().execute(EnterAlternateScreen)?;
        terminal.clear()?;
        self.needs_redraw = true;

        if let Err(err) = result {
            tracing::warn!(error = %format!("{err:#}"), "pager failed");
            let task = self.list.new_status_message("Could not start pager.");
            self.dispatcher.spawn(task);
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let title = if self.list.show_title() {
            self.list.title_view()
        } else {
            String::new()
        };
        let status = if self.list.show_status_bar() {
            self.list.status_view()
        } else {
            String::new()
        };
        let title_height = if title.is_empty() { 0 } else { ansi::height(&title) };
        let status_height = if status.is_empty() { 0 } else { ansi::height(&status) };

        let layout = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(title_height as u16),
                Constraint::Min(0),
                Constraint::Length(status_height as u16),
            ])
            .split(frame.size());

        frame.render_widget(Paragraph::new(ansi::to_text(&title)), layout[0]);
        frame.render_widget(Paragraph::new(ansi::to_text(&self.list.render())), layout[1]);
        frame.render_widget(Paragraph::new(ansi::to_text(&status)), layout[2]);
    }
}

fn run_pager(command: &[String], text: &str) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        bail!("no pager configured");
    };
    tracing::info!(pager = %program, bytes = text.len(), "launching pager");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn pager {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(text.as_bytes()) {
            // the pager may quit before reading everything
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(err).context("write to pager");
            }
        }
    }

    let status = child.wait().context("wait for pager")?;
    if !status.success() {
        bail!("pager exited with {status}");
    }
    Ok(())
}
