use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::comments::Formatter;
use crate::config::{self, Config};
use crate::data::{
    CommentSource, HackerNewsCommentSource, HackerNewsItemSource, ItemSource, MockCommentSource,
    MockItemSource,
};
use crate::hackernews;
use crate::list::{self, FetchMode, StoryDelegate};
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_file: Option<PathBuf>,
    pub debug: bool,
}

pub fn run(options: RunOptions) -> Result<()> {
    let cfg = config::load(config::LoadOptions {
        config_file: options.config_file.clone(),
        env_prefix: None,
    })
    .context("load config")?;

    init_logging(&cfg)?;
    tracing::info!(
        version = crate::VERSION,
        config = %friendly_path(options.config_file.or_else(config::default_path).as_ref()),
        "starting"
    );

    let mock = options.debug || cfg.debug.mock;
    let (items, comments, fetch_mode) = sources(&cfg, mock)?;

    let formatter = Formatter::new(
        cfg.ui.indent_size,
        cfg.ui.comment_width,
        cfg.ui.moderators.clone(),
    );

    let mut model = ui::Model::new(ui::Options {
        list: list::Options {
            source: items,
            delegate: Box::new(StoryDelegate::new(cfg.ui.mark_as_read)),
            fetch_mode,
            shuffle_categories: cfg.ui.shuffle_categories,
            status_lifetime: cfg.ui.status_lifetime,
            width: 0,
            height: 0,
        },
        comments,
        formatter,
        pager: cfg.ui.pager.clone(),
    });
    model.run()?;

    tracing::info!("exiting");
    Ok(())
}

type Sources = (Arc<dyn ItemSource>, Arc<dyn CommentSource>, FetchMode);

fn sources(cfg: &Config, mock: bool) -> Result<Sources> {
    if mock {
        tracing::info!("using mock data");
        return Ok((
            Arc::new(MockItemSource::default()),
            Arc::new(MockCommentSource),
            FetchMode::Blocking,
        ));
    }

    let client = hackernews::Client::new(hackernews::ClientConfig {
        user_agent: cfg.hackernews.user_agent.clone(),
        timeout: cfg.hackernews.timeout,
        http_client: None,
    })
    .context("initialize hackernews client")?;
    let client = Arc::new(client);

    Ok((
        Arc::new(HackerNewsItemSource::new(
            client.clone(),
            cfg.hackernews.page_size,
        )),
        Arc::new(HackerNewsCommentSource::new(client)),
        FetchMode::Deferred,
    ))
}

/// Sends log records to the configured file. The terminal belongs to the UI,
/// so without a file nothing is recorded.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = cfg.log.file.as_ref() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("initialize logging: {err}"))
}

fn friendly_path(path: Option<&PathBuf>) -> String {
    if let Some(path) = path {
        if let Some(home) = dirs::home_dir() {
            if let Ok(stripped) = path.strip_prefix(&home) {
                let mut display = String::from("~");
                if !stripped.as_os_str().is_empty() {
                    display.push_str(&format!("/{}", stripped.display()));
                }
                return display;
            }
        }
        path.display().to_string()
    } else {
        "~/.config/hn-pager/config.yaml".to_string()
    }
}
