#![allow(clippy::uninlined_format_args)]

pub mod ansi;
pub mod app;
pub mod comments;
pub mod config;
pub mod data;
pub mod event;
pub mod hackernews;
pub mod item;
pub mod list;
pub mod ui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::{run, RunOptions};
