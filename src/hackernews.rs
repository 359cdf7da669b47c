use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::item::{Category, CommentNode, Item};

pub const HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";
pub const HN_ITEM_URL: &str = "https://news.ycombinator.com/item";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("hackernews client user agent required")]
    MissingUserAgent,
    #[error("item {0} does not exist")]
    MissingItem(u64),
    #[error("item {0} is not a story")]
    NotAStory(u64),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub http_client: Option<HttpClient>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("hn-pager/{}", crate::VERSION),
            timeout: Duration::from_secs(20),
            http_client: None,
        }
    }
}

pub struct Client {
    http: HttpClient,
    user_agent: String,
    base_url: String,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            return Err(ClientError::MissingUserAgent.into());
        }

        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(config.timeout)
                .build()
                .context("hackernews: build http client")?,
        };

        Ok(Client {
            http,
            user_agent: config.user_agent,
            base_url: HN_API_BASE.to_string(),
        })
    }

    /// Stories of `category` in the window `[page * page_size, (page + 1) * page_size)`.
    pub fn stories(&self, category: Category, page: usize, page_size: usize) -> Result<Vec<Item>> {
        let url = format!("{}/{}.json", self.base_url, category.endpoint());
        let ids: Vec<u64> = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("hackernews: list {}", category.endpoint()))?
            .json()
            .context("hackernews: decode story ids")?;

        let start = (page * page_size).min(ids.len());
        let end = (start + page_size).min(ids.len());
        let now = Utc::now();

        let mut stories = Vec::with_capacity(end - start);
        for id in &ids[start..end] {
            match self.get_item(*id) {
                Ok(item) => {
                    if let Some(story) = item.into_story(now) {
                        stories.push(story);
                    }
                }
                Err(err) => tracing::debug!(id, error = %err, "skipping story"),
            }
        }
        Ok(stories)
    }

    /// The story `story_id` with its full reply tree.
    pub fn thread(&self, story_id: u64) -> Result<CommentNode> {
        let item = self.get_item(story_id)?;
        if item.item_type != "story" && item.item_type != "job" && item.item_type != "poll" {
            return Err(ClientError::NotAStory(story_id).into());
        }
        let now = Utc::now();
        let replies = self.replies(&item, now);
        let mut root = item.into_node(now);
        root.replies = replies;
        Ok(root)
    }

    fn replies(&self, parent: &ApiItem, now: DateTime<Utc>) -> Vec<CommentNode> {
        let mut replies = Vec::new();
        for kid in parent.kids.iter().flatten() {
            let child = match self.get_item(*kid) {
                Ok(child) => child,
                Err(err) => {
                    tracing::debug!(id = kid, error = %err, "skipping comment");
                    continue;
                }
            };
            if child.item_type != "comment" || child.dead {
                continue;
            }
            let grandchildren = self.replies(&child, now);
            if child.deleted && grandchildren.is_empty() {
                continue;
            }
            let mut node = child.into_node(now);
            node.replies = grandchildren;
            replies.push(node);
        }
        replies
    }

    fn get_item(&self, id: u64) -> Result<ApiItem> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let item: Option<ApiItem> = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("hackernews: fetch item {id}"))?
            .json()
            .with_context(|| format!("hackernews: decode item {id}"))?;
        item.ok_or_else(|| ClientError::MissingItem(id).into())
    }
}

/// Raw item as served by the Firebase API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiItem {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub kids: Option<Vec<u64>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub descendants: Option<i64>,
}

impl ApiItem {
    pub fn into_story(self, now: DateTime<Utc>) -> Option<Item> {
        if self.item_type != "story" && self.item_type != "job" && self.item_type != "poll" {
            return None;
        }
        if self.dead || self.deleted {
            return None;
        }

        let url = self.url.unwrap_or_default();
        Some(Item {
            id: self.id,
            domain: domain_of(&url),
            url,
            author: self.by.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            score: self.score.unwrap_or(0),
            comments_count: self.descendants.unwrap_or(0),
            time_ago: time_ago(self.time.unwrap_or(0), now),
        })
    }

    fn into_node(self, now: DateTime<Utc>) -> CommentNode {
        let url = self.url.unwrap_or_default();
        let author = match self.by {
            Some(by) if !self.deleted => by,
            _ => "[deleted]".to_string(),
        };
        CommentNode {
            id: self.id,
            author,
            title: self.title.unwrap_or_default(),
            body: self.text.unwrap_or_default(),
            time_ago: time_ago(self.time.unwrap_or(0), now),
            comments_count: self
                .descendants
                .unwrap_or_else(|| self.kids.as_ref().map_or(0, |kids| kids.len() as i64)),
            score: self.score.unwrap_or(0),
            domain: domain_of(&url),
            url,
            replies: Vec::new(),
        }
    }
}

pub fn permalink(id: u64) -> String {
    format!("{HN_ITEM_URL}?id={id}")
}

/// Host of `url` without a leading `www.`; empty for self posts.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
        .map(|host| host.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

/// Relative age in the style the site uses, e.g. "3 hours ago".
pub fn time_ago(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(then) = Utc.timestamp_opt(timestamp, 0).single() else {
        return String::new();
    };
    let seconds = (now - then).num_seconds().max(0);

    let (amount, unit) = match seconds {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 2_592_000 => (s / 86_400, "day"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}
