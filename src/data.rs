use std::sync::Arc;

use anyhow::{Context, Result};

use crate::hackernews;
use crate::item::{Category, CommentNode, Item};

pub trait ItemSource: Send + Sync {
    fn fetch_stories(&self, page: usize, category: Category) -> Result<Vec<Item>>;
}

pub trait CommentSource: Send + Sync {
    fn fetch_thread(&self, id: u64) -> Result<CommentNode>;
}

pub struct HackerNewsItemSource {
    client: Arc<hackernews::Client>,
    page_size: usize,
}

impl HackerNewsItemSource {
    pub fn new(client: Arc<hackernews::Client>, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }
}

impl ItemSource for HackerNewsItemSource {
    fn fetch_stories(&self, page: usize, category: Category) -> Result<Vec<Item>> {
        self.client
            .stories(category, page, self.page_size)
            .with_context(|| format!("fetch {} stories", category.label()))
    }
}

pub struct HackerNewsCommentSource {
    client: Arc<hackernews::Client>,
}

impl HackerNewsCommentSource {
    pub fn new(client: Arc<hackernews::Client>) -> Self {
        Self { client }
    }
}

impl CommentSource for HackerNewsCommentSource {
    fn fetch_thread(&self, id: u64) -> Result<CommentNode> {
        self.client.thread(id).context("fetch comments")
    }
}

const MOCK_AUTHORS: [&str; 6] = ["pg", "dang", "tptacek", "patio11", "jacquesm", "sctb"];
const MOCK_DOMAINS: [&str; 4] = ["github.com", "", "rust-lang.org", "lwn.net"];

/// Offline stories for debug mode. Every category gets the same shape of data.
#[derive(Debug, Clone)]
pub struct MockItemSource {
    pub count: usize,
}

impl Default for MockItemSource {
    fn default() -> Self {
        Self { count: 30 }
    }
}

impl ItemSource for MockItemSource {
    fn fetch_stories(&self, page: usize, category: Category) -> Result<Vec<Item>> {
        let offset = page * self.count;
        Ok((offset..offset + self.count)
            .map(|n| mock_item(category, n))
            .collect())
    }
}

fn mock_item(category: Category, n: usize) -> Item {
    let prefix = match category {
        Category::Ask => "Ask HN: ",
        Category::Show => "Show HN: ",
        Category::FrontPage | Category::New => "",
    };
    let domain = MOCK_DOMAINS[n % MOCK_DOMAINS.len()];
    Item {
        id: (category.index() * 1_000 + n) as u64,
        author: MOCK_AUTHORS[n % MOCK_AUTHORS.len()].to_string(),
        title: format!("{prefix}Sample {} story number {}", category.label(), n + 1),
        score: (n as i64 * 37) % 500 + 1,
        comments_count: (n as i64 * 13) % 200,
        time_ago: format!("{} hours ago", n % 23 + 1),
        url: if domain.is_empty() {
            String::new()
        } else {
            format!("https://{domain}/story/{n}")
        },
        domain: domain.to_string(),
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockCommentSource;

impl CommentSource for MockCommentSource {
    fn fetch_thread(&self, id: u64) -> Result<CommentNode> {
        let reply = |author: &str, body: &str, replies: Vec<CommentNode>| CommentNode {
            id: id + 1,
            author: author.to_string(),
            body: body.to_string(),
            time_ago: "1 hour ago".to_string(),
            comments_count: replies.len() as i64,
            replies,
            ..CommentNode::default()
        };

        Ok(CommentNode {
            id,
            author: "pg".into(),
            title: format!("Sample story {id}"),
            body: String::new(),
            time_ago: "3 hours ago".into(),
            comments_count: 4,
            score: 128,
            url: "https://github.com/".into(),
            domain: "github.com".into(),
            replies: vec![
                reply(
                    "tptacek",
                    "This is a <i>sample</i> comment.<p>It has two paragraphs &amp; an entity.",
                    vec![reply(
                        "pg",
                        r#"Thanks! See <a href="https:&#x2F;&#x2F;example.com" rel="nofollow">https:&#x2F;&#x2F;example.com</a>"#,
                        vec![],
                    )],
                ),
                reply(
                    "dang",
                    "<pre><code>  fn main() {}\n</code></pre>Please keep it civil.",
                    vec![reply("patio11", "Agreed.", vec![])],
                ),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_stories_are_deterministic() {
        let source = MockItemSource::default();
        let first = source.fetch_stories(0, Category::Ask).unwrap();
        let second = source.fetch_stories(0, Category::Ask).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 30);
        assert!(first[0].title.starts_with("Ask HN: "));
    }

    #[test]
    fn mock_pages_do_not_overlap() {
        let source = MockItemSource { count: 5 };
        let page0 = source.fetch_stories(0, Category::New).unwrap();
        let page1 = source.fetch_stories(1, Category::New).unwrap();
        assert!(page0.iter().all(|a| page1.iter().all(|b| a.id != b.id)));
    }

    #[test]
    fn mock_thread_has_nested_replies() {
        let thread = MockCommentSource.fetch_thread(42).unwrap();
        assert_eq!(thread.replies.len(), 2);
        assert_eq!(thread.descendants(), 4);
    }
}
