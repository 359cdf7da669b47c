//! Turns comment trees into wrapped, indented, ANSI-decorated text.

use once_cell::sync::Lazy;
use regex::Regex;
use textwrap::{wrap, Options as WrapOptions, WordSeparator, WordSplitter};

use crate::ansi::{self, BOLD, DIMMED, GREEN, ITALIC, NORMAL, RED};
use crate::hackernews;
use crate::item::CommentNode;

/// Columns kept free on the right of every wrapped comment line.
pub const RIGHT_MARGIN: usize = 3;
/// Columns subtracted when right-aligning the age next to the author.
pub const AGE_PADDING: usize = 6;
pub const DEFAULT_INDENT_SIZE: usize = 5;
pub const DEFAULT_MODERATORS: [&str; 2] = ["dang", "sctb"];

const NEWLINE: &str = "\n";
const DOUBLE_NEWLINE: &str = "\n\n";

static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a href="([^"]*)"[^>]*>(.*?)</a>"#).expect("valid anchor regex")
});

#[derive(Debug, Clone)]
pub struct Formatter {
    indent_size: usize,
    comment_width: usize,
    moderators: Vec<String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            comment_width: 0,
            moderators: DEFAULT_MODERATORS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Formatter {
    /// `comment_width` of zero lets comments use the whole terminal.
    pub fn new(indent_size: usize, comment_width: usize, moderators: Vec<String>) -> Self {
        Self {
            indent_size,
            comment_width,
            moderators,
        }
    }

    pub fn indent(&self, depth: usize) -> usize {
        depth * self.indent_size
    }

    /// Formats `node` and all of its replies, depth first.
    pub fn format(&self, node: &CommentNode, original_poster: &str, width: usize) -> String {
        let mut out = String::new();
        self.write_node(node, original_poster, width, 0, &mut out);
        out
    }

    /// Header block for the story followed by every top-level reply.
    pub fn format_thread(&self, story: &CommentNode, width: usize) -> String {
        let mut out = self.format_header(story);
        for reply in &story.replies {
            self.write_node(reply, &story.author, width, 0, &mut out);
        }
        out
    }

    pub fn format_header(&self, story: &CommentNode) -> String {
        let headline = format!("{BOLD}{}{NORMAL}{}", story.title, domain_label(story));
        let plural = if story.comments_count == 1 { "" } else { "s" };
        let info = format!(
            "{} points by {BOLD}{}{NORMAL} {} | {} comment{plural}{DOUBLE_NEWLINE}",
            story.score, story.author, story.time_ago, story.comments_count
        );
        let rule_width = ansi::visible_width(&headline);

        let mut out = headline;
        out.push_str(NEWLINE);
        out.push_str(&info);

        let body = decode(&story.body);
        if !body.trim().is_empty() {
            let paragraphs: Vec<String> = body
                .split(NEWLINE)
                .map(|paragraph| wrap_paragraph(paragraph, rule_width.max(1), 0))
                .collect();
            out.push_str(&paragraphs.join(DOUBLE_NEWLINE));
            out.push_str(NEWLINE);
        }

        out.push_str(&"-".repeat(rule_width));
        out.push_str(DOUBLE_NEWLINE);
        out
    }

    fn write_node(
        &self,
        node: &CommentNode,
        original_poster: &str,
        width: usize,
        depth: usize,
        out: &mut String,
    ) {
        let indent = self.indent(depth);
        let author = mark_author(&node.author, original_poster, &self.moderators);
        let gap = age_gap(
            ansi::visible_width(&author),
            ansi::visible_width(&node.time_ago),
            width,
            indent,
        );

        out.push_str(&format!(
            "{BOLD}{}{author}{NORMAL} {}{DIMMED}{}{NORMAL}{NEWLINE}",
            " ".repeat(indent),
            " ".repeat(gap),
            node.time_ago
        ));

        let body = decode(&node.body);
        if body.trim().is_empty() {
            out.push_str(NEWLINE);
        } else {
            let wrap_width = self.wrap_width(width, indent);
            for paragraph in body.split(NEWLINE) {
                out.push_str(&wrap_paragraph(paragraph, wrap_width, indent));
                out.push_str(DOUBLE_NEWLINE);
            }
        }

        for reply in &node.replies {
            self.write_node(reply, original_poster, width, depth + 1, out);
        }
    }

    fn wrap_width(&self, width: usize, indent: usize) -> usize {
        let available = width.saturating_sub(indent + RIGHT_MARGIN);
        let capped = if self.comment_width > 0 {
            available.min(self.comment_width)
        } else {
            available
        };
        capped.max(1)
    }
}

/// Formats with the default indent and moderator list.
pub fn format(node: &CommentNode, original_poster: &str, width: usize) -> String {
    Formatter::default().format(node, original_poster, width)
}

/// Spaces between the author and the right-aligned age. Never negative.
pub fn age_gap(author_width: usize, age_width: usize, width: usize, indent: usize) -> usize {
    width.saturating_sub(author_width + age_width + AGE_PADDING + indent)
}

/// Appends ` mod` for moderators and ` OP` for the story author; both can apply.
pub fn mark_author(author: &str, original_poster: &str, moderators: &[String]) -> String {
    let mut marked = author.to_string();
    if moderators.iter().any(|moderator| moderator == author) {
        marked.push_str(&format!("{GREEN} mod{NORMAL}"));
    }
    if author == original_poster {
        marked.push_str(&format!("{RED} OP{NORMAL}"));
    }
    marked
}

/// Converts comment markup into terminal text. Tags go first so entity
/// decoding cannot produce new tags; unknown markup is left untouched.
pub fn decode(body: &str) -> String {
    let tags = replace_tags(body);
    let links = replace_anchors(&tags);
    replace_entities(&links)
}

fn replace_tags(input: &str) -> String {
    let input = input.replacen("<p>", "", 1);
    input
        .replace("<p>", NEWLINE)
        .replace("</p>", "")
        .replace("<i>", ITALIC)
        .replace("</i>", NORMAL)
        .replace("<pre><code>", DIMMED)
        .replace("</code></pre>", NORMAL)
}

fn replace_anchors(input: &str) -> String {
    ANCHOR_RE
        .replace_all(input, |caps: &regex::Captures| ansi::hyperlink(&caps[1], &caps[2]))
        .into_owned()
}

fn replace_entities(input: &str) -> String {
    input
        .replace("&#x27;", "'")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&#x2F;", "/")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

fn wrap_paragraph(paragraph: &str, width: usize, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    // only spaces separate words, so escape sequences are never split
    let options = WrapOptions::new(width.max(1))
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation);
    wrap(paragraph, options)
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join(NEWLINE)
}

fn domain_label(story: &CommentNode) -> String {
    let link = if story.domain.is_empty() {
        ansi::hyperlink(
            &hackernews::permalink(story.id),
            &format!("item?id={}", story.id),
        )
    } else {
        ansi::hyperlink(&story.url, &story.domain)
    };
    format!("{DIMMED}  ({link}){NORMAL}")
}
