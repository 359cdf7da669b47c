use std::borrow::Cow;

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const NORMAL: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIMMED: &str = "\x1b[2m";
pub const ITALIC: &str = "\x1b[3m";
pub const REVERSE: &str = "\x1b[7m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

pub const LINK_OPEN: &str = "\x1b]8;;";
pub const LINK_SEPARATOR: &str = "\x07";
pub const LINK_CLOSE: &str = "\x1b]8;;\x07";

static ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m|\x1b\]8;[^\x07]*\x07").expect("valid escape sequence regex")
});

/// OSC-8 hyperlink: terminals show `text` and open `url` on click.
pub fn hyperlink(url: &str, text: &str) -> String {
    format!("{LINK_OPEN}{url}{LINK_SEPARATOR}{text}{LINK_CLOSE}")
}

pub fn strip(text: &str) -> Cow<'_, str> {
    ESCAPE_RE.replace_all(text, "")
}

/// Display width of `text` ignoring SGR and OSC-8 sequences.
pub fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip(text).as_ref())
}

/// Number of terminal rows a block occupies, counting a trailing newline as an extra row.
pub fn height(text: &str) -> usize {
    text.split('\n').count()
}

/// Cuts plain text down to `max_width` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Pads `text` with spaces on both sides so it sits centered in `width` columns.
pub fn center(text: &str, width: usize) -> String {
    let visible = visible_width(text);
    if visible >= width {
        return text.to_string();
    }
    let left = (width - visible) / 2;
    let right = width - visible - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Converts SGR-decorated text into styled ratatui text. Hyperlinks keep only their visible text.
pub fn to_text(input: &str) -> Text<'static> {
    let mut style = Style::default();
    let mut lines = Vec::new();

    for raw_line in input.split('\n') {
        let mut spans = Vec::new();
        let mut last = 0;
        for found in ESCAPE_RE.find_iter(raw_line) {
            if found.start() > last {
                spans.push(Span::styled(
                    raw_line[last..found.start()].to_string(),
                    style,
                ));
            }
            if let Some(params) = found
                .as_str()
                .strip_prefix("\x1b[")
                .and_then(|rest| rest.strip_suffix('m'))
            {
                style = apply_sgr(style, params);
            }
            last = found.end();
        }
        if last < raw_line.len() {
            spans.push(Span::styled(raw_line[last..].to_string(), style));
        }
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    for param in params.split(';') {
        match param {
            "" | "0" => style = Style::default(),
            "1" => style = style.add_modifier(Modifier::BOLD),
            "2" => style = style.add_modifier(Modifier::DIM),
            "3" => style = style.add_modifier(Modifier::ITALIC),
            "7" => style = style.add_modifier(Modifier::REVERSED),
            "31" => style = style.fg(Color::Red),
            "32" => style = style.fg(Color::Green),
            "33" => style = style.fg(Color::Yellow),
            _ => {}
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlink_is_byte_exact() {
        assert_eq!(
            hyperlink("https://example.com", "example"),
            "\x1b]8;;https://example.com\x07example\x1b]8;;\x07"
        );
    }

    #[test]
    fn visible_width_skips_escape_sequences() {
        let text = format!(
            "{BOLD}bob{NORMAL}{GREEN} mod{NORMAL} {}",
            hyperlink("https://example.com/a/long/path", "link")
        );
        assert_eq!(visible_width(&text), "bob mod link".len());
    }

    #[test]
    fn truncate_adds_ellipsis_only_when_needed() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 8), "a longe…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn center_pads_both_sides() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("toolong", 3), "toolong");
    }

    #[test]
    fn to_text_tracks_style_changes() {
        let text = to_text(&format!("a{BOLD}b{NORMAL}c"));
        let spans = &text.lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content.as_ref(), "a");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[2].style, Style::default());
    }

    #[test]
    fn to_text_keeps_link_text_and_style_across_lines() {
        let input = format!("{DIMMED}x\n{}", hyperlink("https://a.b", "here"));
        let text = to_text(&input);
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[1].spans[0].content.as_ref(), "here");
        assert!(text.lines[1].spans[0]
            .style
            .add_modifier
            .contains(Modifier::DIM));
    }
}
