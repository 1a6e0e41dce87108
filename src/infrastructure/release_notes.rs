//! Terminal rendering of markdown release notes
//!
//! Parses with `pulldown-cmark` and lays the blocks out for a fixed width:
//! underlined headings, bullet and numbered lists, indented code and wrapped
//! paragraphs. Anything that goes wrong falls back to the raw text.

use std::io;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Narrowest terminal worth rendering for.
pub const MIN_RENDER_WIDTH: usize = 20;

const BULLET: &str = "• ";
const CODE_INDENT: &str = "    ";
const QUOTE_PREFIX: &str = "│ ";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot determine terminal size: {0}")]
    Terminal(#[from] io::Error),

    #[error("terminal is too narrow ({0} columns)")]
    TooNarrow(usize),
}

/// Render for the current terminal, or return `raw` unchanged.
pub fn render_for_terminal(raw: &str) -> String {
    let columns = crossterm::terminal::size().map(|(columns, _)| usize::from(columns));
    render_or_raw(raw, columns)
}

fn render_or_raw(raw: &str, columns: io::Result<usize>) -> String {
    let rendered = columns
        .map_err(RenderError::from)
        .and_then(|width| render_markdown(raw, width));
    match rendered {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "showing release notes unformatted");
            raw.to_string()
        }
    }
}

pub fn render_markdown(raw: &str, width: usize) -> Result<String, RenderError> {
    if width < MIN_RENDER_WIDTH {
        return Err(RenderError::TooNarrow(width));
    }

    let mut layout = Layout::new(width);
    for event in Parser::new(raw) {
        layout.event(event);
    }
    Ok(layout.finish())
}

/// An open list item: the marker line prefix and the continuation prefix.
struct Item {
    first: String,
    rest: String,
    started: bool,
}

struct Layout {
    width: usize,
    out: Vec<String>,
    inline: String,
    code: Option<String>,
    quote_depth: usize,
    /// Next number for ordered lists, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    items: Vec<Item>,
}

impl Layout {
    fn new(width: usize) -> Self {
        Self {
            width,
            out: Vec::new(),
            inline: String::new(),
            code: None,
            quote_depth: 0,
            lists: Vec::new(),
            items: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.inline.push_str(&text),
            },
            Event::Code(code) => {
                self.inline.push('`');
                self.inline.push_str(&code);
                self.inline.push('`');
            }
            Event::SoftBreak | Event::HardBreak => self.inline.push(' '),
            Event::Rule => {
                self.gap();
                let rule = "─".repeat(self.width.min(40));
                self.out.push(format!("{}{rule}", self.quote_prefix()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => self.gap(),
            Tag::Paragraph if self.items.is_empty() => self.gap(),
            Tag::BlockQuote(_) => {
                self.gap();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                if self.items.is_empty() {
                    self.gap();
                } else {
                    self.flush_item();
                }
                self.code = Some(String::new());
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.gap();
                } else {
                    self.flush_item();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len());
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => BULLET.to_string(),
                };
                let first = format!("{}{indent}{marker}", self.quote_prefix());
                let rest = format!("{}{indent}{}", self.quote_prefix(), " ".repeat(marker.width()));
                self.items.push(Item {
                    first,
                    rest,
                    started: false,
                });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let text = std::mem::take(&mut self.inline);
                let text = text.trim();
                let prefix = self.quote_prefix();
                self.out.push(format!("{prefix}{text}"));
                self.out
                    .push(format!("{prefix}{}", "─".repeat(text.width().min(self.width))));
            }
            TagEnd::Paragraph => {
                if self.items.is_empty() {
                    let prefix = self.quote_prefix();
                    self.flush_inline(&prefix, &prefix);
                } else {
                    self.inline.push(' ');
                }
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                let indent = match self.items.last() {
                    Some(item) => item.rest.clone(),
                    None => self.quote_prefix(),
                };
                for line in code.lines() {
                    self.out
                        .push(format!("{indent}{CODE_INDENT}{line}").trim_end().to_string());
                }
            }
            TagEnd::Item => {
                self.flush_item();
                self.items.pop();
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            _ => {}
        }
    }

    /// Emit the pending text of the innermost list item.
    fn flush_item(&mut self) {
        let Some(item) = self.items.last_mut() else {
            return;
        };
        let first = if item.started {
            item.rest.clone()
        } else {
            item.first.clone()
        };
        let rest = item.rest.clone();
        if self.flush_inline(&first, &rest) {
            if let Some(item) = self.items.last_mut() {
                item.started = true;
            }
        }
    }

    /// Wrap and emit the pending inline text; false when there was none.
    fn flush_inline(&mut self, first: &str, rest: &str) -> bool {
        let text = std::mem::take(&mut self.inline);
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.out.extend(wrap(text, self.width, first, rest));
        true
    }

    /// Separate blocks with one blank line.
    fn gap(&mut self) {
        if self.out.last().is_some_and(|last| !last.is_empty()) {
            self.out.push(String::new());
        }
    }

    fn quote_prefix(&self) -> String {
        QUOTE_PREFIX.repeat(self.quote_depth)
    }

    fn finish(mut self) -> String {
        let prefix = self.quote_prefix();
        self.flush_inline(&prefix, &prefix);
        while self.out.last().is_some_and(|last| last.is_empty()) {
            self.out.pop();
        }
        self.out.join("\n")
    }
}

/// Greedy word wrap; words wider than the line are kept whole.
fn wrap(text: &str, width: usize, first: &str, rest: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = first.to_string();
    let mut current_width = first.width();
    let mut empty = true;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if !empty && current_width + 1 + word_width > width {
            lines.push(std::mem::replace(&mut current, rest.to_string()));
            current_width = rest.width();
            empty = true;
        }
        if !empty {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
        empty = false;
    }
    lines.push(current);
    lines
}
