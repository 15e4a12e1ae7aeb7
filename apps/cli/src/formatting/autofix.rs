//! Section Autofixer — repairs free-form Markdown into the fixed section template.
//!
//! Every `## ` heading becomes exactly:
//!
//! ```text
//! ## Title
//! **Bullet Point:** one line summary <br />
//! **Description:** one line of detail
//! ```
//!
//! List items are dropped everywhere. The parser is a small line-driven state
//! machine; values are collapsed onto one line so a second pass is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

pub const BULLET_LABEL: &str = "**Bullet Point:**";
pub const DESCRIPTION_LABEL: &str = "**Description:**";
pub const LINE_BREAK: &str = "<br />";

const NO_DESCRIPTION: &str = "Summary not provided.";
const EMPTY_BULLET: &str = "Summary unavailable.";
const EMPTY_DESCRIPTION: &str = "Details unavailable.";

// Plain (`bullet point:`) and bold (`**Bullet Point:**`, `**Bullet Point**:`)
// labels, with optional hyphen or missing space between the words.
static BULLET_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:\*\*bullet[ \t]*-?[ \t]*point[ \t]*(?::\*\*|\*\*[ \t]*:)|bullet[ \t]*-?[ \t]*point[ \t]*:)[ \t]*",
    )
    .unwrap()
});

static DESCRIPTION_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*description[ \t]*(?::\*\*|\*\*[ \t]*:)|description[ \t]*:)[ \t]*")
        .unwrap()
});

static TRAILING_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\s*<br\s*/?>\s*)+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed yet; an H1 is only honoured here.
    Start,
    OutsideSection,
    InSectionBody,
}

/// One classified body line.
enum BodyLine {
    Bullet(String),
    Description(String),
    Text(String),
}

/// Rewrites `text` so every section follows the template. Never fails:
/// malformed input yields a best-effort document.
pub fn validate_and_autofix_sections(text: &str) -> String {
    let mut fixer = Autofixer::default();
    // Every trailing `\r` goes, not just the one `lines()` would strip.
    for line in text.split('\n') {
        fixer.feed(line.trim_end_matches('\r'));
    }
    fixer.finish()
}

struct Autofixer<'t> {
    state: State,
    out: Vec<String>,
    /// Heading line of the open section, as emitted.
    heading: String,
    body: Vec<&'t str>,
}

impl Default for Autofixer<'_> {
    fn default() -> Self {
        Self {
            state: State::Start,
            out: Vec::new(),
            heading: String::new(),
            body: Vec::new(),
        }
    }
}

impl<'t> Autofixer<'t> {
    fn feed(&mut self, line: &'t str) {
        match self.state {
            State::Start => {
                self.state = State::OutsideSection;
                if line.starts_with("# ") {
                    self.out.push(line.to_string());
                } else {
                    self.feed_outside(line);
                }
            }
            State::OutsideSection => self.feed_outside(line),
            State::InSectionBody => {
                if is_heading(line) {
                    self.flush_section();
                    self.open_section(line);
                } else if !is_list_item(line) {
                    self.body.push(line);
                }
            }
        }
    }

    fn feed_outside(&mut self, line: &str) {
        if is_list_item(line) {
            return;
        }
        if is_heading(line) {
            self.open_section(line);
        } else {
            self.out.push(line.to_string());
        }
    }

    fn open_section(&mut self, line: &str) {
        let trimmed = line.trim_end();
        // "## " alone must still read as a heading next time.
        self.heading = if trimmed.len() > 2 {
            trimmed.to_string()
        } else {
            "## ".to_string()
        };
        self.body.clear();
        self.state = State::InSectionBody;
    }

    fn flush_section(&mut self) {
        let (bullet, description) = repair_body(&self.body);
        self.out.push(self.heading.clone());
        self.out.push(format!("{BULLET_LABEL} {bullet} {LINE_BREAK}"));
        self.out.push(format!("{DESCRIPTION_LABEL} {description}"));
        self.body.clear();
    }

    fn finish(mut self) -> String {
        if self.state == State::InSectionBody {
            self.flush_section();
        }
        // A trailing empty line would be swallowed on the next pass.
        while self.out.last().is_some_and(|l| l.is_empty()) {
            self.out.pop();
        }
        self.out.join("\n")
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with("## ")
}

fn is_list_item(line: &str) -> bool {
    line.trim_start().starts_with("- ")
}

fn classify(line: &str) -> BodyLine {
    let line = line.trim();
    if let Some(m) = BULLET_LABEL_RE.find(line) {
        BodyLine::Bullet(clean_value(&line[m.end()..]))
    } else if let Some(m) = DESCRIPTION_LABEL_RE.find(line) {
        BodyLine::Description(clean_value(&line[m.end()..]))
    } else {
        BodyLine::Text(line.to_string())
    }
}

/// Produces the (bullet, description) pair for one section body.
fn repair_body(body: &[&str]) -> (String, String) {
    let lines: Vec<BodyLine> = body.iter().map(|l| classify(l)).collect();

    let mut bullet = None;
    let mut description = None;
    let mut text = Vec::new();
    for line in &lines {
        match line {
            BodyLine::Bullet(v) if bullet.is_none() => bullet = Some(v.clone()),
            BodyLine::Description(v) if description.is_none() => description = Some(v.clone()),
            BodyLine::Text(v) => text.push(v.as_str()),
            _ => {}
        }
    }
    let text = clean_value(&text.join(" "));

    if bullet.is_none() && description.is_none() {
        if text.is_empty() {
            return (EMPTY_BULLET.to_string(), EMPTY_DESCRIPTION.to_string());
        }
        return match split_first_sentence(&text) {
            (first, Some(rest)) => (first.to_string(), rest.to_string()),
            (first, None) => (first.to_string(), text.clone()),
        };
    }

    let description = description.unwrap_or_else(|| {
        if text.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            text
        }
    });
    let bullet = bullet.unwrap_or_else(|| split_first_sentence(&description).0.to_string());
    (bullet, description)
}

/// Collapses whitespace onto one line and drops trailing `<br>` markers.
fn clean_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    TRAILING_BREAKS_RE
        .replace(&collapsed, "")
        .trim()
        .to_string()
}

/// Splits after the first `.`, `!` or `?` that is followed by whitespace.
fn split_first_sentence(text: &str) -> (&str, Option<&str>) {
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    let end = idx + c.len_utf8();
                    let rest = text[end..].trim();
                    return (&text[..end], (!rest.is_empty()).then_some(rest));
                }
            }
        }
    }
    (text, None)
}
