use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// Strips hyperlinks: `[text](url)` keeps `text`, bare URLs vanish, and any
/// leftover `Proof` tokens are removed.
pub fn remove_links(text: &str) -> String {
    let text = MARKDOWN_LINK.replace_all(text, "$1");
    let text = BARE_URL.replace_all(&text, "");
    text.replace("Proof:", "").replace("Proof", "")
}
