use std::collections::HashMap;

/// Minimum occurrences before a token is accepted as a theme.
const MIN_THEME_FREQUENCY: usize = 2;

/// Derives a single capitalized theme word from a window's commit subjects.
///
/// Tokens are whitespace-split, lowercased and kept only when purely alphabetic
/// and longer than 3 characters. The most frequent token wins; ties go to the
/// token seen first. Returns `None` when the winner occurs fewer than twice.
pub fn extract_theme<S: AsRef<str>>(messages: &[S]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for message in messages {
        for word in message.as_ref().split_whitespace() {
            let word = word.to_lowercase();
            if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
                continue;
            }
            let count = counts.entry(word.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(word);
            }
            *count += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for word in &first_seen {
        let count = counts[word];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((word, count));
        }
    }

    match best {
        Some((word, count)) if count >= MIN_THEME_FREQUENCY => Some(capitalize(word)),
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
