//! Commit windowing — groups commits into consecutive time buckets.
//!
//! A window opens at the first unconsumed commit and absorbs every later commit
//! that lies within `span` of that opening commit. Windows with a single member
//! are discarded.

use chrono::Duration;

use crate::models::Commit;

/// Window length used for pattern detection.
pub const WINDOW_DAYS: i64 = 7;

/// Chronologically sorted view over a commit list. Iterating it yields windows
/// lazily; `iter()` can be called again to restart from the beginning.
pub struct CommitWindows<'a> {
    sorted: Vec<&'a Commit>,
    span: Duration,
}

impl<'a> CommitWindows<'a> {
    pub fn new(commits: &'a [Commit]) -> Self {
        Self::with_span(commits, Duration::days(WINDOW_DAYS))
    }

    pub fn with_span(commits: &'a [Commit], span: Duration) -> Self {
        let mut sorted: Vec<&Commit> = commits.iter().collect();
        // stable: equal timestamps keep input order
        sorted.sort_by_key(|c| c.timestamp);
        Self { sorted, span }
    }

    pub fn iter(&self) -> WindowIter<'_, 'a> {
        WindowIter {
            sorted: &self.sorted,
            span: self.span,
            pos: 0,
        }
    }
}

impl<'s, 'a> IntoIterator for &'s CommitWindows<'a> {
    type Item = &'s [&'a Commit];
    type IntoIter = WindowIter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct WindowIter<'s, 'a> {
    sorted: &'s [&'a Commit],
    span: Duration,
    pos: usize,
}

impl<'s, 'a> Iterator for WindowIter<'s, 'a> {
    type Item = &'s [&'a Commit];

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.sorted.len() {
            let start = self.pos;
            let opened_at = self.sorted[start].timestamp;
            let mut end = start + 1;
            while end < self.sorted.len() && self.sorted[end].timestamp - opened_at <= self.span {
                end += 1;
            }
            self.pos = end;
            if end - start > 1 {
                return Some(&self.sorted[start..end]);
            }
        }
        None
    }
}
