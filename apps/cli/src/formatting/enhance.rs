//! Section Enhancer — light-touch rewrites applied to generated sections.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::formatting::autofix::{BULLET_LABEL, DESCRIPTION_LABEL, LINE_BREAK};
use crate::formatting::quality::assess_section_quality;
use crate::formatting::Section;

const STRONG_VERBS: &[(&str, &str)] = &[
    ("built", "Architected"),
    ("made", "Implemented"),
    ("created", "Developed"),
    ("improved", "Optimized"),
    ("fixed", "Resolved"),
    ("updated", "Enhanced"),
    ("added", "Delivered"),
];

const OUTCOME_WORDS: &[&str] = &["performance", "efficiency", "reliability", "scalability", "delivery"];

const FILLER_WORDS: &[&str] = &["successfully", "effectively", "efficiently"];

const PASSIVE_FIXES: &[(&str, &str)] = &[
    ("was implemented", "implemented"),
    ("was created", "created"),
    ("was developed", "developed"),
    ("were improved", "improved"),
    ("has been", "is"),
];

static API_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bapi\b").unwrap());

/// A section after enhancement, carrying the score of the text it started from.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedSection {
    pub section: Section,
    pub quality_score: f64,
    pub suggestions: Vec<String>,
}

pub fn enhance_section(section: &Section) -> EnhancedSection {
    let quality = assess_section_quality(&section.title, &section.bullet_point, &section.description);
    EnhancedSection {
        section: Section {
            title: enhance_title(&section.title),
            bullet_point: enhance_bullet(&section.bullet_point),
            description: enhance_description(&section.description),
        },
        quality_score: quality.score,
        suggestions: quality.suggestions,
    }
}

/// Swaps a leading weak verb for a stronger one and steers API titles
/// towards an outcome.
pub fn enhance_title(title: &str) -> String {
    let mut enhanced = title.to_string();

    for (weak, strong) in STRONG_VERBS {
        let Some(head) = enhanced.get(..weak.len()) else {
            continue;
        };
        let at_word_end = enhanced[weak.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if head.eq_ignore_ascii_case(weak) && at_word_end {
            enhanced = format!("{strong}{}", &enhanced[weak.len()..]);
            break;
        }
    }

    let lower = enhanced.to_lowercase();
    if !OUTCOME_WORDS.iter().any(|w| lower.contains(w)) {
        enhanced = API_WORD.replace(&enhanced, "API Performance").into_owned();
    }
    enhanced
}

/// Drops filler adverbs and makes sure the bullet ends in a line break.
pub fn enhance_bullet(bullet: &str) -> String {
    let joined = bullet
        .split_whitespace()
        .filter(|w| !FILLER_WORDS.iter().any(|f| w.eq_ignore_ascii_case(f)))
        .collect::<Vec<_>>()
        .join(" ");
    if joined.ends_with(LINE_BREAK) {
        return joined;
    }
    format!("{} {LINE_BREAK}", joined.trim_end_matches('.'))
}

pub fn enhance_description(description: &str) -> String {
    PASSIVE_FIXES
        .iter()
        .fold(description.trim().to_string(), |text, (passive, active)| {
            text.replace(passive, active)
        })
}

/// Renders enhanced sections as a complete document with a quality banner.
pub fn format_complete_output(
    sections: &[EnhancedSection],
    repo_title: &str,
    person_name: &str,
) -> String {
    let mut lines = vec![format!("# {repo_title}"), String::new()];

    if !sections.is_empty() {
        let average =
            sections.iter().map(|s| s.quality_score).sum::<f64>() / sections.len() as f64;
        let indicator = if average > 0.8 {
            "🔥"
        } else if average > 0.6 {
            "✨"
        } else {
            "📝"
        };
        lines.push(format!("*{indicator} Enhanced CV content generated for {person_name}*"));
        lines.push(String::new());
    }

    for enhanced in sections {
        let s = &enhanced.section;
        lines.push(format!("## {}", s.title));
        lines.push(format!("{BULLET_LABEL} {}", s.bullet_point));
        lines.push(format!("{DESCRIPTION_LABEL} {}", s.description));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_weak_verb_swapped() {
        assert_eq!(enhance_title("built payment service"), "Architected payment service");
        assert_eq!(enhance_title("Fixed flaky deploys"), "Resolved flaky deploys");
        assert_eq!(enhance_title("Madeup word"), "Madeup word");
    }

    #[test]
    fn test_title_api_gains_outcome() {
        assert_eq!(enhance_title("Improved api"), "Optimized API Performance");
        assert_eq!(enhance_title("API reliability work"), "API reliability work");
        assert_eq!(enhance_title("Rapid prototyping"), "Rapid prototyping");
    }

    #[test]
    fn test_bullet_filler_removed_and_break_added() {
        assert_eq!(
            enhance_bullet("Successfully migrated billing to Postgres."),
            "migrated billing to Postgres <br />"
        );
        assert_eq!(enhance_bullet("Cut costs 30% <br />"), "Cut costs 30% <br />");
    }

    #[test]
    fn test_description_passive_fixes() {
        assert_eq!(
            enhance_description(" The cache was implemented and has been stable. "),
            "The cache implemented and is stable."
        );
    }

    #[test]
    fn test_complete_output_layout() {
        let sections = vec![EnhancedSection {
            section: Section {
                title: "Caching".to_string(),
                bullet_point: "Added a cache <br />".to_string(),
                description: "Details.".to_string(),
            },
            quality_score: 0.9,
            suggestions: vec![],
        }];
        let out = format_complete_output(&sections, "Repo", "Ada");
        assert_eq!(
            out,
            "# Repo\n\n*🔥 Enhanced CV content generated for Ada*\n\n## Caching\n\
             **Bullet Point:** Added a cache <br />\n**Description:** Details.\n"
        );
    }

    #[test]
    fn test_complete_output_without_sections() {
        assert_eq!(format_complete_output(&[], "Repo", "Ada"), "# Repo\n");
    }
}
