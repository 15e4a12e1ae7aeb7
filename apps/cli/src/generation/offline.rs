//! Offline writer — template sections built straight from the payload.
//!
//! Used when no API key is configured, in `--offline` mode, and whenever the
//! agent pipeline fails. Sections already follow the Markdown template, so
//! the autofixer leaves them intact.

use std::path::Path;

use async_trait::async_trait;

use crate::analysis::compiler::{PatternDigest, SignalDigest};
use crate::analysis::impact::SignalType;
use crate::analysis::SignalPayload;
use crate::errors::AppError;
use crate::formatting::enhance::{enhance_section, format_complete_output};
use crate::formatting::Section;
use crate::generation::SectionWriter;

const TOP_FILES_SHOWN: usize = 5;

pub struct OfflineWriter {
    bullets_count: usize,
}

impl OfflineWriter {
    pub fn new(bullets_count: usize) -> Self {
        Self { bullets_count }
    }

    /// Candidate sections in priority order, truncated to the configured count.
    fn sections(&self, payload: &SignalPayload) -> Vec<Section> {
        let mut sections = Vec::new();
        if payload.summary_you.total_commits == 0 {
            sections.push(Section {
                title: "No Attributed Contributions".to_string(),
                bullet_point: "No signals available to summarize.".to_string(),
                description: "No commits in the analysed range matched the configured names or \
                              emails."
                    .to_string(),
            });
            return sections;
        }

        sections.push(activity_section(payload));

        let mut signals: Vec<&SignalDigest> = payload.impact_signals.iter().collect();
        signals.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        sections.extend(signals.into_iter().map(signal_section));
        sections.extend(payload.commit_patterns.iter().map(pattern_section));

        if !payload.languages.is_empty() {
            sections.push(language_section(payload));
        }

        sections.truncate(self.bullets_count.max(1));
        sections
    }
}

#[async_trait]
impl SectionWriter for OfflineWriter {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn write_sections(&self, payload: &SignalPayload) -> Result<String, AppError> {
        let enhanced: Vec<_> = self.sections(payload).iter().map(enhance_section).collect();
        Ok(format_complete_output(
            &enhanced,
            &repo_title(&payload.metadata.repo_path),
            &payload.metadata.person_name,
        ))
    }
}

fn repo_title(repo_path: &str) -> String {
    let name = Path::new(repo_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Repository".to_string());
    format!("{name} Contributions")
}

fn activity_section(payload: &SignalPayload) -> Section {
    let s = &payload.summary_you;
    let hot: Vec<String> = payload
        .top_files_you
        .iter()
        .take(TOP_FILES_SHOWN)
        .map(|(path, n)| format!("{path} ({n})"))
        .collect();
    let mut description = format!(
        "Averaged {} commits per week across {} directories, with a net change of {} lines \
         and a largest single commit of {} lines.",
        s.avg_commits_per_week, s.directories_touched_count, s.net_lines, s.largest_single_commit
    );
    if !hot.is_empty() {
        description.push_str(&format!(" Most active files: {}.", hot.join(", ")));
    }
    Section {
        title: "Delivered Sustained Codebase Contributions".to_string(),
        bullet_point: format!(
            "Authored {} commits touching {} files with +{}/-{} lines changed.",
            s.total_commits, s.files_touched_count, s.total_insertions, s.total_deletions
        ),
        description,
    }
}

fn signal_section(signal: &SignalDigest) -> Section {
    let title = match signal.signal_type {
        SignalType::Performance => "Improved System Performance",
        SignalType::Architecture => "Restructured Core Architecture",
        SignalType::Reliability => "Fixed Reliability and Quality Issues",
        SignalType::Feature => "Added Product Features",
    };
    let lead = signal
        .evidence
        .first()
        .map(|e| e.lines().next().unwrap_or_default().trim().to_string())
        .unwrap_or_default();
    Section {
        title: title.to_string(),
        bullet_point: format!(
            "{} across {} files ({:?} impact).",
            signal.metrics_hints.join("; "),
            signal.files_count,
            signal.estimated_impact
        ),
        description: format!(
            "Commits such as \"{lead}\" touched {} files. \
             Estimated impact is {:?} with {:.0}% confidence.",
            signal.files_count,
            signal.estimated_impact,
            signal.confidence * 100.0
        ),
    }
}

fn pattern_section(pattern: &PatternDigest) -> Section {
    Section {
        title: format!("Led {} Initiative", pattern.theme),
        bullet_point: format!(
            "Delivered {} related commits changing {} lines across {} files.",
            pattern.commit_count,
            pattern.total_changes,
            pattern.files_affected.len()
        ),
        description: format!(
            "A focused burst of {} work with complexity score {}, covering {}.",
            pattern.theme.to_lowercase(),
            pattern.complexity_score,
            pattern.files_affected.join(", ")
        ),
    }
}

fn language_section(payload: &SignalPayload) -> Section {
    let breakdown: Vec<String> = payload
        .languages
        .iter()
        .map(|(lang, n)| format!("{lang}:{n}"))
        .collect();
    Section {
        title: "Worked Across a Multi-Language Codebase".to_string(),
        bullet_point: format!("Contributed to a codebase spanning {} file types.", breakdown.len()),
        description: format!("Language breakdown: {}.", breakdown.join(", ")),
    }
}
