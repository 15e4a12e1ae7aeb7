// Output formatting: link stripping, template repair, quality scoring and
// the enhancer used when sections are produced offline.

pub mod autofix;
pub mod enhance;
pub mod links;
pub mod quality;

pub use autofix::validate_and_autofix_sections;
pub use links::remove_links;
pub use quality::{validate_output_quality, QualityReport};

/// One CV section: an H2 title, a one-line bullet and a description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub title: String,
    pub bullet_point: String,
    pub description: String,
}
