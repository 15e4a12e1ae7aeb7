//! Working-tree scan: file inventory, language counts and component buckets.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

/// Path keywords that place a file in a component bucket. A file may land in
/// several buckets.
pub const COMPONENT_BUCKETS: &[(&str, &[&str])] = &[
    ("api", &["api", "controller", "router", "endpoint"]),
    ("services", &["service", "usecase", "domain"]),
    ("models", &["model", "entity", "schema", "dto"]),
    ("infrastructure", &["infra", "adapter", "db", "repository", "persistence"]),
    ("frontend", &["ui", "view", "component", "page"]),
    ("tests", &["test", "spec", "e2e", "integration"]),
];

/// Lists files under `root` (skipping `.git`) as `/`-separated paths relative
/// to `root`. With `extensions` set, only files ending in `.ext` for one of
/// them are kept. Stops after `max_files`.
pub fn walk_code(root: &Path, extensions: &[String], max_files: usize) -> Vec<String> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?;
            Some(relative.to_string_lossy().replace('\\', "/"))
        })
        .filter(|path| {
            extensions.is_empty()
                || extensions
                    .iter()
                    .any(|ext| path.ends_with(&format!(".{ext}")))
        })
        .take(max_files)
        .collect()
}

/// Counts files per lowercased extension (the text after the last `.`, or the
/// whole path when there is none).
pub fn language_breakdown(files: &[String]) -> BTreeMap<String, usize> {
    let mut languages = BTreeMap::new();
    for file in files {
        let ext = file.rsplit('.').next().unwrap_or(file).to_lowercase();
        *languages.entry(ext).or_insert(0) += 1;
    }
    languages
}

/// Buckets paths into coarse architectural components; each bucket is sorted
/// and empty buckets are omitted.
pub fn detect_components(files: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        let lower = file.to_lowercase();
        for (bucket, keywords) in COMPONENT_BUCKETS {
            if keywords.iter().any(|k| lower.contains(k)) {
                buckets.entry(bucket.to_string()).or_default().push(file.clone());
            }
        }
    }
    for paths in buckets.values_mut() {
        paths.sort();
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        for path in ["src/api/router.rs", "src/models/user.rs", "web/page.tsx", ".git/HEAD", "Makefile"] {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, "x").unwrap();
        }
        dir
    }

    #[test]
    fn test_walk_skips_git_dir_and_filters_extensions() {
        let dir = tree();
        let all = walk_code(dir.path(), &[], 100);
        assert_eq!(
            all,
            vec!["Makefile", "src/api/router.rs", "src/models/user.rs", "web/page.tsx"]
        );

        let rust = walk_code(dir.path(), &["rs".to_string()], 100);
        assert_eq!(rust, vec!["src/api/router.rs", "src/models/user.rs"]);
    }

    #[test]
    fn test_walk_stops_at_max_files() {
        let dir = tree();
        assert_eq!(walk_code(dir.path(), &[], 2).len(), 2);
    }

    #[test]
    fn test_language_breakdown() {
        let files: Vec<String> = ["a.RS", "b.rs", "c.py", "Makefile"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let langs = language_breakdown(&files);
        assert_eq!(langs["rs"], 2);
        assert_eq!(langs["py"], 1);
        assert_eq!(langs["makefile"], 1);
    }

    #[test]
    fn test_component_buckets_overlap() {
        let files: Vec<String> = ["src/api/user_model.rs", "tests/ui_test.rs", "README.md"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let components = detect_components(&files);
        assert_eq!(components["api"], vec!["src/api/user_model.rs"]);
        assert_eq!(components["models"], vec!["src/api/user_model.rs"]);
        assert_eq!(components["tests"], vec!["tests/ui_test.rs"]);
        assert_eq!(components["frontend"], vec!["tests/ui_test.rs"]);
        assert!(!components.contains_key("services"));
    }
}
