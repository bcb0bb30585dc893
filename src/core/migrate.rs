//! Batch rewriter — walk the connector test tree and migrate each suite in
//! place.
//!
//! For every immediate entry of the migration root (skipping hidden entries
//! and the module index file), reads `<entry>/types/mod.rs`, runs the
//! migration rules over the buffer, and overwrites the file with the result.
//! Entries are processed one at a time, read → transform → write, and the
//! first read or write failure aborts the whole run; entries already
//! processed keep their rewritten content.

use std::path::Path;

use serde::Serialize;

use super::error::{Error, Result};
use super::rewrite::{apply_rules, RuleHit};
use super::rules::migration_rules;

/// Root of the connector test tree, relative to the working directory.
pub const MIGRATION_ROOT: &str = "tests/connectors";

/// Module index file living beside the connector directories; never a target.
const RESERVED_ENTRY: &str = "mod.rs";

/// Fixed path of the rewritten file inside each connector directory.
const TARGET_SUFFIX: &str = "types/mod.rs";

/// One rewritten file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// Path relative to the migration root.
    pub file: String,
    /// Total replacements across all rules.
    pub replacements: usize,
    /// Per-rule counts; rules that did not fire are omitted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<RuleHit>,
}

/// Result of a full migration run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateResult {
    pub root: String,
    pub files: Vec<FileEdit>,
    pub total_files: usize,
    pub total_replacements: usize,
}

fn is_excluded(name: &str) -> bool {
    name.starts_with('.') || name == RESERVED_ENTRY
}

/// Migrate every connector suite under `root`.
///
/// The existence of `<entry>/types/mod.rs` is assumed for every candidate
/// entry, not checked; a missing file surfaces as a read error.
pub fn run(root: &Path) -> Result<MigrateResult> {
    let entries = std::fs::read_dir(root)
        .map_err(|_| Error::RootNotFound(root.display().to_string()))?;

    // Sorted for deterministic reporting; read_dir order is platform-defined.
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !is_excluded(name))
        .collect();
    names.sort();

    let rules = migration_rules();
    let mut files = Vec::new();
    let mut total_replacements = 0;

    for name in names {
        let target = root.join(&name).join(TARGET_SUFFIX);
        let content = std::fs::read_to_string(&target)?;

        let (rewritten, hits) = apply_rules(&rules, &content);
        // Full overwrite even when nothing fired: the contract is
        // read → transform → write, not write-if-changed.
        std::fs::write(&target, &rewritten)?;

        let replacements: usize = hits.iter().map(|h| h.replacements).sum();
        total_replacements += replacements;

        let file = format!("{}/{}", name, TARGET_SUFFIX);
        log_status!("migrate", "Rewrote {} ({} replacements)", file, replacements);

        files.push(FileEdit {
            file,
            replacements,
            hits,
        });
    }

    let total_files = files.len();
    Ok(MigrateResult {
        root: root.display().to_string(),
        files,
        total_files,
        total_replacements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD_STYLE: &str = r#"        let req = test::TestRequest::default()
            .method(Method::POST)
            .uri("/Support/create")
            .set_json(json!({}))
            .to_request();
        let res: Value = test::call_and_read_body_json(&app, req).await;
"#;

    fn setup_connector(root: &Path, name: &str, content: &str) {
        let types = root.join(name).join("types");
        std::fs::create_dir_all(&types).unwrap();
        std::fs::write(types.join("mod.rs"), content).unwrap();
    }

    #[test]
    fn rewrites_each_connector_suite() {
        let dir = std::env::temp_dir().join("testshift_migrate_test");
        let _ = std::fs::remove_dir_all(&dir);
        setup_connector(&dir, "postgres", OLD_STYLE);
        setup_connector(&dir, "sqlite", OLD_STYLE);

        let result = run(&dir).unwrap();

        assert_eq!(result.total_files, 2);
        assert_eq!(result.files[0].file, "postgres/types/mod.rs");
        assert_eq!(result.files[1].file, "sqlite/types/mod.rs");
        assert!(result.total_replacements > 0);

        let migrated = std::fs::read_to_string(dir.join("postgres/types/mod.rs")).unwrap();
        assert!(migrated.contains("TestRequest::new(Method::POST, \"Support/create\")"));
        assert!(!migrated.contains("set_json"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn skips_hidden_and_reserved_entries() {
        let dir = std::env::temp_dir().join("testshift_skip_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        setup_connector(&dir, "mysql", OLD_STYLE);
        // Neither of these has a types/mod.rs underneath; the run would
        // abort if the filter ever let them through.
        std::fs::create_dir_all(dir.join(".hidden")).unwrap();
        std::fs::write(dir.join("mod.rs"), "pub mod mysql;\n").unwrap();

        let result = run(&dir).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.files[0].file, "mysql/types/mod.rs");
        assert_eq!(
            std::fs::read_to_string(dir.join("mod.rs")).unwrap(),
            "pub mod mysql;\n"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_without_matches_is_reported_with_zero_replacements() {
        let dir = std::env::temp_dir().join("testshift_nomatch_test");
        let _ = std::fs::remove_dir_all(&dir);
        setup_connector(&dir, "mongodb", "fn nothing_to_do() {}\n");

        let result = run(&dir).unwrap();

        assert_eq!(result.total_files, 1);
        assert_eq!(result.files[0].replacements, 0);
        assert!(result.files[0].hits.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.join("mongodb/types/mod.rs")).unwrap(),
            "fn nothing_to_do() {}\n"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_target_aborts_after_earlier_entries() {
        let dir = std::env::temp_dir().join("testshift_abort_test");
        let _ = std::fs::remove_dir_all(&dir);
        setup_connector(&dir, "a_postgres", OLD_STYLE);
        // Candidate entry with no types/mod.rs underneath; sorts after
        // a_postgres, so the first entry is already written when it fails.
        std::fs::create_dir_all(dir.join("z_broken")).unwrap();

        let err = run(&dir).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");

        let migrated = std::fs::read_to_string(dir.join("a_postgres/types/mod.rs")).unwrap();
        assert!(migrated.contains("json_body"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_root_is_fatal_before_touching_anything() {
        let dir = std::env::temp_dir().join("testshift_noroot_test");
        let _ = std::fs::remove_dir_all(&dir);

        let err = run(&dir).unwrap_err();
        assert_eq!(err.code(), "ROOT_NOT_FOUND");
    }
}
