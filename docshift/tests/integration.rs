#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use docshift::{MigrateError, MigrationSummary, migrate};
use docshift_config::Config;
use docshift_rewrite::{LineEnding, NestingPolicy};
use tempfile::tempdir;

const GUIDE: &str = "# Guide\n\n> 👍 Requirements\n>\n> See the guide.\nNext \
                     paragraph.\n";

fn write(path: &Path, content: &str) {
  fs::create_dir_all(path.parent().expect("path has a parent"))
    .expect("Failed to create dir in test");
  fs::write(path, content).expect("Failed to write file in test");
}

fn config_for(base: &Path) -> Config {
  Config {
    base_dir: Some(base.to_path_buf()),
    ..Config::default()
  }
}

#[test]
fn test_migrates_tree_into_mirrored_output() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/a/b/c.md"), GUIDE);
  write(&base.join("11ty/docs/index.md"), "plain\n");

  let summary = migrate(&config_for(base)).expect("migration should succeed");

  let migrated =
    fs::read_to_string(base.join("temp/11ty/docs/a/b/c.md")).unwrap();
  assert_eq!(
    migrated,
    "# Guide\r\n\r\n:::okay Requirements\r\n\r\nSee the guide.\r\n:::\r\nNext \
     paragraph.\r\n"
  );
  assert_eq!(
    fs::read_to_string(base.join("temp/11ty/docs/index.md")).unwrap(),
    "plain\r\n"
  );
  assert_eq!(summary, MigrationSummary {
    scanned:  2,
    migrated: 2,
    skipped:  0,
    blocks:   1,
    changed:  1,
  });
}

#[test]
fn test_non_markdown_files_produce_no_output() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/guide.md"), GUIDE);
  write(&base.join("11ty/docs/img/logo.png"), "png");
  write(&base.join("11ty/docs/notes.txt"), "> 📘 not markdown");

  let summary = migrate(&config_for(base)).unwrap();

  assert!(base.join("temp/11ty/docs/guide.md").is_file());
  assert!(!base.join("temp/11ty/docs/img").exists());
  assert!(!base.join("temp/11ty/docs/notes.txt").exists());
  assert_eq!(summary.skipped, 2);
  assert_eq!(summary.migrated, 1);
}

#[test]
fn test_marker_is_matched_anywhere_in_path() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/page.mdx"), "> 🚧 Careful");

  migrate(&config_for(base)).unwrap();

  assert_eq!(
    fs::read_to_string(base.join("temp/11ty/docs/page.mdx")).unwrap(),
    ":::warn Careful\r\n:::"
  );
}

#[test]
fn test_previous_output_is_deleted() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/guide.md"), GUIDE);
  write(&base.join("temp/stale/old.md"), "old");

  migrate(&config_for(base)).unwrap();

  assert!(!base.join("temp/stale").exists());
  assert!(base.join("temp/11ty/docs/guide.md").is_file());
}

#[test]
fn test_line_ending_is_configurable() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/guide.md"), "> 📘 Info\r\n> body");

  let config = Config {
    line_ending: LineEnding::Lf,
    ..config_for(base)
  };
  migrate(&config).unwrap();

  assert_eq!(
    fs::read_to_string(base.join("temp/11ty/docs/guide.md")).unwrap(),
    ":::info Info\nbody\n:::"
  );
}

#[test]
fn test_dry_run_writes_nothing() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/guide.md"), GUIDE);
  write(&base.join("temp/keep.md"), "keep");

  let config = Config {
    dry_run: true,
    ..config_for(base)
  };
  let summary = migrate(&config).unwrap();

  assert_eq!(summary.changed, 1);
  assert_eq!(summary.blocks, 1);
  assert!(base.join("temp/keep.md").is_file());
  assert!(!base.join("temp/11ty").exists());
}

#[test]
fn test_rejected_nesting_removes_output_and_names_file() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("11ty/docs/a.md"), GUIDE);
  write(&base.join("11ty/docs/b.md"), "> 📘 Outer\n> > 🚧 Inner\n> text");

  let config = Config {
    nesting: NestingPolicy::Reject,
    ..config_for(base)
  };
  let err = migrate(&config).unwrap_err();

  assert!(matches!(err, MigrateError::Rewrite { .. }));
  assert_eq!(err.source_file(), Some(base.join("11ty/docs/b.md").as_path()));
  assert!(err.to_string().contains("b.md"));
  assert!(!base.join("temp").exists());
}

#[test]
fn test_missing_source_dir_fails() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();

  let err = migrate(&config_for(base)).unwrap_err();

  assert!(matches!(err, MigrateError::Setup(_)));
  assert!(err.source_file().is_none());
}

#[test]
fn test_output_containing_source_is_refused() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path();
  write(&base.join("docs/guide.md"), GUIDE);

  let config = Config {
    source_dir: "docs".into(),
    output_dir: ".".into(),
    ..config_for(base)
  };
  let err = migrate(&config).unwrap_err();

  assert!(matches!(err, MigrateError::Config(_)));
  assert!(base.join("docs/guide.md").is_file());
}

#[test]
fn test_output_escaping_to_base_is_refused() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path().join("project");
  write(&base.join("11ty/docs/guide.md"), GUIDE);
  write(&base.join("precious.txt"), "keep me");

  let config = Config {
    output_dir: "11ty/..".into(),
    ..config_for(&base)
  };
  let err = migrate(&config).unwrap_err();

  assert!(matches!(err, MigrateError::Config(_)));
  assert!(base.join("11ty/docs/guide.md").is_file());
  assert!(base.join("precious.txt").is_file());
}

#[cfg(unix)]
#[test]
fn test_symlinked_output_is_refused() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let base = temp_dir.path().join("project");
  write(&base.join("11ty/docs/guide.md"), GUIDE);
  std::os::unix::fs::symlink(base.join("11ty"), base.join("temp"))
    .expect("Failed to create symlink in test");

  let err = migrate(&config_for(&base)).unwrap_err();

  assert!(matches!(err, MigrateError::Config(_)));
  assert!(base.join("11ty/docs/guide.md").is_file());
}

#[test]
fn test_source_outside_base_mirrors_relative_to_source() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let source = temp_dir.path().join("elsewhere/docs");
  let base = temp_dir.path().join("project");
  write(&source.join("x/y.md"), "> 📘 Hi");
  fs::create_dir_all(&base).unwrap();

  let config = Config {
    source_dir: source.clone(),
    ..config_for(&base)
  };
  migrate(&config).unwrap();

  assert_eq!(
    fs::read_to_string(base.join("temp/x/y.md")).unwrap(),
    ":::info Hi\r\n:::"
  );
}
