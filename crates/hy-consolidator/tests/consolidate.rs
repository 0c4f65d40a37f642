//! End-to-end runs of the consolidator against a temporary project.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use hy_consolidator::{ConsolidateError, Consolidator};
use hy_core::{Config, RunOptions, StatePaths};
use tempfile::TempDir;

const BARREL: &str = r"export { Button } from './button';
export { Input, Input as TextInput } from './input';
export { default as Card } from './card';
export { Label } from './label';
";

const HOME: &str = r"import React from 'react';
import { useState } from 'react';
import { Button } from '@/shared/components/ui/button';
import { Input } from '@/shared/components/ui/input';

// Landing page
export function Home() {
  const [value] = useState('');
  return <Button><Input value={value} /></Button>;
}
";

const HOME_CONSOLIDATED: &str = r"import React from 'react';
import { useState } from 'react';
import { Button, Input } from '@/shared/components/ui';

// Landing page
export function Home() {
  const [value] = useState('');
  return <Button><Input value={value} /></Button>;
}
";

struct Project {
    _temp: TempDir,
    root: Utf8PathBuf,
    state: StatePaths,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let base =
            Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("temp dir should be UTF-8");
        let root = base.join("web-app");
        let project = Self {
            _temp: temp,
            root,
            state: StatePaths::new(base.join("state")),
        };
        project.write("src/shared/components/ui/index.ts", BARREL);
        project
    }

    fn write(&self, relative: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    fn read(&self, path: &Utf8Path) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }

    fn consolidator(&self) -> Consolidator {
        let mut consolidator =
            Consolidator::with_working_dir(Config::default(), self.state.clone(), &self.root);
        consolidator.initialize_registry();
        consolidator
    }

    fn src(&self) -> Vec<Utf8PathBuf> {
        vec![self.root.join("src")]
    }
}

fn fix() -> RunOptions {
    RunOptions {
        dry_run: false,
        use_cache: false,
        ..RunOptions::default()
    }
}

fn dry_run() -> RunOptions {
    RunOptions {
        use_cache: false,
        ..RunOptions::default()
    }
}

#[test]
fn test_registry_uses_public_barrel_names() {
    let project = Project::new();
    let consolidator = project.consolidator();
    assert_eq!(
        consolidator.registry().sorted_names(),
        vec!["Button", "Card", "Input", "Label", "TextInput"]
    );
}

#[test]
fn test_dry_run_reports_without_touching_disk() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &dry_run())
        .expect("run should succeed");

    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert!(result.changed);
    assert_eq!(result.backup_path, None);
    assert_eq!(
        result.consolidated_import,
        "import { Button, Input } from '@/shared/components/ui';"
    );
    assert_eq!(project.read(&home), HOME);
    assert!(!project.state.backups_dir().exists());
}

#[test]
fn test_fix_rewrites_and_backs_up() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &fix())
        .expect("run should succeed");

    assert_eq!(outcome.summary.files_changed, 1);
    assert_eq!(project.read(&home), HOME_CONSOLIDATED);

    let backup = outcome.results[0]
        .backup_path
        .clone()
        .expect("a changed file is backed up");
    assert_eq!(backup.file_name(), Some("src_pages_Home.tsx"));
    assert_eq!(project.read(&backup), HOME);
}

#[test]
fn test_second_run_is_idempotent() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);
    let consolidator = project.consolidator();

    consolidator
        .process_files(&project.src(), &fix())
        .expect("first run should succeed");
    let second = consolidator
        .process_files(&project.src(), &fix())
        .expect("second run should succeed");

    assert_eq!(second.summary.files_processed, 1);
    assert!(!second.summary.has_changes());
    assert!(second.results[0].original_imports.is_empty());
    assert_eq!(project.read(&home), HOME_CONSOLIDATED);
}

#[test]
fn test_cache_skips_until_file_changes() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);
    let consolidator = project.consolidator();
    let cached = RunOptions::default();

    let first = consolidator
        .process_files(&project.src(), &cached)
        .expect("first run should succeed");
    assert_eq!(first.summary.files_processed, 1);

    let second = consolidator
        .process_files(&project.src(), &cached)
        .expect("second run should succeed");
    assert_eq!(second.summary.files_skipped, 1);
    assert!(second.results.is_empty());

    project.write("src/pages/Home.tsx", &HOME.replace("Landing", "landing"));
    let third = consolidator
        .process_files(&project.src(), &cached)
        .expect("third run should succeed");
    assert_eq!(third.summary.files_processed, 1);
    assert_eq!(third.results[0].file_path, home);
}

#[test]
fn test_no_matching_imports() {
    let project = Project::new();
    project.write(
        "src/pages/About.tsx",
        "import React from 'react';\nimport { Button } from '@/shared/components/ui';\n",
    );

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &fix())
        .expect("run should succeed");

    let result = &outcome.results[0];
    assert!(!result.changed);
    assert!(result.original_imports.is_empty());
    assert!(result.consolidated_import.is_empty());
}

#[test]
fn test_default_and_aliased_forms_of_same_component() {
    let project = Project::new();
    let page = project.write(
        "src/pages/Cards.tsx",
        "import Card, { Card as BaseCard } from '@/shared/components/ui/card';\nimport { Input as TextInput } from '@/shared/components/ui/input';\nexport const x = 1;\n",
    );

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &fix())
        .expect("run should succeed");

    assert_eq!(
        outcome.results[0].consolidated_import,
        "import { Card, BaseCard, TextInput } from '@/shared/components/ui';"
    );
    assert_eq!(
        project.read(&page),
        "import { Card, BaseCard, TextInput } from '@/shared/components/ui';\nexport const x = 1;\n"
    );
}

#[test]
fn test_sorted_names() {
    let project = Project::new();
    project.write(
        "src/pages/Form.tsx",
        "import { Label } from '@/shared/components/ui/label';\nimport { Button } from '@/shared/components/ui/button';\n",
    );
    let options = RunOptions {
        sort_imports: true,
        ..dry_run()
    };

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &options)
        .expect("run should succeed");

    assert_eq!(
        outcome.results[0].consolidated_import,
        "import { Button, Label } from '@/shared/components/ui';"
    );
}

#[test]
fn test_invalid_file_is_omitted_and_batch_continues() {
    let project = Project::new();
    project.write("src/pages/Broken.tsx", "import { Button from '@/shared/components/ui/button'\n");
    let home = project.write("src/pages/Home.tsx", HOME);

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &fix())
        .expect("run should succeed");

    assert_eq!(outcome.summary.files_failed, 1);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].file_path, home);
    assert_eq!(project.read(&home), HOME_CONSOLIDATED);
}

#[test]
fn test_exclude_patterns_override_defaults() {
    let project = Project::new();
    project.write("src/legacy/Old.tsx", HOME);
    project.write("src/pages/Home.tsx", HOME);
    let options = RunOptions {
        exclude_patterns: Some(vec!["legacy".to_owned()]),
        ..dry_run()
    };

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &options)
        .expect("run should succeed");

    assert_eq!(outcome.results.len(), 1);
    assert!(outcome.results[0].file_path.as_str().ends_with("pages/Home.tsx"));
}

#[test]
fn test_missing_path_is_empty_success() {
    let project = Project::new();
    let outcome = project
        .consolidator()
        .process_files(&[project.root.join("nope")], &fix())
        .expect("run should succeed");
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.summary.files_discovered(), 0);
}

#[test]
fn test_revert_latest_restores_original() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);
    let consolidator = project.consolidator();

    consolidator
        .process_files(&project.src(), &fix())
        .expect("run should succeed");
    assert_eq!(project.read(&home), HOME_CONSOLIDATED);

    let restored = consolidator.revert_latest().expect("revert should succeed");
    assert_eq!(restored, vec![home.clone()]);
    assert_eq!(project.read(&home), HOME);
}

#[test]
fn test_revert_without_backups_fails() {
    let project = Project::new();
    let err = project
        .consolidator()
        .revert_latest()
        .expect_err("nothing to revert");
    assert!(matches!(err, ConsolidateError::NoBackup { .. }));
}

#[test]
fn test_failed_write_keeps_backup_and_continues() {
    let project = Project::new();
    let home = project.write("src/pages/Home.tsx", HOME);
    let settings = project.write("src/pages/Settings.tsx", HOME);
    // occupies the temporary path the rewrite of Home.tsx needs
    let blocker = fs::canonicalize(project.root.join("src/pages"))
        .expect("canonicalize pages dir")
        .join(format!(".Home.tsx.{}.tmp", std::process::id()));
    fs::create_dir(&blocker).expect("create blocker dir");

    let outcome = project
        .consolidator()
        .process_files(&project.src(), &fix())
        .expect("run should succeed");

    assert_eq!(outcome.summary.files_failed, 1);
    assert_eq!(outcome.summary.files_changed, 1);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].file_path, settings);
    assert_eq!(project.read(&home), HOME);
    assert_eq!(project.read(&settings), HOME_CONSOLIDATED);

    let batches: Vec<_> = fs::read_dir(project.state.backups_dir().join("web-app"))
        .expect("backup batches exist")
        .filter_map(Result::ok)
        .collect();
    assert_eq!(batches.len(), 1);
    let home_backup = batches[0].path().join("files").join("src_pages_Home.tsx");
    assert_eq!(
        fs::read_to_string(home_backup).expect("backup of the failed file stays"),
        HOME
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_rewritten_through_the_link() {
    let project = Project::new();
    let real = project.write("src/pages/Real.tsx", HOME);
    let link = project.root.join("src/pages/Link.tsx");
    std::os::unix::fs::symlink(&real, &link).expect("create symlink");

    let outcome = project
        .consolidator()
        .process_files(&[link.clone()], &fix())
        .expect("run should succeed");

    assert!(outcome.results[0].changed);
    assert!(
        fs::symlink_metadata(&link)
            .expect("stat link")
            .file_type()
            .is_symlink()
    );
    assert_eq!(project.read(&real), HOME_CONSOLIDATED);
}
