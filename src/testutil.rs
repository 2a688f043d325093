//! Test utilities for setting up source and target trees.
//!
//! This module provides a `TestFixture` builder for creating isolated
//! conversion environments in a temporary directory.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    config::Config,
    diagnostics::Diagnostics,
    plan::Plan,
    walk::{WalkOptions, build_plan},
};

/// Agent content with a block description and a comma-separated tools field.
pub fn agent_content(name: &str, tools: &str) -> String {
    format!(
        "---\nname: {name}\ndescription: |\n  Agent {name}.\n  Second line.\ntools: {tools}\n---\n# {name}\n\nBody text.\n"
    )
}

/// Skill content with a name and description.
pub fn skill_content(name: &str) -> String {
    format!("---\nname: {name}\ndescription: Description for {name}\n---\nBody\n")
}

/// Test fixture holding a source tree and an empty target tree.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    _root: TempDir,
    /// Source tree root.
    source_dir: PathBuf,
    /// Target tree root.
    target_dir: PathBuf,
}

impl TestFixture {
    /// Create a new fixture with empty source and target directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let root_path = dunce::canonicalize(root.path()).expect("canonical temp dir");

        let source_dir = root_path.join("claude-skills");
        fs::create_dir_all(&source_dir).expect("create source dir");

        let target_dir = root_path.join("codex-skills");
        fs::create_dir_all(&target_dir).expect("create target dir");

        Self {
            _root: root,
            source_dir,
            target_dir,
        }
    }

    /// Add a file to the source tree at a relative path.
    pub fn with_source_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.source_dir.join(relative), contents);
        self
    }

    /// Add a file to the target tree at a relative path.
    pub fn with_target_file(self, relative: &str, contents: &str) -> Self {
        write_file(&self.target_dir.join(relative), contents);
        self
    }

    /// Get the source directory path.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Get the target directory path.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Build a Config pointing at the fixture trees.
    pub fn config(&self) -> Config {
        Config::new(self.source_dir.clone(), self.target_dir.clone())
    }

    /// Build a plan with default options.
    pub fn plan(&self) -> Plan {
        self.plan_with(&WalkOptions::default(), &mut Diagnostics::new(false))
    }

    /// Build a plan with custom options and diagnostics.
    pub fn plan_with(&self, options: &WalkOptions, diagnostics: &mut Diagnostics) -> Plan {
        build_plan(&self.source_dir, &self.target_dir, options, diagnostics).expect("build plan")
    }

    /// Read a file from the target tree.
    pub fn read_target(&self, relative: &str) -> Option<String> {
        fs::read_to_string(self.target_dir.join(relative)).ok()
    }

    /// Read a file from the source tree.
    pub fn read_source(&self, relative: &str) -> Option<String> {
        fs::read_to_string(self.source_dir.join(relative)).ok()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a file, creating parent directories.
fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_empty_fixture() {
        let fixture = TestFixture::new();
        assert!(fixture.source_dir().is_dir());
        assert!(fixture.target_dir().is_dir());
        fixture.config().ensure_roots().expect("roots exist");
    }

    #[test]
    fn adds_nested_files() {
        let fixture = TestFixture::new()
            .with_source_file("skills/a/SKILL.md", &skill_content("a"))
            .with_target_file("agents/x.md", "old");

        assert!(
            fixture
                .read_source("skills/a/SKILL.md")
                .expect("source file")
                .contains("name: a")
        );
        assert_eq!(fixture.read_target("agents/x.md").as_deref(), Some("old"));
    }
}
