//! Conversion plans: what each source document becomes and how it is written.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::error::{Error, Result};

/// Part of the tree an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Skill directories under `skills/`.
    Skills,
    /// Agent documents under `agents/`.
    Agents,
    /// Documentation.
    Docs,
}

/// What happened to one source document or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Copied unchanged to the matching target location.
    Copied,
    /// Copied unchanged, lifted out of a grouping directory.
    Flattened,
    /// Header rewritten for the target layout.
    Converted,
    /// Nothing recognizable to convert; nothing written.
    SkippedNoContent,
    /// Expected a header but found none; copied unchanged.
    SkippedNoHeader,
}

impl Outcome {
    /// Short label used in reports.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Copied => "copy",
            Self::Flattened => "flatten",
            Self::Converted => "convert",
            Self::SkippedNoContent => "skip",
            Self::SkippedNoHeader => "warn",
        }
    }
}

/// A single filesystem effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Copy a file byte for byte.
    Copy {
        /// Source file.
        from: PathBuf,
        /// Destination file.
        to: PathBuf,
    },
    /// Write generated contents.
    Write {
        /// Destination file.
        to: PathBuf,
        /// Generated contents.
        contents: String,
    },
    /// Create a directory, including empty ones from copied trees.
    CreateDir {
        /// Directory to create.
        to: PathBuf,
    },
}

impl Operation {
    /// Path this operation writes.
    pub(crate) fn target(&self) -> &Path {
        match self {
            Self::Copy { to, .. } | Self::Write { to, .. } | Self::CreateDir { to } => to.as_path(),
        }
    }

    /// Perform the operation, creating parent directories as needed.
    pub(crate) fn apply(&self) -> Result<()> {
        match self {
            Self::Copy { from, to } => {
                ensure_parent(to)?;
                fs::copy(from, to).map_err(|error| Error::FileCopy {
                    from: from.clone(),
                    to: to.clone(),
                    source: error,
                })?;
            }
            Self::Write { to, contents } => {
                ensure_parent(to)?;
                fs::write(to, contents).map_err(|error| Error::FileWrite {
                    path: to.clone(),
                    source: error,
                })?;
            }
            Self::CreateDir { to } => {
                fs::create_dir_all(to).map_err(|error| Error::FileWrite {
                    path: to.clone(),
                    source: error,
                })?;
            }
        }
        Ok(())
    }
}

/// Planned handling of one source document or directory.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// Section the entry belongs to.
    pub(crate) section: Section,
    /// Source path of the document or directory.
    pub(crate) source: PathBuf,
    /// Primary destination, if anything is written.
    pub(crate) destination: Option<PathBuf>,
    /// Resulting outcome.
    pub(crate) outcome: Outcome,
    /// Converted tool list, for agents with a `tools` field.
    pub(crate) tools: Option<Vec<String>>,
    /// Filesystem effects, in order.
    pub(crate) operations: Vec<Operation>,
}

/// Every entry of a conversion run, in walk order.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Planned entries.
    pub(crate) entries: Vec<PlanEntry>,
}

impl Plan {
    /// Entries belonging to one section.
    pub(crate) fn section(&self, section: Section) -> impl Iterator<Item = &PlanEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.section == section)
    }

    /// All operations across entries, in order.
    pub(crate) fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.entries.iter().flat_map(|entry| entry.operations.iter())
    }

    /// Aggregate outcome counts per section.
    pub(crate) fn summary(&self, dry_run: bool) -> Summary {
        let mut summary = Summary {
            dry_run,
            ..Summary::default()
        };
        for entry in &self.entries {
            let counts = match entry.section {
                Section::Skills => &mut summary.skills,
                Section::Agents => &mut summary.agents,
                Section::Docs => &mut summary.docs,
            };
            counts.record(entry.outcome);
        }
        summary
    }
}

/// Outcome counts for one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Documents copied unchanged.
    pub copied: usize,
    /// Documents copied out of a grouping directory.
    pub flattened: usize,
    /// Documents whose header was rewritten.
    pub converted: usize,
    /// Entries with nothing recognizable to convert.
    pub skipped: usize,
    /// Documents missing a header, copied unchanged.
    pub no_header: usize,
}

impl Counts {
    /// Count one outcome.
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Copied => self.copied += 1,
            Outcome::Flattened => self.flattened += 1,
            Outcome::Converted => self.converted += 1,
            Outcome::SkippedNoContent => self.skipped += 1,
            Outcome::SkippedNoHeader => self.no_header += 1,
        }
    }
}

/// Aggregated result of a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Whether writes were suppressed.
    pub dry_run: bool,
    /// Skill counts.
    pub skills: Counts,
    /// Agent counts.
    pub agents: Counts,
    /// Documentation counts.
    pub docs: Counts,
    /// Warnings emitted during the run.
    pub warnings: usize,
}

/// Create the parent directory of a path.
fn ensure_parent(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|error| Error::FileWrite {
        path: parent.to_path_buf(),
        source: error,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use super::{Operation, Outcome, Plan, PlanEntry, Section};

    fn entry(section: Section, outcome: Outcome) -> PlanEntry {
        PlanEntry {
            section,
            source: PathBuf::from("x"),
            destination: None,
            outcome,
            tools: None,
            operations: Vec::new(),
        }
    }

    #[test]
    fn summarizes_per_section() {
        let plan = Plan {
            entries: vec![
                entry(Section::Skills, Outcome::Copied),
                entry(Section::Skills, Outcome::Flattened),
                entry(Section::Skills, Outcome::SkippedNoContent),
                entry(Section::Agents, Outcome::Converted),
                entry(Section::Agents, Outcome::SkippedNoHeader),
                entry(Section::Docs, Outcome::Copied),
            ],
        };

        let summary = plan.summary(true);
        assert!(summary.dry_run);
        assert_eq!(summary.skills.copied, 1);
        assert_eq!(summary.skills.flattened, 1);
        assert_eq!(summary.skills.skipped, 1);
        assert_eq!(summary.agents.converted, 1);
        assert_eq!(summary.agents.no_header, 1);
        assert_eq!(summary.docs.copied, 1);
    }

    #[test]
    fn applies_operations_with_parents() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("in.md");
        fs::write(&source, "raw").expect("write");

        let copy = Operation::Copy {
            from: source,
            to: dir.path().join("a/b/out.md"),
        };
        let write = Operation::Write {
            to: dir.path().join("c/gen.md"),
            contents: "generated".to_string(),
        };
        let mkdir = Operation::CreateDir {
            to: dir.path().join("d/empty"),
        };
        for operation in [&copy, &write, &mkdir] {
            operation.apply().expect("apply");
        }

        assert_eq!(fs::read_to_string(copy.target()).expect("read"), "raw");
        assert_eq!(fs::read_to_string(write.target()).expect("read"), "generated");
        assert!(mkdir.target().is_dir());
    }
}
