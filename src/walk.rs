//! Source tree discovery and plan construction.
//!
//! The walker decides, per file, whether it is copied verbatim or routed
//! through the agent transcoder. It never writes; callers apply the plan.

use std::{
    fs::{self, DirEntry},
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    agent::{Transcoded, transcode},
    diagnostics::Diagnostics,
    error::{Error, Result},
    paths::display_path,
    plan::{Operation, Outcome, Plan, PlanEntry, Section},
};

/// Skill directories in the source and target trees.
const SKILLS_DIR: &str = "skills";
/// Agent documents in the source and target trees.
const AGENTS_DIR: &str = "agents";
/// Documentation directory copied as a whole.
const DOCS_DIR: &str = "docs";
/// File name every skill file is written as.
const TARGET_SKILL_FILE: &str = "SKILL.md";
/// Extension identifying agent documents.
const AGENT_EXTENSION: &str = "md";

/// Settings controlling which entries are walked and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Entry names ignored at any depth.
    pub(crate) skip: Vec<String>,
    /// Grouping directories whose children become top-level skills.
    pub(crate) flatten: Vec<String>,
    /// Accepted skill file names, first match wins.
    pub(crate) skill_files: Vec<String>,
    /// Top-level documentation files copied when present.
    pub(crate) docs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            skip: strings(&[
                ".git",
                ".claude",
                ".claude-plugin",
                ".sessions",
                ".DS_Store",
                "__pycache__",
                "crates",
                "scripts",
            ]),
            flatten: strings(&["infrastructure"]),
            skill_files: strings(&["SKILL.md", "skill.md"]),
            docs: strings(&["lessons-learned.md", "RIGHT_SIDE_OF_V.md", "HANDOVER.md"]),
        }
    }
}

impl WalkOptions {
    /// Whether an entry name is excluded.
    fn is_skipped(&self, name: &str) -> bool {
        self.skip.iter().any(|skip| skip == name)
    }

    /// Whether a directory name is a flatten group.
    fn is_flatten_group(&self, name: &str) -> bool {
        self.flatten.iter().any(|group| group == name)
    }

    /// Whether a file name is one of the accepted skill file names.
    fn is_skill_file(&self, name: &str) -> bool {
        self.skill_files.iter().any(|file| file == name)
    }

    /// Locate the skill file in a directory.
    fn find_skill_file(&self, dir: &Path) -> Option<PathBuf> {
        self.skill_files
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}

/// Build the full conversion plan for a source tree.
pub fn build_plan(
    source: &Path,
    target: &Path,
    options: &WalkOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Plan> {
    let mut plan = Plan::default();
    plan_skills(source, target, options, diagnostics, &mut plan)?;
    plan_agents(source, target, options, diagnostics, &mut plan)?;
    plan_docs(source, target, options, &mut plan)?;
    Ok(plan)
}

/// Plan copies for every skill directory, flattening grouping directories.
fn plan_skills(
    source: &Path,
    target: &Path,
    options: &WalkOptions,
    diagnostics: &mut Diagnostics,
    plan: &mut Plan,
) -> Result<()> {
    let skills_src = source.join(SKILLS_DIR);
    let skills_dst = target.join(SKILLS_DIR);
    if !skills_src.is_dir() {
        diagnostics.warn(format!(
            "skills directory not found: {}",
            display_path(&skills_src)
        ));
        return Ok(());
    }

    for entry in read_sorted(&skills_src)? {
        let name = entry_name(&entry);
        let skill_dir = entry.path();
        if options.is_skipped(&name) || !skill_dir.is_dir() {
            continue;
        }

        if options.is_flatten_group(&name) {
            for nested in read_sorted(&skill_dir)? {
                let nested_name = entry_name(&nested);
                let nested_dir = nested.path();
                if options.is_skipped(&nested_name) || !nested_dir.is_dir() {
                    continue;
                }
                let destination = skills_dst.join(&nested_name);
                if let Some(operations) = plan_skill_dir(&nested_dir, &destination, options)? {
                    plan.entries.push(PlanEntry {
                        section: Section::Skills,
                        source: nested_dir,
                        destination: Some(destination),
                        outcome: Outcome::Flattened,
                        tools: None,
                        operations,
                    });
                }
            }
            continue;
        }

        let destination = skills_dst.join(&name);
        let entry = match plan_skill_dir(&skill_dir, &destination, options)? {
            Some(operations) => PlanEntry {
                section: Section::Skills,
                source: skill_dir,
                destination: Some(destination),
                outcome: Outcome::Copied,
                tools: None,
                operations,
            },
            None => {
                diagnostics.detail(format!(
                    "no skill file found in {}",
                    display_path(&skill_dir)
                ));
                PlanEntry {
                    section: Section::Skills,
                    source: skill_dir,
                    destination: None,
                    outcome: Outcome::SkippedNoContent,
                    tools: None,
                    operations: Vec::new(),
                }
            }
        };
        plan.entries.push(entry);
    }

    Ok(())
}

/// Plan the copies for one skill directory, or `None` without a skill file.
fn plan_skill_dir(
    skill_dir: &Path,
    destination: &Path,
    options: &WalkOptions,
) -> Result<Option<Vec<Operation>>> {
    let Some(skill_file) = options.find_skill_file(skill_dir) else {
        return Ok(None);
    };

    let mut operations = vec![Operation::Copy {
        from: skill_file,
        to: destination.join(TARGET_SKILL_FILE),
    }];

    for entry in read_sorted(skill_dir)? {
        let name = entry_name(&entry);
        let path = entry.path();
        if options.is_skipped(&name) {
            continue;
        }
        if path.is_dir() {
            operations.extend(plan_tree(&path, &destination.join(&name), options)?);
        } else if path.is_file() && !options.is_skill_file(&name) {
            operations.push(Operation::Copy {
                from: path,
                to: destination.join(&name),
            });
        }
    }

    Ok(Some(operations))
}

/// Plan a recursive copy of a directory tree.
fn plan_tree(from: &Path, to: &Path, options: &WalkOptions) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    let walker = WalkDir::new(from)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !options.is_skipped(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.map_err(|error| Error::Walk {
            path: from.to_path_buf(),
            source: error,
        })?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let destination = to.join(relative);
        if entry.file_type().is_dir() {
            operations.push(Operation::CreateDir { to: destination });
        } else if entry.file_type().is_file() {
            operations.push(Operation::Copy {
                from: entry.path().to_path_buf(),
                to: destination,
            });
        }
    }

    Ok(operations)
}

/// Plan the conversion of every agent document.
fn plan_agents(
    source: &Path,
    target: &Path,
    options: &WalkOptions,
    diagnostics: &mut Diagnostics,
    plan: &mut Plan,
) -> Result<()> {
    let agents_src = source.join(AGENTS_DIR);
    let agents_dst = target.join(AGENTS_DIR);
    if !agents_src.is_dir() {
        diagnostics.warn(format!(
            "agents directory not found: {}",
            display_path(&agents_src)
        ));
        return Ok(());
    }

    for entry in read_sorted(&agents_src)? {
        let name = entry_name(&entry);
        let path = entry.path();
        let is_agent = path.extension().is_some_and(|ext| ext == AGENT_EXTENSION);
        if options.is_skipped(&name) || !is_agent || !path.is_file() {
            continue;
        }

        let destination = agents_dst.join(&name);
        plan.entries.push(plan_agent(path, destination, diagnostics)?);
    }

    Ok(())
}

/// Plan one agent document: converted, or copied when it has no header.
fn plan_agent(
    path: PathBuf,
    destination: PathBuf,
    diagnostics: &mut Diagnostics,
) -> Result<PlanEntry> {
    let contents = fs::read_to_string(&path).map_err(|error| Error::FileRead {
        path: path.clone(),
        source: error,
    })?;

    let entry = match transcode(&contents) {
        Transcoded::Converted {
            contents,
            tools,
            dropped,
        } => {
            if !dropped.is_empty() {
                diagnostics.detail(format!(
                    "{}: dropping fields {}",
                    display_path(&path),
                    dropped.join(", ")
                ));
            }
            PlanEntry {
                section: Section::Agents,
                operations: vec![Operation::Write {
                    to: destination.clone(),
                    contents,
                }],
                source: path,
                destination: Some(destination),
                outcome: Outcome::Converted,
                tools,
            }
        }
        Transcoded::NoHeader => {
            diagnostics.warn_skipped(&path, "no frontmatter found, copying unchanged");
            PlanEntry {
                section: Section::Agents,
                operations: vec![Operation::Copy {
                    from: path.clone(),
                    to: destination.clone(),
                }],
                source: path,
                destination: Some(destination),
                outcome: Outcome::SkippedNoHeader,
                tools: None,
            }
        }
    };

    Ok(entry)
}

/// Plan copies of the docs directory and the listed top-level doc files.
fn plan_docs(source: &Path, target: &Path, options: &WalkOptions, plan: &mut Plan) -> Result<()> {
    let docs_src = source.join(DOCS_DIR);
    if docs_src.is_dir() {
        let destination = target.join(DOCS_DIR);
        plan.entries.push(PlanEntry {
            section: Section::Docs,
            operations: plan_tree(&docs_src, &destination, options)?,
            source: docs_src,
            destination: Some(destination),
            outcome: Outcome::Copied,
            tools: None,
        });
    }

    for name in &options.docs {
        let path = source.join(name);
        if !path.is_file() {
            continue;
        }
        let destination = target.join(name);
        plan.entries.push(PlanEntry {
            section: Section::Docs,
            operations: vec![Operation::Copy {
                from: path.clone(),
                to: destination.clone(),
            }],
            source: path,
            destination: Some(destination),
            outcome: Outcome::Copied,
            tools: None,
        });
    }

    Ok(())
}

/// Read a directory and return its entries sorted by name.
fn read_sorted(path: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(path)
        .map_err(|error| Error::DirRead {
            path: path.to_path_buf(),
            source: error,
        })?
        .filter_map(|entry| entry.ok())
        .collect::<Vec<_>>();

    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Lossy UTF-8 name of a directory entry.
fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Convert string literals into owned strings.
fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{WalkOptions, build_plan};
    use crate::{
        diagnostics::Diagnostics,
        plan::{Operation, Outcome, Section},
        testutil::{TestFixture, agent_content},
    };

    fn targets(operations: &[Operation], root: &Path) -> Vec<String> {
        operations
            .iter()
            .filter(|operation| !matches!(operation, Operation::CreateDir { .. }))
            .map(|operation| {
                operation
                    .target()
                    .strip_prefix(root)
                    .expect("under target")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn copies_regular_skills_with_assets() {
        let fixture = TestFixture::new()
            .with_source_file("skills/alpha/skill.md", "---\nname: alpha\n---\n")
            .with_source_file("skills/alpha/notes.txt", "notes")
            .with_source_file("skills/alpha/examples/one.rs", "fn main() {}")
            .with_source_file("skills/alpha/.DS_Store", "junk");

        let plan = fixture.plan();
        let entries: Vec<_> = plan.section(Section::Skills).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Copied);
        assert_eq!(
            targets(&entries[0].operations, fixture.target_dir()),
            vec!["skills/alpha/SKILL.md", "skills/alpha/examples/one.rs", "skills/alpha/notes.txt"]
        );
    }

    #[test]
    fn flattens_grouping_directories() {
        let fixture = TestFixture::new()
            .with_source_file("skills/infrastructure/deploy/SKILL.md", "---\nname: deploy\n---\n")
            .with_source_file("skills/infrastructure/deploy/run.sh", "echo")
            .with_source_file("skills/infrastructure/empty/README.md", "nothing");

        let plan = fixture.plan();
        let entries: Vec<_> = plan.section(Section::Skills).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::Flattened);
        assert_eq!(
            targets(&entries[0].operations, fixture.target_dir()),
            vec!["skills/deploy/SKILL.md", "skills/deploy/run.sh"]
        );
    }

    #[test]
    fn skips_directories_without_skill_file() {
        let fixture = TestFixture::new()
            .with_source_file("skills/loose/README.md", "no skill here")
            .with_source_file("skills/scripts/SKILL.md", "excluded by name")
            .with_source_file("skills/stray.md", "not a directory");

        let plan = fixture.plan();
        let entries: Vec<_> = plan.section(Section::Skills).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, Outcome::SkippedNoContent);
        assert!(entries[0].operations.is_empty());
    }

    #[test]
    fn converts_agents_and_falls_back_without_header() {
        let fixture = TestFixture::new()
            .with_source_file("agents/reviewer.md", &agent_content("reviewer", "Read, Grep"))
            .with_source_file("agents/plain.md", "# No header\n")
            .with_source_file("agents/notes.txt", "ignored");

        let mut diagnostics = Diagnostics::new(false);
        let plan = fixture.plan_with(&WalkOptions::default(), &mut diagnostics);
        let entries: Vec<_> = plan.section(Section::Agents).collect();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].outcome, Outcome::SkippedNoHeader);
        assert!(matches!(entries[0].operations[0], Operation::Copy { .. }));

        assert_eq!(entries[1].outcome, Outcome::Converted);
        assert_eq!(
            entries[1].tools,
            Some(vec!["Read".to_string(), "Grep".to_string()])
        );
        match &entries[1].operations[0] {
            Operation::Write { contents, .. } => {
                assert!(contents.contains("allowed-tools:\n  - Read\n  - Grep\n"));
            }
            other => panic!("unexpected operation {other:?}"),
        }

        assert_eq!(diagnostics.skipped().len(), 1);
    }

    #[test]
    fn copies_docs() {
        let fixture = TestFixture::new()
            .with_source_file("docs/guide/intro.md", "intro")
            .with_source_file("HANDOVER.md", "handover")
            .with_source_file("OTHER.md", "not listed");

        let plan = fixture.plan();
        let entries: Vec<_> = plan.section(Section::Docs).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            targets(&entries[0].operations, fixture.target_dir()),
            vec!["docs/guide/intro.md"]
        );
        assert_eq!(
            targets(&entries[1].operations, fixture.target_dir()),
            vec!["HANDOVER.md"]
        );
    }

    #[test]
    fn honors_custom_options() {
        let fixture = TestFixture::new()
            .with_source_file("skills/ops/tool/SKILL.md", "---\nname: tool\n---\n")
            .with_source_file("skills/infrastructure/SKILL.md", "---\nname: infra\n---\n");

        let options = WalkOptions {
            flatten: vec!["ops".to_string()],
            ..WalkOptions::default()
        };
        let plan = fixture.plan_with(&options, &mut Diagnostics::new(false));
        let outcomes: Vec<_> = plan
            .section(Section::Skills)
            .map(|entry| entry.outcome)
            .collect();
        assert_eq!(outcomes, vec![Outcome::Copied, Outcome::Flattened]);
    }

    #[cfg(unix)]
    #[test]
    fn copies_symlinked_files_at_any_depth() {
        use std::os::unix::fs::symlink;

        let fixture = TestFixture::new()
            .with_source_file("skills/a/SKILL.md", "---\nname: a\n---\n")
            .with_source_file("skills/a/real.md", "real")
            .with_source_file("skills/a/sub/keep.md", "keep");
        let skill = fixture.source_dir().join("skills/a");
        symlink(skill.join("real.md"), skill.join("toplink.md")).expect("top symlink");
        symlink(skill.join("real.md"), skill.join("sub/link.md")).expect("nested symlink");

        let plan = fixture.plan();
        let entries: Vec<_> = plan.section(Section::Skills).collect();
        assert_eq!(
            targets(&entries[0].operations, fixture.target_dir()),
            vec![
                "skills/a/SKILL.md",
                "skills/a/real.md",
                "skills/a/sub/keep.md",
                "skills/a/sub/link.md",
                "skills/a/toplink.md",
            ]
        );
    }

    #[test]
    fn missing_sections_are_warnings() {
        let fixture = TestFixture::new();
        let mut diagnostics = Diagnostics::new(false);
        let plan = fixture.plan_with(&WalkOptions::default(), &mut diagnostics);
        assert!(plan.entries.is_empty());
        assert_eq!(diagnostics.warning_count(), 2);
    }
}
