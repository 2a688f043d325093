//! Implementation of the `skillconv validate` command.
//!
//! Checks converted output with a real YAML parser, so documents the
//! line-oriented transcoder accepted are also readable by Codex.

use std::{
    fs,
    path::{Path, PathBuf},
};

use owo_colors::OwoColorize;
use serde::Deserialize;

use crate::{
    commands::ColorChoice,
    config::{Config, Overrides},
    error::{Error, Result},
    frontmatter::split_document,
    paths::display_relative,
};

/// Agent documents in the target tree.
const AGENTS_DIR: &str = "agents";
/// Skill directories in the target tree.
const SKILLS_DIR: &str = "skills";
/// Skill file name in converted output.
const SKILL_FILE_NAME: &str = "SKILL.md";

/// Header fields checked on converted agents.
#[derive(Debug, Deserialize)]
struct AgentFrontmatter {
    /// Agent name.
    name: Option<String>,
    /// Agent description.
    description: Option<String>,
    /// Tool list; must be a sequence when present.
    #[serde(rename = "allowed-tools")]
    allowed_tools: Option<Vec<String>>,
    /// Leftover source-format tools field.
    tools: Option<serde_yaml::Value>,
}

/// Header fields checked on skills.
#[derive(Debug, Deserialize)]
struct SkillFrontmatter {
    /// Skill name.
    name: Option<String>,
    /// Skill description.
    description: Option<String>,
}

/// Kind of document being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// A converted agent document.
    Agent,
    /// A skill file.
    Skill,
}

/// Execute the validate command.
pub fn run(color: ColorChoice, overrides: &Overrides) -> Result<()> {
    let config = Config::load(overrides)?;
    let target = config.target();
    if !target.is_dir() {
        return Err(Error::TargetMissing {
            path: target.to_path_buf(),
        });
    }
    let use_color = color.enabled();

    let documents = collect_documents(target)?;
    if documents.is_empty() {
        println!("No documents to validate.");
        return Ok(());
    }

    let mut valid_count = 0;
    let mut invalid_count = 0;

    for (kind, path) in documents {
        let label = display_relative(&path, target);
        let contents = fs::read_to_string(&path).map_err(|error| Error::FileRead {
            path: path.clone(),
            source: error,
        })?;
        let errors = match kind {
            Kind::Agent => validate_agent(&contents),
            Kind::Skill => validate_skill(&contents),
        };

        if errors.is_empty() {
            valid_count += 1;
            if use_color {
                println!("{} {}", "✓".green(), label);
            } else {
                println!("✓ {}", label);
            }
        } else {
            invalid_count += 1;
            if use_color {
                println!("{} {}", "✗".red(), label);
            } else {
                println!("✗ {}", label);
            }
            for error in errors {
                println!("    - {}", error);
            }
        }
    }

    println!();
    println!("{} valid, {} invalid", valid_count, invalid_count);

    if invalid_count > 0 {
        return Err(Error::ValidationFailed {
            invalid: invalid_count,
        });
    }
    Ok(())
}

/// Find converted agents and skill files under the target root.
fn collect_documents(target: &Path) -> Result<Vec<(Kind, PathBuf)>> {
    let mut documents = Vec::new();

    let agents = target.join(AGENTS_DIR);
    if agents.is_dir() {
        for path in sorted_children(&agents)? {
            if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                documents.push((Kind::Agent, path));
            }
        }
    }

    let skills = target.join(SKILLS_DIR);
    if skills.is_dir() {
        for dir in sorted_children(&skills)? {
            let skill_file = dir.join(SKILL_FILE_NAME);
            if skill_file.is_file() {
                documents.push((Kind::Skill, skill_file));
            }
        }
    }

    Ok(documents)
}

/// Sorted child paths of a directory.
fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(|error| Error::DirRead {
            path: dir.to_path_buf(),
            source: error,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

/// Extract the raw header text, or an error message.
fn header_text(contents: &str) -> std::result::Result<&str, String> {
    split_document(contents)
        .header
        .ok_or_else(|| "missing YAML frontmatter".to_string())
}

/// Check a converted agent document.
fn validate_agent(contents: &str) -> Vec<String> {
    let header = match header_text(contents) {
        Ok(header) => header,
        Err(error) => return vec![error],
    };
    let parsed: AgentFrontmatter = match serde_yaml::from_str(header) {
        Ok(parsed) => parsed,
        Err(error) => return vec![format!("frontmatter: {error}")],
    };

    let mut errors = Vec::new();
    if parsed.name.unwrap_or_default().trim().is_empty() {
        errors.push("missing required field 'name'".to_string());
    }
    if parsed.description.is_none() {
        errors.push("missing field 'description'".to_string());
    }
    if parsed.tools.is_some() {
        errors.push("unconverted 'tools' field present".to_string());
    }
    if let Some(tools) = parsed.allowed_tools
        && tools.iter().any(|tool| tool.trim().is_empty())
    {
        errors.push("'allowed-tools' contains an empty entry".to_string());
    }
    errors
}

/// Check a skill file.
fn validate_skill(contents: &str) -> Vec<String> {
    let header = match header_text(contents) {
        Ok(header) => header,
        Err(error) => return vec![error],
    };
    let parsed: SkillFrontmatter = match serde_yaml::from_str(header) {
        Ok(parsed) => parsed,
        Err(error) => return vec![format!("frontmatter: {error}")],
    };

    let mut errors = Vec::new();
    if parsed.name.unwrap_or_default().trim().is_empty() {
        errors.push("missing required field 'name'".to_string());
    }
    if parsed.description.unwrap_or_default().trim().is_empty() {
        errors.push("missing required field 'description'".to_string());
    }
    errors
}
