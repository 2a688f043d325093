//! Implementation of the `skillconv convert` command.

use crate::{
    commands::ColorChoice,
    config::{Config, Overrides},
    diagnostics::Diagnostics,
    error::{Error, Result},
    palette::{fmt_dimmed, fmt_heading, fmt_label, fmt_outcome, fmt_path},
    paths::{display_path, display_relative},
    plan::{Counts, Outcome, PlanEntry, Section, Summary},
    walk::build_plan,
};

/// Indent for entry lines.
const INDENT: &str = "  ";
/// Maximum number of tools shown in a dry-run preview.
const TOOL_PREVIEW: usize = 5;

/// How progress is reported while converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    /// Print nothing per entry.
    Quiet,
    /// Print entry lines and section counts.
    Human {
        /// Whether to colorize output.
        use_color: bool,
    },
}

/// Execute the convert command.
pub fn run(
    color: ColorChoice,
    verbose: bool,
    overrides: &Overrides,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let mut diagnostics = Diagnostics::new(verbose);
    let config = Config::load(overrides)?;
    let use_color = color.enabled() && !json;
    let report = if json {
        Report::Quiet
    } else {
        Report::Human { use_color }
    };

    let summary = convert(&config, dry_run, report, &mut diagnostics)?;

    if json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|error| Error::SummarySerialize { source: error })?;
        println!("{rendered}");
    } else {
        print_summary(&summary, use_color);
    }

    diagnostics.print_skipped_summary();
    diagnostics.print_warning_summary();
    Ok(())
}

/// Plan the conversion, then report and apply it entry by entry.
fn convert(
    config: &Config,
    dry_run: bool,
    report: Report,
    diagnostics: &mut Diagnostics,
) -> Result<Summary> {
    config.ensure_roots()?;
    if let Report::Human { use_color } = report {
        print_banner(config, dry_run, use_color);
    }

    let plan = build_plan(config.source(), config.target(), config.walk(), diagnostics)?;
    let mut summary = plan.summary(dry_run);

    for section in [Section::Skills, Section::Agents, Section::Docs] {
        if let Report::Human { use_color } = report {
            println!("{}", fmt_heading(&section_heading(section), use_color));
        }

        for entry in plan.section(section) {
            if let Report::Human { use_color } = report {
                for line in format_entry(entry, config, dry_run, use_color) {
                    println!("{line}");
                }
            }
            if !dry_run {
                for operation in &entry.operations {
                    operation.apply()?;
                }
            }
        }

        if let Report::Human { .. } = report {
            let counts = section_counts(&summary, section);
            println!("{INDENT}{}", format_counts(section, &counts));
            println!();
        }
    }

    summary.warnings = diagnostics.warning_count();
    Ok(summary)
}

/// Print the run header with both roots.
fn print_banner(config: &Config, dry_run: bool, use_color: bool) {
    let prefix = if dry_run { "[DRY-RUN] " } else { "" };
    println!("{prefix}Converting skills to the Codex layout");
    println!(
        "{INDENT}{} {}",
        fmt_label("Source:", use_color),
        fmt_path(&display_path(config.source()), use_color)
    );
    println!(
        "{INDENT}{} {}",
        fmt_label("Target:", use_color),
        fmt_path(&display_path(config.target()), use_color)
    );
    println!();
}

/// Heading printed before a section's entries.
fn section_heading(section: Section) -> String {
    let name = match section {
        Section::Skills => "Syncing Skills",
        Section::Agents => "Converting Agents",
        Section::Docs => "Syncing Documentation",
    };
    format!("=== {name} ===")
}

/// Counts belonging to one section.
fn section_counts(summary: &Summary, section: Section) -> Counts {
    match section {
        Section::Skills => summary.skills,
        Section::Agents => summary.agents,
        Section::Docs => summary.docs,
    }
}

/// One-line count report for a section.
fn format_counts(section: Section, counts: &Counts) -> String {
    match section {
        Section::Skills => format!(
            "Copied: {}, Flattened: {}, Skipped: {}",
            counts.copied, counts.flattened, counts.skipped
        ),
        Section::Agents => format!(
            "Converted: {}, Skipped: {}",
            counts.converted,
            counts.skipped + counts.no_header
        ),
        Section::Docs => format!("Copied: {}", counts.copied),
    }
}

/// Report lines for one plan entry.
fn format_entry(entry: &PlanEntry, config: &Config, dry_run: bool, use_color: bool) -> Vec<String> {
    let source = display_relative(&entry.source, config.source());
    let tag = fmt_outcome(entry.outcome, use_color);
    let arrow = if dry_run { "=> (dry run)" } else { "->" };

    let mut lines = Vec::new();
    match &entry.destination {
        Some(destination) => {
            let destination = display_relative(destination, config.target());
            let mut line = format!("{INDENT}{tag} {source} {arrow} {destination}");
            if entry.outcome == Outcome::SkippedNoHeader {
                line.push_str(&fmt_dimmed(" (no frontmatter, copied unchanged)", use_color));
            }
            lines.push(line);
        }
        None => lines.push(format!(
            "{INDENT}{tag} {source}{}",
            fmt_dimmed(" (no skill file found)", use_color)
        )),
    }

    if dry_run && let Some(tools) = &entry.tools {
        lines.push(format!(
            "{INDENT}{INDENT}{} {}",
            fmt_label("allowed-tools:", use_color),
            preview_tools(tools)
        ));
    }

    lines
}

/// Short, comma-separated preview of a tool list.
fn preview_tools(tools: &[String]) -> String {
    if tools.is_empty() {
        return "(none)".to_string();
    }
    let shown = tools
        .iter()
        .take(TOOL_PREVIEW)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if tools.len() > TOOL_PREVIEW {
        format!("{shown}, ... ({} total)", tools.len())
    } else {
        shown
    }
}

/// Print the closing summary block.
fn print_summary(summary: &Summary, use_color: bool) {
    println!("{}", fmt_heading("=== Summary ===", use_color));
    println!(
        "{INDENT}Skills: {} copied, {} flattened",
        summary.skills.copied, summary.skills.flattened
    );
    println!("{INDENT}Agents: {} converted", summary.agents.converted);
    println!("{INDENT}Docs: {} copied", summary.docs.copied);
    println!();
    if summary.dry_run {
        println!(
            "{} no changes were made. Run without --dry-run to apply changes.",
            fmt_label("Dry run:", use_color)
        );
    } else {
        println!("Conversion complete.");
    }
}
