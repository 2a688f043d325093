//! CLI parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{commands, config::Overrides, error::Result};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "skillconv",
    version,
    about = "Convert Claude Code skills and agents to the Codex layout"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long)]
    verbose: bool,
    /// Config file to load instead of ~/.skillconv.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Command to execute (defaults to convert).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

/// Source and target root overrides.
#[derive(Debug, Default, Args)]
struct RootArgs {
    /// Source tree (Claude Code layout).
    #[arg(long)]
    source: Option<PathBuf>,
    /// Target tree (Codex layout).
    #[arg(long)]
    target: Option<PathBuf>,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Convert the source tree into the target tree.
    Convert {
        /// Source and target roots.
        #[command(flatten)]
        roots: RootArgs,
        /// Show what would be done without making changes.
        #[arg(long, short = 'n')]
        dry_run: bool,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show how the target would change.
    Diff {
        /// Source and target roots.
        #[command(flatten)]
        roots: RootArgs,
        /// Send diff output through a pager.
        #[arg(long)]
        pager: Option<String>,
    },
    /// Print a single converted agent file.
    Render {
        /// Agent file to convert.
        file: PathBuf,
    },
    /// Validate the frontmatter of converted output.
    Validate {
        /// Target tree to validate.
        #[arg(long)]
        target: Option<PathBuf>,
    },
}

/// Run the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let color = cli.color.into_choice();
    let command = cli.command.unwrap_or(Command::Convert {
        roots: RootArgs::default(),
        dry_run: false,
        json: false,
    });

    // Match arms are ordered alphabetically - maintain this order.
    match command {
        Command::Convert {
            roots,
            dry_run,
            json,
        } => {
            let overrides = roots.into_overrides(cli.config);
            commands::convert::run(color, cli.verbose, &overrides, dry_run, json)
        }
        Command::Diff { roots, pager } => {
            let overrides = roots.into_overrides(cli.config);
            commands::diff::run(color, cli.verbose, &overrides, pager)
        }
        Command::Render { file } => commands::render::run(cli.verbose, &file),
        Command::Validate { target } => {
            let overrides = RootArgs {
                source: None,
                target,
            }
            .into_overrides(cli.config);
            commands::validate::run(color, &overrides)
        }
    }
}

impl RootArgs {
    /// Combine root flags with the config path into overrides.
    fn into_overrides(self, config: Option<PathBuf>) -> Overrides {
        Overrides {
            config,
            source: self.source,
            target: self.target,
        }
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "skillconv",
            "--config",
            "conv.toml",
            "convert",
            "--source",
            "in",
            "--target",
            "out",
            "-n",
        ])
        .expect("parse");

        let Some(Command::Convert { roots, dry_run, .. }) = cli.command else {
            panic!("expected convert");
        };
        assert!(dry_run);
        let overrides = roots.into_overrides(cli.config);
        assert_eq!(overrides.config.as_deref(), Some(Path::new("conv.toml")));
        assert_eq!(overrides.source.as_deref(), Some(Path::new("in")));
        assert_eq!(overrides.target.as_deref(), Some(Path::new("out")));
    }

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["skillconv"]).expect("parse");
        assert!(cli.command.is_none());
    }
}
