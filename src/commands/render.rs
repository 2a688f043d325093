//! Implementation of the `skillconv render` command.

use std::{fs, path::Path};

use crate::{
    agent::{Transcoded, transcode},
    diagnostics::Diagnostics,
    error::{Error, Result},
};

/// Execute the render command.
pub fn run(verbose: bool, path: &Path) -> Result<()> {
    let mut diagnostics = Diagnostics::new(verbose);
    let contents = fs::read_to_string(path).map_err(|error| Error::FileRead {
        path: path.to_path_buf(),
        source: error,
    })?;

    let rendered = render_agent(path, &contents, &mut diagnostics);
    print!("{rendered}");

    Ok(())
}

/// Converted document text, or the input unchanged when it has no header.
fn render_agent(path: &Path, contents: &str, diagnostics: &mut Diagnostics) -> String {
    match transcode(contents) {
        Transcoded::Converted {
            contents, dropped, ..
        } => {
            if !dropped.is_empty() {
                diagnostics.detail(format!("dropping fields {}", dropped.join(", ")));
            }
            contents
        }
        Transcoded::NoHeader => {
            diagnostics.warn(format!(
                "no frontmatter found in {}, printing unchanged",
                path.display()
            ));
            contents.to_string()
        }
    }
}
