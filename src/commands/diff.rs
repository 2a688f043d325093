//! Implementation of the `skillconv diff` command.

use crate::{
    commands::ColorChoice,
    config::{Config, Overrides},
    diagnostics::Diagnostics,
    diff::{Change, colorize_diff, operation_change, write_output},
    error::Result,
    paths::display_relative,
    plan::Plan,
    walk::build_plan,
};

/// Execute the diff command.
pub fn run(
    color: ColorChoice,
    verbose: bool,
    overrides: &Overrides,
    pager: Option<String>,
) -> Result<()> {
    let mut diagnostics = Diagnostics::new(verbose);
    let config = Config::load(overrides)?;
    config.ensure_roots()?;

    let plan = build_plan(
        config.source(),
        config.target(),
        config.walk(),
        &mut diagnostics,
    )?;
    let output = render_changes(&plan, &config, color.enabled())?;

    if output.is_empty() {
        println!("Target is up to date.");
    } else {
        write_output(&output, pager.as_deref())?;
    }

    diagnostics.print_warning_summary();
    Ok(())
}

/// Concatenate the diffs of every operation that would change the target.
fn render_changes(plan: &Plan, config: &Config, use_color: bool) -> Result<String> {
    let mut output = String::new();
    for operation in plan.operations() {
        let label = display_relative(operation.target(), config.target()).replace('\\', "/");
        match operation_change(operation, &label)? {
            Change::Unchanged => {}
            Change::Text(diff) => {
                output.push_str(&colorize_diff(&diff, use_color));
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            Change::Binary => {
                output.push_str(&format!("Binary files a/{label} and b/{label} differ\n"));
            }
        }
    }
    Ok(output)
}
