//! Up command - run the full provisioning plan
//!
//! Installs OS packages, clones SUMO at the pinned revision, builds it, and
//! prints the environment block to add to the shell profile.

use anyhow::{Context as _, Result};
use colored::Colorize;

use crate::Context;
use crate::cli::UpArgs;
use crate::config::Config;
use crate::engine::planner;
use crate::engine::{self, ExecuteOptions, executor};
use crate::shellenv;
use crate::ui;

pub fn run(ctx: &Context, args: UpArgs) -> Result<()> {
    ui::header("SUMO Provisioning");

    let mut config = Config::load()?;
    if let Some(dir) = args.install_dir {
        config.install_dir = dir;
    }
    if let Some(jobs) = args.jobs {
        config.build.jobs = jobs;
    }
    config.validate()?;

    let stages = planner::select_stages(args.only.as_deref(), args.skip.as_deref())?;
    let plan = planner::build(&config).retain_stages(&stages);

    if plan.is_empty() {
        ui::success("Nothing to do - no stages selected");
        return Ok(());
    }

    if !ctx.quiet {
        ui::kv(
            "Install directory",
            &config.install_path().display().to_string(),
        );
        println!(
            "  {} steps to run ({} required, {} optional)",
            plan.len().to_string().bold(),
            plan.required_count().to_string().green(),
            plan.optional_count().to_string().yellow()
        );
        println!();
    }

    if !args.yes && !args.dry_run && !confirm_proceed()? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(());
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        stream: ctx.verbose > 0,
    };

    let summary = engine::execute(&plan, &opts)?;

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(());
    }

    executor::print_summary(&summary);
    print_env_block(&config);

    Ok(())
}

/// The advisory environment block; the user's shell profile is never
/// touched directly.
fn print_env_block(config: &Config) {
    ui::section("Shell configuration");
    println!("  Add these lines to your shell profile (e.g. ~/.bashrc):");
    println!();
    for line in shellenv::render(&config.install_path()) {
        println!("    {}", line.bold());
    }
    println!();
    println!(
        "  {}",
        "Or append them with: roadie env >> ~/.bashrc".dimmed()
    );
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .context("Failed to read confirmation")?;

    Ok(confirmed)
}
