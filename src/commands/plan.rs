//! Plan command - show the provisioning plan without executing it

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::PlanArgs;
use crate::config::Config;
use crate::engine::planner::{self, Policy};
use crate::ui;

pub fn run(_ctx: &Context, args: PlanArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = args.install_dir {
        config.install_dir = dir;
    }
    config.validate()?;

    let stages = planner::select_stages(args.only.as_deref(), args.skip.as_deref())?;
    let plan = planner::build(&config).retain_stages(&stages);

    ui::header("Provisioning Plan");
    ui::kv(
        "Install directory",
        &config.install_path().display().to_string(),
    );
    ui::kv("Repository", &config.source.url);
    ui::kv("Revision", &config.source.revision);
    let stage_names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
    ui::kv("Stages", &stage_names.join(", "));
    println!();

    if plan.is_empty() {
        ui::success("Nothing to do - no stages selected");
        return Ok(());
    }

    let total = plan.len();
    for (idx, step) in plan.steps().iter().enumerate() {
        let suffix = match step.policy {
            Policy::Optional => format!(" ({})", step.policy.label()).dimmed().to_string(),
            Policy::Required => String::new(),
        };
        ui::step(idx + 1, total, &format!("{}{suffix}", step.name));
        ui::command(&step.display_command());
        if let Some(cwd) = &step.cwd {
            ui::dim(&format!("in {}", cwd.display()));
        }
    }

    println!();
    println!(
        "  {} Nothing was executed - run {} to apply",
        "ℹ".blue(),
        "roadie up".bold()
    );
    Ok(())
}
