//! Doctor command - preflight checks for the external tools the plan invokes

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::config::Config;
use crate::paths;
use crate::runner;
use crate::ui;

struct Issue {
    category: &'static str,
    summary: String,
    detail: Option<String>,
    fix_cmd: Option<String>,
}

pub fn run(_ctx: &Context) -> Result<()> {
    ui::header("Provisioning Health Check");

    let mut issues: Vec<Issue> = Vec::new();

    let config = check_config(&mut issues);
    check_commands(&config, &mut issues);
    check_install_dir(&config, &mut issues);

    println!();
    if issues.is_empty() {
        ui::success("Ready to provision!");
    } else {
        print_issue_summary(&issues);
    }

    Ok(())
}

fn check_config(issues: &mut Vec<Issue>) -> Config {
    ui::section("Configuration");

    let config_dir = match paths::config_dir() {
        Ok(d) => d,
        Err(e) => {
            ui::error("Could not determine config directory");
            issues.push(Issue {
                category: "Configuration",
                summary: "Could not determine config directory".into(),
                detail: Some(format!("{e}")),
                fix_cmd: None,
            });
            return Config::default();
        }
    };

    let has_file =
        config_dir.join("config.toml").exists() || config_dir.join("config.json").exists();

    let config = match Config::load_from(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            let root_cause = format!("{:#}", e.root_cause());
            println!(
                "  {} config - {}",
                "⚠".yellow(),
                format!("(parse error: {root_cause})").yellow()
            );
            issues.push(Issue {
                category: "Configuration",
                summary: "Config file has invalid format".into(),
                detail: Some(format!("{e:#}")),
                fix_cmd: Some(format!("$EDITOR {}/config.toml", config_dir.display())),
            });
            return Config::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            if has_file {
                println!(
                    "  {} config - {}",
                    "✓".green(),
                    format!("loaded from {}", config_dir.display()).dimmed()
                );
            } else {
                println!(
                    "  {} config - {}",
                    "○".dimmed(),
                    "built-in defaults (no config file)".dimmed()
                );
            }
        }
        Err(e) => {
            let reason = format!("{e:#}");
            println!(
                "  {} config - {}",
                "⚠".yellow(),
                format!("(validation error: {reason})").yellow()
            );
            issues.push(Issue {
                category: "Configuration",
                summary: format!("Config validation error: {reason}"),
                detail: None,
                fix_cmd: Some(format!("$EDITOR {}/config.toml", config_dir.display())),
            });
        }
    }

    config
}

fn check_commands(config: &Config, issues: &mut Vec<Issue>) {
    ui::section("Required Commands");

    let manager = config.packages.manager.clone();
    let mut commands: Vec<(String, &str, &str)> = vec![(
        manager,
        "Package manager",
        "Part of the base system on Debian/Ubuntu",
    )];
    if config.packages.use_sudo {
        commands.push((
            "sudo".to_string(),
            "Privilege escalation",
            "su -c 'apt-get install sudo'",
        ));
    }
    commands.push(("git".to_string(), "Version control", "sudo apt-get install git"));
    commands.push((
        "cmake".to_string(),
        "Build configuration",
        "sudo apt-get install cmake",
    ));
    commands.push((
        "make".to_string(),
        "Build tool",
        "sudo apt-get install build-essential",
    ));

    for (cmd, desc, install_hint) in commands {
        if runner::command_exists(&cmd) {
            println!("  {} {} - {}", "✓".green(), cmd, desc.dimmed());
        } else {
            println!("  {} {} - {} {}", "✗".red(), cmd, desc, "(missing)".red());
            issues.push(Issue {
                category: "Required Commands",
                summary: format!("{cmd} is not installed"),
                detail: Some(format!("{desc} — the plan invokes it directly")),
                fix_cmd: Some(install_hint.to_string()),
            });
        }
    }
}

fn check_install_dir(config: &Config, issues: &mut Vec<Issue>) {
    ui::section("Install Directory");

    let install_dir = config.install_path();
    if install_dir.exists() {
        println!(
            "  {} {} already exists",
            "⚠".yellow(),
            install_dir.display()
        );
        issues.push(Issue {
            category: "Install Directory",
            summary: format!("{} already exists", install_dir.display()),
            detail: Some("The clone step will refuse to clone into an existing directory".into()),
            fix_cmd: Some(format!("rm -rf {}", install_dir.display())),
        });
    } else {
        println!(
            "  {} {} - {}",
            "✓".green(),
            install_dir.display(),
            "will be created by the clone step".dimmed()
        );
    }
}

fn print_issue_summary(issues: &[Issue]) {
    let count = issues.len();
    let label = if count == 1 { "Issue" } else { "Issues" };
    ui::header(&format!("{count} {label} Found"));

    for (i, issue) in issues.iter().enumerate() {
        let num = i + 1;
        println!(
            "  {}  {} {}",
            format!("{num}.").bold(),
            issue.summary,
            format!("[{}]", issue.category).dimmed()
        );
        if let Some(detail) = &issue.detail {
            for line in detail.lines() {
                println!("      {}", line.dimmed());
            }
        }
        if let Some(cmd) = &issue.fix_cmd {
            println!("      {} {}", "$".dimmed(), cmd.bold());
        }
        println!();
    }

    let fix_cmds: Vec<&str> = issues.iter().filter_map(|i| i.fix_cmd.as_deref()).collect();

    if !fix_cmds.is_empty() {
        ui::section("Quick Fixes");
        println!(
            "  {}",
            "Run these commands to resolve the issues above:".dimmed()
        );
        println!();
        for cmd in &fix_cmds {
            println!("    {}", cmd.bold());
        }
    }
}
