//! Plan construction.
//!
//! A plan is built once from configuration and never modified afterwards;
//! the executor only reads it.

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::config::{Config, PackagesConfig};

/// Failure policy for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Failure halts the plan
    Required,
    /// Failure is logged and the plan continues
    Optional,
}

impl Policy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
        }
    }
}

/// Coarse grouping of steps, used for `--skip`/`--only` selection and for
/// error classification. Selection never reorders steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Packages,
    Sources,
    Configure,
    Compile,
}

impl Stage {
    pub const ALL: [Self; 4] = [
        Self::Packages,
        Self::Sources,
        Self::Configure,
        Self::Compile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Sources => "sources",
            Self::Configure => "configure",
            Self::Compile => "compile",
        }
    }
}

/// Map user-facing stage aliases to internal canonical names.
fn normalize_stage(name: &str) -> &str {
    match name {
        "deps" | "install" => "packages",
        "clone" | "git" => "sources",
        "cmake" => "configure",
        "make" | "build" => "compile",
        other => other,
    }
}

fn parse_stage(name: &str) -> Option<Stage> {
    match normalize_stage(name) {
        "packages" => Some(Stage::Packages),
        "sources" => Some(Stage::Sources),
        "configure" => Some(Stage::Configure),
        "compile" => Some(Stage::Compile),
        _ => None,
    }
}

/// Resolve `--only`/`--skip` into the set of stages to run.
///
/// `--only` wins when both are given, matching how the stage filters behave
/// in the CLI help. Unknown stage names are an error rather than silently
/// running everything.
pub fn select_stages(only: Option<&str>, skip: Option<&str>) -> Result<Vec<Stage>> {
    if let Some(only) = only {
        let selected = parse_stage_list(only)?;
        return Ok(Stage::ALL
            .iter()
            .copied()
            .filter(|s| selected.contains(s))
            .collect());
    }

    if let Some(skip) = skip {
        let skipped = parse_stage_list(skip)?;
        return Ok(Stage::ALL
            .iter()
            .copied()
            .filter(|s| !skipped.contains(s))
            .collect());
    }

    Ok(Stage::ALL.to_vec())
}

fn parse_stage_list(list: &str) -> Result<Vec<Stage>> {
    let mut stages = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match parse_stage(part) {
            Some(stage) => stages.push(stage),
            None => bail!(
                "Unknown stage `{part}` (expected one of: packages, sources, configure, compile)"
            ),
        }
    }
    Ok(stages)
}

/// One command invocation within a provisioning plan.
#[derive(Debug, Clone)]
pub struct Step {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub policy: Policy,
    pub stage: Stage,
}

impl Step {
    /// The full command line, for display.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// The ordered, immutable list of steps executed by the provisioner.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.policy == Policy::Required)
            .count()
    }

    pub fn optional_count(&self) -> usize {
        self.len() - self.required_count()
    }

    /// A copy of this plan keeping only steps in the selected stages.
    /// Order is preserved.
    pub fn retain_stages(&self, stages: &[Stage]) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .filter(|s| stages.contains(&s.stage))
                .cloned()
                .collect(),
        }
    }
}

/// Build the provisioning plan from configuration.
///
/// The step sequence mirrors a from-scratch source install: refresh the
/// package index, install build dependencies, clone at the pinned revision,
/// then cmake + make out of a `build/` subdirectory.
pub fn build(config: &Config) -> Plan {
    let install_dir = config.install_path();
    let build_dir = install_dir.join("build");
    let jobs = config.effective_jobs();
    let mut steps = Vec::new();

    let pm = &config.packages;

    if pm.refresh_index {
        let (program, args) = package_command(pm, &["update"]);
        steps.push(Step {
            name: "refresh package index".to_string(),
            program,
            args,
            cwd: None,
            policy: Policy::Optional,
            stage: Stage::Packages,
        });
    }

    let mut install_args: Vec<&str> = vec!["install", "-y"];
    install_args.extend(pm.names.iter().map(String::as_str));
    let (program, args) = package_command(pm, &install_args);
    steps.push(Step {
        name: "install build dependencies".to_string(),
        program,
        args,
        cwd: None,
        policy: Policy::Required,
        stage: Stage::Packages,
    });

    let mut clone_args = vec!["clone".to_string()];
    if config.source.recursive {
        clone_args.push("--recursive".to_string());
    }
    clone_args.push(config.source.url.clone());
    clone_args.push(install_dir.display().to_string());
    steps.push(Step {
        name: "clone sumo sources".to_string(),
        program: "git".to_string(),
        args: clone_args,
        cwd: None,
        policy: Policy::Required,
        stage: Stage::Sources,
    });

    steps.push(Step {
        name: "pin revision".to_string(),
        program: "git".to_string(),
        args: vec!["checkout".to_string(), config.source.revision.clone()],
        cwd: Some(install_dir.clone()),
        policy: Policy::Required,
        stage: Stage::Sources,
    });

    steps.push(Step {
        name: "create build directory".to_string(),
        program: "mkdir".to_string(),
        args: vec!["-p".to_string(), "build".to_string()],
        cwd: Some(install_dir),
        policy: Policy::Required,
        stage: Stage::Configure,
    });

    steps.push(Step {
        name: "configure build".to_string(),
        program: "cmake".to_string(),
        args: vec!["..".to_string()],
        cwd: Some(build_dir.clone()),
        policy: Policy::Required,
        stage: Stage::Configure,
    });

    steps.push(Step {
        name: "compile".to_string(),
        program: "make".to_string(),
        args: vec![format!("-j{jobs}")],
        cwd: Some(build_dir),
        policy: Policy::Required,
        stage: Stage::Compile,
    });

    Plan::new(steps)
}

/// Wrap a package-manager invocation in sudo when configured.
fn package_command(pm: &PackagesConfig, args: &[&str]) -> (String, Vec<String>) {
    if pm.use_sudo {
        let mut full = vec![pm.manager.clone()];
        full.extend(args.iter().map(|s| (*s).to_string()));
        ("sudo".to_string(), full)
    } else {
        (
            pm.manager.clone(),
            args.iter().map(|s| (*s).to_string()).collect(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.install_dir = "/tmp/roadie-test-sumo".to_string();
        config.build.jobs = 4;
        config
    }

    #[test]
    fn test_default_plan_order_and_policies() {
        let plan = build(&test_config());

        let names: Vec<&str> = plan.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "refresh package index",
                "install build dependencies",
                "clone sumo sources",
                "pin revision",
                "create build directory",
                "configure build",
                "compile",
            ]
        );

        let policies: Vec<Policy> = plan.steps().iter().map(|s| s.policy).collect();
        assert_eq!(policies[0], Policy::Optional);
        assert!(policies[1..].iter().all(|p| *p == Policy::Required));

        assert_eq!(plan.required_count(), 6);
        assert_eq!(plan.optional_count(), 1);
    }

    #[test]
    fn test_plan_commands() {
        let config = test_config();
        let plan = build(&config);
        let steps = plan.steps();

        // Package steps go through sudo
        assert_eq!(steps[0].program, "sudo");
        assert_eq!(steps[0].args[0], "apt-get");
        assert_eq!(steps[0].args[1], "update");
        assert!(steps[1].args.contains(&"install".to_string()));
        assert!(steps[1].args.contains(&"-y".to_string()));
        assert!(steps[1].args.contains(&"cmake".to_string()));

        // Clone carries --recursive, the URL, and the install dir
        assert_eq!(steps[2].program, "git");
        assert!(steps[2].args.contains(&"--recursive".to_string()));
        assert!(steps[2].args.contains(&config.source.url));
        assert!(steps[2].args.contains(&"/tmp/roadie-test-sumo".to_string()));
        assert!(steps[2].cwd.is_none());

        // Checkout and mkdir run inside the checkout
        assert_eq!(steps[3].args, ["checkout", config.source.revision.as_str()]);
        assert_eq!(
            steps[3].cwd.as_deref().unwrap().to_str().unwrap(),
            "/tmp/roadie-test-sumo"
        );
        assert_eq!(steps[4].display_command(), "mkdir -p build");

        // cmake and make run in build/
        assert_eq!(steps[5].display_command(), "cmake ..");
        assert!(
            steps[5]
                .cwd
                .as_deref()
                .unwrap()
                .ends_with("roadie-test-sumo/build")
        );
        assert_eq!(steps[6].display_command(), "make -j4");
    }

    #[test]
    fn test_no_sudo_no_refresh() {
        let mut config = test_config();
        config.packages.use_sudo = false;
        config.packages.refresh_index = false;

        let plan = build(&config);
        assert_eq!(plan.steps()[0].name, "install build dependencies");
        assert_eq!(plan.steps()[0].program, "apt-get");
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_retain_stages_preserves_order() {
        let plan = build(&test_config());
        let filtered = plan.retain_stages(&[Stage::Sources, Stage::Compile]);

        let names: Vec<&str> = filtered.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["clone sumo sources", "pin revision", "compile"]);
    }

    #[test]
    fn test_select_stages_default() {
        let stages = select_stages(None, None).unwrap();
        assert_eq!(stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_select_stages_only() {
        let stages = select_stages(Some("sources,compile"), None).unwrap();
        assert_eq!(stages, vec![Stage::Sources, Stage::Compile]);
    }

    #[test]
    fn test_select_stages_skip() {
        let stages = select_stages(None, Some("packages")).unwrap();
        assert_eq!(
            stages,
            vec![Stage::Sources, Stage::Configure, Stage::Compile]
        );
    }

    #[test]
    fn test_select_stages_only_wins_over_skip() {
        let stages = select_stages(Some("compile"), Some("compile")).unwrap();
        assert_eq!(stages, vec![Stage::Compile]);
    }

    #[test]
    fn test_select_stages_aliases() {
        let stages = select_stages(Some("deps, make"), None).unwrap();
        assert_eq!(stages, vec![Stage::Packages, Stage::Compile]);
    }

    #[test]
    fn test_select_stages_unknown_name_errors() {
        assert!(select_stages(Some("frobnicate"), None).is_err());
        assert!(select_stages(None, Some("frobnicate")).is_err());
    }

    #[test]
    fn test_display_command() {
        let step = Step {
            name: "x".to_string(),
            program: "git".to_string(),
            args: vec!["checkout".to_string(), "abc1234".to_string()],
            cwd: None,
            policy: Policy::Required,
            stage: Stage::Sources,
        };
        assert_eq!(step.display_command(), "git checkout abc1234");
    }
}
