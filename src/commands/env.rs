//! Env command - print the environment exports for the install directory
//!
//! Output is plain so it can be appended to a shell profile directly:
//! `roadie env >> ~/.bashrc`

use anyhow::Result;

use crate::Context;
use crate::cli::EnvArgs;
use crate::config::Config;
use crate::shellenv;

pub fn run(_ctx: &Context, args: EnvArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = args.install_dir {
        config.install_dir = dir;
    }

    for line in shellenv::render(&config.install_path()) {
        println!("{line}");
    }
    Ok(())
}
