//! Progress indicators for the roadie CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a step's output is being captured.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
