//! Advisory shell-environment output.
//!
//! The provisioner never writes to the user's shell profile. It renders the
//! assignments and leaves applying them to the user (`roadie env` prints
//! them undecorated for exactly that purpose).

use std::path::Path;

/// Render the export lines for an install directory.
///
/// SUMO expects SUMO_HOME to point at the checkout, its binaries live under
/// `bin/`, and the TraCI python tools under `tools/`.
pub fn render(install_dir: &Path) -> Vec<String> {
    let dir = install_dir.display();
    vec![
        format!("export PATH=\"{dir}/bin:$PATH\""),
        format!("export SUMO_HOME=\"{dir}\""),
        format!("export PYTHONPATH=\"{dir}/tools:$PYTHONPATH\""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_renders_three_lines_with_install_dir() {
        let dir = PathBuf::from("/home/user/sumo_binaries");
        let lines = render(&dir);

        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.contains("/home/user/sumo_binaries"));
            assert!(line.starts_with("export "));
        }
    }

    #[test]
    fn test_sumo_home_appears_exactly_once() {
        let lines = render(&PathBuf::from("/opt/sumo")).join("\n");
        assert_eq!(lines.matches("SUMO_HOME=").count(), 1);
        assert!(lines.contains("export SUMO_HOME=\"/opt/sumo\""));
    }

    #[test]
    fn test_path_and_pythonpath_append() {
        let lines = render(&PathBuf::from("/opt/sumo"));
        assert!(lines[0].contains("/opt/sumo/bin:$PATH"));
        assert!(lines[2].contains("/opt/sumo/tools:$PYTHONPATH"));
    }
}
