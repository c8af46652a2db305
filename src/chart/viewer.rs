//! Opening a rendered chart in an external viewer.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Platform default viewer: program followed by its fixed arguments.
fn default_viewer() -> Vec<String> {
    let parts: &[&str] = if cfg!(target_os = "macos") {
        &["open", "-W"]
    } else if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", "/WAIT", ""]
    } else {
        &["xdg-open"]
    };
    parts.iter().map(|s| s.to_string()).collect()
}

/// Build the viewer command for `path`.
///
/// A configured viewer may carry its own arguments (`"feh --scale-down"`);
/// the chart path is appended last.
pub fn viewer_command(viewer: Option<&str>, path: &Path) -> Result<Command> {
    let parts: Vec<String> = match viewer {
        Some(v) => v.split_whitespace().map(String::from).collect(),
        None => default_viewer(),
    };

    let Some((program, args)) = parts.split_first() else {
        bail!("Viewer command is empty");
    };

    let mut command = Command::new(program);
    command.args(args).arg(path);
    Ok(command)
}

/// Whether the viewer hands the file off and returns before the window closes.
///
/// `xdg-open` delegates to the desktop handler and exits at once; `open -W`
/// and `start /WAIT` block, as do most configured viewers.
fn viewer_detaches(viewer: Option<&str>) -> bool {
    viewer.is_none() && cfg!(all(unix, not(target_os = "macos")))
}

/// Block until the user confirms the chart window is closed.
fn wait_for_close<R: BufRead>(mut input: R) -> Result<()> {
    eprint!("Close the chart and press Enter to exit... ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read confirmation from stdin")?;
    Ok(())
}

/// Open the chart and block until the viewer exits.
///
/// For viewers that detach, waits for the user on stdin instead.
pub fn show(path: &Path, viewer: Option<&str>) -> Result<()> {
    show_with_input(path, viewer, std::io::stdin().lock())
}

fn show_with_input<R: BufRead>(path: &Path, viewer: Option<&str>, input: R) -> Result<()> {
    let mut command = viewer_command(viewer, path)?;
    debug!("Launching viewer: {:?}", command);

    info!("Displaying {} (close the viewer to exit)", path.display());
    let status = command
        .status()
        .with_context(|| format!("Failed to launch viewer for {}", path.display()))?;

    if !status.success() {
        bail!("Viewer exited with {}", status);
    }

    if viewer_detaches(viewer) {
        debug!("Viewer detached, waiting for confirmation");
        wait_for_close(input)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::io::Cursor;

    #[test]
    fn test_configured_viewer_with_args() {
        let command = viewer_command(Some("feh --scale-down"), Path::new("chart.svg")).unwrap();

        assert_eq!(command.get_program(), OsStr::new("feh"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("--scale-down"), OsStr::new("chart.svg")]);
    }

    #[test]
    fn test_default_viewer_appends_path() {
        let command = viewer_command(None, Path::new("chart.svg")).unwrap();

        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(args.last(), Some(&OsStr::new("chart.svg")));
    }

    #[test]
    fn test_empty_viewer_rejected() {
        assert!(viewer_command(Some("   "), Path::new("chart.svg")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_show_waits_for_viewer() {
        assert!(show(Path::new("chart.svg"), Some("true")).is_ok());
        assert!(show(Path::new("chart.svg"), Some("false")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_blocking_viewer_does_not_prompt() {
        let mut input = Cursor::new(b"\n".to_vec());
        show_with_input(Path::new("chart.svg"), Some("true"), &mut input).unwrap();
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_default_viewer_detaches_on_desktop_unix() {
        assert!(!viewer_detaches(Some("feh")));
        assert_eq!(
            viewer_detaches(None),
            cfg!(all(unix, not(target_os = "macos")))
        );
    }

    #[test]
    fn test_wait_for_close_reads_one_line() {
        let mut input = Cursor::new(b"\nleftover\n".to_vec());
        wait_for_close(&mut input).unwrap();
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn test_wait_for_close_accepts_eof() {
        assert!(wait_for_close(Cursor::new(Vec::new())).is_ok());
    }
}
