//! Visibility filtering of workspace leaves.
//!
//! The window manager's tree cannot tell whether a window in a stacked or
//! tabbed container is actually on screen, so X11 windows are inspected with
//! `xprop` and checked for the `_NET_WM_STATE_HIDDEN` state.

use anyhow::{Context, Result, bail};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

use crate::tree::WindowHandle;

const XPROP: &str = "xprop";
const HIDDEN_STATE: &str = "_NET_WM_STATE_HIDDEN";

/// Which leaves take part in selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Only windows that are currently rendered
    Visible,
    /// Every leaf, hidden or not
    All,
}

impl VisibilityFilter {
    /// Interpret the visibility argument. Unknown selectors fall back to
    /// [`VisibilityFilter::All`] with a warning.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "visible" => VisibilityFilter::Visible,
            "invisible" => VisibilityFilter::All,
            other => {
                warn!(
                    "Unknown visibility selector {:?}, only \"visible\" and \"invisible\" are supported",
                    other
                );
                VisibilityFilter::All
            }
        }
    }
}

/// Decides whether a window is currently visible.
///
/// This abstraction allows for fake probes in tests.
pub trait VisibilityProbe {
    fn is_visible(&self, window: &WindowHandle) -> Result<bool>;
}

/// Probe backed by the `xprop` utility.
pub struct XpropProbe {
    program: PathBuf,
}

impl Default for XpropProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl XpropProbe {
    /// Probe using `xprop` from `PATH`
    pub fn new() -> Self {
        Self::with_program(XPROP)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        XpropProbe {
            program: program.into(),
        }
    }
}

impl VisibilityProbe for XpropProbe {
    fn is_visible(&self, window: &WindowHandle) -> Result<bool> {
        // Native Wayland windows have no X11 id to inspect
        let Some(xid) = window.window else {
            return Ok(window.visible.unwrap_or(true));
        };

        let program = self.program.display();
        let output = match Command::new(&self.program)
            .arg("-id")
            .arg(xid.to_string())
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                bail!("The `{}` utility is not found! Please install it and retry.", program)
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to run {} for window {}", program, xid));
            }
        };

        // A failed inspection is an error, never "hidden"
        if !output.status.success() {
            bail!(
                "{} failed for window {} ({}): {}",
                program,
                xid,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let visible = !has_hidden_state(&String::from_utf8_lossy(&output.stdout));
        debug!("Window {} visible: {}", xid, visible);
        Ok(visible)
    }
}

/// Check xprop output for the hidden window state.
fn has_hidden_state(xprop_output: &str) -> bool {
    xprop_output.contains(HIDDEN_STATE)
}

/// Apply `filter` to `windows`, keeping their order.
///
/// Probe failures abort the whole filter; a partially filtered list could
/// focus a window the user cannot see.
pub fn filter_windows<P: VisibilityProbe + ?Sized>(
    windows: &[WindowHandle],
    filter: VisibilityFilter,
    probe: &P,
) -> Result<Vec<WindowHandle>> {
    match filter {
        VisibilityFilter::All => Ok(windows.to_vec()),
        VisibilityFilter::Visible => {
            let mut visible = Vec::with_capacity(windows.len());
            for window in windows {
                if probe.is_visible(window)? {
                    visible.push(window.clone());
                }
            }
            Ok(visible)
        }
    }
}
