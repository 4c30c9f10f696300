//! Typed window-manager commands.
//!
//! Navigation logic only ever builds [`WmCommand`] values; the i3 command
//! string is produced by the [`Display`](fmt::Display) impl when the command
//! is handed to the connection.

use serde::Serialize;
use std::fmt;

/// How a window is addressed in a `focus` command.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// Native X11 window id, matched with `[id="..."]`
    X11Window(i64),
    /// Container id, matched with `[con_id=...]` (native Wayland windows under sway)
    Container(i64),
}

/// Commands this tool sends to the window manager
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "command", content = "arg")]
pub enum WmCommand {
    /// Switch to (and implicitly create) the named workspace
    SwitchWorkspace(String),
    /// Focus a single window
    FocusWindow(FocusTarget),
    /// Switch the binding mode
    SetMode(String),
}

impl fmt::Display for WmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WmCommand::SwitchWorkspace(name) => write!(f, "workspace {}", quote_arg(name)),
            WmCommand::FocusWindow(FocusTarget::X11Window(id)) => write!(f, "[id=\"{}\"] focus", id),
            WmCommand::FocusWindow(FocusTarget::Container(id)) => write!(f, "[con_id={}] focus", id),
            WmCommand::SetMode(mode) => write!(f, "mode {}", quote_arg(mode)),
        }
    }
}

/// Quote a command argument if i3's parser would otherwise split it.
fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | ';' | ','));

    if !needs_quotes {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
