//! Window selection within a single workspace.
//!
//! Both selectors are pure: they take the ordered leaf list of one workspace
//! and decide which handle should receive focus next.

use std::fmt;
use std::str::FromStr;

use crate::tree::WindowHandle;

/// Direction of a cycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Reverse,
}

/// What the caller asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRequest {
    /// Pick the n-th window, clamped into range
    ByIndex(i64),
    /// Move focus to the window after (or before) the focused one
    Cycle(CycleDirection),
}

/// Error returned when parsing an invalid index argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectionError(String);

impl fmt::Display for ParseSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid index {:?}: expected an integer, `cycle` or `cycle_reverse`",
            self.0
        )
    }
}

impl std::error::Error for ParseSelectionError {}

impl FromStr for SelectionRequest {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cycle" => Ok(SelectionRequest::Cycle(CycleDirection::Forward)),
            "cycle_reverse" | "reverse_cycle" => {
                Ok(SelectionRequest::Cycle(CycleDirection::Reverse))
            }
            other => other
                .parse::<i64>()
                .map(SelectionRequest::ByIndex)
                .map_err(|_| ParseSelectionError(s.to_string())),
        }
    }
}

/// Outcome of a cycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSelection<'a> {
    /// Focus this window next
    Target(&'a WindowHandle),
    /// Nothing to cycle through
    Empty,
    /// Several candidates but none of them holds focus
    FocusedMissing,
}

/// Pick the window at `n`, clamped into `[0, len - 1]`.
///
/// Out-of-range requests never wrap: anything past the end selects the last
/// window and negative indices select the first.
#[must_use]
pub fn select_by_index(windows: &[WindowHandle], n: i64) -> Option<&WindowHandle> {
    let last = windows.len().checked_sub(1)?;
    let index = usize::try_from(n.max(0)).unwrap_or(usize::MAX).min(last);
    windows.get(index)
}

/// Pick the cyclic successor of the focused window.
///
/// Reverse cycling walks the same list back to front, so its successor is
/// the focused window's predecessor.
#[must_use]
pub fn select_by_cycle(windows: &[WindowHandle], direction: CycleDirection) -> CycleSelection<'_> {
    let len = windows.len();
    match len {
        0 => return CycleSelection::Empty,
        1 => return CycleSelection::Target(&windows[0]),
        _ => {}
    }

    let Some(focused) = windows.iter().position(|w| w.focused) else {
        return CycleSelection::FocusedMissing;
    };

    let next = match direction {
        CycleDirection::Forward => (focused + 1) % len,
        CycleDirection::Reverse if focused == 0 => len - 1,
        CycleDirection::Reverse => focused - 1,
    };

    CycleSelection::Target(&windows[next])
}
