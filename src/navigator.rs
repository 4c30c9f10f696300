//! Decide which commands one invocation sends, then send them.
//!
//! Planning reads a single [`TreeSnapshot`] and produces the full command
//! sequence before anything is dispatched, so a fatal probe failure never
//! leaves the window manager half-way through a navigation.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::command::WmCommand;
use crate::selector::{CycleSelection, SelectionRequest, select_by_cycle, select_by_index};
use crate::tree::{TreeSnapshot, WorkspaceView};
use crate::visibility::{VisibilityFilter, VisibilityProbe, filter_windows};
use crate::wm_client::WmClient;

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub workspace: String,
    pub selection: SelectionRequest,
    /// Raw visibility selector, interpreted once the workspace is known to exist
    pub visibility: String,
    /// Binding mode to finish in, `None` to keep the current one
    pub mode: Option<String>,
}

/// Compute the command sequence for `request` against `snapshot`.
pub fn plan<P: VisibilityProbe + ?Sized>(
    snapshot: &TreeSnapshot,
    request: &NavigationRequest,
    probe: &P,
) -> Result<Vec<WmCommand>> {
    let mut commands = Vec::with_capacity(2);

    match snapshot.workspace_by_name(&request.workspace) {
        None => {
            info!("Workspace {:?} not found, creating it", request.workspace);
            commands.push(switch_to(request));
        }
        Some(workspace) => commands.push(populate(snapshot, workspace, request, probe)?),
    }

    if let Some(mode) = &request.mode {
        commands.push(WmCommand::SetMode(mode.clone()));
    }

    Ok(commands)
}

/// Pick the focus command for an existing workspace.
fn populate<P: VisibilityProbe + ?Sized>(
    snapshot: &TreeSnapshot,
    workspace: &WorkspaceView,
    request: &NavigationRequest,
    probe: &P,
) -> Result<WmCommand> {
    let filter = VisibilityFilter::from_arg(&request.visibility);

    // Selecting a window only makes sense once we are on the workspace
    if !snapshot.is_focused_workspace(&workspace.name) {
        debug!(
            "Focused workspace is {:?}, switching to {:?}",
            snapshot.focused_workspace, workspace.name
        );
        return Ok(switch_to(request));
    }

    let windows = filter_windows(&workspace.leaves, filter, probe)?;
    debug!(
        "{} of {} windows on {:?} are candidates",
        windows.len(),
        workspace.leaves.len(),
        workspace.name
    );

    let command = match request.selection {
        SelectionRequest::ByIndex(n) => match select_by_index(&windows, n) {
            Some(window) => {
                info!("Focusing window {} ({:?})", window.display_id(), window.title);
                WmCommand::FocusWindow(window.focus_target())
            }
            None => {
                debug!("No windows to pick from, switching to the workspace instead");
                switch_to(request)
            }
        },
        SelectionRequest::Cycle(direction) => match select_by_cycle(&windows, direction) {
            CycleSelection::Target(window) => {
                info!(
                    "Cycling {:?} to window {} ({:?})",
                    direction,
                    window.display_id(),
                    window.title
                );
                WmCommand::FocusWindow(window.focus_target())
            }
            CycleSelection::Empty => {
                debug!("No windows to cycle through, switching to the workspace instead");
                switch_to(request)
            }
            CycleSelection::FocusedMissing => {
                warn!(
                    "No focused window among the candidates on {:?}, switching to the workspace instead",
                    workspace.name
                );
                switch_to(request)
            }
        },
    };

    Ok(command)
}

fn switch_to(request: &NavigationRequest) -> WmCommand {
    WmCommand::SwitchWorkspace(request.workspace.clone())
}

/// Send every planned command in order.
pub fn dispatch<C: WmClient + ?Sized>(client: &mut C, commands: &[WmCommand]) -> Result<()> {
    for command in commands {
        client.run_command(command)?;
    }
    Ok(())
}

/// Fetch a fresh snapshot, plan against it and dispatch the result.
///
/// Returns the commands that were sent.
pub fn navigate<C, P>(client: &mut C, probe: &P, request: &NavigationRequest) -> Result<Vec<WmCommand>>
where
    C: WmClient + ?Sized,
    P: VisibilityProbe + ?Sized,
{
    let snapshot = client.snapshot()?;
    let commands = plan(&snapshot, request, probe)?;
    dispatch(client, &commands)?;
    Ok(commands)
}
