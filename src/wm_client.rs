//! Window-manager IPC abstraction for testability.
//!
//! This module provides a trait over the two capabilities navigation needs
//! from the i3/sway control socket, allowing fake clients in tests.

use anyhow::{Context, Result};
use swayipc::Connection;
use tracing::{debug, warn};

use crate::command::WmCommand;
use crate::tree::TreeSnapshot;

/// Trait for window-manager IPC operations.
pub trait WmClient {
    /// Fetch the current layout tree and reduce it to a snapshot
    fn snapshot(&mut self) -> Result<TreeSnapshot>;

    /// Send a command without waiting on its effect.
    ///
    /// Commands the window manager rejects are logged, not returned as
    /// errors; only transport failures are.
    fn run_command(&mut self, command: &WmCommand) -> Result<()>;
}

/// Real implementation using swayipc (speaks both i3 and sway IPC)
pub struct RealWmClient {
    connection: Connection,
}

impl RealWmClient {
    /// Connect to the socket named by `I3SOCK` / `SWAYSOCK`
    pub fn new() -> Result<Self> {
        let connection = Connection::new()
            .context("Failed to connect to the window manager IPC socket")?;
        Ok(RealWmClient { connection })
    }
}

impl WmClient for RealWmClient {
    fn snapshot(&mut self) -> Result<TreeSnapshot> {
        let tree = self
            .connection
            .get_tree()
            .context("Failed to fetch the window tree")?;
        Ok(TreeSnapshot::from_tree(&tree))
    }

    fn run_command(&mut self, command: &WmCommand) -> Result<()> {
        let payload = command.to_string();
        debug!("Sending command: {}", payload);

        let outcomes = self
            .connection
            .run_command(&payload)
            .with_context(|| format!("Failed to send command `{}`", payload))?;

        for outcome in outcomes {
            if let Err(e) = outcome {
                warn!("Window manager rejected `{}`: {}", payload, e);
            }
        }

        Ok(())
    }
}
