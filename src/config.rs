use clap::Parser;
use std::str::FromStr;

use crate::navigator::NavigationRequest;
use crate::selector::SelectionRequest;

/// Mode argument that leaves the current binding mode alone
pub const KEEP_MODE: &str = "no";

#[derive(Debug, Clone, Parser)]
#[command(name = "i3-nth-window")]
#[command(about = "Focus the n-th window of an i3/sway workspace, or cycle through it", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Config {
    /// Workspace to go to (created if it does not exist)
    pub workspace: String,

    /// Window index (clamped to the window count), `cycle` or `cycle_reverse`
    #[arg(value_parser = SelectionRequest::from_str)]
    pub index: SelectionRequest,

    /// `visible` to skip hidden windows (e.g. inactive tabs), `invisible` to count them
    #[arg(default_value = "invisible")]
    pub visibility: String,

    /// Binding mode to switch to afterwards, or `no` to stay in the current one
    #[arg(default_value = "default")]
    pub to_mode: String,

    /// Ignored trailing arguments
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Print the commands instead of sending them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn parse() -> Self {
        <Config as Parser>::parse()
    }

    /// Mode to switch to afterwards, `None` when the mode should be kept
    pub fn mode(&self) -> Option<&str> {
        if self.to_mode == KEEP_MODE {
            None
        } else {
            Some(&self.to_mode)
        }
    }

    /// Build the navigation request
    pub fn request(&self) -> NavigationRequest {
        NavigationRequest {
            workspace: self.workspace.clone(),
            selection: self.index,
            visibility: self.visibility.clone(),
            mode: self.mode().map(str::to_string),
        }
    }
}
