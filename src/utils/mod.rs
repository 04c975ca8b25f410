use std::path::PathBuf;

use bitflags::bitflags;
use directories::ProjectDirs;

pub mod geometry;
pub mod spawning;
pub mod watcher;

pub use geometry::{Point, Rectangle, Size};

bitflags! {
    /// Window edges affected by an interactive resize.
    ///
    /// The bit values match the xdg-shell resize edge mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResizeEdge: u32 {
        const TOP          = 0b0001;
        const BOTTOM       = 0b0010;
        const LEFT         = 0b0100;
        const RIGHT        = 0b1000;

        const TOP_LEFT     = Self::TOP.bits() | Self::LEFT.bits();
        const BOTTOM_LEFT  = Self::BOTTOM.bits() | Self::LEFT.bits();

        const TOP_RIGHT    = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();

        const LEFT_RIGHT   = Self::LEFT.bits() | Self::RIGHT.bits();
        const TOP_BOTTOM   = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

/// `$XDG_CONFIG_HOME/awm/config.kdl`, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "awm")?;
    Some(dirs.config_dir().join("config.kdl"))
}

/// Wraps a shell command line into an argv for [`spawning::spawn`].
pub fn sh_command(command: &str) -> Vec<String> {
    vec![String::from("sh"), String::from("-c"), command.to_owned()]
}
