//! Configuration of the awm window-management core.
//!
//! The config is a KDL document. Every section is optional: missing sections fall back to their
//! defaults, and [`Config::default()`] is the bundled `resources/default-config.kdl`.

#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::path::Path;
use std::str::FromStr;

use miette::{miette, Context, IntoDiagnostic};

pub mod binds;

pub use crate::binds::*;

/// Workspaces created for every output unless the config says otherwise.
pub const DEFAULT_WORKSPACES_PER_OUTPUT: u8 = 9;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub input: Input,
    #[knuffel(child, default)]
    pub layout: Layout,
    #[knuffel(child, default)]
    pub environment: Environment,
    #[knuffel(children(name = "spawn-sh-at-startup"))]
    pub spawn_sh_at_startup: Vec<SpawnShAtStartup>,
    #[knuffel(children(name = "spawn-sh-at-exit"))]
    pub spawn_sh_at_exit: Vec<SpawnShAtExit>,
    #[knuffel(child, default)]
    pub binds: Binds,
    #[knuffel(child, default)]
    pub shift_binds: ShiftBinds,
}

#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    #[knuffel(child, unwrap(argument, str))]
    pub mod_key: Option<ModKey>,
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    #[knuffel(child, unwrap(argument), default = DEFAULT_WORKSPACES_PER_OUTPUT)]
    pub workspaces_per_output: u8,
    /// Smallest width and height an interactive resize can shrink a window to.
    #[knuffel(child, unwrap(argument), default = 1)]
    pub min_window_size: u16,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            workspaces_per_output: DEFAULT_WORKSPACES_PER_OUTPUT,
            min_window_size: 1,
        }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq, Eq)]
pub struct Environment(#[knuffel(children)] pub Vec<EnvironmentVariable>);

/// Variable set for spawned processes; a `null` value unsets it.
#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentVariable {
    #[knuffel(node_name)]
    pub name: String,
    #[knuffel(argument)]
    pub value: Option<String>,
}

#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SpawnShAtStartup {
    #[knuffel(argument)]
    pub command: String,
}

#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SpawnShAtExit {
    #[knuffel(argument)]
    pub command: String,
}

/// Modifier that turns a key press into a compositor shortcut.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ModKey {
    Ctrl,
    Shift,
    #[default]
    Alt,
    Super,
    IsoLevel3Shift,
    IsoLevel5Shift,
}

impl ModKey {
    pub fn to_modifiers(&self) -> Modifiers {
        match self {
            ModKey::Ctrl => Modifiers::CTRL,
            ModKey::Shift => Modifiers::SHIFT,
            ModKey::Alt => Modifiers::ALT,
            ModKey::Super => Modifiers::SUPER,
            ModKey::IsoLevel3Shift => Modifiers::ISO_LEVEL3_SHIFT,
            ModKey::IsoLevel5Shift => Modifiers::ISO_LEVEL5_SHIFT,
        }
    }
}

impl FromStr for ModKey {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.to_ascii_lowercase() {
            "ctrl" | "control" => Ok(Self::Ctrl),
            "shift" => Ok(Self::Shift),
            "alt" => Ok(Self::Alt),
            "super" | "win" => Ok(Self::Super),
            "iso_level3_shift" | "mod5" => Ok(Self::IsoLevel3Shift),
            "iso_level5_shift" | "mod3" => Ok(Self::IsoLevel5Shift),
            _ => Err(miette!("invalid Mod key: {s}")),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }

    pub fn mod_key(&self) -> ModKey {
        self.input.mod_key.unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}
