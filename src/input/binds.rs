//! Keyboard bind resolution.
//!
//! This module matches key events against the configured binds. It is free of State
//! dependencies for testability.

use std::collections::HashMap;

use awm_config::{Action, Config, Keysym, ModKey, Modifiers, ShiftBind};

/// The two bind tiers built from the config.
///
/// Plain binds fire with the compositor modifier alone and are keyed by keysym. Shift binds fire
/// with the compositor modifier plus Shift and are keyed by keycode ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct BindTable {
    mod_key: ModKey,
    plain: HashMap<u32, Action>,
    shift: Vec<ShiftBind>,
}

impl BindTable {
    pub fn from_config(config: &Config) -> Self {
        let _span = tracy_client::span!("BindTable::from_config");

        let mod_key = config.mod_key();
        let mut plain = HashMap::new();

        for bind in &config.binds.0 {
            let mut modifiers = bind.key.modifiers;
            if modifiers.contains(mod_key.to_modifiers()) {
                modifiers.remove(mod_key.to_modifiers());
                modifiers |= Modifiers::COMPOSITOR;
            }

            if modifiers != Modifiers::COMPOSITOR {
                warn!(
                    "ignoring bind for {:?} with {modifiers:?}: \
                     binds must use the compositor modifier alone",
                    bind.key.keysym
                );
                continue;
            }

            if plain.contains_key(&bind.key.keysym.raw()) {
                warn!("ignoring duplicate bind for {:?}", bind.key.keysym);
                continue;
            }

            plain.insert(bind.key.keysym.raw(), bind.action.clone());
        }

        let shift = config.shift_binds.0.clone();
        for bind in &shift {
            if bind.keycodes().is_empty() {
                warn!("shift bind {bind:?} has an empty keycode range");
            }
        }

        Self {
            mod_key,
            plain,
            shift,
        }
    }

    pub fn mod_key(&self) -> ModKey {
        self.mod_key
    }

    /// Whether the configured compositor modifier is held.
    pub fn compositor_mod_held(&self, modifiers: Modifiers) -> bool {
        modifiers.contains(Modifiers::COMPOSITOR) || modifiers.contains(self.mod_key.to_modifiers())
    }

    /// The action for the first of `keysyms` that has a plain bind.
    pub fn find_plain(&self, keysyms: &[Keysym]) -> Option<&Action> {
        keysyms.iter().find_map(|sym| self.plain.get(&sym.raw()))
    }

    /// The action for the first shift bind whose range contains `keycode`.
    pub fn find_shift(&self, keycode: u32) -> Option<Action> {
        self.shift.iter().find_map(|bind| bind.action(keycode))
    }

    pub fn plain_len(&self) -> usize {
        self.plain.len()
    }

    pub fn shift_len(&self) -> usize {
        self.shift.len()
    }
}

impl Default for BindTable {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Binds that can't be changed or removed by the config.
pub fn hardcoded_action(keysyms: &[Keysym]) -> Option<Action> {
    keysyms.contains(&Keysym::Escape).then_some(Action::Quit)
}
