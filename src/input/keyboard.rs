//! Keyboard input event handling.

use awm_config::{Keysym, Modifiers};

use super::binds::hardcoded_action;
use crate::platform::{KeyEvent, KeyState, SurfacePlatform};
use crate::state::State;

impl<P: SurfacePlatform> State<P> {
    pub(crate) fn on_keyboard(&mut self, event: KeyEvent) {
        let _span = tracy_client::span!("State::on_keyboard");

        let intercepted = match event.state {
            KeyState::Pressed => {
                let intercepted = self.intercept_key(&event);
                if intercepted {
                    self.suppressed_keys.insert(event.keycode);
                }
                intercepted
            }
            // Releases are only held back for keys whose press was a shortcut.
            KeyState::Released => self.suppressed_keys.remove(&event.keycode),
        };

        if !intercepted && !self.stopped {
            self.platform.forward_key_event(&event);
        }
    }

    /// Runs the shortcut for a key press, if there is one. Returns whether the press was consumed.
    fn intercept_key(&mut self, event: &KeyEvent) -> bool {
        if !self.binds.compositor_mod_held(event.modifiers) {
            return false;
        }

        if let Some(action) = hardcoded_action(&event.keysyms) {
            return self.do_action(action);
        }

        if event.modifiers.contains(Modifiers::SHIFT) {
            self.handle_shift_keybinding(event.keycode)
        } else {
            self.handle_keybinding(&event.keysyms)
        }
    }

    /// Runs the plain-tier bind for the first of `keysyms` that has one.
    pub fn handle_keybinding(&mut self, keysyms: &[Keysym]) -> bool {
        let Some(action) = self.binds.find_plain(keysyms).cloned() else {
            return false;
        };
        trace!("plain bind for {keysyms:?}: {action:?}");
        self.do_action(action)
    }

    /// Runs the shift-tier bind covering the physical `keycode`.
    pub fn handle_shift_keybinding(&mut self, keycode: u32) -> bool {
        let Some(action) = self.binds.find_shift(keycode) else {
            return false;
        };
        trace!("shift bind for keycode {keycode}: {action:?}");
        self.do_action(action)
    }
}
