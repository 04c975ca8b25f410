//! Execution of bound actions.

use awm_config::Action;

use crate::platform::{OutputId, SurfacePlatform};
use crate::state::State;
use crate::utils::sh_command;

impl<P: SurfacePlatform> State<P> {
    /// Runs a bound action. Returns `false` if it had nothing to act on, in which case the key
    /// goes to the client instead.
    ///
    /// Everything except quitting needs an output under the pointer.
    pub fn do_action(&mut self, action: Action) -> bool {
        if let Action::Quit = action {
            info!("quitting as requested");
            self.quit();
            return true;
        }

        let Some(output) = self.focused_output() else {
            trace!("no output under the pointer for {action:?}");
            return false;
        };

        match action {
            Action::Spawn(command) => {
                self.platform.spawn(command);
                true
            }
            Action::SpawnSh(command) => {
                self.platform.spawn(sh_command(&command));
                true
            }
            action => self.do_output_action(action, output),
        }
    }

    fn do_output_action(&mut self, action: Action, output: OutputId) -> bool {
        let Some(output) = self.layout.output_mut(output) else {
            return false;
        };

        match action {
            Action::FocusWorkspace(number) => {
                let Some(idx) = usize::from(number).checked_sub(1) else {
                    return false;
                };
                output.switch_workspace(idx, &mut self.windows, &mut self.platform)
            }
            Action::FocusWindowNext => {
                output
                    .active_workspace_mut()
                    .focus_next(&mut self.windows, &mut self.platform);
                true
            }
            Action::FocusWindowPrevious => {
                output
                    .active_workspace_mut()
                    .focus_prev(&mut self.windows, &mut self.platform);
                true
            }
            Action::TileWorkspace => {
                output.tile_active_workspace(&mut self.windows, &mut self.platform);
                true
            }
            Action::MoveWindowToWorkspace(number) => {
                let Some(idx) = usize::from(number)
                    .checked_sub(1)
                    .filter(|idx| *idx < output.workspaces().len())
                else {
                    return false;
                };

                // A missing active window still consumes the shortcut.
                output.move_active_window_to_workspace(idx, &mut self.windows, &mut self.platform);
                true
            }
            Action::Quit | Action::Spawn(_) | Action::SpawnSh(_) => false,
        }
    }
}
