//! Window layout logic.
//!
//! Every output carries a fixed number of workspaces, one of them visible at a time. A window
//! belongs to at most one workspace, and it is shown exactly when that workspace is the visible
//! one on its output. Windows don't move between outputs on their own, except when their output
//! disconnects: its workspaces are then merged into the workspaces with the same index on the
//! first remaining output.
//!
//! The layout only tracks membership and ordering. Window records themselves live in
//! [`Windows`], and every visibility or focus change goes through it so the platform stays in
//! sync.

use crate::platform::{OutputId, SurfacePlatform};
use crate::utils::Rectangle;
use crate::window::{WindowId, Windows};

pub mod output;
pub mod workspace;

pub use output::Output;
pub use workspace::{Workspace, WorkspaceId};

#[derive(Debug)]
pub struct Layout {
    /// Outputs in connection order. The first one receives windows from disconnected outputs.
    outputs: Vec<Output>,
    workspaces_per_output: usize,
}

impl Layout {
    pub fn new(workspaces_per_output: usize) -> Self {
        Self {
            outputs: Vec::new(),
            workspaces_per_output: workspaces_per_output.max(1),
        }
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id() == id)
    }

    pub fn output_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.id() == id)
    }

    pub fn first_output(&self) -> Option<&Output> {
        self.outputs.first()
    }

    /// Applies to outputs connected from now on.
    pub fn set_workspaces_per_output(&mut self, count: usize) {
        self.workspaces_per_output = count.max(1);
    }

    /// Adds an output with a fresh set of workspaces.
    ///
    /// The first output to connect adopts mapped windows that had nowhere to go, in the order
    /// they were created.
    pub fn add_output(
        &mut self,
        id: OutputId,
        usable_area: Rectangle<i32>,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) {
        if let Some(output) = self.output_mut(id) {
            warn!("{id:?} was added twice");
            output.set_usable_area(usable_area);
            return;
        }

        debug!("adding {id:?} with {} workspaces", self.workspaces_per_output);

        let mut output = Output::new(id, usable_area, self.workspaces_per_output);

        if self.outputs.is_empty() {
            let mut homeless: Vec<_> = windows
                .iter()
                .filter(|w| w.mapped && w.workspace.is_none())
                .map(|w| w.id)
                .collect();
            homeless.sort_unstable();

            let ws = output.active_workspace_mut();
            for window in homeless {
                ws.add_window(window, windows, platform);
            }
        }

        self.outputs.push(output);
    }

    /// Removes the output, moving its windows to the first remaining output.
    ///
    /// Each workspace's windows go to the workspace with the same index, or to the visible
    /// workspace when there is no such index. Returns the windows that were left without a
    /// workspace because no output remains.
    pub fn remove_output(
        &mut self,
        id: OutputId,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> Vec<WindowId> {
        let Some(idx) = self.outputs.iter().position(|o| o.id() == id) else {
            warn!("removing unknown {id:?}");
            return Vec::new();
        };

        debug!("removing {id:?}");

        let removed = self.outputs.remove(idx);
        let mut orphans = Vec::new();

        for mut ws in removed.into_workspaces() {
            let members = ws.windows().to_vec();

            for window in members {
                ws.remove_window(window, windows);

                match self.outputs.first_mut() {
                    Some(target) => {
                        let target_idx = if ws.idx() < target.workspaces().len() {
                            ws.idx()
                        } else {
                            target.active_workspace_idx()
                        };
                        target.workspaces_mut()[target_idx].add_window(window, windows, platform);
                    }
                    None => orphans.push(window),
                }
            }
        }

        orphans
    }

    pub fn set_usable_area(&mut self, id: OutputId, area: Rectangle<i32>) -> bool {
        match self.output_mut(id) {
            Some(output) => {
                output.set_usable_area(area);
                true
            }
            None => false,
        }
    }

    /// Adds the window to the visible workspace of `output`, or of the first output if `None`
    /// or unknown.
    pub fn add_window(
        &mut self,
        window: WindowId,
        output: Option<OutputId>,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        let idx = output
            .and_then(|id| self.outputs.iter().position(|o| o.id() == id))
            .unwrap_or(0);

        let Some(output) = self.outputs.get_mut(idx) else {
            return false;
        };
        output
            .active_workspace_mut()
            .add_window(window, windows, platform)
    }

    pub fn remove_window(&mut self, window: WindowId, windows: &mut Windows) -> bool {
        match self.workspace_for_window_mut(window) {
            Some(ws) => ws.remove_window(window, windows),
            None => false,
        }
    }

    pub fn workspace_for_window_mut(&mut self, window: WindowId) -> Option<&mut Workspace> {
        self.outputs
            .iter_mut()
            .flat_map(|o| o.workspaces_mut())
            .find(|ws| ws.contains(window))
    }

    #[cfg(test)]
    pub fn verify_invariants(&self, windows: &Windows) {
        use std::collections::HashSet;

        let mut seen_outputs = HashSet::new();
        let mut seen_windows = HashSet::new();

        for output in &self.outputs {
            assert!(seen_outputs.insert(output.id()), "output ids must be unique");
            output.verify_invariants(windows);

            for ws in output.workspaces() {
                for window in ws.windows() {
                    assert!(
                        seen_windows.insert(*window),
                        "window must belong to at most one workspace"
                    );
                }
            }
        }

        for window in windows.iter() {
            if window.workspace.is_some() {
                assert!(
                    seen_windows.contains(&window.id),
                    "window record points at a workspace that doesn't have it"
                );
                assert!(window.mapped, "unmapped windows must not be in a workspace");
            } else {
                assert!(
                    !window.is_visible(),
                    "windows outside any workspace must be invisible"
                );
            }
        }

        if let Some(focused) = windows.focused() {
            let window = windows.get(focused).expect("focused window must exist");
            assert!(window.is_visible(), "focused window must be visible");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::TestPlatform;
    use crate::utils::{Point, Size};
    use crate::window::Window;

    fn area(x: i32) -> Rectangle<i32> {
        Rectangle::new(Point::from((x, 0)), Size::from((1920, 1080)))
    }

    fn map(windows: &mut Windows, id: u64, platform: &mut TestPlatform) -> WindowId {
        let id = WindowId::new(id);
        windows.insert(Window::new(id, area(0)));
        windows.set_mapped(id, true, platform);
        id
    }

    #[test]
    fn first_output_adopts_homeless_windows() {
        let mut platform = TestPlatform::default();
        let mut windows = Windows::new();
        let mut layout = Layout::new(3);

        let b = map(&mut windows, 2, &mut platform);
        let a = map(&mut windows, 1, &mut platform);
        assert!(!layout.add_window(a, None, &mut windows, &mut platform));
        windows.set_hidden(a, true, &mut platform);
        windows.set_hidden(b, true, &mut platform);
        layout.verify_invariants(&windows);

        layout.add_output(OutputId(1), area(0), &mut windows, &mut platform);
        let ws = layout.output(OutputId(1)).unwrap().active_workspace();
        assert_eq!(ws.windows(), [a, b]);
        assert_eq!(windows.focused(), Some(b));
        layout.verify_invariants(&windows);
    }

    #[test]
    fn removed_output_merges_by_index() {
        let mut platform = TestPlatform::default();
        let mut windows = Windows::new();
        let mut layout = Layout::new(3);

        layout.add_output(OutputId(1), area(0), &mut windows, &mut platform);
        layout.add_output(OutputId(2), area(1920), &mut windows, &mut platform);

        let a = map(&mut windows, 1, &mut platform);
        let b = map(&mut windows, 2, &mut platform);
        assert!(layout.add_window(a, Some(OutputId(2)), &mut windows, &mut platform));
        assert!(layout.add_window(b, Some(OutputId(2)), &mut windows, &mut platform));

        let second = layout.output_mut(OutputId(2)).unwrap();
        assert!(second.move_window_to_workspace(a, 2, &mut windows, &mut platform));
        layout.verify_invariants(&windows);

        let orphans = layout.remove_output(OutputId(2), &mut windows, &mut platform);
        assert!(orphans.is_empty());

        let first = layout.output(OutputId(1)).unwrap();
        assert_eq!(first.workspaces()[0].windows(), [b]);
        assert_eq!(first.workspaces()[2].windows(), [a]);
        assert!(windows.get(a).unwrap().hidden);
        assert!(!windows.get(b).unwrap().hidden);
        layout.verify_invariants(&windows);
    }

    #[test]
    fn removing_last_output_orphans_windows() {
        let mut platform = TestPlatform::default();
        let mut windows = Windows::new();
        let mut layout = Layout::new(2);

        layout.add_output(OutputId(1), area(0), &mut windows, &mut platform);
        let a = map(&mut windows, 1, &mut platform);
        layout.add_window(a, None, &mut windows, &mut platform);

        let orphans = layout.remove_output(OutputId(1), &mut windows, &mut platform);
        assert_eq!(orphans, [a]);
        assert!(layout.outputs().is_empty());
        assert_eq!(windows.get(a).unwrap().workspace, None);
        assert!(layout.remove_output(OutputId(1), &mut windows, &mut platform).is_empty());
    }
}
