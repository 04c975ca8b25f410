use crate::layout::workspace::Workspace;
use crate::platform::{OutputId, SurfacePlatform};
use crate::utils::Rectangle;
use crate::window::{WindowId, Windows};

/// A display together with its workspaces, exactly one of which is visible.
#[derive(Debug)]
pub struct Output {
    id: OutputId,
    usable_area: Rectangle<i32>,
    workspaces: Vec<Workspace>,
    active_workspace_idx: usize,
}

impl Output {
    /// Creates the output with `workspace_count` workspaces (at least one), the first visible.
    pub fn new(id: OutputId, usable_area: Rectangle<i32>, workspace_count: usize) -> Self {
        let workspaces = (0..workspace_count.max(1))
            .map(|idx| Workspace::new(id, idx, idx != 0))
            .collect();

        Self {
            id,
            usable_area,
            workspaces,
            active_workspace_idx: 0,
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn usable_area(&self) -> Rectangle<i32> {
        self.usable_area
    }

    pub fn set_usable_area(&mut self, area: Rectangle<i32>) {
        self.usable_area = area;
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn workspaces_mut(&mut self) -> &mut [Workspace] {
        &mut self.workspaces
    }

    pub fn active_workspace_idx(&self) -> usize {
        self.active_workspace_idx
    }

    pub fn active_workspace(&self) -> &Workspace {
        &self.workspaces[self.active_workspace_idx]
    }

    pub fn active_workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspaces[self.active_workspace_idx]
    }

    pub fn into_workspaces(self) -> Vec<Workspace> {
        self.workspaces
    }

    /// Shows the workspace at `idx`, hiding the current one.
    ///
    /// Switching to the workspace that is already visible re-focuses it.
    pub fn switch_workspace(
        &mut self,
        idx: usize,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        if idx >= self.workspaces.len() {
            return false;
        }

        debug!(
            "switching {:?} from workspace {} to {idx}",
            self.id, self.active_workspace_idx
        );

        if idx != self.active_workspace_idx {
            self.workspaces[self.active_workspace_idx].set_hidden(true, windows, platform);
            self.active_workspace_idx = idx;
        }
        self.workspaces[idx].focus(windows, platform);

        true
    }

    /// Sends a window on the visible workspace to the workspace at `target_idx`.
    pub fn move_window_to_workspace(
        &mut self,
        window: WindowId,
        target_idx: usize,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        let source_idx = self.active_workspace_idx;
        if target_idx == source_idx || target_idx >= self.workspaces.len() {
            return false;
        }

        let (source, target) = pair_mut(&mut self.workspaces, source_idx, target_idx);
        source.move_to(window, target, windows, platform)
    }

    /// Sends the active window of the visible workspace to the workspace at `target_idx`.
    pub fn move_active_window_to_workspace(
        &mut self,
        target_idx: usize,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        let Some(window) = self.active_workspace().active_window() else {
            return false;
        };
        self.move_window_to_workspace(window, target_idx, windows, platform)
    }

    pub fn tile_active_workspace(&self, windows: &mut Windows, platform: &mut impl SurfacePlatform) {
        self.active_workspace().tile(self.usable_area, windows, platform);
    }

    #[cfg(test)]
    pub(super) fn verify_invariants(&self, windows: &Windows) {
        assert!(!self.workspaces.is_empty(), "output must have workspaces");
        assert!(self.active_workspace_idx < self.workspaces.len());

        for (idx, ws) in self.workspaces.iter().enumerate() {
            assert_eq!(ws.idx(), idx);
            assert_eq!(ws.output(), self.id);
            assert_eq!(
                ws.is_hidden(),
                idx != self.active_workspace_idx,
                "exactly the active workspace must be visible"
            );
            ws.verify_invariants(windows);
        }
    }
}

fn pair_mut<T>(slice: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b);

    if a < b {
        let (head, tail) = slice.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = slice.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::TestPlatform;
    use crate::utils::{Point, Size};
    use crate::window::Window;

    fn setup() -> (Output, Windows, TestPlatform, Vec<WindowId>) {
        let mut platform = TestPlatform::default();
        let mut windows = Windows::new();
        let area = Rectangle::new(Point::from((0, 0)), Size::from((1920, 1080)));
        let mut output = Output::new(OutputId(1), area, 3);

        let ids: Vec<_> = (1..=2).map(WindowId::new).collect();
        for id in &ids {
            windows.insert(Window::new(*id, area));
            windows.set_mapped(*id, true, &mut platform);
            output
                .active_workspace_mut()
                .add_window(*id, &mut windows, &mut platform);
        }
        (output, windows, platform, ids)
    }

    #[test]
    fn at_least_one_workspace() {
        let output = Output::new(OutputId(0), Rectangle::default(), 0);
        assert_eq!(output.workspaces().len(), 1);
        output.verify_invariants(&Windows::new());
    }

    #[test]
    fn switch_hides_previous_workspace() {
        let (mut output, mut windows, mut platform, ids) = setup();

        assert!(output.switch_workspace(2, &mut windows, &mut platform));
        assert!(windows.iter().all(|w| w.hidden));
        assert_eq!(windows.focused(), None);
        output.verify_invariants(&windows);

        assert!(output.switch_workspace(0, &mut windows, &mut platform));
        assert!(windows.iter().all(|w| !w.hidden));
        assert_eq!(windows.focused(), Some(ids[1]));
        output.verify_invariants(&windows);

        assert!(!output.switch_workspace(3, &mut windows, &mut platform));
        assert_eq!(output.active_workspace_idx(), 0);
    }

    #[test]
    fn move_active_window() {
        let (mut output, mut windows, mut platform, ids) = setup();

        assert!(!output.move_active_window_to_workspace(0, &mut windows, &mut platform));
        assert!(!output.move_active_window_to_workspace(3, &mut windows, &mut platform));

        assert!(output.move_active_window_to_workspace(1, &mut windows, &mut platform));
        assert_eq!(output.workspaces()[1].windows(), [ids[1]]);
        assert!(windows.get(ids[1]).unwrap().hidden);
        assert_eq!(output.active_workspace().active_window(), None);

        // Nothing is active on the source workspace now.
        assert!(!output.move_active_window_to_workspace(2, &mut windows, &mut platform));
        output.verify_invariants(&windows);
    }

    #[test]
    fn pair_mut_either_order() {
        let mut v = [1, 2, 3];
        let (a, b) = pair_mut(&mut v, 2, 0);
        std::mem::swap(a, b);
        assert_eq!(v, [3, 2, 1]);
    }
}
