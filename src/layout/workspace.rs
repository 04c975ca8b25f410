use std::sync::atomic::{AtomicU64, Ordering};

use crate::platform::{OutputId, SurfacePlatform};
use crate::utils::{Point, Rectangle, Size};
use crate::window::{WindowId, Windows};

static WORKSPACE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkspaceId(u64);

impl WorkspaceId {
    fn next() -> Self {
        Self(WORKSPACE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A set of windows shown and hidden as a unit on one output.
///
/// The window order is insertion order, and it doubles as the focus chain: next and previous
/// cycle through it, and the most recently inserted window is the one focused when the workspace
/// is shown.
#[derive(Debug)]
pub struct Workspace {
    id: WorkspaceId,
    output: OutputId,
    idx: usize,
    windows: Vec<WindowId>,
    /// Always a member of `windows` when set.
    active_window: Option<WindowId>,
    hidden: bool,
}

impl Workspace {
    pub fn new(output: OutputId, idx: usize, hidden: bool) -> Self {
        Self {
            id: WorkspaceId::next(),
            output,
            idx,
            windows: Vec::new(),
            active_window: None,
            hidden,
        }
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active_window
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.windows.contains(&window)
    }

    /// Appends the window and makes it active.
    ///
    /// Does nothing and returns `false` if the window belongs to a workspace already. On a hidden
    /// workspace the window is hidden along with it and doesn't get keyboard focus.
    pub fn add_window(
        &mut self,
        window: WindowId,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        match windows.get(window) {
            Some(record) if record.workspace.is_none() => (),
            _ => return false,
        }

        self.windows.push(window);
        self.active_window = Some(window);
        windows.set_workspace(window, Some(self.id));
        windows.set_hidden(window, self.hidden, platform);

        if !self.hidden {
            windows.focus(window, platform);
        }

        true
    }

    /// Removes the window. If it was active, no window is active afterwards.
    pub fn remove_window(&mut self, window: WindowId, windows: &mut Windows) -> bool {
        let Some(idx) = self.windows.iter().position(|w| *w == window) else {
            return false;
        };

        self.windows.remove(idx);
        if self.active_window == Some(window) {
            self.active_window = None;
        }
        windows.set_workspace(window, None);

        true
    }

    /// Moves a member window to `target`, which takes over as its focus chain.
    pub fn move_to(
        &mut self,
        window: WindowId,
        target: &mut Workspace,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        if target.id == self.id || !self.contains(window) {
            return false;
        }

        self.remove_window(window, windows);
        target.add_window(window, windows, platform)
    }

    /// Moves the window at position `n` in insertion order to `target`.
    pub fn move_nth_to(
        &mut self,
        n: usize,
        target: &mut Workspace,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        let Some(window) = self.windows.get(n).copied() else {
            return false;
        };
        self.move_to(window, target, windows, platform)
    }

    /// Makes a member window active and gives it focus.
    pub fn activate_window(
        &mut self,
        window: WindowId,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        if !self.contains(window) {
            return false;
        }

        self.active_window = Some(window);
        windows.focus(window, platform);
        true
    }

    pub fn focus_next(&mut self, windows: &mut Windows, platform: &mut impl SurfacePlatform) {
        let len = self.windows.len();
        if len < 2 {
            return;
        }

        let idx = match self.active_idx() {
            Some(idx) => (idx + 1) % len,
            None => 0,
        };
        self.activate_idx(idx, windows, platform);
    }

    pub fn focus_prev(&mut self, windows: &mut Windows, platform: &mut impl SurfacePlatform) {
        let len = self.windows.len();
        if len < 2 {
            return;
        }

        let idx = match self.active_idx() {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        };
        self.activate_idx(idx, windows, platform);
    }

    /// Shows the workspace and focuses its most recently inserted window.
    pub fn focus(&mut self, windows: &mut Windows, platform: &mut impl SurfacePlatform) {
        self.set_hidden(false, windows, platform);

        self.active_window = self.windows.last().copied();
        if let Some(window) = self.active_window {
            windows.focus(window, platform);
        }
    }

    pub fn set_hidden(
        &mut self,
        hidden: bool,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) {
        self.hidden = hidden;
        for window in &self.windows {
            windows.set_hidden(*window, hidden, platform);
        }
    }

    /// Arranges the members in a grid filling `area`, in insertion order.
    ///
    /// Maximized windows leave the maximized state. Windows placed later are free to move again.
    pub fn tile(
        &self,
        area: Rectangle<i32>,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) {
        let _span = tracy_client::span!("Workspace::tile");

        let cells = tile_layout(self.windows.len(), area);
        for (window, cell) in self.windows.iter().zip(cells) {
            if windows.get(*window).is_some_and(|w| w.is_maximized()) {
                windows.unmaximize(*window, platform);
            }
            windows.set_geometry(*window, cell, platform);
        }
    }

    fn active_idx(&self) -> Option<usize> {
        let active = self.active_window?;
        self.windows.iter().position(|w| *w == active)
    }

    fn activate_idx(
        &mut self,
        idx: usize,
        windows: &mut Windows,
        platform: &mut impl SurfacePlatform,
    ) {
        let window = self.windows[idx];
        self.active_window = Some(window);
        windows.focus(window, platform);
    }

    #[cfg(test)]
    pub(super) fn verify_invariants(&self, windows: &Windows) {
        if let Some(active) = self.active_window {
            assert!(self.contains(active), "active window must be a member");
        }

        for (i, id) in self.windows.iter().enumerate() {
            assert!(
                !self.windows[i + 1..].contains(id),
                "window must appear in the workspace once"
            );

            let window = windows
                .get(*id)
                .expect("member window must have a record");
            assert_eq!(window.workspace, Some(self.id));
            assert_eq!(window.hidden, self.hidden);
        }
    }
}

/// Grid cells for `count` windows: `round(sqrt(count))` columns, as many rows as needed, cell
/// sizes truncated, filled row by row.
pub fn tile_layout(count: usize, area: Rectangle<i32>) -> Vec<Rectangle<i32>> {
    if count == 0 {
        return Vec::new();
    }

    let cols = ((count as f64).sqrt().round() as usize).max(1);
    let rows = count.div_ceil(cols);

    let w = area.size.w / cols as i32;
    let h = area.size.h / rows as i32;

    (0..count)
        .map(|i| {
            let col = (i % cols) as i32;
            let row = (i / cols) as i32;
            let loc = area.loc + Point::from((col * w, row * h));
            Rectangle::new(loc, Size::from((w, h)))
        })
        .collect()
}
