use std::collections::HashMap;

use crate::layout::workspace::WorkspaceId;
use crate::platform::SurfacePlatform;
use crate::utils::{Point, Rectangle};

/// Handle of a toplevel, assigned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub geometry: Rectangle<i32>,
    /// Geometry from before the window was maximized.
    pub saved_geometry: Option<Rectangle<i32>>,
    pub hidden: bool,
    pub mapped: bool,
    pub workspace: Option<WorkspaceId>,
}

impl Window {
    pub fn new(id: WindowId, geometry: Rectangle<i32>) -> Self {
        Self {
            id,
            geometry,
            saved_geometry: None,
            hidden: false,
            mapped: false,
            workspace: None,
        }
    }

    /// Whether the window takes part in hit-testing and can hold focus.
    pub fn is_visible(&self) -> bool {
        self.mapped && !self.hidden
    }

    pub fn is_maximized(&self) -> bool {
        self.saved_geometry.is_some()
    }
}

/// All window records, along with the window holding keyboard focus.
///
/// Every mutation that the platform must know about goes through here, so the records and what
/// the platform shows never drift apart.
#[derive(Debug, Default)]
pub struct Windows {
    windows: HashMap<WindowId, Window>,
    focused: Option<WindowId>,
}

impl Windows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn insert(&mut self, window: Window) {
        self.windows.insert(window.id, window);
    }

    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.windows.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> + '_ {
        self.windows.values()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// Raises the window and gives it keyboard focus.
    pub fn focus(&mut self, id: WindowId, platform: &mut impl SurfacePlatform) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        if !window.is_visible() {
            return;
        }

        platform.raise_to_top(id);
        if self.focused != Some(id) {
            trace!("focusing {id:?}");
            self.focused = Some(id);
            platform.set_keyboard_focus(Some(id));
        }
    }

    /// Drops keyboard focus if the window holds it.
    pub fn unfocus(&mut self, id: WindowId, platform: &mut impl SurfacePlatform) {
        if self.focused == Some(id) {
            self.focused = None;
            platform.set_keyboard_focus(None);
        }
    }

    pub fn set_hidden(&mut self, id: WindowId, hidden: bool, platform: &mut impl SurfacePlatform) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.hidden == hidden {
            return;
        }

        window.hidden = hidden;
        if window.mapped {
            platform.set_window_visible(id, !hidden);
        }

        if hidden {
            self.unfocus(id, platform);
        }
    }

    /// Sets the mapped flag. Unmapped windows are never shown.
    pub fn set_mapped(&mut self, id: WindowId, mapped: bool, platform: &mut impl SurfacePlatform) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.mapped == mapped {
            return;
        }

        window.mapped = mapped;
        platform.set_window_visible(id, mapped && !window.hidden);

        if !mapped {
            self.unfocus(id, platform);
        }
    }

    pub fn set_workspace(&mut self, id: WindowId, workspace: Option<WorkspaceId>) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.workspace = workspace;
        }
    }

    pub fn set_geometry(
        &mut self,
        id: WindowId,
        geometry: Rectangle<i32>,
        platform: &mut impl SurfacePlatform,
    ) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.geometry == geometry {
            return;
        }

        window.geometry = geometry;
        platform.set_window_geometry(id, geometry);
    }

    pub fn set_location(
        &mut self,
        id: WindowId,
        loc: Point<i32>,
        platform: &mut impl SurfacePlatform,
    ) {
        let Some(window) = self.windows.get(&id) else {
            return;
        };
        let geometry = Rectangle::new(loc, window.geometry.size);
        self.set_geometry(id, geometry, platform);
    }

    /// Saves the current geometry and fills `area`. Returns `false` if already maximized.
    pub fn maximize(
        &mut self,
        id: WindowId,
        area: Rectangle<i32>,
        platform: &mut impl SurfacePlatform,
    ) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.is_maximized() {
            return false;
        }

        window.saved_geometry = Some(window.geometry);
        self.set_geometry(id, area, platform);
        platform.set_window_maximized(id, true);
        true
    }

    /// Restores the geometry saved by [`Self::maximize`]. Returns `false` if not maximized.
    pub fn unmaximize(&mut self, id: WindowId, platform: &mut impl SurfacePlatform) -> bool {
        let Some(saved) = self
            .windows
            .get_mut(&id)
            .and_then(|window| window.saved_geometry.take())
        else {
            return false;
        };

        self.set_geometry(id, saved, platform);
        platform.set_window_maximized(id, false);
        true
    }

    /// Leaves the maximized state without restoring the saved geometry.
    pub fn drop_maximized(&mut self, id: WindowId, platform: &mut impl SurfacePlatform) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.saved_geometry.take().is_none() {
            return false;
        }

        platform.set_window_maximized(id, false);
        true
    }
}
