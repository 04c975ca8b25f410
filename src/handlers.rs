//! Toplevel lifecycle and client requests.

use crate::platform::{SurfacePlatform, WindowEvent};
use crate::state::State;
use crate::utils::{Rectangle, ResizeEdge, Size};
use crate::window::{Window, WindowId};

impl<P: SurfacePlatform> State<P> {
    pub(crate) fn on_window(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Map { window, size } => self.map_window(window, size),
            WindowEvent::Unmap { window } => self.unmap_window(window),
            WindowEvent::Destroy { window } => self.destroy_window(window),
            WindowEvent::Commit { window, size } => self.commit_window(window, size),
            WindowEvent::RequestMove { window } => {
                self.request_move(window);
            }
            WindowEvent::RequestResize { window, edges } => {
                self.request_resize(window, edges);
            }
            WindowEvent::RequestMaximize { window, maximized } => {
                self.request_maximize(window, maximized);
            }
        }
    }

    /// Puts a window on the visible workspace of the output under the pointer.
    fn map_window(&mut self, window: WindowId, size: Size<i32>) {
        if self.windows.get(window).is_some_and(|w| w.mapped) {
            warn!("{window:?} mapped twice");
            return;
        }

        let output = self
            .focused_output()
            .or_else(|| self.layout.first_output().map(|o| o.id()));

        if self.windows.get(window).is_none() {
            let origin = output
                .and_then(|id| self.layout.output(id))
                .map(|o| o.usable_area().loc)
                .unwrap_or_default();
            let geometry = Rectangle::new(origin, size);

            self.windows.insert(Window::new(window, geometry));
            self.platform.set_window_geometry(window, geometry);
        } else {
            self.commit_window(window, size);
        }

        debug!("mapping {window:?} on {output:?}");

        // Without outputs the window waits hidden until the first one connects.
        if output.is_none() {
            self.windows.set_hidden(window, true, &mut self.platform);
        }
        self.windows.set_mapped(window, true, &mut self.platform);

        self.layout
            .add_window(window, output, &mut self.windows, &mut self.platform);
    }

    /// Takes the window out of its workspace. The record stays until destroy.
    fn unmap_window(&mut self, window: WindowId) {
        self.grab.window_gone(window);

        if !self.windows.get(window).is_some_and(|w| w.mapped) {
            return;
        }

        debug!("unmapping {window:?}");
        self.layout.remove_window(window, &mut self.windows);
        self.windows.set_mapped(window, false, &mut self.platform);
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.grab.window_gone(window);

        if self.windows.get(window).is_none() {
            return;
        }

        self.unmap_window(window);
        self.windows.unfocus(window, &mut self.platform);
        self.windows.remove(window);
        debug!("destroyed {window:?}");
    }

    fn commit_window(&mut self, window: WindowId, size: Size<i32>) {
        let Some(record) = self.windows.get(window) else {
            return;
        };
        if record.geometry.size == size {
            return;
        }

        // The record follows the client's size without echoing it back.
        if let Some(record) = self.windows.get_mut(window) {
            record.geometry.size = size;
        }
    }

    /// Starts an interactive move of a visible window. A maximized window stops being maximized
    /// where it is.
    pub fn request_move(&mut self, window: WindowId) -> bool {
        let Some(geometry) = self.grab_target(window) else {
            return false;
        };
        if !self.grab.begin_move(window, self.pointer_location, geometry) {
            return false;
        }

        debug!("starting interactive move of {window:?}");
        self.windows.drop_maximized(window, &mut self.platform);
        self.focus_window(window);
        true
    }

    /// Starts an interactive resize of a visible window.
    pub fn request_resize(&mut self, window: WindowId, edges: ResizeEdge) -> bool {
        let Some(geometry) = self.grab_target(window) else {
            return false;
        };
        if !self
            .grab
            .begin_resize(window, self.pointer_location, geometry, edges)
        {
            return false;
        }

        debug!("starting interactive resize of {window:?} by {edges:?}");
        self.windows.drop_maximized(window, &mut self.platform);
        self.focus_window(window);
        true
    }

    /// Maximizes to the output under the window's center, or restores the saved geometry.
    pub fn request_maximize(&mut self, window: WindowId, maximized: bool) -> bool {
        let Some(record) = self.windows.get(window) else {
            return false;
        };
        if !record.mapped {
            return false;
        }

        if !maximized {
            return self.windows.unmaximize(window, &mut self.platform);
        }

        let center = record.geometry.center();
        let area = self
            .platform
            .output_at(center)
            .and_then(|id| self.layout.output(id))
            .or_else(|| self.layout.first_output())
            .map(|o| o.usable_area());
        let Some(area) = area else {
            return false;
        };

        self.windows.maximize(window, area, &mut self.platform)
    }

    fn grab_target(&self, window: WindowId) -> Option<Rectangle<i32>> {
        self.windows
            .get(window)
            .filter(|w| w.is_visible())
            .map(|w| w.geometry)
    }
}
