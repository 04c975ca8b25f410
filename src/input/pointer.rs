//! Pointer input event handling.

use super::grab::GrabUpdate;
use crate::platform::{ButtonState, PointerEvent, SurfacePlatform};
use crate::state::State;
use crate::utils::Point;
use crate::window::WindowId;

impl<P: SurfacePlatform> State<P> {
    pub(crate) fn on_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Motion { position } => self.on_pointer_motion(position),
            PointerEvent::Button { button, state } => self.on_pointer_button(button, state),
        }
    }

    fn on_pointer_motion(&mut self, position: Point<f64>) {
        let _span = tracy_client::span!("State::on_pointer_motion");

        self.pointer_location = position;

        let min_size = self.min_window_size();
        match self.grab.motion(position, min_size) {
            Some(GrabUpdate::Move { window, loc }) => {
                self.windows.set_location(window, loc, &mut self.platform);
            }
            Some(GrabUpdate::Resize { window, geometry }) => {
                self.windows.set_geometry(window, geometry, &mut self.platform);
            }
            None => {
                let under = self.window_under(position);
                self.platform.forward_pointer_motion(under, position);
            }
        }
    }

    fn on_pointer_button(&mut self, button: u32, state: ButtonState) {
        // The grab consumes every button until the release that ends it.
        if self.grab.is_active() {
            if state == ButtonState::Released {
                trace!("ending interactive grab");
                self.grab.reset();
            }
            return;
        }

        if state == ButtonState::Pressed {
            if let Some(window) = self.window_under(self.pointer_location) {
                self.focus_window(window);
            }
        }

        self.platform.forward_pointer_button(button, state);
    }

    /// The visible window under the point, according to the platform's stacking.
    pub(crate) fn window_under(&self, point: Point<f64>) -> Option<WindowId> {
        self.platform
            .window_at(point)
            .filter(|id| self.windows.get(*id).is_some_and(|w| w.is_visible()))
    }
}
