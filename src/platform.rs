//! The boundary between the window manager and the display server plumbing underneath it.
//!
//! Everything protocol-level (surfaces, seats, scene nodes, output modes) lives behind
//! [`SurfacePlatform`]. The window manager consumes [`PlatformEvent`]s and drives the platform
//! through the trait, so it can run against a real backend or a recording test double.

use awm_config::Modifiers;
use xkeysym::Keysym;

use crate::utils::{spawning, Point, Rectangle, ResizeEdge, Size};
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Evdev keycode of the physical key.
    pub keycode: u32,
    /// Keysyms the key produces under the current keyboard state.
    pub keysyms: Vec<Keysym>,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    pub state: KeyState,
    pub time_msec: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A toplevel committed its first buffer.
    Map { window: WindowId, size: Size<i32> },
    Unmap { window: WindowId },
    Destroy { window: WindowId },
    /// A later commit, possibly with a new size.
    Commit { window: WindowId, size: Size<i32> },
    RequestMove { window: WindowId },
    RequestResize { window: WindowId, edges: ResizeEdge },
    RequestMaximize { window: WindowId, maximized: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Absolute pointer position after the motion has been applied.
    Motion { position: Point<f64> },
    Button { button: u32, state: ButtonState },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Added {
        output: OutputId,
        usable_area: Rectangle<i32>,
    },
    Removed {
        output: OutputId,
    },
    UsableAreaChanged {
        output: OutputId,
        usable_area: Rectangle<i32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Window(WindowEvent),
    Pointer(PointerEvent),
    Key(KeyEvent),
    Output(OutputEvent),
}

pub trait SurfacePlatform {
    /// The output whose layout box contains the point.
    fn output_at(&self, point: Point<f64>) -> Option<OutputId>;
    /// The topmost visible window under the point.
    fn window_at(&self, point: Point<f64>) -> Option<WindowId>;

    fn set_window_geometry(&mut self, window: WindowId, geometry: Rectangle<i32>);
    fn set_window_visible(&mut self, window: WindowId, visible: bool);
    fn raise_to_top(&mut self, window: WindowId);
    /// Moves keyboard focus and marks the window activated. `None` clears focus.
    fn set_keyboard_focus(&mut self, window: Option<WindowId>);
    fn set_window_maximized(&mut self, window: WindowId, maximized: bool);

    /// Hands a key event the window manager didn't consume to the focused client.
    fn forward_key_event(&mut self, event: &KeyEvent);
    /// Moves the pointer, entering `under` if it is set.
    fn forward_pointer_motion(&mut self, under: Option<WindowId>, position: Point<f64>);
    fn forward_pointer_button(&mut self, button: u32, state: ButtonState);

    /// Stops the display server loop.
    fn terminate(&mut self);

    fn spawn(&mut self, command: Vec<String>) {
        spawning::spawn(command);
    }
}
