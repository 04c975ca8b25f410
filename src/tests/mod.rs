//! Test fixture: a recording platform, helpers to drive [`State`] with events, and randomized
//! operation sequences checked against the invariants.

use std::collections::HashMap;

use awm_config::{Config, Keysym, Modifiers};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::platform::{
    ButtonState, KeyEvent, KeyState, OutputEvent, OutputId, PlatformEvent, PointerEvent,
    SurfacePlatform, WindowEvent,
};
use crate::state::State;
use crate::utils::{Point, Rectangle, ResizeEdge, Size};
use crate::window::WindowId;


pub const KEY_ESC: u32 = 1;
pub const KEY_Q: u32 = 16;
pub const KEY_T: u32 = 20;
pub const KEY_O: u32 = 24;
pub const KEY_P: u32 = 25;
pub const KEY_SPACE: u32 = 57;

/// Evdev keycode of the digit key, `1..=9`.
pub fn digit_keycode(digit: u8) -> u32 {
    u32::from(digit) + 1
}

pub fn digit_keysym(digit: u8) -> Keysym {
    Keysym::new(Keysym::_0.raw() + u32::from(digit))
}

pub const BTN_LEFT: u32 = 0x110;

/// Something done to the platform, in the order the window manager asked for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Geometry(WindowId, Rectangle<i32>),
    Visible(WindowId, bool),
    Raise(WindowId),
    Focus(Option<WindowId>),
    Maximized(WindowId, bool),
    ForwardKey(u32, KeyState),
    Motion(Option<WindowId>, Point<f64>),
    Button(u32, ButtonState),
    Terminate,
    Spawn(Vec<String>),
}

/// A platform that records every call and answers hit tests from what it was told.
#[derive(Debug, Default)]
pub struct TestPlatform {
    calls: Vec<Call>,
    pub outputs: Vec<(OutputId, Rectangle<i32>)>,
    geometry: HashMap<WindowId, Rectangle<i32>>,
    visible: HashMap<WindowId, bool>,
    /// Bottom to top.
    stacking: Vec<WindowId>,
}

impl TestPlatform {
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl SurfacePlatform for TestPlatform {
    fn output_at(&self, point: Point<f64>) -> Option<OutputId> {
        self.outputs
            .iter()
            .find(|(_, area)| area.contains(point))
            .map(|(id, _)| *id)
    }

    fn window_at(&self, point: Point<f64>) -> Option<WindowId> {
        self.stacking.iter().rev().copied().find(|id| {
            self.visible.get(id).copied().unwrap_or(false)
                && self.geometry.get(id).is_some_and(|g| g.contains(point))
        })
    }

    fn set_window_geometry(&mut self, window: WindowId, geometry: Rectangle<i32>) {
        self.geometry.insert(window, geometry);
        if !self.stacking.contains(&window) {
            self.stacking.push(window);
        }
        self.calls.push(Call::Geometry(window, geometry));
    }

    fn set_window_visible(&mut self, window: WindowId, visible: bool) {
        self.visible.insert(window, visible);
        self.calls.push(Call::Visible(window, visible));
    }

    fn raise_to_top(&mut self, window: WindowId) {
        self.stacking.retain(|w| *w != window);
        self.stacking.push(window);
        self.calls.push(Call::Raise(window));
    }

    fn set_keyboard_focus(&mut self, window: Option<WindowId>) {
        self.calls.push(Call::Focus(window));
    }

    fn set_window_maximized(&mut self, window: WindowId, maximized: bool) {
        self.calls.push(Call::Maximized(window, maximized));
    }

    fn forward_key_event(&mut self, event: &KeyEvent) {
        self.calls.push(Call::ForwardKey(event.keycode, event.state));
    }

    fn forward_pointer_motion(&mut self, under: Option<WindowId>, position: Point<f64>) {
        self.calls.push(Call::Motion(under, position));
    }

    fn forward_pointer_button(&mut self, button: u32, state: ButtonState) {
        self.calls.push(Call::Button(button, state));
    }

    fn terminate(&mut self) {
        self.calls.push(Call::Terminate);
    }

    fn spawn(&mut self, command: Vec<String>) {
        self.calls.push(Call::Spawn(command));
    }
}

pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32> {
    Rectangle::new(Point::from((x, y)), Size::from((w, h)))
}

/// The area of test output `n`: 1920x1080 outputs laid out left to right.
pub fn output_area(n: u64) -> Rectangle<i32> {
    rect((n as i32 - 1) * 1920, 0, 1920, 1080)
}

pub struct Fixture {
    pub state: State<TestPlatform>,
    time: u32,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            state: State::new(config, TestPlatform::default()),
            time: 0,
        }
    }

    pub fn with_config_text(text: &str) -> Self {
        Self::with_config(Config::parse("test.kdl", text).unwrap())
    }

    pub fn dispatch(&mut self, event: PlatformEvent) {
        self.state.handle_event(event);
    }

    pub fn add_output(&mut self, n: u64) -> OutputId {
        let id = OutputId(n);
        let area = output_area(n);
        if !self.state.platform.outputs.iter().any(|(o, _)| *o == id) {
            self.state.platform.outputs.push((id, area));
        }
        self.dispatch(PlatformEvent::Output(OutputEvent::Added {
            output: id,
            usable_area: area,
        }));
        id
    }

    pub fn remove_output(&mut self, n: u64) {
        let id = OutputId(n);
        self.state.platform.outputs.retain(|(o, _)| *o != id);
        self.dispatch(PlatformEvent::Output(OutputEvent::Removed { output: id }));
    }

    pub fn map(&mut self, id: u64, w: i32, h: i32) -> WindowId {
        let window = WindowId::new(id);
        self.dispatch(PlatformEvent::Window(WindowEvent::Map {
            window,
            size: Size::from((w, h)),
        }));
        window
    }

    pub fn window(&mut self, event: WindowEvent) {
        self.dispatch(PlatformEvent::Window(event));
    }

    pub fn key(&mut self, keycode: u32, keysym: Keysym, modifiers: Modifiers, state: KeyState) {
        self.time += 1;
        self.dispatch(PlatformEvent::Key(KeyEvent {
            keycode,
            keysyms: vec![keysym],
            modifiers,
            state,
            time_msec: self.time,
        }));
    }

    /// Presses and releases the key.
    pub fn tap(&mut self, keycode: u32, keysym: Keysym, modifiers: Modifiers) {
        self.key(keycode, keysym, modifiers, KeyState::Pressed);
        self.key(keycode, keysym, modifiers, KeyState::Released);
    }

    /// Taps the key with the default compositor modifier held.
    pub fn tap_mod(&mut self, keycode: u32, keysym: Keysym) {
        self.tap(keycode, keysym, Modifiers::ALT);
    }

    pub fn motion(&mut self, x: f64, y: f64) {
        self.dispatch(PlatformEvent::Pointer(PointerEvent::Motion {
            position: Point::from((x, y)),
        }));
    }

    pub fn button(&mut self, state: ButtonState) {
        self.dispatch(PlatformEvent::Pointer(PointerEvent::Button {
            button: BTN_LEFT,
            state,
        }));
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        self.state.platform.take_calls()
    }

    pub fn geometry(&self, window: WindowId) -> Rectangle<i32> {
        self.state.windows.get(window).unwrap().geometry
    }

    /// One line per output and non-empty workspace; `*` marks the visible workspace, `>` the
    /// active window, `!` the focused window.
    pub fn dump(&self) -> String {
        let focused = self.state.windows.focused();
        let mut lines = Vec::new();

        for output in self.state.layout.outputs() {
            lines.push(format!("output {}", output.id().0));
            for ws in output.workspaces() {
                let visible = output.active_workspace_idx() == ws.idx();
                if ws.is_empty() && !visible {
                    continue;
                }

                let windows = ws
                    .windows()
                    .iter()
                    .map(|id| {
                        let mut s = String::new();
                        if ws.active_window() == Some(*id) {
                            s.push('>');
                        }
                        if focused == Some(*id) {
                            s.push('!');
                        }
                        s.push_str(&id.get().to_string());
                        s
                    })
                    .collect::<Vec<_>>()
                    .join(" ");

                let marker = if visible { "*" } else { " " };
                lines.push(format!("  {marker}{}: [{windows}]", ws.idx() + 1));
            }
        }

        lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum TestKey {
    Digit(#[proptest(strategy = "1..=9u8")] u8),
    FocusPrev,
    FocusNext,
    Tile,
    Unbound,
}

impl TestKey {
    fn code_and_sym(self) -> (u32, Keysym) {
        match self {
            TestKey::Digit(d) => (digit_keycode(d), digit_keysym(d)),
            TestKey::FocusPrev => (KEY_O, Keysym::o),
            TestKey::FocusNext => (KEY_P, Keysym::p),
            TestKey::Tile => (KEY_T, Keysym::t),
            TestKey::Unbound => (KEY_Q, Keysym::q),
        }
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    AddOutput(#[proptest(strategy = "1..=3u64")] u64),
    RemoveOutput(#[proptest(strategy = "1..=3u64")] u64),
    ChangeUsableArea {
        #[proptest(strategy = "1..=3u64")]
        output: u64,
        #[proptest(strategy = "0..200i32")]
        reserved: i32,
    },
    Map {
        #[proptest(strategy = "1..=6u64")]
        id: u64,
        #[proptest(strategy = "1..=2000i32")]
        w: i32,
        #[proptest(strategy = "1..=1200i32")]
        h: i32,
    },
    Unmap(#[proptest(strategy = "1..=6u64")] u64),
    Destroy(#[proptest(strategy = "1..=6u64")] u64),
    Commit {
        #[proptest(strategy = "1..=6u64")]
        id: u64,
        #[proptest(strategy = "1..=2000i32")]
        w: i32,
        #[proptest(strategy = "1..=1200i32")]
        h: i32,
    },
    RequestMove(#[proptest(strategy = "1..=6u64")] u64),
    RequestResize {
        #[proptest(strategy = "1..=6u64")]
        id: u64,
        #[proptest(strategy = "0..16u32")]
        edges: u32,
    },
    RequestMaximize {
        #[proptest(strategy = "1..=6u64")]
        id: u64,
        maximized: bool,
    },
    Motion {
        #[proptest(strategy = "-100..6000i32")]
        x: i32,
        #[proptest(strategy = "-100..1200i32")]
        y: i32,
    },
    Button(bool),
    Key {
        key: TestKey,
        with_mod: bool,
        shift: bool,
        pressed: bool,
    },
}

impl Op {
    fn apply(self, f: &mut Fixture) {
        match self {
            Op::AddOutput(n) => {
                f.add_output(n);
            }
            Op::RemoveOutput(n) => f.remove_output(n),
            Op::ChangeUsableArea { output, reserved } => {
                let area = output_area(output);
                let usable = rect(area.loc.x, reserved, area.size.w, area.size.h - reserved);
                f.dispatch(PlatformEvent::Output(OutputEvent::UsableAreaChanged {
                    output: OutputId(output),
                    usable_area: usable,
                }));
            }
            Op::Map { id, w, h } => {
                f.map(id, w, h);
            }
            Op::Unmap(id) => f.window(WindowEvent::Unmap {
                window: WindowId::new(id),
            }),
            Op::Destroy(id) => f.window(WindowEvent::Destroy {
                window: WindowId::new(id),
            }),
            Op::Commit { id, w, h } => f.window(WindowEvent::Commit {
                window: WindowId::new(id),
                size: Size::from((w, h)),
            }),
            Op::RequestMove(id) => f.window(WindowEvent::RequestMove {
                window: WindowId::new(id),
            }),
            Op::RequestResize { id, edges } => f.window(WindowEvent::RequestResize {
                window: WindowId::new(id),
                edges: ResizeEdge::from_bits_truncate(edges),
            }),
            Op::RequestMaximize { id, maximized } => f.window(WindowEvent::RequestMaximize {
                window: WindowId::new(id),
                maximized,
            }),
            Op::Motion { x, y } => f.motion(f64::from(x), f64::from(y)),
            Op::Button(pressed) => f.button(if pressed {
                ButtonState::Pressed
            } else {
                ButtonState::Released
            }),
            Op::Key {
                key,
                with_mod,
                shift,
                pressed,
            } => {
                let (keycode, keysym) = key.code_and_sym();
                let mut modifiers = Modifiers::empty();
                if with_mod {
                    modifiers |= Modifiers::ALT;
                }
                if shift {
                    modifiers |= Modifiers::SHIFT;
                }
                let state = if pressed {
                    KeyState::Pressed
                } else {
                    KeyState::Released
                };
                f.key(keycode, keysym, modifiers, state);
            }
        }
    }
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> Fixture {
    let mut f = Fixture::new();
    for op in ops {
        op.apply(&mut f);
        f.state.verify_invariants();
    }
    f
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_keep_invariants(ops: Vec<Op>) {
        check_ops(ops);
    }
}

#[test]
fn operations_dont_panic_with_grab_across_output_removal() {
    let ops = [
        Op::AddOutput(1),
        Op::AddOutput(2),
        Op::Motion { x: 2000, y: 10 },
        Op::Map { id: 1, w: 100, h: 100 },
        Op::Motion { x: 1950, y: 20 },
        Op::RequestMove(1),
        Op::RemoveOutput(2),
        Op::Motion { x: 10, y: 10 },
        Op::Button(false),
    ];
    let f = check_ops(ops);
    assert!(!f.state.grab.is_active());
}
