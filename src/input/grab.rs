//! Interactive move and resize driven by the pointer.
//!
//! The grab holds the window by id only. Whoever unmaps or destroys a window must call
//! [`InteractiveGrab::window_gone`] before doing anything else with it.

use crate::utils::{Point, Rectangle, ResizeEdge, Size};
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabMode {
    Idle,
    Moving,
    Resizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractiveGrab {
    #[default]
    Idle,
    Moving {
        window: WindowId,
        /// Pointer position relative to the window origin.
        anchor: Point<f64>,
    },
    Resizing {
        window: WindowId,
        /// Pointer position relative to the grabbed border.
        anchor: Point<f64>,
        edges: ResizeEdge,
        /// Window geometry when the grab started.
        initial: Rectangle<i32>,
    },
}

/// What a pointer motion does to the grabbed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabUpdate {
    Move {
        window: WindowId,
        loc: Point<i32>,
    },
    Resize {
        window: WindowId,
        geometry: Rectangle<i32>,
    },
}

impl InteractiveGrab {
    pub fn mode(&self) -> GrabMode {
        match self {
            InteractiveGrab::Idle => GrabMode::Idle,
            InteractiveGrab::Moving { .. } => GrabMode::Moving,
            InteractiveGrab::Resizing { .. } => GrabMode::Resizing,
        }
    }

    pub fn is_active(&self) -> bool {
        self.window().is_some()
    }

    pub fn window(&self) -> Option<WindowId> {
        match *self {
            InteractiveGrab::Idle => None,
            InteractiveGrab::Moving { window, .. } | InteractiveGrab::Resizing { window, .. } => {
                Some(window)
            }
        }
    }

    /// Starts moving the window. Fails if a grab is already active.
    pub fn begin_move(
        &mut self,
        window: WindowId,
        pointer: Point<f64>,
        geometry: Rectangle<i32>,
    ) -> bool {
        if self.is_active() {
            return false;
        }

        *self = InteractiveGrab::Moving {
            window,
            anchor: pointer - geometry.loc.to_f64(),
        };
        true
    }

    /// Starts resizing the window by `edges`. Fails if a grab is already active or `edges` is
    /// empty.
    pub fn begin_resize(
        &mut self,
        window: WindowId,
        pointer: Point<f64>,
        geometry: Rectangle<i32>,
        edges: ResizeEdge,
    ) -> bool {
        if self.is_active() || edges.is_empty() {
            return false;
        }

        let border_x = if edges.contains(ResizeEdge::RIGHT) {
            geometry.right()
        } else {
            geometry.loc.x
        };
        let border_y = if edges.contains(ResizeEdge::BOTTOM) {
            geometry.bottom()
        } else {
            geometry.loc.y
        };

        *self = InteractiveGrab::Resizing {
            window,
            anchor: pointer - Point::from((border_x, border_y)).to_f64(),
            edges,
            initial: geometry,
        };
        true
    }

    /// Computes where the grabbed window goes for the new pointer position.
    ///
    /// Resized windows are never smaller than `min_size` on either axis.
    pub fn motion(&self, pointer: Point<f64>, min_size: i32) -> Option<GrabUpdate> {
        match *self {
            InteractiveGrab::Idle => None,
            InteractiveGrab::Moving { window, anchor } => Some(GrabUpdate::Move {
                window,
                loc: (pointer - anchor).to_i32_round(),
            }),
            InteractiveGrab::Resizing {
                window,
                anchor,
                edges,
                initial,
            } => Some(GrabUpdate::Resize {
                window,
                geometry: resize(initial, edges, (pointer - anchor).to_i32_round(), min_size),
            }),
        }
    }

    pub fn reset(&mut self) {
        *self = InteractiveGrab::Idle;
    }

    /// Ends the grab if it holds `window`. Returns whether it did.
    pub fn window_gone(&mut self, window: WindowId) -> bool {
        if self.window() != Some(window) {
            return false;
        }

        debug!("{window:?} went away during an interactive grab");
        self.reset();
        true
    }
}

/// Moves the borders in `edges` to `border`, keeping the opposite borders fixed.
fn resize(
    initial: Rectangle<i32>,
    edges: ResizeEdge,
    border: Point<i32>,
    min_size: i32,
) -> Rectangle<i32> {
    let min_size = min_size.max(1);

    let mut left = initial.loc.x;
    let mut right = initial.right();
    let mut top = initial.loc.y;
    let mut bottom = initial.bottom();

    if edges.contains(ResizeEdge::TOP) {
        top = border.y.min(bottom - min_size);
    } else if edges.contains(ResizeEdge::BOTTOM) {
        bottom = border.y.max(top + min_size);
    }

    if edges.contains(ResizeEdge::LEFT) {
        left = border.x.min(right - min_size);
    } else if edges.contains(ResizeEdge::RIGHT) {
        right = border.x.max(left + min_size);
    }

    Rectangle::new(
        Point::from((left, top)),
        Size::from((right - left, bottom - top)),
    )
}
