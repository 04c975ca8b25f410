//! Points, sizes and rectangles in the global compositor space.

use std::ops::{Add, Sub};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point<N> {
    pub x: N,
    pub y: N,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size<N> {
    pub w: N,
    pub h: N,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle<N> {
    pub loc: Point<N>,
    pub size: Size<N>,
}

impl<N> From<(N, N)> for Point<N> {
    fn from((x, y): (N, N)) -> Self {
        Self { x, y }
    }
}

impl<N> From<(N, N)> for Size<N> {
    fn from((w, h): (N, N)) -> Self {
        Self { w, h }
    }
}

impl<N: Add<Output = N>> Add for Point<N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<N: Sub<Output = N>> Sub for Point<N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Point<i32> {
    pub fn to_f64(self) -> Point<f64> {
        Point::from((f64::from(self.x), f64::from(self.y)))
    }
}

impl Point<f64> {
    pub fn to_i32_round(self) -> Point<i32> {
        Point::from((self.x.round() as i32, self.y.round() as i32))
    }
}

impl<N> Rectangle<N> {
    pub fn new(loc: Point<N>, size: Size<N>) -> Self {
        Self { loc, size }
    }
}

impl Rectangle<i32> {
    pub fn right(&self) -> i32 {
        self.loc.x + self.size.w
    }

    pub fn bottom(&self) -> i32 {
        self.loc.y + self.size.h
    }

    pub fn center(&self) -> Point<f64> {
        Point::from((
            f64::from(self.loc.x) + f64::from(self.size.w) / 2.,
            f64::from(self.loc.y) + f64::from(self.size.h) / 2.,
        ))
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.loc.x < other.right()
            && other.loc.x < self.right()
            && self.loc.y < other.bottom()
            && other.loc.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        self.loc.x <= other.loc.x
            && self.loc.y <= other.loc.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the point lies inside; the right and bottom edges are exclusive.
    pub fn contains(&self, point: Point<f64>) -> bool {
        f64::from(self.loc.x) <= point.x
            && point.x < f64::from(self.right())
            && f64::from(self.loc.y) <= point.y
            && point.y < f64::from(self.bottom())
    }
}
