//! Geometry and styling types shared by the pager and the thumbnail strip

use serde::{Deserialize, Serialize};

/// Point in logical (layout) units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size in logical (layout) units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[must_use]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[must_use]
    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }
}

/// Axis the pager slides along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Horizontal => "horizontal",
            ScrollDirection::Vertical => "vertical",
        }
    }

    /// Component of `point` along this axis
    #[must_use]
    pub fn offset(self, point: Point) -> f32 {
        match self {
            ScrollDirection::Horizontal => point.x,
            ScrollDirection::Vertical => point.y,
        }
    }

    /// Component of `size` along this axis
    #[must_use]
    pub fn extent(self, size: Size) -> f32 {
        match self {
            ScrollDirection::Horizontal => size.width,
            ScrollDirection::Vertical => size.height,
        }
    }

    /// Point whose component along this axis is `offset`
    #[must_use]
    pub fn point(self, offset: f32) -> Point {
        match self {
            ScrollDirection::Horizontal => Point::new(offset, 0.0),
            ScrollDirection::Vertical => Point::new(0.0, offset),
        }
    }
}

/// Opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// How a thumbnail cell is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellStyle {
    Border { color: Color, width: f32 },
    Opacity(f32),
}
