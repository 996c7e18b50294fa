// src/models/common.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical width of every slide canvas.
pub const SLIDE_WIDTH: f64 = 960.0;
/// Logical height of every slide canvas.
pub const SLIDE_HEIGHT: f64 = 540.0;

/// Opaque, stable identity of a slide, text box or image.
///
/// Ids coming from cached decks are kept verbatim; new ids are v4 UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    pub fn generate() -> Self {
        ElementId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        ElementId::generate()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId(s.to_string())
    }
}

/// Returns a random value in `0..upper` (0 when the RNG is unavailable or `upper` is 0).
pub fn random_below(upper: u32) -> u32 {
    if upper == 0 {
        return 0;
    }
    let mut buf = [0u8; 4];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf) % upper,
        Err(e) => {
            log::warn!("RNG unavailable ({}), using zero offset", e);
            0
        }
    }
}

/// A point in slide-logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle in slide-logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The full slide canvas.
    pub fn slide() -> Self {
        BoundingBox::new(0.0, 0.0, SLIDE_WIDTH, SLIDE_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = ElementId::generate();
        let b = ElementId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn random_below_stays_in_range() {
        for _ in 0..50 {
            assert!(random_below(100) < 100);
        }
        assert_eq!(random_below(0), 0);
    }
}
