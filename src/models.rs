use std::fmt;

/// Axis-aligned rectangle in processing-frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A connected foreground component of a mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl Region {
    /// The zero-area region at the origin, used when a mask has no foreground.
    pub fn empty() -> Self {
        Self {
            label: 0,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            pixel_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_x - self.min_x + 1
        }
    }

    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max_y - self.min_y + 1
        }
    }

    pub fn area(&self) -> u32 {
        self.pixel_count
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x: self.min_x,
            y: self.min_y,
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Outcome of matching a region against the digit catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    Digit(u8),
    NoMatch,
}

impl Recognition {
    pub fn digit(&self) -> Option<u8> {
        match self {
            Recognition::Digit(d) => Some(*d),
            Recognition::NoMatch => None,
        }
    }

    /// Numeric form where no match is -1
    pub fn code(&self) -> i32 {
        match self {
            Recognition::Digit(d) => *d as i32,
            Recognition::NoMatch => -1,
        }
    }
}

impl fmt::Display for Recognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recognition::Digit(d) => write!(f, "{}", d),
            Recognition::NoMatch => f.write_str("no match"),
        }
    }
}
