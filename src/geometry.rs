//! Cell geometry: [`Size`] and [`Region`].
//!
//! [`Size`] is the terminal's cached dimensions; [`Region`] is the rectangle a
//! component is allowed to draw in. Both are plain `Copy` values: a component
//! never mutates the region it receives, it derives new ones for its children.

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Terminal dimensions in cells. Neither side is ever zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Assumed when no terminal is attached.
    pub const FALLBACK: Size = Size { width: 80, height: 24 };

    /// Zero on either side is raised to one.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// The whole screen as a region anchored at the origin.
    pub const fn to_region(self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::FALLBACK
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Top-left corner plus extent, in cells.
///
/// Coordinates are signed so layout arithmetic can overshoot before
/// clipping. A zero or negative extent means nothing is drawn; see
/// [`Region::is_empty`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// First column past the region.
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// First row past the region.
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn area(self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.width * self.height
        }
    }

    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub const fn contains_region(self, other: Region) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    /// True when some cell lies in both regions. Touching edges do not count.
    pub fn overlaps(self, other: Region) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The cells shared by both regions, or [`Region::EMPTY`].
    pub fn intersection(self, other: Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let clipped = Region::new(x, y, self.right().min(other.right()) - x, self.bottom().min(other.bottom()) - y);
        if clipped.is_empty() {
            Region::EMPTY
        } else {
            clipped
        }
    }

    pub const fn translate(self, dx: i32, dy: i32) -> Region {
        Region::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Pull every edge in by `cells`. The extent bottoms out at zero.
    pub fn inset(self, cells: i32) -> Region {
        Region::new(
            self.x + cells,
            self.y + cells,
            (self.width - 2 * cells).max(0),
            (self.height - 2 * cells).max(0),
        )
    }

    /// Cut off the first `columns` columns: `(left, rest)`.
    ///
    /// `columns` is kept within `0..=width`, so the two halves always tile
    /// the original.
    pub fn cut_left(self, columns: i32) -> (Region, Region) {
        let n = columns.clamp(0, self.width.max(0));
        (
            Region::new(self.x, self.y, n, self.height),
            Region::new(self.x + n, self.y, self.width - n, self.height),
        )
    }

    /// Cut off the first `rows` rows: `(top, rest)`.
    pub fn cut_top(self, rows: i32) -> (Region, Region) {
        let n = rows.clamp(0, self.height.max(0));
        (
            Region::new(self.x, self.y, self.width, n),
            Region::new(self.x, self.y + n, self.width, self.height - n),
        )
    }
}

// ===========================================================================
// Tests
// ===========================================================================
