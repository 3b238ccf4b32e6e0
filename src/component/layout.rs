//! Child region computation.
//!
//! A container's [`Layout`] divides its content region among its children.
//! Tiling layouts (vertical, horizontal, grid, dock) cover the parent exactly
//! with no gaps or overlaps: fixed lengths are taken first, the rest is shared
//! by weight, and leftover cells go to the leading children. `Absolute` and
//! `Layered` are the explicit compositing layouts where children may overlap.

use crate::geometry::Region;

/// Size rule for one child along the layout's main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Exactly this many cells (fewer if the parent runs out).
    Length(u16),
    /// A weighted share of the cells left after all lengths.
    Fill(u16),
}

/// Edge a docked child attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dock {
    Top(u16),
    Bottom(u16),
    Left(u16),
    Right(u16),
    /// Whatever is left after every edge dock, shared top to bottom.
    Fill,
}

/// How a container splits its content region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    /// Stack top to bottom. Children without a constraint get `Fill(1)`.
    Vertical(Vec<Constraint>),
    /// Stack left to right. Children without a constraint get `Fill(1)`.
    Horizontal(Vec<Constraint>),
    /// Equal cells, filled row by row. `rows == 0` means as many as needed.
    Grid { columns: u16, rows: u16 },
    /// Edge docking in order. Children without an entry get [`Dock::Fill`].
    Dock(Vec<Dock>),
    /// Offsets relative to the content region. Missing entries are empty.
    Absolute(Vec<Region>),
    /// Every child gets the whole content region, later children on top.
    #[default]
    Layered,
}

impl Layout {
    /// `count` children stacked vertically with equal shares.
    pub fn rows(count: usize) -> Self {
        Layout::Vertical(vec![Constraint::Fill(1); count])
    }

    /// `count` children side by side with equal shares.
    pub fn columns(count: usize) -> Self {
        Layout::Horizontal(vec![Constraint::Fill(1); count])
    }

    /// Compute one region per child.
    pub fn split(&self, area: Region, count: usize) -> Vec<Region> {
        if count == 0 {
            return Vec::new();
        }
        match self {
            Layout::Vertical(constraints) => {
                let sizes = distribute(area.height, &padded(constraints, count));
                let mut y = area.y;
                sizes
                    .into_iter()
                    .map(|h| {
                        let r = Region::new(area.x, y, area.width, h);
                        y += h;
                        r
                    })
                    .collect()
            }
            Layout::Horizontal(constraints) => {
                let sizes = distribute(area.width, &padded(constraints, count));
                let mut x = area.x;
                sizes
                    .into_iter()
                    .map(|w| {
                        let r = Region::new(x, area.y, w, area.height);
                        x += w;
                        r
                    })
                    .collect()
            }
            Layout::Grid { columns, rows } => grid(area, count, *columns, *rows),
            Layout::Dock(docks) => dock(area, count, docks),
            Layout::Absolute(regions) => (0..count)
                .map(|i| {
                    regions
                        .get(i)
                        .map_or(Region::EMPTY, |r| r.translate(area.x, area.y))
                })
                .collect(),
            Layout::Layered => vec![area; count],
        }
    }
}

fn padded(constraints: &[Constraint], count: usize) -> Vec<Constraint> {
    let mut out: Vec<Constraint> = constraints.iter().copied().take(count).collect();
    out.resize(count, Constraint::Fill(1));
    out
}

/// Split `total` cells according to `constraints`. The result always sums to
/// `total` when at least one `Fill` has a non-zero weight.
pub fn distribute(total: i32, constraints: &[Constraint]) -> Vec<i32> {
    let mut remaining = total.max(0);
    let mut sizes = vec![0; constraints.len()];

    for (size, constraint) in sizes.iter_mut().zip(constraints) {
        if let Constraint::Length(n) = *constraint {
            *size = i32::from(n).min(remaining);
            remaining -= *size;
        }
    }

    let weights: Vec<(usize, i32)> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match *c {
            Constraint::Fill(w) if w > 0 => Some((i, i32::from(w))),
            _ => None,
        })
        .collect();
    let total_weight: i32 = weights.iter().map(|&(_, w)| w).sum();
    if total_weight == 0 {
        return sizes;
    }

    let mut given = 0;
    for &(i, w) in &weights {
        sizes[i] = remaining * w / total_weight;
        given += sizes[i];
    }
    for &(i, _) in weights.iter().take((remaining - given) as usize) {
        sizes[i] += 1;
    }
    sizes
}

fn grid(area: Region, count: usize, columns: u16, rows: u16) -> Vec<Region> {
    let columns = usize::from(columns.max(1));
    let rows = if rows == 0 {
        count.div_ceil(columns)
    } else {
        usize::from(rows)
    };

    let widths = distribute(area.width, &vec![Constraint::Fill(1); columns]);
    let heights = distribute(area.height, &vec![Constraint::Fill(1); rows]);
    let offsets = |sizes: &[i32], start: i32| -> Vec<i32> {
        sizes
            .iter()
            .scan(start, |pos, &s| {
                let at = *pos;
                *pos += s;
                Some(at)
            })
            .collect()
    };
    let xs = offsets(&widths, area.x);
    let ys = offsets(&heights, area.y);

    (0..count)
        .map(|i| {
            let (col, row) = (i % columns, i / columns);
            if row >= rows {
                return Region::EMPTY;
            }
            Region::new(xs[col], ys[row], widths[col], heights[row])
        })
        .collect()
}

fn dock(area: Region, count: usize, docks: &[Dock]) -> Vec<Region> {
    let mut rest = area;
    let mut regions = vec![Region::EMPTY; count];
    let mut fills = Vec::new();

    for (i, region) in regions.iter_mut().enumerate() {
        let edge = docks.get(i).copied().unwrap_or(Dock::Fill);
        *region = match edge {
            Dock::Top(n) => {
                let (top, bottom) = rest.cut_top(i32::from(n));
                rest = bottom;
                top
            }
            Dock::Bottom(n) => {
                let (top, bottom) = rest.cut_top(rest.height - i32::from(n));
                rest = top;
                bottom
            }
            Dock::Left(n) => {
                let (left, right) = rest.cut_left(i32::from(n));
                rest = right;
                left
            }
            Dock::Right(n) => {
                let (left, right) = rest.cut_left(rest.width - i32::from(n));
                rest = left;
                right
            }
            Dock::Fill => {
                fills.push(i);
                Region::EMPTY
            }
        };
    }

    let shares = Layout::rows(fills.len()).split(rest, fills.len());
    for (i, share) in fills.into_iter().zip(shares) {
        regions[i] = share;
    }
    regions
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_tiles(parent: Region, children: &[Region]) {
        let area: i32 = children.iter().map(|r| r.area()).sum();
        assert_eq!(area, parent.area(), "children must cover the parent");
        for (i, a) in children.iter().enumerate() {
            assert!(parent.contains_region(*a), "{a:?} escapes {parent:?}");
            for b in &children[i + 1..] {
                assert!(!a.overlaps(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    // ── distribute ───────────────────────────────────────────────────

    #[test]
    fn distribute_lengths_then_fill() {
        use Constraint::*;
        assert_eq!(distribute(10, &[Length(3), Fill(1)]), vec![3, 7]);
        assert_eq!(distribute(10, &[Fill(1), Fill(1), Fill(1)]), vec![4, 3, 3]);
        assert_eq!(distribute(10, &[Fill(1), Fill(3)]), vec![3, 7]);
        assert_eq!(distribute(4, &[Length(3), Length(3)]), vec![3, 1]);
        assert_eq!(distribute(5, &[Length(2), Fill(0)]), vec![2, 0]);
        assert_eq!(distribute(-4, &[Fill(1)]), vec![0]);
    }

    // ── Grid ─────────────────────────────────────────────────────────

    #[test]
    fn two_by_two_grid_tiles_exactly() {
        let parent = Region::new(0, 0, 100, 40);
        let cells = Layout::Grid { columns: 2, rows: 2 }.split(parent, 4);
        assert_eq!(
            cells,
            vec![
                Region::new(0, 0, 50, 20),
                Region::new(50, 0, 50, 20),
                Region::new(0, 20, 50, 20),
                Region::new(50, 20, 50, 20),
            ]
        );
        assert_tiles(parent, &cells);
    }

    #[test]
    fn uneven_grid_still_tiles() {
        let parent = Region::new(3, 1, 11, 7);
        let cells = Layout::Grid { columns: 3, rows: 2 }.split(parent, 6);
        assert_tiles(parent, &cells);
        assert_eq!(cells[0], Region::new(3, 1, 4, 4));
    }

    #[test]
    fn grid_overflow_children_are_empty() {
        let cells = Layout::Grid { columns: 2, rows: 1 }.split(Region::new(0, 0, 10, 10), 3);
        assert!(cells[2].is_empty());
    }

    #[test]
    fn grid_auto_rows() {
        let cells = Layout::Grid { columns: 2, rows: 0 }.split(Region::new(0, 0, 10, 9), 3);
        assert_eq!(cells[2], Region::new(0, 5, 5, 4));
    }

    // ── Stacks ───────────────────────────────────────────────────────

    #[test]
    fn vertical_stack() {
        let parent = Region::new(0, 0, 20, 10);
        let rows = Layout::Vertical(vec![Constraint::Length(1), Constraint::Fill(1)]).split(parent, 3);
        assert_eq!(
            rows,
            vec![
                Region::new(0, 0, 20, 1),
                Region::new(0, 1, 20, 5),
                Region::new(0, 6, 20, 4),
            ]
        );
        assert_tiles(parent, &rows);
    }

    #[test]
    fn horizontal_stack() {
        let parent = Region::new(2, 2, 9, 3);
        let cols = Layout::columns(2).split(parent, 2);
        assert_eq!(cols, vec![Region::new(2, 2, 5, 3), Region::new(7, 2, 4, 3)]);
    }

    // ── Dock ─────────────────────────────────────────────────────────

    #[test]
    fn dock_header_footer_sidebar() {
        let parent = Region::new(0, 0, 40, 20);
        let layout = Layout::Dock(vec![Dock::Top(1), Dock::Bottom(1), Dock::Left(10), Dock::Fill]);
        let regions = layout.split(parent, 4);
        assert_eq!(
            regions,
            vec![
                Region::new(0, 0, 40, 1),
                Region::new(0, 19, 40, 1),
                Region::new(0, 1, 10, 18),
                Region::new(10, 1, 30, 18),
            ]
        );
        assert_tiles(parent, &regions);
    }

    #[test]
    fn dock_larger_than_parent_clamps() {
        let regions = Layout::Dock(vec![Dock::Top(50), Dock::Fill]).split(Region::new(0, 0, 5, 5), 2);
        assert_eq!(regions[0], Region::new(0, 0, 5, 5));
        assert!(regions[1].is_empty());
    }

    // ── Compositing layouts ──────────────────────────────────────────

    #[test]
    fn absolute_offsets_are_relative() {
        let layout = Layout::Absolute(vec![Region::new(1, 1, 3, 2)]);
        let regions = layout.split(Region::new(10, 5, 20, 20), 2);
        assert_eq!(regions, vec![Region::new(11, 6, 3, 2), Region::EMPTY]);
    }

    #[test]
    fn layered_shares_the_area() {
        let area = Region::new(0, 0, 8, 4);
        assert_eq!(Layout::Layered.split(area, 2), vec![area, area]);
        assert!(Layout::Layered.split(area, 0).is_empty());
    }
}
