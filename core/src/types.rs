use ndarray::Array4;

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Four-dimensional coordinates `(x, y, z, w)`.
pub type Coord4 = (Coord, Coord, Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord4 {
    type Output = [usize; 4];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

/// Number of cells in a `size^4` hypercube, saturating at the count type's
/// ceiling.
pub const fn total_cells(size: Coord) -> CellCount {
    let side = size as CellCount;
    side.saturating_mul(side)
        .saturating_mul(side)
        .saturating_mul(side)
}

pub const fn in_bounds(coords: Coord4, size: Coord) -> bool {
    coords.0 < size && coords.1 < size && coords.2 < size && coords.3 < size
}

pub(crate) const fn hyper_dim(size: Coord) -> [usize; 4] {
    [size as usize; 4]
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord4) -> NeighborIter;
}

impl<T> NeighborIterExt for Array4<T> {
    fn iter_neighbors(&self, index: Coord4) -> NeighborIter {
        let dim = self.dim();
        debug_assert!(dim.0 == dim.1 && dim.1 == dim.2 && dim.2 == dim.3);
        NeighborIter::new(index, dim.0.try_into().unwrap())
    }
}

/// All 80 displacement vectors in `{-1, 0, 1}^4` minus the zero vector, in
/// lexicographic `(dw, dz, dy, dx)` order.
const DISPLACEMENTS: [(i8, i8, i8, i8); 80] = displacements();

const fn displacements() -> [(i8, i8, i8, i8); 80] {
    let mut table = [(0i8, 0i8, 0i8, 0i8); 80];
    let mut filled = 0;
    let mut code = 0;
    while code < 81 {
        let dx = (code % 3) as i8 - 1;
        let dy = (code / 3 % 3) as i8 - 1;
        let dz = (code / 9 % 3) as i8 - 1;
        let dw = (code / 27 % 3) as i8 - 1;
        if dx != 0 || dy != 0 || dz != 0 || dw != 0 {
            table[filled] = (dx, dy, dz, dw);
            filled += 1;
        }
        code += 1;
    }
    table
}

/// Applies `delta` to `coords`, returning a value only when every axis stays
/// inside the `size^4` hypercube.
fn apply_delta(coords: Coord4, delta: (i8, i8, i8, i8), size: Coord) -> Option<Coord4> {
    let step = |axis: Coord, d: i8| -> Option<Coord> {
        let next = axis.checked_add_signed(d)?;
        (next < size).then_some(next)
    };

    Some((
        step(coords.0, delta.0)?,
        step(coords.1, delta.1)?,
        step(coords.2, delta.2)?,
        step(coords.3, delta.3)?,
    ))
}

/// The in-bounds subset of a cell's 80 hypercube neighbors.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord4,
    size: Coord,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord4, size: Coord) -> Self {
        Self {
            center,
            size,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord4;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[usize::from(self.index)],
                self.size,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// Toroidal step: every axis wraps modulo `size`, so nothing ever leaves
/// `[0, size)`.
pub fn wrap(coords: Coord4, delta: (i8, i8, i8, i8), size: Coord) -> Coord4 {
    let step = |axis: Coord, d: i8| -> Coord {
        (i16::from(axis) + i16::from(d)).rem_euclid(i16::from(size)) as Coord
    };

    (
        step(coords.0, delta.0),
        step(coords.1, delta.1),
        step(coords.2, delta.2),
        step(coords.3, delta.3),
    )
}

/// Whether `coords` lies in the closed hyper-rectangle spanned by the corners
/// `a` and `b`, given in either order.
pub fn in_rect(coords: Coord4, a: Coord4, b: Coord4) -> bool {
    let axis = |v: Coord, p: Coord, q: Coord| v >= p.min(q) && v <= p.max(q);

    axis(coords.0, a.0, b.0)
        && axis(coords.1, a.1, b.1)
        && axis(coords.2, a.2, b.2)
        && axis(coords.3, a.3, b.3)
}

/// Whether two distinct cells touch, diagonals included.
pub fn is_adjacent(a: Coord4, b: Coord4) -> bool {
    a != b
        && a.0.abs_diff(b.0) <= 1
        && a.1.abs_diff(b.1) <= 1
        && a.2.abs_diff(b.2) <= 1
        && a.3.abs_diff(b.3) <= 1
}

/// Every coordinate of the closed hyper-rectangle spanned by two corners, in
/// lexicographic `(w, z, y, x)` order with `x` fastest.
#[derive(Debug)]
pub struct RectIter {
    lo: Coord4,
    hi: Coord4,
    next: Option<Coord4>,
}

impl RectIter {
    const fn empty() -> Self {
        Self {
            lo: (0, 0, 0, 0),
            hi: (0, 0, 0, 0),
            next: None,
        }
    }
}

pub fn iter_rect(a: Coord4, b: Coord4) -> RectIter {
    let lo = (a.0.min(b.0), a.1.min(b.1), a.2.min(b.2), a.3.min(b.3));
    let hi = (a.0.max(b.0), a.1.max(b.1), a.2.max(b.2), a.3.max(b.3));
    RectIter {
        lo,
        hi,
        next: Some(lo),
    }
}

/// Every coordinate of the `size^4` hypercube, in [`iter_rect`] order.
pub fn iter_cells(size: Coord) -> RectIter {
    match size.checked_sub(1) {
        Some(max) => iter_rect((0, 0, 0, 0), (max, max, max, max)),
        None => RectIter::empty(),
    }
}

impl Iterator for RectIter {
    type Item = Coord4;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        let (x, y, z, w) = current;
        self.next = if x < self.hi.0 {
            Some((x + 1, y, z, w))
        } else if y < self.hi.1 {
            Some((self.lo.0, y + 1, z, w))
        } else if z < self.hi.2 {
            Some((self.lo.0, self.lo.1, z + 1, w))
        } else if w < self.hi.3 {
            Some((self.lo.0, self.lo.1, self.lo.2, w + 1))
        } else {
            None
        };

        Some(current)
    }
}
