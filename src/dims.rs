use crate::error::{Error, Result};

/// Validated per-axis extents of a grid.
///
/// A `Dims` fixes the shape and rank of a [`World`] for its whole lifetime
/// and carries the mixed-radix codec between N-component positions and flat
/// linear indices. The codec is a bijection between the valid positions and
/// `0..len()`.
///
/// Rank 0 (no axes) is a valid degenerate shape: exactly one cell, addressed
/// by the empty position at index 0.
///
/// [`World`]: crate::World
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dims {
    extents: Box<[i32]>,
    len: usize,
}

impl Dims {
    /// Validates `extents` as grid dimensions.
    ///
    /// Fails with [`Error::MalformedDimensions`] if any extent is zero or
    /// negative.
    pub fn new<E: Into<Box<[i32]>>>(extents: E) -> Result<Self> {
        let extents = extents.into();
        if extents.iter().any(|&dim| dim <= 0) {
            return Err(Error::MalformedDimensions {
                dims: extents.into_vec(),
            });
        }
        let len = extents.iter().map(|&dim| dim as usize).product();
        Ok(Self { extents, len })
    }

    /// The number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    /// The extent of every axis, in declared order.
    #[inline]
    pub fn extents(&self) -> &[i32] {
        &self.extents
    }

    /// The number of cells in a grid of this shape, `product(extents)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; even the rank-0 grid holds one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encodes a valid position as its flat linear index.
    ///
    /// Mixed-radix fold over the axes in declared order:
    /// `((p0 * d1 + p1) * d2 + p2) * ...`. The caller is responsible for
    /// bounds; pass positions through [`Dims::contains`] first.
    #[inline]
    pub fn ravel(&self, position: &[i32]) -> usize {
        debug_assert!(
            self.contains(position),
            "ravel of out-of-bounds position {position:?}"
        );
        position
            .iter()
            .zip(&self.extents)
            .fold(0, |acc, (&pos, &dim)| acc * dim as usize + pos as usize)
    }

    /// Decodes a flat linear index back into a position.
    ///
    /// Inverse of [`Dims::ravel`] for every index in `0..len()`.
    pub fn unravel(&self, mut index: usize) -> Vec<i32> {
        debug_assert!(index < self.len, "unravel of out-of-range index {index}");
        let mut position = vec![0; self.rank()];
        // peel axes from last to first
        for (pos, &dim) in position.iter_mut().zip(&self.extents).rev() {
            let dim = dim as usize;
            *pos = (index % dim) as i32;
            index /= dim;
        }
        position
    }

    /// Whether `position` addresses a cell of a grid with these dimensions.
    ///
    /// True iff the rank matches and every component `k` satisfies
    /// `0 <= position[k] < extents[k]`.
    #[inline]
    pub fn contains(&self, position: &[i32]) -> bool {
        position.len() == self.rank()
            && position
                .iter()
                .zip(&self.extents)
                .all(|(&pos, &dim)| (0..dim).contains(&pos))
    }
}
