use super::neighbourhood::Neighbourhood;
use super::{Cell, World};
use crate::dims::Dims;
use crate::error::{Error, Result};

/// Read-only handle bound to a [`World`] and one position.
///
/// Update rules receive a view at the cell they are computing and use it to
/// query absolute or relative cells of the pre-round snapshot and to build
/// [`Neighbourhood`] queries around the position. The bound position is not
/// validated up front; every lookup performs its own bounds check.
#[derive(Debug, Clone)]
pub struct WorldView<'w, C: Cell> {
    world: &'w World<C>,
    position: Vec<i32>,
}

impl<'w, C: Cell> WorldView<'w, C> {
    pub(super) fn new(world: &'w World<C>, position: Vec<i32>) -> Self {
        Self { world, position }
    }

    /// The shape of the bound world.
    #[inline]
    pub fn dims(&self) -> &'w Dims {
        self.world.dims()
    }

    /// The position this view is bound to.
    #[inline]
    pub fn position(&self) -> &[i32] {
        &self.position
    }

    /// Absolute lookup, delegating to [`World::get_cell`].
    pub fn get_cell(&self, position: &[i32]) -> Result<&'w C> {
        self.world.get_cell(position)
    }

    /// The cell displaced from this view's position by `offset` per axis.
    ///
    /// Fails with [`Error::OutOfBounds`] if the displaced position leaves
    /// the grid or the offset's rank does not match. Neighbourhood-style
    /// access should go through [`WorldView::moore`] or
    /// [`WorldView::von_neumann`] instead, which pre-filter out-of-bounds
    /// candidates.
    pub fn get_relative(&self, offset: &[i32]) -> Result<&'w C> {
        if offset.len() != self.position.len() {
            return Err(Error::out_of_bounds(offset, self.dims()));
        }
        let position: Vec<i32> = self
            .position
            .iter()
            .zip(offset)
            .map(|(&pos, &off)| pos + off)
            .collect();
        self.get_cell(&position)
    }

    /// The Moore neighbourhood of this view's position.
    ///
    /// Enumerates every in-bounds cell within the hyper-cube
    /// `[-range, range]` per axis, excluding the center:
    ///
    /// ```text
    /// .....
    /// .xxx.
    /// .xox.
    /// .xxx.
    /// .....
    /// ```
    pub fn moore(&self, range: i32) -> Neighbourhood<'w, C> {
        Neighbourhood::moore(self.world, self.position.clone(), range)
    }

    /// The Von Neumann neighbourhood of this view's position.
    ///
    /// Enumerates the in-bounds cells reached by shifting exactly one axis
    /// by up to `range` steps in either direction, an axis-aligned star:
    ///
    /// ```text
    /// .....
    /// ..x..
    /// .xox.
    /// ..x..
    /// .....
    /// ```
    pub fn von_neumann(&self, range: i32) -> Neighbourhood<'w, C> {
        Neighbourhood::von_neumann(self.world, self.position.clone(), range)
    }
}
