mod neighbourhood;
mod view;

pub use self::neighbourhood::Neighbourhood;
pub use self::view::WorldView;

use crate::dims::Dims;
use crate::error::{Error, Result};
use crate::grid::Grid;
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The unit of per-site grid state.
///
/// Cells are immutable value records: a generation step never mutates a cell
/// in place, it replaces it with the cell returned by the kind's update rule
/// (possibly a plain clone, if the rule is a no-op).
pub trait Cell: Clone {
    /// Tag identifying which update rule applies to this cell.
    type Kind: Clone + Eq + Hash;

    /// The kind tag of this cell.
    fn kind(&self) -> Self::Kind;
}

/// Update rule invoked once per matching cell each generation.
///
/// Receives the cell's pre-round value and a [`WorldView`] bound to the
/// pre-round state at the cell's position, and returns the next-generation
/// cell.
pub type UpdateFn<C> = Arc<dyn Fn(&C, WorldView<'_, C>) -> Result<C> + Send + Sync>;

/// Dense N-dimensional grid of cells with a generational update loop.
///
/// A world owns one cell per valid position of its [`Dims`], stored flat in
/// linear-index order, plus a registry mapping [`Cell::Kind`] tags to update
/// rules. Kinds with no registered rule pass through a generation unchanged.
pub struct World<C: Cell> {
    dims: Dims,
    state: Vec<C>,
    rules: HashMap<C::Kind, UpdateFn<C>>,
}

impl<C: Cell> World<C> {
    /// Creates a world, invoking `init` exactly once per valid position.
    ///
    /// The order in which positions are visited is unspecified; `init` must
    /// not rely on it for side effects.
    pub fn new(dims: Dims, mut init: impl FnMut(&[i32]) -> C) -> Self {
        let state = (0..dims.len()).map(|index| init(&dims.unravel(index))).collect();
        debug!(
            "created world with dimensions {:?} ({} cells)",
            dims.extents(),
            dims.len()
        );
        Self {
            dims,
            state,
            rules: HashMap::new(),
        }
    }

    /// Validates `extents` and creates a world from them.
    ///
    /// Fails with [`Error::MalformedDimensions`] if any extent is zero or
    /// negative.
    pub fn try_new(extents: &[i32], init: impl FnMut(&[i32]) -> C) -> Result<Self> {
        Ok(Self::new(Dims::new(extents)?, init))
    }

    /// The shape of this world.
    #[inline]
    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    /// The total number of cells, `product(extents)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Always false; a world holds at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The cell at `position`.
    ///
    /// Fails with [`Error::OutOfBounds`] if the position does not address a
    /// cell of this world.
    pub fn get_cell(&self, position: &[i32]) -> Result<&C> {
        if !self.dims.contains(position) {
            return Err(Error::out_of_bounds(position, &self.dims));
        }
        Ok(&self.state[self.dims.ravel(position)])
    }

    /// A read-only handle bound to this world and `position`.
    ///
    /// The position is not validated here; lookups through the view perform
    /// their own bounds checks.
    pub fn view(&self, position: impl Into<Vec<i32>>) -> WorldView<'_, C> {
        WorldView::new(self, position.into())
    }

    /// Binds `update` as the rule for cells of `kind`, replacing any
    /// previous binding.
    pub fn register_cell(
        &mut self,
        kind: C::Kind,
        update: impl Fn(&C, WorldView<'_, C>) -> Result<C> + Send + Sync + 'static,
    ) {
        self.rules.insert(kind, Arc::new(update));
    }

    /// Removes the rule for cells of `kind`; they fall back to identity.
    pub fn unregister_cell(&mut self, kind: &C::Kind) {
        self.rules.remove(kind);
    }

    /// Performs `rounds` sequential generations.
    ///
    /// Each round computes a complete next-generation array from the current
    /// one and swaps it in atomically: every rule invocation reads only the
    /// pre-round snapshot, never a value produced in the same round. If a
    /// rule fails, the round is abandoned and the state stays at the last
    /// fully-completed generation.
    pub fn update(&mut self, rounds: usize) -> Result<()> {
        for round in 0..rounds {
            trace!("advancing generation ({}/{rounds} this call)", round + 1);
            let next = (0..self.state.len())
                .map(|index| self.step_cell(index))
                .collect::<Result<Vec<_>>>()?;
            self.state = next;
        }
        Ok(())
    }

    /// Computes the next-generation cell at a linear index against the
    /// current snapshot.
    fn step_cell(&self, index: usize) -> Result<C> {
        let cell = &self.state[index];
        match self.rules.get(&cell.kind()) {
            Some(update) => update(cell, self.view(self.dims.unravel(index))),
            // unregistered kinds pass through unchanged
            None => Ok(cell.clone()),
        }
    }

    /// Projects every cell through `dumper` into a [`Grid`] snapshot
    /// mirroring this world's shape.
    pub fn dump<T>(&self, mut dumper: impl FnMut(&C) -> T) -> Grid<T> {
        Grid::from_flat(self.dims.clone(), self.state.iter().map(&mut dumper).collect())
    }
}

impl<C> World<C>
where
    C: Cell + Send + Sync,
    C::Kind: Send + Sync,
{
    /// Performs `rounds` generations, distributing the per-cell work across
    /// the rayon thread pool.
    ///
    /// Semantics are identical to [`World::update`]: every rule invocation
    /// reads only the pre-round snapshot, so the result is independent of
    /// how the indices are scheduled.
    pub fn update_parallel(&mut self, rounds: usize) -> Result<()> {
        for round in 0..rounds {
            trace!(
                "advancing generation in parallel ({}/{rounds} this call)",
                round + 1
            );
            let next = (0..self.state.len())
                .into_par_iter()
                .map(|index| self.step_cell(index))
                .collect::<Result<Vec<_>>>()?;
            self.state = next;
        }
        Ok(())
    }
}

impl<C: Cell> Clone for World<C> {
    /// Deep-copies the cell state; the clone and the original never affect
    /// each other. Registered rules are shared, but each world keeps its own
    /// registry, so later (un)registrations are independent too.
    fn clone(&self) -> Self {
        Self {
            dims: self.dims.clone(),
            state: self.state.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<C: Cell> fmt::Debug for World<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("dims", &self.dims)
            .field("cells", &self.state.len())
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
