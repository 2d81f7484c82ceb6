use crate::dims::Dims;
use thiserror::Error;

/// Alias for results of fallible library calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by direct grid access and world construction.
///
/// All failures are synchronous and returned to the caller immediately;
/// the library never retries or suppresses them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A position failed the bounds check in a direct cell lookup.
    ///
    /// Neighbourhood traversal pre-filters candidate positions, so this
    /// only occurs on direct [`get_cell`]/[`get_relative`] misuse.
    ///
    /// [`get_cell`]: crate::World::get_cell
    /// [`get_relative`]: crate::WorldView::get_relative
    #[error("position {position:?} is out of bounds for dimensions {dims:?}")]
    OutOfBounds {
        /// The offending position (or offset of mismatched rank).
        position: Vec<i32>,
        /// The extents of the grid it was checked against.
        dims: Vec<i32>,
    },

    /// A dimension vector with a zero or negative extent.
    #[error("malformed dimensions {dims:?}: every extent must be positive")]
    MalformedDimensions {
        /// The rejected extents.
        dims: Vec<i32>,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(position: &[i32], dims: &Dims) -> Self {
        Self::OutOfBounds {
            position: position.to_vec(),
            dims: dims.extents().to_vec(),
        }
    }
}
