//! Generic engine for N-dimensional cellular-automaton simulation.
//!
//! Applications define their own cell kinds, register per-kind update rules,
//! and drive the synchronous generational loop; the engine supplies the dense
//! grid store, position/index codec, and neighbourhood queries.

pub mod dims;
pub mod error;
pub mod grid;
pub mod world;

pub use dims::Dims;
pub use error::{Error, Result};
pub use grid::Grid;
pub use world::{Cell, Neighbourhood, UpdateFn, World, WorldView};
