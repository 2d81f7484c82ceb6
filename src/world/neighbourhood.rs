use super::{Cell, World};
use itertools::Itertools;
use std::fmt;

/// Offset enumeration strategy around a center position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Moore,
    VonNeumann,
}

/// A lazy, restartable sequence of cells around a position.
///
/// A neighbourhood is a query value, not a consumed stream: every call to
/// [`Neighbourhood::iter`] recomputes the traversal from scratch, and two
/// traversals of the same value yield identical sequences in identical
/// order. Candidate positions that fall outside the grid are filtered out
/// before any cell is dereferenced.
pub struct Neighbourhood<'w, C: Cell> {
    world: &'w World<C>,
    center: Vec<i32>,
    range: i32,
    shape: Shape,
    filters: Vec<Box<dyn Fn(&C) -> bool + 'w>>,
}

impl<'w, C: Cell> Neighbourhood<'w, C> {
    pub(super) fn moore(world: &'w World<C>, center: Vec<i32>, range: i32) -> Self {
        Self::new(world, center, range, Shape::Moore)
    }

    pub(super) fn von_neumann(world: &'w World<C>, center: Vec<i32>, range: i32) -> Self {
        Self::new(world, center, range, Shape::VonNeumann)
    }

    fn new(world: &'w World<C>, center: Vec<i32>, range: i32, shape: Shape) -> Self {
        Self {
            world,
            center,
            range,
            shape,
            filters: Vec::new(),
        }
    }

    /// A fresh traversal over the in-bounds neighbours passing every filter.
    pub fn iter(&self) -> impl Iterator<Item = &'w C> + '_ {
        let world = self.world;
        let center = self.center.as_slice();
        let filters = self.filters.as_slice();
        self.offsets()
            .map(move |offset| {
                center
                    .iter()
                    .zip(&offset)
                    .map(|(&pos, &off)| pos + off)
                    .collect::<Vec<i32>>()
            })
            .filter(move |position| world.dims.contains(position))
            .map(move |position| &world.state[world.dims.ravel(&position)])
            .filter(move |&cell| filters.iter().all(|pred| pred(cell)))
    }

    /// Narrows this neighbourhood with a pure predicate.
    ///
    /// Filters compose: chaining behaves as a logical AND, independent of
    /// chain order.
    #[must_use]
    pub fn filter(mut self, pred: impl Fn(&C) -> bool + 'w) -> Self {
        self.filters.push(Box::new(pred));
        self
    }

    /// Consumes one traversal and returns the number of yielded cells.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn offsets(&self) -> Box<dyn Iterator<Item = Vec<i32>>> {
        match self.shape {
            Shape::Moore => Box::new(moore_offsets(self.center.len(), self.range)),
            Shape::VonNeumann => Box::new(von_neumann_offsets(self.center.len(), self.range)),
        }
    }
}

impl<'a, 'w, C: Cell> IntoIterator for &'a Neighbourhood<'w, C> {
    type Item = &'w C;
    type IntoIter = Box<dyn Iterator<Item = &'w C> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<C: Cell> fmt::Debug for Neighbourhood<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neighbourhood")
            .field("center", &self.center)
            .field("range", &self.range)
            .field("shape", &self.shape)
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Cartesian product of `[-range, range]` per axis in declared axis order
/// (last axis varies fastest), with the all-zero center offset skipped.
fn moore_offsets(rank: usize, range: i32) -> impl Iterator<Item = Vec<i32>> {
    (0..rank)
        .map(move |_| -range..=range)
        .multi_cartesian_product()
        .filter(|offset| offset.iter().any(|&off| off != 0))
}

/// Axis-aligned star: for each axis in declared order and each step
/// `1..=range`, the negative shift followed by the positive shift.
fn von_neumann_offsets(rank: usize, range: i32) -> impl Iterator<Item = Vec<i32>> {
    (0..rank).flat_map(move |axis| {
        (1..=range).flat_map(move |step| {
            [-step, step].into_iter().map(move |shift| {
                let mut offset = vec![0; rank];
                offset[axis] = shift;
                offset
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Site(Vec<i32>);

    impl Cell for Site {
        type Kind = ();

        fn kind(&self) -> Self::Kind {}
    }

    fn site_world(extents: &[i32]) -> World<Site> {
        World::try_new(extents, |position| Site(position.to_vec())).expect("valid extents")
    }

    fn positions(neighbourhood: &Neighbourhood<'_, Site>) -> Vec<Vec<i32>> {
        neighbourhood.iter().map(|site| site.0.clone()).collect()
    }

    #[test]
    fn moore_enumerates_the_hypercube_in_order() {
        let world = site_world(&[3, 3]);
        let moore = world.view(vec![1, 1]).moore(1);
        assert_eq!(
            positions(&moore),
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
                vec![2, 2],
            ]
        );
    }

    #[test]
    fn moore_clips_at_the_boundary() {
        let world = site_world(&[3, 3]);
        assert_eq!(world.view(vec![0, 0]).moore(1).count(), 3);
        assert_eq!(world.view(vec![1, 0]).moore(1).count(), 5);
        assert_eq!(world.view(vec![1, 1]).moore(1).count(), 8);
    }

    #[test]
    fn moore_range_two_covers_the_wider_cube() {
        let world = site_world(&[5, 5]);
        assert_eq!(world.view(vec![2, 2]).moore(2).count(), 24);
    }

    #[test]
    fn moore_counts_generalize_by_rank() {
        let world = site_world(&[3, 3, 3]);
        assert_eq!(world.view(vec![1, 1, 1]).moore(1).count(), 26);

        let line = site_world(&[5]);
        assert_eq!(line.view(vec![2]).moore(1).count(), 2);
    }

    #[test]
    fn von_neumann_is_an_axis_aligned_star() {
        let world = site_world(&[3, 3]);
        let star = world.view(vec![1, 1]).von_neumann(1);
        assert_eq!(
            positions(&star),
            vec![vec![0, 1], vec![2, 1], vec![1, 0], vec![1, 2]]
        );
    }

    #[test]
    fn von_neumann_range_two_skips_diagonals() {
        let world = site_world(&[5, 5]);
        let star = world.view(vec![2, 2]).von_neumann(2);
        let yielded = positions(&star);
        assert_eq!(
            yielded,
            vec![
                vec![1, 2],
                vec![3, 2],
                vec![0, 2],
                vec![4, 2],
                vec![2, 1],
                vec![2, 3],
                vec![2, 0],
                vec![2, 4],
            ]
        );
        assert!(!yielded.contains(&vec![1, 1]));
    }

    #[test]
    fn von_neumann_clips_at_the_boundary() {
        let world = site_world(&[3, 3]);
        assert_eq!(world.view(vec![0, 0]).von_neumann(1).count(), 2);
        assert_eq!(world.view(vec![0, 1]).von_neumann(1).count(), 3);
    }

    #[test]
    fn zero_range_neighbourhoods_are_empty() {
        let world = site_world(&[3, 3]);
        assert_eq!(world.view(vec![1, 1]).moore(0).count(), 0);
        assert_eq!(world.view(vec![1, 1]).von_neumann(0).count(), 0);
    }

    #[test]
    fn traversals_are_restartable() {
        let world = site_world(&[4, 4]);
        let moore = world
            .view(vec![1, 2])
            .moore(2)
            .filter(|site: &Site| (site.0[0] + site.0[1]) % 2 == 0);

        let first = positions(&moore);
        let second = positions(&moore);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn chained_filters_behave_as_and() {
        let world = site_world(&[5, 5]);
        let view = world.view(vec![2, 2]);

        let chained = view
            .moore(2)
            .filter(|site: &Site| site.0[0] > 1)
            .filter(|site: &Site| site.0[1] < 3);
        let combined = view
            .moore(2)
            .filter(|site: &Site| site.0[0] > 1 && site.0[1] < 3);

        assert_eq!(chained.count(), combined.count());
        assert_eq!(positions(&chained), positions(&combined));
    }

    #[test]
    fn neighbourhoods_are_iterable_by_reference() {
        let world = site_world(&[3, 3]);
        let moore = world.view(vec![0, 0]).moore(1);

        let mut total = 0;
        for site in &moore {
            assert!(world.dims().contains(&site.0));
            total += 1;
        }
        assert_eq!(total, moore.count());
    }

    #[test]
    fn rank_zero_neighbourhoods_are_empty() {
        let world = site_world(&[]);
        assert_eq!(world.view(vec![]).moore(1).count(), 0);
        assert_eq!(world.view(vec![]).von_neumann(1).count(), 0);
    }
}
