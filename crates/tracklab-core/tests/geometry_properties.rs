//! Property tests for the geometry functions.

use ndarray::{Array2, Axis};
use proptest::prelude::*;

use tracklab_core::geometry::{
    inscribed_quadrilateral_area_from_coordinates, pairwise_distance, QuadIndices,
};

fn coords(frames: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-500.0f64..500.0, frames)
}

proptest! {
    #[test]
    fn distance_from_point_to_itself_is_zero(xs in coords(16), ys in coords(16)) {
        let x = Array2::from_shape_fn((2, 16), |(_, t)| xs[t]);
        let y = Array2::from_shape_fn((2, 16), |(_, t)| ys[t]);
        let d = pairwise_distance(x.view(), y.view()).unwrap();
        prop_assert!(d.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn distance_is_symmetric(xs in coords(16), ys in coords(16)) {
        let x = Array2::from_shape_vec((2, 8), xs).unwrap();
        let y = Array2::from_shape_vec((2, 8), ys).unwrap();
        let forward = pairwise_distance(x.view(), y.view()).unwrap();

        let swap = [1, 0];
        let xr = x.select(Axis(0), &swap);
        let yr = y.select(Axis(0), &swap);
        let backward = pairwise_distance(xr.view(), yr.view()).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn area_invariant_under_row_permutation(
        xs in coords(4 * 6),
        ys in coords(4 * 6),
        perm in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
    ) {
        let x = Array2::from_shape_vec((4, 6), xs).unwrap();
        let y = Array2::from_shape_vec((4, 6), ys).unwrap();
        let reference = inscribed_quadrilateral_area_from_coordinates(
            x.view(), y.view(), QuadIndices::default()).unwrap();

        // row i of the permuted arrays holds source row perm[i]
        let xp = x.select(Axis(0), &perm);
        let yp = y.select(Axis(0), &perm);
        let position = |role: usize| perm.iter().position(|&p| p == role).unwrap();
        let indices = QuadIndices::new(position(0), position(1), position(2), position(3));
        let permuted = inscribed_quadrilateral_area_from_coordinates(
            xp.view(), yp.view(), indices).unwrap();

        for (a, b) in reference.iter().zip(permuted.iter()) {
            prop_assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
}
