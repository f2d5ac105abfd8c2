mod util;

use gc_flow::flow::grid::MaskMode;
use gc_flow::prelude::*;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use util::random_grid;

/// Solve `grid` with a grid solver and its generic counterpart with the same
/// strategy; flows and per-site labels must agree.
fn assert_equivalent<M: MaskMode>(grid: &GridGraph<i64, 2, M>) -> Result<(), TestCaseError> {
    let (generic, order) = grid.to_residual_graph().unwrap();
    for algorithm in Algorithm::GRID {
        let mut gs = grid_solver(algorithm, grid.clone(), &FlowConfig::default()).unwrap();
        let mut ss = general_solver(algorithm, generic.clone(), &FlowConfig::default());
        let flow = gs.find_max_flow();
        prop_assert_eq!(flow, ss.find_max_flow(), "{}", algorithm);
        for (i, &v) in order.iter().enumerate() {
            prop_assert_eq!(gs.node_origin(v), ss.node_origin(i), "{} site {}", algorithm, v);
        }
        for v in grid.nodes() {
            if let Some(fixed) = gs.network().fixed_origin(v) {
                prop_assert_eq!(gs.node_origin(v), fixed);
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn unmasked_grids_match_generic_graphs(
        seed in any::<u64>(),
        w in 1usize..6,
        h in 1usize..6,
        k in prop::sample::select(vec![4usize, 8, 16]),
    ) {
        let nb = Neighbourhood::<2>::common(k, true).unwrap();
        let grid = random_grid::<Unmasked>(seed, [w, h], &nb, 6);
        assert_equivalent(&grid)?;
    }

    #[test]
    fn masked_grids_match_generic_graphs(
        seed in any::<u64>(),
        w in 1usize..6,
        h in 1usize..6,
    ) {
        let nb = Neighbourhood::<2>::common(8, true).unwrap();
        let mut grid = random_grid::<Masked>(seed, [w, h], &nb, 6);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        let masks: Vec<Mask> = (0..w * h)
            .map(|_| match rng.gen_range(0..6) {
                0 => Mask::Source,
                1 => Mask::Sink,
                _ => Mask::Free,
            })
            .collect();
        grid.set_masks(&masks).unwrap();
        prop_assert_eq!(grid.free_node_count(), masks.iter().filter(|&&m| m == Mask::Free).count());
        assert_equivalent(&grid)?;

        let mut s = grid_solver(Algorithm::Kohli, grid.clone(), &FlowConfig::default()).unwrap();
        s.find_max_flow();
        let seg = segmentation(s.as_ref());
        for (m, o) in masks.iter().zip(&seg) {
            if let Some(fixed) = m.fixed_origin() {
                prop_assert_eq!(*o, fixed);
            }
        }
    }
}

#[test]
fn masking_everything_leaves_nothing_to_solve() {
    let nb = Neighbourhood::<2>::common(4, true).unwrap();
    let mut grid = random_grid::<Masked>(7, [3, 3], &nb, 4);
    grid.set_masks(&[Mask::Sink; 9]).unwrap();
    for algorithm in Algorithm::GRID {
        let mut s = grid_solver(algorithm, grid.clone(), &FlowConfig::default()).unwrap();
        assert_eq!(s.find_max_flow(), 0);
        assert!(segmentation(s.as_ref()).iter().all(|&o| o == Origin::Sink));
    }
}

#[test]
fn masked_nodes_never_become_active() {
    let nb = Neighbourhood::<2>::common(4, true).unwrap();
    let mut grid = GridGraph::<i32, 2, Masked>::new([3, 1], &nb).unwrap();
    grid.set_neighbourhood_weights(&[1; 4]).unwrap();
    let middle = grid.node([1, 0]).unwrap();
    // terminal capacities on a masked node are ignored
    grid.set_terminal_caps(middle, 50, 0).unwrap();
    grid.set_mask(middle, Mask::Sink).unwrap();
    grid.set_terminal([0, 0], 5, 0).unwrap();
    let mut s = grid_solver(Algorithm::PushRelabelHighestLevel, grid, &FlowConfig::default()).unwrap();
    assert_eq!(s.find_max_flow(), 1);
    assert_eq!(s.network().terminal_residual(middle), (0, 0));
    assert_eq!(s.node_origin(middle), Origin::Sink);
}
