use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use wobble_core::perturb::removal_count;
use wobble_core::{ConcordanceCounter, Graph, GraphBuilder, perturb};

/// Two equal-length score vectors drawn from a small alphabet, so ties are
/// common.
fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (0usize..24).prop_flat_map(|n| {
        (
            prop::collection::vec((0u8..6).prop_map(f64::from), n),
            prop::collection::vec((0u8..6).prop_map(f64::from), n),
        )
    })
}

fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..20, 0u8..20), 0..120)
}

fn graph_from(edges: &[(u8, u8)]) -> Graph {
    let mut builder = GraphBuilder::default();
    for (a, b) in edges {
        builder.add_edge(&a.to_string(), &b.to_string());
    }
    builder.build()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    // Concordance
    #[test]
    fn every_pair_is_classified_once((x, y) in arb_pair()) {
        let c = ConcordanceCounter::exact().count_slices(&x, &y).expect("valid");
        let n = x.len() as u64;
        prop_assert_eq!(c.pairs(), n * n.saturating_sub(1) / 2);
    }

    #[test]
    fn statistics_stay_in_unit_range((x, y) in arb_pair()) {
        let c = ConcordanceCounter::exact().count_slices(&x, &y).expect("valid");
        if let Some(tau) = c.tau_b() {
            prop_assert!((-1.0..=1.0).contains(&tau));
        }
        if let Some(gamma) = c.gamma() {
            prop_assert!((-1.0..=1.0).contains(&gamma));
        }
    }

    #[test]
    fn swapping_arguments_is_symmetric((x, y) in arb_pair()) {
        let counter = ConcordanceCounter::exact();
        let xy = counter.count_slices(&x, &y).expect("valid");
        let yx = counter.count_slices(&y, &x).expect("valid");
        prop_assert_eq!(yx, xy.swapped());
        prop_assert_eq!(xy.tau_b(), yx.tau_b());
        prop_assert_eq!(xy.gamma(), yx.gamma());
    }

    #[test]
    fn negating_one_side_flips_sign((x, y) in arb_pair()) {
        let counter = ConcordanceCounter::exact();
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        let c = counter.count_slices(&x, &y).expect("valid");
        let flipped = counter.count_slices(&x, &neg).expect("valid");
        prop_assert_eq!(flipped.concordant, c.discordant);
        prop_assert_eq!(flipped.discordant, c.concordant);
        prop_assert_eq!(flipped.tau_b().map(|t| -t), c.tau_b());
    }

    #[test]
    fn self_comparison_is_one_unless_all_tied((x, _) in arb_pair()) {
        let c = ConcordanceCounter::exact().count_slices(&x, &x).expect("valid");
        prop_assert_eq!(c.discordant, 0);
        if c.concordant > 0 {
            prop_assert_eq!(c.tau_b(), Some(1.0));
            prop_assert_eq!(c.gamma(), Some(1.0));
        } else {
            prop_assert_eq!(c.tau_b(), None);
        }
    }

    // Perturbation
    #[test]
    fn perturb_removes_floor_of_fraction(
        edges in arb_edges(),
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let graph = graph_from(&edges);
        let mut rng = StdRng::seed_from_u64(seed);
        let thinned = perturb(&graph, fraction, &mut rng).expect("valid fraction");

        let m = graph.edge_count();
        prop_assert_eq!(thinned.edge_count(), m - removal_count(m, fraction));
        prop_assert!(thinned.same_nodes(&graph));
        for (a, b) in thinned.edges() {
            prop_assert!(graph.inner().find_edge(a, b).is_some());
        }
    }

    #[test]
    fn out_of_range_fraction_is_rejected(fraction in prop_oneof![
        -10.0f64..-1e-9,
        1.000_001f64..10.0,
    ]) {
        let graph = graph_from(&[(0, 1), (1, 2)]);
        let mut rng = StdRng::seed_from_u64(0);
        prop_assert!(perturb(&graph, fraction, &mut rng).is_err());
    }
}
