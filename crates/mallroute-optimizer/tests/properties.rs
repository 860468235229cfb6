//! Property checks for `solve` over deterministic pseudo-random floor plans.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use mallroute_optimizer::{
    DistanceMatrix, OptimizerConfig, REFINE_THRESHOLD, Solution, Waypoint, distance, solve,
};

/// Small linear congruential generator so fixtures are reproducible
/// without an RNG dependency.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// One of -1, 0, 1.
    fn floor(&mut self) -> i32 {
        i32::try_from((self.next_u64() >> 60) % 3).unwrap() - 1
    }
}

fn floor_plan(n: usize, seed: u64) -> Vec<Waypoint> {
    let mut rng = Lcg(seed);
    (0..n)
        .map(|i| {
            let x = rng.unit();
            let y = rng.unit();
            let floor = rng.floor();
            Waypoint::new(format!("unit-{i}"), x, y).on_floor(floor)
        })
        .collect()
}

fn configs() -> Vec<OptimizerConfig> {
    let mut out = Vec::new();
    for floor_penalty_weight in [0.0, 0.02, 0.5] {
        for return_to_start in [false, true] {
            out.push(OptimizerConfig {
                floor_penalty_weight,
                return_to_start,
                max_passes: None,
            });
        }
    }
    out
}

/// Independent nearest-neighbor reference working straight from the
/// waypoints rather than through the crate's construction module.
fn reference_nearest_neighbor(waypoints: &[Waypoint], config: &OptimizerConfig) -> Solution {
    let n = waypoints.len();
    let d = |i: usize, j: usize| distance(&waypoints[i], &waypoints[j], config.floor_penalty_weight);
    let mut order = vec![0];
    let mut length = 0.0;
    while order.len() < n {
        let current = *order.last().unwrap();
        let mut best: Option<(usize, f64)> = None;
        for j in 0..n {
            if order.contains(&j) {
                continue;
            }
            let dj = d(current, j);
            match best {
                Some((_, bd)) if dj >= bd => {}
                _ => best = Some((j, dj)),
            }
        }
        let (next, dist) = best.unwrap();
        order.push(next);
        length += dist;
    }
    if config.return_to_start {
        length += d(*order.last().unwrap(), 0);
    }
    Solution { order, length }
}

fn assert_valid_tour(order: &[usize], n: usize) {
    assert_eq!(order.len(), n);
    assert_eq!(order[0], 0);
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..n).collect::<Vec<_>>());
}

#[test]
fn order_is_permutation_starting_at_zero() {
    for n in [1, 2, 3, 7, 10, 11, 24, 50] {
        for seed in [1, 2, 3] {
            let waypoints = floor_plan(n, seed);
            for config in configs() {
                let solution = solve(&waypoints, &config).unwrap();
                assert_valid_tour(&solution.order, n);
                assert!(solution.length >= 0.0);
            }
        }
    }
}

#[test]
fn small_inputs_equal_nearest_neighbor_reference() {
    for n in 2..=REFINE_THRESHOLD {
        for seed in [11, 12, 13, 14] {
            let waypoints = floor_plan(n, seed);
            for config in configs() {
                let solution = solve(&waypoints, &config).unwrap();
                let reference = reference_nearest_neighbor(&waypoints, &config);
                assert_eq!(solution.order, reference.order, "n={n} seed={seed}");
                assert_eq!(
                    solution.length.to_bits(),
                    reference.length.to_bits(),
                    "n={n} seed={seed}"
                );
            }
        }
    }
}

#[test]
fn refinement_never_worsens_nearest_neighbor() {
    for n in [11, 20, 40] {
        for seed in [21, 22, 23] {
            let waypoints = floor_plan(n, seed);
            for config in configs() {
                let solution = solve(&waypoints, &config).unwrap();
                let reference = reference_nearest_neighbor(&waypoints, &config);
                assert!(
                    solution.length <= reference.length,
                    "n={n} seed={seed}: {} > {}",
                    solution.length,
                    reference.length
                );
            }
        }
    }
}

#[test]
fn refinement_shortens_a_known_plan() {
    let waypoints = floor_plan(11, 1);
    let config = OptimizerConfig::default();
    let solution = solve(&waypoints, &config).unwrap();
    let reference = reference_nearest_neighbor(&waypoints, &config);
    assert!(solution.length < reference.length - 0.5);
}

#[test]
fn reported_length_matches_order() {
    let waypoints = floor_plan(35, 5);
    for config in configs() {
        let solution = solve(&waypoints, &config).unwrap();
        let matrix = DistanceMatrix::build(&waypoints, config.floor_penalty_weight);
        let recomputed =
            mallroute_optimizer::tour::tour_length(&matrix, &solution.order, config.return_to_start);
        assert_eq!(solution.length.to_bits(), recomputed.to_bits());
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let waypoints = floor_plan(45, 99);
    for config in configs() {
        let first = solve(&waypoints, &config).unwrap();
        let second = solve(&waypoints, &config).unwrap();
        assert_eq!(first.order, second.order);
        assert_eq!(first.length.to_bits(), second.length.to_bits());
    }
}

#[test]
fn concurrent_calls_agree() {
    let waypoints = floor_plan(40, 8);
    let config = OptimizerConfig::default();
    let expected = solve(&waypoints, &config).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| solve(&waypoints, &config).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn golden_thirty_unit_plan() {
    let waypoints = floor_plan(30, 7);
    let solution = solve(&waypoints, &OptimizerConfig::default()).unwrap();
    assert_eq!(
        solution.order,
        vec![
            0, 25, 5, 6, 17, 27, 4, 24, 7, 19, 15, 3, 11, 14, 29, 8, 28, 20, 9, 16, 23, 2, 21, 1,
            10, 26, 13, 18, 12, 22,
        ]
    );
    assert!((solution.length - 5.031_513_101_785_4).abs() < 1e-9);
}

#[test]
fn pass_cap_bounds_work_but_keeps_a_valid_tour() {
    let waypoints = floor_plan(60, 1);
    let capped = OptimizerConfig {
        max_passes: Some(1),
        ..OptimizerConfig::default()
    };
    let uncapped = solve(&waypoints, &OptimizerConfig::default()).unwrap();
    let solution = solve(&waypoints, &capped).unwrap();
    let reference = reference_nearest_neighbor(&waypoints, &capped);
    assert_valid_tour(&solution.order, 60);
    assert!(solution.length <= reference.length);
    // The capped search is a prefix of the uncapped one.
    assert!(uncapped.length <= solution.length);
}

#[test]
fn heavier_floor_penalty_reduces_floor_changes() {
    let waypoints = floor_plan(30, 4);
    let changes = |weight: f64| {
        let config = OptimizerConfig {
            floor_penalty_weight: weight,
            ..OptimizerConfig::default()
        };
        let order = solve(&waypoints, &config).unwrap().order;
        order
            .windows(2)
            .filter(|w| waypoints[w[0]].floor != waypoints[w[1]].floor)
            .count()
    };
    // Three floors need at least two transitions; a prohibitive penalty
    // should get the tour close to that.
    assert!(changes(10.0) <= changes(0.0));
    assert!(changes(10.0) <= 4);
}
