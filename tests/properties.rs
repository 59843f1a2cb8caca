use proptest::prelude::*;

use mihmds::evaluation::RouteEvaluator;
use mihmds::models::{Customer, Instance};
use mihmds::solver::{HybridSolver, SolverConfig};

const DEPOT: (f64, f64) = (50.0, 50.0);
const CAPACITY: u32 = 60;

/// Raw customer fields: x, y, demand, ready, width, service.
fn customer_fields() -> impl Strategy<Value = (f64, f64, u32, f64, f64, f64)> {
    (
        0.0..100.0f64,
        0.0..100.0f64,
        1..=25u32,
        0.0..300.0f64,
        30.0..400.0f64,
        0.0..10.0f64,
    )
}

fn instance_strategy() -> impl Strategy<Value = Instance> {
    prop::collection::vec(customer_fields(), 1..30).prop_map(|rows| {
        let depot = Customer::depot(DEPOT.0, DEPOT.1, 2000.0);
        let customers = rows
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, demand, ready, width, service))| {
                let reach = ((x - DEPOT.0).powi(2) + (y - DEPOT.1).powi(2)).sqrt();
                // every customer stays servable by a dedicated vehicle
                let due = (ready + width).max(reach + 1.0);
                Customer::new(i + 1, x, y, demand, service).with_time_window(ready, due)
            })
            .collect();
        Instance::new(depot, customers, CAPACITY).expect("unique ids")
    })
}

fn config_strategy() -> impl Strategy<Value = SolverConfig> {
    (0.05..=1.0f64, 1..5usize, 1..6usize, 0..8usize, 0..200usize, any::<u64>()).prop_map(
        |(ratio, min, top_n, rounds, tail, seed)| {
            SolverConfig::default()
                .with_candidate_ratio(ratio)
                .with_min_candidates(min)
                .with_top_n_critical(top_n)
                .with_max_rounds(rounds)
                .with_max_tail_exchange_attempts(tail)
                .with_seed(seed)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_solution_satisfies_invariants(instance in instance_strategy(), config in config_strategy()) {
        let outcome = HybridSolver::new(config).solve(&instance).expect("solvable");
        let violations = outcome.solution.verify(&instance);
        prop_assert!(violations.is_empty(), "{:?}", violations);
        prop_assert!(outcome.solution.is_feasible());
    }

    #[test]
    fn prop_every_customer_served_once(instance in instance_strategy(), config in config_strategy()) {
        let outcome = HybridSolver::new(config).solve(&instance).expect("solvable");
        let mut ids: Vec<usize> = outcome
            .solution
            .routes()
            .iter()
            .flat_map(|r| r.customer_ids().iter().copied())
            .collect();
        ids.sort_unstable();
        let expected: Vec<usize> = (1..=instance.num_customers()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_cached_costs_match_evaluator(instance in instance_strategy(), config in config_strategy()) {
        let outcome = HybridSolver::new(config).solve(&instance).expect("solvable");
        let evaluator = RouteEvaluator::new(&instance);
        for route in outcome.solution.routes() {
            prop_assert!(!route.is_empty());
            let eval = evaluator.evaluate_route(route);
            prop_assert!(eval.feasible);
            prop_assert!(eval.load <= CAPACITY);
            prop_assert!((eval.cost - route.cost()).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_cost_never_increases(instance in instance_strategy(), config in config_strategy()) {
        let max_rounds = config.max_rounds;
        let outcome = HybridSolver::new(config).solve(&instance).expect("solvable");
        let stats = &outcome.stats;
        prop_assert!(stats.rounds <= max_rounds);
        prop_assert_eq!(stats.cost_history.len(), stats.rounds);
        let mut prev = stats.initial_cost;
        for &cost in &stats.cost_history {
            prop_assert!(cost <= prev + 1e-9);
            prev = cost;
        }
        prop_assert!(stats.final_cost <= stats.initial_cost + 1e-9);
    }

    #[test]
    fn prop_same_seed_same_solution(instance in instance_strategy(), config in config_strategy()) {
        let solver = HybridSolver::new(config);
        let a = solver.solve(&instance).expect("solvable");
        let b = solver.solve(&instance).expect("solvable");
        prop_assert_eq!(
            serde_json::to_string(&a.solution).expect("serialize"),
            serde_json::to_string(&b.solution).expect("serialize")
        );
    }
}
