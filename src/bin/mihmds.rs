use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;
use tracing::info;

use mihmds::constructive::InsertionOrder;
use mihmds::io::load_solomon;
use mihmds::local_search::Operator;
use mihmds::models::Solution;
use mihmds::solver::{HybridSolver, SolveStats, SolverConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Solomon-format instance file
    instance: PathBuf,

    /// Keep only the first N customers
    #[arg(long)]
    customers: Option<usize>,

    /// Seed of the insertion sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of insertion slots sampled per customer, in (0, 1]
    #[arg(long)]
    candidate_ratio: Option<f64>,

    /// Minimum insertion slots sampled per customer
    #[arg(long)]
    min_candidates: Option<usize>,

    /// Critical routes improved per round
    #[arg(long)]
    top_n: Option<usize>,

    /// Maximum improvement rounds
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Cut pairs evaluated per tail-exchange search
    #[arg(long)]
    tail_attempts: Option<usize>,

    /// Swap candidates evaluated per call
    #[arg(long)]
    swap_attempts: Option<usize>,

    /// Relocate candidates evaluated per call and phase
    #[arg(long)]
    relocate_attempts: Option<usize>,

    /// Operator restarts per critical route per round
    #[arg(long)]
    route_passes: Option<usize>,

    /// Reversals evaluated per 2-opt call (0 disables 2-opt)
    #[arg(long)]
    two_opt_attempts: Option<usize>,

    /// Chain moves evaluated per or-opt call (0 disables or-opt)
    #[arg(long)]
    or_opt_attempts: Option<usize>,

    /// Destinations tried per route-merge call (0 disables merging)
    #[arg(long)]
    merge_attempts: Option<usize>,

    /// Wall-clock budget in milliseconds, checked between rounds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Customer placement order during construction
    #[arg(long, value_enum)]
    order: Option<Order>,

    /// JSON solver configuration (e.g. criticality weights); flags override it
    #[arg(long = "config", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Print config, solution, and statistics as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Input,
    Urgency,
}

impl From<Order> for InsertionOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Input => InsertionOrder::Input,
            Order::Urgency => InsertionOrder::Urgency,
        }
    }
}

impl Cli {
    /// The `--config` file, or the defaults, with every given flag applied.
    fn config(&self) -> Result<SolverConfig, anyhow::Error> {
        let base = match &self.config_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
            }
            None => SolverConfig::default(),
        };
        Ok(self.overlay(base))
    }

    fn overlay(&self, base: SolverConfig) -> SolverConfig {
        SolverConfig {
            candidate_ratio: self.candidate_ratio.unwrap_or(base.candidate_ratio),
            min_candidates: self.min_candidates.unwrap_or(base.min_candidates),
            top_n_critical: self.top_n.unwrap_or(base.top_n_critical),
            max_rounds: self.max_rounds.unwrap_or(base.max_rounds),
            max_tail_exchange_attempts: self.tail_attempts.unwrap_or(base.max_tail_exchange_attempts),
            random_seed: self.seed.unwrap_or(base.random_seed),
            max_swap_attempts: self.swap_attempts.unwrap_or(base.max_swap_attempts),
            max_relocate_attempts: self.relocate_attempts.unwrap_or(base.max_relocate_attempts),
            max_route_passes: self.route_passes.unwrap_or(base.max_route_passes),
            max_two_opt_attempts: self.two_opt_attempts.unwrap_or(base.max_two_opt_attempts),
            max_or_opt_attempts: self.or_opt_attempts.unwrap_or(base.max_or_opt_attempts),
            max_merge_attempts: self.merge_attempts.unwrap_or(base.max_merge_attempts),
            insertion_order: self.order.map_or(base.insertion_order, Into::into),
            time_limit: self.time_limit_ms.map(Duration::from_millis).or(base.time_limit),
            criticality: base.criticality,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    instance: &'a str,
    config: &'a SolverConfig,
    solution: &'a Solution,
    stats: &'a SolveStats,
    improvement_pct: f64,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let loaded = load_solomon(&cli.instance, cli.customers)
        .with_context(|| format!("loading {}", cli.instance.display()))?;
    info!(
        name = %loaded.name,
        customers = loaded.instance.num_customers(),
        capacity = loaded.instance.capacity(),
        "instance ready"
    );

    let config = cli.config()?;
    let outcome = HybridSolver::new(config.clone())
        .solve(&loaded.instance)
        .with_context(|| format!("solving {}", loaded.name))?;

    if cli.json {
        let report = Report {
            instance: &loaded.name,
            config: &config,
            solution: &outcome.solution,
            stats: &outcome.stats,
            improvement_pct: outcome.stats.improvement_pct(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&loaded.name, &outcome.solution, &outcome.stats);
    Ok(())
}

fn print_summary(name: &str, solution: &Solution, stats: &SolveStats) {
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec!["", "construction", "final"]);
    summary.add_row(vec![
        "cost".to_string(),
        format!("{:.2}", stats.initial_cost),
        format!("{:.2}", stats.final_cost),
    ]);
    summary.add_row(vec![
        "vehicles".to_string(),
        stats.initial_vehicles.to_string(),
        stats.final_vehicles.to_string(),
    ]);
    summary.add_row(vec![
        "time (ms)".to_string(),
        stats.build_time.as_millis().to_string(),
        stats.total_time.as_millis().to_string(),
    ]);

    println!("{name}");
    println!("{summary}");
    println!(
        "rounds: {} ({:?}), improvement: {:.2}%",
        stats.rounds,
        stats.termination,
        stats.improvement_pct()
    );
    let moves: Vec<String> = Operator::ALL
        .iter()
        .map(|&op| format!("{}={}", op.name(), stats.moves.get(op)))
        .collect();
    println!("accepted moves: {}", moves.join(", "));

    let mut routes = Table::new();
    routes
        .load_preset(UTF8_FULL)
        .set_header(vec!["route", "stops", "load", "cost", "departure", "customers"]);
    for (i, route) in solution.routes().iter().enumerate() {
        let ids: Vec<String> = route.customer_ids().iter().map(ToString::to_string).collect();
        routes.add_row(vec![
            i.to_string(),
            route.len().to_string(),
            route.load().to_string(),
            format!("{:.2}", route.cost()),
            format!("{:.2}", route.departure_time()),
            ids.join(" "),
        ]);
    }
    println!("{routes}");
}
