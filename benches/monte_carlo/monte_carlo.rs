use criterion::{criterion_group, criterion_main, Criterion};
use netsis::random::rng_from_seed;
use netsis::{Graph, InfectionRule, MonteCarlo, ParametersBuilder};

static NODES: usize = 800;
static SEED: u64 = 123;

// A ring lattice where every node is linked to its `k` nearest neighbors on each side.
fn ring_lattice(n: usize, k: usize) -> Graph {
    let labels: Vec<String> = (0..n).map(|i| i.to_string()).collect();
    let edges = (0..n).flat_map(|i| (1..=k).map(move |offset| (i, (i + offset) % n)));
    Graph::from_edges(edges.map(|(a, b)| (labels[a].as_str(), labels[b].as_str())))
        .expect("ring lattice has no self-loops")
}

fn engine_parameters(rule: InfectionRule) -> netsis::Parameters {
    ParametersBuilder::default()
        .beta(0.3)
        .mu(0.5)
        .p0(0.2)
        .rep(4)
        .t_max(200)
        .t_trans(150)
        .infection_rule(rule)
        .build()
        .expect("valid parameters")
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let graph = ring_lattice(NODES, 3);

    c.bench_function("monte carlo sequential rule", |bencher| {
        let engine = MonteCarlo::new(&graph, engine_parameters(InfectionRule::Sequential));
        bencher.iter(|| engine.run(&mut rng_from_seed(SEED)).unwrap());
    });

    c.bench_function("monte carlo exact rule", |bencher| {
        let engine = MonteCarlo::new(&graph, engine_parameters(InfectionRule::Exact));
        bencher.iter(|| engine.run(&mut rng_from_seed(SEED)).unwrap());
    });

    c.bench_function("monte carlo parallel trials", |bencher| {
        let engine = MonteCarlo::new(&graph, engine_parameters(InfectionRule::Sequential));
        bencher.iter(|| engine.run_parallel(SEED).unwrap());
    });
}

criterion_group!(monte_carlo_benches, criterion_benchmark);
criterion_main!(monte_carlo_benches);
