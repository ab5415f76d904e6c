use netsis::rand::RngCore;
use netsis::random::{rng_from_seed, SimRng};
use netsis::{
    EpidemicState, Graph, InfectionRule, InfectionStatus, MonteCarlo, Parameters,
    ParametersBuilder, SisError,
};

fn ring(n: usize) -> Graph {
    let labels: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    Graph::from_edges((0..n).map(|i| (labels[i].as_str(), labels[(i + 1) % n].as_str()))).unwrap()
}

fn complete_graph(n: usize) -> Graph {
    let labels: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    let adjacency = (0..n).map(|i| {
        let neighbors: Vec<&str> = (0..n)
            .filter(|&j| j != i)
            .map(|j| labels[j].as_str())
            .collect();
        (labels[i].as_str(), neighbors)
    });
    Graph::from_adjacency(adjacency).unwrap()
}

/// Wraps a generator and counts how many values were drawn from it.
struct CountingRng {
    inner: SimRng,
    draws: usize,
}

impl CountingRng {
    fn new(seed: u64) -> Self {
        CountingRng {
            inner: rng_from_seed(seed),
            draws: 0,
        }
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.draws += 1;
        self.inner.fill_bytes(dst);
    }
}

#[test]
fn ring_everyone_stays_infected() {
    let graph = ring(4);
    let parameters = ParametersBuilder::default()
        .beta(1.0)
        .mu(0.0)
        .p0(1.0)
        .rep(1)
        .t_max(5)
        .t_trans(0)
        .build()
        .unwrap();
    let result = MonteCarlo::new(&graph, parameters)
        .run(&mut rng_from_seed(0))
        .unwrap();
    assert_eq!(result.last_trial, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    assert_eq!(result.mean_prevalence, 1.0);
}

#[test]
fn ring_everyone_recovers_at_once() {
    let graph = ring(4);
    let parameters = ParametersBuilder::default()
        .beta(0.0)
        .mu(1.0)
        .p0(1.0)
        .rep(1)
        .t_max(3)
        .t_trans(0)
        .build()
        .unwrap();
    let result = MonteCarlo::new(&graph, parameters)
        .run(&mut rng_from_seed(0))
        .unwrap();
    assert_eq!(result.last_trial, vec![1.0, 0.0, 0.0]);
    assert!((result.mean_prevalence - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn partition_holds_for_many_parameters() {
    let graph = ring(25);
    let mut rng = rng_from_seed(99);
    let mut state = EpidemicState::new(graph.node_count());
    for beta in [0.0, 0.3, 1.0] {
        for mu in [0.0, 0.5, 1.0] {
            for rule in [InfectionRule::Sequential, InfectionRule::Exact] {
                state.initialize(0.3, &mut rng);
                assert!(state.check_partition());
                for _ in 0..50 {
                    state.step(&graph, beta, mu, rule, &mut rng);
                    assert!(state.check_partition());
                    let covered = state.infected().len() + state.susceptible().len();
                    assert_eq!(covered, graph.node_count());
                }
            }
        }
    }
}

#[test]
fn no_transmission_dies_out() {
    let graph = complete_graph(50);
    let parameters = ParametersBuilder::default()
        .beta(0.0)
        .mu(0.5)
        .p0(0.5)
        .rep(10)
        .t_max(60)
        .t_trans(40)
        .build()
        .unwrap();
    let result = MonteCarlo::new(&graph, parameters)
        .run(&mut rng_from_seed(17))
        .unwrap();
    assert!(result.mean_prevalence < 0.05);
    assert_eq!(result.last_trial.last(), Some(&0.0));

    let series = &result.last_trial;
    assert!(series.windows(2).all(|pair| pair[1] <= pair[0]));
}

#[test]
fn no_recovery_never_shrinks_infected_set() {
    let graph = ring(30);
    let mut rng = rng_from_seed(5);
    let mut state = EpidemicState::new(graph.node_count());
    state.initialize(0.1, &mut rng);

    for _ in 0..100 {
        let before = state.infected().clone();
        state.step(&graph, 0.3, 0.0, InfectionRule::Sequential, &mut rng);
        assert!(before.iter().all(|node| state.is_infected(*node)));
        assert!(state.infected_count() >= before.len());
    }
}

#[test]
fn isolated_node_is_never_infected() {
    let mut graph = Graph::from_edges([("a", "b"), ("b", "c"), ("c", "a")]).unwrap();
    let isolated = graph.add_node("alone");
    let mut rng = rng_from_seed(21);
    let mut state = EpidemicState::new(graph.node_count());
    for node in graph.nodes() {
        if node != isolated {
            state.set_status(node, InfectionStatus::Infected);
        }
    }

    for rule in [InfectionRule::Sequential, InfectionRule::Exact] {
        for _ in 0..100 {
            state.step(&graph, 1.0, 0.0, rule, &mut rng);
            assert_eq!(state.status(isolated), InfectionStatus::Susceptible);
        }
    }
    assert_eq!(state.infected_count(), 3);
}

#[test]
fn isolated_infected_node_can_recover() {
    let mut graph = Graph::new();
    let isolated = graph.add_node("alone");
    let mut state = EpidemicState::new(1);
    state.set_status(isolated, InfectionStatus::Infected);
    let prevalence = state.step(&graph, 1.0, 1.0, InfectionRule::Sequential, &mut rng_from_seed(0));
    assert_eq!(prevalence, 0.0);
}

#[test]
fn fixed_seed_is_reproducible() {
    let graph = complete_graph(20);
    let parameters = ParametersBuilder::default()
        .beta(0.1)
        .mu(0.4)
        .p0(0.2)
        .rep(5)
        .t_max(100)
        .t_trans(50)
        .build()
        .unwrap();
    let engine = MonteCarlo::new(&graph, parameters);

    let first = engine.run(&mut rng_from_seed(1234)).unwrap();
    let second = engine.run(&mut rng_from_seed(1234)).unwrap();
    assert_eq!(first.mean_prevalence.to_bits(), second.mean_prevalence.to_bits());
    assert_eq!(first.last_trial, second.last_trial);

    assert_eq!(engine.run_seeded(1234).unwrap(), engine.run_parallel(1234).unwrap());
}

#[test]
fn invalid_configuration_draws_nothing() {
    let graph = ring(4);
    let parameters = Parameters {
        beta: 0.5,
        mu: 0.5,
        p0: 0.5,
        rep: 3,
        t_max: 10,
        t_trans: 10,
        infection_rule: InfectionRule::Sequential,
    };
    let engine = MonteCarlo::new(&graph, parameters);
    let mut rng = CountingRng::new(0);

    let result = engine.run(&mut rng);
    assert!(matches!(result, Err(SisError::InvalidConfiguration(_))));
    assert_eq!(rng.draws, 0);
}

#[test]
fn out_of_range_probability_draws_nothing() {
    let graph = ring(4);
    let engine = MonteCarlo::new(
        &graph,
        Parameters {
            mu: -0.1,
            ..Parameters::default()
        },
    );
    let mut rng = CountingRng::new(0);
    assert!(matches!(
        engine.run(&mut rng),
        Err(SisError::OutOfRangeParameter { name: "mu", .. })
    ));
    assert_eq!(rng.draws, 0);
}

#[test]
fn valid_run_draws_from_the_given_generator() {
    let graph = ring(4);
    let parameters = ParametersBuilder::default()
        .beta(0.5)
        .mu(0.5)
        .p0(0.5)
        .rep(2)
        .t_max(10)
        .t_trans(5)
        .build()
        .unwrap();
    let mut rng = CountingRng::new(0);
    MonteCarlo::new(&graph, parameters).run(&mut rng).unwrap();
    // At least one draw per node for each initial condition.
    assert!(rng.draws >= 2 * graph.node_count());
}

#[test]
fn rules_agree_at_certain_outcomes() {
    let graph = ring(12);
    for beta in [0.0, 1.0] {
        let mut results = Vec::new();
        for rule in [InfectionRule::Sequential, InfectionRule::Exact] {
            let mut state = EpidemicState::new(graph.node_count());
            state.set_status(0, InfectionStatus::Infected);
            let mut rng = rng_from_seed(3);
            let series: Vec<f64> = (0..6)
                .map(|_| state.step(&graph, beta, 0.0, rule, &mut rng))
                .collect();
            results.push(series);
        }
        assert_eq!(results[0], results[1]);
    }
}

#[test]
fn exact_rule_infects_at_closed_form_rate() {
    // A star whose leaves are all infected: the center has k = 4 infected neighbors and is
    // infected with probability 1 - (1 - beta)^4 under the exact rule.
    let graph = Graph::from_edges([("c", "1"), ("c", "2"), ("c", "3"), ("c", "4")]).unwrap();
    let center = graph.node_id("c").unwrap();
    let beta = 0.2;
    let expected = InfectionRule::exact_probability(beta, 4);
    let mut rng = rng_from_seed(8);
    let trials = 20_000;
    let mut infected = 0;
    for _ in 0..trials {
        let mut state = EpidemicState::new(graph.node_count());
        for leaf in graph.neighbors(center) {
            state.set_status(*leaf, InfectionStatus::Infected);
        }
        state.step(&graph, beta, 0.0, InfectionRule::Exact, &mut rng);
        if state.is_infected(center) {
            infected += 1;
        }
    }
    let observed = f64::from(infected) / f64::from(trials);
    assert!((observed - expected).abs() < 0.02);
}

/// A star whose four leaves are infected and whose center is susceptible.
fn infected_star() -> (Graph, EpidemicState) {
    let graph = Graph::from_edges([("c", "1"), ("c", "2"), ("c", "3"), ("c", "4")]).unwrap();
    let mut state = EpidemicState::new(graph.node_count());
    let center = graph.node_id("c").unwrap();
    for &leaf in graph.neighbors(center) {
        state.set_status(leaf, InfectionStatus::Infected);
    }
    (graph, state)
}

#[test]
fn sequential_rule_stops_at_first_transmission() {
    let k = 4;

    // Every leaf draws for recovery; the center's first draw already infects it.
    let (graph, mut state) = infected_star();
    let mut rng = CountingRng::new(0);
    state.step(&graph, 1.0, 0.0, InfectionRule::Sequential, &mut rng);
    assert_eq!(rng.draws, k + 1);
    assert_eq!(state.infected_count(), k + 1);

    // Without transmission the center draws once per infected neighbor.
    let (graph, mut state) = infected_star();
    let mut rng = CountingRng::new(0);
    state.step(&graph, 0.0, 0.0, InfectionRule::Sequential, &mut rng);
    assert_eq!(rng.draws, k + k);
    assert_eq!(state.infected_count(), k);
}

#[test]
fn exact_rule_draws_once_per_exposed_node() {
    for beta in [0.0, 1.0] {
        let (graph, mut state) = infected_star();
        let mut rng = CountingRng::new(0);
        state.step(&graph, beta, 0.0, InfectionRule::Exact, &mut rng);
        assert_eq!(rng.draws, 4 + 1);
    }
}
