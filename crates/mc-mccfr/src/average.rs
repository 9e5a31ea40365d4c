use crate::engine::Engine;
use crate::sequence::SequenceTable;
use crate::strategy::{sample, Strategy};
use mc_cards::Round;
use mc_clustering::ClusterTable;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Accumulated snapshots of a `Strategy`'s policy, same shape as `Strategy`
/// but `f64`-valued so repeated `add_assign` calls don't lose precision.
/// Preflop stores accumulated action counts directly; later rounds store
/// accumulated regret-matching probabilities.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Average {
    weights: [Vec<Vec<Vec<f64>>>; 4],
    normalized: bool,
}

impl Average {
    fn shaped(table: &SequenceTable, clusters: &ClusterTable) -> [Vec<Vec<Vec<f64>>>; 4] {
        std::array::from_fn(|r| {
            let round = Round::from(r as u8);
            vec![
                vec![vec![0f64; table.action_count(round) as usize]; table.states(round) as usize];
                clusters.num_clusters(round) as usize
            ]
        })
    }

    pub fn initial_average(table: &SequenceTable, clusters: &ClusterTable, strategy: &Strategy) -> Self {
        let mut avg = Self {
            weights: Self::shaped(table, clusters),
            normalized: false,
        };
        avg.add_assign(table, clusters, strategy);
        avg
    }

    pub fn add_assign(&mut self, table: &SequenceTable, clusters: &ClusterTable, strategy: &Strategy) {
        for round in mc_cards::Round::all() {
            let r = round as usize;
            for cluster in 0..clusters.num_clusters(round) {
                for seq in 0..table.states(round) {
                    if round == Round::Preflop {
                        let width = table.action_count(round) as usize;
                        for a in 0..width {
                            self.weights[r][cluster as usize][seq as usize][a] +=
                                strategy.count(cluster, seq, a) as f64;
                        }
                    } else {
                        let policy = strategy.policy(table, round, cluster, seq);
                        for (a, p) in policy.into_iter().enumerate() {
                            self.weights[r][cluster as usize][seq as usize][a] += p as f64;
                        }
                    }
                }
            }
        }
    }

    pub fn normalize(&mut self) {
        for round in self.weights.iter_mut() {
            for cluster in round.iter_mut() {
                for seq in cluster.iter_mut() {
                    let sum: f64 = seq.iter().sum();
                    if sum > 0.0 {
                        for slot in seq.iter_mut() {
                            *slot /= sum;
                        }
                    }
                }
            }
        }
        self.normalized = true;
    }

    pub fn policy(&self, round: Round, cluster: u32, seq: u32) -> Vec<f32> {
        let row = &self.weights[round as usize][cluster as usize][seq as usize];
        let sum: f64 = row.iter().sum();
        if sum <= 0.0 {
            let n = row.len().max(1) as f32;
            return vec![1.0 / n; row.len()];
        }
        row.iter().map(|&w| (w / sum) as f32).collect()
    }

    /// plays `means * trials` self-play hands with this average in seat 0
    /// against `other` in the remaining seats, returning the mean chip
    /// differential for each of the `means` batches of `trials` hands.
    pub fn battle_stats(&self, engine: &Engine, other: &Average, means: usize, trials: usize) -> Vec<f64> {
        (0..means)
            .into_par_iter()
            .map(|batch| {
                let mut rng = SmallRng::seed_from_u64(0xBA77E + batch as u64);
                let mut total = 0f64;
                for _ in 0..trials {
                    total += self.play_one_hand(engine, other, &mut rng);
                }
                total / trials as f64
            })
            .collect()
    }

    fn play_one_hand(&self, engine: &Engine, other: &Average, rng: &mut SmallRng) -> f64 {
        let mut node = engine.deal_root(rng);
        let mut seq = 0u32;
        while node.in_progress() {
            let round = node.round();
            let acting = node.acting_seat();
            let hole = node.hole(acting).expect("acting seat has hole cards");
            let cluster = engine.clusters.cluster(round, hole, node.board());
            let policy = if acting == 0 {
                self.policy(round, cluster, seq)
            } else {
                other.policy(round, cluster, seq)
            };
            let a = sample(&policy, rng);
            let next_id = engine.table.next(round, seq, a);
            let def = engine.table.action_def(a);
            let action = SequenceTable::concretize(&def, &node).expect("average only samples legal actions");
            node.apply(action).expect("legal action from sequence table");
            seq = if next_id == crate::sequence::LEAF { 0 } else { next_id };
        }
        let committed = engine.stacks[0] - node.seats()[0].stack;
        let awards = node
            .award_pot(mc_gameplay::AwardMode::SingleRun, mc_cards::rank)
            .expect("terminal node resolves its pot");
        (awards[0] - committed) as f64
    }
}
