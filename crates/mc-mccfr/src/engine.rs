use crate::config::{K_PRUNE_CONSTANT, K_PRUNE_THRESHOLD};
use crate::sequence::{SequenceTable, ILLEGAL, LEAF};
use crate::strategy::{sample, Strategy};
use mc_cards::Round;
use mc_clustering::ClusterTable;
use mc_gameplay::{AwardMode, Chips, Config as GameConfig, Node};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Owns the immutable tables a training run walks: the abstracted game
/// tree and the card-bucket lookup. `traverse`/`update_strategy` read and
/// write a shared `Strategy` through a `Mutex`, a simpler and still-safe
/// substitute for the lock-free atomic tensor the design notes describe as
/// tolerable-race alternative (b); see the grounding ledger.
pub struct Engine {
    pub table: SequenceTable,
    pub clusters: ClusterTable,
    pub config: GameConfig,
    pub stacks: Vec<Chips>,
}

impl Engine {
    pub fn new(table: SequenceTable, clusters: ClusterTable, config: GameConfig, stacks: Vec<Chips>) -> Self {
        Self { table, clusters, config, stacks }
    }

    pub fn deal_root(&self, rng: &mut SmallRng) -> Node {
        let mut node = Node::new(self.config, self.stacks.clone());
        node.new_hand(rng, 0).expect("structural root must always deal");
        node
    }

    fn cluster_of(&self, node: &Node, seat: usize) -> u32 {
        let hole = node.hole(seat).expect("acting seat must hold cards");
        self.clusters.cluster(node.round(), hole, node.board())
    }

    fn step(&self, node: &Node, seq: u32, action_index: usize) -> (Node, u32) {
        let round = node.round();
        let next_id = self.table.next(round, seq, action_index);
        let def = self.table.action_def(action_index);
        let action = SequenceTable::concretize(&def, node).expect("sequence table only offers legal actions");
        let mut child = node.clone();
        child.apply(action).expect("action legal per sequence table");
        (child, if next_id == LEAF { 0 } else { next_id })
    }

    fn utility(&self, node: &Node, player: usize) -> f32 {
        let mut terminal = node.clone();
        let committed = self.stacks[player] - terminal.seats()[player].stack;
        let awards = terminal
            .award_pot(AwardMode::SingleRun, mc_cards::rank)
            .expect("a terminal node always resolves its pot");
        (awards[player] - committed) as f32
    }

    /// external-sampling MCCFR: recurses to a terminal and returns the
    /// counterfactual value for `player`, updating their regrets in place.
    pub fn traverse(
        &self,
        node: &Node,
        seq: u32,
        strategy: &Mutex<Strategy>,
        player: usize,
        prune: bool,
        rng: &mut SmallRng,
    ) -> f32 {
        if !node.in_progress() {
            return self.utility(node, player);
        }
        let round = node.round();
        let acting = node.acting_seat();
        let cluster = self.cluster_of(node, acting);
        let seq_id = seq;
        let policy = strategy.lock().unwrap().policy(&self.table, round, cluster, seq_id);

        if acting != player {
            let a = sample(&policy, rng);
            let (child, child_seq) = self.step(node, seq, a);
            return self.traverse(&child, child_seq, strategy, player, prune, rng);
        }

        let width = self.table.action_count(round) as usize;
        let mut utils = vec![0f32; width];
        let mut explored = Vec::with_capacity(width);
        let mut value = 0f32;
        for a in 0..width {
            if self.table.next(round, seq, a) == ILLEGAL {
                continue;
            }
            if prune {
                let regret = strategy.lock().unwrap().regret(round, cluster, seq_id, a);
                let is_leaf_only_branch = self.table.next(round, seq, a) == LEAF;
                // skip a negative-regret branch with probability
                // `K_PRUNE_THRESHOLD`, not unconditionally, so the traversal
                // stays an unbiased estimator of the pruned player's regret.
                if regret <= K_PRUNE_CONSTANT && !is_leaf_only_branch && rng.random::<f64>() < K_PRUNE_THRESHOLD {
                    continue;
                }
            }
            let (child, child_seq) = self.step(node, seq, a);
            let u = self.traverse(&child, child_seq, strategy, player, prune, rng);
            utils[a] = u;
            value += policy[a] * u;
            explored.push(a);
        }
        let mut guard = strategy.lock().unwrap();
        for a in explored {
            let delta = (utils[a] - value) as f64;
            guard.add_regret(round, cluster, seq_id, a, delta.round() as i64);
        }
        value
    }

    /// cheap preflop-only pass that samples one action per decision and
    /// accumulates action counts for `player`, feeding the average strategy.
    pub fn update_strategy(
        &self,
        node: &Node,
        seq: u32,
        strategy: &Mutex<Strategy>,
        player: usize,
        rng: &mut SmallRng,
    ) {
        if !node.in_progress() || node.round() != Round::Preflop {
            return;
        }
        let acting = node.acting_seat();
        let cluster = self.cluster_of(node, acting);
        let policy = strategy.lock().unwrap().policy(&self.table, Round::Preflop, cluster, seq);
        let a = sample(&policy, rng);
        if acting == player {
            strategy.lock().unwrap().add_count(cluster, seq, a);
        }
        let (child, child_seq) = self.step(node, seq, a);
        self.update_strategy(&child, child_seq, strategy, player, rng);
    }
}

/// Spawns `n_threads` workers that perpetually traverse on behalf of each
/// player in turn, polling `should_continue` between iterations so
/// cancellation is bounded by a single traversal.
pub fn train(
    engine: Arc<Engine>,
    strategy: Arc<Mutex<Strategy>>,
    n_threads: usize,
    should_continue: Arc<std::sync::atomic::AtomicBool>,
    strategy_interval: u64,
    prune_enabled: Arc<std::sync::atomic::AtomicBool>,
    strategy_enabled: Arc<std::sync::atomic::AtomicBool>,
) -> Vec<std::thread::JoinHandle<()>> {
    (0..n_threads)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            let strategy = Arc::clone(&strategy);
            let should_continue = Arc::clone(&should_continue);
            let prune_enabled = Arc::clone(&prune_enabled);
            let strategy_enabled = Arc::clone(&strategy_enabled);
            std::thread::spawn(move || {
                let mut rng = SmallRng::from_rng(&mut rand::rng());
                let players = engine.stacks.len();
                let mut iteration: u64 = 0;
                while should_continue.load(std::sync::atomic::Ordering::Acquire) {
                    let player = (worker + iteration as usize) % players;
                    let root = engine.deal_root(&mut rng);
                    if strategy_enabled.load(std::sync::atomic::Ordering::Relaxed) && iteration % strategy_interval == 0 {
                        engine.update_strategy(&root, 0, &strategy, player, &mut rng);
                    }
                    let prune = prune_enabled.load(std::sync::atomic::Ordering::Relaxed);
                    engine.traverse(&root, 0, &strategy, player, prune, &mut rng);
                    iteration += 1;
                }
            })
        })
        .collect()
}
