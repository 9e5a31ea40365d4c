use crate::config::K_REGRET_FLOOR;
use crate::sequence::{SequenceTable, ILLEGAL};
use mc_cards::Round;
use mc_clustering::ClusterTable;
use rand::Rng;

/// Regret and (preflop-only) action-count storage, plus the regret-matching
/// policy derived from them. `regrets[round][cluster][sequence][action]` and
/// `counts[cluster][sequence][action]` (preflop only) are dense, immutable
/// in shape, mutable in content — the tensors every training traversal
/// reads and writes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Strategy {
    regrets: [Vec<Vec<Vec<i32>>>; 4],
    counts: Vec<Vec<Vec<u32>>>,
}

impl Strategy {
    pub fn new(table: &SequenceTable, clusters: &ClusterTable) -> Self {
        let regrets = std::array::from_fn(|r| {
            let round = Round::from(r as u8);
            vec![
                vec![vec![0i32; table.action_count(round) as usize]; table.states(round) as usize];
                clusters.num_clusters(round) as usize
            ]
        });
        let counts = vec![
            vec![vec![0u32; table.action_count(Round::Preflop) as usize]; table.states(Round::Preflop) as usize];
            clusters.num_clusters(Round::Preflop) as usize
        ];
        Self { regrets, counts }
    }

    pub fn regret(&self, round: Round, cluster: u32, seq: u32, action: usize) -> i32 {
        self.regrets[round as usize][cluster as usize][seq as usize][action]
    }

    pub fn add_regret(&mut self, round: Round, cluster: u32, seq: u32, action: usize, delta: i64) {
        let slot = &mut self.regrets[round as usize][cluster as usize][seq as usize][action];
        let updated = (*slot as i64) + delta;
        *slot = updated.clamp(K_REGRET_FLOOR as i64, i32::MAX as i64) as i32;
    }

    pub fn add_count(&mut self, cluster: u32, seq: u32, action: usize) {
        self.counts[cluster as usize][seq as usize][action] += 1;
    }

    pub fn count(&self, cluster: u32, seq: u32, action: usize) -> u32 {
        self.counts[cluster as usize][seq as usize][action]
    }

    /// regret-matching policy at an information set: probability proportional
    /// to each action's positive clipped regret, uniform over legal actions
    /// when all clipped regrets are zero.
    pub fn policy(&self, table: &SequenceTable, round: Round, cluster: u32, seq: u32) -> Vec<f32> {
        let width = table.action_count(round) as usize;
        let legal: Vec<bool> = (0..width).map(|a| table.next(round, seq, a) != ILLEGAL).collect();
        let positive: Vec<f32> = (0..width)
            .map(|a| {
                if legal[a] {
                    self.regret(round, cluster, seq, a).max(0) as f32
                } else {
                    0.0
                }
            })
            .collect();
        let sum: f32 = positive.iter().sum();
        if sum > 0.0 {
            positive.iter().map(|&r| r / sum).collect()
        } else {
            let n_legal = legal.iter().filter(|&&l| l).count().max(1) as f32;
            legal.iter().map(|&l| if l { 1.0 / n_legal } else { 0.0 }).collect()
        }
    }

    /// multiplies every regret and count by `d`, matching linear-CFR
    /// discounting; `d = 0.0` is the documented fixpoint that zeroes the
    /// whole strategy.
    pub fn discount(&mut self, d: f32) {
        for round in &mut self.regrets {
            for cluster in round.iter_mut() {
                for seq in cluster.iter_mut() {
                    for slot in seq.iter_mut() {
                        *slot = ((*slot as f32) * d).round() as i32;
                    }
                }
            }
        }
        for cluster in self.counts.iter_mut() {
            for seq in cluster.iter_mut() {
                for slot in seq.iter_mut() {
                    *slot = ((*slot as f32) * d).round() as u32;
                }
            }
        }
    }
}

/// samples an action index by cumulative probability.
pub fn sample(policy: &[f32], rng: &mut impl Rng) -> usize {
    let draw: f32 = rng.gen_range(0.0..1.0);
    let mut acc = 0.0;
    for (i, &p) in policy.iter().enumerate() {
        acc += p;
        if draw < acc {
            return i;
        }
    }
    policy
        .iter()
        .enumerate()
        .filter(|(_, &p)| p > 0.0)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_gameplay::{AbstractAction, Config, Play};

    fn small_actions() -> Vec<AbstractAction> {
        vec![
            AbstractAction {
                play: Play::Fold,
                size_as_pot_fraction: 0.0,
                max_raise_number: usize::MAX,
                min_round: Round::Preflop,
                max_round: Round::River,
                max_players: 0,
                min_pot: 0,
            },
            AbstractAction {
                play: Play::CheckCall,
                size_as_pot_fraction: 0.0,
                max_raise_number: usize::MAX,
                min_round: Round::Preflop,
                max_round: Round::River,
                max_players: 0,
                min_pot: 0,
            },
            AbstractAction {
                play: Play::AllIn,
                size_as_pot_fraction: 0.0,
                max_raise_number: usize::MAX,
                min_round: Round::Preflop,
                max_round: Round::River,
                max_players: 0,
                min_pot: 0,
            },
        ]
    }

    fn fixture() -> (SequenceTable, ClusterTable) {
        let table = SequenceTable::build(small_actions(), Config::default(), vec![500, 500]);
        let clusters = ClusterTable::new(vec![0; 400], vec![0; 400], vec![0; 400]);
        (table, clusters)
    }

    #[test]
    fn discount_zero_is_a_fixpoint() {
        let (table, clusters) = fixture();
        let mut strategy = Strategy::new(&table, &clusters);
        strategy.add_regret(Round::Preflop, 0, 0, 1, 100);
        strategy.add_count(0, 0, 1);
        assert_eq!(strategy.regret(Round::Preflop, 0, 0, 1), 100);
        strategy.discount(0.0);
        assert_eq!(strategy.regret(Round::Preflop, 0, 0, 1), 0);
        assert_eq!(strategy.count(0, 0, 1), 0);
    }

    #[test]
    fn policy_is_a_distribution_given_uniform_regrets() {
        let (table, clusters) = fixture();
        let strategy = Strategy::new(&table, &clusters);
        let policy = strategy.policy(&table, Round::Preflop, 0, 0);
        let sum: f32 = policy.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        let legal = table.num_legal_actions(Round::Preflop, 0) as usize;
        assert_eq!(policy.iter().filter(|&&p| p > 0.0).count(), legal);
    }
}
