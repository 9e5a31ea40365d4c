use mc_cards::Round;
use mc_gameplay::{AbstractAction, Action, Chips, Config, Node, Play};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub const LEAF: u32 = u32::MAX - 1;
pub const ILLEGAL: u32 = u32::MAX;

/// Dense, statically-built map from `(round, sequence_id, action_index)` to
/// the next sequence id, `LEAF`, or `ILLEGAL`. Built once from a seat-count
/// and stack template by exhaustively walking every action in the supplied
/// abstraction from the root; immutable for the rest of a training run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SequenceTable {
    actions: Vec<AbstractAction>,
    next: [Vec<Vec<u32>>; 4],
    legal_offset: [Vec<u64>; 4],
}

impl SequenceTable {
    pub fn build(actions: Vec<AbstractAction>, config: Config, stacks: Vec<Chips>) -> Self {
        // the structural walk below never reads card contents, so a fixed
        // seed is sufficient and keeps the resulting table deterministic.
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut root = Node::new(config, stacks);
        root.new_hand(&mut rng, 0).expect("structural root deal");

        let mut table = Self {
            actions,
            next: Default::default(),
            legal_offset: Default::default(),
        };
        let mut counters = [0u32; 4];
        table.visit(root, &mut counters);
        table.index_legal_offsets();
        table
    }

    pub fn action_def(&self, index: usize) -> AbstractAction {
        self.actions[index]
    }

    pub fn concretize(def: &AbstractAction, node: &Node) -> Option<Action> {
        let seat = node.acting_seat();
        match def.play {
            Play::Fold => node.can_fold().then_some(Action::Fold),
            Play::CheckCall => node.can_check_call().then(|| {
                let owed = node.to_call(seat);
                if owed == 0 {
                    Action::Check
                } else {
                    Action::Call(owed)
                }
            }),
            Play::AllIn => {
                let stack = node.seats()[seat].stack;
                (node.in_progress() && stack > 0).then_some(Action::Shove(stack))
            }
            Play::Bet => {
                let size = ((node.pot() as f64) * def.size_as_pot_fraction as f64).round() as Chips;
                let total_bet = node.max_bet() + size.max(1);
                node.can_bet(total_bet).then_some(Action::Raise(total_bet))
            }
        }
    }

    fn visit(&mut self, node: Node, counters: &mut [u32; 4]) -> u32 {
        let round_idx = node.round() as usize;
        let seq = counters[round_idx];
        counters[round_idx] += 1;
        self.next[round_idx].push(vec![ILLEGAL; self.actions.len()]);

        for a_idx in 0..self.actions.len() {
            let def = self.actions[a_idx];
            if !def.admits(node.round(), node.raises_this_round(), node.contestants(), node.pot()) {
                continue;
            }
            let Some(action) = Self::concretize(&def, &node) else {
                continue;
            };
            let mut child = node.clone();
            if let Ok(still_in_progress) = child.apply(action) {
                let transition = if !still_in_progress {
                    LEAF
                } else {
                    self.visit(child, counters)
                };
                self.next[round_idx][seq as usize][a_idx] = transition;
            }
        }
        seq
    }

    fn index_legal_offsets(&mut self) {
        for r in 0..4 {
            let mut offset = 0u64;
            let mut offsets = Vec::with_capacity(self.next[r].len());
            for row in &self.next[r] {
                offsets.push(offset);
                offset += row.iter().filter(|&&x| x != ILLEGAL).count() as u64;
            }
            self.legal_offset[r] = offsets;
        }
    }

    pub fn states(&self, round: Round) -> u32 {
        self.next[round as usize].len() as u32
    }

    pub fn action_count(&self, _round: Round) -> u8 {
        self.actions.len() as u8
    }

    pub fn next(&self, round: Round, seq: u32, action: usize) -> u32 {
        self.next[round as usize][seq as usize][action]
    }

    pub fn num_legal_actions(&self, round: Round, seq: u32) -> u8 {
        self.next[round as usize][seq as usize]
            .iter()
            .filter(|&&x| x != ILLEGAL)
            .count() as u8
    }

    pub fn legal_offset(&self, round: Round, seq: u32) -> u64 {
        self.legal_offset[round as usize][seq as usize]
    }

    /// the abstract actions whose round window intersects `round`.
    pub fn actions(&self, round: Round) -> Vec<&AbstractAction> {
        self.actions
            .iter()
            .filter(|a| (round as u8) >= (a.min_round as u8) && (round as u8) <= (a.max_round as u8))
            .collect()
    }
}
