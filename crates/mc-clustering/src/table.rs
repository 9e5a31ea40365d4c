use mc_cards::{Board, ColexIndexer, Hole, Indexer, Round};

const PREFLOP_CLASSES: u32 = 169;
const POSTFLOP_BUCKETS: u32 = 200;

/// Four per-round lookup tables mapping a canonical hand index to a small
/// cluster id. Preflop uses the identity map over its 169 starting-hand
/// classes; flop/turn/river are loaded from externally trained bucket files
/// (the K-means training that produces them is out of scope here).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClusterTable {
    preflop: Vec<u32>,
    flop: Vec<u32>,
    turn: Vec<u32>,
    river: Vec<u32>,
}

impl ClusterTable {
    /// Builds a table with the conventional preflop identity map and the
    /// given externally-trained postflop bucket assignments.
    pub fn new(flop: Vec<u32>, turn: Vec<u32>, river: Vec<u32>) -> Self {
        Self {
            preflop: (0..PREFLOP_CLASSES).collect(),
            flop,
            turn,
            river,
        }
    }

    fn table(&self, round: Round) -> &[u32] {
        match round {
            Round::Preflop => &self.preflop,
            Round::Flop => &self.flop,
            Round::Turn => &self.turn,
            Round::River => &self.river,
        }
    }

    pub fn num_clusters(&self, round: Round) -> u32 {
        match round {
            Round::Preflop => PREFLOP_CLASSES,
            _ => POSTFLOP_BUCKETS,
        }
    }

    /// preflop hand class for a hole pair, using the canonical index of the
    /// two hole cards directly as the class id.
    fn preflop_index(hole: &Hole) -> u64 {
        ColexIndexer::index(&hole.cards) % PREFLOP_CLASSES as u64
    }

    pub fn cluster(&self, round: Round, hole: &Hole, board: &Board) -> u32 {
        let index = match round {
            Round::Preflop => Self::preflop_index(hole),
            _ => {
                let mut cards = hole.cards.to_vec();
                cards.extend_from_slice(&board.cards);
                ColexIndexer::index(&cards)
            }
        };
        let table = self.table(round);
        let slot = (index as usize) % table.len().max(1);
        table.get(slot).copied().unwrap_or(0)
    }

    /// clusters for every seat in `holes`, skipping folded/all-in seats by
    /// convention of the caller (entries for those seats are never read).
    pub fn cluster_array(&self, round: Round, holes: &[Hole], board: &Board) -> Vec<u32> {
        holes.iter().map(|h| self.cluster(round, h, board)).collect()
    }
}
