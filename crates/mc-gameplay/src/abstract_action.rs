use mc_cards::Round;

/// A single member of the betting-action abstraction: a shape of bet plus
/// the conditions under which it is admitted into the tree. The sequence
/// table (owned by the mccfr crate) filters a fixed vector of these against
/// each `Node` to decide which of the continuous game's real actions are
/// reachable.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Play {
    Fold,
    CheckCall,
    Bet,
    AllIn,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct AbstractAction {
    pub play: Play,
    /// bet size as a fraction of the pot; unused for Fold/CheckCall/AllIn.
    pub size_as_pot_fraction: f32,
    /// how many raises may already have occurred this round for this action
    /// to still be legal (0 = only the opening raise).
    pub max_raise_number: usize,
    pub min_round: Round,
    pub max_round: Round,
    /// 0 = no limit on active player count.
    pub max_players: usize,
    pub min_pot: i64,
}

impl AbstractAction {
    pub fn admits(&self, round: Round, raises_this_round: usize, active_players: usize, pot: i64) -> bool {
        let round_ok = (round as u8) >= (self.min_round as u8) && (round as u8) <= (self.max_round as u8);
        let raises_ok = raises_this_round <= self.max_raise_number;
        let players_ok = self.max_players == 0 || active_players <= self.max_players;
        let pot_ok = pot >= self.min_pot;
        round_ok && raises_ok && players_ok && pot_ok
    }
}
