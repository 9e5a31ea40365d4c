use super::hand::Hand;

/// The kicker cards of a made hand, kept as a bitset so ties compare by
/// the same rank-ordering the main hand value uses.
/// Warning: ordering does not account for suit, only rank bit position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Kickers(pub u16);

impl From<u16> for Kickers {
    fn from(mask: u16) -> Self {
        Self(mask)
    }
}
impl From<Kickers> for u16 {
    fn from(k: Kickers) -> Self {
        k.0
    }
}
impl From<Hand> for Kickers {
    fn from(hand: Hand) -> Self {
        Self(u64::from(hand) as u16)
    }
}

impl std::fmt::Display for Kickers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:013b}", self.0)
    }
}
