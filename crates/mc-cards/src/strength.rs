use super::evaluator::Evaluator;
use super::hand::Hand;
use super::kickers::Kickers;
use super::ranking::Ranking;

/// A hand's showdown strength: always constructed from an unordered set of
/// cards. Ordered first by `Ranking`, then by `Kickers` to break ties.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength {
    value: Ranking,
    pub kicks: Kickers,
}

impl Strength {
    pub fn ranking(&self) -> Ranking {
        self.value
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Self::from(Evaluator::from(hand))
    }
}

impl From<Evaluator> for Strength {
    fn from(e: Evaluator) -> Self {
        let value = e.find_ranking();
        let kicks = e.find_kickers(value);
        Self::from((value, kicks))
    }
}

impl From<(Ranking, Kickers)> for Strength {
    fn from((value, kicks): (Ranking, Kickers)) -> Self {
        Self { value, kicks }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<18}{:>5}", self.value, self.kicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::rank::Rank;
    use crate::suit::Suit;

    #[test]
    fn straight_flush_beats_quads() {
        let sf = Strength::from(Hand::from(vec![
            Card::new(Rank::Five, Suit::Club),
            Card::new(Rank::Six, Suit::Club),
            Card::new(Rank::Seven, Suit::Club),
            Card::new(Rank::Eight, Suit::Club),
            Card::new(Rank::Nine, Suit::Club),
        ]));
        let quads = Strength::from(Hand::from(vec![
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Two, Suit::Diamond),
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::Two, Suit::Spade),
            Card::new(Rank::Three, Suit::Club),
        ]));
        assert!(sf > quads);
    }
}
