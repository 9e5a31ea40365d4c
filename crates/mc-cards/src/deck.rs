use super::card::Card;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>, // presize to 52
}

impl Deck {
    pub fn new(rng: &mut SmallRng) -> Deck {
        let mut cards: Vec<Card> = (0..52).map(Card::from).collect();
        cards.shuffle(rng);
        Deck { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn deals_without_replacement() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut deck = Deck::new(&mut rng);
        let mut seen = std::collections::HashSet::new();
        while let Some(card) = deck.draw() {
            assert!(seen.insert(card.to_int()));
        }
        assert_eq!(seen.len(), 52);
    }
}
