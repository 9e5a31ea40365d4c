use super::card::Card;
use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;

/// Evaluates the best 5-card category for an arbitrary set of cards (a Hand
/// of any size 5..=7). This is the concrete implementation backing the
/// `rank()` free function other modules treat as an external collaborator.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(hand: Hand) -> Self {
        Self(hand)
    }
}

impl Evaluator {
    fn cards(&self) -> Vec<Card> {
        self.0.into()
    }

    fn rank_mask(&self) -> u16 {
        self.cards()
            .iter()
            .fold(0u16, |mask, c| mask | (1 << c.rank() as u16))
    }

    fn rank_counts(&self) -> [u8; 13] {
        let mut counts = [0u8; 13];
        for c in self.cards() {
            counts[c.rank() as usize] += 1;
        }
        counts
    }

    fn suit_masks(&self) -> [u16; 4] {
        let mut masks = [0u16; 4];
        for c in self.cards() {
            masks[c.suit() as usize] |= 1 << c.rank() as u16;
        }
        masks
    }

    /// highest rank of a run of 5 consecutive set bits, accounting for the
    /// wheel (A-2-3-4-5), or None if no straight exists in the mask.
    fn straight_high(mask: u16) -> Option<Rank> {
        let wheel = 0b1_0000_0000_1111u16;
        let mut best = None;
        if mask & wheel == wheel {
            best = Some(Rank::Five);
        }
        for low in 0..=8u8 {
            let run = 0b11111u16 << low;
            if mask & run == run {
                best = Some(Rank::from(low + 4));
            }
        }
        best
    }

    pub fn find_ranking(&self) -> Ranking {
        let counts = self.rank_counts();
        let suits = self.suit_masks();
        let flush_suit = suits.iter().position(|m| m.count_ones() >= 5);

        if let Some(s) = flush_suit {
            if let Some(high) = Self::straight_high(suits[s]) {
                return Ranking::StraightFlush(high);
            }
        }

        let mut quads = None;
        let mut trips: Vec<Rank> = Vec::new();
        let mut pairs: Vec<Rank> = Vec::new();
        for rank in (0u8..13).rev() {
            match counts[rank as usize] {
                4 => quads = quads.or(Some(Rank::from(rank))),
                3 => trips.push(Rank::from(rank)),
                2 => pairs.push(Rank::from(rank)),
                _ => {}
            }
        }

        if let Some(q) = quads {
            return Ranking::FourOAK(q);
        }
        if !trips.is_empty() && (trips.len() > 1 || !pairs.is_empty()) {
            let lo = if trips.len() > 1 { trips[1] } else { pairs[0] };
            return Ranking::FullHouse(trips[0], lo);
        }
        if let Some(s) = flush_suit {
            let high = Rank::from(15 - suits[s].leading_zeros() as u8 - 1);
            return Ranking::Flush(high);
        }
        if let Some(high) = Self::straight_high(self.rank_mask()) {
            return Ranking::Straight(high);
        }
        if let Some(t) = trips.first() {
            return Ranking::ThreeOAK(*t);
        }
        if pairs.len() >= 2 {
            return Ranking::TwoPair(pairs[0], pairs[1]);
        }
        if let Some(p) = pairs.first() {
            return Ranking::OnePair(*p);
        }
        let high = Rank::from(15 - self.rank_mask().leading_zeros() as u8 - 1);
        Ranking::HighCard(high)
    }

    pub fn find_kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.n_kickers();
        if n == 0 {
            return Kickers::from(0u16);
        }
        let mut mask = self.rank_mask();
        let used = match ranking {
            Ranking::HighCard(r)
            | Ranking::OnePair(r)
            | Ranking::ThreeOAK(r)
            | Ranking::FourOAK(r) => vec![r],
            Ranking::TwoPair(a, b) => vec![a, b],
            _ => vec![],
        };
        for r in used {
            mask &= !(1 << r as u16);
        }
        // keep only the n highest remaining rank bits
        let mut kept = 0u16;
        let mut taken = 0;
        for bit in (0..13).rev() {
            if taken == n {
                break;
            }
            if mask & (1 << bit) != 0 {
                kept |= 1 << bit;
                taken += 1;
            }
        }
        Kickers::from(kept)
    }
}

fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if cards.len() < k {
        return Vec::new();
    }
    let mut out = Vec::new();
    let head = cards[0];
    for mut rest in combinations(&cards[1..], k - 1) {
        rest.insert(0, head);
        out.push(rest);
    }
    out.extend(combinations(&cards[1..], k));
    out
}

/// best 5-card `Strength` reachable from any 5..=7 card set.
pub fn rank(cards: &[Card]) -> super::strength::Strength {
    combinations(cards, 5)
        .into_iter()
        .map(|five| super::strength::Strength::from(Hand::from(five)))
        .max()
        .expect("at least five cards required to rank a hand")
}
