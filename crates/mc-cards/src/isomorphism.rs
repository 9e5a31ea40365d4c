use super::card::Card;

/// Canonical indexing of a fixed-size card combination into a dense integer
/// and back. The production system collapses suit-isomorphic hands onto the
/// same index (an external collaborator this crate does not reimplement);
/// this is the combinatorial-number-system bijection used locally so the
/// rest of the tree has a concrete `Indexer` to test and build against.
pub trait Indexer {
    fn index(cards: &[Card]) -> u64;
    fn unindex(count: usize, index: u64) -> Vec<Card>;
}

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

pub struct ColexIndexer;

impl Indexer for ColexIndexer {
    fn index(cards: &[Card]) -> u64 {
        let mut sorted: Vec<u8> = cards.iter().map(|c| c.to_int()).collect();
        sorted.sort_unstable();
        sorted
            .iter()
            .enumerate()
            .map(|(i, &c)| binomial(c as u64, (i + 1) as u64))
            .sum()
    }

    fn unindex(count: usize, mut index: u64) -> Vec<Card> {
        let mut cards = Vec::with_capacity(count);
        for i in (0..count).rev() {
            let k = (i + 1) as u64;
            let mut c = k - 1;
            while binomial(c + 1, k) <= index {
                c += 1;
            }
            index -= binomial(c, k);
            cards.push(Card::from(c as u8));
        }
        cards.reverse();
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::suit::Suit;

    #[test]
    fn index_unindex_roundtrip() {
        for n in [2usize, 5] {
            let cards: Vec<Card> = (0..n as u8)
                .map(|i| Card::new(Rank::from(i), Suit::Club))
                .collect();
            // collapse to distinct card ints by spreading across suits too
            let cards: Vec<Card> = cards
                .into_iter()
                .enumerate()
                .map(|(i, c)| Card::new(c.rank(), Suit::from((i % 4) as u8)))
                .collect();
            let idx = ColexIndexer::index(&cards);
            let back = ColexIndexer::unindex(n, idx);
            assert_eq!(ColexIndexer::index(&back), idx);
        }
    }

    #[test]
    fn index_is_dense_from_zero() {
        let pair = vec![
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Two, Suit::Diamond),
        ];
        assert_eq!(ColexIndexer::index(&pair), 0);
    }
}
