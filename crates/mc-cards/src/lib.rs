pub mod board;
pub mod card;
pub mod deck;
pub mod evaluator;
pub mod hand;
pub mod hole;
pub mod isomorphism;
pub mod kickers;
pub mod rank;
pub mod ranking;
pub mod round;
pub mod strength;
pub mod suit;

pub use board::Board;
pub use card::Card;
pub use deck::Deck;
pub use evaluator::rank;
pub use hand::{Hand, HandIterator};
pub use hole::Hole;
pub use isomorphism::{ColexIndexer, Indexer};
pub use kickers::Kickers;
pub use rank::Rank;
pub use ranking::Ranking;
pub use round::Round;
pub use strength::Strength;
pub use suit::{Suit, Suitedness};

/// trait for random generation of test fixtures
pub trait Arbitrary {
    fn random(rng: &mut rand::rngs::SmallRng) -> Self;
}
