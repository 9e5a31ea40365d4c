//! Black-box end-to-end hand traces. Each test drives a `Node` purely
//! through its public API (`new_hand`, `force_deal`, `apply`, `award_pot`)
//! the way a caller outside this crate would, and checks the resulting
//! chip movements and legality gates rather than any internal field.

use mc_cards::{rank, Card, Hole, Rank, Round, Suit};
use mc_gameplay::{Action, AwardMode, Config, Node};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn heads_up(stacks: Vec<i64>) -> Node {
    Node::new(
        Config {
            big_blind: 100,
            small_blind: 50,
            ..Default::default()
        },
        stacks,
    )
}

fn three_handed(stacks: Vec<i64>, big_blind: i64, small_blind: i64) -> Node {
    Node::new(
        Config {
            big_blind,
            small_blind,
            ..Default::default()
        },
        stacks,
    )
}

fn card(rank_: Rank, suit: Suit) -> Card {
    Card::new(rank_, suit)
}

/// Heads-up, both players all-in preflop, one clear winner at showdown.
#[test]
fn heads_up_all_in_single_winner() {
    let mut node = heads_up(vec![100, 100]);
    let mut rng = SmallRng::seed_from_u64(7);
    node.new_hand(&mut rng, 0).unwrap();

    // button/small blind (seat 0) shoves its remaining 50 to match the big
    // blind's all-in 100; this is a call-shaped shove, not a raise.
    assert_eq!(node.seats()[0].stack, 50);
    node.apply(Action::Shove(50)).unwrap();
    assert!(!node.in_progress());

    node.force_deal(
        vec![
            Hole::new(card(Rank::Ace, Suit::Spade), card(Rank::Ace, Suit::Heart)),
            Hole::new(card(Rank::Two, Suit::Club), card(Rank::Seven, Suit::Diamond)),
        ],
        vec![
            card(Rank::King, Suit::Club),
            card(Rank::Queen, Suit::Diamond),
            card(Rank::Nine, Suit::Heart),
            card(Rank::Four, Suit::Spade),
            card(Rank::Three, Suit::Club),
        ],
    );

    let awards = node.award_pot(AwardMode::SingleRun, rank).unwrap();
    assert_eq!(awards, vec![200, 0]);
    assert_eq!(node.seats()[0].stack, 200);
    assert_eq!(node.seats()[1].stack, 0);
    assert_eq!(node.pot(), 0);
}

/// Three players shove for unequal stacks, producing a main pot and a side
/// pot with different eligible contestants and a different winner in each.
#[test]
fn three_way_side_pot_splits_by_eligibility() {
    let mut node = three_handed(vec![40, 100, 100], 2, 1);
    let mut rng = SmallRng::seed_from_u64(11);
    node.new_hand(&mut rng, 0).unwrap();

    // seat 0 shoves its whole (short) stack, covered by both others.
    node.apply(Action::Shove(40)).unwrap();
    // seat 1 shoves its whole stack, a full raise over seat 0's all-in.
    node.apply(Action::Shove(99)).unwrap();
    // seat 2 shoves and exactly matches seat 1's total bet, ending the hand.
    node.apply(Action::Shove(98)).unwrap();
    assert!(!node.in_progress());

    node.force_deal(
        vec![
            Hole::new(card(Rank::Ace, Suit::Spade), card(Rank::Ace, Suit::Heart)),
            Hole::new(card(Rank::Seven, Suit::Club), card(Rank::Two, Suit::Heart)),
            Hole::new(card(Rank::King, Suit::Club), card(Rank::King, Suit::Diamond)),
        ],
        vec![
            card(Rank::Queen, Suit::Spade),
            card(Rank::Jack, Suit::Diamond),
            card(Rank::Eight, Suit::Heart),
            card(Rank::Four, Suit::Club),
            card(Rank::Three, Suit::Diamond),
        ],
    );

    let awards = node.award_pot(AwardMode::SingleRun, rank).unwrap();
    // seat 0 (aces) takes the 120-chip main pot it's eligible for; seat 1
    // (worst hand) is shut out of both pots; seat 2 (kings) wins the
    // 120-chip side pot that seat 0 never contested a second time.
    assert_eq!(awards, vec![120, 0, 120]);
    assert_eq!(node.seats()[0].stack, 120);
    assert_eq!(node.seats()[1].stack, 0);
    assert_eq!(node.seats()[2].stack, 120);
    assert_eq!(node.pot(), 0);
}

/// A sub-minimum all-in raise must not reopen betting for a player who
/// already acted this round — they may only call or fold until someone
/// makes a full-minimum raise.
#[test]
fn sub_minimum_all_in_does_not_reopen_action() {
    let mut node = three_handed(vec![1000, 650, 1000], 100, 50);
    let mut rng = SmallRng::seed_from_u64(3);
    node.new_hand(&mut rng, 0).unwrap();

    // seat 0 opens with a full raise to 500 (min raise becomes 400).
    node.apply(Action::Raise(500)).unwrap();
    // seat 1 shoves its last 600, raising to 650 — only 150 more, short of
    // the 400 minimum, so this does not reopen the action.
    node.apply(Action::Shove(600)).unwrap();
    // seat 2 calls the 650 total.
    node.apply(Action::Call(550)).unwrap();

    // seat 0 is back up to act (it still owes 150) but cannot re-raise.
    assert!(node.in_progress());
    assert_eq!(node.acting_seat(), 0);
    assert!(!node.can_bet(2_000));
    assert!(node.can_fold());
    assert!(node.can_check_call());

    node.apply(Action::Call(150)).unwrap();
    assert!(node.in_progress());
    assert_eq!(node.round(), Round::Flop);
    // seat 1 is all-in and sits out; seat 2 is next to act on the flop.
    assert_eq!(node.acting_seat(), 2);
    assert_eq!(node.seats()[0].stack, 350);
    assert_eq!(node.seats()[1].stack, 0);
    assert_eq!(node.seats()[2].stack, 350);
}
