//! Black-box end-to-end checks driven purely through `mc_mccfr`'s public
//! API: build real tables, run the real traversal, and inspect the real
//! results rather than internal state.

use mc_cards::Round;
use mc_clustering::ClusterTable;
use mc_gameplay::{AbstractAction, Config, Play};
use mc_mccfr::{Engine, SequenceTable, Strategy, ILLEGAL};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Mutex;

fn standard_actions() -> Vec<AbstractAction> {
    vec![
        AbstractAction {
            play: Play::Fold,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::CheckCall,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::Bet,
            size_as_pot_fraction: 0.5,
            max_raise_number: 2,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::Bet,
            size_as_pot_fraction: 1.0,
            max_raise_number: 3,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::AllIn,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
    ]
}

fn small_actions() -> Vec<AbstractAction> {
    vec![
        AbstractAction {
            play: Play::Fold,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::CheckCall,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::AllIn,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
    ]
}

/// The sequence table's shape (state counts per round, legality density) is
/// a structural property of the action abstraction and the stack template,
/// not of any particular run — two builds from the same inputs must agree
/// exactly, and no reachable row may offer zero legal actions. This exercises
/// that property through the public API with the trainer's real five-action
/// abstraction rather than asserting a specific literal count, since the
/// exact state counts are a function of implementation details (e.g. bet
/// rounding) this black-box test has no way to independently recompute.
#[test]
fn sequence_table_shape_is_stable_and_gapless() {
    let config = Config {
        big_blind: 100,
        small_blind: 50,
        ..Default::default()
    };
    let stacks = vec![2_000i64, 2_000, 2_000];
    let a = SequenceTable::build(standard_actions(), config, stacks.clone());
    let b = SequenceTable::build(standard_actions(), config, stacks);

    for round in Round::all() {
        assert_eq!(a.states(round), b.states(round), "{round} state count must be deterministic");
        assert!(a.states(round) > 0, "{round} must have at least the root sequence");

        for seq in 0..a.states(round) {
            let any_legal = (0..a.action_count(round) as usize).any(|act| a.next(round, seq, act) != ILLEGAL);
            assert!(any_legal, "{round} seq {seq} has no legal action, a dead reachable row");
        }

        // legal_offset must be the exact running count of legal entries,
        // since Strategy/Average index flat storage by this offset.
        let mut running = 0u64;
        for seq in 0..a.states(round) {
            assert_eq!(a.legal_offset(round, seq), running);
            running += a.num_legal_actions(round, seq) as u64;
        }
    }
}

/// After 1000 external-sampling traversals there is real accumulated
/// regret; applying a discount must scale every stored regret by exactly
/// that factor, not just the ones a particular traversal happened to touch.
#[test]
fn discount_scales_every_regret_after_many_traversals() {
    let config = Config {
        big_blind: 100,
        small_blind: 50,
        ..Default::default()
    };
    let stacks = vec![500i64, 500];
    let table = SequenceTable::build(small_actions(), config, stacks.clone());
    let clusters = ClusterTable::new(vec![0; 400], vec![0; 400], vec![0; 400]);
    let engine = Engine::new(table, clusters, config, stacks);
    let strategy = Mutex::new(Strategy::new(&engine.table, &engine.clusters));
    let mut rng = SmallRng::seed_from_u64(42);

    for i in 0..1_000u64 {
        let root = engine.deal_root(&mut rng);
        let player = (i % 2) as usize;
        engine.traverse(&root, 0, &strategy, player, false, &mut rng);
    }

    let mut before: HashMap<(u8, u32, u32, usize), i32> = HashMap::new();
    {
        let guard = strategy.lock().unwrap();
        for round in Round::all() {
            for cluster in 0..engine.clusters.num_clusters(round) {
                for seq in 0..engine.table.states(round) {
                    for action in 0..engine.table.action_count(round) as usize {
                        let r = guard.regret(round, cluster, seq, action);
                        before.insert((round as u8, cluster, seq, action), r);
                    }
                }
            }
        }
    }
    assert!(before.values().any(|&r| r != 0), "1000 traversals should leave some non-zero regret");

    strategy.lock().unwrap().discount(0.5);

    let guard = strategy.lock().unwrap();
    for (&(round_idx, cluster, seq, action), &old) in &before {
        let round = Round::from(round_idx);
        let new = guard.regret(round, cluster, seq, action);
        let expected = ((old as f32) * 0.5).round() as i32;
        assert_eq!(new, expected, "regret at {round} cluster {cluster} seq {seq} action {action} did not scale by 0.5");
    }
}
