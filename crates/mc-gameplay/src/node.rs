use crate::action::Action;
use crate::error::{ErrorKind, Result};
use crate::seat::{Chips, Seat};
use mc_cards::{Board, Card, Deck, Hole, Round};
use rand::rngs::SmallRng;

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub big_blind: Chips,
    pub small_blind: Chips,
    pub ante: Chips,
    pub big_blind_ante: bool,
    pub blinds_before_ante: bool,
    /// fraction of the pot retained as rake, e.g. 0.05 for 5%.
    pub rake: f64,
    /// 0 = uncapped.
    pub rake_cap: Chips,
    pub no_flop_no_drop: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            big_blind: 100,
            small_blind: 50,
            ante: 0,
            big_blind_ante: false,
            blinds_before_ante: true,
            rake: 0.0,
            rake_cap: 0,
            no_flop_no_drop: false,
        }
    }
}

/// How a finished hand's pot is distributed among contestants.
pub enum AwardMode<'a> {
    /// fast path: every remaining stack started the hand equal and no rake
    /// applies, so the single best hand simply takes the whole pot.
    SameStackNoRake,
    /// full side-pot decomposition against one board.
    SingleRun,
    /// side-pot decomposition repeated over several board run-outs, with the
    /// pot (and each side pot) split evenly across them.
    MultiRun(&'a [Board]),
}

/// A no-limit hold'em betting state machine for `N` seats.
///
/// Invariants maintained across every public method that returns
/// successfully: `pot == sum(seat.bet)` while a hand is live (zero once
/// `award_pot` completes); folded seats never change their `bet` again;
/// `stack >= 0` and `bet >= 0` for every seat; and the acting seat, while
/// `in_progress`, always references a seat that `can_act`.
#[derive(Clone)]
pub struct Node {
    config: Config,
    seats: Vec<Seat>,
    button: usize,
    round: Round,
    acting: usize,
    pot_good: usize,
    /// set when the last raise was a sub-minimum all-in: players who already
    /// acted this round may only call or fold until a full-minimum raise
    /// reopens the action for them.
    reopen_disabled: bool,
    min_raise: Chips,
    max_bet: Chips,
    /// number of raises already made this round, used by the action
    /// abstraction's `max_raise_number` filter.
    raises_this_round: usize,
    pot: Chips,
    board: Board,
    deck: Option<Deck>,
    in_progress: bool,
}

impl Node {
    pub fn new(config: Config, stacks: Vec<Chips>) -> Self {
        let n = stacks.len();
        Self {
            config,
            seats: stacks.into_iter().map(Seat::new).collect(),
            button: n.saturating_sub(1),
            round: Round::Preflop,
            acting: 0,
            pot_good: 0,
            reopen_disabled: false,
            min_raise: 0,
            max_bet: 0,
            raises_this_round: 0,
            pot: 0,
            board: Board::new(),
            deck: None,
            in_progress: false,
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn round(&self) -> Round {
        self.round
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn acting_seat(&self) -> usize {
        self.acting
    }
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn hole(&self, seat: usize) -> Option<&Hole> {
        self.seats[seat].hole.as_ref()
    }
    pub fn max_bet(&self) -> Chips {
        self.max_bet
    }
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }
    pub fn raises_this_round(&self) -> usize {
        self.raises_this_round
    }
    /// seats still contesting the pot (not folded), regardless of all-in status.
    pub fn contestants(&self) -> usize {
        self.players_left()
    }

    fn n(&self) -> usize {
        self.seats.len()
    }

    fn players_left(&self) -> usize {
        self.seats.iter().filter(|s| s.contesting()).count()
    }

    fn players_all_in(&self) -> usize {
        self.seats.iter().filter(|s| s.all_in).count()
    }

    fn next_actor_from(&self, start: usize) -> Option<usize> {
        let n = self.n();
        (1..=n)
            .map(|step| (start + step) % n)
            .find(|&i| self.seats[i].can_act())
    }

    /// Starts a new hand: resets per-hand state, rotates the button, posts
    /// antes and blinds, then deals hole and board cards.
    pub fn new_hand(&mut self, rng: &mut SmallRng, straddles: usize) -> Result<()> {
        if self.pot != 0 {
            return Err(ErrorKind::IllegalState(
                "cannot start a new hand with a non-empty pot".into(),
            ));
        }
        let n = self.n();
        if n < 2 {
            return Err(ErrorKind::InvalidArgument("need at least two seats".into()));
        }
        for seat in self.seats.iter_mut() {
            seat.bet = 0;
            seat.folded = false;
            seat.all_in = false;
            seat.hole = None;
        }
        self.button = (self.button + 1) % n;
        self.round = Round::Preflop;
        self.board = Board::new();
        self.pot = 0;
        self.reopen_disabled = false;
        self.raises_this_round = 0;

        if self.config.ante > 0 && self.config.blinds_before_ante {
            self.post_blinds_and_straddles(straddles)?;
            self.post_antes()?;
        } else if self.config.ante > 0 {
            self.post_antes()?;
            self.post_blinds_and_straddles(straddles)?;
        } else {
            self.post_blinds_and_straddles(straddles)?;
        }

        self.max_bet = self.seats.iter().map(|s| s.bet).max().unwrap_or(0);
        self.min_raise = self.config.big_blind;
        self.acting = if n == 2 {
            self.button
        } else {
            self.next_actor_from((self.button + 2) % n).unwrap_or(self.button)
        };
        self.pot_good = self.players_left().saturating_sub(self.players_all_in()).saturating_sub(1);
        self.in_progress = true;

        self.deal(rng);
        Ok(())
    }

    fn post_ante(&mut self, seat: usize, amount: Chips) {
        let paid = amount.min(self.seats[seat].stack);
        self.seats[seat].stack -= paid;
        self.pot += paid;
        if self.seats[seat].stack == 0 {
            self.seats[seat].all_in = true;
        }
    }

    fn post_antes(&mut self) -> Result<()> {
        if self.config.big_blind_ante {
            let n = self.n();
            let bb_seat = if n == 2 { (self.button + 1) % n } else { (self.button + 2) % n };
            let amount = self.config.ante * self.n() as Chips;
            self.post_ante(bb_seat, amount);
        } else {
            for i in 0..self.n() {
                self.post_ante(i, self.config.ante);
            }
        }
        Ok(())
    }

    fn post_blind(&mut self, seat: usize, amount: Chips) {
        let paid = amount.min(self.seats[seat].stack);
        self.seats[seat].stack -= paid;
        self.seats[seat].bet += paid;
        self.pot += paid;
        if self.seats[seat].stack == 0 {
            self.seats[seat].all_in = true;
        }
    }

    fn post_blinds_and_straddles(&mut self, straddles: usize) -> Result<()> {
        let n = self.n();
        if n == 2 {
            self.post_blind(self.button, self.config.small_blind);
            self.post_blind((self.button + 1) % n, self.config.big_blind);
        } else {
            self.post_blind((self.button + 1) % n, self.config.small_blind);
            self.post_blind((self.button + 2) % n, self.config.big_blind);
            let mut amount = self.config.big_blind;
            for k in 0..straddles {
                let seat = (self.button + 3 + k) % n;
                if seat == self.button {
                    break;
                }
                amount *= 2;
                if self.seats[seat].stack < amount {
                    break;
                }
                self.post_blind(seat, amount);
            }
        }
        Ok(())
    }

    fn deal(&mut self, rng: &mut SmallRng) {
        let mut deck = Deck::new(rng);
        for seat in self.seats.iter_mut() {
            let a = deck.draw().expect("deck exhausted dealing holes");
            let b = deck.draw().expect("deck exhausted dealing holes");
            seat.hole = Some(Hole::new(a, b));
        }
        let mut board_cards: Vec<Card> = Vec::with_capacity(5);
        for _ in 0..5 {
            board_cards.push(deck.draw().expect("deck exhausted dealing board"));
        }
        self.board.cards = board_cards;
        self.deck = Some(deck);
    }

    /// the board cards visible at the current round (river's 5 dealt up
    /// front, revealed progressively as rounds advance).
    pub fn visible_board(&self) -> &[Card] {
        &self.board.cards[..self.round.n_observed()]
    }

    /// Overwrites the hole and board cards most recently dealt by
    /// `new_hand`, leaving betting state untouched. For constructing
    /// fixtures with a known showdown outcome; real play always deals
    /// through `new_hand`'s RNG.
    pub fn force_deal(&mut self, holes: Vec<Hole>, board: Vec<Card>) {
        for (seat, hole) in self.seats.iter_mut().zip(holes) {
            seat.hole = Some(hole);
        }
        self.board.cards = board;
    }

    pub fn to_call(&self, seat: usize) -> Chips {
        (self.max_bet - self.seats[seat].bet).max(0)
    }

    pub fn can_fold(&self) -> bool {
        self.in_progress && self.to_call(self.acting) > 0
    }

    pub fn can_check_call(&self) -> bool {
        self.in_progress
    }

    pub fn can_bet(&self, total_bet: Chips) -> bool {
        if !self.in_progress || self.reopen_disabled {
            return false;
        }
        let seat = &self.seats[self.acting];
        let raise_size = total_bet - self.max_bet;
        total_bet > self.max_bet
            && raise_size >= self.min_raise
            && (total_bet - seat.bet) < seat.stack
    }

    fn advance_round_or_finish(&mut self) {
        if self.players_left() <= 1 {
            self.in_progress = false;
            return;
        }
        if self.players_left() - self.players_all_in() <= 1 {
            // everyone left is all-in; fast-forward to showdown.
            while let Some(next) = self.round.next() {
                self.round = next;
            }
            self.in_progress = false;
            return;
        }
        match self.round.next() {
            Some(r) => {
                self.round = r;
                for seat in self.seats.iter_mut() {
                    seat.bet = 0;
                }
                self.max_bet = 0;
                self.min_raise = self.config.big_blind;
                self.raises_this_round = 0;
                self.reopen_disabled = false;
                self.acting = self
                    .next_actor_from(self.button)
                    .unwrap_or(self.button);
                self.pot_good = self.players_left().saturating_sub(self.players_all_in());
            }
            None => {
                self.in_progress = false;
            }
        }
    }

    fn advance_actor(&mut self) {
        self.pot_good = self.pot_good.saturating_sub(1);
        if self.pot_good == 0 {
            self.advance_round_or_finish();
        } else if let Some(next) = self.next_actor_from(self.acting) {
            self.acting = next;
        } else {
            self.advance_round_or_finish();
        }
    }

    /// Applies exactly one action from the current acting seat. Returns
    /// whether the hand is still in progress afterward.
    pub fn apply(&mut self, action: Action) -> Result<bool> {
        if !self.in_progress {
            return Err(ErrorKind::IllegalState("hand is not in progress".into()));
        }
        let seat = self.acting;
        match action {
            Action::Fold => {
                if !self.can_fold() {
                    return Err(ErrorKind::InvalidMove("nothing to fold to".into()));
                }
                self.seats[seat].folded = true;
                self.advance_actor();
            }
            Action::Check => {
                if self.to_call(seat) != 0 {
                    return Err(ErrorKind::InvalidMove("cannot check facing a bet".into()));
                }
                self.advance_actor();
            }
            Action::Call(amount) => {
                let owed = self.to_call(seat);
                if amount != owed {
                    return Err(ErrorKind::InvalidMove("call amount must match what is owed".into()));
                }
                self.commit(seat, amount);
                self.advance_actor();
            }
            Action::Raise(total_bet) => {
                if !self.can_bet(total_bet) {
                    return Err(ErrorKind::InvalidMove("illegal raise size".into()));
                }
                let raise_size = total_bet - self.max_bet;
                let delta = total_bet - self.seats[seat].bet;
                self.commit(seat, delta);
                self.max_bet = total_bet;
                self.min_raise = raise_size;
                self.raises_this_round += 1;
                self.reopen_disabled = false;
                self.pot_good = self.players_left() - self.players_all_in() - 1;
                self.acting = self.next_actor_from(seat).unwrap_or(seat);
            }
            Action::Shove(amount) => {
                if amount != self.seats[seat].stack {
                    return Err(ErrorKind::InvalidMove("shove must risk the full stack".into()));
                }
                let total_bet = self.seats[seat].bet + amount;
                let raise_size = total_bet - self.max_bet;
                self.commit(seat, amount);
                self.seats[seat].all_in = true;
                if total_bet > self.max_bet {
                    self.max_bet = total_bet;
                    self.raises_this_round += 1;
                    if raise_size >= self.min_raise {
                        self.min_raise = raise_size;
                        self.reopen_disabled = false;
                    } else {
                        // sub-minimum all-in: does not reopen action for
                        // players who already acted this round.
                        self.reopen_disabled = true;
                    }
                    // this seat just went all-in raising, so it's already
                    // excluded from `players_all_in` below — no further -1.
                    self.pot_good = self.players_left().saturating_sub(self.players_all_in());
                    self.acting = self.next_actor_from(seat).unwrap_or(seat);
                } else {
                    self.advance_actor();
                    return Ok(self.in_progress);
                }
            }
        }
        if self.players_left() <= 1 {
            self.in_progress = false;
        }
        Ok(self.in_progress)
    }

    fn commit(&mut self, seat: usize, amount: Chips) {
        self.seats[seat].stack -= amount;
        self.seats[seat].bet += amount;
        self.pot += amount;
        if self.seats[seat].stack == 0 {
            self.seats[seat].all_in = true;
        }
    }

    /// Distributes the pot among contestants, credits each seat's `stack`
    /// in place, and zeroes the pot. Fails if the hand is still in progress.
    /// Returns the per-seat award amounts for callers (utility computation,
    /// logging) that need them, but `Node` itself never ends a hand with
    /// chips sitting uncredited in the pot.
    pub fn award_pot(&mut self, mode: AwardMode, ranker: impl Fn(&[Card]) -> mc_cards::Strength) -> Result<Vec<Chips>> {
        if self.in_progress {
            return Err(ErrorKind::IllegalState("hand is still in progress".into()));
        }
        let awards = match mode {
            AwardMode::SameStackNoRake => self.award_same_stack(ranker)?,
            AwardMode::SingleRun => self.award_single_run(&self.board.clone(), ranker)?,
            AwardMode::MultiRun(boards) => self.award_multi_run(boards, ranker)?,
        };
        for (seat, &amount) in self.seats.iter_mut().zip(awards.iter()) {
            seat.stack += amount;
        }
        Ok(awards)
    }

    fn award_same_stack(&mut self, ranker: impl Fn(&[Card]) -> mc_cards::Strength) -> Result<Vec<Chips>> {
        let board = self.board.clone();
        let everyone: Vec<usize> = (0..self.n()).collect();
        let winner = self.best_contestant(&board, &ranker, &everyone)?;
        let mut awards = vec![0; self.n()];
        if let Some(w) = winner.first() {
            awards[*w] = self.pot;
        }
        self.pot = 0;
        Ok(awards)
    }

    /// best hand(s) among `eligible` seats, restricted to that set so a
    /// side pot a seat has already been fully paid out of never falls back
    /// to the overall-best hand of a seat not contesting it.
    fn best_contestant(
        &self,
        board: &Board,
        ranker: &impl Fn(&[Card]) -> mc_cards::Strength,
        eligible: &[usize],
    ) -> Result<Vec<usize>> {
        let mut best: Option<mc_cards::Strength> = None;
        let mut winners = Vec::new();
        for &i in eligible {
            let seat = &self.seats[i];
            if seat.folded {
                continue;
            }
            let hole = seat
                .hole
                .as_ref()
                .ok_or_else(|| ErrorKind::IllegalState("contestant has no hole cards".into()))?;
            let mut cards: Vec<Card> = hole.cards.to_vec();
            cards.extend_from_slice(&board.cards);
            let strength = ranker(&cards);
            match &best {
                None => {
                    best = Some(strength);
                    winners = vec![i];
                }
                Some(b) if strength > *b => {
                    best = Some(strength);
                    winners = vec![i];
                }
                Some(b) if strength == *b => {
                    winners.push(i);
                }
                _ => {}
            }
        }
        Ok(winners)
    }

    fn award_single_run(
        &mut self,
        board: &Board,
        ranker: impl Fn(&[Card]) -> mc_cards::Strength,
    ) -> Result<Vec<Chips>> {
        let rake = self.take_rake();
        let mut awards = vec![0 as Chips; self.n()];
        let mut bets: Vec<Chips> = self.seats.iter().map(|s| s.bet).collect();
        let mut processed = vec![false; self.n()];
        loop {
            let contestant_unprocessed: Vec<usize> = (0..self.n())
                .filter(|&i| !self.seats[i].folded && !processed[i] && bets[i] > 0)
                .collect();
            if contestant_unprocessed.is_empty() {
                break;
            }
            let m = contestant_unprocessed.iter().map(|&i| bets[i]).min().unwrap();
            let mut side_pot: Chips = 0;
            for i in 0..self.n() {
                if bets[i] > 0 {
                    let take = m.min(bets[i]);
                    side_pot += take;
                    bets[i] -= take;
                }
            }
            let winners = self.best_contestant(board, &ranker, &contestant_unprocessed)?;
            if !winners.is_empty() {
                self.hamilton_split(side_pot, &winners, &mut awards);
            }
            for &i in &contestant_unprocessed {
                if bets[i] == 0 {
                    processed[i] = true;
                }
            }
        }
        self.pot = 0;
        let _ = rake;
        Ok(awards)
    }

    fn award_multi_run(
        &mut self,
        boards: &[Board],
        ranker: impl Fn(&[Card]) -> mc_cards::Strength,
    ) -> Result<Vec<Chips>> {
        if boards.is_empty() {
            return Err(ErrorKind::InvalidArgument("multi-run requires at least one board".into()));
        }
        let whole_pot = self.pot;
        let rake = self.take_rake();
        let k = boards.len() as Chips;
        let mut totals = vec![0 as Chips; self.n()];
        for board in boards {
            self.pot = whole_pot - rake;
            let per_board = self.award_single_run(board, &ranker)?;
            for (i, a) in per_board.into_iter().enumerate() {
                totals[i] += a;
            }
        }
        // divide each seat's accumulated award by k using Hamilton rounding
        // so the grand total still equals whole_pot - rake exactly.
        let mut final_awards = vec![0 as Chips; self.n()];
        let mut remainder_order: Vec<(Chips, usize)> = Vec::new();
        let mut distributed = 0 as Chips;
        for (i, total) in totals.iter().enumerate() {
            let floor = total / k;
            final_awards[i] = floor;
            distributed += floor;
            remainder_order.push((total % k, i));
        }
        remainder_order.sort_by(|a, b| b.0.cmp(&a.0));
        let mut leftover = whole_pot - rake - distributed;
        for (_, i) in remainder_order {
            if leftover <= 0 {
                break;
            }
            final_awards[i] += 1;
            leftover -= 1;
        }
        self.pot = 0;
        Ok(final_awards)
    }

    fn take_rake(&mut self) -> Chips {
        if self.config.rake <= 0.0 {
            return 0;
        }
        if self.config.no_flop_no_drop && self.round == Round::Preflop {
            return 0;
        }
        let raw = (self.pot as f64) * self.config.rake;
        let mut rake = raw.floor() as Chips;
        if self.config.rake_cap > 0 {
            rake = rake.min(self.config.rake_cap);
        }
        self.pot -= rake;
        rake
    }

    /// Splits `amount` equally among `winners`, using Hamilton apportionment
    /// (floor for everyone, then one extra chip each to the largest
    /// remainders in order, ties broken by seat index) so the distribution
    /// sums exactly to `amount`.
    fn hamilton_split(&self, amount: Chips, winners: &[usize], awards: &mut [Chips]) {
        if winners.is_empty() || amount == 0 {
            return;
        }
        let k = winners.len() as Chips;
        let floor = amount / k;
        let mut remainder = amount % k;
        for &w in winners {
            awards[w] += floor;
        }
        // winners are already seat-index ordered from best_contestant's scan;
        // stable order gives the tie-break by seat index.
        for &w in winners {
            if remainder == 0 {
                break;
            }
            awards[w] += 1;
            remainder -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_cards::rank;
    use rand::SeedableRng;

    fn heads_up(stacks: Vec<Chips>) -> Node {
        Node::new(
            Config {
                big_blind: 100,
                small_blind: 50,
                ..Default::default()
            },
            stacks,
        )
    }

    #[test]
    fn heads_up_preflop_fold_returns_blinds_correctly() {
        let mut node = heads_up(vec![10_000, 10_000]);
        let mut rng = SmallRng::seed_from_u64(1);
        node.new_hand(&mut rng, 0).unwrap();
        // button (seat 0) is small blind heads-up and acts first preflop.
        assert_eq!(node.seats()[0].bet, 50);
        assert_eq!(node.seats()[1].bet, 100);
        node.apply(Action::Fold).unwrap();
        assert!(!node.in_progress());
        node.award_pot(AwardMode::SameStackNoRake, rank).unwrap();
        assert_eq!(node.seats()[0].stack, 9_900);
        assert_eq!(node.seats()[1].stack, 10_100);
    }

    #[test]
    fn chip_conservation_through_a_fold() {
        let mut node = heads_up(vec![10_000, 10_000]);
        let mut rng = SmallRng::seed_from_u64(2);
        let starting = 20_000;
        node.new_hand(&mut rng, 0).unwrap();
        assert_eq!(
            node.seats().iter().map(|s| s.stack).sum::<Chips>() + node.pot(),
            starting
        );
        let pot_before_award = node.pot();
        node.apply(Action::Fold).unwrap();
        let awards = node.award_pot(AwardMode::SameStackNoRake, rank).unwrap();
        let total_awarded: Chips = awards.iter().sum();
        assert_eq!(total_awarded, pot_before_award);
        assert_eq!(node.pot(), 0);
        assert_eq!(node.seats().iter().map(|s| s.stack).sum::<Chips>(), starting);
    }
}
