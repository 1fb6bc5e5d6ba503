//! Blackjack against an automated dealer.
//!
//! The table owns its shoe, both hands and a running tally. Mechanics live on
//! [`BlackjackTable`] (`deal`, `hit`, `stand`); [`BlackjackTable::command`]
//! turns a typed line into output lines for the shell.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cards::{hand_value, Card, Deck, Hand};
use crate::output::{split_verb, Line, Reply};

/// Replace the shoe before a deal when fewer cards than this remain.
pub const RESHUFFLE_THRESHOLD: usize = 15;

/// Dealer draws while below this total.
pub const DEALER_STANDS_ON: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandResult {
    Win,
    Loss,
    Tie,
}

/// How a hand was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finish {
    BothNatural,
    PlayerNatural,
    DealerNatural,
    PlayerBust,
    DealerBust,
    PlayerHigher,
    DealerHigher,
    Push,
}

impl Finish {
    pub fn result(&self) -> HandResult {
        match self {
            Finish::PlayerNatural | Finish::DealerBust | Finish::PlayerHigher => HandResult::Win,
            Finish::DealerNatural | Finish::PlayerBust | Finish::DealerHigher => HandResult::Loss,
            Finish::BothNatural | Finish::Push => HandResult::Tie,
        }
    }

    fn line(&self) -> Line {
        let text = match self {
            Finish::BothNatural => "You and the dealer both have blackjack. Push.",
            Finish::PlayerNatural => "Blackjack! You win.",
            Finish::DealerNatural => "Dealer has blackjack. You lose.",
            Finish::PlayerBust => "Bust! You lose.",
            Finish::DealerBust => "Dealer busts. You win!",
            Finish::PlayerHigher => "You win!",
            Finish::DealerHigher => "Dealer wins.",
            Finish::Push => "Push. It's a tie.",
        };
        match self.result() {
            HandResult::Win => Line::success(text),
            HandResult::Loss => Line::error(text),
            HandResult::Tie => Line::info(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    PlayerTurn,
    Resolved(Finish),
}

/// Running win/loss/tie counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, result: HandResult) {
        match result {
            HandResult::Win => self.wins += 1,
            HandResult::Loss => self.losses += 1,
            HandResult::Tie => self.ties += 1,
        }
    }

    pub fn hands(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("A hand is already in progress. Type 'hit' or 'stand'.")]
    HandInProgress,
    #[error("No hand in progress. Type 'deal' to start one.")]
    NoHand,
}

pub struct BlackjackTable {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    hole_revealed: bool,
    phase: Phase,
    tally: Tally,
    rng: StdRng,
}

impl Default for BlackjackTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BlackjackTable {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic table for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let deck = Deck::shuffled(&mut rng);
        Self {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
            hole_revealed: false,
            phase: Phase::NotStarted,
            tally: Tally::default(),
            rng,
        }
    }

    /// Replace the shoe. A deck below the reshuffle threshold is replaced again
    /// at the next deal.
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == Phase::PlayerTurn
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Deal a new hand. Returns the finish when either side has a natural.
    pub fn deal(&mut self) -> Result<Option<Finish>, TableError> {
        if self.is_player_turn() {
            return Err(TableError::HandInProgress);
        }

        if self.deck.len() < RESHUFFLE_THRESHOLD {
            debug!(remaining = self.deck.len(), "reshuffling shoe");
            self.deck = Deck::shuffled(&mut self.rng);
        }

        self.player.clear();
        self.dealer.clear();
        self.hole_revealed = false;

        for _ in 0..2 {
            let card = self.draw();
            self.player.push(card);
            let card = self.draw();
            self.dealer.push(card);
        }
        self.phase = Phase::PlayerTurn;

        if self.player.is_natural() || self.dealer.is_natural() {
            return Ok(Some(self.resolve()));
        }
        Ok(None)
    }

    /// Draw a card for the player. Going over 21 settles the hand as a loss.
    pub fn hit(&mut self) -> Result<Option<Finish>, TableError> {
        if !self.is_player_turn() {
            return Err(TableError::NoHand);
        }

        let card = self.draw();
        self.player.push(card);
        if self.player.is_bust() {
            self.hole_revealed = true;
            return Ok(Some(self.settle(Finish::PlayerBust)));
        }
        Ok(None)
    }

    /// Reveal the hole card, play the dealer out and settle.
    pub fn stand(&mut self) -> Result<Finish, TableError> {
        if !self.is_player_turn() {
            return Err(TableError::NoHand);
        }
        Ok(self.resolve())
    }

    fn resolve(&mut self) -> Finish {
        self.hole_revealed = true;

        let finish = match (self.player.is_natural(), self.dealer.is_natural()) {
            (true, true) => Finish::BothNatural,
            (true, false) => Finish::PlayerNatural,
            (false, true) => Finish::DealerNatural,
            (false, false) if self.player.is_bust() => Finish::PlayerBust,
            (false, false) => {
                while self.dealer.value() < DEALER_STANDS_ON {
                    let card = self.draw();
                    self.dealer.push(card);
                }
                let (player, dealer) = (self.player.value(), self.dealer.value());
                if dealer > 21 {
                    Finish::DealerBust
                } else if player > dealer {
                    Finish::PlayerHigher
                } else if dealer > player {
                    Finish::DealerHigher
                } else {
                    Finish::Push
                }
            }
        };
        self.settle(finish)
    }

    fn settle(&mut self, finish: Finish) -> Finish {
        self.tally.record(finish.result());
        self.phase = Phase::Resolved(finish);
        debug!(
            ?finish,
            player = self.player.value(),
            dealer = self.dealer.value(),
            "hand settled"
        );
        finish
    }

    fn draw(&mut self) -> Card {
        loop {
            if let Some(card) = self.deck.draw() {
                return card;
            }
            debug!("shoe exhausted mid-hand, reshuffling");
            self.deck = Deck::shuffled(&mut self.rng);
        }
    }

    // ========================================================================
    // Shell surface
    // ========================================================================

    /// Lines shown when the player sits down.
    pub fn welcome(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::heading("Blackjack"),
            Line::muted("Get closer to 21 than the dealer without going over."),
            Line::muted("Commands: deal (d), hit (h), stand (s), score, help, quit"),
        ];
        if self.tally.hands() > 0 {
            lines.push(self.tally_line());
        }
        if self.is_player_turn() {
            lines.push(Line::info("Your hand is still on the table."));
            lines.extend(self.table_lines());
        } else {
            lines.push(Line::info("Type 'deal' to start a hand."));
        }
        lines
    }

    /// Handle one line typed at the table.
    pub fn command(&mut self, input: &str) -> Reply {
        let (verb, _) = split_verb(input);
        match verb.as_str() {
            "" => Reply::default(),
            "deal" | "d" => match self.deal() {
                Ok(finish) => {
                    let mut lines = self.table_lines();
                    lines.extend(self.finish_lines(finish));
                    Reply::new(lines)
                }
                Err(e) => Reply::error(e.to_string()),
            },
            "hit" | "h" => match self.hit() {
                Ok(finish) => {
                    let mut lines = Vec::new();
                    if let Some(card) = self.player.cards().last() {
                        lines.push(Line::accent(format!("You draw {}.", card)));
                    }
                    lines.extend(self.table_lines());
                    lines.extend(self.finish_lines(finish));
                    Reply::new(lines)
                }
                Err(e) => Reply::error(e.to_string()),
            },
            "stand" | "s" | "stay" => {
                let dealt_before = self.dealer.len();
                match self.stand() {
                    Ok(finish) => {
                        let mut lines = vec![Line::info(format!(
                            "Dealer reveals {}.",
                            self.dealer
                                .cards()
                                .get(1)
                                .map(Card::to_string)
                                .unwrap_or_default()
                        ))];
                        for card in self.dealer.cards().iter().skip(dealt_before) {
                            lines.push(Line::accent(format!("Dealer draws {}.", card)));
                        }
                        lines.extend(self.table_lines());
                        lines.extend(self.finish_lines(Some(finish)));
                        Reply::new(lines)
                    }
                    Err(e) => Reply::error(e.to_string()),
                }
            }
            "score" => Reply::line(self.tally_line()),
            "help" => Reply::new(vec![
                Line::heading("Blackjack commands"),
                Line::plain("  deal, d        Deal a new hand"),
                Line::plain("  hit, h         Take another card"),
                Line::plain("  stand, s, stay End your turn and let the dealer play"),
                Line::plain("  score          Show wins, losses and ties"),
                Line::plain("  quit, q, exit  Leave the table (your score is kept)"),
            ]),
            "quit" | "q" | "exit" => Reply::exit(vec![
                Line::info("You leave the blackjack table."),
                self.tally_line(),
            ]),
            other => Reply::error(format!(
                "Unknown blackjack command: {}. Type 'help' for options.",
                other
            )),
        }
    }

    /// Both hands, with the hole card hidden until revealed.
    pub fn table_lines(&self) -> Vec<Line> {
        let dealer = if self.hole_revealed {
            format!("Dealer: {} ({})", self.dealer, self.dealer.value())
        } else {
            let up: Vec<Card> = self.dealer.cards().iter().take(1).copied().collect();
            let shown: Vec<String> = up.iter().map(Card::to_string).collect();
            format!("Dealer: {} ?? (showing {})", shown.join(" "), hand_value(&up))
        };
        vec![
            Line::accent(dealer),
            Line::accent(format!("You:    {} ({})", self.player, self.player.value())),
        ]
    }

    pub fn tally_line(&self) -> Line {
        Line::info(format!(
            "Wins: {}  Losses: {}  Ties: {}",
            self.tally.wins, self.tally.losses, self.tally.ties
        ))
    }

    fn finish_lines(&self, finish: Option<Finish>) -> Vec<Line> {
        match finish {
            Some(finish) => vec![
                finish.line(),
                self.tally_line(),
                Line::muted("Type 'deal' to play again or 'quit' to leave the table."),
            ],
            None => vec![Line::muted("Hit or stand?")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    /// Stack the given cards on top of enough filler to skip the reshuffle.
    fn stacked(top: &[Card]) -> Deck {
        let filler = std::iter::repeat(c(Rank::Two, Suit::Clubs)).take(RESHUFFLE_THRESHOLD);
        Deck::stacked(top.iter().copied().chain(filler))
    }

    #[test]
    fn test_natural_tie_resolves_on_deal() {
        // Deal order: player, dealer, player, dealer.
        let deck = stacked(&[
            c(Rank::Ace, Suit::Spades),
            c(Rank::Ace, Suit::Diamonds),
            c(Rank::King, Suit::Hearts),
            c(Rank::Queen, Suit::Clubs),
        ]);
        let mut table = BlackjackTable::with_seed(1).with_deck(deck);

        let finish = table.deal().unwrap();
        assert_eq!(finish, Some(Finish::BothNatural));
        assert_eq!(table.phase(), Phase::Resolved(Finish::BothNatural));
        assert_eq!(table.dealer().len(), 2);
        assert_eq!(table.tally().ties, 1);
        assert!(table.hole_revealed());
    }

    #[test]
    fn test_hit_bust_is_loss() {
        let deck = stacked(&[
            c(Rank::King, Suit::Spades),
            c(Rank::Seven, Suit::Hearts),
            c(Rank::Six, Suit::Spades),
            c(Rank::Nine, Suit::Hearts),
            c(Rank::Queen, Suit::Diamonds),
        ]);
        let mut table = BlackjackTable::with_seed(1).with_deck(deck);
        assert_eq!(table.deal().unwrap(), None);
        assert!(table.is_player_turn());

        assert_eq!(table.hit().unwrap(), Some(Finish::PlayerBust));
        assert_eq!(table.tally().losses, 1);
        assert_eq!(table.dealer().len(), 2);
        assert_eq!(table.hit(), Err(TableError::NoHand));
    }

    #[test]
    fn test_dealer_draws_to_seventeen() {
        let deck = stacked(&[
            c(Rank::Ten, Suit::Spades),
            c(Rank::Six, Suit::Hearts),
            c(Rank::Eight, Suit::Spades),
            c(Rank::Five, Suit::Hearts),
            c(Rank::Three, Suit::Clubs),
            c(Rank::Four, Suit::Clubs),
        ]);
        let mut table = BlackjackTable::with_seed(1).with_deck(deck);
        table.deal().unwrap();

        let finish = table.stand().unwrap();
        // 6 + 5 + 3 = 14, then 4 makes 18 against the player's 18.
        assert_eq!(table.dealer().value(), 18);
        assert_eq!(finish, Finish::Push);
    }

    #[test]
    fn test_dealer_floor_over_many_seeds() {
        for seed in 0..200 {
            let mut table = BlackjackTable::with_seed(seed);
            if table.deal().unwrap().is_some() {
                continue;
            }
            table.stand().unwrap();
            let dealer = table.dealer().value();
            assert!(dealer >= DEALER_STANDS_ON, "seed {seed}: dealer stopped at {dealer}");
            assert_eq!(table.tally().hands(), 1);
        }
    }

    #[test]
    fn test_deal_refused_mid_hand() {
        let deck = stacked(&[
            c(Rank::Ten, Suit::Spades),
            c(Rank::Six, Suit::Hearts),
            c(Rank::Eight, Suit::Spades),
            c(Rank::Five, Suit::Hearts),
        ]);
        let mut table = BlackjackTable::with_seed(1).with_deck(deck);
        table.deal().unwrap();
        assert_eq!(table.deal(), Err(TableError::HandInProgress));
        assert_eq!(table.player().len(), 2);
    }

    #[test]
    fn test_stand_before_deal_refused() {
        let mut table = BlackjackTable::with_seed(3);
        assert_eq!(table.stand(), Err(TableError::NoHand));
        assert_eq!(table.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_short_shoe_is_replaced() {
        let deck = Deck::stacked([c(Rank::Two, Suit::Clubs); 4]);
        let mut table = BlackjackTable::with_seed(9).with_deck(deck);
        table.deal().unwrap();
        assert_eq!(table.cards_remaining(), 48);
    }

    #[test]
    fn test_hole_card_hidden_in_display() {
        let deck = stacked(&[
            c(Rank::Ten, Suit::Spades),
            c(Rank::Six, Suit::Hearts),
            c(Rank::Eight, Suit::Spades),
            c(Rank::Five, Suit::Hearts),
        ]);
        let mut table = BlackjackTable::with_seed(1).with_deck(deck);
        let reply = table.command("deal");
        assert!(!reply.exit);
        assert_eq!(reply.lines[0].text(), "Dealer: 6♥ ?? (showing 6)");
        assert_eq!(reply.lines[1].text(), "You:    10♠ 8♠ (18)");
    }

    #[test]
    fn test_quit_keeps_tally() {
        let mut table = BlackjackTable::with_seed(5);
        table.deal().unwrap();
        if table.is_player_turn() {
            table.stand().unwrap();
        }
        let reply = table.command("quit");
        assert!(reply.exit);
        assert_eq!(table.tally().hands(), 1);
    }

    #[test]
    fn test_unknown_command() {
        let mut table = BlackjackTable::with_seed(5);
        let reply = table.command("split");
        assert_eq!(reply.lines.len(), 1);
        assert!(reply.lines[0].is(crate::output::Style::Error));
    }
}
