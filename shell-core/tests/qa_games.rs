//! QA tests for the adventure and blackjack modes, driven through the shell.

use shell_core::blackjack::{BlackjackTable, Finish, Phase, RESHUFFLE_THRESHOLD};
use shell_core::cards::{Card, Deck, Rank, Suit};
use shell_core::world::map::{ATTIC, CELLAR, GALLERY, KITCHEN, LIVING_ROOM};
use shell_core::world::ItemId;
use shell_core::{Style, TestHarness};

fn texts(lines: &[shell_core::Line]) -> Vec<String> {
    lines.iter().map(|l| l.text().to_string()).collect()
}

// =============================================================================
// ADVENTURE
// =============================================================================

#[tokio::test]
async fn test_adventure_walkthrough_to_gallery() {
    let mut harness = TestHarness::new();
    harness.send("zork").await;
    assert_eq!(harness.mode().name(), "adventure");

    harness
        .send_all(&["n", "e", "open window", "w", "w", "take lamp", "move rug", "open trap door"])
        .await;
    {
        let game = harness.session.dispatcher().adventure().unwrap();
        assert_eq!(game.player().location, LIVING_ROOM);
        assert!(game.player().carries(ItemId("lamp")));
    }

    // The cellar is dark; without light there is no way back out.
    harness.send("down").await;
    let lines = harness.send("south").await;
    assert!(texts(&lines).iter().any(|t| t.contains("grue")));
    assert_eq!(
        harness.session.dispatcher().adventure().unwrap().player().location,
        CELLAR
    );

    harness.send("turn on lamp").await;
    harness.send("s").await;
    harness.send("take painting").await;

    let game = harness.session.dispatcher().adventure().unwrap();
    assert_eq!(game.player().location, GALLERY);
    // kitchen 10 + cellar 25 + painting 10
    assert_eq!(game.player().score, 45);
}

#[tokio::test]
async fn test_dark_room_reveals_nothing() {
    let mut harness = TestHarness::new();
    harness
        .send_all(&["zork", "n", "e", "open window", "w"])
        .await;
    let lines = harness.send("up").await;

    assert!(texts(&lines).iter().any(|t| t.starts_with("It is pitch black")));
    assert!(!texts(&lines).iter().any(|t| t.contains("rope")));
    assert_eq!(
        harness.session.dispatcher().adventure().unwrap().player().location,
        ATTIC
    );
}

#[tokio::test]
async fn test_sack_reveal_is_one_shot() {
    let mut harness = TestHarness::new();
    harness
        .send_all(&["zork", "n", "e", "open window", "w", "open sack"])
        .await;
    let lines = harness.send("open sack").await;
    assert_eq!(texts(&lines)[1], "The brown sack is already open.");

    let game = harness.session.dispatcher().adventure().unwrap();
    let kitchen = game.world().room(KITCHEN).unwrap();
    let garlic = kitchen.items.iter().filter(|i| **i == ItemId("garlic")).count();
    assert_eq!(garlic, 1);
}

#[tokio::test]
async fn test_adventure_survives_quit() {
    let mut harness = TestHarness::new();
    harness.send_all(&["zork", "w", "quit"]).await;
    assert!(harness.mode().is_normal());

    let lines = harness.send("zork").await;
    assert!(texts(&lines).iter().any(|t| t == "Forest Path"));
}

#[tokio::test]
async fn test_flat_commands_unavailable_in_game() {
    let mut harness = TestHarness::new();
    harness.send("zork").await;
    let lines = harness.send("ls").await;
    assert_eq!(texts(&lines)[1], "I don't understand that.");
    assert!(harness.visited().is_empty());
}

// =============================================================================
// BLACKJACK
// =============================================================================

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn stacked(top: &[Card]) -> Deck {
    let filler = std::iter::repeat(c(Rank::Five, Suit::Clubs)).take(RESHUFFLE_THRESHOLD);
    Deck::stacked(top.iter().copied().chain(filler))
}

#[tokio::test]
async fn test_blackjack_natural_tie() {
    // Deal order: player, dealer, player, dealer.
    let deck = stacked(&[
        c(Rank::Ace, Suit::Spades),
        c(Rank::Ace, Suit::Diamonds),
        c(Rank::King, Suit::Hearts),
        c(Rank::Queen, Suit::Clubs),
    ]);
    let table = BlackjackTable::with_seed(11).with_deck(deck);
    let mut harness = TestHarness::new().with_table(table);

    harness.send("blackjack").await;
    let lines = harness.send("deal").await;

    let table = harness.session.dispatcher().table();
    assert_eq!(table.phase(), Phase::Resolved(Finish::BothNatural));
    assert_eq!(table.dealer().len(), 2);
    assert_eq!(table.tally().ties, 1);
    assert!(texts(&lines).iter().any(|t| t.contains("Push")));
    assert!(texts(&lines)[1].starts_with("Dealer: A♦ Q♣"));
}

#[tokio::test]
async fn test_blackjack_hit_and_stand() {
    let deck = stacked(&[
        c(Rank::Ten, Suit::Spades),
        c(Rank::Ten, Suit::Hearts),
        c(Rank::Two, Suit::Spades),
        c(Rank::Seven, Suit::Hearts),
        c(Rank::Eight, Suit::Diamonds),
    ]);
    let table = BlackjackTable::with_seed(11).with_deck(deck);
    let mut harness = TestHarness::new().with_table(table);

    harness.send_all(&["bj", "deal", "hit"]).await;
    assert_eq!(harness.session.dispatcher().table().player().value(), 20);

    let lines = harness.send("stand").await;
    let table = harness.session.dispatcher().table();
    assert_eq!(table.phase(), Phase::Resolved(Finish::PlayerHigher));
    assert_eq!(table.dealer().value(), 17);
    assert_eq!(table.dealer().len(), 2);
    assert!(lines.iter().any(|l| l.is(Style::Success)));
}

#[tokio::test]
async fn test_blackjack_tally_survives_quit() {
    let mut harness = TestHarness::new().with_table(BlackjackTable::with_seed(4));
    harness.send_all(&["bj", "deal", "stand", "quit"]).await;
    assert!(harness.mode().is_normal());

    let hands = harness.session.dispatcher().table().tally().hands();
    assert_eq!(hands, 1);

    harness.send("bj").await;
    assert_eq!(harness.session.dispatcher().table().tally().hands(), 1);
}

#[tokio::test]
async fn test_game_modes_are_exclusive() {
    let mut harness = TestHarness::new();
    harness.send("bj").await;
    let lines = harness.send("zork").await;
    assert_eq!(texts(&lines)[1], "Finish or quit the current game first.");
    assert_eq!(harness.mode().name(), "blackjack");
    assert!(harness.session.dispatcher().adventure().is_none());
}
