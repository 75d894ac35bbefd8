//! Two-player demonstration scenario
//!
//! Each player brings a handful of pieces. Player 0 can attack, heal and
//! drink a potion (a special action that skips the stack); player 1 can only
//! attack. Both players start at 2 health, so the first attack to resolve
//! usually decides the game.

use crate::core::{
    Ability, ActivationWindow, Effect, Piece, PieceId, Player, PlayerId, StatBlock, StatOp,
    TargetData, TargetFilter, TeamId,
};
use crate::game::{Game, GameConfig};
use crate::Result;

fn player_stats(speed: i32) -> StatBlock {
    StatBlock::new()
        .with("speed", speed)
        .with("strength", 1)
        .with("hp", 2)
        .with("magic", 3)
}

pub fn demo_players() -> Vec<Player> {
    vec![
        Player::new(PlayerId::new(0), "0", TeamId(0), player_stats(0)),
        Player::new(PlayerId::new(1), "1", TeamId(1), player_stats(2)),
    ]
}

/// Deal the actor's strength to an enemy's health, at main-phase timing on
/// either player's turn with any number of stack entries pending
pub fn attack() -> Ability {
    Ability::new(
        "Attack",
        Effect::stat("strength", "hp", StatOp::Sub),
        TargetData::single(TargetFilter::Enemies),
    )
    .with_window(ActivationWindow {
        max_stack_size: 1000,
        must_be_actors_turn: false,
        ..ActivationWindow::default()
    })
}

pub fn heal() -> Ability {
    Ability::new(
        "Heal",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::OtherPlayers),
    )
}

pub fn heal_all() -> Ability {
    Ability::new(
        "Heal2",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::AllPlayers),
    )
}

pub fn drink_potion() -> Ability {
    Ability::special(
        "Drink Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    )
}

pub fn demo_pieces() -> Vec<Piece> {
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let conquistador = |id: u32, owner: PlayerId, ability: Ability| {
        Piece::new(PieceId::new(id), "Vicious Conquistador", owner, 1, 2).with_abilities(vec![ability])
    };

    let mut lieutenant = Piece::new(PieceId::new(4), "Legion Lieutenant", p0, 2, 2);
    lieutenant.has_phasing = true;

    let mut borrower = Piece::new(PieceId::new(5), "Brazen Borrower", p0, 3, 1);
    borrower.has_phasing = true;
    borrower.phased_out = true;
    borrower.tapped = true;
    borrower.can_untap = false;

    let mut vampire = Piece::new(PieceId::new(6), "Vampire of the Dire Moon", p0, 1, 1);
    vampire.tapped = true;

    vec![
        conquistador(0, p0, attack()),
        conquistador(1, p0, heal_all()),
        conquistador(2, p0, drink_potion()),
        conquistador(3, p1, attack()),
        lieutenant,
        borrower,
        vampire,
        Piece::new(PieceId::new(7), "Vicious Conquistador", p1, 1, 2),
        Piece::new(PieceId::new(8), "Skymarcher Aspirant", p1, 2, 1),
    ]
}

/// The demonstration game, ready to be handed to a `GameLoop`
pub fn demo_game(config: GameConfig) -> Result<Game> {
    Game::new(demo_players(), demo_pieces(), config)
}
