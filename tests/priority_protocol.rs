//! Priority and stack protocol, observed through captured engine logs

use ccg_rules::core::{
    Ability, ActivationWindow, Effect, Piece, PieceId, Player, PlayerId, StatBlock, StatOp,
    TargetData, TargetFilter, TeamId,
};
use ccg_rules::core::Binding;
use ccg_rules::game::{
    Game, GameConfig, GameEndReason, GameLogger, GameLoop, GameStateView, PlayerController,
    ScriptedController, Step, ZeroController,
};
use ccg_rules::RulesError;
use similar_asserts::assert_eq;
use smallvec::smallvec;

fn players() -> Vec<Player> {
    let stats = || {
        StatBlock::new()
            .with("hp", 5)
            .with("strength", 1)
            .with("magic", 3)
    };
    vec![
        Player::new(PlayerId::new(0), "A", TeamId(0), stats()),
        Player::new(PlayerId::new(1), "B", TeamId(1), stats()),
    ]
}

fn upkeep_window(max_stack_size: usize) -> ActivationWindow {
    ActivationWindow {
        steps: smallvec![Step::Upkeep],
        max_stack_size,
        single_use: true,
        ..ActivationWindow::default()
    }
}

/// A non-attacking host for the abilities under test
fn imp(abilities: Vec<Ability>) -> Piece {
    let mut piece = Piece::new(PieceId::new(0), "Imp", PlayerId::new(0), 1, 1).with_abilities(abilities);
    piece.cannot_attack = true;
    piece
}

fn capturing_game(pieces: Vec<Piece>) -> Game {
    let mut logger = GameLogger::silent();
    logger.enable_capture();
    Game::new(players(), pieces, GameConfig::default().with_max_turns(1))
        .unwrap()
        .with_logger(logger)
}

/// Messages logged during one step, reduced to the protocol events
fn protocol_trace(game: &Game, step: Step) -> Vec<String> {
    let start = format!("Start of {step}.");
    let end = format!("End of {step}.");
    let logs = game.logger.logs();
    let mut in_step = false;
    let mut trace = Vec::new();
    for entry in logs.iter() {
        let msg = &entry.message;
        if *msg == start {
            in_step = true;
        } else if *msg == end {
            in_step = false;
        } else if in_step {
            if msg.contains("on the stack") {
                trace.push("push".to_string());
            } else if let Some(name) = msg.strip_suffix(" passes priority.") {
                trace.push(format!("pass {name}"));
            } else if msg.starts_with("Resolving") {
                trace.push("resolve".to_string());
            } else if msg.contains("--->") {
                trace.push(msg.clone());
            }
        }
    }
    trace
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn controllers(a_script: Vec<usize>) -> Vec<Box<dyn PlayerController>> {
    vec![
        Box::new(ScriptedController::new(PlayerId::new(0), a_script)),
        Box::new(ZeroController::new(PlayerId::new(1))),
    ]
}

#[test]
fn test_act_pass_pass_resolves_and_returns_to_active_player() {
    let spark = Ability::new(
        "Spark",
        Effect::stat("strength", "hp", StatOp::Sub),
        TargetData::single(TargetFilter::Enemies),
    )
    .with_window(upkeep_window(0));
    let pieces = vec![imp(vec![spark])];
    let mut game = capturing_game(pieces);

    let result = GameLoop::new(&mut game).run_game(&mut controllers(vec![1])).unwrap();
    assert_eq!(result.end_reason, GameEndReason::TurnLimit);

    assert_eq!(
        protocol_trace(&game, Step::Upkeep),
        strings(&[
            "push",
            "pass Player A",
            "pass Player B",
            "resolve",
            "Player B's hp 5 ---> 4",
            // Priority came back to A, who now only has the pass
            "pass Player A",
            "pass Player B",
        ])
    );
    assert_eq!(game.players[1].health(), 4);
    assert!(game.stack.is_empty());
}

#[test]
fn test_stack_resolves_last_in_first_out() {
    let potion = Ability::new(
        "Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    )
    .with_window(upkeep_window(1));
    let spark = Ability::new(
        "Spark",
        Effect::stat("strength", "hp", StatOp::Sub),
        TargetData::single(TargetFilter::Enemies),
    )
    .with_window(upkeep_window(1));
    let pieces = vec![imp(vec![potion, spark])];
    let mut game = capturing_game(pieces);

    // Potion first, then Spark on top of it
    GameLoop::new(&mut game)
        .run_game(&mut controllers(vec![1, 2]))
        .unwrap();

    assert_eq!(
        protocol_trace(&game, Step::Upkeep),
        strings(&[
            "push",
            "push",
            "pass Player A",
            "pass Player B",
            "resolve",
            "Player B's hp 5 ---> 4",
            // Potion is still pending and still live; A declines it
            "pass Player A",
            "pass Player B",
            "resolve",
            "Player A's hp 5 ---> 8",
            "pass Player A",
            "pass Player B",
        ])
    );
}

#[test]
fn test_special_action_skips_the_stack_and_keeps_priority() {
    let drink = Ability::special(
        "Drink Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    );
    let pieces = vec![imp(vec![drink])];
    let mut game = capturing_game(pieces);

    // Drink twice, then pass by running out of script
    GameLoop::new(&mut game)
        .run_game(&mut controllers(vec![1, 1]))
        .unwrap();

    assert_eq!(
        protocol_trace(&game, Step::PrecombatMain),
        strings(&[
            "Player A's hp 5 ---> 8",
            "Player A's hp 8 ---> 11",
            "pass Player A",
            "pass Player B",
        ])
    );
    assert_eq!(game.players[0].health(), 11);
}

#[test]
fn test_out_of_range_choice_is_an_engine_fault() {
    struct Stubborn;
    impl PlayerController for Stubborn {
        fn player_id(&self) -> PlayerId {
            PlayerId::new(0)
        }
        fn choose_action(&mut self, _: &GameStateView, _: &[Binding]) -> usize {
            99
        }
        fn choose_option(&mut self, _: &GameStateView, _: &[Binding]) -> usize {
            0
        }
    }

    let drink = Ability::special(
        "Drink Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    );
    let pieces = vec![imp(vec![drink])];
    let mut game = capturing_game(pieces);
    let mut controllers: Vec<Box<dyn PlayerController>> =
        vec![Box::new(Stubborn), Box::new(ZeroController::new(PlayerId::new(1)))];

    let err = GameLoop::new(&mut game).run_game(&mut controllers).unwrap_err();
    assert!(matches!(
        err,
        RulesError::IllegalDecision {
            index: 99,
            offered: 2,
            ..
        }
    ));
    assert!(game.is_over());
    assert!(matches!(game.end_reason(), Some(GameEndReason::EngineFault(_))));
}

#[test]
fn test_ability_without_target_rule_aborts_the_game() {
    let mut bare = Ability::special(
        "Drink Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    );
    bare.target = None;
    let mut game = capturing_game(vec![imp(vec![bare])]);

    let err = GameLoop::new(&mut game)
        .run_game(&mut controllers(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, RulesError::MissingTargetRule(ref name) if name == "Drink Potion"));
    assert!(matches!(game.end_reason(), Some(GameEndReason::EngineFault(_))));
    // Nothing past the first main phase ran
    assert!(!game
        .logger
        .logs()
        .iter()
        .any(|entry| entry.message.starts_with("Start of Combat")));
}

#[test]
fn test_endless_special_actions_hit_the_priority_ceiling() {
    /// Always takes the last offered option
    struct Restless;
    impl PlayerController for Restless {
        fn player_id(&self) -> PlayerId {
            PlayerId::new(0)
        }
        fn choose_action(&mut self, _: &GameStateView, options: &[Binding]) -> usize {
            options.len() - 1
        }
        fn choose_option(&mut self, _: &GameStateView, _: &[Binding]) -> usize {
            0
        }
    }

    let drink = Ability::special(
        "Drink Potion",
        Effect::stat("magic", "hp", StatOp::Add),
        TargetData::single(TargetFilter::SamePlayer),
    );
    let config = GameConfig {
        max_priority_iterations: 5,
        ..GameConfig::default().with_max_turns(1)
    };
    let mut game = Game::new(players(), vec![imp(vec![drink])], config)
        .unwrap()
        .with_logger(GameLogger::silent());
    let mut controllers: Vec<Box<dyn PlayerController>> =
        vec![Box::new(Restless), Box::new(ZeroController::new(PlayerId::new(1)))];

    let err = GameLoop::new(&mut game).run_game(&mut controllers).unwrap_err();
    assert!(matches!(err, RulesError::PriorityLimitExceeded(5)));
    assert!(matches!(game.end_reason(), Some(GameEndReason::EngineFault(_))));
    // Five drinks landed before the round was cut off
    assert_eq!(game.players[0].health(), 5 + 5 * 3);
}
