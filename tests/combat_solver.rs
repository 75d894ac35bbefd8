//! Properties of the combat solver over small candidate sets

use ccg_rules::core::{Piece, PieceId, PlayerId, Target};
use ccg_rules::game::combat::{
    damage_assignment_orders, declare_attackers, declare_blockers,
};
use similar_asserts::assert_eq;

fn pieces(n: u32, owner: u32) -> Vec<Piece> {
    (0..n)
        .map(|i| Piece::new(PieceId::new(owner * 10 + i), format!("P{owner}.{i}"), PlayerId::new(owner), 1, 1))
        .collect()
}

fn factorial(k: usize) -> usize {
    (1..=k).product()
}

#[test]
fn test_attacker_declarations_never_repeat_an_attacker() {
    let attackers = pieces(3, 0);
    let refs: Vec<&Piece> = attackers.iter().collect();
    let attackables = [
        Target::Player(PlayerId::new(1)),
        Target::Piece(PieceId::new(19)),
    ];
    let declarations = declare_attackers(&refs, &attackables);

    // Each attacker independently sits out or picks one of two targets
    assert_eq!(declarations.len(), 3usize.pow(3) - 1);
    for declaration in &declarations {
        let mut ids = declaration.attackers();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }
}

#[test]
fn test_attack_restrictions() {
    let mut attackers = pieces(3, 0);
    attackers[0].cannot_attack = true;
    attackers[1].cannot_attack_alone = true;
    let refs: Vec<&Piece> = attackers.iter().collect();
    let declarations = declare_attackers(&refs, &[Target::Player(PlayerId::new(1))]);

    for declaration in &declarations {
        let ids = declaration.attackers();
        assert!(!ids.contains(&attackers[0].id));
        if ids.len() == 1 {
            assert!(!ids.contains(&attackers[1].id));
        }
    }
    // {2}, {1, 2}
    assert_eq!(declarations.len(), 2);
}

#[test]
fn test_blocker_bounds_are_respected() {
    let attackers: Vec<PieceId> = pieces(3, 0).iter().map(|p| p.id).collect();
    let mut blockers = pieces(2, 1);
    blockers[0].min_block_n = 1;
    blockers[0].max_block_n = 2;
    let refs: Vec<&Piece> = blockers.iter().collect();

    let declarations = declare_blockers(&attackers, &refs);
    assert!(!declarations.is_empty());
    for declaration in &declarations {
        for (blocker, blocked) in &declaration.blocks {
            let piece = blockers.iter().find(|b| b.id == *blocker).unwrap();
            assert!(!blocked.is_empty());
            assert!(blocked.len() >= piece.min_block_n.max(1));
            assert!(blocked.len() <= piece.max_block_n);
        }
    }

    // Blocker 0 alone: 3 + 3 choices; blocker 1 alone: 3; together: 6 * 3
    assert_eq!(declarations.len(), 6 + 3 + 18);
}

#[test]
fn test_block_restrictions() {
    let attackers: Vec<PieceId> = pieces(1, 0).iter().map(|p| p.id).collect();
    let mut blockers = pieces(3, 1);
    blockers[0].cannot_block = true;
    blockers[1].cannot_block_alone = true;
    let refs: Vec<&Piece> = blockers.iter().collect();

    let declarations = declare_blockers(&attackers, &refs);
    for declaration in &declarations {
        let ids = declaration.blockers();
        assert!(!ids.contains(&blockers[0].id));
        if ids.len() == 1 {
            assert!(!ids.contains(&blockers[1].id));
        }
    }
    // {2}, {1, 2}
    assert_eq!(declarations.len(), 2);
}

#[test]
fn test_damage_order_counts_are_products_of_factorials() {
    let ids: Vec<PieceId> = (0..10).map(PieceId::new).collect();
    let relation = vec![
        (ids[0], ids[1..4].to_vec()),
        (ids[4], ids[5..7].to_vec()),
        (ids[7], vec![ids[8]]),
        (ids[9], Vec::new()),
    ];
    let declarations = damage_assignment_orders(&relation);
    assert_eq!(declarations.len(), factorial(3) * factorial(2) * factorial(1) * factorial(0));

    // Every declaration orders every entry, and no two are the same
    for declaration in &declarations {
        assert_eq!(declaration.orders.len(), relation.len());
    }
    let mut unique: Vec<_> = declarations.iter().map(|d| d.orders.clone()).collect();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), declarations.len());
}

#[test]
fn test_no_candidates_no_declarations() {
    assert!(declare_attackers(&[], &[Target::Player(PlayerId::new(1))]).is_empty());
    let attackers = pieces(1, 0);
    let refs: Vec<&Piece> = attackers.iter().collect();
    assert!(declare_attackers(&refs, &[]).is_empty());
    assert!(declare_blockers(&[], &refs).is_empty());
}
