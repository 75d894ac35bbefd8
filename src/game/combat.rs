//! Combat: relation tables, declaration solvers and damage marking
//!
//! Who attacks or blocks whom is stored in `CombatState`, keyed by piece ID,
//! rather than as references between pieces. The solver functions are pure:
//! they take candidate lists and return every legal declaration, because the
//! choice belongs to the player, not the engine.

use crate::core::{subsets_in_range, Piece, PieceId, PlayerId, Target};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

/// A complete attacker declaration: each attacker paired with what it attacks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDeclaration {
    pub pairs: Vec<(PieceId, Target)>,
}

impl AttackDeclaration {
    pub fn attackers(&self) -> Vec<PieceId> {
        self.pairs.iter().map(|(a, _)| *a).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for AttackDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .pairs
            .iter()
            .map(|(a, t)| format!("piece {a} -> {t}"))
            .collect();
        write!(f, "attack[{}]", parts.join(", "))
    }
}

/// A complete blocker declaration: blocker -> attackers it blocks
///
/// Entries keep the order in which blockers were chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeclaration {
    pub blocks: Vec<(PieceId, Vec<PieceId>)>,
}

impl BlockDeclaration {
    pub fn blockers(&self) -> Vec<PieceId> {
        self.blocks.iter().map(|(b, _)| *b).collect()
    }

    /// attacker -> blockers, blockers listed in declaration order
    pub fn invert(&self) -> BTreeMap<PieceId, Vec<PieceId>> {
        let mut inverse: BTreeMap<PieceId, Vec<PieceId>> = BTreeMap::new();
        for (blocker, attackers) in &self.blocks {
            for attacker in attackers {
                inverse.entry(*attacker).or_default().push(*blocker);
            }
        }
        inverse
    }
}

impl fmt::Display for BlockDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block[{}]", format_relation(&self.blocks))
    }
}

/// Damage-assignment orders: combatant -> opponents in the order it deals damage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOrderDeclaration {
    pub orders: Vec<(PieceId, Vec<PieceId>)>,
}

impl fmt::Display for DamageOrderDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order[{}]", format_relation(&self.orders))
    }
}

fn format_relation(entries: &[(PieceId, Vec<PieceId>)]) -> String {
    entries
        .iter()
        .map(|(k, vs)| {
            let vs: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
            format!("{k}: ({})", vs.join(" "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Combat relations for the current turn
///
/// Cleared at the start of every turn. BTreeMaps keep iteration deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatState {
    /// Attacking player -> defending player
    pub defending: BTreeMap<PlayerId, PlayerId>,

    /// Attacker -> the player or planeswalker it attacks
    pub attackers: BTreeMap<PieceId, Target>,

    /// Blocker -> attackers it blocks
    pub blockers: BTreeMap<PieceId, SmallVec<[PieceId; 2]>>,

    /// Attacker -> blockers blocking it, in declaration order
    pub attacker_blockers: BTreeMap<PieceId, SmallVec<[PieceId; 4]>>,

    /// Declared damage-assignment orders
    pub damage_orders: BTreeMap<PieceId, SmallVec<[Target; 4]>>,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose_defender(&mut self, attacking_player: PlayerId, defender: PlayerId) {
        self.defending.insert(attacking_player, defender);
    }

    /// Defending player chosen by `attacking_player` this combat
    pub fn defender_of(&self, attacking_player: PlayerId) -> Option<PlayerId> {
        self.defending.get(&attacking_player).copied()
    }

    pub fn declare_attacker(&mut self, attacker: PieceId, target: Target) {
        self.attackers.insert(attacker, target);
    }

    /// Record a blocker declaration and its attacker -> blockers inverse
    pub fn record_blocks(&mut self, declaration: &BlockDeclaration) {
        for (blocker, attackers) in &declaration.blocks {
            self.blockers
                .entry(*blocker)
                .or_default()
                .extend(attackers.iter().copied());
        }
        for (attacker, blockers) in declaration.invert() {
            self.attacker_blockers
                .entry(attacker)
                .or_default()
                .extend(blockers);
        }
    }

    pub fn set_damage_order(&mut self, piece: PieceId, order: &[PieceId]) {
        self.damage_orders
            .insert(piece, order.iter().map(|p| Target::Piece(*p)).collect());
    }

    pub fn is_attacking(&self, piece: PieceId) -> bool {
        self.attackers.contains_key(&piece)
    }

    pub fn is_blocking(&self, piece: PieceId) -> bool {
        self.blockers.contains_key(&piece)
    }

    pub fn is_blocked(&self, attacker: PieceId) -> bool {
        self.attacker_blockers
            .get(&attacker)
            .is_some_and(|blockers| !blockers.is_empty())
    }

    pub fn get_blockers(&self, attacker: PieceId) -> SmallVec<[PieceId; 4]> {
        self.attacker_blockers
            .get(&attacker)
            .cloned()
            .unwrap_or_default()
    }

    /// Attackers currently attacking `defender` or one of the given planeswalkers
    pub fn attackers_against(&self, defender: PlayerId, planeswalkers: &[PieceId]) -> Vec<PieceId> {
        self.attackers
            .iter()
            .filter(|(_, target)| match target {
                Target::Player(p) => *p == defender,
                Target::Piece(pw) => planeswalkers.contains(pw),
            })
            .map(|(a, _)| *a)
            .collect()
    }

    /// The order in which `piece` deals its combat damage
    ///
    /// An unblocked attacker damages what it attacks. A blocked attacker or
    /// a blocker uses its declared order, falling back to the relation table.
    /// A piece not in combat deals no damage.
    pub fn damage_order_for(&self, piece: PieceId) -> SmallVec<[Target; 4]> {
        if let Some(target) = self.attackers.get(&piece) {
            if !self.is_blocked(piece) {
                return smallvec::smallvec![*target];
            }
        }
        if let Some(order) = self.damage_orders.get(&piece) {
            return order.clone();
        }
        if let Some(blockers) = self.attacker_blockers.get(&piece) {
            return blockers.iter().map(|b| Target::Piece(*b)).collect();
        }
        if let Some(attackers) = self.blockers.get(&piece) {
            return attackers.iter().map(|a| Target::Piece(*a)).collect();
        }
        SmallVec::new()
    }

    pub fn clear(&mut self) {
        self.defending.clear();
        self.attackers.clear();
        self.blockers.clear();
        self.attacker_blockers.clear();
        self.damage_orders.clear();
    }
}

/// Cartesian product of a list of choice lists
///
/// No lists yields one empty combination; any empty list yields none.
pub fn cartesian_product<T: Clone>(basis: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut result: Vec<Vec<T>> = vec![Vec::with_capacity(basis.len())];
    for choices in basis {
        let mut next = Vec::with_capacity(result.len() * choices.len());
        for prefix in &result {
            for choice in choices {
                let mut combo = prefix.clone();
                combo.push(choice.clone());
                next.push(combo);
            }
        }
        result = next;
    }
    result
}

/// Every ordering of `items`, in lexicographic order of positions
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}

fn attacker_restrictions_hold(pieces: &[&Piece], declared: &[PieceId]) -> bool {
    let alone = declared.len() == 1;
    declared.iter().all(|id| {
        pieces
            .iter()
            .find(|p| p.id == *id)
            .map(|p| !p.cannot_attack && !(p.cannot_attack_alone && alone))
            .unwrap_or(false)
    })
}

/// Every legal attacker declaration
///
/// Candidates are subsets of size `1..=attackers.len()` of attackers x
/// attackables, kept when no attacker appears twice and no declared attacker
/// violates "cannot attack" or "cannot attack alone".
pub fn declare_attackers(attackers: &[&Piece], attackables: &[Target]) -> Vec<AttackDeclaration> {
    if attackers.is_empty() || attackables.is_empty() {
        return Vec::new();
    }
    let pairs: Vec<(PieceId, Target)> = attackers
        .iter()
        .flat_map(|a| attackables.iter().map(move |t| (a.id, *t)))
        .collect();

    subsets_in_range(&pairs, 1, attackers.len())
        .into_iter()
        .filter(|subset| {
            let declared: Vec<PieceId> = subset.iter().map(|(a, _)| *a).collect();
            let mut unique = declared.clone();
            unique.sort();
            unique.dedup();
            unique.len() == declared.len() && attacker_restrictions_hold(attackers, &declared)
        })
        .map(|pairs| AttackDeclaration { pairs })
        .collect()
}

fn blocker_restrictions_hold(chosen: &[&Piece]) -> bool {
    let alone = chosen.len() == 1;
    chosen
        .iter()
        .all(|b| !b.cannot_block && !(b.cannot_block_alone && alone))
}

/// Every legal blocker declaration
///
/// For each non-empty subset of blockers, each chosen blocker is assigned a
/// non-empty subset of attackers whose size lies in its block bounds; the
/// declarations are the Cartesian product of those choices.
pub fn declare_blockers(attackers: &[PieceId], blockers: &[&Piece]) -> Vec<BlockDeclaration> {
    if attackers.is_empty() || blockers.is_empty() {
        return Vec::new();
    }
    let attacker_subsets = subsets_in_range(attackers, 1, attackers.len());

    let mut result = Vec::new();
    for chosen in subsets_in_range(blockers, 1, blockers.len()) {
        if !blocker_restrictions_hold(&chosen) {
            continue;
        }
        let basis: Vec<Vec<Vec<PieceId>>> = chosen
            .iter()
            .map(|b| {
                attacker_subsets
                    .iter()
                    .filter(|s| s.len() >= b.min_block_n && s.len() <= b.max_block_n)
                    .cloned()
                    .collect()
            })
            .collect();
        for assignment in cartesian_product(&basis) {
            let blocks = chosen
                .iter()
                .map(|b| b.id)
                .zip(assignment)
                .collect();
            result.push(BlockDeclaration { blocks });
        }
    }
    result
}

/// Every damage-assignment order declaration for a relation
///
/// An entry with k opponents contributes k! choices (one when k <= 1); the
/// declarations are the product across entries.
pub fn damage_assignment_orders(relation: &[(PieceId, Vec<PieceId>)]) -> Vec<DamageOrderDeclaration> {
    let basis: Vec<Vec<(PieceId, Vec<PieceId>)>> = relation
        .iter()
        .map(|(piece, opponents)| {
            permutations(opponents)
                .into_iter()
                .map(|order| (*piece, order))
                .collect()
        })
        .collect();
    cartesian_product(&basis)
        .into_iter()
        .map(|orders| DamageOrderDeclaration { orders })
        .collect()
}

/// One piece of combat damage, computed before any is dealt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSubEvent {
    pub source: PieceId,
    pub target: Target,
    pub amount: i32,
}

/// Split `source`'s power across its damage order
///
/// A player receives whatever is left. A piece that is not last in the order
/// receives at most its remaining toughness; the last piece absorbs the rest
/// uncapped. Zero-amount events are not produced.
pub fn mark_damage(source: &Piece, order: &[Target], pieces: &[Piece]) -> Vec<DamageSubEvent> {
    let mut events = Vec::new();
    let total = source.power;
    let mut dealt = 0;
    let last = order.len().saturating_sub(1);

    for (i, target) in order.iter().enumerate() {
        let remaining = total - dealt;
        if remaining <= 0 {
            break;
        }
        let amount = match target {
            Target::Player(_) => remaining,
            Target::Piece(_) if i == last => remaining,
            Target::Piece(id) => {
                let cap = pieces
                    .get(id.index())
                    .map(|p| p.remaining_toughness())
                    .unwrap_or(0);
                remaining.min(cap)
            }
        };
        if amount > 0 {
            dealt += amount;
            events.push(DamageSubEvent {
                source: source.id,
                target: *target,
                amount,
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: u32, owner: u32, power: i32, toughness: i32) -> Piece {
        Piece::new(PieceId::new(id), format!("P{id}"), PlayerId::new(owner), power, toughness)
    }

    #[test]
    fn test_declare_attacker_and_blocker() {
        let mut combat = CombatState::new();
        let a1 = PieceId::new(1);
        let a2 = PieceId::new(2);
        let blocker = PieceId::new(3);
        let defender = PlayerId::new(1);

        combat.declare_attacker(a1, Target::Player(defender));
        combat.declare_attacker(a2, Target::Player(defender));
        combat.record_blocks(&BlockDeclaration {
            blocks: vec![(blocker, vec![a1, a2])],
        });

        assert!(combat.is_attacking(a1));
        assert!(combat.is_blocking(blocker));
        assert!(combat.is_blocked(a1) && combat.is_blocked(a2));
        assert_eq!(combat.get_blockers(a1).as_slice(), &[blocker]);
        assert_eq!(combat.attackers_against(defender, &[]), vec![a1, a2]);

        combat.clear();
        assert!(!combat.is_attacking(a1));
        assert!(combat.blockers.is_empty());
    }

    #[test]
    fn test_unblocked_attacker_damages_its_target() {
        let mut combat = CombatState::new();
        let a = PieceId::new(0);
        combat.declare_attacker(a, Target::Player(PlayerId::new(1)));
        assert_eq!(
            combat.damage_order_for(a).as_slice(),
            &[Target::Player(PlayerId::new(1))]
        );
        assert!(combat.damage_order_for(PieceId::new(5)).is_empty());
    }

    #[test]
    fn test_defender_lookup() {
        let mut combat = CombatState::new();
        combat.choose_defender(PlayerId::new(0), PlayerId::new(1));
        assert_eq!(combat.defender_of(PlayerId::new(0)), Some(PlayerId::new(1)));
        assert_eq!(combat.defender_of(PlayerId::new(1)), None);
    }

    #[test]
    fn test_permutation_counts() {
        assert_eq!(permutations(&[1]).len(), 1);
        assert_eq!(permutations(&[1, 2, 3]).len(), 6);
        assert_eq!(permutations(&[1, 2, 3, 4]).len(), 24);
        assert_eq!(permutations::<u8>(&[]), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_cartesian_product_edges() {
        assert_eq!(cartesian_product::<u8>(&[]), vec![Vec::<u8>::new()]);
        assert!(cartesian_product(&[vec![1], vec![]]).is_empty());
        assert_eq!(cartesian_product(&[vec![1, 2], vec![3, 4, 5]]).len(), 6);
    }

    #[test]
    fn test_attacker_declarations_unique_and_restricted() {
        let a = piece(0, 0, 1, 1);
        let mut b = piece(1, 0, 1, 1);
        let targets = [Target::Player(PlayerId::new(1)), Target::Piece(PieceId::new(9))];

        // 2 attackers x 2 targets: 4 singles + 4 legal pairs
        let decls = declare_attackers(&[&a, &b], &targets);
        assert_eq!(decls.len(), 8);
        for d in &decls {
            let mut ids = d.attackers();
            let n = ids.len();
            ids.dedup();
            assert_eq!(ids.len(), n);
        }

        b.cannot_attack = true;
        let decls = declare_attackers(&[&a, &b], &targets);
        assert!(decls.iter().all(|d| !d.attackers().contains(&b.id)));
        assert_eq!(decls.len(), 2);

        b.cannot_attack = false;
        b.cannot_attack_alone = true;
        let decls = declare_attackers(&[&a, &b], &targets[..1]);
        // {a}, {a, b}; never b on its own
        assert_eq!(decls.len(), 2);
        assert!(decls.iter().all(|d| d.attackers() != vec![b.id]));
    }

    #[test]
    fn test_no_candidates_no_declarations() {
        let a = piece(0, 0, 1, 1);
        assert!(declare_attackers(&[], &[Target::Player(PlayerId::new(1))]).is_empty());
        assert!(declare_attackers(&[&a], &[]).is_empty());
        assert!(declare_blockers(&[], &[&a]).is_empty());
    }

    #[test]
    fn test_blocker_bounds() {
        let attackers = [PieceId::new(0), PieceId::new(1)];
        let mut b1 = piece(2, 1, 1, 1);
        let b2 = piece(3, 1, 1, 1);
        b1.max_block_n = 2;

        let decls = declare_blockers(&attackers, &[&b1, &b2]);
        // {b1}: 3 subsets; {b2}: 2; {b1, b2}: 3 * 2
        assert_eq!(decls.len(), 11);
        for d in &decls {
            for (blocker, blocked) in &d.blocks {
                let max = if *blocker == b1.id { 2 } else { 1 };
                assert!(!blocked.is_empty() && blocked.len() <= max);
            }
        }
    }

    #[test]
    fn test_blocker_restrictions() {
        let attackers = [PieceId::new(0)];
        let mut b1 = piece(1, 1, 1, 1);
        let b2 = piece(2, 1, 1, 1);
        b1.cannot_block_alone = true;
        let decls = declare_blockers(&attackers, &[&b1, &b2]);
        // {b2} and {b1, b2}
        assert_eq!(decls.len(), 2);

        b1.cannot_block = true;
        let decls = declare_blockers(&attackers, &[&b1, &b2]);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].blockers(), vec![b2.id]);
    }

    #[test]
    fn test_invert_block_declaration() {
        let decl = BlockDeclaration {
            blocks: vec![
                (PieceId::new(5), vec![PieceId::new(0), PieceId::new(1)]),
                (PieceId::new(6), vec![PieceId::new(0)]),
            ],
        };
        let inverse = decl.invert();
        assert_eq!(inverse[&PieceId::new(0)], vec![PieceId::new(5), PieceId::new(6)]);
        assert_eq!(inverse[&PieceId::new(1)], vec![PieceId::new(5)]);
    }

    #[test]
    fn test_recorded_blocks_feed_attacker_lookup() {
        let (a0, a1) = (PieceId::new(0), PieceId::new(1));
        let (b5, b6) = (PieceId::new(5), PieceId::new(6));
        let decl = BlockDeclaration {
            blocks: vec![(b6, vec![a0]), (b5, vec![a0, a1])],
        };
        let mut combat = CombatState::new();
        combat.record_blocks(&decl);

        // Blockers of an attacker follow declaration order, not id order
        assert_eq!(combat.get_blockers(a0).as_slice(), &[b6, b5]);
        assert_eq!(combat.get_blockers(a1).as_slice(), &[b5]);
        for (attacker, blockers) in decl.invert() {
            assert_eq!(combat.attacker_blockers[&attacker].to_vec(), blockers);
        }
        assert_eq!(combat.blockers[&b5].as_slice(), &[a0, a1]);
    }

    #[test]
    fn test_damage_order_counts_multiply() {
        let relation = vec![
            (PieceId::new(0), vec![PieceId::new(1), PieceId::new(2), PieceId::new(3)]),
            (PieceId::new(4), vec![PieceId::new(5), PieceId::new(6)]),
            (PieceId::new(7), vec![PieceId::new(8)]),
        ];
        assert_eq!(damage_assignment_orders(&relation).len(), 6 * 2);
    }

    #[test]
    fn test_mark_damage_caps_and_remainder() {
        let attacker = piece(0, 0, 5, 5);
        let pieces = vec![attacker.clone(), piece(1, 1, 1, 2), piece(2, 1, 1, 4)];
        let order = [Target::Piece(PieceId::new(1)), Target::Piece(PieceId::new(2))];
        let events = mark_damage(&attacker, &order, &pieces);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].amount, 2);
        assert_eq!(events[1].amount, 3);
    }

    #[test]
    fn test_mark_damage_uses_remaining_toughness() {
        let attacker = piece(0, 0, 3, 3);
        let mut hurt = piece(1, 1, 1, 3);
        hurt.marked_damage = 2;
        let pieces = vec![attacker.clone(), hurt, piece(2, 1, 1, 1)];
        let order = [Target::Piece(PieceId::new(1)), Target::Piece(PieceId::new(2))];
        let events = mark_damage(&attacker, &order, &pieces);
        assert_eq!(events[0].amount, 1);
        assert_eq!(events[1].amount, 2);
    }

    #[test]
    fn test_mark_damage_skips_zero() {
        let weak = piece(0, 0, 0, 1);
        let pieces = vec![weak.clone()];
        assert!(mark_damage(&weak, &[Target::Player(PlayerId::new(1))], &pieces).is_empty());
    }
}
