//! Targeting: filtration rules and fixed-size target enumeration

use crate::core::{Piece, PieceId, Player, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Something an action can be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    Player(PlayerId),
    Piece(PieceId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Player(id) => write!(f, "player {id}"),
            Target::Piece(id) => write!(f, "piece {id}"),
        }
    }
}

/// Chosen targets for one binding
pub type TargetSet = SmallVec<[Target; 4]>;

/// Filtration rule over the live player/piece set, relative to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFilter {
    /// Only the actor
    SamePlayer,
    /// Every player except the actor
    OtherPlayers,
    /// Every player, the actor included
    AllPlayers,
    /// Other players on the actor's team
    Allies,
    /// Other players on any other team
    Enemies,
    /// Pieces the actor does not own
    OpponentPieces,
    /// Pieces the actor owns
    ActorPieces,
    AllPieces,
}

impl TargetFilter {
    /// Current candidate set, in arena order
    pub fn candidates(&self, actor: PlayerId, players: &[Player], pieces: &[Piece]) -> Vec<Target> {
        let actor_team = players.get(actor.index()).map(|p| p.team);
        match self {
            TargetFilter::SamePlayer => vec![Target::Player(actor)],
            TargetFilter::OtherPlayers => players
                .iter()
                .filter(|p| p.id != actor)
                .map(|p| Target::Player(p.id))
                .collect(),
            TargetFilter::AllPlayers => players.iter().map(|p| Target::Player(p.id)).collect(),
            TargetFilter::Allies => players
                .iter()
                .filter(|p| p.id != actor && Some(p.team) == actor_team)
                .map(|p| Target::Player(p.id))
                .collect(),
            TargetFilter::Enemies => players
                .iter()
                .filter(|p| p.id != actor && Some(p.team) != actor_team)
                .map(|p| Target::Player(p.id))
                .collect(),
            TargetFilter::OpponentPieces => pieces
                .iter()
                .filter(|p| p.owner != actor)
                .map(|p| Target::Piece(p.id))
                .collect(),
            TargetFilter::ActorPieces => pieces
                .iter()
                .filter(|p| p.owner == actor)
                .map(|p| Target::Piece(p.id))
                .collect(),
            TargetFilter::AllPieces => pieces.iter().map(|p| Target::Piece(p.id)).collect(),
        }
    }
}

/// Required cardinality plus filtration rule
///
/// Only fixed cardinalities are supported: a rule of size 2 never yields
/// singletons or triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetData {
    pub size: usize,
    pub filter: TargetFilter,
}

impl TargetData {
    pub fn new(size: usize, filter: TargetFilter) -> Self {
        TargetData { size, filter }
    }

    pub fn single(filter: TargetFilter) -> Self {
        Self::new(1, filter)
    }

    /// Every `size`-combination of the filtered candidates
    pub fn solve(&self, actor: PlayerId, players: &[Player], pieces: &[Piece]) -> Vec<TargetSet> {
        let candidates = self.filter.candidates(actor, players, pieces);
        combinations(&candidates, self.size)
            .into_iter()
            .map(TargetSet::from_vec)
            .collect()
    }
}

/// All `k`-element combinations of `items`, preserving input order
///
/// `k == 0` yields a single empty combination; `k > len` yields none.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Find the rightmost index that can still move right
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// All subsets of `items` whose size lies in `min..=max`, smallest first
pub fn subsets_in_range<T: Clone>(items: &[T], min: usize, max: usize) -> Vec<Vec<T>> {
    let max = max.min(items.len());
    (min..=max)
        .flat_map(|k| combinations(items, k))
        .collect()
}
