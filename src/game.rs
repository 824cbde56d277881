// This file is part of the rochade library.
// Copyright (C) 2024 The rochade developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! A game as a tree of moves.
//!
//! Nodes live in an arena owned by the [`Game`] and are addressed by
//! [`NodeId`]. The first child of a node is its main line continuation,
//! later children are variations. Nodes are never removed, so an id handed
//! out by a game stays valid for that game (and its clones).
//!
//! # Examples
//!
//! ```
//! use rochade::{Game, Method, Move, Outcome, PushMoveOptions, Square};
//!
//! let mut game = Game::new();
//! for (from, to) in [
//!     (Square::F2, Square::F3),
//!     (Square::E7, Square::E5),
//!     (Square::G2, Square::G4),
//!     (Square::D8, Square::H4),
//! ] {
//!     game.push_move(&Move::new(from, to, None), PushMoveOptions::default())?;
//! }
//!
//! assert_eq!(game.outcome(), Some(Outcome::Decisive { winner: rochade::Color::Black }));
//! assert_eq!(game.method(), Some(Method::Checkmate));
//! # Ok::<_, rochade::GameError>(())
//! ```

use std::{collections::BTreeMap, error::Error, fmt};

use tracing::{debug, trace};

use crate::{
    color::Color,
    fen::ParseFenError,
    m::{Move, MoveList},
    outcome::{Method, Outcome},
    position::Position,
};

const THREEFOLD_REPETITION: usize = 3;
const FIVEFOLD_REPETITION: usize = 5;
const FIFTY_MOVE_RULE: u32 = 100;
const SEVENTY_FIVE_MOVE_RULE: u32 = 150;

/// Handle of a node in a [`Game`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commentary attached to a node. Never interpreted by the game itself.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Annotation {
    pub comments: Vec<String>,
    /// Numeric annotation glyphs, like `1` for `!`.
    pub nags: Vec<u8>,
    /// Embedded commands, like `%clk` or `%eval`.
    pub commands: BTreeMap<String, String>,
}

/// Options for [`Game::push_move()`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PushMoveOptions {
    /// Make the move the main line continuation, even if the cursor
    /// already has other children.
    pub force_mainline: bool,
}

/// Error when a move or claim is rejected by a [`Game`].
///
/// A rejected operation leaves the game unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    IllegalMove(Move),
    AlreadyDecided(Outcome),
    InsufficientRepetitions { found: usize },
    HalfmoveClock { found: u32 },
    InvalidDrawMethod(Method),
    UnknownNode(NodeId),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove(m) => write!(f, "illegal move: {m}"),
            GameError::AlreadyDecided(outcome) => write!(f, "game already decided: {outcome}"),
            GameError::InsufficientRepetitions { found } => write!(
                f,
                "threefold repetition requires {THREEFOLD_REPETITION} occurrences, found {found}"
            ),
            GameError::HalfmoveClock { found } => write!(
                f,
                "fifty-move rule requires a halfmove clock of {FIFTY_MOVE_RULE}, found {found}"
            ),
            GameError::InvalidDrawMethod(method) => write!(f, "cannot claim a draw by {method}"),
            GameError::UnknownNode(id) => write!(f, "unknown node {id}"),
        }
    }
}

impl Error for GameError {}

#[derive(Clone, Debug)]
struct Node {
    m: Option<Move>,
    position: Position,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    annotation: Annotation,
}

impl Node {
    fn new(m: Option<Move>, position: Position, parent: Option<NodeId>) -> Node {
        Node {
            m,
            position,
            parent,
            children: Vec::new(),
            annotation: Annotation::default(),
        }
    }
}

/// A game session: a tree of moves, a cursor, tag pairs and the outcome.
///
/// Cloning a game copies the entire tree.
#[derive(Clone, Debug)]
pub struct Game {
    nodes: Vec<Node>,
    current: NodeId,
    outcome: Option<Outcome>,
    method: Option<Method>,
    ignore_automatic_draws: bool,
    tag_pairs: BTreeMap<String, String>,
}

impl Game {
    const ROOT: NodeId = NodeId(0);

    /// A game from the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Position::new())
    }

    /// A game starting at `position`. The outcome of the starting position
    /// is evaluated right away, so a game seeded with a checkmate is
    /// already decided.
    pub fn from_position(position: Position) -> Game {
        let mut game = Game {
            nodes: vec![Node::new(None, position, None)],
            current: Game::ROOT,
            outcome: None,
            method: None,
            ignore_automatic_draws: false,
            tag_pairs: BTreeMap::new(),
        };
        game.evaluate();
        game
    }

    /// # Errors
    ///
    /// Errors if `fen` is not a valid FEN.
    pub fn from_fen(fen: &str) -> Result<Game, ParseFenError> {
        fen.parse().map(Game::from_position)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// How the outcome came about.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn ignores_automatic_draws(&self) -> bool {
        self.ignore_automatic_draws
    }

    /// Stop deciding fivefold repetitions, seventy-five-move rule draws and
    /// insufficient material automatically. Checkmate and stalemate still
    /// end the game.
    pub fn set_ignore_automatic_draws(&mut self, ignore: bool) {
        self.ignore_automatic_draws = ignore;
    }

    /// The position at the cursor.
    pub fn position(&self) -> &Position {
        &self.node(self.current).position
    }

    /// FEN of the position at the cursor.
    pub fn fen(&self) -> String {
        self.position().to_fen()
    }

    /// Legal moves at the cursor.
    pub fn valid_moves(&self) -> &MoveList {
        self.position().legal_moves()
    }

    pub fn root(&self) -> NodeId {
        Game::ROOT
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_at_start(&self) -> bool {
        self.current == Game::ROOT
    }

    pub fn is_at_end(&self) -> bool {
        self.node(self.current).children.is_empty()
    }

    /// Moves the cursor to its parent. Returns `false` at the root.
    pub fn go_back(&mut self) -> bool {
        match self.node(self.current).parent {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Moves the cursor to its main line continuation. Returns `false` at
    /// the end of a line.
    pub fn go_forward(&mut self) -> bool {
        match self.node(self.current).children.first() {
            Some(&child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// # Errors
    ///
    /// [`GameError::UnknownNode`] if `node` does not belong to this game.
    pub fn go_to(&mut self, node: NodeId) -> Result<(), GameError> {
        self.get(node)?;
        self.current = node;
        Ok(())
    }

    /// Moves the cursor up to the closest node on the main line, or leaves
    /// it in place if it is already there.
    pub fn navigate_to_main_line(&mut self) {
        while !self.is_main_line(self.current) {
            match self.node(self.current).parent {
                Some(parent) => self.current = parent,
                None => break,
            }
        }
    }

    /// Tests if `node` is reached from the root by always following the
    /// first child.
    pub fn is_main_line(&self, node: NodeId) -> bool {
        let mut node = node;
        while let Some(parent) = self.get(node).ok().and_then(|n| n.parent) {
            if self.node(parent).children.first() != Some(&node) {
                return false;
            }
            node = parent;
        }
        node == Game::ROOT
    }

    /// Plays `m` at the cursor and moves the cursor to the resulting node.
    ///
    /// The move is matched against the legal moves of the current position
    /// by origin, destination and promotion, so its tags are ignored and
    /// the stored move carries the tags of the move generator. If the
    /// cursor already has a child with that move, the child is reused,
    /// otherwise a new variation is added. Existing children are never
    /// discarded.
    ///
    /// Moves can still be played after the game is decided, to explore
    /// alternatives, but the outcome does not change.
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalMove`] if `m` is not legal at the cursor.
    pub fn push_move(&mut self, m: &Move, options: PushMoveOptions) -> Result<NodeId, GameError> {
        let parent = self.current;
        let node = self.insert_child(parent, m, options.force_mainline)?;
        self.current = node;
        self.evaluate();
        Ok(node)
    }

    /// Adds `m` as a continuation of `parent` without moving the cursor.
    /// Returns the existing child if `parent` already has that move.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownNode`] if `parent` does not belong to this
    /// game, [`GameError::IllegalMove`] if `m` is not legal there.
    pub fn add_variation(&mut self, parent: NodeId, m: &Move) -> Result<NodeId, GameError> {
        self.get(parent)?;
        self.insert_child(parent, m, false)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        m: &Move,
        force_mainline: bool,
    ) -> Result<NodeId, GameError> {
        let Some(legal) = self
            .node(parent)
            .position
            .legal_moves()
            .iter()
            .find(|legal| legal.same_squares(m))
            .copied()
        else {
            debug!(%m, fen = %self.node(parent).position, "rejected illegal move");
            return Err(GameError::IllegalMove(*m));
        };

        let existing = self
            .node(parent)
            .children
            .iter()
            .position(|&child| self.node(child).m.is_some_and(|m| m.same_squares(&legal)));

        let id = match existing {
            Some(index) => {
                let children = &mut self.nodes[parent.0].children;
                let id = children[index];
                if force_mainline && index > 0 {
                    children[..=index].rotate_right(1);
                    trace!(m = %legal, "promoted existing line to main line");
                } else {
                    trace!(m = %legal, "reused existing line");
                }
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                let position = self.node(parent).position.update(Some(&legal));
                self.nodes.push(Node::new(Some(legal), position, Some(parent)));
                let children = &mut self.nodes[parent.0].children;
                if force_mainline {
                    children.insert(0, id);
                } else {
                    children.push(id);
                }
                trace!(m = %legal, variation = children.len() > 1, "added line");
                id
            }
        };
        Ok(id)
    }

    /// Claims a draw.
    ///
    /// A draw by [`Method::DrawOffer`] is always accepted.
    /// [`Method::ThreefoldRepetition`] needs the current position to have
    /// occurred at least three times on the way from the root, and
    /// [`Method::FiftyMoveRule`] needs a halfmove clock of at least 100.
    ///
    /// # Errors
    ///
    /// Errors if the game is already decided, the precondition of the
    /// claim is not met, or `method` is not a draw that can be claimed.
    pub fn draw(&mut self, method: Method) -> Result<(), GameError> {
        self.check_undecided()
            .and_then(|()| self.check_claim(method))
            .map_err(|err| {
                debug!(%method, %err, "rejected draw claim");
                err
            })?;
        self.decide(Outcome::Draw, method);
        Ok(())
    }

    /// Resigns for `color`. The other side wins.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyDecided`] if the game already has an outcome.
    pub fn resign(&mut self, color: Color) -> Result<(), GameError> {
        self.check_undecided().map_err(|err| {
            debug!(%color, %err, "rejected resignation");
            err
        })?;
        self.decide(Outcome::Decisive { winner: !color }, Method::Resignation);
        Ok(())
    }

    /// Draw claims [`Game::draw()`] would accept right now.
    pub fn eligible_draws(&self) -> Vec<Method> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        [
            Method::DrawOffer,
            Method::ThreefoldRepetition,
            Method::FiftyMoveRule,
        ]
        .into_iter()
        .filter(|&method| self.check_claim(method).is_ok())
        .collect()
    }

    fn check_undecided(&self) -> Result<(), GameError> {
        match self.outcome {
            Some(outcome) => Err(GameError::AlreadyDecided(outcome)),
            None => Ok(()),
        }
    }

    fn check_claim(&self, method: Method) -> Result<(), GameError> {
        match method {
            Method::DrawOffer => Ok(()),
            Method::ThreefoldRepetition => {
                let found = self.repetitions();
                if found >= THREEFOLD_REPETITION {
                    Ok(())
                } else {
                    Err(GameError::InsufficientRepetitions { found })
                }
            }
            Method::FiftyMoveRule => {
                let found = self.position().halfmoves();
                if found >= FIFTY_MOVE_RULE {
                    Ok(())
                } else {
                    Err(GameError::HalfmoveClock { found })
                }
            }
            _ => Err(GameError::InvalidDrawMethod(method)),
        }
    }

    /// Number of times the current position occurred on the path from the
    /// root to the cursor, the current position included.
    pub fn repetitions(&self) -> usize {
        let current = self.position();
        self.ancestors(self.current)
            .filter(|&id| self.node(id).position.is_same_position(current))
            .count()
    }

    fn evaluate(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let pos = self.position();
        let decided = match pos.status() {
            Some(Method::Checkmate) => Some((
                Outcome::Decisive {
                    winner: !pos.turn(),
                },
                Method::Checkmate,
            )),
            Some(_) => Some((Outcome::Draw, Method::Stalemate)),
            None if self.ignore_automatic_draws => None,
            None if self.repetitions() >= FIVEFOLD_REPETITION => {
                Some((Outcome::Draw, Method::FivefoldRepetition))
            }
            None if pos.halfmoves() >= SEVENTY_FIVE_MOVE_RULE => {
                Some((Outcome::Draw, Method::SeventyFiveMoveRule))
            }
            None if pos.is_insufficient_material() => {
                Some((Outcome::Draw, Method::InsufficientMaterial))
            }
            None => None,
        };
        if let Some((outcome, method)) = decided {
            self.decide(outcome, method);
        }
    }

    fn decide(&mut self, outcome: Outcome, method: Method) {
        debug!(%outcome, %method, fen = %self.position(), "game decided");
        self.outcome = Some(outcome);
        self.method = Some(method);
    }

    /// The node and its ancestors up to the root.
    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&id| self.node(id).parent)
    }

    fn main_line(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(Game::ROOT), move |&id| {
            self.node(id).children.first().copied()
        })
    }

    /// Main line moves, starting from the root.
    pub fn moves(&self) -> Vec<&Move> {
        self.main_line()
            .filter_map(|id| self.node(id).m.as_ref())
            .collect()
    }

    /// Main line positions, starting with the position at the root.
    pub fn positions(&self) -> Vec<&Position> {
        self.main_line().map(|id| &self.node(id).position).collect()
    }

    /// Comments of each main line move.
    pub fn comments(&self) -> Vec<&[String]> {
        self.main_line()
            .skip(1)
            .map(|id| self.node(id).annotation.comments.as_slice())
            .collect()
    }

    /// Children of `node`, main line first. Empty for unknown nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map_or(&[][..], |n| n.children.as_slice())
    }

    /// Children of `node` other than the main line.
    pub fn variations(&self, node: NodeId) -> &[NodeId] {
        self.children(node).get(1..).unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).ok().and_then(|n| n.parent)
    }

    /// The move leading to `node`. `None` for the root.
    pub fn node_move(&self, node: NodeId) -> Option<&Move> {
        self.get(node).ok().and_then(|n| n.m.as_ref())
    }

    /// The position after the move leading to `node`.
    pub fn node_position(&self, node: NodeId) -> Option<&Position> {
        self.get(node).ok().map(|n| &n.position)
    }

    pub fn annotation(&self, node: NodeId) -> Option<&Annotation> {
        self.get(node).ok().map(|n| &n.annotation)
    }

    pub fn annotation_mut(&mut self, node: NodeId) -> Option<&mut Annotation> {
        self.nodes.get_mut(node.0).map(|n| &mut n.annotation)
    }

    /// Sets a tag pair. Returns `true` if an existing value was replaced.
    pub fn add_tag_pair(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.tag_pairs.insert(key.into(), value.into()).is_some()
    }

    pub fn tag_pair(&self, key: &str) -> Option<&str> {
        self.tag_pairs.get(key).map(String::as_str)
    }

    /// Returns `true` if the tag pair existed.
    pub fn remove_tag_pair(&mut self, key: &str) -> bool {
        self.tag_pairs.remove(key).is_some()
    }

    /// Tag pairs in key order.
    pub fn tag_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tag_pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn get(&self, node: NodeId) -> Result<&Node, GameError> {
        self.nodes.get(node.0).ok_or(GameError::UnknownNode(node))
    }

    /// Node lookup for ids produced by this game.
    fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.position(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    fn push(game: &mut Game, from: Square, to: Square) -> NodeId {
        game.push_move(&Move::new(from, to, None), PushMoveOptions::default())
            .expect("legal move")
    }

    #[test]
    fn test_push_reuses_existing_child() {
        let mut game = Game::new();
        let first = push(&mut game, Square::E2, Square::E4);
        assert!(game.go_back());
        let again = push(&mut game, Square::E2, Square::E4);
        assert_eq!(first, again);
        assert_eq!(game.children(game.root()), &[first]);
    }

    #[test]
    fn test_stored_move_has_generator_tags() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").expect("valid fen");
        let node = push(&mut game, Square::E1, Square::C1);
        let m = game.node_move(node).expect("move");
        assert_eq!(m.castling_side(), Some(crate::castling::CastlingSide::QueenSide));
    }

    #[test]
    fn test_force_mainline_rotates() {
        let mut game = Game::new();
        let a = push(&mut game, Square::E2, Square::E4);
        game.go_back();
        let b = push(&mut game, Square::D2, Square::D4);
        game.go_back();
        let c = push(&mut game, Square::C2, Square::C4);
        game.go_back();
        assert_eq!(game.children(game.root()), &[a, b, c]);

        let forced = game
            .push_move(
                &Move::new(Square::C2, Square::C4, None),
                PushMoveOptions {
                    force_mainline: true,
                },
            )
            .expect("legal move");
        assert_eq!(forced, c);
        assert_eq!(game.children(game.root()), &[c, a, b]);
        assert_eq!(game.variations(game.root()), &[a, b]);
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = Game::new();
        let err = game
            .push_move(&Move::new(Square::E2, Square::E5, None), PushMoveOptions::default())
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)));
        assert!(game.is_at_start());
        assert!(game.is_at_end());
    }

    #[test]
    fn test_unknown_node() {
        let mut game = Game::new();
        let other = {
            let mut other = Game::new();
            push(&mut other, Square::E2, Square::E4)
        };
        assert_eq!(game.go_to(other), Err(GameError::UnknownNode(other)));
        assert!(game.children(other).is_empty());
        assert_eq!(game.node_position(other), None);
    }

    #[test]
    fn test_is_main_line() {
        let mut game = Game::new();
        let e4 = push(&mut game, Square::E2, Square::E4);
        game.go_back();
        let d4 = push(&mut game, Square::D2, Square::D4);
        let d5 = push(&mut game, Square::D7, Square::D5);
        assert!(game.is_main_line(game.root()));
        assert!(game.is_main_line(e4));
        assert!(!game.is_main_line(d4));
        assert!(!game.is_main_line(d5));
    }
}
