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

use std::{error::Error, fmt, num::NonZeroU32};

use once_cell::sync::OnceCell;

use crate::{
    attacks,
    bitboard::Bitboard,
    board::Board,
    castling::CastlingRights,
    color::Color,
    m::{Move, MoveList},
    movegen,
    outcome::Method,
    role::Role,
    square::{Rank, Square},
    types::EnPassantMode,
};

/// Reasons a decoded placement cannot stand for a chess position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionError {
    /// The side does not have exactly one king.
    Kings { color: Color },
    TooManyPieces { color: Color },
    /// More pawns and promoted pieces than the eight pawns a side starts
    /// with could account for.
    ImpossibleMaterial { color: Color },
    PawnsOnBackrank,
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Kings { color } => write!(f, "{color} does not have exactly one king"),
            PositionError::TooManyPieces { color } => {
                write!(f, "{color} has more than 16 pieces")
            }
            PositionError::ImpossibleMaterial { color } => {
                write!(f, "{color} has more material than promotions allow")
            }
            PositionError::PawnsOnBackrank => f.write_str("pawns on the first or eighth rank"),
        }
    }
}

impl Error for PositionError {}

/// Counts pieces beyond the initial set, each of which must have been a
/// pawn that promoted.
fn promoted_pieces(board: &Board, color: Color) -> usize {
    let ours = board.by_color(color);
    (board.queens() & ours).count().saturating_sub(1)
        + (board.rooks() & ours).count().saturating_sub(2)
        + (board.knights() & ours).count().saturating_sub(2)
        + (board.bishops() & ours & Bitboard::DARK_SQUARES).count().saturating_sub(1)
        + (board.bishops() & ours & Bitboard::LIGHT_SQUARES).count().saturating_sub(1)
}

/// A snapshot of a game: placement, side to move, castling rights,
/// en passant square and clocks.
///
/// Positions are never modified. [`Position::update()`] returns a new
/// position. The legal moves are computed on first request and then kept
/// for the lifetime of the value, so sharing a position between threads
/// is fine.
///
/// # Examples
///
/// ```
/// use rochade::{Move, Position, Square};
///
/// let pos = Position::new();
/// assert_eq!(pos.legal_moves().len(), 20);
///
/// let e4 = pos
///     .legal_moves()
///     .iter()
///     .find(|m| m.from == Square::E2 && m.to == Square::E4)
///     .copied()
///     .expect("legal move");
/// let pos = pos.update(Some(&e4));
/// assert_eq!(pos.ep_square(), Some(Square::E3));
/// ```
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    fullmoves: NonZeroU32,
    in_check: bool,
    legal_moves: OnceCell<MoveList>,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Position {
        Position::from_parts(
            Board::new(),
            Color::White,
            CastlingRights::all(),
            None,
            0,
            NonZeroU32::MIN,
        )
    }

    /// Validates a decoded placement and assembles a position from it.
    ///
    /// Every position accepted here has at most the material of a real
    /// game, which keeps the number of legal moves within
    /// [`MoveList`] capacity.
    pub(crate) fn from_setup(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmoves: u32,
        fullmoves: NonZeroU32,
    ) -> Result<Position, PositionError> {
        for color in Color::ALL {
            if board.by_piece(color.king()).count() != 1 {
                return Err(PositionError::Kings { color });
            }
            if board.by_color(color).count() > 16 {
                return Err(PositionError::TooManyPieces { color });
            }
            if board.by_piece(color.pawn()).count() + promoted_pieces(&board, color) > 8 {
                return Err(PositionError::ImpossibleMaterial { color });
            }
        }
        if board
            .pawns()
            .intersects(Bitboard::from_rank(Rank::First) | Bitboard::from_rank(Rank::Eighth))
        {
            return Err(PositionError::PawnsOnBackrank);
        }

        Ok(Position::from_parts(
            board,
            turn,
            castling_rights,
            ep_square,
            halfmoves,
            fullmoves,
        ))
    }

    /// Assembles a position. Whether the side to move is in check is
    /// derived from the board.
    pub(crate) fn from_parts(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmoves: u32,
        fullmoves: NonZeroU32,
    ) -> Position {
        let in_check = board.is_check(turn);
        Position {
            board,
            turn,
            castling_rights,
            ep_square,
            halfmoves,
            fullmoves,
            in_check,
            legal_moves: OnceCell::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// The square a pawn skipped over with a double push on the last move.
    ///
    /// This is set after every double push, whether or not a capture is
    /// possible. See [`Position::ep_square_with()`].
    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// The en passant square, filtered according to `mode`.
    pub fn ep_square_with(&self, mode: EnPassantMode) -> Option<Square> {
        let ep_square = self.ep_square?;
        let ready = match mode {
            EnPassantMode::Always => true,
            EnPassantMode::PseudoLegal => (attacks::pawn_attacks(!self.turn, ep_square)
                & self.board.by_piece(self.turn.pawn()))
            .any(),
            EnPassantMode::Legal => self.legal_moves().iter().any(Move::is_en_passant),
        };
        ready.then_some(ep_square)
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// Starts at 1 and is incremented after every black move.
    #[inline]
    pub fn fullmoves(&self) -> NonZeroU32 {
        self.fullmoves
    }

    /// Plies played since a game from the starting position would have
    /// begun, derived from the move number and side to move.
    pub fn ply(&self) -> u32 {
        (self.fullmoves.get() - 1)
            .saturating_mul(2)
            .saturating_add(u32::from(self.turn.is_black()))
    }

    /// Tests if the side to move is in check.
    #[inline]
    pub fn is_check(&self) -> bool {
        self.in_check
    }

    /// All legal moves, tagged. Computed once per position.
    pub fn legal_moves(&self) -> &MoveList {
        self.legal_moves.get_or_init(|| movegen::legal_moves(self))
    }

    /// `Checkmate` or `Stalemate` if the side to move has no legal moves,
    /// `None` otherwise.
    pub fn status(&self) -> Option<Method> {
        if !self.legal_moves().is_empty() {
            None
        } else if self.in_check {
            Some(Method::Checkmate)
        } else {
            Some(Method::Stalemate)
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.status() == Some(Method::Checkmate)
    }

    pub fn is_stalemate(&self) -> bool {
        self.status() == Some(Method::Stalemate)
    }

    pub fn is_insufficient_material(&self) -> bool {
        !self.board.has_sufficient_material()
    }

    /// Derives the position after `m`, or after passing the turn if `m` is
    /// `None`.
    ///
    /// The move is trusted: it should be one of [`Position::legal_moves()`].
    /// Anything else yields a position that may not be reachable in a real
    /// game.
    #[must_use]
    pub fn update(&self, m: Option<&Move>) -> Position {
        let Some(m) = m else {
            return self.null_move();
        };

        let us = self.turn;
        let moved = self.board.piece_at(m.from);
        let is_pawn = moved.is_some_and(|piece| piece.role == Role::Pawn);
        let is_capture = m.is_capture() || self.board.occupied().contains(m.to);

        let mut board = self.board.clone();
        if let Some(piece) = moved {
            board.apply(m, piece);
        }

        let mut castling_rights = self.castling_rights
            - CastlingRights::touched(m.from)
            - CastlingRights::touched(m.to);
        if moved.is_some_and(|piece| piece.role == Role::King) {
            castling_rights -= CastlingRights::color(us);
        }

        let halfmoves = if is_pawn || is_capture {
            0
        } else {
            self.halfmoves.saturating_add(1)
        };

        let ep_square = if is_pawn && m.from.rank().to_u32().abs_diff(m.to.rank().to_u32()) == 2 {
            m.from.offset(if us.is_white() { 8 } else { -8 })
        } else {
            None
        };

        Position::from_parts(
            board,
            !us,
            castling_rights,
            ep_square,
            halfmoves,
            self.next_fullmoves(),
        )
    }

    /// Passes the turn without moving.
    #[must_use]
    pub fn null_move(&self) -> Position {
        Position::from_parts(
            self.board.clone(),
            !self.turn,
            self.castling_rights,
            None,
            self.halfmoves.saturating_add(1),
            self.next_fullmoves(),
        )
    }

    fn next_fullmoves(&self) -> NonZeroU32 {
        if self.turn.is_black() {
            self.fullmoves.saturating_add(1)
        } else {
            self.fullmoves
        }
    }

    /// Compares placement, side to move, castling rights and en passant
    /// square, ignoring the clocks. Two positions that agree here count as
    /// the same position for repetitions.
    pub fn is_same_position(&self, other: &Position) -> bool {
        self.board == other.board
            && self.turn == other.turn
            && self.castling_rights == other.castling_rights
            && self.ep_square == other.ep_square
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.is_same_position(other)
            && self.halfmoves == other.halfmoves
            && self.fullmoves == other.fullmoves
    }
}

impl Eq for Position {}
