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

use std::fmt;

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::{castling::CastlingSide, role::Role, square::Square};

bitflags! {
    /// Facts about a move, recorded by the move generator.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MoveTags: u8 {
        /// The king moves two squares towards the h-file rook.
        const KING_SIDE_CASTLE = 1;
        /// The king moves two squares towards the a-file rook.
        const QUEEN_SIDE_CASTLE = 2;
        /// A piece is removed from the board.
        const CAPTURE = 4;
        /// A pawn captures en passant. Always combined with `CAPTURE`.
        const EN_PASSANT = 8;
        /// The opponent's king is attacked afterwards.
        const CHECK = 16;
    }
}

/// A move from `from` to `to`.
///
/// Castling is represented by the king's move, so white castling short is
/// `e1g1` with [`MoveTags::KING_SIDE_CASTLE`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
    pub tags: MoveTags,
}

impl Move {
    /// Creates an untagged move, as a request to be resolved against the
    /// legal moves of a position.
    pub const fn new(from: Square, to: Square, promotion: Option<Role>) -> Move {
        Move {
            from,
            to,
            promotion,
            tags: MoveTags::empty(),
        }
    }

    #[inline]
    pub const fn has_tag(&self, tag: MoveTags) -> bool {
        self.tags.contains(tag)
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.has_tag(MoveTags::CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.has_tag(MoveTags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_check(&self) -> bool {
        self.has_tag(MoveTags::CHECK)
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    pub const fn castling_side(&self) -> Option<CastlingSide> {
        if self.has_tag(MoveTags::KING_SIDE_CASTLE) {
            Some(CastlingSide::KingSide)
        } else if self.has_tag(MoveTags::QUEEN_SIDE_CASTLE) {
            Some(CastlingSide::QueenSide)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.castling_side().is_some()
    }

    /// Compares origin, destination and promotion, ignoring tags.
    #[inline]
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

/// Enough room for every legal move in any reachable position.
pub type MoveList = ArrayVec<Move, 256>;
