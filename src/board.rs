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

//! Piece placement.

use crate::{
    attacks,
    bitboard::Bitboard,
    color::{ByColor, Color},
    m::Move,
    role::{ByRole, Role},
    square::Square,
    types::Piece,
};

/// [`Piece`] positions on a board.
///
/// Kept as one bitboard per role, one per color, and their union. A board
/// says nothing about whose turn it is or which special moves are available.
///
/// # Examples
///
/// ```
/// use rochade::{Board, Color, Role, Square};
///
/// let board = Board::new();
/// assert_eq!(board.piece_at(Square::E1), Some(Role::King.of(Color::White)));
/// assert_eq!(board.piece_at(Square::E4), None);
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    by_role: ByRole<Bitboard>,
    by_color: ByColor<Bitboard>,
    occupied: Bitboard,
}

impl Board {
    /// The standard starting placement.
    pub const fn new() -> Board {
        Board {
            by_role: ByRole {
                pawn: Bitboard(0x00ff_0000_0000_ff00),
                knight: Bitboard(0x4200_0000_0000_0042),
                bishop: Bitboard(0x2400_0000_0000_0024),
                rook: Bitboard(0x8100_0000_0000_0081),
                queen: Bitboard(0x0800_0000_0000_0008),
                king: Bitboard(0x1000_0000_0000_0010),
            },
            by_color: ByColor {
                white: Bitboard(0xffff),
                black: Bitboard(0xffff_0000_0000_0000),
            },
            occupied: Bitboard(0xffff_0000_0000_ffff),
        }
    }

    pub const fn empty() -> Board {
        Board {
            by_role: ByRole {
                pawn: Bitboard::EMPTY,
                knight: Bitboard::EMPTY,
                bishop: Bitboard::EMPTY,
                rook: Bitboard::EMPTY,
                queen: Bitboard::EMPTY,
                king: Bitboard::EMPTY,
            },
            by_color: ByColor {
                white: Bitboard::EMPTY,
                black: Bitboard::EMPTY,
            },
            occupied: Bitboard::EMPTY,
        }
    }

    #[inline]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub const fn by_color(&self, color: Color) -> Bitboard {
        *self.by_color.get(color)
    }

    #[inline]
    pub const fn by_role(&self, role: Role) -> Bitboard {
        *self.by_role.get(role)
    }

    #[inline]
    pub const fn by_piece(&self, piece: Piece) -> Bitboard {
        Bitboard(self.by_color(piece.color).0 & self.by_role(piece.role).0)
    }

    #[inline]
    pub const fn pawns(&self) -> Bitboard {
        self.by_role.pawn
    }

    #[inline]
    pub const fn knights(&self) -> Bitboard {
        self.by_role.knight
    }

    #[inline]
    pub const fn bishops(&self) -> Bitboard {
        self.by_role.bishop
    }

    #[inline]
    pub const fn rooks(&self) -> Bitboard {
        self.by_role.rook
    }

    #[inline]
    pub const fn queens(&self) -> Bitboard {
        self.by_role.queen
    }

    #[inline]
    pub const fn kings(&self) -> Bitboard {
        self.by_role.king
    }

    /// The king of the given side, unless there is none or more than one.
    #[inline]
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.by_piece(color.king()).single_square()
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.by_color.white.contains(sq) {
            Some(Color::White)
        } else if self.by_color.black.contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub fn role_at(&self, sq: Square) -> Option<Role> {
        if self.occupied.contains(sq) {
            self.by_role.find(|bb| bb.contains(sq))
        } else {
            None
        }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = self.color_at(sq)?;
        let role = self.role_at(sq)?;
        Some(role.of(color))
    }

    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.by_color.get_mut(piece.color).remove(sq);
        self.by_role.get_mut(piece.role).remove(sq);
        self.occupied.remove(sq);
        Some(piece)
    }

    /// Puts `piece` on `sq`, replacing whatever stood there.
    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) {
        self.remove_piece_at(sq);
        self.by_color.get_mut(piece.color).add(sq);
        self.by_role.get_mut(piece.role).add(sq);
        self.occupied.add(sq);
    }

    /// Iterates over all pieces, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Pieces of `attacker` that attack `sq`, given a set of blocking squares.
    ///
    /// Passing a custom `occupied` allows asking questions about
    /// hypothetical boards, such as squares behind a moving king.
    pub fn attacks_to(&self, sq: Square, attacker: Color, occupied: Bitboard) -> Bitboard {
        let rooks_and_queens = self.rooks() | self.queens();
        let bishops_and_queens = self.bishops() | self.queens();

        self.by_color(attacker)
            & ((attacks::rook_attacks(sq, occupied) & rooks_and_queens)
                | (attacks::bishop_attacks(sq, occupied) & bishops_and_queens)
                | (attacks::knight_attacks(sq) & self.knights())
                | (attacks::king_attacks(sq) & self.kings())
                | (attacks::pawn_attacks(!attacker, sq) & self.pawns()))
    }

    #[inline]
    pub fn is_attacked(&self, sq: Square, attacker: Color) -> bool {
        self.attacks_to(sq, attacker, self.occupied).any()
    }

    /// Tests if the king of `color` is attacked. A side without a king is
    /// never in check.
    pub fn is_check(&self, color: Color) -> bool {
        self.king_of(color)
            .is_some_and(|king| self.is_attacked(king, !color))
    }

    /// Plays `m` with `piece` on the board.
    ///
    /// Removes whatever stood on the destination, the victim of an en passant
    /// capture, and moves the rook along when castling. The move is not
    /// checked for legality.
    pub fn apply(&mut self, m: &Move, piece: Piece) {
        self.remove_piece_at(m.from);

        if m.is_en_passant() {
            self.remove_piece_at(Square::from_coords(m.to.file(), m.from.rank()));
        }

        if let Some(side) = m.castling_side() {
            let rank = m.from.rank();
            if let Some(rook) = self.remove_piece_at(Square::from_coords(side.rook_from_file(), rank)) {
                self.set_piece_at(Square::from_coords(side.rook_to_file(), rank), rook);
            }
        }

        let placed = match m.promotion {
            Some(role) => role.of(piece.color),
            None => piece,
        };
        self.set_piece_at(m.to, placed);
    }

    /// Tests if there is enough material left for a checkmate to be possible.
    ///
    /// Insufficient are: bare kings, a single knight or bishop against a
    /// bare king, and one bishop each when both stand on squares of the
    /// same color.
    pub fn has_sufficient_material(&self) -> bool {
        if (self.pawns() | self.rooks() | self.queens()).any() {
            return true;
        }

        let minors = self.knights() | self.bishops();
        if minors.count() <= 1 {
            return false;
        }
        if Color::ALL
            .into_iter()
            .any(|color| (minors & self.by_color(color)).more_than_one())
        {
            return true;
        }

        // One minor each.
        if self.knights().any() {
            return true;
        }
        self.bishops().intersects(Bitboard::DARK_SQUARES)
            && self.bishops().intersects(Bitboard::LIGHT_SQUARES)
    }

    /// Tests that role and color bitboards agree with each other.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut seen = Bitboard::EMPTY;
        for role in Role::ALL {
            let bb = self.by_role(role);
            if seen.intersects(bb) {
                return false;
            }
            seen |= bb;
        }
        seen == self.occupied
            && !self.by_color.white.intersects(self.by_color.black)
            && (self.by_color.white | self.by_color.black) == self.occupied
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::m::MoveTags;

    #[test]
    fn test_piece_at() {
        let board = Board::new();
        assert_eq!(board.piece_at(Square::A2), Some(Color::White.pawn()));
        assert_eq!(board.piece_at(Square::D8), Some(Role::Queen.of(Color::Black)));
        assert_eq!(board.piece_at(Square::C5), None);
        assert_eq!(board.pieces().count(), 32);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_set_and_remove() {
        let mut board = Board::empty();
        board.set_piece_at(Square::D4, Color::Black.rook());
        board.set_piece_at(Square::D4, Color::White.king());
        assert_eq!(board.piece_at(Square::D4), Some(Color::White.king()));
        assert_eq!(board.occupied().count(), 1);
        assert!(board.rooks().is_empty());
        assert_eq!(board.remove_piece_at(Square::D4), Some(Color::White.king()));
        assert_eq!(board, Board::empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.remove_piece_at(Square::E2);
        assert!(board.piece_at(Square::E2).is_some());
        assert!(copy.piece_at(Square::E2).is_none());
    }

    #[test]
    fn test_apply_castle() {
        let mut board = Board::empty();
        board.set_piece_at(Square::E1, Color::White.king());
        board.set_piece_at(Square::A1, Color::White.rook());
        let m = Move {
            tags: MoveTags::QUEEN_SIDE_CASTLE,
            ..Move::new(Square::E1, Square::C1, None)
        };
        board.apply(&m, Color::White.king());
        assert_eq!(board.piece_at(Square::C1), Some(Color::White.king()));
        assert_eq!(board.piece_at(Square::D1), Some(Color::White.rook()));
        assert_eq!(board.occupied().count(), 2);
    }

    #[test]
    fn test_apply_en_passant() {
        let mut board = Board::empty();
        board.set_piece_at(Square::E5, Color::White.pawn());
        board.set_piece_at(Square::D5, Color::Black.pawn());
        let m = Move {
            tags: MoveTags::CAPTURE | MoveTags::EN_PASSANT,
            ..Move::new(Square::E5, Square::D6, None)
        };
        board.apply(&m, Color::White.pawn());
        assert_eq!(board.piece_at(Square::D6), Some(Color::White.pawn()));
        assert_eq!(board.piece_at(Square::D5), None);
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn test_apply_promotion_capture() {
        let mut board = Board::empty();
        board.set_piece_at(Square::B7, Color::White.pawn());
        board.set_piece_at(Square::A8, Color::Black.rook());
        let m = Move {
            tags: MoveTags::CAPTURE,
            ..Move::new(Square::B7, Square::A8, Some(Role::Queen))
        };
        board.apply(&m, Color::White.pawn());
        assert_eq!(board.piece_at(Square::A8), Some(Role::Queen.of(Color::White)));
        assert!(board.by_color(Color::Black).is_empty());
    }

    #[test]
    fn test_attacks_to() {
        let board = Board::new();
        assert!(board.is_attacked(Square::F3, Color::White));
        assert!(!board.is_attacked(Square::E4, Color::White));
        assert!(board.is_attacked(Square::F6, Color::Black));
        assert_eq!(
            board.attacks_to(Square::F3, Color::White, board.occupied()),
            Bitboard::from(Square::E2) | Square::G2 | Square::G1
        );
    }
}
