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

//! Fixed-width binary encoding of positions.
//!
//! A position takes exactly [`POSITION_BYTES`] bytes:
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0      | 96   | board: twelve big-endian bitboards, white king, queen, rook, bishop, knight, pawn, then the same for black |
//! | 96     | 1    | halfmove clock, saturating at 255 |
//! | 97     | 2    | fullmove number, big-endian, saturating at 65535 |
//! | 99     | 1    | en passant square index, or 64 if none |
//! | 100    | 1    | flags: castling rights in bits 0 to 3 (`K`, `Q`, `k`, `q`), black to move in bit 4, en passant present in bit 5 |

use std::{error::Error, fmt, mem, num::NonZeroU32};

use bitflags::bitflags;
use tracing::trace;

use crate::{
    bitboard::Bitboard,
    board::Board,
    castling::CastlingRights,
    color::Color,
    position::{Position, PositionError},
    role::Role,
    square::{Rank, Square},
};

pub const BOARD_BYTES: usize = 96;
pub const POSITION_BYTES: usize = BOARD_BYTES + 5;

const NO_SQUARE: u8 = 64;

const ROLE_ORDER: [Role; 6] = [
    Role::King,
    Role::Queen,
    Role::Rook,
    Role::Bishop,
    Role::Knight,
    Role::Pawn,
];

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    struct Flags: u8 {
        const WHITE_KING_SIDE = 1;
        const WHITE_QUEEN_SIDE = 2;
        const BLACK_KING_SIDE = 4;
        const BLACK_QUEEN_SIDE = 8;
        const CASTLING = 15;
        /// Black to move.
        const TURN = 16;
        const HAS_EN_PASSANT = 32;
    }
}

/// Error when decoding binary data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnpackError {
    Length { expected: usize, found: usize },
    /// Two bitboards claim the same square.
    Board,
    EnPassant,
    Fullmoves,
    /// The fields decode, but the placement is impossible.
    Position(PositionError),
}

impl fmt::Display for UnpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnpackError::Length { expected, found } => {
                write!(f, "expected {expected} bytes, found {found}")
            }
            UnpackError::Board => f.write_str("overlapping pieces in packed board"),
            UnpackError::EnPassant => f.write_str("invalid en passant square in packed position"),
            UnpackError::Fullmoves => f.write_str("fullmove number must be positive"),
            UnpackError::Position(err) => write!(f, "illegal packed position: {err}"),
        }
    }
}

impl Error for UnpackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UnpackError::Position(err) => Some(err),
            _ => None,
        }
    }
}

struct Writer<'a> {
    inner: &'a mut [u8],
}

impl Writer<'_> {
    fn new(dst: &mut [u8]) -> Writer<'_> {
        Writer { inner: dst }
    }

    fn write_u8(&mut self, n: u8) {
        self.write_bytes(&[n]);
    }

    fn write_u16(&mut self, n: u16) {
        self.write_bytes(&n.to_be_bytes());
    }

    fn write_u64(&mut self, n: u64) {
        self.write_bytes(&n.to_be_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let (head, tail) = mem::take(&mut self.inner).split_at_mut(bytes.len());
        head.copy_from_slice(bytes);
        self.inner = tail;
    }
}

struct Reader<'a> {
    inner: &'a [u8],
}

impl Reader<'_> {
    fn new(src: &[u8]) -> Reader<'_> {
        Reader { inner: src }
    }

    fn read_bytes<const N: usize>(&mut self) -> [u8; N] {
        let (head, tail) = self.inner.split_at(N);
        self.inner = tail;
        let mut bytes = [0; N];
        bytes.copy_from_slice(head);
        bytes
    }

    fn read_u8(&mut self) -> u8 {
        let [n]: [u8; 1] = self.read_bytes();
        n
    }

    fn read_u16(&mut self) -> u16 {
        u16::from_be_bytes(self.read_bytes())
    }

    fn read_u64(&mut self) -> u64 {
        u64::from_be_bytes(self.read_bytes())
    }
}

fn check_length(bytes: &[u8], expected: usize) -> Result<(), UnpackError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(UnpackError::Length {
            expected,
            found: bytes.len(),
        })
    }
}

impl Board {
    fn write_to(&self, writer: &mut Writer<'_>) {
        for color in Color::ALL {
            for role in ROLE_ORDER {
                writer.write_u64(self.by_piece(role.of(color)).into());
            }
        }
    }

    fn read_from(reader: &mut Reader<'_>) -> Result<Board, UnpackError> {
        let mut board = Board::empty();
        for color in Color::ALL {
            for role in ROLE_ORDER {
                for sq in Bitboard(reader.read_u64()) {
                    if board.occupied().contains(sq) {
                        return Err(UnpackError::Board);
                    }
                    board.set_piece_at(sq, role.of(color));
                }
            }
        }
        debug_assert!(board.is_consistent());
        Ok(board)
    }

    /// Encodes the placement as twelve big-endian bitboards.
    pub fn to_bytes(&self) -> [u8; BOARD_BYTES] {
        let mut bytes = [0; BOARD_BYTES];
        self.write_to(&mut Writer::new(&mut bytes));
        bytes
    }

    /// Decodes a placement written by [`Board::to_bytes()`].
    ///
    /// # Errors
    ///
    /// Fails on any length other than [`BOARD_BYTES`], and when two
    /// pieces would share a square.
    pub fn from_bytes(bytes: &[u8]) -> Result<Board, UnpackError> {
        check_length(bytes, BOARD_BYTES)?;
        Board::read_from(&mut Reader::new(bytes))
    }
}

impl Position {
    pub fn to_bytes(&self) -> [u8; POSITION_BYTES] {
        let mut bytes = [0; POSITION_BYTES];
        let mut writer = Writer::new(&mut bytes);

        self.board().write_to(&mut writer);
        writer.write_u8(u8::try_from(self.halfmoves()).unwrap_or(u8::MAX));
        writer.write_u16(u16::try_from(self.fullmoves().get()).unwrap_or(u16::MAX));
        writer.write_u8(self.ep_square().map_or(NO_SQUARE, u8::from));

        let mut flags = Flags::from_bits_truncate(self.castling_rights().bits());
        flags.set(Flags::TURN, self.turn().is_black());
        flags.set(Flags::HAS_EN_PASSANT, self.ep_square().is_some());
        writer.write_u8(flags.bits());

        bytes
    }

    /// Decodes a position written by [`Position::to_bytes()`].
    ///
    /// # Errors
    ///
    /// Fails on any length other than [`POSITION_BYTES`], on overlapping
    /// pieces, on an en passant square that is off the board or on the
    /// wrong rank, on a zero fullmove number, and with
    /// [`UnpackError::Position`] on a placement that no game can reach,
    /// such as a missing king.
    pub fn from_bytes(bytes: &[u8]) -> Result<Position, UnpackError> {
        Position::unpack(bytes).map_err(|err| {
            trace!(len = bytes.len(), %err, "rejected packed position");
            err
        })
    }

    fn unpack(bytes: &[u8]) -> Result<Position, UnpackError> {
        check_length(bytes, POSITION_BYTES)?;
        let mut reader = Reader::new(bytes);

        let board = Board::read_from(&mut reader)?;
        let halfmoves = u32::from(reader.read_u8());
        let fullmoves =
            NonZeroU32::new(u32::from(reader.read_u16())).ok_or(UnpackError::Fullmoves)?;
        let ep_index = reader.read_u8();
        let flags = Flags::from_bits_truncate(reader.read_u8());

        let turn = Color::from_white(!flags.contains(Flags::TURN));
        let castling_rights = CastlingRights::from_bits_truncate((flags & Flags::CASTLING).bits());

        let ep_square = if flags.contains(Flags::HAS_EN_PASSANT) {
            let sq = Square::try_from(ep_index).map_err(|_| UnpackError::EnPassant)?;
            if sq.rank() != turn.relative_rank(Rank::Sixth) {
                return Err(UnpackError::EnPassant);
            }
            Some(sq)
        } else {
            None
        };

        Position::from_setup(
            board,
            turn,
            castling_rights,
            ep_square,
            halfmoves,
            fullmoves,
        )
        .map_err(UnpackError::Position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut buf = [0; 11];

        let mut writer = Writer::new(&mut buf);
        writer.write_u8(7);
        writer.write_u16(0x0102);
        writer.write_u64(0x1234_5678_9abc_def0);

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_u8(), 7);
        assert_eq!(reader.read_u16(), 0x0102);
        assert_eq!(reader.read_u64(), 0x1234_5678_9abc_def0);
    }

    #[test]
    fn test_starting_position_layout() {
        let bytes = Position::new().to_bytes();
        // White king on e1.
        assert_eq!(&bytes[0..8], &0x10u64.to_be_bytes());
        assert_eq!(bytes[96], 0);
        assert_eq!(&bytes[97..99], &[0, 1]);
        assert_eq!(bytes[99], NO_SQUARE);
        assert_eq!(bytes[100], 0x0f);
    }

    #[test]
    fn test_position_roundtrip() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "2r3k1/1q1nbppp/r3p3/3pP3/pPpP4/P1Q2N2/2RN1PPP/2R4K b - b3 100 60",
            "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 17 301",
        ] {
            let pos: Position = fen.parse().expect("valid fen");
            let decoded = Position::from_bytes(&pos.to_bytes()).expect("valid bytes");
            assert!(decoded.board().is_consistent());
            assert_eq!(decoded.to_fen(), fen);
        }
    }

    #[test]
    fn test_saturating_clocks() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 w - - 300 70000".parse().expect("valid fen");
        let decoded = Position::from_bytes(&pos.to_bytes()).expect("valid bytes");
        assert_eq!(decoded.halfmoves(), 255);
        assert_eq!(decoded.fullmoves().get(), 65535);
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Position::from_bytes(&[0; 100]).err(),
            Some(UnpackError::Length {
                expected: POSITION_BYTES,
                found: 100
            })
        );
        assert!(Position::from_bytes(&[0; 102]).is_err());
        assert!(Board::from_bytes(&[0; 101]).is_err());
    }

    #[test]
    fn test_overlapping_board() {
        let mut bytes = Position::new().to_bytes();
        // Put a white queen on top of the white king.
        bytes[8..16].copy_from_slice(&0x18u64.to_be_bytes());
        assert_eq!(Position::from_bytes(&bytes).err(), Some(UnpackError::Board));
    }

    #[test]
    fn test_invalid_fields() {
        let mut bytes = Position::new().to_bytes();
        bytes[97] = 0;
        bytes[98] = 0;
        assert_eq!(Position::from_bytes(&bytes).err(), Some(UnpackError::Fullmoves));

        let mut bytes = Position::new().to_bytes();
        bytes[99] = NO_SQUARE;
        bytes[100] |= Flags::HAS_EN_PASSANT.bits();
        assert_eq!(Position::from_bytes(&bytes).err(), Some(UnpackError::EnPassant));
    }

    #[test]
    fn test_impossible_placement() {
        let mut bytes = Position::new().to_bytes();
        // Remove the black king.
        bytes[48..56].copy_from_slice(&0u64.to_be_bytes());
        assert_eq!(
            Position::from_bytes(&bytes).err(),
            Some(UnpackError::Position(PositionError::Kings {
                color: Color::Black
            }))
        );

        let mut bytes = Position::new().to_bytes();
        // White queens on every empty square of ranks 3 to 6.
        bytes[8..16].copy_from_slice(&0x0000_ffff_ffff_0008u64.to_be_bytes());
        assert_eq!(
            Position::from_bytes(&bytes).err(),
            Some(UnpackError::Position(PositionError::TooManyPieces {
                color: Color::White
            }))
        );

        // Board decoding alone accepts any placement without overlaps.
        let mut bytes = Board::new().to_bytes();
        bytes[0..8].copy_from_slice(&0u64.to_be_bytes());
        assert!(Board::from_bytes(&bytes).is_ok());
    }
}
