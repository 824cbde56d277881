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

//! Parse and write Forsyth-Edwards-Notation.
//!
//! # Examples
//!
//! ```
//! use rochade::{Position, Square};
//!
//! let pos: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//!     .parse()
//!     .expect("valid fen");
//! assert_eq!(pos.ep_square(), Some(Square::E3));
//!
//! // X-FEN omits the en passant square, because no black pawn can capture.
//! assert_eq!(
//!     pos.to_xfen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
//! );
//! ```

use std::{error::Error, fmt, num::NonZeroU32, str::FromStr};

use tracing::trace;

use crate::{
    board::Board,
    castling::CastlingRights,
    color::Color,
    position::{Position, PositionError},
    square::{File, Rank, Square},
    types::{EnPassantMode, Piece},
};

/// Errors that can occur when parsing a FEN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseFenError {
    /// Not exactly six space separated fields.
    Fields,
    Board,
    Turn,
    Castling,
    EnPassant,
    HalfmoveClock,
    Fullmoves,
    /// The fields are well formed, but the placement is impossible.
    Position(PositionError),
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseFenError::Position(err) => return write!(f, "illegal fen: {err}"),
            ParseFenError::Fields => "invalid fen: expected 6 fields",
            ParseFenError::Board => "invalid board part in fen",
            ParseFenError::Turn => "invalid turn part in fen",
            ParseFenError::Castling => "invalid castling part in fen",
            ParseFenError::EnPassant => "invalid en passant part in fen",
            ParseFenError::HalfmoveClock => "invalid halfmove clock in fen",
            ParseFenError::Fullmoves => "invalid fullmove part in fen",
        })
    }
}

impl Error for ParseFenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseFenError::Position(err) => Some(err),
            _ => None,
        }
    }
}

impl Board {
    /// Parses the piece placement part of a FEN: eight ranks separated by
    /// `/`, from the eighth rank down.
    pub fn from_ascii_board_fen(board_fen: &[u8]) -> Result<Board, ParseFenError> {
        let mut board = Board::empty();
        let mut ranks = 0;

        for (i, rank_fen) in board_fen.split(|&ch| ch == b'/').enumerate() {
            if i >= 8 {
                return Err(ParseFenError::Board);
            }
            let rank = Rank::new(7 - i as u32);

            let mut file = 0;
            for &ch in rank_fen {
                if (b'1'..=b'8').contains(&ch) {
                    file += u32::from(ch - b'0');
                } else if let Some(piece) = Piece::from_char(char::from(ch)) {
                    if file >= 8 {
                        return Err(ParseFenError::Board);
                    }
                    board.set_piece_at(Square::from_coords(File::new(file), rank), piece);
                    file += 1;
                } else {
                    return Err(ParseFenError::Board);
                }

                if file > 8 {
                    return Err(ParseFenError::Board);
                }
            }

            if file != 8 {
                return Err(ParseFenError::Board);
            }
            ranks += 1;
        }

        if ranks == 8 {
            Ok(board)
        } else {
            Err(ParseFenError::Board)
        }
    }

    /// The piece placement part of a FEN.
    pub fn board_fen(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Board {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Board, ParseFenError> {
        Board::from_ascii_board_fen(s.as_bytes())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty = 0;

            for file in File::ALL {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.char())?;
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > Rank::First {
                f.write_str("/")?;
            }
        }
        Ok(())
    }
}

impl Position {
    /// Parses a FEN.
    ///
    /// All six fields are required, separated by single spaces. The en
    /// passant square, if any, must be on the sixth rank when white is to
    /// move and on the third rank when black is to move.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFenError`] naming the first field that is invalid, or
    /// [`ParseFenError::Position`] if each side does not have exactly one
    /// king and at most the material of a real game.
    pub fn from_ascii(fen: &[u8]) -> Result<Position, ParseFenError> {
        let fields: Vec<&[u8]> = fen.split(|&ch| ch == b' ').collect();
        let [board, turn, castling, ep_square, halfmoves, fullmoves] = fields[..] else {
            return Err(ParseFenError::Fields);
        };

        let board = Board::from_ascii_board_fen(board)?;

        let turn = match turn {
            b"w" => Color::White,
            b"b" => Color::Black,
            _ => return Err(ParseFenError::Turn),
        };

        let castling_rights = CastlingRights::from_ascii(castling).ok_or(ParseFenError::Castling)?;

        let ep_square = match ep_square {
            b"-" => None,
            text => {
                let sq = Square::from_ascii(text).map_err(|_| ParseFenError::EnPassant)?;
                if sq.rank() != turn.relative_rank(Rank::Sixth) {
                    return Err(ParseFenError::EnPassant);
                }
                Some(sq)
            }
        };

        let halfmoves = btoi::btou(halfmoves).map_err(|_| ParseFenError::HalfmoveClock)?;
        let fullmoves = btoi::btou(fullmoves)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(ParseFenError::Fullmoves)?;

        Position::from_setup(
            board,
            turn,
            castling_rights,
            ep_square,
            halfmoves,
            fullmoves,
        )
        .map_err(ParseFenError::Position)
    }

    /// Writes a FEN, with the en passant square filtered by `mode`.
    pub fn fen_with(&self, mode: EnPassantMode) -> String {
        let ep_square = self
            .ep_square_with(mode)
            .map_or_else(|| "-".to_owned(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board(),
            self.turn().char(),
            self.castling_rights(),
            ep_square,
            self.halfmoves(),
            self.fullmoves()
        )
    }

    /// Writes a FEN. The en passant square is included after every double
    /// pawn push.
    pub fn to_fen(&self) -> String {
        self.fen_with(EnPassantMode::Always)
    }

    /// Writes an X-FEN. The en passant square is included only if a pawn
    /// stands ready to capture.
    pub fn to_xfen(&self) -> String {
        self.fen_with(EnPassantMode::PseudoLegal)
    }
}

impl FromStr for Position {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Position, ParseFenError> {
        Position::from_ascii(s.as_bytes()).map_err(|err| {
            trace!(fen = s, %err, "rejected fen");
            err
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fen())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Position, D::Error> {
        struct FenVisitor;

        impl serde::de::Visitor<'_> for FenVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("fen string")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Position, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(FenVisitor)
    }
}
