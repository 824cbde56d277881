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

//! Chess rules: positions, legal move generation, game trees and draw
//! bookkeeping.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use rochade::Position;
//!
//! let pos = Position::new();
//! assert_eq!(pos.legal_moves().len(), 20);
//! ```
//!
//! Play moves in a game and let it decide the outcome:
//!
//! ```
//! use rochade::{Game, Method, Move, PushMoveOptions, Square};
//!
//! let mut game = Game::from_fen("k1K5/8/8/8/8/8/8/1Q6 w - - 0 1")?;
//! game.push_move(&Move::new(Square::B1, Square::B6, None), PushMoveOptions::default())?;
//! assert_eq!(game.method(), Some(Method::Stalemate));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Positions can be read from and written as [FEN](fen) and X-FEN, and
//! packed into a [fixed-width binary form](packed).
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   [`Square`] and [`Position`] (as FEN).
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![doc(html_root_url = "https://docs.rs/rochade/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod castling;
mod color;
mod m;
mod movegen;
mod outcome;
mod perft;
mod position;
mod role;
mod square;
mod types;
mod util;

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod fen;
pub mod game;
pub mod packed;

pub use bitboard::Bitboard;
pub use board::Board;
pub use castling::{CastlingRights, CastlingSide};
pub use color::{ByColor, Color, ParseColorError};
pub use fen::ParseFenError;
pub use game::{Annotation, Game, GameError, NodeId, PushMoveOptions};
pub use m::{Move, MoveList, MoveTags};
pub use outcome::{Method, Outcome, ParseOutcomeError};
pub use packed::UnpackError;
pub use perft::perft;
pub use position::{Position, PositionError};
pub use role::{ByRole, Role};
pub use square::{File, ParseSquareError, Rank, Square};
pub use types::{EnPassantMode, Piece};

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for File {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Rank {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Role {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
