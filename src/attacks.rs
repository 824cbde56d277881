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

//! Attack tables for all piece types.
//!
//! Stepping pieces use one precomputed mask per square. Sliding pieces use
//! one precomputed ray per square and direction, truncated behind the first
//! blocker at lookup time.

use crate::{bitboard::Bitboard, color::Color, square::Square};

const KING_DELTAS: [i32; 8] = [9, 8, 7, 1, -9, -8, -7, -1];
const KNIGHT_DELTAS: [i32; 8] = [17, 15, 10, 6, -17, -15, -10, -6];
const WHITE_PAWN_DELTAS: [i32; 2] = [7, 9];
const BLACK_PAWN_DELTAS: [i32; 2] = [-7, -9];

// Directions that increase the square index come first.
const NORTH: usize = 0;
const EAST: usize = 1;
const NORTH_EAST: usize = 2;
const NORTH_WEST: usize = 3;
const SOUTH: usize = 4;
const WEST: usize = 5;
const SOUTH_WEST: usize = 6;
const SOUTH_EAST: usize = 7;

const RAY_DELTAS: [i32; 8] = [8, 1, 9, 7, -8, -1, -9, -7];

/// Walks from `square` along each delta, stopping at the board edge or
/// after the first occupied square.
const fn sliding_attacks(square: i32, occupied: u64, deltas: &[i32]) -> u64 {
    let mut attack = 0;

    let mut i = 0;
    while i < deltas.len() {
        let mut previous = square;
        loop {
            let sq = previous + deltas[i];
            let file_diff = (sq & 0x7) - (previous & 0x7);
            if file_diff > 2 || file_diff < -2 || sq < 0 || sq > 63 {
                break;
            }
            let bb = 1 << sq;
            attack |= bb;
            if occupied & bb != 0 {
                break;
            }
            previous = sq;
        }
        i += 1;
    }

    attack
}

const fn step_table(deltas: &[i32]) -> [u64; 64] {
    let mut table = [0; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = sliding_attacks(sq as i32, !0, deltas);
        sq += 1;
    }
    table
}

const fn ray_table() -> [[u64; 64]; 8] {
    let mut table = [[0; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let mut sq = 0;
        while sq < 64 {
            table[dir][sq] = sliding_attacks(sq as i32, 0, &[RAY_DELTAS[dir]]);
            sq += 1;
        }
        dir += 1;
    }
    table
}

static KNIGHT_ATTACKS: [u64; 64] = step_table(&KNIGHT_DELTAS);
static KING_ATTACKS: [u64; 64] = step_table(&KING_DELTAS);
static WHITE_PAWN_ATTACKS: [u64; 64] = step_table(&WHITE_PAWN_DELTAS);
static BLACK_PAWN_ATTACKS: [u64; 64] = step_table(&BLACK_PAWN_DELTAS);
static RAYS: [[u64; 64]; 8] = ray_table();

/// Squares attacked by a pawn of the given color standing on `sq`.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(match color {
        Color::White => WHITE_PAWN_ATTACKS[sq.to_usize()],
        Color::Black => BLACK_PAWN_ATTACKS[sq.to_usize()],
    })
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.to_usize()])
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.to_usize()])
}

#[inline]
fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> u64 {
    let ray = RAYS[dir][sq.to_usize()];
    let blockers = ray & occupied.0;
    if blockers == 0 {
        return ray;
    }
    let blocker = if dir < SOUTH {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[dir][blocker as usize]
}

/// Looks up attacks for a rook on `sq` with `occupied` squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(
        ray_attacks(NORTH, sq, occupied)
            | ray_attacks(EAST, sq, occupied)
            | ray_attacks(SOUTH, sq, occupied)
            | ray_attacks(WEST, sq, occupied),
    )
}

/// Looks up attacks for a bishop on `sq` with `occupied` squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(
        ray_attacks(NORTH_EAST, sq, occupied)
            | ray_attacks(NORTH_WEST, sq, occupied)
            | ray_attacks(SOUTH_WEST, sq, occupied)
            | ray_attacks(SOUTH_EAST, sq, occupied),
    )
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_attacks() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::D4).count(), 8);
        assert_eq!(king_attacks(Square::H8).count(), 3);
        assert_eq!(
            pawn_attacks(Color::White, Square::A2),
            Bitboard::from(Square::B3)
        );
        assert_eq!(
            pawn_attacks(Color::Black, Square::E7),
            Bitboard::from(Square::D6) | Square::F6
        );
    }

    #[test]
    fn test_rook_attacks() {
        let occupied = Bitboard::from(Square::D6) | Square::F4 | Square::D2;
        let attacks = rook_attacks(Square::D4, occupied);
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::F4));
        assert!(!attacks.contains(Square::G4));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::D2));
        assert!(!attacks.contains(Square::D1));
        assert_eq!(attacks.count(), 9);
    }

    #[test]
    fn test_bishop_attacks() {
        let attacks = bishop_attacks(Square::A1, Bitboard::EMPTY);
        assert_eq!(attacks.count(), 7);
        assert!(attacks.contains(Square::H8));

        let blocked = bishop_attacks(Square::C1, Bitboard::from(Square::E3));
        assert!(blocked.contains(Square::E3));
        assert!(!blocked.contains(Square::F4));
        assert!(blocked.contains(Square::A3));
    }

    #[test]
    fn test_queen_attacks_empty_board() {
        assert_eq!(queen_attacks(Square::D4, Bitboard::EMPTY).count(), 27);
    }
}
