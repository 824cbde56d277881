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

//! Legal move generation.
//!
//! Candidates are generated per piece type. Each one is played on a
//! scratch board and pushed only if the mover's king is not attacked
//! afterwards, so the move list never holds more than the legal moves.
//! The same simulation decides the check tag.

use crate::{
    attacks,
    bitboard::Bitboard,
    board::Board,
    castling::CastlingSide,
    m::{Move, MoveList, MoveTags},
    position::Position,
    role::Role,
    square::{Rank, Square},
};

pub(crate) fn legal_moves(pos: &Position) -> MoveList {
    let mut moves = MoveList::new();

    gen_pawn_moves(pos, &mut moves);
    KnightTag::gen_moves(pos, &mut moves);
    BishopTag::gen_moves(pos, &mut moves);
    RookTag::gen_moves(pos, &mut moves);
    QueenTag::gen_moves(pos, &mut moves);
    KingTag::gen_moves(pos, &mut moves);
    gen_castling_moves(pos, &mut moves);

    moves
}

/// Plays the candidate on a scratch board. Drops it if it exposes the
/// mover's king, otherwise records whether it gives check and pushes it.
fn push_legal(board: &Board, moves: &mut MoveList, mut m: Move) {
    let Some(piece) = board.piece_at(m.from) else {
        return;
    };

    let mut after = board.clone();
    after.apply(&m, piece);

    if after.is_check(piece.color) {
        return;
    }
    if after.is_check(!piece.color) {
        m.tags |= MoveTags::CHECK;
    }
    moves.push(m);
}

fn capture_tag(board: &Board, to: Square) -> MoveTags {
    if board.occupied().contains(to) {
        MoveTags::CAPTURE
    } else {
        MoveTags::empty()
    }
}

trait Stepper {
    const ROLE: Role;

    fn attacks(from: Square) -> Bitboard;

    fn gen_moves(pos: &Position, moves: &mut MoveList) {
        let board = pos.board();
        let us = pos.turn();
        for from in board.by_piece(Self::ROLE.of(us)) {
            for to in Self::attacks(from) & !board.by_color(us) {
                push_legal(
                    board,
                    moves,
                    Move {
                        tags: capture_tag(board, to),
                        ..Move::new(from, to, None)
                    },
                );
            }
        }
    }
}

trait Slider {
    const ROLE: Role;

    fn attacks(from: Square, occupied: Bitboard) -> Bitboard;

    fn gen_moves(pos: &Position, moves: &mut MoveList) {
        let board = pos.board();
        let us = pos.turn();
        for from in board.by_piece(Self::ROLE.of(us)) {
            for to in Self::attacks(from, board.occupied()) & !board.by_color(us) {
                push_legal(
                    board,
                    moves,
                    Move {
                        tags: capture_tag(board, to),
                        ..Move::new(from, to, None)
                    },
                );
            }
        }
    }
}

enum KnightTag {}
enum BishopTag {}
enum RookTag {}
enum QueenTag {}
enum KingTag {}

impl Stepper for KnightTag {
    const ROLE: Role = Role::Knight;

    fn attacks(from: Square) -> Bitboard {
        attacks::knight_attacks(from)
    }
}

impl Stepper for KingTag {
    const ROLE: Role = Role::King;

    fn attacks(from: Square) -> Bitboard {
        attacks::king_attacks(from)
    }
}

impl Slider for BishopTag {
    const ROLE: Role = Role::Bishop;

    fn attacks(from: Square, occupied: Bitboard) -> Bitboard {
        attacks::bishop_attacks(from, occupied)
    }
}

impl Slider for RookTag {
    const ROLE: Role = Role::Rook;

    fn attacks(from: Square, occupied: Bitboard) -> Bitboard {
        attacks::rook_attacks(from, occupied)
    }
}

impl Slider for QueenTag {
    const ROLE: Role = Role::Queen;

    fn attacks(from: Square, occupied: Bitboard) -> Bitboard {
        attacks::queen_attacks(from, occupied)
    }
}

fn push_pawn_moves(board: &Board, moves: &mut MoveList, from: Square, to: Square, tags: MoveTags) {
    if matches!(to.rank(), Rank::First | Rank::Eighth) {
        for role in Role::PROMOTIONS {
            push_legal(
                board,
                moves,
                Move {
                    tags,
                    ..Move::new(from, to, Some(role))
                },
            );
        }
    } else {
        push_legal(
            board,
            moves,
            Move {
                tags,
                ..Move::new(from, to, None)
            },
        );
    }
}

fn gen_pawn_moves(pos: &Position, moves: &mut MoveList) {
    let board = pos.board();
    let us = pos.turn();
    let them = board.by_color(!us);
    let forward = if us.is_white() { 8 } else { -8 };

    for from in board.by_piece(us.pawn()) {
        for to in attacks::pawn_attacks(us, from) & them {
            push_pawn_moves(board, moves, from, to, MoveTags::CAPTURE);
        }

        let Some(single) = from.offset(forward) else {
            continue;
        };
        if board.occupied().contains(single) {
            continue;
        }
        push_pawn_moves(board, moves, from, single, MoveTags::empty());

        if from.rank() == us.relative_rank(Rank::Second) {
            if let Some(double) = single.offset(forward) {
                if !board.occupied().contains(double) {
                    push_legal(board, moves, Move::new(from, double, None));
                }
            }
        }
    }

    gen_en_passant(pos, moves);
}

fn gen_en_passant(pos: &Position, moves: &mut MoveList) {
    let Some(to) = pos.ep_square() else {
        return;
    };
    let board = pos.board();
    let us = pos.turn();

    if board.occupied().contains(to) {
        return;
    }
    let victim = Square::from_coords(to.file(), us.relative_rank(Rank::Fifth));
    if board.piece_at(victim) != Some((!us).pawn()) {
        return;
    }

    for from in board.by_piece(us.pawn()) & attacks::pawn_attacks(!us, to) {
        push_legal(
            board,
            moves,
            Move {
                tags: MoveTags::CAPTURE | MoveTags::EN_PASSANT,
                ..Move::new(from, to, None)
            },
        );
    }
}

/// Squares strictly between two squares on the same rank.
fn between_on_rank(a: Square, b: Square) -> Bitboard {
    let (lo, hi) = if a < b {
        (a.to_u32(), b.to_u32())
    } else {
        (b.to_u32(), a.to_u32())
    };
    Bitboard(((1u64 << hi) - 1) & !((1u64 << (lo + 1)) - 1))
}

fn gen_castling_moves(pos: &Position, moves: &mut MoveList) {
    let board = pos.board();
    let us = pos.turn();
    let king_from = CastlingSide::king_from(us);

    if board.piece_at(king_from) != Some(us.king()) {
        return;
    }

    for side in CastlingSide::ALL {
        if !pos.castling_rights().has(us, side) {
            continue;
        }

        let rook_from = side.rook_from(us);
        if board.piece_at(rook_from) != Some(us.rook()) {
            continue;
        }
        if board.occupied().intersects(between_on_rank(king_from, rook_from)) {
            continue;
        }

        let king_to = side.king_to(us);
        let transit = side.rook_to(us);
        if [king_from, transit, king_to]
            .into_iter()
            .any(|sq| board.is_attacked(sq, !us))
        {
            continue;
        }

        let tags = if side.is_king_side() {
            MoveTags::KING_SIDE_CASTLE
        } else {
            MoveTags::QUEEN_SIDE_CASTLE
        };
        push_legal(
            board,
            moves,
            Move {
                tags,
                ..Move::new(king_from, king_to, None)
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves_from(fen: &str) -> MoveList {
        fen.parse::<Position>().expect("valid fen").legal_moves().clone()
    }

    fn find(moves: &MoveList, from: Square, to: Square) -> Option<Move> {
        moves.iter().copied().find(|m| m.from == from && m.to == to)
    }

    #[test]
    fn test_between_on_rank() {
        assert_eq!(
            between_on_rank(Square::E1, Square::A1),
            Bitboard::from(Square::B1) | Square::C1 | Square::D1
        );
        assert_eq!(
            between_on_rank(Square::E8, Square::H8),
            Bitboard::from(Square::F8) | Square::G8
        );
    }

    #[test]
    fn test_promotions() {
        let moves = moves_from("8/3P4/8/8/8/7k/7p/7K w - - 2 70");
        let promotions: Vec<_> = moves.iter().filter(|m| m.from == Square::D7).collect();
        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().all(|m| m.to == Square::D8 && m.is_promotion()));
    }

    #[test]
    fn test_en_passant() {
        let moves = moves_from("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let m = find(&moves, Square::E5, Square::D6).expect("en passant");
        assert!(m.is_en_passant());
        assert!(m.is_capture());
    }

    #[test]
    fn test_en_passant_needs_victim() {
        let moves = moves_from("rnbqkbnr/pppppppp/8/4P3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        assert!(find(&moves, Square::E5, Square::D6).is_none());
    }

    #[test]
    fn test_castling_blocked_by_attack() {
        // Black bishop on c4 covers f1.
        let moves = moves_from("r3k2r/8/8/8/2b5/8/8/R3K2R w KQkq - 0 1");
        assert!(find(&moves, Square::E1, Square::G1).is_none());
        let long = find(&moves, Square::E1, Square::C1).expect("queen side castle");
        assert_eq!(long.castling_side(), Some(CastlingSide::QueenSide));
    }

    #[test]
    fn test_castling_out_of_check() {
        let moves = moves_from("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(moves.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_check_tag() {
        let moves = moves_from("rn1qkbnr/pbpp1ppp/1p6/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 0 1");
        let m = find(&moves, Square::F3, Square::F7).expect("queen takes f7");
        assert!(m.is_check());
        assert!(m.is_capture());
    }

    #[test]
    fn test_pinned_piece() {
        // The e2 knight is pinned against the king by the e8 rook.
        let moves = moves_from("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.from != Square::E2));
    }

    #[test]
    fn test_most_legal_moves() {
        let moves = moves_from("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1");
        assert_eq!(moves.len(), 218);
    }

    #[test]
    fn test_only_legal_moves_pushed() {
        // Double check from the e8 rook and the d3 knight. Every queen
        // candidate is dropped before it takes up space.
        let moves = moves_from("4r2k/8/8/8/8/3n4/8/QQQ1K1QQ w - - 0 1");
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| m.from == Square::E1));
    }
}
