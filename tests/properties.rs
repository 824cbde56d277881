//! Property-based tests over random playouts.

use proptest::prelude::*;
use rochade::{Game, Method, Position, PushMoveOptions};

/// Indices used to pick one legal move per ply.
fn choices_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<usize>(), 0..80)
}

/// Plays a random game, returning every position along the way.
fn playout(choices: &[usize]) -> Vec<Position> {
    let mut positions = vec![Position::new()];
    for &choice in choices {
        let Some(pos) = positions.last() else { break };
        let moves = pos.legal_moves();
        if moves.is_empty() {
            break;
        }
        let next = pos.update(Some(&moves[choice % moves.len()]));
        positions.push(next);
    }
    positions
}

proptest! {
    /// Property: no legal move leaves the mover's own king attacked
    #[test]
    fn prop_legal_moves_are_legal(choices in choices_strategy()) {
        for pos in playout(&choices) {
            for m in pos.legal_moves() {
                let child = pos.update(Some(m));
                prop_assert!(!child.board().is_check(pos.turn()), "{} in {}", m, pos);
                prop_assert_eq!(m.is_check(), child.is_check());
            }
        }
    }

    /// Property: status agrees with legal moves and check
    #[test]
    fn prop_status_consistency(choices in choices_strategy()) {
        for pos in playout(&choices) {
            let expected = match (pos.legal_moves().is_empty(), pos.is_check()) {
                (false, _) => None,
                (true, true) => Some(Method::Checkmate),
                (true, false) => Some(Method::Stalemate),
            };
            prop_assert_eq!(pos.status(), expected);
        }
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(choices in choices_strategy()) {
        for pos in playout(&choices) {
            let fen = pos.to_fen();
            let decoded: Position = fen.parse().expect("valid fen");
            prop_assert_eq!(&decoded, &pos);
            prop_assert_eq!(decoded.to_fen(), fen);

            let xfen: Position = pos.to_xfen().parse().expect("valid x-fen");
            prop_assert_eq!(xfen.legal_moves().len(), pos.legal_moves().len());
        }
    }

    /// Property: binary round-trip preserves FEN
    #[test]
    fn prop_binary_roundtrip(choices in choices_strategy()) {
        for pos in playout(&choices) {
            let decoded = Position::from_bytes(&pos.to_bytes()).expect("valid bytes");
            prop_assert_eq!(decoded.to_fen(), pos.to_fen());
        }
    }

    /// Property: arbitrary bytes never panic the binary decoder
    #[test]
    fn prop_binary_decode_total(bytes in prop::collection::vec(any::<u8>(), 101)) {
        if let Ok(pos) = Position::from_bytes(&bytes) {
            prop_assert_eq!(&Position::from_bytes(&pos.to_bytes()).expect("valid bytes"), &pos);
        }
    }

    /// Property: a game follows the positions of the playout
    #[test]
    fn prop_game_tracks_positions(choices in choices_strategy()) {
        let positions = playout(&choices);
        let mut game = Game::new();
        game.set_ignore_automatic_draws(true);
        for window in positions.windows(2) {
            let m = window[0]
                .legal_moves()
                .iter()
                .find(|m| window[0].update(Some(m)) == window[1])
                .copied()
                .expect("move between positions");
            game.push_move(&m, PushMoveOptions::default()).expect("legal move");
        }
        prop_assert_eq!(game.positions().len(), positions.len());
        prop_assert_eq!(game.position(), &positions[positions.len() - 1]);
        prop_assert!(game.repetitions() >= 1);
        prop_assert!(game.is_at_end());
    }
}
