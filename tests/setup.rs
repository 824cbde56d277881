use rochade::{perft, Board, Color, Game, ParseFenError, Position, PositionError, UnpackError};

/// Twenty-five white queens. The placement parses, but no game reaches it.
const QUEENS: &str = "QQQQ1QQk/Q5Q1/Q5Q1/Q6Q/Q6Q/Q2Q3Q/QQ5Q/K1QQQ1QQ w - - 0 1";

fn too_many_white_pieces() -> PositionError {
    PositionError::TooManyPieces {
        color: Color::White,
    }
}

#[test]
fn test_crowded_fen_rejected() {
    let err = QUEENS.parse::<Position>().expect_err("impossible setup");
    assert_eq!(err, ParseFenError::Position(too_many_white_pieces()));
    assert_eq!(err.to_string(), "illegal fen: white has more than 16 pieces");

    assert_eq!(
        Game::from_fen(QUEENS).err(),
        Some(ParseFenError::Position(too_many_white_pieces()))
    );
}

#[test]
fn test_crowded_packed_rejected() {
    let (board_fen, _) = QUEENS.split_once(' ').expect("fields");
    let board: Board = board_fen.parse().expect("placement");

    let mut bytes = board.to_bytes().to_vec();
    // Halfmove clock, fullmove number, no en passant square, white to move.
    bytes.extend_from_slice(&[0, 0, 1, 64, 0]);

    assert_eq!(
        Position::from_bytes(&bytes).err(),
        Some(UnpackError::Position(too_many_white_pieces()))
    );
}

#[test]
fn test_full_material_accepted() {
    // Every white pawn promoted to a queen.
    let fen = "R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1";
    let game = Game::from_fen(fen).expect("reachable material");
    assert_eq!(game.outcome(), None);
    assert_eq!(game.valid_moves().len(), 218);
    assert_eq!(perft(game.position(), 1), 218);
}

#[test]
fn test_missing_king_rejected() {
    assert_eq!(
        Game::from_fen("8/8/8/8/8/8/4P3/8 w - - 0 1").err(),
        Some(ParseFenError::Position(PositionError::Kings {
            color: Color::White
        }))
    );
}
