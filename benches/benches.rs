use iai::black_box;
use rochade::{perft, Game, Move, Position, PushMoveOptions, Square};

fn bench_shallow_perft() {
    let pos = Position::new();
    assert_eq!(black_box(perft(black_box(&pos), 4)), 197_281);
}

fn bench_deep_perft() {
    let pos = Position::new();
    assert_eq!(perft(black_box(&pos), 5), 4_865_609);
}

fn bench_kiwipete() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let pos: Position = fen.parse().expect("valid fen");
    assert_eq!(perft(black_box(&pos), 4), 4_085_603);
}

fn bench_generate_moves() {
    let fen = "rn1qkb1r/pbp2ppp/1p2p3/3n4/8/2N2NP1/PP1PPPBP/R1BQ1RK1 b kq - 0 1";
    let pos: Position = fen.parse().expect("valid fen");
    assert_eq!(black_box(&pos).legal_moves().len(), 39);
}

fn bench_update() -> Position {
    let fen = "rn1qkb1r/pbp2ppp/1p2p3/3n4/8/2N2NP1/PP1PPPBP/R1BQ1RK1 b kq - 0 1";
    let pos: Position = fen.parse().expect("valid fen");
    let m = Move::new(Square::F8, Square::E7, None);
    black_box(pos).update(Some(&m))
}

fn bench_parse_fen() -> Position {
    black_box("r2q1rk1/pb1nbppp/5n2/1p2p3/3NP3/P1NB4/1P2QPPP/R1BR2K1 w - - 3 14")
        .parse()
        .expect("valid fen")
}

fn bench_pack() -> Position {
    let bytes = black_box(Position::new()).to_bytes();
    Position::from_bytes(black_box(&bytes)).expect("valid bytes")
}

fn bench_push_moves() -> Game {
    let moves = [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("g8", "f6"),
        ("f3", "g5"),
        ("d7", "d5"),
        ("e4", "d5"),
        ("c6", "a5"),
        ("c4", "b5"),
        ("c7", "c6"),
        ("d5", "c6"),
        ("b7", "c6"),
        ("b5", "a4"),
        ("c8", "a6"),
        ("d2", "d3"),
        ("f8", "c5"),
        ("e1", "g1"),
        ("e8", "g8"),
    ];

    let mut game = black_box(Game::new());
    for (from, to) in black_box(moves) {
        let m = Move::new(
            from.parse().expect("valid square"),
            to.parse().expect("valid square"),
            None,
        );
        game.push_move(&m, PushMoveOptions::default())
            .expect("legal move");
    }
    game
}

iai::main!(
    bench_shallow_perft,
    bench_deep_perft,
    bench_kiwipete,
    bench_generate_moves,
    bench_update,
    bench_parse_fen,
    bench_pack,
    bench_push_moves,
);
