use rochade::{Game, Method, Position};
use serde::Deserialize;

#[derive(Deserialize)]
struct Record {
    fen: String,
    sufficient: bool,
    comment: String,
}

#[test]
fn test_sufficient_material() {
    let mut reader = csv::Reader::from_path("tests/material.csv").expect("reader");
    for record in reader.deserialize() {
        let record: Record = record.expect("record");
        let pos: Position = record.fen.parse().expect("valid fen");

        assert_eq!(
            pos.board().has_sufficient_material(),
            record.sufficient,
            "{} ({})",
            record.fen,
            record.comment
        );
        assert_eq!(pos.is_insufficient_material(), !record.sufficient);

        let game = Game::from_position(pos);
        let expected = (!record.sufficient).then_some(Method::InsufficientMaterial);
        assert_eq!(game.method(), expected, "{}", record.comment);
    }
}
