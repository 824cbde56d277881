#![no_main]

use libfuzzer_sys::fuzz_target;
use rochade::{Game, Position, PushMoveOptions};

fuzz_target!(|data: &[u8]| {
    let mut pos = Position::new();
    let mut game = Game::new();
    game.set_ignore_automatic_draws(true);

    for &choice in data {
        let legals = pos.legal_moves();
        if legals.is_empty() {
            assert!(pos.status().is_some());
            break;
        }
        assert!(legals
            .iter()
            .all(|m| !pos.update(Some(m)).board().is_check(pos.turn())));

        let m = legals[usize::from(choice) % legals.len()];
        game.push_move(&m, PushMoveOptions::default())
            .expect("legal move");
        pos = pos.update(Some(&m));
        assert_eq!(game.position(), &pos);
    }
});
