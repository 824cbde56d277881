#![no_main]

use libfuzzer_sys::fuzz_target;
use rochade::Position;

fuzz_target!(|data: &[u8]| {
    if let Ok(pos) = Position::from_bytes(data) {
        let roundtripped = Position::from_bytes(&pos.to_bytes()).expect("roundtrip");
        assert_eq!(pos, roundtripped);
        assert_eq!(pos.legal_moves(), roundtripped.legal_moves());
    }
});
