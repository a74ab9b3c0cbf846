#![no_main]

use libfuzzer_sys::fuzz_target;
use searchbox_web::{encode_bridge_event, parse_bridge_event};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses must encode back to an equivalent event.
    if let Ok(event) = parse_bridge_event(text) {
        let wire = encode_bridge_event(event.as_ref()).to_string();
        let again = parse_bridge_event(&wire).expect("re-encoded event must parse");
        assert_eq!(again, event);
    }
});
