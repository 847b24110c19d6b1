#![no_main]

use libfuzzer_sys::fuzz_target;
use mpc_recovery_core::{parse_mnemonic, user_share_from_mnemonic};

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must be rejected with an error, never a panic.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_mnemonic(s);
        let _ = user_share_from_mnemonic(s);
    }
});
