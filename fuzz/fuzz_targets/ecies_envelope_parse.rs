#![no_main]

use libfuzzer_sys::fuzz_target;
use mpc_recovery_backup::{CipherLayer, EciesLayer};

fuzz_target!(|data: &[u8]| {
    // Truncated or garbled envelopes must fail cleanly.
    let layer =
        EciesLayer::from_hex("ea5db436b7508e5c8ec3ae17003bcb997c30e03c655f0dd2d1824ec93bd0501c")
            .unwrap();
    let _ = layer.open(data);
});
