#![no_main]

use libfuzzer_sys::fuzz_target;
use mpc_recovery_backup::EncryptedShareRecord;

fuzz_target!(|data: &[u8]| {
    // A backup entry is untrusted input; parsing must return Ok or Err.
    if let Ok(record) = EncryptedShareRecord::from_json("fuzz.json", data) {
        // Whatever parsed must serialize back and parse again
        let bytes = record.to_json().unwrap();
        let _ = EncryptedShareRecord::from_json("fuzz.json", &bytes).unwrap();
    }
});
