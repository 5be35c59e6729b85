//! Fuzz target: `DoorConfig::from_bytes` / `from_json`
//!
//! Arbitrary bytes must decode to either an error or a configuration that
//! passes validation; anything accepted must survive a re-encode.
//!
//! cargo fuzz run fuzz_config

#![no_main]

use autodoor::config::DoorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = DoorConfig::from_bytes(data) {
        assert!(config.validate().is_ok());
        let bytes = config.to_bytes().expect("re-encode");
        assert_eq!(DoorConfig::from_bytes(&bytes).ok(), Some(config));
    }

    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(config) = DoorConfig::from_json(text) {
            assert!(config.validate().is_ok());
        }
    }
});
