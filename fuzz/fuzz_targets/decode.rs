#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The decoder must degrade to null on arbitrary input, never panic.
    let _ = bplist::decode(data);
});
