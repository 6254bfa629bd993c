#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode arbitrary bytes, re-encode whatever tree came out, decode
    // again. Tests the encoder against arbitrary (possibly degenerate)
    // trees; equality is not asserted because decoded NaN reals and
    // heterogeneous arrays do not survive re-encoding.
    let value = bplist::decode(data);
    let bytes = bplist::encode("root", &value);
    let _ = bplist::decode(&bytes);
});
