#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a composition table: parse or classified error,
    // never a panic.
    let _ = labnorm::composition::CompositionRecord::from_reader(data);
});
