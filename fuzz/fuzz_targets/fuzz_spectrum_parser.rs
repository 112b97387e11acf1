#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a spectrum table must either parse or fail with a
    // classified error. It should NEVER panic.
    if let Ok(spectrum) = labnorm::spectrum::Spectrum::from_reader(data) {
        // A parsed spectrum satisfies its contract, so extraction must
        // also complete without panicking (success or classified failure).
        let _ = labnorm::bandgap::extract_band_gap(&spectrum);
    }
});
