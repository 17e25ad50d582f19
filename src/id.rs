//! Opaque identifier generation for layers and projects.
//!
//! Identifiers are random version-4 UUID strings drawn from a per-thread
//! ChaCha20 generator. The generator is seeded from the operating system on
//! first use unless [`set_id_seed`] has been called, which makes sequences
//! reproducible in tests.

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use std::cell::RefCell;

thread_local! {
    static RNG: RefCell<Option<ChaCha20Rng>> = const { RefCell::new(None) };
}

/// Reseeds the identifier generator of the current thread.
pub fn set_id_seed(seed: u64) {
    RNG.with(|rng| *rng.borrow_mut() = Some(ChaCha20Rng::seed_from_u64(seed)));
}

/// Generates a new identifier in the canonical `8-4-4-4-12` UUID form.
pub fn generate_id() -> String {
    let (high, low) = RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        let rng = rng.get_or_insert_with(|| ChaCha20Rng::seed_from_u64(rand::random()));
        (rng.next_u64(), rng.next_u64())
    });

    // Version 4, RFC 4122 variant
    let high = (high & 0xffff_ffff_ffff_0fff) | 0x0000_0000_0000_4000;
    let low = (low & 0x3fff_ffff_ffff_ffff) | 0x8000_0000_0000_0000;

    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        high >> 32,
        (high >> 16) & 0xffff,
        high & 0xffff,
        low >> 48,
        low & 0xffff_ffff_ffff
    )
}
