//! Driven ports (outbound SPI): capabilities the domain depends on but does
//! not implement itself.

/// Source of randomness for identifier generation and peer selection.
///
/// The domain layer never touches an RNG crate directly; it depends on this
/// trait so tests can supply a seeded, deterministic source while production
/// code wires in a `ChaCha8Rng`-backed adapter.
pub trait RandomSource {
    /// Draws a uniformly random `u64`.
    fn next_u64(&mut self) -> u64;

    /// Draws a uniform index in `0..bound`. `bound` must be non-zero.
    fn gen_range(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// Blanket implementation over any `rand::RngCore`, so production adapters
/// can hand a `ChaCha8Rng` (or any other `rand` generator) straight to the
/// domain without a wrapper type.
impl<T: rand::RngCore> RandomSource for T {
    fn next_u64(&mut self) -> u64 {
        rand::RngCore::next_u64(self)
    }

    fn gen_range(&mut self, bound: usize) -> usize {
        rand::Rng::gen_range(self, 0..bound)
    }
}
