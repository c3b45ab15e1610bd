//! Round-trip test vector generation.

/// Shortest generated vector, inclusive.
const MIN_LEN: usize = 1000;
/// Longest generated vector, exclusive.
const MAX_LEN: usize = 10000;
/// Chance that any given byte is a newline instead of a letter.
const NEWLINE_CHANCE: f32 = 0.10;

/// Generate a fresh test vector: mostly lowercase letters with newlines
/// mixed in, length uniform in `[MIN_LEN, MAX_LEN)`.
pub fn generate(rng: &mut fastrand::Rng) -> Vec<u8> {
    let len = rng.usize(MIN_LEN..MAX_LEN);
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        if rng.f32() < NEWLINE_CHANCE {
            data.push(b'\n');
        } else {
            data.push(b'a' + rng.u8(0..26));
        }
    }
    data
}
