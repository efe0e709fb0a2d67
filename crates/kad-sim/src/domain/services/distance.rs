//! Thin pure-function wrappers around [`Identifier`] distance arithmetic.
//!
//! Kept separate from the [`Identifier`] type itself so call sites that
//! only care about distance comparisons (not the full identifier API) can
//! import a narrow surface.

use crate::domain::errors::SimError;
use crate::domain::value_objects::Identifier;

/// XOR distance between two identifiers of the same width.
pub fn xor_distance(a: &Identifier, b: &Identifier) -> Result<Identifier, SimError> {
    a.distance(b)
}

/// Bucket index `a` falls into relative to `b`: `bit_length(a xor b) - 1`.
pub fn bucket_index(a: &Identifier, b: &Identifier) -> Result<usize, SimError> {
    let distance = xor_distance(a, b)?;
    if distance.is_zero() {
        return Err(SimError::InvalidArgument(
            "identifiers are equal; no bucket index exists".to_string(),
        ));
    }
    Ok((distance.bit_length() - 1) as usize)
}
