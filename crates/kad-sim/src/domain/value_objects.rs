//! Value objects for the Kademlia simulator: fixed-width identifiers and the
//! distance-ranked wrapper used by [`super::kclosest_queue::KClosestQueue`].

use std::cmp::Ordering;
use std::fmt;

use sha2::{Digest, Sha256};

use super::errors::SimError;
use crate::ports::outbound::RandomSource;

/// Number of 64-bit limbs backing an [`Identifier`]. 4 limbs covers the
/// largest identifier space this simulator supports (256 bits).
const LIMBS: usize = 4;

/// Maximum identifier width in bits.
pub const MAX_BITS: u32 = (LIMBS * 64) as u32;

/// A point in an `m`-bit Kademlia identifier space.
///
/// Backed by a fixed-width `[u64; 4]` limb array rather than an
/// arbitrary-precision integer type: every identifier in a given simulation
/// run shares the same bit width `m` (at most 256), so a bignum crate buys
/// nothing but an extra dependency and a heap allocation per value.
///
/// Limb `0` holds the least-significant 64 bits. Bits at or above index `m`
/// are always zero; every constructor and every mutating operation enforces
/// this so two identifiers built with the same `m` can be compared,
/// XOR'd, and hashed directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    bits: u32,
    limbs: [u64; LIMBS],
}

impl Identifier {
    /// Builds an identifier from raw limbs, masking off any bits at or above
    /// `bits`.
    ///
    /// Returns [`SimError::InvalidArgument`] if `bits` is zero or exceeds
    /// [`MAX_BITS`].
    pub fn from_limbs(bits: u32, mut limbs: [u64; LIMBS]) -> Result<Self, SimError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(SimError::InvalidArgument(format!(
                "identifier width must be in 1..={MAX_BITS}, got {bits}"
            )));
        }
        mask_to_width(&mut limbs, bits);
        Ok(Self { bits, limbs })
    }

    /// Builds an identifier from a single `u64`, zero-extended to `bits`.
    pub fn from_u64(bits: u32, value: u64) -> Result<Self, SimError> {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = value;
        Self::from_limbs(bits, limbs)
    }

    /// Draws a uniformly random identifier of the given width.
    pub fn random(bits: u32, rng: &mut dyn RandomSource) -> Result<Self, SimError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(SimError::InvalidArgument(format!(
                "identifier width must be in 1..={MAX_BITS}, got {bits}"
            )));
        }
        let mut limbs = [0u64; LIMBS];
        for limb in limbs.iter_mut() {
            *limb = rng.next_u64();
        }
        mask_to_width(&mut limbs, bits);
        Ok(Self { bits, limbs })
    }

    /// Draws a node identifier the reference way: 512 random bits hashed
    /// with SHA-256 and truncated to `bits` bits.
    ///
    /// The hash indirection buys nothing a direct `bits`-wide draw wouldn't
    /// (both are uniform over the space); it is kept only so this
    /// simulator's identifier generation matches the reference
    /// implementation's distribution bit-for-bit.
    pub fn new_random(bits: u32, rng: &mut dyn RandomSource) -> Result<Self, SimError> {
        let mut seed = [0u8; 64];
        for chunk in seed.chunks_mut(8) {
            chunk.copy_from_slice(&rng.next_u64().to_le_bytes());
        }
        Self::from_hash_truncated(bits, &seed)
    }

    /// Derives an identifier by SHA-256 hashing `seed` and truncating the
    /// digest to `bits` bits (low-order bits of the digest, read as a
    /// little-endian integer).
    ///
    /// The lower-level primitive behind [`Self::new_random`]; hashing keeps
    /// the output well distributed across the space even when `seed` bytes
    /// are drawn unevenly.
    pub fn from_hash_truncated(bits: u32, seed: &[u8]) -> Result<Self, SimError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(SimError::InvalidArgument(format!(
                "identifier width must be in 1..={MAX_BITS}, got {bits}"
            )));
        }
        let digest = Sha256::digest(seed);
        let mut limbs = [0u64; LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = i * 8;
            if offset >= digest.len() {
                break;
            }
            let end = (offset + 8).min(digest.len());
            let mut bytes = [0u8; 8];
            bytes[..end - offset].copy_from_slice(&digest[offset..end]);
            *limb = u64::from_le_bytes(bytes);
        }
        mask_to_width(&mut limbs, bits);
        Ok(Self { bits, limbs })
    }

    /// Bit width of this identifier's space.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Draws a random identifier whose XOR distance to `self` lands in
    /// bucket `bucket` (distance bit length `bucket + 1`): bit `bucket` of
    /// the distance is forced set, every lower bit is random, every higher
    /// bit matches `self`.
    ///
    /// Used by the coordinator to synthesize paired refresh targets that
    /// are guaranteed to land in a specific bucket, so every bucket gets a
    /// chance to fill even when a plain self-lookup would not reach it.
    pub fn random_in_bucket(&self, bucket: u32, rng: &mut dyn RandomSource) -> Result<Self, SimError> {
        if bucket >= self.bits {
            return Err(SimError::InvalidArgument(format!(
                "bucket {bucket} out of range for identifier width {}",
                self.bits
            )));
        }
        let mut mask_limbs = [0u64; LIMBS];
        mask_limbs[(bucket / 64) as usize] |= 1u64 << (bucket % 64);

        for (limb_idx, limb) in mask_limbs.iter_mut().enumerate() {
            let limb_bit_start = (limb_idx as u32) * 64;
            if limb_bit_start >= bucket {
                break;
            }
            let bits_in_limb = (bucket - limb_bit_start).min(64);
            let submask = if bits_in_limb == 64 { u64::MAX } else { (1u64 << bits_in_limb) - 1 };
            *limb |= rng.next_u64() & submask;
        }

        let mask = Self { bits: self.bits, limbs: mask_limbs };
        self.distance(&mask)
    }

    /// XOR distance to another identifier. Both identifiers must share the
    /// same bit width.
    pub fn distance(&self, other: &Self) -> Result<Self, SimError> {
        if self.bits != other.bits {
            return Err(SimError::InvalidArgument(format!(
                "cannot compute distance between identifiers of width {} and {}",
                self.bits, other.bits
            )));
        }
        let mut limbs = [0u64; LIMBS];
        for i in 0..LIMBS {
            limbs[i] = self.limbs[i] ^ other.limbs[i];
        }
        Ok(Self { bits: self.bits, limbs })
    }

    /// Position of the highest set bit, counted from 1 (so a value of `1`
    /// has bit length 1, and the zero identifier has bit length 0).
    ///
    /// A distance's bit length minus one gives the Kademlia bucket index
    /// that distance falls into: bucket 0 holds the closest peers (distance
    /// bit length 1), the highest bucket holds the farthest.
    pub fn bit_length(&self) -> u32 {
        for i in (0..LIMBS).rev() {
            if self.limbs[i] != 0 {
                return (i as u32) * 64 + (64 - self.limbs[i].leading_zeros());
            }
        }
        0
    }

    /// `true` if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    fn limbs(&self) -> &[u64; LIMBS] {
        &self.limbs
    }
}

fn mask_to_width(limbs: &mut [u64; LIMBS], bits: u32) {
    let full_limbs = (bits / 64) as usize;
    let remainder = bits % 64;
    for limb in limbs.iter_mut().skip(full_limbs + if remainder > 0 { 1 } else { 0 }) {
        *limb = 0;
    }
    if remainder > 0 && full_limbs < LIMBS {
        limbs[full_limbs] &= (1u64 << remainder) - 1;
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for limb in self.limbs.iter().rev() {
            write!(f, "{limb:016x}")?;
        }
        Ok(())
    }
}

/// Total order over identifiers of the same width, most-significant limb
/// first. Only meaningful when comparing identifiers that share a width;
/// callers that mix widths get a deterministic but not semantically
/// meaningful answer, matching how `Ord` cannot fail.
impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// A candidate node ranked by its XOR distance to some lookup target.
///
/// Ordering compares distance only; the `target` field exists so
/// [`DistanceNode::checked_cmp`] can refuse to compare two candidates that
/// were computed against different targets (a programming error that
/// `Ord`'s infallible contract cannot itself reject).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceNode {
    /// Identifier of the candidate node.
    pub node_id: Identifier,
    /// Identifier the distance was computed against.
    pub target: Identifier,
    distance: Identifier,
}

impl DistanceNode {
    /// Builds a `DistanceNode`, computing the XOR distance from `node_id` to
    /// `target` up front so repeated comparisons never recompute it.
    pub fn new(node_id: Identifier, target: Identifier) -> Result<Self, SimError> {
        let distance = node_id.distance(&target)?;
        Ok(Self { node_id, target, distance })
    }

    /// Distance from [`DistanceNode::node_id`] to [`DistanceNode::target`].
    pub fn distance(&self) -> &Identifier {
        &self.distance
    }

    /// Compares two `DistanceNode`s, failing if they were computed against
    /// different targets.
    pub fn checked_cmp(&self, other: &Self) -> Result<Ordering, SimError> {
        if self.target != other.target {
            return Err(SimError::IncomparableTargets);
        }
        Ok(self.distance.cmp(&other.distance))
    }
}

impl PartialOrd for DistanceNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance)
    }
}
