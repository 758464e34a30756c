//! Hamming distance between barcodes.
//!
//! Barcodes within one bundle share a length, so distance is a plain position-wise
//! comparison. Callers are responsible for that invariant; see [`length_range`] for
//! checking it up front.

/// Count of positions at which two equal-length sequences differ.
///
/// Only the overlapping prefix is compared when lengths differ. That case is a caller
/// bug and is caught by a debug assertion.
///
/// # Examples
///
/// ```
/// use umidedup_dna::hamming_distance;
///
/// assert_eq!(hamming_distance(b"ACGT", b"ACGT"), 0);
/// assert_eq!(hamming_distance(b"ACGT", b"ACTT"), 1);
/// assert_eq!(hamming_distance(b"AAAA", b"TTTT"), 4);
/// ```
#[inline]
#[must_use]
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len(), "Barcodes must have equal length");

    let mut mismatches = 0u32;
    let mut a_chunks = a.chunks_exact(8);
    let mut b_chunks = b.chunks_exact(8);

    // Compare 8 bytes at a time; a differing byte sets at least one bit in its lane.
    for (x, y) in a_chunks.by_ref().zip(b_chunks.by_ref()) {
        let mut lhs = [0u8; 8];
        let mut rhs = [0u8; 8];
        lhs.copy_from_slice(x);
        rhs.copy_from_slice(y);
        let diff = u64::from_ne_bytes(lhs) ^ u64::from_ne_bytes(rhs);
        if diff != 0 {
            mismatches += (0..8u32).map(|lane| u32::from((diff >> (lane * 8)) & 0xFF != 0)).sum::<u32>();
        }
    }

    let tail = a_chunks.remainder().iter().zip(b_chunks.remainder()).filter(|(x, y)| x != y).count();
    mismatches + u32::try_from(tail).unwrap_or(u32::MAX)
}

/// Returns the `(min, max)` length over a set of barcodes, or `None` when empty.
#[must_use]
pub fn length_range<'a, I>(umis: I) -> Option<(usize, usize)>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    umis.into_iter().map(<[u8]>::len).fold(None, |acc, len| match acc {
        None => Some((len, len)),
        Some((lo, hi)) => Some((lo.min(len), hi.max(len))),
    })
}
