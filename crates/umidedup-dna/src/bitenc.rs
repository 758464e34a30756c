//! A 2-bit packed barcode for fast hamming distance.
//!
//! Bundles at deep positions can hold thousands of distinct barcodes, and building the
//! adjacency graph compares every pair. Packing each barcode into a `u64` turns a
//! comparison into an XOR and a popcount.
//!
//! # Example
//!
//! ```
//! use umidedup_dna::BitEnc;
//!
//! let a = BitEnc::from_bytes(b"ACGT").unwrap();
//! let b = BitEnc::from_bytes(b"ACTT").unwrap();
//! assert_eq!(a.hamming_distance(&b), 1);
//! ```

/// Longest barcode that fits in one packed word.
pub const MAX_PACKED_LEN: usize = 32;

/// A 2-bit encoded barcode stored in a `u64`.
///
/// Each base is encoded as A=0, C=1, G=2, T=3, packed from the least significant bit.
/// Only uppercase `ACGT` is accepted so that packed and byte-wise distances always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitEnc {
    bits: u64,
    len: u8,
}

impl BitEnc {
    #[inline]
    const fn encode_base(base: u8) -> Option<u64> {
        match base {
            b'A' => Some(0),
            b'C' => Some(1),
            b'G' => Some(2),
            b'T' => Some(3),
            _ => None,
        }
    }

    /// Packs a barcode.
    ///
    /// Returns `None` if the barcode holds anything other than uppercase `ACGT` or is
    /// longer than [`MAX_PACKED_LEN`].
    #[inline]
    #[must_use]
    pub fn from_bytes(seq: &[u8]) -> Option<Self> {
        if seq.len() > MAX_PACKED_LEN {
            return None;
        }

        let mut bits: u64 = 0;
        for (i, &base) in seq.iter().enumerate() {
            bits |= Self::encode_base(base)? << (i * 2);
        }

        let len = u8::try_from(seq.len()).ok()?;
        Some(Self { bits, len })
    }

    /// Packs every barcode in `umis`, or returns `None` if any one cannot be packed.
    #[must_use]
    pub fn pack_all<'a, I>(umis: I) -> Option<Vec<Self>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        umis.into_iter().map(Self::from_bytes).collect()
    }

    /// Number of bases.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the zero-length barcode.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hamming distance between two packed barcodes of equal length.
    #[inline]
    #[must_use]
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        debug_assert_eq!(self.len, other.len, "Barcodes must have equal length");

        let diff = self.bits ^ other.bits;
        // A base differs if either of its two bits differs.
        let differs = ((diff & 0xAAAA_AAAA_AAAA_AAAA) >> 1) | (diff & 0x5555_5555_5555_5555);
        differs.count_ones()
    }
}
