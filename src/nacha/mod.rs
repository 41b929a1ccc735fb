//! NACHA: variable-width keyless hash function.
//!
//! NACHA digests a byte vector through a fixed six-phase network of
//! bit-permutation and mixing stages. Each phase divides the running
//! vector into `blk_a` or `blk_b` groups, transforms every group (with
//! an extra branch on every other group), and fuses the results; the
//! input itself is re-injected at two phases to anchor the digest to the
//! message. A final XOR-compression folds the vector into `capacity`
//! rows, and the rows intertwine with a capacity-derived auxiliary
//! vector to form the digest.
//!
//! The output length always equals `capacity`, regardless of input
//! length. Fixed-parameter adapters cover the common 128- to 768-bit
//! widths, each in a normal and an extended ("E") denominator variant.
//!
//! # Examples
//!
//! ```
//! use erc_crypto::nacha;
//!
//! let digest = nacha::hash(b"bee movie", 16, 5, 3).unwrap();
//! assert_eq!(digest.len(), 16);
//! assert_eq!(digest, nacha::hash(b"bee movie", 16, 5, 3).unwrap());
//! ```

pub(crate) mod low;

use crate::error::ErcCryptoError;

/// Padding bytes cycled by [`split`] when a group division is uneven.
const SPLIT_PADDING: [u8; 7] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77];

/// Divides a byte vector into `osize` equal groups.
///
/// `osize` is the number of groups, not the group size. The input is
/// padded cyclically from `padding` so the division is exact; a full
/// extra group's worth of padding is appended when the length is already
/// an exact multiple.
pub(crate) fn split(input: &[u8], osize: u8, padding: &[u8]) -> Vec<Vec<u8>> {
    debug_assert!(osize > 0, "group count must be non-zero");
    debug_assert!(!padding.is_empty(), "padding must be non-empty");
    let mut tmp = input.to_vec();
    let underflow = osize as usize - (tmp.len() % osize as usize);
    let mut app_ind = 0;
    for _ in 0..underflow {
        tmp.push(padding[app_ind]);
        app_ind = if app_ind == padding.len() - 1 {
            0
        } else {
            app_ind + 1
        };
    }
    let group_len = tmp.len() / osize as usize;
    let mut out = Vec::with_capacity(osize as usize);
    let mut current = Vec::with_capacity(group_len);
    for &byte in &tmp {
        current.push(byte);
        if current.len() == group_len {
            out.push(std::mem::take(&mut current));
        }
    }
    out
}

/// Concatenates a list of groups back into one vector.
pub(crate) fn fuse(groups: &[Vec<u8>]) -> Vec<u8> {
    let mut tmp = Vec::with_capacity(groups.iter().map(Vec::len).sum());
    for group in groups {
        tmp.extend_from_slice(group);
    }
    tmp
}

/// Hashes `input` to exactly `capacity` bytes.
///
/// # Parameters
/// - `input`: The data to digest; must be non-empty.
/// - `capacity`: Output size in bytes (at least 2).
/// - `blk_a`: First division denominator (group count).
/// - `blk_b`: Second division denominator (group count).
///
/// # Errors
/// [`ErcCryptoError::EmptyInput`] for empty input,
/// [`ErcCryptoError::InvalidCapacity`] for a capacity below 2, and
/// [`ErcCryptoError::InvalidBlockDivisor`] for a zero denominator.
pub fn hash(
    input: &[u8],
    capacity: u16,
    blk_a: u8,
    blk_b: u8,
) -> Result<Vec<u8>, ErcCryptoError> {
    if input.is_empty() {
        return Err(ErcCryptoError::EmptyInput);
    }
    if capacity < 2 {
        return Err(ErcCryptoError::InvalidCapacity);
    }
    if blk_a == 0 || blk_b == 0 {
        return Err(ErcCryptoError::InvalidBlockDivisor);
    }

    let chk = split(input, blk_b, &SPLIT_PADDING);
    let mut nchk: Vec<Vec<u8>> = Vec::new();
    let mut toggle = false;
    for group in &chk {
        nchk.push(low::permute_a(group));
        if toggle {
            nchk.push(low::mix(group, true));
            nchk.push(low::permute_c(group));
        }
        toggle = !toggle;
    }

    toggle = true;
    nchk.push(low::mix(input, true));
    let chk = split(&fuse(&nchk), blk_a, &SPLIT_PADDING);
    nchk.clear();
    for group in &chk {
        nchk.push(low::permute_c(group));
        if toggle {
            nchk.push(low::mix(group, false));
            nchk.push(low::permute_a(&low::mix(group, true)));
        }
        toggle = !toggle;
    }

    toggle = false;
    let chk = split(input, blk_b, &SPLIT_PADDING);
    for group in &chk {
        nchk.push(low::mix(&low::permute_c(group), false));
        if toggle {
            nchk.push(low::permute_a(&low::mix(group, true)));
        }
        toggle = !toggle;
    }

    toggle = true;
    let chk = split(&fuse(&nchk), blk_a, &SPLIT_PADDING);
    nchk.clear();
    for group in &chk {
        nchk.push(low::mix(&low::permute_b(group), true));
        if toggle {
            nchk.push(low::permute_c(group));
        }
        toggle = !toggle;
    }

    nchk.push(input.to_vec());
    toggle = false;
    let chk = split(&fuse(&nchk), blk_b, &SPLIT_PADDING);
    nchk.clear();
    for group in &chk {
        nchk.push(low::mix(&low::permute_c(group), false));
        if toggle {
            nchk.push(low::permute_a(group));
        }
        toggle = !toggle;
    }

    let mut temp = low::mix(&fuse(&nchk), true);

    // Compress by XOR-reducing rows of `ratio` bytes.
    let cap = capacity as usize;
    let add = cap - (temp.len() % cap);
    temp.resize(temp.len() + add, 0x5A);
    let siz = temp.len();
    let ratio = siz / cap;

    let mut rows = Vec::with_capacity(cap);
    let mut blk = vec![0u8; ratio];
    let mut blk_in = 0usize;
    let mut toggle = false;
    let mut lastxor = ((!(temp[siz - 1] as i32)) >> 3) as u8;
    for &byte in &temp {
        blk[blk_in] = if toggle {
            byte.wrapping_add(lastxor)
        } else {
            byte
        };
        blk_in += 1;
        toggle = !toggle;
        if blk_in == ratio {
            let mut j = 0u8;
            for &a in &blk {
                j ^= a;
            }
            rows.push(j);
            lastxor = ((!(j as i32)) >> 3) as u8;
            blk_in = 0;
        }
    }

    let mut aux = Vec::with_capacity(cap);
    for i in 0..cap {
        let n = (i % 256) as u32;
        let t = ((n + lastxor as u32) * (n + (i as u32 ^ capacity as u32))) % 256;
        aux.push(t as u8);
    }

    low::intertwine(&rows, &aux, capacity)
}

/// 128-bit digest (16 bytes), denominators 5 and 3.
pub fn hash_128(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 16, 5, 3)
}

/// 128-bit digest, extended denominators 7 and 4.
pub fn hash_128e(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 16, 7, 4)
}

/// 256-bit digest (32 bytes), denominators 7 and 4.
pub fn hash_256(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 32, 7, 4)
}

/// 256-bit digest, extended denominators 9 and 5.
pub fn hash_256e(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 32, 9, 5)
}

/// 384-bit digest (48 bytes), denominators 9 and 5.
pub fn hash_384(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 48, 9, 5)
}

/// 384-bit digest, extended denominators 11 and 6.
pub fn hash_384e(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 48, 11, 6)
}

/// 512-bit digest (64 bytes), denominators 11 and 6.
pub fn hash_512(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 64, 11, 6)
}

/// 512-bit digest, extended denominators 13 and 7.
pub fn hash_512e(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 64, 13, 7)
}

/// 768-bit digest (96 bytes), denominators 13 and 7.
pub fn hash_768(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 96, 13, 7)
}

/// 768-bit digest, extended denominators 15 and 8.
pub fn hash_768e(input: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    hash(input, 96, 15, 8)
}
