//! Half-round and permutation primitives of the VIPER-1 cipher.
//!
//! Every function here operates on the two 12-byte halves of a block and
//! has an exact inverse used by the decrypt path. The combined shifts are
//! computed in 16-bit intermediates and truncated, which keeps the
//! byte-level results identical to the widened integer arithmetic of the
//! C++ liberc-crypto library.

use super::{HalfPair, HALF_BLOCK};

/// Reverses the byte order of a half-block.
pub(crate) fn reverse_half(input: [u8; HALF_BLOCK]) -> [u8; HALF_BLOCK] {
    let mut tmp = input;
    tmp.reverse();
    tmp
}

/// Searches for the modular inverse of `i` mod 256.
///
/// Runs a fixed 254-iteration scan regardless of where the inverse is
/// found, returning 255 when no inverse exists in `1..=254`. The caller
/// treats 255 as the "not invertible" sentinel.
pub(crate) fn inverse_key_mod(i: u8) -> u8 {
    let mut n: u8 = 1;
    let mut good = false;
    for _ in 1..255 {
        if (i as u16 * n as u16) % 256 == 1 {
            good = true;
        }
        if !good {
            n = n.wrapping_add(1);
        }
    }
    n
}

/// Forces a raw key byte into an odd, invertible multiplier mod 256.
///
/// Bytes whose inverse scan hits the sentinel are shifted right by two,
/// zero collapses to one, and even values are bumped to the next odd.
/// Both cipher directions must apply the identical sequence.
fn sanitize_multiplier(raw: u8) -> u8 {
    let mut k = raw;
    if inverse_key_mod(k) == 255 {
        k >>= 2;
    }
    if k == 0 {
        k = 1;
    }
    if k & 1 == 0 {
        k += 1;
    }
    k
}

/// Reverse-multiply half-round, encrypt direction.
///
/// Reverses the left half, multiplies each side by its sanitized key
/// multiplier plus a nibble offset from the opposite key byte, and swaps
/// the halves.
pub(crate) fn revmult_enc(
    input1: [u8; HALF_BLOCK],
    input2: [u8; HALF_BLOCK],
    a: u8,
    b: u8,
) -> HalfPair {
    let ka = sanitize_multiplier(a);
    let kb = sanitize_multiplier(b);
    let reversed = reverse_half(input1);
    let mut c = [0u8; HALF_BLOCK];
    let mut d = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        c[i] = reversed[i].wrapping_mul(ka).wrapping_add(b >> 4);
        d[i] = input2[i].wrapping_mul(kb).wrapping_add(a >> 4);
    }
    (d, c)
}

/// Reverse-multiply half-round, decrypt direction.
pub(crate) fn revmult_dec(
    input1: [u8; HALF_BLOCK],
    input2: [u8; HALF_BLOCK],
    a: u8,
    b: u8,
) -> HalfPair {
    let ka = sanitize_multiplier(a);
    let kb = sanitize_multiplier(b);
    let ia = inverse_key_mod(ka);
    let ib = inverse_key_mod(kb);
    let mut c = [0u8; HALF_BLOCK];
    let mut d = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        c[i] = input2[i].wrapping_sub(b >> 4).wrapping_mul(ia);
        d[i] = input1[i].wrapping_sub(a >> 4).wrapping_mul(ib);
    }
    (reverse_half(c), d)
}

/// Add-rotate-XOR half-round, encrypt direction.
///
/// Adds `a` to each byte, rotates the byte pair across the halves by an
/// index-dependent distance and XORs with `b`. A zero rotation skips the
/// shift and swaps the halves instead.
pub(crate) fn arx_enc(
    input1: [u8; HALF_BLOCK],
    input2: [u8; HALF_BLOCK],
    a: u8,
    b: u8,
) -> HalfPair {
    let base = a.wrapping_add(b);
    let mut ia = [0u8; HALF_BLOCK];
    let mut ib = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let left = input1[i].wrapping_add(a);
        let right = input2[i].wrapping_add(a);
        let rot = ((base as u16 + i as u16) % 8) as u32;
        if rot == 0 {
            ia[i] = right ^ b;
            ib[i] = left ^ b;
        } else {
            let l = left as u16;
            let r = right as u16;
            ia[i] = (((l >> rot) | (r << (8 - rot))) as u8) ^ b;
            ib[i] = (((r >> rot) | (l << (8 - rot))) as u8) ^ b;
        }
    }
    (ia, ib)
}

/// Add-rotate-XOR half-round, decrypt direction.
pub(crate) fn arx_dec(
    input1: [u8; HALF_BLOCK],
    input2: [u8; HALF_BLOCK],
    a: u8,
    b: u8,
) -> HalfPair {
    let base = a.wrapping_add(b);
    let mut ia = [0u8; HALF_BLOCK];
    let mut ib = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let left = input1[i] ^ b;
        let right = input2[i] ^ b;
        let rot = ((base as u16 + i as u16) % 8) as u32;
        if rot == 0 {
            ia[i] = right.wrapping_sub(a);
            ib[i] = left.wrapping_sub(a);
        } else {
            let mut ar = ((left as u16) << rot) as u8;
            let mut br = ((right as u16) << rot) as u8;
            ar |= right >> (8 - rot);
            br |= left >> (8 - rot);
            ia[i] = ar.wrapping_sub(a);
            ib[i] = br.wrapping_sub(a);
        }
    }
    (ia, ib)
}

/// Non-linear round function applied to the half-block difference.
///
/// Per byte: a key-and-input masked blend XORed with the key-input
/// product reduced modulo their XOR, with the modulus forced to one when
/// the XOR is zero.
pub(crate) fn round_function(diff: [u8; HALF_BLOCK], key: u8) -> [u8; HALF_BLOCK] {
    let mut tmp = [0u8; HALF_BLOCK];
    let k = key as u16;
    for (i, &value) in diff.iter().enumerate() {
        let x = value as u16;
        let mut divi = k ^ x;
        if divi == 0 {
            divi = 1;
        }
        tmp[i] = (((k ^ x) & ((x >> 4) | (k << 4))) ^ ((k * x) % divi)) as u8;
    }
    tmp
}

/// Byte-wise wrapping addition of the round output to a half-block.
pub(crate) fn add(to: [u8; HALF_BLOCK], rnd: [u8; HALF_BLOCK]) -> [u8; HALF_BLOCK] {
    let mut tmp = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        tmp[i] = to[i].wrapping_add(rnd[i]);
    }
    tmp
}

/// Byte-wise wrapping difference of two half-blocks.
pub(crate) fn diff(left: [u8; HALF_BLOCK], right: [u8; HALF_BLOCK]) -> [u8; HALF_BLOCK] {
    let mut tmp = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        tmp[i] = left[i].wrapping_sub(right[i]);
    }
    tmp
}

/// XORs each half against its own key byte.
pub(crate) fn mid_xor(
    left: [u8; HALF_BLOCK],
    right: [u8; HALF_BLOCK],
    l_key: u8,
    r_key: u8,
) -> HalfPair {
    let mut lv = [0u8; HALF_BLOCK];
    let mut rv = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        lv[i] = left[i] ^ l_key;
        rv[i] = right[i] ^ r_key;
    }
    (lv, rv)
}

/// XORs two half-block pairs element-wise.
pub(crate) fn xor_pairs(l: HalfPair, r: HalfPair) -> HalfPair {
    let mut lv = [0u8; HALF_BLOCK];
    let mut rv = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        lv[i] = l.0[i] ^ r.0[i];
        rv[i] = l.1[i] ^ r.1[i];
    }
    (lv, rv)
}

/// Permutation stage, encrypt direction.
///
/// Splits every byte into nibbles and redistributes them across the
/// halves and across mirrored indices, then applies an index-dependent
/// XOR, a cross-coupled XOR between positions `i` and `11 - i`, and a
/// final keyed byte rotation with inversion of the right half.
pub(crate) fn permute_enc(input: HalfPair, key: u8) -> HalfPair {
    let (l_in, r_in) = input;
    let mut lv = [0u8; HALF_BLOCK];
    let mut rv = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let l = l_in[i] ^ key;
        let r = r_in[i];
        lv[i] = (l >> 4) | (r << 4);
        rv[i] = (l << 4) | (r >> 4);
    }
    let mut n0 = [0u8; HALF_BLOCK];
    let mut n1 = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let l = lv[i];
        let r = rv[HALF_BLOCK - 1 - i];
        n0[i] = (r >> 2) | (l << 6);
        n1[i] = (l >> 2) | (r << 6);
    }
    let modulus = key as u16 + 1;
    for i in 0..HALF_BLOCK {
        n0[i] ^= key.wrapping_add(((12 * i as u16) % modulus) as u8);
        n1[i] ^= (!key).wrapping_sub(((15 * i as u16) % modulus) as u8);
    }
    for i in 0..HALF_BLOCK {
        let l = n0[i];
        n1[HALF_BLOCK - 1 - i] ^= (key ^ l).wrapping_sub(i as u8);
        n1[i] ^= l.wrapping_add(i as u8);
    }
    let shift_base = key % 8;
    for i in 0..HALF_BLOCK {
        let r = n1[i] as u16;
        let l = n0[i] as u16;
        let shift = ((shift_base + i as u8) % 8) as u32;
        n0[i] = (((r >> shift) | (l << (8 - shift))) as u8) ^ key;
        n1[i] = !(((l >> shift) | (r << (8 - shift))) as u8);
    }
    (n0, n1)
}

/// Permutation stage, decrypt direction.
///
/// Performs the exact inverse of [`permute_enc`] by undoing its steps in
/// reverse order; the cross-coupled XOR is its own inverse and repeats
/// unchanged.
pub(crate) fn permute_dec(input: HalfPair, key: u8) -> HalfPair {
    let (l_in, r_in) = input;
    let shift_base = key % 8;
    let mut n0 = [0u8; HALF_BLOCK];
    let mut n1 = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let r = (!r_in[i]) as u16;
        let l = (l_in[i] ^ key) as u16;
        let shift = ((shift_base + i as u8) % 8) as u32;
        n0[i] = ((l >> (8 - shift)) | (r << shift)) as u8;
        n1[i] = ((r >> (8 - shift)) | (l << shift)) as u8;
    }
    for i in 0..HALF_BLOCK {
        let l = n0[i];
        n1[HALF_BLOCK - 1 - i] ^= (key ^ l).wrapping_sub(i as u8);
        n1[i] ^= l.wrapping_add(i as u8);
    }
    let modulus = key as u16 + 1;
    let mut lv = [0u8; HALF_BLOCK];
    let mut rv = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        lv[i] = n0[i] ^ key.wrapping_add(((12 * i as u16) % modulus) as u8);
        rv[i] = n1[i] ^ (!key).wrapping_sub(((15 * i as u16) % modulus) as u8);
    }
    let mut m0 = [0u8; HALF_BLOCK];
    let mut m1 = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let l = lv[i];
        let r = rv[i];
        m0[i] = (l >> 6) | (r << 2);
        m1[HALF_BLOCK - 1 - i] = (r >> 6) | (l << 2);
    }
    let mut out_l = [0u8; HALF_BLOCK];
    let mut out_r = [0u8; HALF_BLOCK];
    for i in 0..HALF_BLOCK {
        let l = m0[i];
        let r = m1[i];
        out_l[i] = ((r >> 4) | (l << 4)) ^ key;
        out_r[i] = (r << 4) | (l >> 4);
    }
    (out_l, out_r)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: [u8; 12] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x10, 0x32, 0x54, 0x76,
    ];
    const RIGHT: [u8; 12] = [
        0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32, 0x10, 0xEF, 0xCD, 0xAB, 0x89,
    ];

    #[test]
    fn test_reverse_half() {
        let reversed = reverse_half(LEFT);
        assert_eq!(reversed[0], 0x76);
        assert_eq!(reversed[11], 0x01);
        assert_eq!(reverse_half(reversed), LEFT);
    }

    #[test]
    fn test_inverse_key_mod_known_values() {
        assert_eq!(inverse_key_mod(1), 1);
        // 3 * 171 = 513 = 2 * 256 + 1
        assert_eq!(inverse_key_mod(3), 171);
        // Even values have no inverse mod 256: sentinel.
        assert_eq!(inverse_key_mod(2), 255);
        assert_eq!(inverse_key_mod(0), 255);
    }

    #[test]
    fn test_inverse_key_mod_all_odd_values() {
        for k in (1..=253u8).step_by(2) {
            let inv = inverse_key_mod(k);
            assert_eq!(
                (k as u16 * inv as u16) % 256,
                1,
                "inverse wrong for k={}",
                k
            );
        }
    }

    #[test]
    fn test_revmult_roundtrip() {
        for (a, b) in [(0x00u8, 0x00u8), (0x12, 0xF0), (0xFF, 0xFF), (0x80, 0x03)] {
            let (d, c) = revmult_enc(LEFT, RIGHT, a, b);
            let (l, r) = revmult_dec(d, c, a, b);
            assert_eq!(l, LEFT, "left half mismatch for a={} b={}", a, b);
            assert_eq!(r, RIGHT, "right half mismatch for a={} b={}", a, b);
        }
    }

    #[test]
    fn test_arx_roundtrip() {
        for (a, b) in [(0x00u8, 0x00u8), (0x05, 0x03), (0xA5, 0x5A), (0xFF, 0x01)] {
            let (ia, ib) = arx_enc(LEFT, RIGHT, a, b);
            let (l, r) = arx_dec(ia, ib, a, b);
            assert_eq!(l, LEFT, "left half mismatch for a={} b={}", a, b);
            assert_eq!(r, RIGHT, "right half mismatch for a={} b={}", a, b);
        }
    }

    #[test]
    fn test_round_function_zero_divisor_guard() {
        // key == diff byte makes the XOR modulus zero; the guard forces 1.
        let block = [0x42u8; 12];
        let out = round_function(block, 0x42);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn test_add_diff_inverse() {
        let sum = add(LEFT, RIGHT);
        assert_eq!(diff(sum, RIGHT), LEFT);
    }

    #[test]
    fn test_mid_xor_self_inverse() {
        let (l, r) = mid_xor(LEFT, RIGHT, 0xDE, 0xAD);
        let (l2, r2) = mid_xor(l, r, 0xDE, 0xAD);
        assert_eq!(l2, LEFT);
        assert_eq!(r2, RIGHT);
    }

    #[test]
    fn test_permute_roundtrip_all_keys() {
        for key in [0x00u8, 0x01, 0x07, 0x5A, 0xA5, 0xFE, 0xFF] {
            let permuted = permute_enc((LEFT, RIGHT), key);
            let (l, r) = permute_dec(permuted, key);
            assert_eq!(l, LEFT, "left half mismatch for key={:#04x}", key);
            assert_eq!(r, RIGHT, "right half mismatch for key={:#04x}", key);
        }
    }

    #[test]
    fn test_permute_changes_both_halves() {
        let (l, r) = permute_enc((LEFT, RIGHT), 0x3C);
        assert_ne!(l, LEFT);
        assert_ne!(r, RIGHT);
    }
}
