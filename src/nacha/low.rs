//! Low-level permutation, mixing and intertwine stages of the NACHA hash.
//!
//! Each stage pads its input with a fixed hexspeak sequence before
//! operating; the padding always appends at least one byte, so an input
//! that is already a multiple of the stage's chunk size gains a full
//! extra group. Several stages use signed widened arithmetic (`~x >> k`
//! on a negative intermediate); those expressions are computed in `i32`
//! and truncated, keeping every byte identical to the C++ liberc-crypto
//! output.

use crate::error::ErcCryptoError;

/// Pads `tmp` up to the next multiple of `divisor` by cycling `pad`.
///
/// Appends a full extra group when the length is already a multiple.
fn pad_cyclic(tmp: &mut Vec<u8>, divisor: usize, pad: &[u8]) {
    let underflow = divisor - (tmp.len() % divisor);
    let mut app = 0;
    for _ in 0..underflow {
        tmp.push(pad[app]);
        app = if app == pad.len() - 1 { 0 } else { app + 1 };
    }
}

/// Permutation 'A': bit-plane transpose plus a mirrored folding pass.
///
/// The padded input is processed in 8-byte chunks; bit `b` of byte `i`
/// moves to bit `i` of output byte `b`, transposing each 8x8 bit matrix.
/// A second pass then walks the transposed block from both ends at once,
/// combining each byte with its mirror and the cumulative XOR of the
/// input. Output length is twice the padded length minus one.
pub(crate) fn permute_a(input: &[u8]) -> Vec<u8> {
    let mut tmp = input.to_vec();
    pad_cyclic(&mut tmp, 8, &[0xDE, 0xAD, 0xBE, 0xEF]);
    let nsize = tmp.len();

    let mut out = Vec::with_capacity(nsize * 2);
    let mut tot_xor = 0u8;
    for c in 0..(nsize / 8) {
        let ind = c * 8;
        let mut chunk = [0u8; 8];
        for i in 0..8 {
            let mut n = tmp[ind + i];
            tot_xor ^= n;
            for item in chunk.iter_mut() {
                let bit = n & 1;
                n >>= 1;
                *item |= bit << i;
            }
        }
        out.extend_from_slice(&chunk);
    }

    let nsize = out.len();
    for i in 0..nsize - 1 {
        let ind = nsize - 1 - i;
        let n = out[ind];
        let j = out[i];
        out.push(((n >> 4) | (j << 4)) ^ (!(j & n) ^ tot_xor));
    }
    out
}

/// Permutation 'B': staggered bit-plane transpose.
///
/// Like [`permute_a`] but the destination bit is `(i - b) mod 8`, so the
/// most significant bit rotates through the chunk in a rainbow pattern.
/// Output length equals the padded input length.
pub(crate) fn permute_b(input: &[u8]) -> Vec<u8> {
    let mut tmp = input.to_vec();
    pad_cyclic(&mut tmp, 8, &[0xFE, 0xED, 0xC0, 0xDE]);
    let nsize = tmp.len();

    let mut out = Vec::with_capacity(nsize);
    for c in 0..(nsize / 8) {
        let ind = c * 8;
        let mut chunk = [0u8; 8];
        for i in 0..8 {
            let mut n = tmp[ind + i];
            for (b, item) in chunk.iter_mut().enumerate() {
                let bit = n & 1;
                n >>= 1;
                let mut val = i as i8 - b as i8;
                if val < 0 {
                    val += 8;
                }
                *item |= bit << val;
            }
        }
        out.extend_from_slice(&chunk);
    }
    out
}

/// Permutation 'C': permute, fold to half size, then a per-byte
/// affine-like nonlinearity.
///
/// Applies [`permute_b`], pairs each front byte with a back byte under
/// two alternating nibble-cross patterns, and finishes with a
/// self-multiplication step that toggles between two forms. The toggle
/// runs on across both passes. Output length is half the permuted
/// length.
pub(crate) fn permute_c(input: &[u8]) -> Vec<u8> {
    let mut permuted = permute_b(input);
    let mut size = permuted.len();
    if size & 1 == 1 {
        permuted.push(0xFF);
        size += 1;
    }
    let mut outa = Vec::with_capacity(size / 2);
    let mut n_flag = false;
    for i in 0..(size / 2) {
        let t = permuted[i];
        let j = permuted[size / 2 - i];
        if n_flag {
            outa.push((t >> 4) ^ (j << 4) ^ (t & !j));
        } else {
            outa.push((t >> 3) ^ (j << 5) ^ (!t & j));
        }
        n_flag = !n_flag;
    }
    let mut out = Vec::with_capacity(outa.len());
    for &value in &outa {
        let x = value as i32;
        if n_flag {
            out.push((((x * (!x >> 4)) % 256) ^ x) as u8);
        } else {
            out.push(((((x * (x >> 3)) + (!x >> 5)) % 256) ^ x) as u8);
        }
        n_flag = !n_flag;
    }
    out
}

/// Bit mixer over 5-byte chunks, in two independent variants.
///
/// Within each chunk the low bit of every byte is re-spread through a
/// toggling shift pattern (the `form` variant inverts the spread bits),
/// every other output byte is inverted or incremented, and a final pass
/// XORs each byte against affine combinations of the padded input.
/// `form` is a second variant, not an inverse switch. Output length is
/// the padded length minus one.
pub(crate) fn mix(input: &[u8], form: bool) -> Vec<u8> {
    let mut tmp = input.to_vec();
    pad_cyclic(&mut tmp, 5, &[0xCA, 0xBE, 0xDF]);
    let sz = tmp.len();

    let mut outa = Vec::with_capacity(sz);
    for c in 0..(sz / 5) {
        let ind = c * 5;
        let mut chunk = [0u8; 5];
        let mut bind: u32 = 0;
        let mut pnt = true;
        let mut last = tmp[sz - 1];
        for i in 0..5 {
            let mut n = tmp[ind + i];
            if pnt {
                n ^= !last;
            }
            for _ in 0..8 {
                let bit = n & 1;
                let j: u8 = if pnt {
                    if form {
                        ((!(bit as i32)) << bind) as u8
                    } else {
                        ((bit as u32) << bind) as u8
                    }
                } else {
                    let shifted = ((bit as u32) << (bind + 3)) as u8;
                    bind += 1;
                    shifted
                };
                pnt = !pnt;
                chunk[i] ^= j;
            }
            last = n;
        }
        let mut inv = false;
        for &byte in chunk.iter() {
            if inv {
                outa.push(!byte);
            } else {
                outa.push(byte.wrapping_add(form as u8));
            }
            inv = !inv;
        }
    }

    let mut outb = Vec::with_capacity(sz - 1);
    let mut toggle = false;
    for i in 0..sz - 1 {
        let t = tmp[i];
        let o = outa[i];
        let mut j = (t ^ !o) ^ o.rotate_left(3);
        if toggle {
            j ^= ((((t >> 2) as u16 * o as u16) + ((t as u16 + o as u16) >> 3)) % 256) as u8;
        }
        if form {
            j ^= (((!(o as i32)) >> 3) | ((o as i32) << 5)) as u8;
        }
        toggle = !toggle;
        outb.push(j);
    }
    outb
}

/// Combines two capacity-length vectors into the final digest.
///
/// For each position the bytes `A[i]` and `B[cap-1-i]` select two
/// cross-indexed partners (the selector wraps by repeatedly subtracting
/// half the capacity), and the four bytes blend through multiplication
/// mod 256 and XOR.
///
/// # Errors
/// [`ErcCryptoError::InvalidCapacity`] when `capacity < 2` (the index
/// reduction would not terminate), [`ErcCryptoError::CapacityMismatch`]
/// when either input is not `capacity` bytes long.
pub(crate) fn intertwine(
    in_a: &[u8],
    in_b: &[u8],
    capacity: u16,
) -> Result<Vec<u8>, ErcCryptoError> {
    if capacity < 2 {
        return Err(ErcCryptoError::InvalidCapacity);
    }
    let cap = capacity as usize;
    if in_a.len() != cap || in_b.len() != cap {
        return Err(ErcCryptoError::CapacityMismatch);
    }
    let mut out = Vec::with_capacity(cap);
    for i in 0..cap {
        let a = in_a[i];
        let b = in_b[cap - 1 - i];

        let mut ind = i + (a ^ b) as usize;
        while ind >= cap {
            ind -= cap / 2;
        }

        let c = in_a[cap - 1 - ind];
        let d = in_b[ind];

        let j = a as u32 * b as u32;
        let n = ((j + (c ^ d) as u32) % 256) as u8;
        out.push(a ^ b ^ c ^ n ^ !((n << 4) ^ (d >> 4)));
    }
    Ok(out)
}
