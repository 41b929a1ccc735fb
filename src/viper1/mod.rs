//! VIPER-1: Lai-Massey style block cipher.
//!
//! VIPER-1 operates on 24-byte blocks split into two 12-byte halves,
//! under a 60-byte key and a 12-byte initialization vector. Each of the
//! 16 rounds opens and closes with a keyed permutation stage, applies
//! one of two invertible half-round functions selected by a 16-bit
//! schedule matrix derived from the key, and exchanges the half-block
//! difference through a non-linear round function. Blocks chain in a
//! CBC-like mode seeded from the IV and its reversal.
//!
//! The outer format prepends a three-byte header `0xA5 0x5A N` followed
//! by `N` null bytes so that arbitrary-length input fills whole blocks;
//! the magic bytes double as the only integrity signal on decrypt.
//!
//! # Examples
//!
//! ```
//! use erc_crypto::viper1;
//!
//! let key = [0x6Bu8; 60];
//! let iv = [0x21u8; 12];
//! let plaintext = b"no way a bee should be able to fly".to_vec();
//!
//! let ciphertext = viper1::encrypt_data(&plaintext, &key, &iv).unwrap();
//! let decrypted = viper1::decrypt_data(&ciphertext, &key, &iv).unwrap();
//! assert_eq!(decrypted, plaintext);
//! ```

pub(crate) mod funcs;

use crate::error::ErcCryptoError;

/// Size of one half of a cipher block, in bytes.
pub(crate) const HALF_BLOCK: usize = 12;

/// Size of a full cipher block, in bytes.
pub const BLOCK_SIZE: usize = 24;

/// Required key length, in bytes.
pub const KEY_SIZE: usize = 60;

/// Required initialization-vector length, in bytes.
pub const IV_SIZE: usize = 12;

/// Ordered pair of half-blocks forming the internal cipher state.
pub(crate) type HalfPair = ([u8; HALF_BLOCK], [u8; HALF_BLOCK]);

/// Constant sub-key consumed by the final four rounds.
const TAIL_SUBKEY: [u8; 5] = [0xA5; 5];

/// Derives the two schedule bytes from the 60-byte key.
///
/// Seven XOR accumulations run over groups of eight key bytes; the
/// seventh group spans bytes 48..=54 plus byte 56. The groups are then
/// blended through modular multiplication and masked with the trailing
/// key bytes.
fn schedule_bytes(key: &[u8]) -> (u8, u8) {
    debug_assert_eq!(key.len(), KEY_SIZE);
    let group = |start: usize| -> u8 {
        key[start]
            ^ key[start + 1]
            ^ key[start + 2]
            ^ key[start + 3]
            ^ key[start + 4]
            ^ key[start + 5]
            ^ key[start + 6]
            ^ key[start + 7]
    };
    let sa = group(0);
    let sb = group(8);
    let sc = group(16);
    let sd = group(24);
    let se = group(32);
    let sf = group(40);
    let sg = key[48] ^ key[49] ^ key[50] ^ key[51] ^ key[52] ^ key[53] ^ key[54] ^ key[56];
    let sched1 =
        (((sa as u16 * sb as u16 + se as u16) % 256) as u8) ^ key[57] ^ (sg & key[59]);
    let sched2 =
        (((sc as u16 * sd as u16 + sf as u16) % 256) as u8) ^ key[58] ^ (sg & key[59]);
    (sched1, sched2)
}

/// Expands the two schedule bytes into the 16 per-round selector bits,
/// low bit first within each byte.
fn schedule_matrix(sched1: u8, sched2: u8) -> [bool; 16] {
    let mut bits = [false; 16];
    for (j, bit) in bits.iter_mut().enumerate() {
        let byte = if j < 8 { sched1 } else { sched2 };
        *bit = (byte >> (j % 8)) & 1 == 1;
    }
    bits
}

/// One encryption round.
///
/// Opens with the permutation stage, applies the selected half-round,
/// XORs the halves with the middle key bytes, runs the round function on
/// the half-block difference, adds it back to both halves with a swap,
/// and closes with a second permutation stage.
///
/// # Parameters
/// - `input`: The half-block pair to transform.
/// - `use_arx`: Selects the ARX half-round; otherwise reverse-multiply.
/// - `key`: Key material; bytes `key_start..key_start + 5` are consumed.
/// - `key_start`: Offset of this round's key window.
fn round_enc(input: HalfPair, use_arx: bool, key: &[u8], key_start: usize) -> HalfPair {
    let newer = funcs::permute_enc(input, key[key_start]);
    let newer = if use_arx {
        funcs::arx_enc(newer.0, newer.1, key[key_start], key[key_start + 1])
    } else {
        funcs::revmult_enc(newer.0, newer.1, key[key_start], key[key_start + 1])
    };
    let xored = funcs::mid_xor(newer.0, newer.1, key[key_start + 2], key[key_start + 3]);
    let difference = funcs::diff(xored.0, xored.1);
    let round = funcs::round_function(difference, key[key_start + 4]);
    let swapped = (funcs::add(xored.1, round), funcs::add(xored.0, round));
    funcs::permute_enc(swapped, key[key_start + 4])
}

/// One decryption round; undoes [`round_enc`] step by step in reverse.
fn round_dec(input: HalfPair, use_arx: bool, key: &[u8], key_start: usize) -> HalfPair {
    let j = funcs::permute_dec(input, key[key_start + 4]);
    let difference = funcs::diff(j.1, j.0);
    let round = funcs::round_function(difference, key[key_start + 4]);
    let unswapped = (funcs::diff(j.1, round), funcs::diff(j.0, round));
    let xored = funcs::mid_xor(unswapped.0, unswapped.1, key[key_start + 2], key[key_start + 3]);
    let xored = if use_arx {
        funcs::arx_dec(xored.0, xored.1, key[key_start], key[key_start + 1])
    } else {
        funcs::revmult_dec(xored.0, xored.1, key[key_start], key[key_start + 1])
    };
    funcs::permute_dec(xored, key[key_start])
}

/// Runs the full 16-round cycle in the encrypt direction.
///
/// Twelve rounds consume the key in sliding windows of five bytes at
/// offsets 0, 5, ..., 55; the last four rounds use the constant tail
/// sub-key.
fn cycle_enc(input: HalfPair, key: &[u8], schedule: &[bool; 16]) -> HalfPair {
    debug_assert_eq!(key.len(), KEY_SIZE);
    let mut n = input;
    for (round, &bit) in schedule.iter().enumerate().take(12) {
        n = round_enc(n, bit, key, round * 5);
    }
    for &bit in schedule.iter().skip(12) {
        n = round_enc(n, bit, &TAIL_SUBKEY, 0);
    }
    n
}

/// Runs the full 16-round cycle in the decrypt direction.
fn cycle_dec(input: HalfPair, key: &[u8], schedule: &[bool; 16]) -> HalfPair {
    debug_assert_eq!(key.len(), KEY_SIZE);
    let mut n = input;
    for &bit in schedule.iter().skip(12).rev() {
        n = round_dec(n, bit, &TAIL_SUBKEY, 0);
    }
    for (round, &bit) in schedule.iter().enumerate().take(12).rev() {
        n = round_dec(n, bit, key, round * 5);
    }
    n
}

/// Splits a multiple-of-24 byte slice into half-block pairs.
fn into_pairs(input: &[u8]) -> Vec<HalfPair> {
    input
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut left = [0u8; HALF_BLOCK];
            let mut right = [0u8; HALF_BLOCK];
            left.copy_from_slice(&chunk[..HALF_BLOCK]);
            right.copy_from_slice(&chunk[HALF_BLOCK..]);
            (left, right)
        })
        .collect()
}

/// Validates the raw-layer arguments shared by both directions.
fn check_args(input: &[u8], key: &[u8], iv: &[u8]) -> Result<[u8; HALF_BLOCK], ErcCryptoError> {
    if key.len() != KEY_SIZE {
        return Err(ErcCryptoError::InvalidKeyLength);
    }
    if iv.len() != IV_SIZE {
        return Err(ErcCryptoError::InvalidIvLength);
    }
    if input.is_empty() || !input.len().is_multiple_of(BLOCK_SIZE) {
        return Err(ErcCryptoError::InvalidInputLength);
    }
    let mut iv_block = [0u8; HALF_BLOCK];
    iv_block.copy_from_slice(iv);
    Ok(iv_block)
}

/// Encrypts a multiple-of-24 byte vector without the outer header.
///
/// Blocks chain: each plaintext pair is XORed with the permuted previous
/// ciphertext pair (the IV and its reversal seed the chain) before the
/// round cycle runs.
///
/// # Parameters
/// - `input`: Plaintext; length must be a non-zero multiple of 24.
/// - `key`: Exactly 60 bytes.
/// - `iv`: Exactly 12 bytes.
///
/// # Errors
/// [`ErcCryptoError::InvalidKeyLength`], [`ErcCryptoError::InvalidIvLength`]
/// or [`ErcCryptoError::InvalidInputLength`] on malformed arguments.
pub fn encrypt(input: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    let iv_block = check_args(input, key, iv)?;
    let (sched1, sched2) = schedule_bytes(key);
    let schedule = schedule_matrix(sched1, sched2);

    let mut output = Vec::with_capacity(input.len());
    let mut last: HalfPair = (iv_block, funcs::reverse_half(iv_block));
    for pair in into_pairs(input) {
        let n = funcs::xor_pairs(pair, last);
        let n = cycle_enc(n, key, &schedule);
        last = funcs::permute_enc(n, sched1 ^ sched2);
        output.extend_from_slice(&n.0);
        output.extend_from_slice(&n.1);
    }
    Ok(output)
}

/// Decrypts a multiple-of-24 byte vector without the outer header.
///
/// The chain value carried between blocks is computed from the
/// ciphertext pair, mirroring the encrypt side.
///
/// # Errors
/// Same argument validation as [`encrypt`].
pub fn decrypt(input: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    let iv_block = check_args(input, key, iv)?;
    let (sched1, sched2) = schedule_bytes(key);
    let schedule = schedule_matrix(sched1, sched2);

    let mut output = Vec::with_capacity(input.len());
    let mut last: HalfPair = (iv_block, funcs::reverse_half(iv_block));
    for pair in into_pairs(input) {
        let n = cycle_dec(pair, key, &schedule);
        let n = funcs::xor_pairs(n, last);
        last = funcs::permute_enc(pair, sched1 ^ sched2);
        output.extend_from_slice(&n.0);
        output.extend_from_slice(&n.1);
    }
    Ok(output)
}

/// Encrypts arbitrary-length data with the outer header format.
///
/// Prepends `0xA5 0x5A N` and `N` null bytes, choosing `N` so the total
/// length is a multiple of the block size, then encrypts.
///
/// # Examples
///
/// ```
/// use erc_crypto::viper1;
///
/// let ciphertext = viper1::encrypt_data(b"short", &[7u8; 60], &[1u8; 12]).unwrap();
/// assert_eq!(ciphertext.len() % viper1::BLOCK_SIZE, 0);
/// ```
pub fn encrypt_data(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    let null_bytes = BLOCK_SIZE - ((3 + plaintext.len()) % BLOCK_SIZE);
    let mut framed = vec![0u8; null_bytes + 3];
    framed[0] = 0xA5;
    framed[1] = 0x5A;
    framed[2] = null_bytes as u8;
    framed.extend_from_slice(plaintext);
    encrypt(&framed, key, iv)
}

/// Decrypts data produced by [`encrypt_data`] and strips the header.
///
/// # Errors
/// [`ErcCryptoError::BadHeader`] if the decrypted data does not open
/// with the magic bytes; argument validation errors as in [`decrypt`].
pub fn decrypt_data(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, ErcCryptoError> {
    let temp = decrypt(ciphertext, key, iv)?;
    if temp.len() < 3 || temp[0] != 0xA5 || temp[1] != 0x5A {
        return Err(ErcCryptoError::BadHeader);
    }
    let padding = temp[2] as usize;
    Ok(temp.into_iter().skip(3 + padding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        for (i, item) in key.iter_mut().enumerate() {
            *item = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        key
    }

    fn test_iv() -> [u8; IV_SIZE] {
        let mut iv = [0u8; IV_SIZE];
        for (i, item) in iv.iter_mut().enumerate() {
            *item = (i as u8).wrapping_mul(23).wrapping_add(5);
        }
        iv
    }

    #[test]
    fn test_schedule_matrix_bit_order() {
        let bits = schedule_matrix(0b0000_0101, 0b1000_0000);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[2]);
        assert!(!bits[8]);
        assert!(bits[15]);
    }

    #[test]
    fn test_schedule_bytes_deterministic() {
        let key = test_key();
        assert_eq!(schedule_bytes(&key), schedule_bytes(&key));
    }

    #[test]
    fn test_cycle_roundtrip() {
        let key = test_key();
        let (sched1, sched2) = schedule_bytes(&key);
        let schedule = schedule_matrix(sched1, sched2);
        let pair: HalfPair = ([0x11u8; 12], [0xEEu8; 12]);
        let encrypted = cycle_enc(pair, &key, &schedule);
        assert_ne!(encrypted, pair);
        assert_eq!(cycle_dec(encrypted, &key, &schedule), pair);
    }

    #[test]
    fn test_raw_roundtrip_single_block() {
        let key = test_key();
        let iv = test_iv();
        let plaintext: Vec<u8> = (0u8..24).collect();
        let ciphertext = encrypt(&plaintext, &key, &iv).unwrap();
        assert_eq!(ciphertext.len(), 24);
        assert_ne!(ciphertext, plaintext);
        assert_eq!(decrypt(&ciphertext, &key, &iv).unwrap(), plaintext);
    }

    #[test]
    fn test_raw_roundtrip_multi_block() {
        let key = test_key();
        let iv = test_iv();
        let plaintext: Vec<u8> = (0..96u16).map(|i| (i * 7 + 3) as u8).collect();
        let ciphertext = encrypt(&plaintext, &key, &iv).unwrap();
        assert_eq!(decrypt(&ciphertext, &key, &iv).unwrap(), plaintext);
    }

    #[test]
    fn test_cbc_makes_equal_blocks_differ() {
        let key = test_key();
        let iv = test_iv();
        let plaintext = [0x77u8; 48];
        let ciphertext = encrypt(&plaintext, &key, &iv).unwrap();
        assert_ne!(ciphertext[..24], ciphertext[24..]);
    }

    #[test]
    fn test_encrypt_data_pads_to_block() {
        let key = test_key();
        let iv = test_iv();
        for len in [0usize, 1, 20, 21, 24, 25, 100] {
            let plaintext = vec![0x5Au8; len];
            let ciphertext = encrypt_data(&plaintext, &key, &iv).unwrap();
            assert!(
                ciphertext.len().is_multiple_of(BLOCK_SIZE),
                "ciphertext not block aligned for len={}",
                len
            );
            assert_eq!(decrypt_data(&ciphertext, &key, &iv).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_decrypt_data_rejects_corrupted_header() {
        let key = test_key();
        let iv = test_iv();
        let mut ciphertext = encrypt_data(b"integrity", &key, &iv).unwrap();
        ciphertext[0] ^= 0x01;
        assert_eq!(
            decrypt_data(&ciphertext, &key, &iv).err(),
            Some(ErcCryptoError::BadHeader)
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let key = test_key();
        let iv = test_iv();
        let block = [0u8; 24];
        assert_eq!(
            encrypt(&block, &key[..59], &iv).err(),
            Some(ErcCryptoError::InvalidKeyLength)
        );
        assert_eq!(
            encrypt(&block, &key, &iv[..11]).err(),
            Some(ErcCryptoError::InvalidIvLength)
        );
        assert_eq!(
            encrypt(&block[..23], &key, &iv).err(),
            Some(ErcCryptoError::InvalidInputLength)
        );
        assert_eq!(
            encrypt(&[], &key, &iv).err(),
            Some(ErcCryptoError::InvalidInputLength)
        );
    }

    #[test]
    fn test_different_iv_different_ciphertext() {
        let key = test_key();
        let plaintext = [0x33u8; 24];
        let c1 = encrypt(&plaintext, &key, &test_iv()).unwrap();
        let c2 = encrypt(&plaintext, &key, &[0u8; 12]).unwrap();
        assert_ne!(c1, c2);
    }
}
