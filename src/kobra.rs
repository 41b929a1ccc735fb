//! KOBRA: calycryptographic concealment layer.
//!
//! Calycryptography conceals a hidden message in reference to an
//! unchanged cover body and a key: the cover is run through a lightweight
//! ARX stream cipher in one-byte CBC mode, the hidden message is XORed
//! against that keystream, and the result is ciphered once more to form
//! the extract key. Recovering the hidden message requires the cover,
//! the key and the IV byte together.
//!
//! The extract key is exactly as long as the hidden message; this
//! same-length side channel is a documented property of the construction,
//! not an accident.
//!
//! # Examples
//!
//! ```
//! use erc_crypto::kobra;
//!
//! let cover = b"the bee, of course, flies anyway, because bees do not care".to_vec();
//! let key = b"what humans think".to_vec();
//! let hidden = b"is impossible anyway".to_vec();
//!
//! let artifact = kobra::encrypt_from(&cover, &key, &hidden, 0x42).unwrap();
//! assert_eq!(artifact.extract_key.len(), hidden.len());
//!
//! let recovered = kobra::decrypt_from(&cover, &artifact).unwrap();
//! assert_eq!(recovered, hidden);
//! ```

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ErcCryptoError;

/// Minimum ARX-CBC cipher key length, in bytes.
pub const MIN_KEY_SIZE: usize = 12;

/// Key-pair artifact produced by [`encrypt_from`].
///
/// Holds the encryption key, the message-length extract key and the IV
/// byte. All fields are wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    /// The cipher key the artifact was produced under.
    pub encrypt_key: Vec<u8>,
    /// Ciphered concealment of the hidden message; same length as the
    /// hidden message.
    pub extract_key: Vec<u8>,
    /// One-byte initialization vector for the chaining mode.
    pub iv: u8,
}

/// Validates the ARX-CBC cipher arguments.
fn check_cipher_args(data: &[u8], key: &[u8]) -> Result<(), ErcCryptoError> {
    if key.len() < MIN_KEY_SIZE {
        return Err(ErcCryptoError::KeyTooShort);
    }
    if key.len() > data.len() {
        return Err(ErcCryptoError::KeyLongerThanInput);
    }
    Ok(())
}

/// ARX stream cipher in one-byte CBC mode, encrypt direction.
///
/// Per byte: XOR with the chain byte, add the cyclic key byte, rotate
/// right by three, and XOR with the key byte blended against the
/// complement of its mirror. The chain carries the emitted byte shifted
/// right by one. The mirror index `key[len - i]` wraps modulo the key
/// length, so position zero reads the first key byte.
///
/// # Errors
/// [`ErcCryptoError::KeyTooShort`] below 12 key bytes,
/// [`ErcCryptoError::KeyLongerThanInput`] when the key outsizes the data.
pub fn cipher_encrypt(
    plaintext: &[u8],
    key: &[u8],
    iv: u8,
) -> Result<Vec<u8>, ErcCryptoError> {
    check_cipher_args(plaintext, key)?;
    let size = key.len();
    let mut chain = iv;
    let mut temp = Vec::with_capacity(plaintext.len());
    let mut key_index = 0usize;
    for &byte in plaintext {
        let work = byte ^ chain;
        let mut w2 = work.wrapping_add(key[key_index]);
        w2 = w2.rotate_right(3);
        w2 ^= key[key_index] ^ !key[(size - key_index) % size];
        temp.push(w2);
        chain = w2 >> 1;
        key_index = if key_index == size - 1 { 0 } else { key_index + 1 };
    }
    Ok(temp)
}

/// ARX stream cipher in one-byte CBC mode, decrypt direction.
///
/// Undoes the XOR stage, the rotation and the addition in reverse order;
/// the chain value is taken from the ciphertext byte.
///
/// # Errors
/// Same validation as [`cipher_encrypt`].
pub fn cipher_decrypt(
    ciphertext: &[u8],
    key: &[u8],
    iv: u8,
) -> Result<Vec<u8>, ErcCryptoError> {
    check_cipher_args(ciphertext, key)?;
    let size = key.len();
    let mut chain = iv;
    let mut temp = Vec::with_capacity(ciphertext.len());
    let mut key_index = 0usize;
    for &work in ciphertext {
        let mut w2 = work ^ (key[key_index] ^ !key[(size - key_index) % size]);
        w2 = w2.rotate_left(3);
        w2 = w2.wrapping_sub(key[key_index]) ^ chain;
        temp.push(w2);
        chain = work >> 1;
        key_index = if key_index == size - 1 { 0 } else { key_index + 1 };
    }
    Ok(temp)
}

/// XORs a larger vector against a smaller one, passing the tail through.
///
/// Bytes beyond the second input's length are copied unchanged; the
/// second input is not repeated.
fn xor_mask(main_text: &[u8], second_text: &[u8]) -> Vec<u8> {
    debug_assert!(main_text.len() >= second_text.len());
    let mut temp = Vec::with_capacity(main_text.len());
    for (i, &byte) in main_text.iter().enumerate() {
        if i < second_text.len() {
            temp.push(byte ^ second_text[i]);
        } else {
            temp.push(byte);
        }
    }
    temp
}

/// XORs every byte of a message with a single byte.
fn xor_byte(text: &[u8], what: u8) -> Vec<u8> {
    text.iter().map(|&b| b ^ what).collect()
}

/// Conceals `message` against `cover_body` under `key` and `iv`.
///
/// # Parameters
/// - `cover_body`: The unchanged cover text.
/// - `key`: Cipher key; at least 12 bytes and no longer than either the
///   cover or the hidden message.
/// - `message`: The hidden message; at most as long as the cover.
/// - `iv`: One-byte initialization vector.
///
/// # Errors
/// [`ErcCryptoError::HiddenLargerThanCover`] when the message outsizes
/// the cover; key validation errors as in [`cipher_encrypt`].
pub fn encrypt_from(
    cover_body: &[u8],
    key: &[u8],
    message: &[u8],
    iv: u8,
) -> Result<KeyPair, ErcCryptoError> {
    if message.len() > cover_body.len() {
        return Err(ErcCryptoError::HiddenLargerThanCover);
    }
    let ready = xor_byte(message, iv);
    let ciphered_cover = cipher_encrypt(cover_body, key, iv)?;
    let masked = xor_mask(&ciphered_cover, &ready);
    let concealed: Vec<u8> = masked.into_iter().take(message.len()).collect();
    let extract_key = cipher_encrypt(&concealed, key, iv)?;
    Ok(KeyPair {
        encrypt_key: key.to_vec(),
        extract_key,
        iv,
    })
}

/// Recovers the hidden message from a cover body and its artifact.
///
/// # Errors
/// [`ErcCryptoError::HiddenLargerThanCover`] when the artifact's extract
/// key outsizes the cover; key validation errors as in
/// [`cipher_encrypt`].
pub fn decrypt_from(cover_body: &[u8], data: &KeyPair) -> Result<Vec<u8>, ErcCryptoError> {
    if data.extract_key.len() > cover_body.len() {
        return Err(ErcCryptoError::HiddenLargerThanCover);
    }
    let ciphered_cover = cipher_encrypt(cover_body, &data.encrypt_key, data.iv)?;
    let concealed = cipher_decrypt(&data.extract_key, &data.encrypt_key, data.iv)?;
    let xored = xor_mask(&ciphered_cover, &concealed);
    let message: Vec<u8> = xored.into_iter().take(data.extract_key.len()).collect();
    Ok(xor_byte(&message, data.iv))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"sixteen byte key";

    #[test]
    fn test_cipher_roundtrip() {
        let plaintext = b"a message somewhat longer than the key itself".to_vec();
        let ciphertext = cipher_encrypt(&plaintext, KEY, 0x42).unwrap();
        assert_ne!(ciphertext, plaintext);
        assert_eq!(cipher_decrypt(&ciphertext, KEY, 0x42).unwrap(), plaintext);
    }

    #[test]
    fn test_cipher_roundtrip_all_ivs() {
        let plaintext = [0xA5u8; 32];
        for iv in [0x00u8, 0x01, 0x7F, 0x80, 0xFF] {
            let ciphertext = cipher_encrypt(&plaintext, KEY, iv).unwrap();
            assert_eq!(
                cipher_decrypt(&ciphertext, KEY, iv).unwrap(),
                plaintext,
                "roundtrip failed for iv={:#04x}",
                iv
            );
        }
    }

    #[test]
    fn test_cipher_chaining_breaks_repetition() {
        let plaintext = [0x00u8; 48];
        let ciphertext = cipher_encrypt(&plaintext, KEY, 0x11).unwrap();
        // Equal plaintext bytes must not produce a constant ciphertext.
        assert!(ciphertext.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_cipher_key_validation() {
        let data = [0u8; 32];
        assert_eq!(
            cipher_encrypt(&data, b"short", 0).err(),
            Some(ErcCryptoError::KeyTooShort)
        );
        let long_key = [7u8; 33];
        assert_eq!(
            cipher_encrypt(&data, &long_key, 0).err(),
            Some(ErcCryptoError::KeyLongerThanInput)
        );
        assert_eq!(
            cipher_decrypt(&data, b"short", 0).err(),
            Some(ErcCryptoError::KeyTooShort)
        );
    }

    #[test]
    fn test_encrypt_from_same_length_property() {
        let cover = [0x3Cu8; 100];
        let hidden = b"twenty hidden bytes!".to_vec();
        let artifact = encrypt_from(&cover, KEY, &hidden, 0x42).unwrap();
        assert_eq!(artifact.extract_key.len(), hidden.len());
        assert_eq!(artifact.encrypt_key, KEY);
        assert_eq!(artifact.iv, 0x42);
    }

    #[test]
    fn test_conceal_roundtrip() {
        let cover: Vec<u8> = (0..100u8).map(|i| i.wrapping_mul(13).wrapping_add(7)).collect();
        let hidden = b"twenty hidden bytes!".to_vec();
        let artifact = encrypt_from(&cover, KEY, &hidden, 0x42).unwrap();
        assert_eq!(decrypt_from(&cover, &artifact).unwrap(), hidden);
    }

    #[test]
    fn test_decrypt_with_wrong_cover_garbles() {
        let cover = [0x55u8; 64];
        let hidden = b"secret rendezvous".to_vec();
        let artifact = encrypt_from(&cover, KEY, &hidden, 0x09).unwrap();
        let wrong_cover = [0x56u8; 64];
        let recovered = decrypt_from(&wrong_cover, &artifact).unwrap();
        assert_ne!(recovered, hidden);
    }

    #[test]
    fn test_hidden_larger_than_cover_rejected() {
        let cover = [0u8; 16];
        let hidden = [0u8; 17];
        assert_eq!(
            encrypt_from(&cover, KEY, &hidden, 0).err(),
            Some(ErcCryptoError::HiddenLargerThanCover)
        );
    }

    #[test]
    fn test_key_longer_than_hidden_rejected() {
        // The concealed message is ciphered again, so the key must also
        // fit the hidden message.
        let cover = [0u8; 64];
        let hidden = [0u8; 8];
        assert_eq!(
            encrypt_from(&cover, KEY, &hidden, 0).err(),
            Some(ErcCryptoError::KeyLongerThanInput)
        );
    }

    #[test]
    fn test_mirror_index_wraps_at_zero() {
        // Position zero reads key[0] through the wrapped mirror index;
        // a cipher built this way must still round-trip.
        let plaintext = [0x81u8; 16];
        let ciphertext = cipher_encrypt(&plaintext, KEY, 0xFF).unwrap();
        assert_eq!(cipher_decrypt(&ciphertext, KEY, 0xFF).unwrap(), plaintext);
    }
}
