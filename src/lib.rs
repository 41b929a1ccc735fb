//! ERC-Crypto: educational cryptographic primitive suite.
//!
//! Three interlocking from-scratch algorithms sharing only byte-vector
//! types, kept bit-for-bit compatible with the C++ liberc-crypto
//! library:
//!
//! ```text
//! VIPER-1  (block cipher — 24-byte blocks, 60-byte key, 16-round
//!     |     Lai-Massey network with CBC chaining and a magic-header
//!     |     outer format)
//! NACHA    (hash — variable-width digest from permute/mix/intertwine
//!     |     stages, with fixed 128..768-bit adapters)
//! KOBRA    (calycryptographic layer — ARX-CBC stream cipher concealing
//!           a hidden message against an unchanged cover text)
//! ```
//!
//! Every primitive is a pure function over byte vectors: no shared
//! state, no I/O, no background work. Composition happens at the caller
//! level, for example hashing a plaintext to derive a cipher key.
//!
//! None of the algorithms is a standard-conformant or cryptanalytically
//! modern design; they are study material, not a security product.
//!
//! # Examples
//!
//! Derive a VIPER-1 key and IV from the plaintext's own digests, then
//! round-trip it:
//!
//! ```
//! use erc_crypto::{nacha, viper1};
//!
//! let plaintext = b"According to all known laws of aviation...".to_vec();
//!
//! let key_digest = nacha::hash_512e(&plaintext).unwrap();
//! let iv_digest = nacha::hash_128(&plaintext).unwrap();
//! let (key, iv) = (&key_digest[..60], &iv_digest[..12]);
//!
//! let ciphertext = viper1::encrypt_data(&plaintext, key, iv).unwrap();
//! let decrypted = viper1::decrypt_data(&ciphertext, key, iv).unwrap();
//! assert_eq!(decrypted, plaintext);
//! ```
//!
//! Conceal a message against a cover text:
//!
//! ```
//! use erc_crypto::kobra;
//!
//! let cover = b"unchanged cover text, long enough to hide behind".to_vec();
//! let artifact = kobra::encrypt_from(&cover, b"twelve bytes", b"hidden message", 0x42).unwrap();
//! assert_eq!(kobra::decrypt_from(&cover, &artifact).unwrap(), b"hidden message");
//! ```

#![deny(clippy::all)]

pub mod error;

pub mod kobra;
pub mod nacha;
pub mod permuter;
pub mod sbox;
pub mod utils;
pub mod viper1;

pub use error::ErcCryptoError;
pub use kobra::KeyPair;
