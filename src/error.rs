//! Error types for the ERC-Crypto library.

use std::fmt;

/// Errors produced by the ERC-Crypto library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErcCryptoError {
    /// VIPER-1 key is not exactly 60 bytes.
    InvalidKeyLength,
    /// VIPER-1 initialization vector is not exactly 12 bytes.
    InvalidIvLength,
    /// VIPER-1 raw input is empty or not a multiple of the 24-byte block.
    InvalidInputLength,
    /// VIPER-1 ciphertext does not begin with the `0xA5 0x5A` magic bytes.
    BadHeader,
    /// Hash input is empty.
    EmptyInput,
    /// Hash output capacity is below the minimum of 2 bytes.
    InvalidCapacity,
    /// Hash block divisor is zero.
    InvalidBlockDivisor,
    /// Intertwine input length does not match the requested capacity.
    CapacityMismatch,
    /// KOBRA cipher key is shorter than the 12-byte minimum.
    KeyTooShort,
    /// KOBRA cipher key is longer than the data it is applied to.
    KeyLongerThanInput,
    /// KOBRA hidden message is longer than the cover body.
    HiddenLargerThanCover,
    /// S-box generator function produced an output collision.
    NotDeterministic,
    /// Permuter block parameters are outside the valid range.
    InvalidBlockParameters,
    /// Key-derived placement table is not a permutation of the block indices.
    NonBijectiveTable,
}

impl fmt::Display for ErcCryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErcCryptoError::InvalidKeyLength => {
                write!(f, "Key must be exactly 60 bytes long")
            }
            ErcCryptoError::InvalidIvLength => {
                write!(f, "Initialization vector must be exactly 12 bytes long")
            }
            ErcCryptoError::InvalidInputLength => {
                write!(f, "Input must be a non-empty multiple of 24 bytes")
            }
            ErcCryptoError::BadHeader => {
                write!(f, "Decrypted data does not carry the expected magic header")
            }
            ErcCryptoError::EmptyInput => {
                write!(f, "No data provided to hash")
            }
            ErcCryptoError::InvalidCapacity => {
                write!(f, "Hash capacity must be at least 2 bytes")
            }
            ErcCryptoError::InvalidBlockDivisor => {
                write!(f, "Hash block divisors must be non-zero")
            }
            ErcCryptoError::CapacityMismatch => {
                write!(
                    f,
                    "Intertwine input is not the length of the specified capacity"
                )
            }
            ErcCryptoError::KeyTooShort => {
                write!(f, "Cipher key must be at least 12 bytes long")
            }
            ErcCryptoError::KeyLongerThanInput => {
                write!(f, "Cipher key must not be longer than the data")
            }
            ErcCryptoError::HiddenLargerThanCover => {
                write!(f, "Hidden message must not be longer than the cover body")
            }
            ErcCryptoError::NotDeterministic => {
                write!(f, "Function provided to the S-box is not deterministic")
            }
            ErcCryptoError::InvalidBlockParameters => {
                write!(f, "Block size or rotation level is outside the valid range")
            }
            ErcCryptoError::NonBijectiveTable => {
                write!(f, "Derived placement table is not a permutation")
            }
        }
    }
}

impl std::error::Error for ErcCryptoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_key_length() {
        let err = ErcCryptoError::InvalidKeyLength;
        assert_eq!(format!("{}", err), "Key must be exactly 60 bytes long");
    }

    #[test]
    fn test_display_bad_header() {
        let err = ErcCryptoError::BadHeader;
        assert_eq!(
            format!("{}", err),
            "Decrypted data does not carry the expected magic header"
        );
    }

    #[test]
    fn test_display_not_deterministic() {
        let err = ErcCryptoError::NotDeterministic;
        assert_eq!(
            format!("{}", err),
            "Function provided to the S-box is not deterministic"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(ErcCryptoError::EmptyInput, ErcCryptoError::EmptyInput);
        assert_ne!(ErcCryptoError::EmptyInput, ErcCryptoError::KeyTooShort);
    }

    #[test]
    fn test_error_clone() {
        let err = ErcCryptoError::HiddenLargerThanCover;
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }

    #[test]
    fn test_error_trait_object() {
        let err: &dyn std::error::Error = &ErcCryptoError::BadHeader;
        assert!(err.source().is_none());
    }
}
