//! Keyed three-stage block permuter.
//!
//! [`SimplePermuter`] scrambles a fixed-size byte block through three
//! placement/rotation stages plus a final whitening stage, driven by two
//! construction keys, an offset byte and a six-byte operating key. The
//! backward operation mechanically undoes the forward steps in reverse
//! order, so the pair forms an exact inverse for every accepted
//! construction.
//!
//! The stage-A and stage-C placement tables depend only on the block
//! size; the stage-B table is derived from the construction keys. All
//! three are validated to be permutations at build time — a multiplier
//! sharing a factor with the block size would silently destroy
//! invertibility otherwise.

use crate::error::ErcCryptoError;
use crate::utils::bits::{rearrange, rotate2s, rotate_all, xor_two_key};

/// Per-stage rotation distances and placement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    /// Placement direction for stage A.
    pub flip_a: bool,
    /// Ring-rotation distance for stage A (0..=7).
    pub rot_a: u8,
    /// Placement direction for stage B.
    pub flip_b: bool,
    /// Ring-rotation distance for stage B (0..=7).
    pub rot_b: u8,
    /// Placement direction for stage C.
    pub flip_c: bool,
    /// Ring-rotation distance for stage C (0..=7).
    pub rot_c: u8,
    /// Ring-rotation distance for the end stage (0..=7).
    pub rot_end: u8,
}

/// Three-stage keyed permuter over `N`-byte blocks.
///
/// # Examples
///
/// ```
/// use erc_crypto::permuter::{SimplePermuter, StageConfig};
///
/// let cfg = StageConfig {
///     flip_a: true,
///     rot_a: 3,
///     flip_b: false,
///     rot_b: 5,
///     flip_c: true,
///     rot_c: 2,
///     rot_end: 6,
/// };
/// let permuter = SimplePermuter::<16>::new(cfg, 0x7C, 0x19, 8).unwrap();
/// let key = [0x10u8, 0x32, 0x54, 0x76, 0x98, 0xBA];
/// let block = *b"sixteen byte blk";
/// let scrambled = permuter.operate_forward(block, &key);
/// assert_eq!(permuter.operate_backward(scrambled, &key), block);
/// ```
pub struct SimplePermuter<const N: usize> {
    stage_a_placement: [usize; N],
    stage_b_placement: [usize; N],
    stage_c_placement: [usize; N],
    config: StageConfig,
}

impl<const N: usize> SimplePermuter<N> {
    /// Derives the placement tables from the construction keys.
    ///
    /// # Parameters
    /// - `config`: Stage rotation distances and placement directions.
    /// - `key1`: First construction key byte (stage-B multiplier seed).
    /// - `key2`: Second construction key byte (stage-B offset seed).
    /// - `iv`: Offset byte; must not exceed the block size.
    ///
    /// # Errors
    /// Returns [`ErcCryptoError::InvalidBlockParameters`] if `N` is not
    /// an even value in `8..=254`, a rotation distance exceeds 7, or
    /// `iv > N`; returns [`ErcCryptoError::NonBijectiveTable`] if a
    /// derived placement table is not a permutation of `0..N`.
    pub fn new(config: StageConfig, key1: u8, key2: u8, iv: u8) -> Result<Self, ErcCryptoError> {
        if !(8..=254).contains(&N) || !N.is_multiple_of(2) {
            return Err(ErcCryptoError::InvalidBlockParameters);
        }
        if config.rot_a > 7 || config.rot_b > 7 || config.rot_c > 7 || config.rot_end > 7 {
            return Err(ErcCryptoError::InvalidBlockParameters);
        }
        if iv as usize > N {
            return Err(ErcCryptoError::InvalidBlockParameters);
        }

        // A and C translations are fixed by the block size in use.
        let mut amult: u16 = (N as u16) >> 1;
        if amult & 1 == 1 {
            amult += 2 + N as u16;
        } else {
            amult += 1 + N as u16;
        }
        let cmult: u16 = ((N as u16 + 2) >> 1) + N as u16;
        if cmult & 1 == 0 {
            amult += 1;
        }
        let adda = (amult >> 2) as u8;
        let addc = ((cmult >> 1) + 4) as u8;

        let mut stage_a_placement = [0usize; N];
        let mut stage_c_placement = [0usize; N];
        for i in 0..N {
            stage_a_placement[i] = (adda as usize + amult as usize * i) % N;
            stage_c_placement[i] = (addc as usize + cmult as usize * i) % N;
        }

        let mut bmult1 = ((((key1 & iv) as i32) ^ ((key1 >> 1) as i32) ^ ((!(key1 as i32)) << 2))
            >> 1) as u16;
        let mut bmult2 = ((N as u16) + ((N as u16) >> 2)) >> 1;
        if bmult1 & 1 == 1 {
            bmult1 = bmult1.wrapping_add(4);
        } else {
            bmult1 = bmult1.wrapping_add(5);
        }
        if bmult2 & 1 == 1 {
            bmult2 += 1;
        } else {
            bmult2 += 2;
        }
        let addb = (((key2 as u16) ^ (bmult1 >> 4)).wrapping_add((key2 >> 2) as u16)) as u8;

        let mut stage_b_placement = [0usize; N];
        for i in 0..N {
            stage_b_placement[i] =
                ((addb as u32 + bmult1 as u32 * i as u32 + bmult2 as u32 * i as u32) % N as u32)
                    as usize;
        }

        for table in [&stage_a_placement, &stage_b_placement, &stage_c_placement] {
            if !is_permutation(table) {
                return Err(ErcCryptoError::NonBijectiveTable);
            }
        }

        Ok(SimplePermuter {
            stage_a_placement,
            stage_b_placement,
            stage_c_placement,
            config,
        })
    }

    /// Returns the stage-A placement table.
    pub fn stage_a(&self) -> &[usize; N] {
        &self.stage_a_placement
    }

    /// Returns the stage-B placement table.
    pub fn stage_b(&self) -> &[usize; N] {
        &self.stage_b_placement
    }

    /// Returns the stage-C placement table.
    pub fn stage_c(&self) -> &[usize; N] {
        &self.stage_c_placement
    }

    /// Scrambles a block under the six-byte operating key.
    pub fn operate_forward(&self, input: [u8; N], key: &[u8; 6]) -> [u8; N] {
        let cfg = &self.config;
        let mut temp = rotate2s(input, true, 4);

        temp = rearrange(temp, self.stage_a_placement, cfg.flip_a);
        temp = rotate_all(temp, false, cfg.rot_a);
        temp = xor_two_key(temp, key[1], key[2]);
        temp = rotate2s(temp, true, cfg.rot_a);
        temp = rotate_all(temp, true, cfg.rot_a);

        temp = rearrange(temp, self.stage_b_placement, cfg.flip_b);
        temp = rotate_all(temp, true, cfg.rot_b);
        temp = xor_two_key(temp, key[3], key[4]);
        temp = rotate2s(temp, false, cfg.rot_b);
        temp = rotate_all(temp, false, cfg.rot_b);

        temp = rearrange(temp, self.stage_c_placement, cfg.flip_c);
        temp = rotate_all(temp, false, cfg.rot_c);
        temp = xor_two_key(temp, key[5], key[0]);
        temp = rotate2s(temp, true, cfg.rot_c);
        temp = rotate_all(temp, true, cfg.rot_c);

        for item in temp.iter_mut() {
            *item ^= 0xA5;
        }
        temp = rotate_all(temp, false, cfg.rot_end);
        temp = rotate2s(temp, true, cfg.rot_end);
        rotate_all(temp, true, cfg.rot_end)
    }

    /// Restores a block scrambled by [`operate_forward`](Self::operate_forward).
    pub fn operate_backward(&self, input: [u8; N], key: &[u8; 6]) -> [u8; N] {
        let cfg = &self.config;
        let mut temp = rotate_all(input, false, cfg.rot_end);
        temp = rotate2s(temp, false, cfg.rot_end);
        temp = rotate_all(temp, true, cfg.rot_end);
        for item in temp.iter_mut() {
            *item ^= 0xA5;
        }

        temp = rotate_all(temp, false, cfg.rot_c);
        temp = rotate2s(temp, false, cfg.rot_c);
        temp = xor_two_key(temp, key[5], key[0]);
        temp = rotate_all(temp, true, cfg.rot_c);
        temp = rearrange(temp, self.stage_c_placement, !cfg.flip_c);

        temp = rotate_all(temp, true, cfg.rot_b);
        temp = rotate2s(temp, true, cfg.rot_b);
        temp = xor_two_key(temp, key[3], key[4]);
        temp = rotate_all(temp, false, cfg.rot_b);
        temp = rearrange(temp, self.stage_b_placement, !cfg.flip_b);

        temp = rotate_all(temp, false, cfg.rot_a);
        temp = rotate2s(temp, false, cfg.rot_a);
        temp = xor_two_key(temp, key[1], key[2]);
        temp = rotate_all(temp, true, cfg.rot_a);
        temp = rearrange(temp, self.stage_a_placement, !cfg.flip_a);

        rotate2s(temp, false, 4)
    }
}

/// Checks that every index in `0..N` occurs exactly once.
fn is_permutation<const N: usize>(table: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &index in table.iter() {
        if index >= N || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}
