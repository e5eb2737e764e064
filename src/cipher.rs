//! The block cipher capability this core consumes.
//!
//! The block cipher primitive is treated as an opaque capability
//! exposing a single pure `encrypt_block` — this module never schedules
//! keys or implements a cipher itself. It defines that capability
//! trait, plus (behind the `soft-aes` feature, on by default) adapters
//! over the RustCrypto `aes` crate so the core is independently
//! testable and usable without callers bringing their own AES.

/// A 128-bit block cipher capability: deterministic, side-effect-free
/// encryption of a single block. No key schedule, decryption, or
/// variable block size is exposed — GCM-family modes only ever call
/// the forward direction.
pub trait BlockCipher {
    /// Always 16 for the ciphers this core supports.
    fn block_size(&self) -> usize;

    /// Encrypts one 16-byte block.
    fn encrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]);
}

#[cfg(feature = "soft-aes")]
mod soft_aes {
    use super::BlockCipher;
    use aes::cipher::generic_array::GenericArray;
    use aes::cipher::{BlockEncrypt, KeyInit};
    use aes::{Aes128, Aes256};

    /// AES-128 block cipher, usable as this core's `BlockCipher` capability.
    pub struct Aes128Cipher(Aes128);

    impl Aes128Cipher {
        pub fn new(key: &[u8; 16]) -> Self {
            Aes128Cipher(Aes128::new(GenericArray::from_slice(key)))
        }
    }

    impl BlockCipher for Aes128Cipher {
        fn block_size(&self) -> usize {
            16
        }

        fn encrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]) {
            let mut block = *GenericArray::from_slice(input);
            self.0.encrypt_block(&mut block);
            output.copy_from_slice(block.as_slice());
        }
    }

    /// AES-256 block cipher, usable as this core's `BlockCipher` capability.
    pub struct Aes256Cipher(Aes256);

    impl Aes256Cipher {
        pub fn new(key: &[u8; 32]) -> Self {
            Aes256Cipher(Aes256::new(GenericArray::from_slice(key)))
        }
    }

    impl BlockCipher for Aes256Cipher {
        fn block_size(&self) -> usize {
            16
        }

        fn encrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]) {
            let mut block = *GenericArray::from_slice(input);
            self.0.encrypt_block(&mut block);
            output.copy_from_slice(block.as_slice());
        }
    }
}

#[cfg(feature = "soft-aes")]
pub use soft_aes::{Aes128Cipher, Aes256Cipher};
