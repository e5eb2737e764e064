//! The CTR-mode keystream: a shared counter block with a 32-bit
//! big-endian tail, plus the leftover-keystream buffer that lets
//! `encrypt`/`decrypt` calls land on arbitrary chunk boundaries.

use crate::cipher::BlockCipher;
use crate::field::{FieldElement, GcmTable};
use crate::ghash;
use crate::util;

/// This core's nonce length — 16 bytes, not the standard 12.
pub const NONCE_LEN: usize = 16;

/// Derives the initial counter block (`J0`) from a 16-byte nonce via
/// GHASH, since the standard 12-byte J0 construction doesn't apply
/// here. The nonce's bit length is XORed into the *high* half before
/// the final multiply — the non-standard half, as documented at the
/// crate level.
pub(crate) fn derive_counter(table: &GcmTable, nonce: &[u8]) -> [u8; 16] {
    let mut y = FieldElement::ZERO;
    ghash::update(table, &mut y, nonce);
    y.high ^= (nonce.len() as u64) * 8;
    table.mul(&mut y);
    y.to_block()
}

fn increment_tail(counter: &mut [u8; 16]) {
    let tail = u32::from_be_bytes(counter[12..16].try_into().unwrap());
    counter[12..16].copy_from_slice(&tail.wrapping_add(1).to_be_bytes());
}

/// 0 to 15 bytes of unused keystream left over from the most recently
/// produced block.
#[derive(Default)]
struct ExtraMask {
    bytes: [u8; 16],
    len: usize,
}

impl ExtraMask {
    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.bytes.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Stashes the unused suffix `mask[used..]` for the next call.
    fn fill(&mut self, mask: &[u8; 16], used: usize) {
        let remaining = 16 - used;
        self.bytes[..remaining].copy_from_slice(&mask[used..]);
        self.len = remaining;
    }

    fn zeroize(&mut self) {
        use zeroize::Zeroize;
        self.bytes.zeroize();
        self.len = 0;
    }
}

/// The CTR-mode keystream generator, shared across all
/// `encrypt`/`decrypt` calls of a single session.
pub(crate) struct Keystream {
    counter: [u8; 16],
    extra: ExtraMask,
}

impl Keystream {
    pub fn new(counter: [u8; 16]) -> Self {
        Keystream { counter, extra: ExtraMask::default() }
    }

    /// Advances the counter's 32-bit tail by one, without producing a
    /// keystream block. Used once at construction time to move past
    /// `J0` (which was consumed only to derive `tag_mask`).
    pub fn skip_to_next_block(&mut self) {
        increment_tail(&mut self.counter);
    }

    /// XORs a keystream derived from `cipher` into `buf` in place,
    /// consuming any leftover keystream from the previous call first
    /// and advancing the shared counter as needed. Chunk boundaries
    /// that don't align to 16 bytes leave a remainder in `self.extra`
    /// for the next call.
    pub fn apply<C: BlockCipher + ?Sized>(&mut self, cipher: &C, buf: &mut [u8]) {
        let mut buf = buf;

        if self.extra.len > 0 {
            let n = core::cmp::min(self.extra.len, buf.len());
            util::xor_bytes(&mut buf[..n], &self.extra.bytes[..n]);
            self.extra.consume(n);
            buf = &mut buf[n..];
        }

        while !buf.is_empty() {
            let mut mask = [0u8; 16];
            cipher.encrypt_block(&self.counter, &mut mask);
            increment_tail(&mut self.counter);

            let n = core::cmp::min(16, buf.len());
            util::xor_bytes(&mut buf[..n], &mask[..n]);
            if n < 16 {
                self.extra.fill(&mask, n);
            }

            buf = &mut buf[n..];
        }
    }

    pub fn zeroize(&mut self) {
        use zeroize::Zeroize;
        self.counter.zeroize();
        self.extra.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::BlockCipher;

    /// XORs the counter bytes onto themselves shifted by one — not a
    /// real cipher, just deterministic and cheap, for exercising the
    /// keystream/leftover-buffer bookkeeping independent of any real
    /// block cipher.
    struct ToyCipher;
    impl BlockCipher for ToyCipher {
        fn block_size(&self) -> usize {
            16
        }
        fn encrypt_block(&self, input: &[u8; 16], output: &mut [u8; 16]) {
            for i in 0..16 {
                output[i] = input[i].wrapping_add(1);
            }
        }
    }

    #[test]
    fn chunking_does_not_change_output() {
        let cipher = ToyCipher;
        let plaintext = [7u8; 37]; // not a multiple of 16

        let mut whole = plaintext;
        let mut ks = Keystream::new([0u8; 16]);
        ks.apply(&cipher, &mut whole);

        let mut chunked = plaintext;
        let mut ks2 = Keystream::new([0u8; 16]);
        ks2.apply(&cipher, &mut chunked[0..4]);
        ks2.apply(&cipher, &mut chunked[4..20]);
        ks2.apply(&cipher, &mut chunked[20..21]);
        ks2.apply(&cipher, &mut chunked[21..37]);

        assert_eq!(whole, chunked);
    }

    #[test]
    fn xor_is_its_own_inverse() {
        let cipher = ToyCipher;
        let plaintext = [42u8; 50];

        let mut buf = plaintext;
        let mut enc = Keystream::new([9u8; 16]);
        enc.apply(&cipher, &mut buf);
        assert_ne!(buf, plaintext);

        let mut dec = Keystream::new([9u8; 16]);
        dec.apply(&cipher, &mut buf);
        assert_eq!(buf, plaintext);
    }

    #[test]
    fn tail_wraps_silently() {
        let mut counter = [0u8; 16];
        counter[12..16].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        increment_tail(&mut counter);
        assert_eq!(&counter[12..16], &[0, 0, 0, 0]);
    }
}
