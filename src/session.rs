//! The session state machine: the streaming encrypt/decrypt/tag/verify
//! surface built on [`crate::field`], [`crate::ghash`], and [`crate::ctr`].
//!
//! # Security
//!
//! [`Session<Decrypter, _>::decrypt`] returns plaintext unconditionally,
//! before (or without ever) checking the authentication tag. This core
//! exists to interoperate with legacy peers that expect incremental
//! plaintext delivery; it is not a general-purpose AEAD. Always call
//! [`Session<Decrypter, _>::verify`] and reject the plaintext you
//! already handed out if it fails, unless your protocol has its own
//! out-of-band integrity check.

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::Range;

use crate::cipher::BlockCipher;
use crate::ctr::{self, Keystream};
use crate::field::FieldElement;
use crate::field::GcmTable;
use crate::ghash;
use crate::util;

/// This core's nonce length.
pub const NONCE_LEN: usize = ctr::NONCE_LEN;
/// The authentication tag length.
pub const TAG_LEN: usize = 16;

/// Returned by [`Session<Decrypter, _>::verify`] when the candidate tag
/// is the wrong length or does not match. The only recoverable,
/// caller-visible error this core produces — misuse (bad nonce length,
/// aliased buffers) panics instead, since it can't be locally repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthFailure;

impl core::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("GCM authentication tag mismatch")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AuthFailure {}

mod sealed {
    pub trait Sealed {}
}

/// Marks which side of the plaintext/ciphertext GHASH asymmetry a
/// [`Session`] is on. Sealed: the only implementors are [`Encrypter`]
/// and [`Decrypter`], so a session's role can never be confused at the
/// type level — mixing roles on one session is forbidden, and this
/// makes the two constructors return distinct, non-interchangeable
/// types rather than relying on a runtime check.
pub trait Role: sealed::Sealed {}

/// Marker type for an encrypting session.
#[derive(Debug)]
pub enum Encrypter {}
impl sealed::Sealed for Encrypter {}
impl Role for Encrypter {}

/// Marker type for a decrypting session.
#[derive(Debug)]
pub enum Decrypter {}
impl sealed::Sealed for Decrypter {}
impl Role for Decrypter {}

/// A streaming GCM-variant session.
///
/// Construct with [`Session::new_encrypter`] or [`Session::new_decrypter`].
/// Feed data in arbitrary chunks through `encrypt`/`decrypt`; call `tag`
/// (and, for decrypters, `verify`) any number of times afterward. There
/// is no explicit teardown and no resumable serialization — a session
/// is single-threaded and single-use per `(key, nonce)` pair.
pub struct Session<'c, C: BlockCipher, R: Role> {
    cipher: &'c C,
    table: GcmTable,
    ghash: FieldElement,
    keystream: Keystream,
    tag_mask: [u8; TAG_LEN],
    aad_len: u64,
    data_len: u64,
    _role: PhantomData<R>,
}

impl<'c, C: BlockCipher, R: Role> Session<'c, C, R> {
    fn construct(cipher: &'c C, nonce: &[u8], aad: &[u8]) -> Self {
        assert_eq!(
            cipher.block_size(),
            16,
            "gcm-unchecked: block cipher must have a 16-byte block size"
        );
        assert_eq!(
            nonce.len(),
            NONCE_LEN,
            "gcm-unchecked: nonce must be exactly {} bytes, got {}",
            NONCE_LEN,
            nonce.len()
        );

        let h = {
            let zero = [0u8; 16];
            let mut out = [0u8; 16];
            cipher.encrypt_block(&zero, &mut out);
            FieldElement::from_block(&out)
        };
        let table = GcmTable::new(h);

        let mut ghash = FieldElement::ZERO;
        ghash::update(&table, &mut ghash, aad);

        let counter = ctr::derive_counter(&table, nonce);
        let mut tag_mask = [0u8; TAG_LEN];
        cipher.encrypt_block(&counter, &mut tag_mask);

        let mut keystream = Keystream::new(counter);
        keystream.skip_to_next_block();

        Session {
            cipher,
            table,
            ghash,
            keystream,
            tag_mask,
            aad_len: aad.len() as u64,
            data_len: 0,
            _role: PhantomData,
        }
    }

    /// Computes the authentication tag over everything absorbed so far
    /// (AAD, then data, then the length block). Does not mutate
    /// visible session state and may be called any number of times —
    /// the field element is `Copy`, so the length-block XOR and final
    /// multiply happen on a throwaway copy, leaving `self.ghash` intact.
    pub fn tag(&self) -> [u8; TAG_LEN] {
        let mut ghash = self.ghash;
        ghash.low ^= self.aad_len * 8;
        ghash.high ^= self.data_len * 8;
        self.table.mul(&mut ghash);

        let mut block = ghash.to_block();
        util::xor_bytes(&mut block, &self.tag_mask);
        block
    }
}

impl<'c, C: BlockCipher, R: Role> core::fmt::Debug for Session<'c, C, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("aad_len", &self.aad_len)
            .field("data_len", &self.data_len)
            .finish_non_exhaustive()
    }
}

impl<'c, C: BlockCipher, R: Role> Drop for Session<'c, C, R> {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.tag_mask.zeroize();
        self.ghash.low.zeroize();
        self.ghash.high.zeroize();
        for elem in self.table.product_table_mut() {
            elem.low.zeroize();
            elem.high.zeroize();
        }
        self.keystream.zeroize();
    }
}

impl<'c, C: BlockCipher> Session<'c, C, Encrypter> {
    /// Starts an encrypting session. `nonce` must be exactly
    /// [`NONCE_LEN`] bytes; a nonce of any other length is a
    /// programmer error and panics.
    pub fn new_encrypter(cipher: &'c C, nonce: &[u8], aad: &[u8]) -> Self {
        Self::construct(cipher, nonce, aad)
    }

    /// Encrypts `plaintext`, appending the ciphertext to `dst` per the
    /// append contract (see [`append`]), and returns the newly written
    /// ciphertext slice. GHASHes the *plaintext* bytes (not the
    /// ciphertext) — a deliberate deviation from standard GCM; see the
    /// crate-level docs.
    pub fn encrypt<'d>(&mut self, dst: &'d mut Vec<u8>, plaintext: &[u8]) -> &'d mut [u8] {
        let range = append(dst, plaintext);
        ghash::update(&self.table, &mut self.ghash, plaintext);
        self.data_len += plaintext.len() as u64;
        self.keystream.apply(self.cipher, &mut dst[range.clone()]);
        &mut dst[range]
    }
}

impl<'c, C: BlockCipher> Session<'c, C, Decrypter> {
    /// Starts a decrypting session. Same nonce-length requirement as
    /// [`Session::new_encrypter`].
    pub fn new_decrypter(cipher: &'c C, nonce: &[u8], aad: &[u8]) -> Self {
        Self::construct(cipher, nonce, aad)
    }

    /// Decrypts `ciphertext`, appending the plaintext to `dst`, and
    /// returns the newly written plaintext slice **unconditionally** —
    /// no authentication is performed here. GHASHes the ciphertext
    /// bytes (matching standard GCM for the decrypt direction).
    ///
    /// Call [`Session::verify`] to check the tag. This method will
    /// happily hand back plaintext decrypted under a tampered
    /// ciphertext; that is the entire point of this core and the
    /// reason it must not be mistaken for a safe AEAD.
    pub fn decrypt<'d>(&mut self, dst: &'d mut Vec<u8>, ciphertext: &[u8]) -> &'d mut [u8] {
        let range = append(dst, ciphertext);
        ghash::update(&self.table, &mut self.ghash, ciphertext);
        self.data_len += ciphertext.len() as u64;
        self.keystream.apply(self.cipher, &mut dst[range.clone()]);
        &mut dst[range]
    }

    /// Checks `candidate` against [`Session::tag`] in constant time.
    /// Returns [`AuthFailure`] if the length is wrong or the tags
    /// don't match; no other observable state is disturbed either way.
    pub fn verify(&self, candidate: &[u8]) -> Result<(), AuthFailure> {
        if candidate.len() != TAG_LEN {
            return Err(AuthFailure);
        }
        let expected = self.tag();
        if util::ct_eq(&expected, candidate) {
            Ok(())
        } else {
            Err(AuthFailure)
        }
    }
}

/// Appends `data` to `dst`, growing in place when `dst`'s spare
/// capacity covers it; otherwise a fresh buffer is allocated, `dst`'s
/// existing bytes are copied over, and `data` is appended. Returns the
/// range of the newly written region.
///
/// Also implements the aliasing rule: the output region (where `data`
/// lands once appended) may start at the same address as `data` itself
/// (exact aliasing — the caller has already placed the bytes there,
/// typically via `unsafe` access to `dst`'s spare capacity, for a
/// zero-copy in-place transform) but may not otherwise overlap it.
/// Inexact overlap is a programmer error and panics, since copying
/// between partially-overlapping regions has no well-defined meaning
/// here and would silently corrupt data instead.
fn append(dst: &mut Vec<u8>, data: &[u8]) -> Range<usize> {
    let old_len = dst.len();
    let data_len = data.len();
    let grows_in_place = dst.capacity() - dst.len() >= data_len;

    if grows_in_place && data_len > 0 {
        let output_ptr = unsafe { dst.as_ptr().add(old_len) };
        let data_ptr = data.as_ptr();

        if core::ptr::eq(output_ptr, data_ptr) {
            // Exact alias: the caller already placed `data` at this
            // address. Nothing to copy — just account for it.
            unsafe { dst.set_len(old_len + data_len) };
            return old_len..old_len + data_len;
        }

        let out_start = output_ptr as usize;
        let out_end = out_start + data_len;
        let data_start = data_ptr as usize;
        let data_end = data_start + data_len;
        if out_start < data_end && data_start < out_end {
            panic!("gcm-unchecked: output region inexactly overlaps the input region");
        }
    }

    if grows_in_place {
        dst.extend_from_slice(data);
    } else {
        let mut fresh = Vec::with_capacity(old_len + data_len);
        fresh.extend_from_slice(dst);
        fresh.extend_from_slice(data);
        *dst = fresh;
    }

    old_len..old_len + data_len
}
