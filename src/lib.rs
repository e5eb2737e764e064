//! A streaming [GCM]-like authenticated-encryption core that
//! deliberately decouples decryption from authentication, and that
//! derives its counter from a 16-byte nonce via GHASH instead of the
//! standard 12-byte nonce from [NIST SP 800-38D].
//!
//! [GCM]: https://en.wikipedia.org/wiki/Galois/Counter_Mode
//! [NIST SP 800-38D]: https://nvlpubs.nist.gov/nistpubs/legacy/sp/nistspecialpublication800-38d.pdf
//!
//! # This is not a general-purpose AEAD
//!
//! [`Session<C, Decrypter>::decrypt`] returns plaintext unconditionally
//! — before, or entirely without, checking the authentication tag.
//! That is unsafe for almost every use case; it exists solely to
//! interoperate with legacy peers that expect incremental plaintext
//! delivery and out-of-band or deferred tag checking. If you need an
//! AEAD, use one that actually checks the tag before returning
//! anything.
//!
//! Call [`Session<C, Decrypter>::verify`] yourself, and treat any
//! plaintext you've already released as provisional until it returns
//! `Ok`.
//!
//! [`Session<C, Decrypter>::decrypt`]: Session::decrypt
//! [`Session<C, Decrypter>::verify`]: Session::verify
//!
//! # The nonce is 16 bytes, not 12
//!
//! This core only supports the non-standard 16-byte nonce path: the
//! initial counter block is derived by GHASHing the nonce (see
//! [`Session::new_encrypter`]), not the standard J0 construction for
//! 12-byte nonces. A nonce of any other length is a programmer error
//! and panics.
//!
//! # Example
//!
//! ```
//! use gcm_unchecked::{Aes128Cipher, Session};
//!
//! let key = [0x42; 16];
//! let nonce = [0x24; gcm_unchecked::NONCE_LEN];
//! let cipher = Aes128Cipher::new(&key);
//!
//! let mut ciphertext = Vec::new();
//! let mut enc = Session::new_encrypter(&cipher, &nonce, b"header");
//! enc.encrypt(&mut ciphertext, b"hello");
//! let tag = enc.tag();
//!
//! let mut plaintext = Vec::new();
//! let mut dec = Session::new_decrypter(&cipher, &nonce, b"header");
//! dec.decrypt(&mut plaintext, &ciphertext);
//! assert!(dec.verify(&tag).is_ok());
//! assert_eq!(plaintext, b"hello");
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod cipher;
mod ctr;
mod field;
mod ghash;
mod session;
mod util;

pub use cipher::BlockCipher;
#[cfg(feature = "soft-aes")]
pub use cipher::{Aes128Cipher, Aes256Cipher};
pub use session::{AuthFailure, Decrypter, Encrypter, Role, Session, NONCE_LEN, TAG_LEN};
