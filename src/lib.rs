//! # lzwc
//!
//! LZW compression with variable-width codewords and policy-driven
//! dictionary management.
//!
//! The codec works over an explicit byte [`Alphabet`] and packs codewords
//! MSB-first at a width that grows from `minW` to `maxW` bits as the
//! codebook fills. When the codebook reaches `2^maxW` entries, one of four
//! [`Policy`] choices takes over: freeze it, reset it, or evict the
//! least-recently / least-frequently used entry.
//!
//! ## Example
//!
//! ```rust
//! use lzwc::{compress, expand, Alphabet, CompressOptions, Policy};
//!
//! let alphabet = Alphabet::parse(b"a\nb\n");
//! let options = CompressOptions {
//!     min_width: 3,
//!     max_width: 4,
//!     policy: Policy::Lru,
//! };
//! let packed = compress(b"abab", &alphabet, &options).unwrap();
//! assert_eq!(expand(&packed).unwrap(), b"abab");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alphabet;
pub mod bits;
pub mod codebook;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod policy;
pub mod track;

pub use alphabet::Alphabet;
pub use decoder::expand;
pub use encoder::{compress, CompressOptions};
pub use error::{Error, Result};
pub use policy::Policy;
