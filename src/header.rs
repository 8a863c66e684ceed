//! The fixed header that precedes the code stream.
//!
//! Layout, bit-packed big-endian with no alignment between fields:
//! minW (8) | maxW (8) | policy (8) | alphabetSize (16) | alphabet bytes (8 each).

use crate::bits::{BitReader, BitWriter};
use crate::error::Result;
use crate::policy::Policy;

/// Everything the decoder needs to rebuild the encoder's initial codebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Minimum codeword width.
    pub min_width: u32,
    /// Maximum codeword width.
    pub max_width: u32,
    /// Full-dictionary policy.
    pub policy: Policy,
    /// Alphabet bytes in code order.
    pub symbols: Vec<u8>,
}

impl Header {
    /// Serialize the header into the bit stream.
    pub fn write(&self, out: &mut BitWriter) {
        out.write_bits(self.min_width, 8);
        out.write_bits(self.max_width, 8);
        out.write_bits(self.policy.code(), 8);
        out.write_bits(self.symbols.len() as u32, 16);
        for &symbol in &self.symbols {
            out.write_bits(u32::from(symbol), 8);
        }
    }

    /// Parse a header from the start of the bit stream.
    pub fn read(input: &mut BitReader<'_>) -> Result<Header> {
        let min_width = input.read_bits(8)?;
        let max_width = input.read_bits(8)?;
        let policy = Policy::from_code(input.read_bits(8)?);
        let alphabet_size = input.read_bits(16)? as usize;
        let mut symbols = Vec::with_capacity(alphabet_size);
        for _ in 0..alphabet_size {
            symbols.push(input.read_bits(8)? as u8);
        }
        Ok(Header {
            min_width,
            max_width,
            policy,
            symbols,
        })
    }
}
