//! LZW expansion.
//!
//! The decoder rebuilds the encoder's codebook by replaying the same
//! insert/evict/reset schedule one step behind the codes it reads, so a
//! code always resolves to the byte string the encoder had mapped to it at
//! the moment it was written. The one exception is the classical edge case
//! where a code is read in the very step that would have defined it; the
//! entry is then `prev ++ prev[0]`.

use crate::bits::BitReader;
use crate::codebook::CodeTable;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::policy::Policy;
use crate::track::{LfuTracker, LruTracker};

/// Expand a compressed stream (header plus codewords) back into the
/// original bytes.
pub fn expand(input: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(input);
    let header = Header::read(&mut reader)?;
    let mut decoder = Decoder::new(&header)?;
    decoder.run(&mut reader)?;
    Ok(decoder.output)
}

/// All mutable state of one expansion run.
struct Decoder {
    min_width: u32,
    max_width: u32,
    alphabet_len: u32,
    table: CodeTable,
    lru: Option<LruTracker<u32>>,
    lfu: Option<LfuTracker<u32>>,
    next_code: u64,
    max_code: u64,
    width: u32,
    threshold: u64,
    eof_code: u32,
    reset_code: Option<u32>,
    initial_next_code: u64,
    output: Vec<u8>,
}

impl Decoder {
    fn new(header: &Header) -> Result<Self> {
        if header.min_width < 1 || header.max_width < header.min_width || header.max_width > 32 {
            return Err(Error::InvalidDecode(format!(
                "Header widths out of range: minW={} maxW={}",
                header.min_width, header.max_width
            )));
        }

        let alphabet_len = header.symbols.len() as u32;
        let eof_code = alphabet_len;
        let (reset_code, initial_next_code) = if header.policy == Policy::Reset {
            (Some(alphabet_len + 1), u64::from(alphabet_len) + 2)
        } else {
            (None, u64::from(alphabet_len) + 1)
        };

        let max_code = 1u64 << header.max_width;
        if initial_next_code > max_code {
            return Err(Error::InvalidDecode(format!(
                "Alphabet of {} symbols does not fit {}-bit codes",
                alphabet_len, header.max_width
            )));
        }

        Ok(Decoder {
            min_width: header.min_width,
            max_width: header.max_width,
            alphabet_len,
            table: CodeTable::new(max_code as usize, &header.symbols),
            lru: (header.policy == Policy::Lru).then(LruTracker::new),
            lfu: (header.policy == Policy::Lfu).then(LfuTracker::new),
            next_code: initial_next_code,
            max_code,
            width: header.min_width,
            threshold: 1u64 << header.min_width,
            eof_code,
            reset_code,
            initial_next_code,
            output: Vec::new(),
        })
    }

    fn run(&mut self, reader: &mut BitReader<'_>) -> Result<()> {
        if !reader.has_more() {
            // Header-only stream: the encoder saw empty input.
            return Ok(());
        }

        let first = reader.read_bits(self.width)?;
        if first == self.eof_code {
            return Ok(());
        }
        if first >= self.alphabet_len {
            return Err(Error::InvalidDecode(format!(
                "Bad compressed code: {}",
                first
            )));
        }
        let mut prev = self.entry(first)?;
        self.output.extend_from_slice(&prev);

        loop {
            if !reader.has_more() {
                // A frozen dictionary can run to the end of input without a
                // terminator in sight once the stream is exhausted.
                break;
            }
            self.raise_width_if_due();
            let code = reader.read_bits(self.width)?;

            if code == self.eof_code {
                break;
            }

            if Some(code) == self.reset_code {
                match self.restart(reader)? {
                    Some(s) => {
                        prev = s;
                        continue;
                    }
                    None => break,
                }
            }

            let s = self.decode(code, &prev)?;
            self.output.extend_from_slice(&s);

            // Insert phase, mirroring the encoder's growth step.
            if self.next_code < self.max_code {
                if self.next_code == self.max_code - 1 {
                    self.evict_victim();
                }
                let mut entry = prev.clone();
                entry.push(s[0]);
                let new_code = self.next_code as u32;
                self.table.insert(new_code, entry.into_boxed_slice());
                if let Some(tracker) = &mut self.lru {
                    tracker.use_key(&new_code);
                }
                if let Some(tracker) = &mut self.lfu {
                    tracker.use_key(&new_code);
                }
                self.next_code += 1;
            }

            // Use-update for the code just consumed; alphabet codes and the
            // terminator are never tracked.
            if code >= self.alphabet_len + 1 {
                if let Some(tracker) = &mut self.lru {
                    tracker.use_key(&code);
                }
                if let Some(tracker) = &mut self.lfu {
                    tracker.use_key(&code);
                }
            }

            prev = s;
        }

        Ok(())
    }

    /// Handle a reset code: restore the initial table and read the first
    /// code of the fresh run. Returns the new `prev`, or `None` on EOF.
    fn restart(&mut self, reader: &mut BitReader<'_>) -> Result<Option<Vec<u8>>> {
        self.table.reset();
        self.next_code = self.initial_next_code;
        self.width = self.min_width;
        self.threshold = 1u64 << self.width;

        let code = reader.read_bits(self.width)?;
        if code == self.eof_code {
            return Ok(None);
        }
        let s = self.entry(code)?;
        self.output.extend_from_slice(&s);
        Ok(Some(s))
    }

    /// Resolve a code read from the stream against the current table.
    fn decode(&self, code: u32, prev: &[u8]) -> Result<Vec<u8>> {
        if u64::from(code) < self.next_code {
            if let Some(entry) = self.table.get(code) {
                return Ok(entry.to_vec());
            }
        } else if u64::from(code) == self.next_code {
            // The entry this code denotes is the one the encoder defined in
            // the step that emitted it: prev extended by its own first byte.
            let mut s = Vec::with_capacity(prev.len() + 1);
            s.extend_from_slice(prev);
            s.push(prev[0]);
            return Ok(s);
        }
        Err(Error::InvalidDecode(format!(
            "Bad compressed code: {}",
            code
        )))
    }

    /// A code that must already be present in the table.
    fn entry(&self, code: u32) -> Result<Vec<u8>> {
        self.table
            .get(code)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::InvalidDecode(format!("Bad compressed code: {}", code)))
    }

    #[inline]
    fn raise_width_if_due(&mut self) {
        if self.next_code >= self.threshold && self.width < self.max_width {
            self.width += 1;
            self.threshold = 1 << self.width;
        }
    }

    /// Clear the tracker's victim slot; the code itself is abandoned and
    /// the new entry lands at `next_code`.
    fn evict_victim(&mut self) {
        if let Some(tracker) = &mut self.lru {
            if let Some(victim) = tracker.find_lru().copied() {
                self.table.clear(victim);
                tracker.remove(&victim);
            }
        }
        if let Some(tracker) = &mut self.lfu {
            if let Some(victim) = tracker.find_lfu().copied() {
                self.table.clear(victim);
                tracker.remove(&victim);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::bits::BitWriter;
    use crate::encoder::{compress, CompressOptions};

    fn ab_alphabet() -> Alphabet {
        Alphabet::parse(b"a\nb\n")
    }

    fn options(min: u32, max: u32, policy: Policy) -> CompressOptions {
        CompressOptions {
            min_width: min,
            max_width: max,
            policy,
        }
    }

    /// Build a stream by hand: header followed by the given codes written
    /// at the decoder's expected widths (no width growth in these tests).
    fn stream_with_codes(policy: Policy, width: u32, codes: &[u32]) -> Vec<u8> {
        let mut writer = BitWriter::new();
        Header {
            min_width: width,
            max_width: width,
            policy,
            symbols: vec![b'\r', b'\n', b'a', b'b'],
        }
        .write(&mut writer);
        for &code in codes {
            writer.write_bits(code, width);
        }
        writer.finish()
    }

    #[test]
    fn test_header_only_stream_is_empty_output() {
        let stream = stream_with_codes(Policy::Freeze, 3, &[]);
        assert_eq!(expand(&stream).unwrap(), b"");
    }

    #[test]
    fn test_eof_first_is_empty_output() {
        let stream = stream_with_codes(Policy::Freeze, 3, &[4]);
        assert_eq!(expand(&stream).unwrap(), b"");
    }

    #[test]
    fn test_simple_codes() {
        let stream = stream_with_codes(Policy::Freeze, 3, &[2, 3, 5, 4]);
        assert_eq!(expand(&stream).unwrap(), b"abab");
    }

    #[test]
    fn test_self_referential_code() {
        // "aaa": emit 'a' then code 5 read in the step that defines it.
        let stream = stream_with_codes(Policy::Freeze, 3, &[2, 5, 4]);
        assert_eq!(expand(&stream).unwrap(), b"aaa");
    }

    #[test]
    fn test_non_alphabet_first_code_is_fatal() {
        let stream = stream_with_codes(Policy::Freeze, 3, &[5, 4]);
        let err = expand(&stream).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDecode("Bad compressed code: 5".into())
        );
    }

    #[test]
    fn test_code_beyond_next_code_is_fatal() {
        // next_code is 5 after the first code; 7 skips past the edge case.
        let stream = stream_with_codes(Policy::Freeze, 3, &[2, 7, 4]);
        let err = expand(&stream).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDecode("Bad compressed code: 7".into())
        );
    }

    #[test]
    fn test_truncated_stream_is_fatal() {
        let mut stream = stream_with_codes(Policy::Freeze, 9, &[2, 3]);
        // Chop into the middle of a codeword.
        stream.truncate(stream.len() - 1);
        assert!(expand(&stream).is_err());
    }

    #[test]
    fn test_garbage_header_is_fatal() {
        assert!(expand(&[3u8]).is_err());
        // minW of zero.
        assert!(expand(&[0u8, 3, 0, 0, 1, b'a']).is_err());
        // Alphabet too large for the code space.
        assert!(expand(&[3u8, 3, 0, 0, 9, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i']).is_err());
    }

    #[test]
    fn test_reset_restores_initial_table() {
        let alphabet = ab_alphabet();
        let stream = compress(b"aaaaaaaa", &alphabet, &options(3, 3, Policy::Reset)).unwrap();
        assert_eq!(expand(&stream).unwrap(), b"aaaaaaaa");
    }

    #[test]
    fn test_roundtrip_freeze() {
        let alphabet = ab_alphabet();
        let input = b"abababababab";
        let stream = compress(input, &alphabet, &options(3, 4, Policy::Freeze)).unwrap();
        assert_eq!(expand(&stream).unwrap(), input);
    }
}
