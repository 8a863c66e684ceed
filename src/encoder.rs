//! LZW compression with variable-width codewords.
//!
//! The encoder grows a prefix byte by byte until the codebook no longer
//! contains it, emits the code of the longest match, and registers the
//! extended prefix as a new entry. The codeword width `W` starts at `minW`
//! and is raised one bit at a time as code numbers cross `2^W`; what happens
//! once the codebook holds `2^maxW` entries is decided by the configured
//! [`Policy`].

use crate::alphabet::Alphabet;
use crate::bits::BitWriter;
use crate::codebook::PrefixTable;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::policy::Policy;
use crate::track::{LfuTracker, LruTracker};

/// Compression parameters.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Minimum codeword width in bits.
    pub min_width: u32,
    /// Maximum codeword width in bits; the codebook holds `2^max_width` codes.
    pub max_width: u32,
    /// Full-dictionary policy.
    pub policy: Policy,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            min_width: 9,
            max_width: 16,
            policy: Policy::Freeze,
        }
    }
}

impl CompressOptions {
    /// Reject width configurations that cannot produce a legible stream.
    ///
    /// Beyond the basic range checks, `2^minW` must cover the alphabet plus
    /// reserved codes: the very first codeword is written at `minW` bits
    /// while `nextCode` already sits past the reserved range, and every
    /// later width raise only keeps pace from there.
    pub fn validate(&self, alphabet: &Alphabet) -> Result<()> {
        alphabet.validate()?;
        if self.min_width < 1 {
            return Err(Error::MinWidthZero);
        }
        if self.max_width < self.min_width {
            return Err(Error::WidthOrder {
                min: self.min_width,
                max: self.max_width,
            });
        }
        if self.max_width > 32 {
            return Err(Error::MaxWidthOverflow(self.max_width));
        }
        let reserved = if self.policy == Policy::Reset { 2 } else { 1 };
        let required = alphabet.len() + reserved;
        if (1u64 << self.min_width) < required as u64 {
            return Err(Error::MinWidthTooSmall {
                min: self.min_width,
                required,
            });
        }
        Ok(())
    }
}

/// Compress `input` against `alphabet`, returning the packed stream
/// (header followed by codewords).
///
/// Every input byte must be an alphabet member. Empty input produces a
/// header with no codewords at all, not even the terminator.
pub fn compress(input: &[u8], alphabet: &Alphabet, options: &CompressOptions) -> Result<Vec<u8>> {
    options.validate(alphabet)?;
    let mut encoder = Encoder::new(alphabet, options);
    encoder.run(input)?;
    Ok(encoder.finish())
}

/// All mutable state of one compression run.
struct Encoder<'a> {
    alphabet: &'a Alphabet,
    policy: Policy,
    min_width: u32,
    max_width: u32,
    out: BitWriter,
    dictionary: PrefixTable,
    lru: Option<LruTracker<Vec<u8>>>,
    lfu: Option<LfuTracker<Vec<u8>>>,
    /// Next code number to assign; counts up to `max_code`.
    next_code: u64,
    /// Largest code count the configuration allows, `2^max_width`.
    max_code: u64,
    /// Current codeword width.
    width: u32,
    /// Cached `2^width`, updated only when the width changes.
    threshold: u64,
    eof_code: u32,
    reset_code: Option<u32>,
    /// Where `next_code` restarts after a dictionary reset.
    initial_next_code: u64,
}

impl<'a> Encoder<'a> {
    fn new(alphabet: &'a Alphabet, options: &CompressOptions) -> Self {
        let mut out = BitWriter::new();
        Header {
            min_width: options.min_width,
            max_width: options.max_width,
            policy: options.policy,
            symbols: alphabet.symbols().to_vec(),
        }
        .write(&mut out);

        let mut next_code = alphabet.len() as u64;
        let eof_code = next_code as u32;
        next_code += 1;
        let reset_code = if options.policy == Policy::Reset {
            let code = next_code as u32;
            next_code += 1;
            Some(code)
        } else {
            None
        };

        Encoder {
            alphabet,
            policy: options.policy,
            min_width: options.min_width,
            max_width: options.max_width,
            out,
            dictionary: PrefixTable::new(alphabet),
            lru: (options.policy == Policy::Lru).then(LruTracker::new),
            lfu: (options.policy == Policy::Lfu).then(LfuTracker::new),
            next_code,
            max_code: 1u64 << options.max_width,
            width: options.min_width,
            threshold: 1u64 << options.min_width,
            eof_code,
            reset_code,
            initial_next_code: next_code,
        }
    }

    fn run(&mut self, input: &[u8]) -> Result<()> {
        let (&first, rest) = match input.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };
        let mut current_code = self.require_member(first)?;

        // The in-flight prefix, extended and truncated in place; the
        // dictionary receives its own copy of each committed entry.
        let mut current: Vec<u8> = Vec::with_capacity(64);
        current.push(first);

        for &c in rest {
            let symbol_code = self.require_member(c)?;
            current.push(c);
            if let Some(code) = self.dictionary.get(&current) {
                current_code = code;
                continue;
            }

            // Longest match exhausted: emit it, then grow the codebook with
            // the rejected extension.
            current.pop();
            self.write_code(current_code);
            self.note_use(&current);
            current.push(c);
            self.grow(&current);

            current.clear();
            current.push(c);
            current_code = symbol_code;
        }

        self.write_code(current_code);
        self.note_use(&current);

        self.raise_width_if_due();
        self.write_code(self.eof_code);
        Ok(())
    }

    fn finish(self) -> Vec<u8> {
        self.out.finish()
    }

    fn require_member(&self, byte: u8) -> Result<u32> {
        self.alphabet
            .index_of(byte)
            .ok_or(Error::ByteNotInAlphabet(byte))
    }

    #[inline]
    fn write_code(&mut self, code: u32) {
        self.out.write_bits(code, self.width);
    }

    /// Record a use of an emitted prefix, but only if the trackers already
    /// know it: alphabet entries are never tracked and never evicted.
    fn note_use(&mut self, key: &Vec<u8>) {
        if let Some(tracker) = &mut self.lru {
            if tracker.contains(key) {
                tracker.use_key(key);
            }
        }
        if let Some(tracker) = &mut self.lfu {
            if tracker.contains(key) {
                tracker.use_key(key);
            }
        }
    }

    #[inline]
    fn raise_width_if_due(&mut self) {
        if self.next_code >= self.threshold && self.width < self.max_width {
            self.width += 1;
            self.threshold = 1 << self.width;
        }
    }

    /// The growth step after each emitted code: widen if the next code
    /// crosses the current threshold, then insert `next` — evicting first
    /// when an lru/lfu codebook is about to fill — or apply the configured
    /// full-table policy.
    fn grow(&mut self, next: &[u8]) {
        if self.next_code < self.max_code {
            self.raise_width_if_due();

            if self.next_code == self.max_code - 1 {
                self.evict_victim();
            }

            let key = next.to_vec();
            self.dictionary.insert(next.into(), self.next_code as u32);
            if let Some(tracker) = &mut self.lru {
                tracker.use_key(&key);
            }
            if let Some(tracker) = &mut self.lfu {
                tracker.use_key(&key);
            }
            self.next_code += 1;
        } else if self.policy == Policy::Reset {
            self.raise_width_if_due();
            if let Some(reset_code) = self.reset_code {
                self.write_code(reset_code);
            }
            self.dictionary.reset(self.alphabet);
            self.next_code = self.initial_next_code;
            self.width = self.min_width;
            self.threshold = 1 << self.width;
        }
        // Freeze: nothing to do. Lru/lfu also have no full-branch action:
        // their one eviction fires at the max_code - 1 insert above, after
        // which next_code sits at max_code and the table stays frozen.
    }

    /// Drop the tracker's victim from dictionary and tracker alike. The
    /// victim's code is abandoned; the caller inserts the new entry at
    /// `next_code` as usual.
    fn evict_victim(&mut self) {
        if let Some(tracker) = &mut self.lru {
            if let Some(victim) = tracker.find_lru().cloned() {
                self.dictionary.remove(&victim);
                tracker.remove(&victim);
            }
        }
        if let Some(tracker) = &mut self.lfu {
            if let Some(victim) = tracker.find_lfu().cloned() {
                self.dictionary.remove(&victim);
                tracker.remove(&victim);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitReader;

    fn ab_alphabet() -> Alphabet {
        // [CR, LF, 'a', 'b']; EOF_CODE = 4
        Alphabet::parse(b"a\nb\n")
    }

    fn options(min: u32, max: u32, policy: Policy) -> CompressOptions {
        CompressOptions {
            min_width: min,
            max_width: max,
            policy,
        }
    }

    /// Read the codewords back out of a compressed stream, applying the
    /// decoder's width schedule.
    fn read_codes(stream: &[u8], alphabet_len: u64, policy: Policy) -> Vec<u32> {
        let mut reader = BitReader::new(stream);
        let header = Header::read(&mut reader).unwrap();
        assert_eq!(header.symbols.len() as u64, alphabet_len);
        let reserved = if policy == Policy::Reset { 2 } else { 1 };
        let eof = alphabet_len as u32;
        let reset = alphabet_len as u32 + 1;
        let mut next_code = alphabet_len + reserved;
        let mut width = header.min_width;
        let mut threshold = 1u64 << width;
        let max_code = 1u64 << header.max_width;

        let mut codes = Vec::new();
        if !reader.has_more() {
            return codes;
        }
        let mut code = reader.read_bits(width).unwrap();
        codes.push(code);
        if code == eof {
            return codes;
        }
        loop {
            if next_code >= threshold && width < header.max_width {
                width += 1;
                threshold = 1 << width;
            }
            code = reader.read_bits(width).unwrap();
            codes.push(code);
            if code == eof {
                return codes;
            }
            if policy == Policy::Reset && code == reset {
                next_code = alphabet_len + reserved;
                width = header.min_width;
                threshold = 1 << width;
                code = reader.read_bits(width).unwrap();
                codes.push(code);
                if code == eof {
                    return codes;
                }
                continue;
            }
            if next_code < max_code {
                next_code += 1;
            }
        }
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let alphabet = ab_alphabet();
        let stream = compress(b"", &alphabet, &options(3, 3, Policy::Freeze)).unwrap();
        // 5 fixed header bytes + 4 alphabet bytes, no codewords, no EOF.
        assert_eq!(stream.len(), 9);
    }

    #[test]
    fn test_single_byte_emits_code_and_eof() {
        let alphabet = ab_alphabet();
        let stream = compress(b"a", &alphabet, &options(3, 3, Policy::Freeze)).unwrap();
        let codes = read_codes(&stream, 4, Policy::Freeze);
        assert_eq!(codes, vec![2, 4]);
    }

    #[test]
    fn test_repeated_pair_reuses_entry() {
        let alphabet = ab_alphabet();
        let stream = compress(b"abab", &alphabet, &options(3, 4, Policy::Freeze)).unwrap();
        // "a", "b" emitted singly; "ab" was registered as code 5 on the
        // first emit and matches the second pair.
        let codes = read_codes(&stream, 4, Policy::Freeze);
        assert_eq!(codes, vec![2, 3, 5, 4]);
    }

    #[test]
    fn test_out_of_alphabet_byte_is_fatal() {
        let alphabet = ab_alphabet();
        let err = compress(b"az", &alphabet, &options(3, 4, Policy::Freeze)).unwrap_err();
        assert_eq!(err, Error::ByteNotInAlphabet(b'z'));
        let err = compress(b"z", &alphabet, &options(3, 4, Policy::Freeze)).unwrap_err();
        assert_eq!(err, Error::ByteNotInAlphabet(b'z'));
    }

    #[test]
    fn test_width_grows_with_code_numbers() {
        let alphabet = ab_alphabet();
        // minW 3 covers codes 0..7; the third insertion brings next_code
        // to the 3-bit ceiling and the stream must widen to 4 bits.
        let stream = compress(b"abababab", &alphabet, &options(3, 5, Policy::Freeze)).unwrap();
        let codes = read_codes(&stream, 4, Policy::Freeze);
        assert_eq!(*codes.last().unwrap(), 4);
        // All codes legible at 5 bits.
        assert!(codes.iter().all(|&c| c < 32));
    }

    #[test]
    fn test_reset_policy_emits_reset_code() {
        let alphabet = ab_alphabet();
        // Codebook of 8 with initialNextCode 6 fills after two insertions.
        let stream = compress(b"aaaaaaaa", &alphabet, &options(3, 3, Policy::Reset)).unwrap();
        let codes = read_codes(&stream, 4, Policy::Reset);
        assert!(codes.contains(&5), "no RESET_CODE in {:?}", codes);
        assert_eq!(*codes.last().unwrap(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_widths() {
        let alphabet = ab_alphabet();
        assert_eq!(
            options(0, 4, Policy::Freeze).validate(&alphabet),
            Err(Error::MinWidthZero)
        );
        assert_eq!(
            options(5, 4, Policy::Freeze).validate(&alphabet),
            Err(Error::WidthOrder { min: 5, max: 4 })
        );
        assert_eq!(
            options(9, 33, Policy::Freeze).validate(&alphabet),
            Err(Error::MaxWidthOverflow(33))
        );
        // 2^2 = 4 cannot hold 4 alphabet codes plus EOF.
        assert_eq!(
            options(2, 4, Policy::Freeze).validate(&alphabet),
            Err(Error::MinWidthTooSmall { min: 2, required: 5 })
        );
        // Reset reserves one more code than freeze.
        assert!(options(3, 4, Policy::Freeze).validate(&alphabet).is_ok());
        assert!(options(3, 4, Policy::Reset).validate(&alphabet).is_ok());
        assert_eq!(
            options(2, 4, Policy::Reset).validate(&alphabet),
            Err(Error::MinWidthTooSmall { min: 2, required: 6 })
        );
    }

    #[test]
    fn test_default_options() {
        let options = CompressOptions::default();
        assert_eq!(options.min_width, 9);
        assert_eq!(options.max_width, 16);
        assert_eq!(options.policy, Policy::Freeze);
    }
}
