//! Full-dictionary policies.

use std::fmt;

/// What happens when the codebook reaches its maximum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Stop inserting; the dictionary stays as it is.
    #[default]
    Freeze,
    /// Emit a reset code, clear the dictionary, and start over at `minW`.
    Reset,
    /// Evict the least-recently-used non-alphabet entry.
    Lru,
    /// Evict the least-frequently-used non-alphabet entry.
    Lfu,
}

impl Policy {
    /// Parse a policy name. Unknown names fall back to `Freeze` without error.
    pub fn from_name(name: &str) -> Policy {
        match name {
            "reset" => Policy::Reset,
            "lru" => Policy::Lru,
            "lfu" => Policy::Lfu,
            _ => Policy::Freeze,
        }
    }

    /// The byte stored in the stream header.
    pub fn code(self) -> u32 {
        match self {
            Policy::Freeze => 0,
            Policy::Reset => 1,
            Policy::Lru => 2,
            Policy::Lfu => 3,
        }
    }

    /// Decode a header byte. Unknown values fall back to `Freeze`, mirroring
    /// the encoder-side name fallback.
    pub fn from_code(code: u32) -> Policy {
        match code {
            1 => Policy::Reset,
            2 => Policy::Lru,
            3 => Policy::Lfu,
            _ => Policy::Freeze,
        }
    }

    /// The canonical policy name.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Freeze => "freeze",
            Policy::Reset => "reset",
            Policy::Lru => "lru",
            Policy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
