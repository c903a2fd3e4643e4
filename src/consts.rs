/// Number of letters on every wheel, plugboard and message.
pub const ALPHABET_SIZE: usize = 26;

/// Bit pattern with one bit set per letter of the alphabet.
pub const FULL_MASK_BITS: u32 = (1 << ALPHABET_SIZE) - 1;

/// Largest n-gram order a table or frequency measure accepts (26^4 cells).
pub const MAX_NGRAM_ORDER: usize = 4;

/// Unseen n-grams score this many times less likely than the rarest seen one.
pub const NGRAM_FLOOR_DIVISOR: f64 = 10.0;

/// Number of plaintext letters kept as the preview of a hold entry.
pub const PREVIEW_LEN: usize = 48;

/// Keys a worker scores between two progress publications.
pub const DEFAULT_BATCH_SIZE: u64 = 64;

/// Default capacity of the result hold.
pub const DEFAULT_HOLD_SIZE: usize = 10;

/// Default number of plugs after which removals and the late measure kick in.
pub const DEFAULT_MIN_PLUGS: usize = 4;

/// Physical cable count of a service machine.
pub const DEFAULT_MAX_PLUGS: usize = 10;
