//! FNV-1a 64-bit hashing.
//!
//! Used for run identity, the replay checksum, and the event-stream
//! verification hash. Not cryptographically secure: it guards against
//! corruption and drift, not against a motivated forger.
//!
//! The offset basis and prime are frozen. Changing either invalidates every
//! recorded replay and leaderboard entry.

/// FNV-1a offset basis for 64-bit.
pub const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
pub const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
pub fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Hash a byte slice from the offset basis.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |h, &b| fnv1a_byte(h, b))
}

/// Incremental FNV-1a hasher.
///
/// Multi-byte integers are fed little-endian; floats are fed through
/// `to_bits()` so that `-0.0` and `0.0` hash differently.
///
/// # Examples
///
/// ```
/// use cadence_core::Fnv1a;
///
/// let mut h = Fnv1a::new();
/// h.write(b"foobar");
/// assert_eq!(h.finish(), 0x85944171f73967e8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fnv1a {
    state: u64,
}

impl Fnv1a {
    /// A hasher at the offset basis.
    pub const fn new() -> Self {
        Self { state: FNV_OFFSET }
    }

    /// Feed raw bytes.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = fnv1a_byte(self.state, b);
        }
    }

    /// Feed one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.state = fnv1a_byte(self.state, v);
    }

    /// Feed a u16 as 2 LE bytes.
    pub fn write_u16(&mut self, v: u16) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a u32 as 4 LE bytes.
    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed an i32 as 4 LE bytes.
    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a u64 as 8 LE bytes.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Feed an f32 as the 4 LE bytes of its bit pattern.
    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    /// Current hash value.
    pub fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}
