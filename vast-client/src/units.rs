//! Size conversions for quota limits, which the API takes in bytes.

pub const GIB: u64 = 1_073_741_824;
pub const GB: u64 = 1_000_000_000;

/// `None` when the byte count does not fit in a `u64`.
pub fn gib_to_bytes(gib: u64) -> Option<u64> {
    GIB.checked_mul(gib)
}

/// `None` when the byte count does not fit in a `u64`.
pub fn gb_to_bytes(gb: u64) -> Option<u64> {
    GB.checked_mul(gb)
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / GIB as f64
}
