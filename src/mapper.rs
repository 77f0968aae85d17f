//! Byte-to-number conversion.
//!
//! These mappings are recomputed bit-for-bit by external verifiers, so the arithmetic here is
//! fixed: four bytes per float, most significant first, and a linear (biased) int scaling.

/// Bytes consumed per float.
pub const BYTES_PER_FLOAT: usize = 4;

/// `Σ b_i / 256^(i+1)`, a value in `[0, 1)`.
pub fn bytes_to_float(bytes: [u8; BYTES_PER_FLOAT]) -> f64 {
    let mut result = 0.0;
    let mut divider = 1.0;
    for byte in bytes {
        divider *= 256.0;
        result += f64::from(byte) / divider;
    }
    result
}

/// `floor(min + value * max)`: an integer in `[min, min + max)`.
///
/// Not rejection-sampled; small ranges carry a slight bias that verifiers reproduce.
pub fn float_to_int(value: f64, max: u64, min: i64) -> i64 {
    (min as f64 + value * max as f64).floor() as i64
}

/// Adapter turning any byte iterator into an infinite float iterator.
#[derive(Debug, Clone)]
pub struct FloatStream<I> {
    bytes: I,
}

impl<I: Iterator<Item = u8>> FloatStream<I> {
    pub fn new(bytes: I) -> Self {
        Self { bytes }
    }

    pub fn into_inner(self) -> I {
        self.bytes
    }
}

impl<I: Iterator<Item = u8>> Iterator for FloatStream<I> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let mut chunk = [0u8; BYTES_PER_FLOAT];
        for slot in chunk.iter_mut() {
            *slot = self.bytes.next()?;
        }
        Some(bytes_to_float(chunk))
    }
}

/// Pull `count` floats from `bytes`.
pub fn floats<I: Iterator<Item = u8>>(bytes: &mut I, count: usize) -> Vec<f64> {
    FloatStream::new(bytes).take(count).collect()
}

/// Pull `count` ints in `[min, min + max)` from `bytes`.
pub fn ints<I: Iterator<Item = u8>>(bytes: &mut I, count: usize, max: u64, min: i64) -> Vec<i64> {
    FloatStream::new(bytes)
        .take(count)
        .map(|value| float_to_int(value, max, min))
        .collect()
}
