//! Codec for the encoded polyline format used by map providers.
//!
//! Each coordinate is stored as a delta against the previous point, scaled
//! by `1e5`, zigzag-mapped to an unsigned value and split into 5-bit chunks
//! (least significant first). Every chunk is offset by 63 so it lands in the
//! printable range `'?'..='~'`; bit `0x20` marks that another chunk follows.
//!
//! Decoding runs as a small state machine: a chunk accumulator collects
//! chunks until a terminal one arrives, and the decoder alternates between
//! the latitude and longitude axes, emitting a [`Coordinate`] after each
//! longitude. Truncated or out-of-range input is rejected rather than read
//! past.

use thiserror::Error;

use crate::Coordinate;

const CHARACTER_OFFSET: u8 = 63;
const MAX_CHARACTER: u8 = b'~';
const CHUNK_MASK: u8 = 0x1F;
const CONTINUATION_BIT: u8 = 0x20;
const CHUNK_BITS: u32 = 5;
/// Seven chunks carry 35 bits; anything past that cannot be a valid value.
const MAX_SHIFT: u32 = 30;
const PRECISION: f64 = 1e5;

/// Errors from [`decode`]: the path is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The input ended inside a value or between a latitude and its longitude.
    #[error("encoded path is truncated at byte {offset}")]
    Truncated {
        /// Byte offset at which more input was expected.
        offset: usize,
    },
    /// A byte falls outside the printable range the format uses.
    #[error("encoded path contains invalid byte {byte:#04x} at offset {offset}")]
    InvalidCharacter {
        /// Byte offset of the offending byte.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },
    /// A value does not fit the 32-bit range of the format.
    #[error("encoded path value overflows at byte {offset}")]
    Overflow {
        /// Byte offset at which the overflow was detected.
        offset: usize,
    },
}

/// Outcome of feeding one chunk to a [`ChunkAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The value continues in the next byte.
    Continue,
    /// The value is complete; holds the zigzag-decoded delta.
    Complete(i64),
}

/// Collects 5-bit chunks of a single varint.
#[derive(Debug, Default, Clone, Copy)]
struct ChunkAccumulator {
    shift: u32,
    value: u64,
}

impl ChunkAccumulator {
    const fn in_progress(&self) -> bool {
        self.shift > 0
    }

    fn push(&mut self, offset: usize, byte: u8) -> Result<Step, PolylineError> {
        let chunk = chunk_value(offset, byte)?;
        if self.shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset });
        }
        self.value |= u64::from(chunk & CHUNK_MASK) << self.shift;
        self.shift += CHUNK_BITS;
        if chunk & CONTINUATION_BIT != 0 {
            return Ok(Step::Continue);
        }

        let raw = u32::try_from(self.value).map_err(|_| PolylineError::Overflow { offset })?;
        *self = Self::default();
        Ok(Step::Complete(zigzag_decode(raw)))
    }
}

/// Strip the printable offset from `byte`, rejecting bytes outside the alphabet.
fn chunk_value(offset: usize, byte: u8) -> Result<u8, PolylineError> {
    if (CHARACTER_OFFSET..=MAX_CHARACTER).contains(&byte) {
        Ok(byte - CHARACTER_OFFSET)
    } else {
        Err(PolylineError::InvalidCharacter { offset, byte })
    }
}

/// Map an unsigned zigzag value back onto a signed delta.
fn zigzag_decode(raw: u32) -> i64 {
    let magnitude = i64::from(raw >> 1);
    if raw & 1 == 1 { !magnitude } else { magnitude }
}

const fn zigzag_encode(delta: i64) -> u64 {
    let shifted = delta.unsigned_abs() << 1;
    if delta < 0 { shifted.wrapping_sub(1) } else { shifted }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

/// Decoder state across the whole input.
#[derive(Debug)]
struct PathDecoder {
    axis: Axis,
    chunk: ChunkAccumulator,
    latitude: i64,
    longitude: i64,
    points: Vec<Coordinate>,
}

impl PathDecoder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            axis: Axis::Latitude,
            chunk: ChunkAccumulator::default(),
            latitude: 0,
            longitude: 0,
            points: Vec::with_capacity(capacity),
        }
    }

    fn feed(&mut self, offset: usize, byte: u8) -> Result<(), PolylineError> {
        match self.chunk.push(offset, byte)? {
            Step::Continue => Ok(()),
            Step::Complete(delta) => self.apply(offset, delta),
        }
    }

    fn apply(&mut self, offset: usize, delta: i64) -> Result<(), PolylineError> {
        let overflow = || PolylineError::Overflow { offset };
        match self.axis {
            Axis::Latitude => {
                self.latitude = self.latitude.checked_add(delta).ok_or_else(overflow)?;
                self.axis = Axis::Longitude;
            }
            Axis::Longitude => {
                self.longitude = self.longitude.checked_add(delta).ok_or_else(overflow)?;
                self.points.push(Coordinate::new(
                    unscale(self.latitude).ok_or_else(overflow)?,
                    unscale(self.longitude).ok_or_else(overflow)?,
                ));
                self.axis = Axis::Latitude;
            }
        }
        Ok(())
    }

    fn finish(self, length: usize) -> Result<Vec<Coordinate>, PolylineError> {
        if self.chunk.in_progress() || self.axis == Axis::Longitude {
            return Err(PolylineError::Truncated { offset: length });
        }
        Ok(self.points)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "polyline values are fixed-point degrees scaled by 1e5"
)]
fn unscale(value: i64) -> Option<f64> {
    i32::try_from(value)
        .ok()
        .map(|fixed| f64::from(fixed) / PRECISION)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "degrees are rounded to the 1e5 fixed-point grid of the format"
)]
fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

/// Decode an encoded polyline into coordinates.
///
/// The whole input is consumed; on success every byte belonged to a
/// complete latitude/longitude pair. An empty string yields an empty path.
///
/// # Errors
///
/// Returns [`PolylineError`] when the input is truncated, contains bytes
/// outside `'?'..='~'`, or encodes values beyond the format's range.
///
/// # Examples
/// ```
/// use courier_core::polyline::decode;
///
/// let path = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@")?;
/// assert_eq!(path.len(), 3);
/// assert!((path[0].latitude - 38.5).abs() < 1e-9);
/// assert!((path[2].longitude + 126.453).abs() < 1e-9);
///
/// assert!(decode("")?.is_empty());
/// # Ok::<(), courier_core::PolylineError>(())
/// ```
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let mut decoder = PathDecoder::with_capacity(encoded.len() >> 1);
    for (offset, byte) in encoded.bytes().enumerate() {
        decoder.feed(offset, byte)?;
    }
    decoder.finish(encoded.len())
}

/// Encode coordinates as a polyline.
///
/// Coordinates are rounded to five decimal places first, so
/// `decode(&encode(path))` reproduces `path` at that precision.
///
/// # Examples
/// ```
/// use courier_core::Coordinate;
/// use courier_core::polyline::encode;
///
/// let path = [
///     Coordinate::new(38.5, -120.2),
///     Coordinate::new(40.7, -120.95),
///     Coordinate::new(43.252, -126.453),
/// ];
/// assert_eq!(encode(&path), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// ```
#[must_use]
pub fn encode(path: &[Coordinate]) -> String {
    let mut encoded = String::new();
    let mut previous = (0_i64, 0_i64);
    for coordinate in path {
        let current = (scale(coordinate.latitude), scale(coordinate.longitude));
        push_value(&mut encoded, current.0.saturating_sub(previous.0));
        push_value(&mut encoded, current.1.saturating_sub(previous.1));
        previous = current;
    }
    encoded
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "each chunk is masked to five bits before narrowing"
)]
fn push_value(encoded: &mut String, delta: i64) {
    let mut remaining = zigzag_encode(delta);
    let mask = u64::from(CHUNK_MASK);
    while remaining > mask {
        let chunk = (remaining & mask) as u8 | CONTINUATION_BIT;
        encoded.push(char::from(chunk + CHARACTER_OFFSET));
        remaining >>= CHUNK_BITS;
    }
    encoded.push(char::from(remaining as u8 + CHARACTER_OFFSET));
}
