//! Unbiased sampling of alphabet characters from secure random bytes.

use rand::{CryptoRng, RngCore};

use crate::ErrorRepr;

pub use crate::options::MAX_BUFFER_LEN;

/// Smallest and largest alphabet the sampler accepts. A single byte selects among at most 256
/// characters, and one character is not random at all.
pub const MIN_ALPHABET_LEN: usize = 2;
pub const MAX_ALPHABET_LEN: usize = 256;

/// The largest byte value that maps onto an alphabet of `size` characters without bias.
///
/// Accepted bytes are `0..=max`, a range whose length is a multiple of `size`, so reducing them
/// modulo `size` hits every index equally often.
pub fn max_acceptable_byte(size: usize) -> u8 {
    debug_assert!((MIN_ALPHABET_LEN..=MAX_ALPHABET_LEN).contains(&size));
    (255 - (256 % size)) as u8
}

/// Fraction of random bytes discarded for an alphabet of `size` characters.
pub fn rejection_rate(size: usize) -> f64 {
    (256 % size) as f64 / 256.0
}

/// Draw `length` characters from `alphabet`, uniformly and independently.
///
/// Random bytes are fetched `buffer_len` at a time. Bytes above [`max_acceptable_byte`] are
/// discarded. Every read counts against `max_bad_reads`, including the one that completes the
/// output, and going over the budget fails the call. A failing entropy source fails the call
/// immediately.
///
/// `buffer_len` is clamped to `1..=`[`MAX_BUFFER_LEN`].
///
/// A zero `length` returns an empty output without touching `rng`.
pub fn sample<R>(
    rng: &mut R,
    length: usize,
    alphabet: &[u8],
    max_bad_reads: usize,
    buffer_len: usize,
) -> Result<Vec<u8>, crate::Error>
where
    R: RngCore + CryptoRng,
{
    Ok(sample_inner(
        rng,
        length,
        alphabet,
        max_bad_reads,
        buffer_len,
    )?)
}

pub(crate) fn sample_inner<R>(
    rng: &mut R,
    length: usize,
    alphabet: &[u8],
    max_bad_reads: usize,
    buffer_len: usize,
) -> Result<Vec<u8>, ErrorRepr>
where
    R: RngCore + CryptoRng,
{
    if length == 0 {
        return Ok(Vec::new());
    }

    let size = alphabet.len();
    if !(MIN_ALPHABET_LEN..=MAX_ALPHABET_LEN).contains(&size) {
        return Err(ErrorRepr::CharsetSizeOutOfBounds(size));
    }

    let max_byte = max_acceptable_byte(size);
    let mut buffer = vec![0u8; buffer_len.clamp(1, MAX_BUFFER_LEN)];
    // The budget, not `length`, bounds how much output can actually be produced.
    let mut output = Vec::with_capacity(length.min(buffer.len()));
    let mut reads = 0usize;

    loop {
        rng.try_fill_bytes(&mut buffer)
            .map_err(ErrorRepr::EntropySource)?;
        reads += 1;

        for &byte in buffer.iter() {
            if output.len() == length {
                break;
            }
            if byte <= max_byte {
                output.push(alphabet[usize::from(byte) % size]);
            }
        }
        tracing::trace!(
            reads,
            produced = output.len(),
            wanted = length,
            "entropy read"
        );

        if reads > max_bad_reads {
            return Err(ErrorRepr::TooManyBadReads {
                reads,
                produced: output.len(),
                wanted: length,
            });
        }
        if output.len() == length {
            return Ok(output);
        }
    }
}
