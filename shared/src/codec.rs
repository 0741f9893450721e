//! Payload framing for CAN bridge messages
//!
//! Every model-specific command is framed as:
//! ```text
//! [ 1 byte: opcode ][ N bytes: channel values ]   (1 + N <= 8)
//! ```
//!
//! Pose setters apply a bounded symmetric perturbation to each channel before
//! framing, so repeated identical poses never produce byte-identical frames.

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use thiserror::Error;

use crate::wire::MAX_PAYLOAD_LEN;

/// Errors that can occur while encoding a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unsupported command type: {0}")]
    UnsupportedCommand(String),

    #[error("Payload too long: {len} bytes (max: {max})")]
    PayloadTooLong { len: usize, max: usize },

    #[error("Invalid pose length: expected {expected} bytes, got {actual}")]
    InvalidPoseLength { expected: usize, actual: usize },
}

/// Prefix `body` with `opcode`, enforcing the wire payload limit
pub fn frame_payload(opcode: u8, body: &[u8]) -> Result<Bytes, EncodeError> {
    let len = 1 + body.len();
    if len > MAX_PAYLOAD_LEN {
        return Err(EncodeError::PayloadTooLong {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }

    let mut buf = BytesMut::with_capacity(len);
    buf.put_u8(opcode);
    buf.put_slice(body);
    Ok(buf.freeze())
}

/// Copy a slice into a fixed-size pose, rejecting any other length
pub fn fixed_pose<const N: usize>(data: &[u8]) -> Result<[u8; N], EncodeError> {
    data.try_into().map_err(|_| EncodeError::InvalidPoseLength {
        expected: N,
        actual: data.len(),
    })
}

/// Frame a fixed-length pose
///
/// The frame limit is checked first, so an oversized body reports
/// `PayloadTooLong` rather than a length mismatch.
pub fn frame_pose<const N: usize>(opcode: u8, body: &[u8]) -> Result<Bytes, EncodeError> {
    let framed = frame_payload(opcode, body)?;
    fixed_pose::<N>(body)?;
    Ok(framed)
}

/// Offset `base` by a random value in `[-delta, +delta]`, clamped to `[0, 255]`
pub fn perturb(base: u8, delta: u8) -> u8 {
    perturb_with(&mut rand::thread_rng(), base, delta)
}

pub fn perturb_with<R: Rng + ?Sized>(rng: &mut R, base: u8, delta: u8) -> u8 {
    let delta = i16::from(delta);
    let offset = rng.gen_range(-delta..=delta);
    (i16::from(base) + offset).clamp(0, 255) as u8
}

/// Perturb every channel of a pose independently
pub fn perturb_pose<const N: usize>(pose: &[u8; N], delta: u8) -> [u8; N] {
    let mut rng = rand::thread_rng();
    pose.map(|v| perturb_with(&mut rng, v, delta))
}

/// Serde adapter encoding byte payloads as base64 strings
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
