//! JPEG segment walker.
//!
//! Decides whether a JPEG starts at the beginning of a byte window and, if
//! so, how many bytes it spans. The walk follows the marker chain: every
//! segment is length-prefixed except the entropy-coded scan data, whose end
//! is found by resynchronising on the next marker that is neither a stuffed
//! `0xFF 0x00` nor a restart marker.

use memchr::memchr;
use tracing::{debug, trace};

pub const SOI: [u8; 2] = [0xFF, 0xD8];
pub const MARKER_PREFIX: u8 = 0xFF;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const TEM: u8 = 0x01;
pub const RST0: u8 = 0xD0;
pub const RST7: u8 = 0xD7;

/// Smallest possible JPEG: start-of-image immediately followed by end-of-image.
pub const MIN_JPEG_SIZE: usize = 4;

#[inline]
pub const fn is_restart_marker(marker: u8) -> bool {
    marker >= RST0 && marker <= RST7
}

/// Markers that are not followed by a length field.
#[inline]
const fn is_lengthless_marker(marker: u8) -> bool {
    marker == TEM || marker == MARKER_PREFIX
}

/// Outcome of probing one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// A complete JPEG of `length` bytes, both markers included.
    Accepted { length: usize },
    Rejected(Rejection),
}

impl Probe {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[inline]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Accepted { length } => Some(*length),
            Self::Rejected(_) => None,
        }
    }
}

/// Why a window does not hold a JPEG. Offsets are relative to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoStartOfImage,
    UnexpectedByte { offset: usize, byte: u8 },
    SegmentLength { offset: usize, marker: u8, length: usize },
    ScanTooLong,
    Truncated,
}

/// Walks the marker chain of the JPEG that may start at `window[0]`.
///
/// `max_segment_size` bounds every declared segment length and the distance
/// from the window start within which the end of scan data must be found.
/// Nothing past the end of `window` is ever read.
pub fn probe(window: &[u8], max_segment_size: usize) -> Probe {
    if !window.starts_with(&SOI) {
        return Probe::Rejected(Rejection::NoStartOfImage);
    }

    debug!("candidate jpeg found");

    let result = walk(window, max_segment_size);
    if let Probe::Rejected(reason) = result {
        debug!(?reason, "candidate rejected");
    }
    result
}

fn walk(window: &[u8], max_segment_size: usize) -> Probe {
    let mut addr = SOI.len();

    loop {
        let Some(&[prefix, code]) = window.get(addr..addr + 2) else {
            return Probe::Rejected(Rejection::Truncated);
        };
        if prefix != MARKER_PREFIX {
            return Probe::Rejected(Rejection::UnexpectedByte {
                offset: addr,
                byte: prefix,
            });
        }
        addr += 2;

        if code == EOI {
            trace!(length = addr, "found end of image");
            return Probe::Accepted { length: addr };
        }

        if is_lengthless_marker(code) {
            trace!("found lengthless section {code:02x}");
            continue;
        }

        let Some(&[hi, lo]) = window.get(addr..addr + 2) else {
            return Probe::Rejected(Rejection::Truncated);
        };
        let length = usize::from(u16::from_be_bytes([hi, lo]));
        trace!("found section {code:02x} of len {length}");

        if length < 2 || length > max_segment_size {
            return Probe::Rejected(Rejection::SegmentLength {
                offset: addr - 2,
                marker: code,
                length,
            });
        }
        addr += length;

        if code == SOS {
            addr = match find_scan_end(window, addr, max_segment_size) {
                Ok(end) => end,
                Err(reason) => return Probe::Rejected(reason),
            };
            trace!("end of scan data found at offset {addr}");
        }
    }
}

/// Finds the first marker after `start` that ends entropy-coded data.
///
/// Stuffed bytes (`0xFF 0x00`) and restart markers belong to the scan. The
/// terminator must sit below `max_segment_size`.
fn find_scan_end(
    window: &[u8],
    start: usize,
    max_segment_size: usize,
) -> Result<usize, Rejection> {
    let limit = window.len().min(max_segment_size);
    let exhausted = if window.len() > max_segment_size {
        Rejection::ScanTooLong
    } else {
        Rejection::Truncated
    };

    let mut pos = start;
    while pos < limit {
        let Some(rel) = memchr(MARKER_PREFIX, &window[pos..limit]) else {
            break;
        };
        let at = pos + rel;
        let Some(&next) = window.get(at + 1) else {
            return Err(Rejection::Truncated);
        };
        if next == 0x00 || is_restart_marker(next) {
            pos = at + 1;
            continue;
        }
        return Ok(at);
    }

    Err(exhausted)
}
