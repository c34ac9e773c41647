//! HTTP byte-range parsing (spec §4.5). Validation happens before any file
//! is opened.

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRangeSpec {
    start: Option<u64>,
    end: Option<u64>,
}

/// Resolved `(offset, length)` within a file of known `total_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u64,
    pub len: u64,
}

/// Parse a `Range: bytes=...` header value. Only the single-range form is
/// supported; multi-range requests are rejected.
pub fn parse_range_header(header: &str) -> Result<ByteRangeSpec, CaptureError> {
    let spec = header
        .strip_prefix("bytes=")
        .ok_or_else(|| CaptureError::RangeInvalid(format!("unsupported range unit: {header}")))?;
    if spec.contains(',') {
        return Err(CaptureError::RangeInvalid("multi-range requests are not supported".to_string()));
    }
    let (start_str, end_str) = spec
        .split_once('-')
        .ok_or_else(|| CaptureError::RangeInvalid(format!("malformed range: {header}")))?;

    let start = if start_str.is_empty() {
        None
    } else {
        Some(start_str.parse::<u64>().map_err(|_| CaptureError::RangeInvalid(header.to_string()))?)
    };
    let end = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse::<u64>().map_err(|_| CaptureError::RangeInvalid(header.to_string()))?)
    };
    if start.is_none() && end.is_none() {
        return Err(CaptureError::RangeInvalid(format!("empty range: {header}")));
    }
    Ok(ByteRangeSpec { start, end })
}

impl ByteRangeSpec {
    /// Resolve against a known file size, per RFC 7233 semantics: a missing
    /// `start` with a present `end` means "last `end` bytes".
    pub fn validate(&self, total_size: u64) -> Result<ResolvedRange, CaptureError> {
        if total_size == 0 {
            return Err(CaptureError::RangeInvalid("range requested on empty file".to_string()));
        }
        let (start, end) = match (self.start, self.end) {
            (Some(start), end) => {
                if start >= total_size {
                    return Err(CaptureError::RangeInvalid(format!(
                        "range start {start} beyond file size {total_size}"
                    )));
                }
                let end = end.unwrap_or(total_size - 1).min(total_size - 1);
                (start, end)
            }
            (None, Some(suffix_len)) => {
                let start = total_size.saturating_sub(suffix_len);
                (start, total_size - 1)
            }
            (None, None) => unreachable!("parse_range_header rejects empty ranges"),
        };
        if end < start {
            return Err(CaptureError::RangeInvalid(format!("range end {end} precedes start {start}")));
        }
        Ok(ResolvedRange { start, len: end - start + 1 })
    }
}

#[cfg(test)]
#[path = "byterange_tests.rs"]
mod tests;
