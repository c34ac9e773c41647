//! tap-capture: thin facade over the capture subprocess (spec C5).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod byterange;
pub mod error;
pub mod listing;
pub mod status;
pub mod supervisor;

pub use byterange::{parse_range_header, ByteRangeSpec, ResolvedRange};
pub use error::CaptureError;
pub use listing::{paginate, scan};
pub use status::CaptureStatus;
pub use supervisor::{CaptureSupervisor, OpenedCapture};
