//! Role-independent wire mechanics: message framing and the keyed MAC.

pub mod frame;
pub mod mac;

pub use frame::{read_frame, write_frame, FrameError};
pub use mac::{compute_tag, verify_tag, MacAlgorithm, MacError, Tag};
