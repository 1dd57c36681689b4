//! Recipient normalization, single and batch dispatch, and instance status
//! probing for relay.
//!
//! Batches run strictly sequentially with an optional fixed pause between
//! recipients. Failures never escape as errors; they are recorded as tagged
//! outcomes and rendered into the batch summary.
//!
//! ```rust
//! use relay_dispatch::{normalize_recipient, RecipientIdentifier};
//!
//! let canonical = normalize_recipient(&RecipientIdentifier::from("+55 (11) 91234-5678"))
//!     .expect("valid recipient");
//! assert_eq!(canonical.as_str(), "5511912345678");
//! assert!(normalize_recipient(&RecipientIdentifier::from("abc")).is_none());
//! ```

pub mod dispatch_batch;
pub mod dispatch_one;
pub mod instance_status;
pub mod operations;
pub mod options;
pub mod outcome;
pub mod progress;
pub mod recipient;

#[cfg(test)]
mod test_support;

pub use dispatch_batch::*;
pub use dispatch_one::*;
pub use instance_status::*;
pub use operations::*;
pub use options::*;
pub use outcome::*;
pub use progress::*;
pub use recipient::*;
