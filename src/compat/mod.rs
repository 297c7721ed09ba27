//! [`Inspect`](crate::value::Inspect) implementations for types of other
//! crates.
//!
//! Each integration sits behind a feature flag:
//!
//! - [`serde_json1`] - `serde_json::Value` and `serde_json::Map` (requires
//!   the `compat-serde_json1` feature flag)

#[cfg(feature = "compat-serde_json1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-serde_json1")))]
pub mod serde_json1;
