//! Serde adapter for `f32` values that may be NaN or infinite.
//!
//! JSON has no representation for non-finite numbers and `serde_json` writes
//! them as `null`, which a plain `f32` field then refuses to read back. Fields
//! tagged with `#[serde(with = "latentga_training::serde_float")]` write
//! non-finite values as `null` and read `null` back as NaN.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Score {
//!     #[serde(with = "latentga_training::serde_float")]
//!     value: f32,
//! }
//!
//! let json = serde_json::to_string(&Score { value: f32::NAN }).unwrap();
//! assert_eq!(json, r#"{"value":null}"#);
//! let score: Score = serde_json::from_str(&json).unwrap();
//! assert!(score.value.is_nan());
//! ```

use serde::{Deserialize, Deserializer, Serializer};

#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by serde")]
pub fn serialize<S>(value: &f32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f32(*value)
    } else {
        serializer.serialize_none()
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}
