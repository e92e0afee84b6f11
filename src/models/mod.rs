pub mod endpoint;

use serde::{Deserialize, Deserializer};

pub use endpoint::{ApiKey, ApiResponse, AuthKind, Authentication, EndpointRecord, Secret};

/// Treats an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
