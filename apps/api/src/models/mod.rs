use serde::{Deserialize, Deserializer};

pub mod career;
pub mod chat;
pub mod portfolio;
pub mod profile;

/// Reads an explicit `null` the same as a missing key.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
