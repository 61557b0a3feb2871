// ABOUTME: Custom serde deserializers for release settings.
// ABOUTME: Validates the owner/name repository form and the non-empty smoke checklist.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_repository<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    match s.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(s.to_string())
        }
        _ => Err(serde::de::Error::custom(format!(
            "repository must look like 'owner/name', got '{s}'"
        ))),
    }
}

pub fn deserialize_checklist<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let items: Vec<String> = Vec::deserialize(deserializer)?;
    let items = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    NonEmpty::from_vec(items)
        .ok_or_else(|| serde::de::Error::custom("smoke_test needs at least one check"))
}
