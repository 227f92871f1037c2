// Subtask Naming
// Deterministic names built from a combination's key/value pairs

use super::combination::Combination;
use crate::config::{ExpansionSettings, NameEncoding};

use url::form_urlencoded;

/// Render the subtask name of a combination, e.g. `+for-A=1&B=x`.
///
/// Pairs appear in combination order. With [`NameEncoding::Raw`] keys
/// and values are written as-is, so a value containing a separator can
/// make two combinations collide; the materializer rejects such
/// collisions.
pub fn build_task_name(combination: &Combination, settings: &ExpansionSettings) -> String {
    let mut name = settings.name_prefix.clone();
    for (i, (key, value)) in combination.iter().enumerate() {
        if i > 0 {
            name.push_str(&settings.pair_separator);
        }
        name.push_str(&encode(key, settings.name_encoding));
        name.push_str(&settings.key_value_separator);
        name.push_str(&encode(&value.as_string(), settings.name_encoding));
    }
    name
}

fn encode(fragment: &str, encoding: NameEncoding) -> String {
    match encoding {
        NameEncoding::Raw => fragment.to_string(),
        NameEncoding::Percent => form_urlencoded::byte_serialize(fragment.as_bytes()).collect(),
    }
}
