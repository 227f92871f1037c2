pub mod expand;
pub mod operators;
pub mod validate;

use std::path::Path;

use color_eyre::Result;

use operator_rpc::{ExpansionSettings, NameEncoding};

/// Load expansion settings, optionally forcing percent-encoded names
pub fn load_settings(config: Option<&Path>, percent_encode: bool) -> Result<ExpansionSettings> {
    let settings = ExpansionSettings::load(config)?;
    if percent_encode {
        return Ok(settings.with_name_encoding(NameEncoding::Percent));
    }
    Ok(settings)
}
