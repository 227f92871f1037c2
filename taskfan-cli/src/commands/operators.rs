use crate::output;

use std::path::Path;

use color_eyre::Result;

use operator_rpc::TaskHandler;

pub fn execute(config: Option<&Path>) -> Result<()> {
    let handler = TaskHandler::with_settings(super::load_settings(config, false)?);

    output::status("Operators", "registered");
    for operator_type in handler.registry().operator_types() {
        println!("  {}>", operator_type);
    }

    Ok(())
}
