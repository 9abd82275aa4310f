//! Functions command - list what templates can call

use timeconv_engine::{AVAILABLE_FILTERS, FUNCTION_SIGNATURES};

use crate::display;
use crate::error::Result;

pub fn run(json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = FUNCTION_SIGNATURES
            .iter()
            .map(|(name, signature)| {
                serde_json::json!({
                    "name": name,
                    "signature": signature,
                    "filter": AVAILABLE_FILTERS.contains(name),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        display::print_functions(FUNCTION_SIGNATURES, AVAILABLE_FILTERS);
    }
    Ok(())
}
