//! JSON rendering of extracted entries
//!
//! The output is always a JSON array, `[]` when nothing was extracted.

use std::io::Write;

use crate::errors::Result;
use crate::types::LearnableEntry;

/// What a failed run prints when configured to degrade to empty output
pub const EMPTY_ARRAY: &str = "[]";

/// Serialize entries; `pretty` uses two-space indentation
pub fn to_json(entries: &[LearnableEntry], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(entries)?
    } else {
        serde_json::to_string(entries)?
    };
    Ok(json)
}

/// Serialize entries to a writer followed by a newline
pub fn write_json<W: Write>(writer: &mut W, entries: &[LearnableEntry], pretty: bool) -> Result<()> {
    writer.write_all(to_json(entries, pretty)?.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Parse a previously emitted array back into entries
pub fn from_json(json: &str) -> Result<Vec<LearnableEntry>> {
    Ok(serde_json::from_str(json)?)
}
