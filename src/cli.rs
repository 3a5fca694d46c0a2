//! User-id spec parsing for the command line.

use anyhow::{bail, Context, Result};

/// Parse a user-id spec into an ordered list of ids.
///
/// Accepts comma-separated entries, each either a single id or an inclusive
/// range like `1-10000`. Order and duplicates are preserved as written.
pub fn parse_user_ids(spec: &str) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            bail!("empty entry in user spec '{spec}'");
        }
        match entry.split_once('-') {
            Some((start, end)) => {
                let start: u32 = start
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid user id '{}'", start.trim()))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid user id '{}'", end.trim()))?;
                if start > end {
                    bail!("invalid range '{entry}': start is greater than end");
                }
                ids.extend(start..=end);
            }
            None => {
                ids.push(
                    entry
                        .parse()
                        .with_context(|| format!("invalid user id '{entry}'"))?,
                );
            }
        }
    }
    Ok(ids)
}
