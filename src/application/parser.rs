//! Parsing of textual value lists such as `"5, 3, 7"`.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};

/// Splits on commas and whitespace and parses every token as an integer.
///
/// Empty tokens are skipped, so `"5, 3,,7 "` yields `[5, 3, 7]` and an empty
/// or blank input yields an empty list.
#[instrument(level = "trace")]
pub fn parse_values(input: &str) -> ApplicationResult<Vec<i64>> {
    let values = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| ApplicationError::Parse {
                token: token.to_string(),
                input: input.trim().to_string(),
            })
        })
        .collect::<ApplicationResult<Vec<_>>>()?;
    debug!(count = values.len(), "parsed values");
    Ok(values)
}
