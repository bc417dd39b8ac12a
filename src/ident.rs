use crate::error::{StoreError, StoreResult};

/// Width of the zero-padded numeric suffix.
pub const SUFFIX_WIDTH: usize = 3;

/// Allocate the next identifier for `prefix`: one past the largest existing
/// numeric suffix, or `prefix001` when there are none.
///
/// Every existing id must be `prefix` followed by an unsigned integer.
/// Suffixes beyond 999 keep growing past three digits.
pub fn next_identifier<'a, I>(
    table: &'static str,
    prefix: &'static str,
    ids: I,
) -> StoreResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max: Option<u64> = None;
    for id in ids {
        let n = parse_suffix(id, prefix).ok_or_else(|| StoreError::MalformedIdentifier {
            table,
            id: id.to_string(),
            prefix,
        })?;
        max = Some(max.map_or(n, |m| m.max(n)));
    }

    let next = match max {
        None => 1,
        Some(m) => m.checked_add(1).ok_or_else(|| StoreError::MalformedIdentifier {
            table,
            id: format!("{}{}", prefix, m),
            prefix,
        })?,
    };
    Ok(render(prefix, next))
}

pub fn render(prefix: &str, n: u64) -> String {
    format!("{}{:0width$}", prefix, n, width = SUFFIX_WIDTH)
}

fn parse_suffix(id: &str, prefix: &str) -> Option<u64> {
    let rest = id.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}
