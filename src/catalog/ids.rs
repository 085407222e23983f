//! Id generation for new catalog records.

/// Minimum number of digits in a generated id.
const ID_WIDTH: usize = 4;

/// Next id of the form `{prefix}{counter:04}`.
///
/// The counter is one past the largest numeric suffix among `existing` ids
/// that start with `prefix`. Ids with another prefix or a non-numeric
/// suffix are ignored, so an empty catalog starts at 1. Suffixes are
/// compared as decimal strings, so there is no upper bound.
pub fn next_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .map(|suffix| suffix.trim_start_matches('0'))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .unwrap_or_default();

    format!("{prefix}{:0>width$}", increment(max), width = ID_WIDTH)
}

/// Add one to ASCII decimal digits without leading zeros (`""` is zero).
fn increment(digits: &str) -> String {
    let carried = digits.bytes().rev().take_while(|&b| b == b'9').count();
    let head = &digits[..digits.len() - carried];

    let mut out = match head.bytes().last() {
        Some(last) => format!("{}{}", &head[..head.len() - 1], char::from(last + 1)),
        None => "1".to_string(),
    };
    out.extend(std::iter::repeat_n('0', carried));
    out
}
