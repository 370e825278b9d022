use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::ParseError;

/// Returns `true` for lines that carry no declaration: blank lines and
/// comment-only lines.
///
/// Leading and trailing spaces, tabs, and newlines are trimmed before the
/// check, so an indented `#` comment is still ignored.
pub fn is_ignored_line(line: &str) -> bool {
    let trimmed = line.trim_matches([' ', '\n', '\t']);
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one declaration line into a `(key, value)` pair.
///
/// Handles trailing `# comment` stripping (with `#` preserved inside quoted
/// values), the optional `export` prefix, `KEY=VALUE` with a `KEY: VALUE`
/// fallback, and quote unwrapping with `\"` and `\n` escape expansion.
///
/// # Errors
///
/// [`ParseError::EmptyLine`] for zero-length input, [`ParseError::Separator`]
/// when the line contains neither `=` nor `:`.
pub fn parse_line(line: &str) -> Result<(String, String), ParseError> {
    if line.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    let line = strip_comment(line);
    let (raw_key, raw_value) = line
        .split_once('=')
        .or_else(|| line.split_once(':'))
        .ok_or(ParseError::Separator)?;

    Ok((normalize_key(raw_key), normalize_value(raw_value)))
}

/// Parse a whole `.env` buffer into a map.
///
/// Lines are split on `\n`; ignorable lines are skipped and lines that fail
/// to parse are silently dropped, matching file-loading behavior. The last
/// occurrence of a duplicated key wins.
pub fn parse_str(input: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in input.split('\n') {
        if is_ignored_line(line) {
            continue;
        }
        if let Ok((key, value)) = parse_line(line) {
            entries.insert(key, value);
        }
    }
    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Outside,
    Inside,
}

/// Drop a trailing `# comment` while keeping `#` characters that sit inside
/// a quoted value.
///
/// The line is split on `#` and walked with a two-state quote machine: a
/// segment containing exactly one `"` or exactly one `'` toggles the state.
/// A segment is kept when it closes a quoted span, when it is the first
/// segment collected, or while the machine is inside a quoted span; kept
/// segments are rejoined with `#`. The decision is made on quote counts, not
/// positions, and inputs with unbalanced counts follow this literal walk.
fn strip_comment(line: &str) -> Cow<'_, str> {
    if !line.contains('#') {
        return Cow::Borrowed(line);
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut state = QuoteState::Outside;
    for segment in line.split('#') {
        if has_lone_quote(segment) {
            match state {
                QuoteState::Inside => {
                    state = QuoteState::Outside;
                    kept.push(segment);
                }
                QuoteState::Outside => state = QuoteState::Inside,
            }
        }
        if kept.is_empty() || state == QuoteState::Inside {
            kept.push(segment);
        }
    }

    Cow::Owned(kept.join("#"))
}

fn has_lone_quote(segment: &str) -> bool {
    segment.matches('"').count() == 1 || segment.matches('\'').count() == 1
}

fn normalize_key(raw: &str) -> String {
    let key = raw.strip_prefix("export").unwrap_or(raw);
    key.trim_matches(' ').to_owned()
}

/// Trim the raw value and, when it holds a matched pair of quotes (exactly
/// two `"` or exactly two `'`, by count), unwrap the edges and expand `\"`
/// and `\n` escapes. Unquoted values pass through untouched beyond the trim.
fn normalize_value(raw: &str) -> String {
    let value = raw.trim_matches(' ');

    let double_quotes = value.matches('"').count();
    let single_quotes = value.matches('\'').count();
    if double_quotes == 2 || single_quotes == 2 {
        let unwrapped = strip_edge_quotes(value);
        return unwrapped.replace("\\\"", "\"").replace("\\n", "\n");
    }

    value.to_owned()
}

fn strip_edge_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}
