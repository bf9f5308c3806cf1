//! Parsing of `key=value` style command line arguments.

/// An argument which should have been `key=value` but wasn't.
///
/// These are never fatal: callers log them and carry on without the entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} not in a=b format. Skipping...")]
pub struct MalformedArgument(pub String);

/// Split `item` into key and value; exactly one `=` is required.
pub fn parse_key_value(item: &str) -> Result<(&str, &str), MalformedArgument> {
    match item.split_once('=') {
        Some((k, v)) if !v.contains('=') => Ok((k, v)),
        _ => Err(MalformedArgument(item.to_string())),
    }
}

/// Split a `--flag=value` token on its first `=`; the value may itself
/// contain `=` (e.g. `--env=FOO=bar`).
pub fn parse_flag_value(item: &str) -> Result<(&str, &str), MalformedArgument> {
    item.split_once('=')
        .ok_or_else(|| MalformedArgument(item.to_string()))
}
