use std::sync::OnceLock;

use super::*;

#[derive(Debug, Clone)]
pub(crate) struct Regex {
    backend: fancy_regex::Regex,
}

impl Regex {
    pub(crate) fn new(pattern: &str) -> Result<Self> {
        let backend = fancy_regex::Regex::new(pattern)
            .map_err(|err| Error::Runtime(format!("invalid pattern {pattern:?}: {err}")))?;
        Ok(Self { backend })
    }

    /// Returns the capture groups of the first match; missing optional
    /// groups come back as `None`.
    pub(crate) fn captures(&self, input: &str) -> Result<Option<Vec<Option<String>>>> {
        let captures = self
            .backend
            .captures(input)
            .map_err(|err| Error::Runtime(format!("pattern match failed: {err}")))?;
        Ok(captures.map(|caps| {
            caps.iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect()
        }))
    }
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Integer prefix of an attribute value, mirroring `parseInt(value, 10)`:
/// leading whitespace and an optional sign are accepted, trailing junk is
/// ignored, and no digits at all yields `None`.
pub(crate) fn parse_int_prefix(value: &str) -> Option<i64> {
    static INT_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = compiled(&INT_PREFIX, r"^\s*([+-]?[0-9]+)")?;
    let groups = regex.captures(value).ok()??;
    let digits = groups.get(1)?.as_deref()?;
    match digits.parse::<i64>() {
        Ok(parsed) => Some(parsed),
        Err(_) if digits.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Name of the global entry point an inline `onclick` attribute calls, if
/// the attribute is nothing but a bare call such as `nextStep();`.
pub(crate) fn inline_call_target(onclick: &str) -> Option<String> {
    static INLINE_CALL: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = compiled(
        &INLINE_CALL,
        r"^\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\(\s*\)\s*;?\s*$",
    )?;
    let groups = regex.captures(onclick).ok()??;
    groups.get(1)?.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_prefix_follows_leading_digits() {
        assert_eq!(parse_int_prefix("150"), Some(150));
        assert_eq!(parse_int_prefix("  42+ clients"), Some(42));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("98.6"), Some(98));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("\u{661}\u{662}"), None);
        assert_eq!(parse_int_prefix("12\u{663}"), Some(12));
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn inline_call_target_accepts_bare_calls_only() {
        assert_eq!(inline_call_target("nextStep()"), Some("nextStep".into()));
        assert_eq!(inline_call_target(" prevStep ( ) ; "), Some("prevStep".into()));
        assert_eq!(inline_call_target("nextStep(1)"), None);
        assert_eq!(inline_call_target("a(); b()"), None);
    }
}
