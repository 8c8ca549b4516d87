use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

impl SelectorAttrCondition {
    pub(crate) fn matches(&self, element: &Element) -> bool {
        let attr = |key: &str| element.attrs.get(key);
        match self {
            Self::Exists { key } => attr(key).is_some(),
            Self::Eq { key, value } => attr(key) == Some(value),
            Self::StartsWith { key, value } => {
                !value.is_empty() && attr(key).is_some_and(|v| v.starts_with(value.as_str()))
            }
            Self::EndsWith { key, value } => {
                !value.is_empty() && attr(key).is_some_and(|v| v.ends_with(value.as_str()))
            }
            Self::Contains { key, value } => {
                !value.is_empty() && attr(key).is_some_and(|v| v.contains(value.as_str()))
            }
            Self::Includes { key, value } => {
                attr(key).is_some_and(|v| v.split_whitespace().any(|token| token == value))
            }
            Self::DashMatch { key, value } => attr(key)
                .is_some_and(|v| v == value || v.starts_with(&format!("{value}-"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Enabled,
    Required,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to the part on the left.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_outside_brackets(selector, |ch| ch == ',')?
        .into_iter()
        .map(|group| {
            let group = group.trim();
            if group.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            parse_selector_chain(group)
        })
        .collect()
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<SelectorCombinator> = None;

    for token in tokenize_selector(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending.is_some() || parts.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(SelectorCombinator::Descendant))
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(parts)
}

/// Splits at characters accepted by `is_separator` that sit outside `[...]`
/// and `(...)`.
fn split_outside_brackets(
    selector: &str,
    is_separator: impl Fn(char) -> bool,
) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '"' | '\'' if bracket_depth > 0 => quote = Some(ch),
            '[' => bracket_depth += 1,
            ']' => {
                bracket_depth = bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            '(' => paren_depth += 1,
            ')' => {
                paren_depth = paren_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            _ if bracket_depth == 0 && paren_depth == 0 && is_separator(ch) => {
                pieces.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    if bracket_depth != 0 || paren_depth != 0 || quote.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    pieces.push(current);
    Ok(pieces)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let spaced = {
        let mut out = String::with_capacity(selector.len());
        let mut bracket_depth = 0usize;
        let mut paren_depth = 0usize;
        for ch in selector.chars() {
            match ch {
                '[' => bracket_depth += 1,
                ']' => bracket_depth = bracket_depth.saturating_sub(1),
                '(' => paren_depth += 1,
                ')' => paren_depth = paren_depth.saturating_sub(1),
                '>' | '+' | '~' if bracket_depth == 0 && paren_depth == 0 => {
                    out.push(' ');
                    out.push(ch);
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
            out.push(ch);
        }
        out
    };

    Ok(split_outside_brackets(&spaced, |ch| ch.is_ascii_whitespace())?
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect())
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let unsupported = || Error::UnsupportedSelector(part.into());
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' if i == 0 => {
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                if step.id.replace(id).is_some() {
                    return Err(unsupported());
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(cond);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i + 1)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ if i == 0 => {
                let (tag, next) = parse_selector_ident(part, i).ok_or_else(unsupported)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
            _ => return Err(unsupported()),
        }
    }

    if step.is_empty() {
        return Err(unsupported());
    }
    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Result<(SelectorPseudoClass, usize)> {
    let unsupported = || Error::UnsupportedSelector(part.into());
    let (name, after_name) = parse_selector_ident(part, start).ok_or_else(unsupported)?;

    let simple = match name.to_ascii_lowercase().as_str() {
        "first-child" => Some(SelectorPseudoClass::FirstChild),
        "last-child" => Some(SelectorPseudoClass::LastChild),
        "checked" => Some(SelectorPseudoClass::Checked),
        "disabled" => Some(SelectorPseudoClass::Disabled),
        "enabled" => Some(SelectorPseudoClass::Enabled),
        "required" => Some(SelectorPseudoClass::Required),
        "not" => None,
        _ => return Err(unsupported()),
    };
    if let Some(pseudo) = simple {
        return Ok((pseudo, after_name));
    }

    if part.as_bytes().get(after_name) != Some(&b'(') {
        return Err(unsupported());
    }
    let mut depth = 0usize;
    for (offset, ch) in part[after_name..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let close = after_name + offset;
                    let inner = parse_selector_groups(&part[after_name + 1..close])?;
                    return Ok((SelectorPseudoClass::Not(inner), close + 1));
                }
            }
            _ => {}
        }
    }
    Err(unsupported())
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b >= 0x80
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut i = skip_ws(open_bracket + 1);
    let key_start = i;
    while i < bytes.len() && (is_selector_ident_char(bytes[i]) || bytes[i] == b':') {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src[key_start..i].to_ascii_lowercase();
    i = skip_ws(i);

    if bytes.get(i) == Some(&b']') {
        return Ok((SelectorAttrCondition::Exists { key }, i + 1));
    }

    type Build = fn(String, String) -> SelectorAttrCondition;
    let (build, op_len): (Build, usize) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => (|key, value| SelectorAttrCondition::Eq { key, value }, 1),
        (Some(b'^'), Some(b'=')) => (
            |key, value| SelectorAttrCondition::StartsWith { key, value },
            2,
        ),
        (Some(b'$'), Some(b'=')) => (
            |key, value| SelectorAttrCondition::EndsWith { key, value },
            2,
        ),
        (Some(b'*'), Some(b'=')) => (
            |key, value| SelectorAttrCondition::Contains { key, value },
            2,
        ),
        (Some(b'~'), Some(b'=')) => (
            |key, value| SelectorAttrCondition::Includes { key, value },
            2,
        ),
        (Some(b'|'), Some(b'=')) => (
            |key, value| SelectorAttrCondition::DashMatch { key, value },
            2,
        ),
        _ => return Err(unsupported()),
    };

    i = skip_ws(i + op_len);
    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = skip_ws(after_value);
    if bytes.get(i) != Some(&b']') {
        return Err(unsupported());
    }
    Ok((build(key, value), i + 1))
}

fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let quote = match bytes.get(start) {
        Some(b'"') => Some('"'),
        Some(b'\'') => Some('\''),
        Some(_) => None,
        None => return Err(Error::UnsupportedSelector(src.into())),
    };

    let body_start = if quote.is_some() { start + 1 } else { start };
    let mut value = String::new();
    let mut chars = src[body_start..].char_indices();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            _ if Some(ch) == quote => return Ok((value, body_start + offset + 1)),
            _ if quote.is_none() && (ch == ']' || ch.is_ascii_whitespace()) => {
                return Ok((value, body_start + offset));
            }
            _ => value.push(ch),
        }
    }

    if quote.is_some() {
        Err(Error::UnsupportedSelector(src.into()))
    } else {
        Ok((value, src.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_steps_with_attributes() -> Result<()> {
        let groups = parse_selector_groups(r#".form-step[data-step="2"] [required]"#)?;
        assert_eq!(groups.len(), 1);
        let chain = &groups[0];
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].step.classes, vec!["form-step".to_string()]);
        assert_eq!(
            chain[0].step.attrs,
            vec![SelectorAttrCondition::Eq {
                key: "data-step".into(),
                value: "2".into()
            }]
        );
        assert_eq!(chain[1].combinator, Some(SelectorCombinator::Descendant));
        Ok(())
    }

    #[test]
    fn splits_groups_but_not_inside_attribute_values() -> Result<()> {
        let groups = parse_selector_groups(r#"a[title="x, y"], .nav-link"#)?;
        assert_eq!(groups.len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_dangling_combinators_and_bare_hash() {
        assert!(parse_selector_groups("div >").is_err());
        assert!(parse_selector_groups("#").is_err());
        assert!(parse_selector_groups("").is_err());
        assert!(parse_selector_groups("a:hover").is_err());
    }
}
