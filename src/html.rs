use super::*;

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is kept as a single unparsed text node.
pub(crate) fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

// Content of these is character data that still carries entity references.
fn decodes_raw_text(tag: &str) -> bool {
    matches!(tag, "textarea" | "title")
}

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            let end = find_subslice(bytes, i + 4, b"-->")
                .ok_or_else(|| Error::HtmlParse("unclosed comment".into()))?;
            i = end + 3;
            continue;
        }

        if bytes[i] != b'<' || !bytes.get(i + 1).is_some_and(|b| is_tag_start_byte(*b)) {
            let text_start = i;
            i += 1;
            while i < bytes.len()
                && !(bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|b| is_tag_start_byte(*b)))
            {
                i += 1;
            }
            let parent = current_parent(&stack)?;
            let text = decode_entities(&html[text_start..i]);
            if !text.is_empty() {
                dom.create_text(parent, text);
            }
            continue;
        }

        if starts_with_at(bytes, i, b"</") {
            let (tag, next) = parse_end_tag(html, i)?;
            i = next;
            close_element(&dom, &mut stack, &tag);
            continue;
        }

        if starts_with_at(bytes, i, b"<!") || starts_with_at(bytes, i, b"<?") {
            i = skip_declaration(bytes, i)?;
            continue;
        }

        let StartTag {
            name,
            attrs,
            self_closing,
            end,
        } = parse_start_tag(html, i)?;
        i = end;

        close_implied_elements(&dom, &mut stack, &name);
        let parent = current_parent(&stack)?;
        let node = dom.create_element(parent, name.clone(), attrs);

        if is_raw_text_tag(&name) {
            if self_closing {
                continue;
            }
            let close = find_raw_end_tag(bytes, i, name.as_bytes())
                .ok_or_else(|| Error::HtmlParse(format!("unclosed <{name}>")))?;
            let body = &html[i..close];
            let body = if decodes_raw_text(&name) {
                decode_entities(body.strip_prefix('\n').unwrap_or(body))
            } else {
                body.to_string()
            };
            if !body.is_empty() {
                dom.create_text(node, body);
            }
            let (_, after_end) = parse_end_tag(html, close)?;
            i = after_end;
            continue;
        }

        if !self_closing && !is_void_tag(&name) {
            stack.push(node);
        }
    }

    dom.initialize_form_controls();
    Ok(dom)
}

fn current_parent(stack: &[NodeId]) -> Result<NodeId> {
    stack
        .last()
        .copied()
        .ok_or_else(|| Error::HtmlParse("missing parent element".into()))
}

/// Pops open elements up to and including the nearest `tag`; a stray end
/// tag with no open counterpart is ignored.
fn close_element(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(index) = (1..stack.len())
        .rev()
        .find(|index| dom.is_tag(stack[*index], tag))
    else {
        return;
    };
    stack.truncate(index);
}

fn close_implied_elements(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let open_tag = |stack: &[NodeId]| {
        stack
            .last()
            .and_then(|node| dom.tag_name(*node))
            .map(str::to_string)
            .unwrap_or_default()
    };

    match tag {
        "li" => close_nearest_within(dom, stack, "li", &["ul", "ol", "menu"]),
        "option" | "optgroup" => {
            if open_tag(stack) == "option" {
                stack.pop();
            }
            if tag == "optgroup" && open_tag(stack) == "optgroup" {
                stack.pop();
            }
        }
        _ if closes_paragraph(tag) => {
            close_nearest_within(dom, stack, "p", &["button", "div", "section", "article"])
        }
        _ => {}
    }
}

// Closes the nearest open `tag` unless a scoping element sits above it.
fn close_nearest_within(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str, scope: &[&str]) {
    for index in (1..stack.len()).rev() {
        let node = stack[index];
        if dom.is_tag(node, tag) {
            stack.truncate(index);
            return;
        }
        if scope.iter().any(|scope_tag| dom.is_tag(node, scope_tag)) {
            return;
        }
    }
}

fn closes_paragraph(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "ul"
            | "ol"
            | "section"
            | "article"
            | "aside"
            | "header"
            | "footer"
            | "nav"
            | "form"
            | "table"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
            | "pre"
            | "blockquote"
    )
}

struct StartTag {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
    end: usize,
}

fn parse_start_tag(html: &str, at: usize) -> Result<StartTag> {
    let bytes = html.as_bytes();
    let mut i = at + 1;
    let name_start = i;
    while i < bytes.len() && is_tag_name_byte(bytes[i]) {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    if name.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = HashMap::new();
    loop {
        skip_ws(bytes, &mut i);
        match bytes.get(i) {
            None => return Err(Error::HtmlParse(format!("unclosed <{name}> start tag"))),
            Some(b'>') => {
                return Ok(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: i + 1,
                });
            }
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                return Ok(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    end: i + 2,
                });
            }
            Some(b) if !is_attr_name_byte(*b) => {
                // Skip junk such as a stray quote or slash.
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let attr_start = i;
        while i < bytes.len() && is_attr_name_byte(bytes[i]) {
            i += 1;
        }
        let attr_name = html[attr_start..i].to_ascii_lowercase();
        skip_ws(bytes, &mut i);

        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, &mut i)?
        } else {
            String::new()
        };
        // First occurrence wins, as in browsers.
        attrs.entry(attr_name).or_insert(value);
    }
}

fn parse_attr_value(html: &str, i: &mut usize) -> Result<String> {
    let bytes = html.as_bytes();
    match bytes.get(*i) {
        Some(quote @ (b'"' | b'\'')) => {
            let start = *i + 1;
            let end = bytes[start..]
                .iter()
                .position(|b| b == quote)
                .map(|offset| start + offset)
                .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?;
            *i = end + 1;
            Ok(decode_entities(&html[start..end]))
        }
        Some(_) => {
            let start = *i;
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
                *i += 1;
            }
            Ok(decode_entities(&html[start..*i]))
        }
        None => Err(Error::HtmlParse("missing attribute value".into())),
    }
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    let name_start = i;
    while i < bytes.len() && is_tag_name_byte(bytes[i]) {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    let close = find_subslice(bytes, i, b">")
        .ok_or_else(|| Error::HtmlParse(format!("unclosed </{name}> end tag")))?;
    Ok((name, close + 1))
}

fn skip_declaration(bytes: &[u8], at: usize) -> Result<usize> {
    find_subslice(bytes, at, b">")
        .map(|end| end + 1)
        .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))
}

fn find_raw_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(pos) = find_subslice(bytes, i, b"</") {
        let name_start = pos + 2;
        let name_end = name_start + tag.len();
        let name_matches = bytes
            .get(name_start..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag));
        let boundary = bytes
            .get(name_end)
            .is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
        if name_matches && boundary {
            return Some(pos);
        }
        i = pos + 2;
    }
    None
}

fn decode_entities(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&tail[..semi]).map(|ch| (ch, semi + 1)));
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "middot" => '·',
        "rarr" => '→',
        "larr" => '←',
        "pound" => '£',
        "euro" => '€',
        _ => return None,
    };
    Some(ch)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'/' || b == b'!' || b == b'?'
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'>' | b'/' | b'=' | b'"' | b'\'')
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.get(at..at + needle.len()) == Some(needle)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes() -> Result<()> {
        let dom = parse_html(
            r#"<div id="a" class="x y" data-count=150><span hidden>One &amp; two</span></div>"#,
        )?;
        let div = dom.element_by_id("a").ok_or(Error::SelectorNotFound("#a".into()))?;
        assert_eq!(dom.attr(div, "data-count").as_deref(), Some("150"));
        assert!(dom.class_contains(div, "y"));
        let span = dom.children(div)[0];
        assert_eq!(dom.attr(span, "hidden").as_deref(), Some(""));
        assert_eq!(dom.text_content(span), "One & two");
        Ok(())
    }

    #[test]
    fn implied_end_tags_close_list_items_and_options() -> Result<()> {
        let dom = parse_html(
            "<ul><li>a<li>b</ul><select><option value=1>One<option value=2 selected>Two</select>",
        )?;
        assert_eq!(dom.query_selector_all("li")?.len(), 2);
        let select = dom
            .find_first_by_tag("select")
            .ok_or(Error::SelectorNotFound("select".into()))?;
        assert_eq!(dom.children(select).len(), 2);
        assert_eq!(dom.value(select)?, "2");
        Ok(())
    }

    #[test]
    fn raw_text_elements_keep_markup_literal() -> Result<()> {
        let dom = parse_html(
            "<style>.a > .b { color: red }</style><textarea id=t>\n<b>hi</b> &lt;3</textarea>",
        )?;
        let style = dom
            .find_first_by_tag("style")
            .ok_or(Error::SelectorNotFound("style".into()))?;
        assert_eq!(dom.text_content(style), ".a > .b { color: red }");
        let textarea = dom.element_by_id("t").ok_or(Error::SelectorNotFound("#t".into()))?;
        assert_eq!(dom.value(textarea)?, "<b>hi</b> <3");
        Ok(())
    }

    #[test]
    fn comments_doctype_and_stray_end_tags_are_skipped() -> Result<()> {
        let dom = parse_html("<!DOCTYPE html><!-- note --><p>x</span></p>")?;
        assert_eq!(dom.dump_node(dom.root), "<p>x</p>");
        Ok(())
    }

    #[test]
    fn unclosed_comment_is_an_error() {
        assert!(matches!(parse_html("<!-- open"), Err(Error::HtmlParse(_))));
    }
}
