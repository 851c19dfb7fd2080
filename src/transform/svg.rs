//! SVG sanitization and whitespace minification.
//!
//! Streams the document through quick-xml and drops everything that can run
//! code or pull in external content:
//!
//! - scripting and embedding elements (`script`, `foreignObject`, `iframe`, ...)
//!   together with their whole subtree, including `<style>` sheets
//! - animation elements (`set`, `animate`, ...) that target a reference,
//!   handler or style attribute
//! - `on*` event handler attributes
//! - `href` / `xlink:href` / `src` values other than `#fragment` references
//!   and raster `data:image/` URIs
//! - any attribute whose value holds a CSS `url()` other than `#fragment`,
//!   and `style` attributes with `@import` or CSS escapes
//! - comments, processing instructions and DOCTYPE (no entity definitions)
//!
//! Attribute checks run on the unescaped value, so character references
//! cannot hide a `url(` or `javascript:`.
//!
//! Whitespace-only text nodes are dropped; other text is kept verbatim.

use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event, attributes::Attribute},
};
use std::borrow::Cow;
use std::io::Cursor;

/// Elements removed together with their content.
const BLOCKED_ELEMENTS: &[&[u8]] = &[
    b"script",
    b"foreignobject",
    b"iframe",
    b"embed",
    b"object",
    b"handler",
    b"listener",
    b"style",
];

/// SMIL elements that can rewrite another element's attributes.
const ANIMATION_ELEMENTS: &[&[u8]] = &[
    b"set",
    b"animate",
    b"animatemotion",
    b"animatetransform",
];

/// Attributes holding a URI reference.
const URI_ATTRIBUTES: &[&[u8]] = &[b"href", b"src"];

/// Inline image payloads allowed in URI attributes.
const SAFE_DATA_URIS: &[&[u8]] = &[
    b"data:image/png",
    b"data:image/gif",
    b"data:image/jpeg",
    b"data:image/jpg",
    b"data:image/webp",
];

/// Sanitize and minify an SVG document.
///
/// Returns the parser error message when the input is not well-formed XML.
pub fn sanitize_svg(content: &[u8]) -> Result<Vec<u8>, String> {
    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(content.len())));
    // depth inside a blocked element, 0 when not skipping
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            format!(
                "XML parse error at position {}: {e}",
                reader.error_position()
            )
        })?;

        match event {
            Event::Start(elem) => {
                if skip_depth > 0 || is_blocked(&elem)? {
                    skip_depth += 1;
                    continue;
                }
                write(&mut writer, Event::Start(sanitize_element(&elem)?))?;
            }
            Event::Empty(elem) => {
                if skip_depth > 0 || is_blocked(&elem)? {
                    continue;
                }
                write(&mut writer, Event::Empty(sanitize_element(&elem)?))?;
            }
            Event::End(elem) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                write(&mut writer, Event::End(elem))?;
            }
            Event::Text(text) => {
                if skip_depth > 0 || text.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                write(&mut writer, Event::Text(text))?;
            }
            Event::Eof => break,
            // Comment, PI, DocType
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            // Decl, CData, entity references
            other => {
                if skip_depth == 0 {
                    write(&mut writer, other)?;
                }
            }
        }
    }

    Ok(writer.into_inner().into_inner())
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), String> {
    writer
        .write_event(event)
        .map_err(|e| format!("failed to write SVG: {e}"))
}

fn is_blocked(elem: &BytesStart<'_>) -> Result<bool, String> {
    let name = elem.local_name();
    let name = name.as_ref();
    if contains_ignore_case(BLOCKED_ELEMENTS, name) {
        return Ok(true);
    }
    if !contains_ignore_case(ANIMATION_ELEMENTS, name) {
        return Ok(false);
    }
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute: {e}"))?;
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(b"attributename") {
            let value = unescape(&attr)?;
            return Ok(is_protected_target(value.trim().as_bytes()));
        }
    }
    Ok(false)
}

/// Attributes an animation must not write to.
fn is_protected_target(name: &[u8]) -> bool {
    // `xlink:href` -> `href`
    let local = match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    };
    is_handler(local)
        || contains_ignore_case(URI_ATTRIBUTES, local)
        || local.eq_ignore_ascii_case(b"style")
}

/// Copy an element, keeping only safe attributes.
fn sanitize_element(elem: &BytesStart<'_>) -> Result<BytesStart<'static>, String> {
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in elem.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute: {e}"))?;
        let local = attr.key.local_name();
        let local = local.as_ref();
        if is_handler(local) {
            continue;
        }

        let value = unescape(&attr)?;
        let value = value.as_bytes();
        if contains_ignore_case(URI_ATTRIBUTES, local) && !is_safe_reference(value) {
            continue;
        }
        if has_external_url(value) {
            continue;
        }
        if local.eq_ignore_ascii_case(b"style")
            && (value.contains(&b'\\') || find_ignore_case(value, b"@import").is_some())
        {
            continue;
        }
        out.push_attribute(attr);
    }

    Ok(out)
}

fn unescape<'a>(attr: &Attribute<'a>) -> Result<Cow<'a, str>, String> {
    attr.unescape_value()
        .map_err(|e| format!("invalid attribute value: {e}"))
}

fn is_handler(name: &[u8]) -> bool {
    name.len() > 2 && name[..2].eq_ignore_ascii_case(b"on")
}

fn contains_ignore_case(list: &[&[u8]], name: &[u8]) -> bool {
    list.iter().any(|item| name.eq_ignore_ascii_case(item))
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Whether a CSS value references anything but a `#fragment` via `url()`.
fn has_external_url(mut value: &[u8]) -> bool {
    while let Some(i) = find_ignore_case(value, b"url(") {
        value = &value[i + 4..];
        let target = value.trim_ascii_start();
        let target = target
            .strip_prefix(b"\"")
            .or_else(|| target.strip_prefix(b"'"))
            .unwrap_or(target)
            .trim_ascii_start();
        if !target.starts_with(b"#") {
            return true;
        }
    }
    false
}

/// `#fragment` references and raster data URIs.
fn is_safe_reference(value: &[u8]) -> bool {
    let value = value.trim_ascii();
    value.starts_with(b"#")
        || SAFE_DATA_URIS.iter().any(|prefix| {
            value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(input: &str) -> String {
        String::from_utf8(sanitize_svg(input.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_removes_script_elements() {
        let out = sanitize(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script><rect width="1"/></svg>"#,
        );
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(out.contains(r#"<rect width="1"/>"#));
    }

    #[test]
    fn test_removes_nested_blocked_subtree() {
        let out = sanitize(
            "<svg><foreignObject><div><p>x</p></div></foreignObject><g><circle r=\"2\"/></g></svg>",
        );
        assert_eq!(out, r#"<svg><g><circle r="2"/></g></svg>"#);
    }

    #[test]
    fn test_removes_event_handlers() {
        let out = sanitize(r#"<svg onload="evil()"><rect ONCLICK="x()" fill="red"/></svg>"#);
        assert_eq!(out, r#"<svg><rect fill="red"/></svg>"#);
    }

    #[test]
    fn test_filters_external_references() {
        let out = sanitize(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#icon"/><use href="https://evil.example/x.svg#a"/><a href="javascript:alert(1)">t</a><image href="data:image/png;base64,AAAA"/></svg>"##,
        );
        assert!(out.contains(r##"xlink:href="#icon""##));
        assert!(!out.contains("evil.example"));
        assert!(!out.contains("javascript"));
        assert!(out.contains("data:image/png"));
        // namespace declarations are not references
        assert!(out.contains("xmlns:xlink"));
    }

    #[test]
    fn test_removes_animations_targeting_references() {
        let set = sanitize(
            r#"<svg><a><set attributeName="href" to="javascript:alert(1)"/><text>x</text></a></svg>"#,
        );
        assert_eq!(set, "<svg><a><text>x</text></a></svg>");

        let animate = sanitize(
            r#"<svg><a><animate attributeName="xlink:href" values="javascript:alert(1)"></animate><text>x</text></a></svg>"#,
        );
        assert_eq!(animate, "<svg><a><text>x</text></a></svg>");

        let handler = sanitize(r#"<svg><rect><set attributeName="onclick" to="x()"/></rect></svg>"#);
        assert_eq!(handler, "<svg><rect></rect></svg>");
    }

    #[test]
    fn test_keeps_geometry_animations() {
        let out = sanitize(
            r#"<svg><circle r="1"><animate attributeName="r" from="1" to="5" dur="1s"/></circle></svg>"#,
        );
        assert!(out.contains(r#"<animate attributeName="r" from="1" to="5" dur="1s"/>"#));
    }

    #[test]
    fn test_removes_external_css_urls() {
        let out = sanitize(
            r#"<svg><style>@import url(https://evil.example/x.css);</style><rect fill="url(https://evil.example/p.svg#g)" style="background:url(https://evil.example/i.png)" width="2"/></svg>"#,
        );
        assert_eq!(out, r#"<svg><rect width="2"/></svg>"#);
    }

    #[test]
    fn test_keeps_fragment_css_urls() {
        let out = sanitize(
            r##"<svg><rect fill="url(#grad)" clip-path="url( '#clip' )" mask="URL(&quot;#m&quot;)"/></svg>"##,
        );
        assert!(out.contains(r##"fill="url(#grad)""##));
        assert!(out.contains("clip-path"));
        assert!(out.contains("mask"));
    }

    #[test]
    fn test_escaped_values_are_checked() {
        let out = sanitize(
            r#"<svg><rect filter="&#117;rl(https://evil.example/f.svg#f)" style="fill:red;background:u\72l(x.png)"/><a href="&#106;avascript:alert(1)">t</a></svg>"#,
        );
        assert!(!out.contains("evil.example"));
        assert!(!out.contains("style"));
        assert!(!out.contains("href"));
    }

    #[test]
    fn test_minifies_whitespace_and_comments() {
        let out = sanitize(
            "<?xml version=\"1.0\"?>\n<!-- generator -->\n<svg>\n  <g>\n    <text>a &amp; b</text>\n  </g>\n</svg>\n",
        );
        assert_eq!(
            out,
            "<?xml version=\"1.0\"?><svg><g><text>a &amp; b</text></g></svg>"
        );
    }

    #[test]
    fn test_rejects_malformed_markup() {
        assert!(sanitize_svg(b"<svg><g></svg>").is_err());
    }

    #[test]
    fn test_output_is_stable() {
        let input = r#"<svg><rect onclick="x" width="3"/></svg>"#;
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
    }
}
