// Classification of XML-1.0 legality and escaping for report text.

use std::borrow::Cow;

/// Returns `true` for codepoints that may not appear in an XML 1.0
/// document at all, not even inside a CDATA section.
///
/// See http://www.w3.org/TR/1998/REC-xml-19980210#charsets: every control
/// character below 0x20 except tab, newline and carriage return.
pub fn is_illegal_xml10(c: char) -> bool {
    (c as u32) < 32 && c != '\t' && c != '\n' && c != '\r'
}

/// Byte-level twin of [`is_illegal_xml10`], used by the CDATA stream.
pub fn is_illegal_xml10_byte(b: u8) -> bool {
    b < 32 && b != b'\t' && b != b'\n' && b != b'\r'
}

/// Checks whether `s` contains any codepoint illegal in XML 1.0.
pub fn contains_illegal_xml10(s: &str) -> bool {
    s.chars().any(is_illegal_xml10)
}

/// Escapes illegal codepoints for attribute values.
///
/// Returns the input unchanged (borrowed, no copy) when every codepoint is
/// legal; otherwise each illegal codepoint `c` is replaced by the decimal
/// numeric character reference `&#c;`. Standard XML specials are left
/// untouched here: quoting them is the element writer's job.
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    if !contains_illegal_xml10(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if is_illegal_xml10(c) {
            escaped.push_str(&format!("&#{};", c as u32));
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Escapes element text for the non-CDATA path.
///
/// Rewrites the markup specials alongside the illegal codepoints so the
/// result can be written as raw character data. Returns the input unchanged
/// when nothing needs rewriting.
///
/// An illegal codepoint `c` becomes `&amp;amp#c;`: a character reference to
/// `c` itself would be ill-formed XML 1.0, so the document carries the
/// doubly-escaped form instead and one entity decode yields the literal
/// text `&amp#c;`, the same mangling the CDATA stream produces.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>') || is_illegal_xml10(c))
    {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c if is_illegal_xml10(c) => escaped.push_str(&format!("&amp;amp#{};", c as u32)),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
