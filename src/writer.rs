// External crates
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

// Standard library imports
use std::io::{self, Write};

pub const XML_VERSION: &str = "1.0";
pub const XML_ENCODING: &str = "UTF-8";

/// Minimal stack-discipline XML element writer.
///
/// Start tags are buffered until the first attribute-less event so that
/// attributes can still be appended; an element closed while its start tag
/// is pending is emitted self-closing. The open-element stack guarantees
/// well-formed nesting.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    open_elements: Vec<String>,
    pending_start: Option<BytesStart<'static>>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(sink: W) -> Self {
        XmlWriter {
            writer: Writer::new(sink),
            open_elements: Vec::new(),
            pending_start: None,
        }
    }

    /// Emits the single UTF-8 document declaration.
    pub fn write_decl(&mut self) -> io::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new(
                XML_VERSION,
                Some(XML_ENCODING),
                None,
            )))
            .map_err(io::Error::other)
    }

    /// Opens an element; its start tag stays pending so attributes can
    /// still be added.
    pub fn start_element(&mut self, name: &str) -> io::Result<()> {
        self.flush_pending_start()?;
        self.pending_start = Some(BytesStart::new(name.to_owned()));
        self.open_elements.push(name.to_owned());
        Ok(())
    }

    /// Adds an attribute to the pending start tag. Valid only between
    /// `start_element` and the first text/child/`end_element`.
    ///
    /// The value is quoted and escaped here, so a numeric character
    /// reference produced upstream arrives in the document double-escaped.
    pub fn add_attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        match self.pending_start.as_mut() {
            Some(tag) => {
                tag.push_attribute((name, value));
                Ok(())
            }
            None => Err(io::Error::other(format!(
                "attribute '{}' written outside an open start tag",
                name
            ))),
        }
    }

    /// Writes already-escaped character data. A zero-length call only
    /// forces the pending start tag out, which is how the caller transitions
    /// the element into "open for content" before streaming raw bytes to
    /// the underlying sink.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.flush_pending_start()?;
        if !text.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(text.to_owned())))
                .map_err(io::Error::other)?;
        }
        Ok(())
    }

    /// Closes the innermost open element, self-closing it when no content
    /// followed the start tag.
    pub fn end_element(&mut self) -> io::Result<()> {
        let name = self
            .open_elements
            .pop()
            .ok_or_else(|| io::Error::other("end_element with no open element"))?;

        match self.pending_start.take() {
            Some(tag) => self
                .writer
                .write_event(Event::Empty(tag))
                .map_err(io::Error::other),
            None => self
                .writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(io::Error::other),
        }
    }

    /// Raw access to the underlying sink for CDATA streaming. Only
    /// meaningful after a `write_text("")` transition.
    pub fn get_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.get_mut().flush()
    }

    fn flush_pending_start(&mut self) -> io::Result<()> {
        if let Some(tag) = self.pending_start.take() {
            self.writer
                .write_event(Event::Start(tag))
                .map_err(io::Error::other)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn written<F>(build: F) -> String
    where
        F: FnOnce(&mut XmlWriter<&mut Cursor<Vec<u8>>>),
    {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = XmlWriter::new(&mut buffer);
            build(&mut writer);
        }
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_write_decl() {
        let output = written(|w| w.write_decl().unwrap());
        assert_eq!(output, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    }

    #[test]
    fn test_nested_elements() {
        let output = written(|w| {
            w.start_element("outer").unwrap();
            w.add_attribute("id", "1").unwrap();
            w.start_element("inner").unwrap();
            w.write_text("body").unwrap();
            w.end_element().unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, r#"<outer id="1"><inner>body</inner></outer>"#);
    }

    /// Element closed while its start tag is pending comes out self-closing.
    #[test]
    fn test_self_closing_when_empty() {
        let output = written(|w| {
            w.start_element("empty").unwrap();
            w.add_attribute("name", "x").unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, r#"<empty name="x"/>"#);
    }

    /// Attribute values are escaped once on write.
    #[test]
    fn test_attribute_escaping() {
        let output = written(|w| {
            w.start_element("e").unwrap();
            w.add_attribute("msg", r#"a "b" & <c>"#).unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, r#"<e msg="a &quot;b&quot; &amp; &lt;c&gt;"/>"#);
    }

    /// A numeric reference produced upstream is escaped again, matching the
    /// downstream expectation of one-decode-to-literal-text.
    #[test]
    fn test_attribute_double_escape() {
        let output = written(|w| {
            w.start_element("e").unwrap();
            w.add_attribute("msg", "&#7;").unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, r#"<e msg="&amp;#7;"/>"#);
    }

    /// Empty write_text still forces the start tag out.
    #[test]
    fn test_empty_text_opens_element() {
        let output = written(|w| {
            w.start_element("e").unwrap();
            w.write_text("").unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, "<e></e>");
    }

    #[test]
    fn test_attribute_outside_start_tag_is_error() {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = XmlWriter::new(&mut buffer);
        assert!(writer.add_attribute("a", "b").is_err());

        writer.start_element("e").unwrap();
        writer.write_text("t").unwrap();
        assert!(writer.add_attribute("late", "x").is_err());
    }

    #[test]
    fn test_end_element_without_open_is_error() {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = XmlWriter::new(&mut buffer);
        assert!(writer.end_element().is_err());
    }

    /// Raw bytes written through get_mut land after the flushed start tag.
    #[test]
    fn test_raw_sink_access() {
        let output = written(|w| {
            w.start_element("e").unwrap();
            w.write_text("").unwrap();
            w.get_mut().write_all(b"<![CDATA[raw]]>").unwrap();
            w.end_element().unwrap();
        });
        assert_eq!(output, "<e><![CDATA[raw]]></e>");
    }
}
