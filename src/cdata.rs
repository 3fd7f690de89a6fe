// CDATA-safe byte stream: keeps captured output inside a CDATA section
// without ever producing a premature terminator or an illegal byte.

use std::io::{self, Write};

use crate::escape::is_illegal_xml10_byte;

/// Opening delimiter of a CDATA section.
pub const CDATA_START: &[u8] = b"<![CDATA[";

/// Closing delimiter of a CDATA section.
pub const CDATA_END: &[u8] = b"]]>";

// Emitted in place of the '>' that would terminate the section early:
// closes the current CDATA block, opens a new one and re-emits the '>'.
const CDATA_SPLIT: &[u8] = b"]]><![CDATA[>";

/// Streaming filter that rewrites embedded CDATA terminators and bytes
/// illegal in XML 1.0. Single pass, two bytes of lookback, no buffering.
///
/// One instance wraps the sink for the duration of one element's content;
/// the lookback state starts zeroed and is never reused across elements.
pub struct CdataSafeWriter<W: Write> {
    inner: W,
    c1: u8,
    c2: u8,
}

impl<W: Write> CdataSafeWriter<W> {
    pub fn new(inner: W) -> Self {
        CdataSafeWriter {
            inner,
            c1: 0,
            c2: 0,
        }
    }

    fn is_cdata_end_block(&self, b: u8) -> bool {
        self.c1 == b']' && self.c2 == b']' && b == b'>'
    }

    fn write_byte(&mut self, b: u8) -> io::Result<()> {
        if self.is_cdata_end_block(b) {
            self.inner.write_all(CDATA_SPLIT)?;
        } else if is_illegal_xml10_byte(b) {
            // Illegal in XML 1.0 even inside CDATA. Deliberately
            // double-escaped: one entity decode yields the literal text
            // `&#N;`, never the original control byte. Downstream tooling
            // relies on this mangling; do not turn it into a plain
            // numeric character reference.
            write!(self.inner, "&amp#{};", b)?;
        } else {
            self.inner.write_all(&[b])?;
        }
        // Lookback always advances with the original byte, rewritten or not.
        self.c1 = self.c2;
        self.c2 = b;
        Ok(())
    }
}

impl<W: Write> Write for CdataSafeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.write_byte(b)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes `content` to `sink` as one complete CDATA section, routed
/// through a fresh [`CdataSafeWriter`].
pub fn write_cdata_section<W: Write>(sink: &mut W, content: &str) -> io::Result<()> {
    sink.write_all(CDATA_START)?;
    let mut safe = CdataSafeWriter::new(&mut *sink);
    safe.write_all(content.as_bytes())?;
    safe.flush()?;
    sink.write_all(CDATA_END)?;
    Ok(())
}
