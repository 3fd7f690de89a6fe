// Serializes suite/case records into Surefire-compatible flaky report XML.

// External crates
use log::info;

// Standard library imports
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cdata::write_cdata_section;
use crate::dump::dump_error;
use crate::error::ReportError;
use crate::escape::{contains_illegal_xml10, escape_attribute, escape_text};
use crate::filename::flaky_report_file_name;
use crate::model::{TestCase, TestSuite};
use crate::writer::XmlWriter;

// Constants for the surefire report schema
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_SCHEMA_LOCATION: &str =
    "https://maven.apache.org/surefire/maven-surefire-plugin/xsd/surefire-test-report-3.0.xsd";
pub const XSD_VERSION: &str = "3.0";
pub const TAG_TESTSUITE: &str = "testsuite";
pub const TAG_TESTCASE: &str = "testcase";
pub const TAG_FAILURE: &str = "failure";
pub const TAG_SYSTEM_OUT: &str = "system-out";
pub const TAG_SYSTEM_ERR: &str = "system-err";

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Writes flaky reports into a reports directory, one file per call,
/// deriving each file name from the original report's name.
pub struct XmlReporter {
    reports_directory: PathBuf,
}

impl XmlReporter {
    pub fn new(reports_directory: impl Into<PathBuf>) -> Self {
        XmlReporter {
            reports_directory: reports_directory.into(),
        }
    }

    /// Writes one flaky report for `suites`.
    ///
    /// Failure to open the output file propagates; any failure after that
    /// is swallowed into the diagnostic dump and the partial file is left
    /// in place, so a reporting defect never interrupts the caller's
    /// test-completed flow.
    pub fn write_report(
        &self,
        original_report_name: &str,
        suites: &[TestSuite],
    ) -> Result<PathBuf, ReportError> {
        let path = self
            .reports_directory
            .join(flaky_report_file_name(original_report_name));
        let file = File::create(&path).map_err(|source| ReportError::Open {
            path: path.clone(),
            source,
        })?;

        self.write_to(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file), suites);
        info!("Wrote flaky report: {}", path.display());
        Ok(path)
    }

    fn write_to<W: Write>(&self, mut sink: W, suites: &[TestSuite]) {
        let result = write_suites(&mut sink, suites).and_then(|()| sink.flush());
        if let Err(e) = result {
            let e = ReportError::Write(e);
            dump_error(&e, "flaky report abandoned in place", &self.reports_directory);
        }
    }
}

/// Serializes `suites` as one XML document, in input order.
pub fn write_suites<W: Write>(sink: W, suites: &[TestSuite]) -> io::Result<()> {
    let mut writer = XmlWriter::new(sink);
    writer.write_decl()?;

    for suite in suites {
        write_suite(&mut writer, suite)?;
    }

    writer.flush()
}

fn write_suite<W: Write>(writer: &mut XmlWriter<W>, suite: &TestSuite) -> io::Result<()> {
    writer.start_element(TAG_TESTSUITE)?;
    writer.add_attribute("xmlns:xsi", XSI_NAMESPACE)?;
    writer.add_attribute("xsi:noNamespaceSchemaLocation", XSD_SCHEMA_LOCATION)?;
    writer.add_attribute("version", XSD_VERSION)?;

    let name = suite.full_class_name.as_deref().unwrap_or("");
    writer.add_attribute("name", &escape_attribute(name))?;
    writer.add_attribute("time", &suite.time_elapsed.to_string())?;
    writer.add_attribute("tests", &suite.tests.to_string())?;
    writer.add_attribute("errors", &suite.errors.to_string())?;
    writer.add_attribute("skipped", &suite.skipped.to_string())?;
    writer.add_attribute("failures", &suite.failures.to_string())?;

    for case in &suite.test_cases {
        write_case(writer, case)?;
    }

    writer.end_element()
}

fn write_case<W: Write>(writer: &mut XmlWriter<W>, case: &TestCase) -> io::Result<()> {
    writer.start_element(TAG_TESTCASE)?;

    let name = case.name.as_deref().unwrap_or("");
    writer.add_attribute("name", &escape_attribute(name))?;
    if let Some(class_name) = case.full_class_name.as_deref() {
        writer.add_attribute("classname", &escape_attribute(class_name))?;
    }
    writer.add_attribute("time", &case.time.to_string())?;

    if !case.successful {
        write_failure(writer, case)?;
    }
    write_output_element(writer, case.system_out.as_deref(), TAG_SYSTEM_OUT)?;
    write_output_element(writer, case.system_error.as_deref(), TAG_SYSTEM_ERR)?;

    writer.end_element()
}

fn write_failure<W: Write>(writer: &mut XmlWriter<W>, case: &TestCase) -> io::Result<()> {
    writer.start_element(TAG_FAILURE)?;

    add_attribute_if_not_empty(writer, "message", case.failure_message.as_deref())?;
    add_attribute_if_not_empty(writer, "type", case.failure_type.as_deref())?;

    if let Some(detail) = case.failure_detail.as_deref() {
        write_element_value(writer, detail)?;
    }

    writer.end_element()
}

fn add_attribute_if_not_empty<W: Write>(
    writer: &mut XmlWriter<W>,
    name: &str,
    value: Option<&str>,
) -> io::Result<()> {
    match value {
        Some(value) if !value.is_empty() => writer.add_attribute(name, &escape_attribute(value)),
        _ => Ok(()),
    }
}

fn write_output_element<W: Write>(
    writer: &mut XmlWriter<W>,
    content: Option<&str>,
    tag: &str,
) -> io::Result<()> {
    match content {
        Some(content) if !content.is_empty() => {
            writer.start_element(tag)?;
            writer.write_text("")?;
            write_cdata_section(writer.get_mut(), content)?;
            writer.end_element()
        }
        _ => Ok(()),
    }
}

/// Renders element text, routing clean content through the CDATA stream
/// and falling back to numeric-escaped character data only when illegal
/// codepoints force it.
fn write_element_value<W: Write>(writer: &mut XmlWriter<W>, text: &str) -> io::Result<()> {
    if contains_illegal_xml10(text) {
        writer.write_text(&escape_text(text))
    } else {
        writer.write_text("")?;
        write_cdata_section(writer.get_mut(), text)
    }
}
