// src/lib.rs

pub mod cdata;
pub mod dump;
pub mod error;
pub mod escape;
pub mod filename;
pub mod model;
pub mod report;
pub mod writer;

pub use cdata::CdataSafeWriter;
pub use error::ReportError;
pub use escape::{escape_attribute, escape_text, is_illegal_xml10};
pub use filename::flaky_report_file_name;
pub use model::{TestCase, TestSuite};
pub use report::{write_suites, XmlReporter};
