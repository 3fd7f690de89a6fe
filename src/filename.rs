// Derives the flaky report file name from the original report's name.

/// Suffix appended to the original report name (after its `.xml` is
/// stripped) to form the flaky report name.
pub const FLAKY_SUFFIX: &str = "-FLAKY.xml";

const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Derives the flaky report file name: strips one trailing `.xml`,
/// appends `-FLAKY.xml`, then sanitizes characters illegal in file names.
pub fn flaky_report_file_name(original_file_name: &str) -> String {
    let stem = original_file_name
        .strip_suffix(".xml")
        .unwrap_or(original_file_name);
    strip_illegal_filename_chars(&format!("{}{}", stem, FLAKY_SUFFIX))
}

/// Replaces characters that are illegal in file names with underscores.
pub fn strip_illegal_filename_chars(name: &str) -> String {
    name.chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
