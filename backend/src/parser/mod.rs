//! Survey export ingestion.
//!
//! Turns the raw text of the survey CSV export into [`SurveyResponse`]
//! records. Columns are mapped by position, never by header name, and
//! malformed rows degrade to defaulted fields instead of failing.

pub mod export;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::{SurveyResponse, COLUMN_COUNT};

pub use export::to_csv;

/// Column layout observed in a survey export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderReport {
    /// Header names, quotes removed and trimmed
    pub columns: Vec<String>,
    /// Header width with quoted commas kept inside their column
    pub header_width: usize,
    /// Columns the positional mapping expects
    pub expected: usize,
    /// Data rows with fewer fields than expected
    pub short_rows: usize,
    /// Data rows with more fields than expected
    pub long_rows: usize,
}

impl HeaderReport {
    /// True when the header and every data row have the expected width.
    pub fn is_consistent(&self) -> bool {
        self.header_width == self.expected && self.short_rows == 0 && self.long_rows == 0
    }
}

/// A decoded and parsed survey export.
#[derive(Debug, Clone)]
pub struct SurveySource {
    pub records: Vec<SurveyResponse>,
    pub encoding: String,
    pub header: HeaderReport,
}

/// Parse the full text of a survey export.
///
/// Line 0 is the header and is skipped. Blank lines are ignored.
///
/// # Example
/// ```
/// use ecoweek::parse;
///
/// let text = "Timestamp,Recycling\n2025-01-01,\"Monthly, sometimes weekly\"\n";
/// let records = parse(text);
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].recycling_frequency, "Monthly, sometimes weekly");
/// assert_eq!(records[0].consent, "");
/// ```
pub fn parse(raw: &str) -> Vec<SurveyResponse> {
    raw.split('\n')
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| SurveyResponse::from_fields(split_line(line)))
        .collect()
}

/// Split one line on commas that are outside double quotes.
///
/// Every `"` toggles the quoted state and is dropped; doubled quotes are
/// not treated as an escape. Each field is trimmed.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Split a header line on commas, removing quotes and whitespace.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|h| h.replace('"', "").trim().to_string())
        .collect()
}

/// Report how the export's layout compares to the positional mapping.
///
/// Mismatches are logged; they never change what [`parse`] returns.
pub fn inspect(raw: &str) -> HeaderReport {
    let mut lines = raw.split('\n');
    let header = lines.next().unwrap_or_default();
    let columns = parse_header(header);
    let header_width = split_line(header).len();

    let mut short_rows = 0;
    let mut long_rows = 0;
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let width = split_line(line).len();
        if width < COLUMN_COUNT {
            short_rows += 1;
        } else if width > COLUMN_COUNT {
            long_rows += 1;
        }
    }

    let report = HeaderReport {
        columns,
        header_width,
        expected: COLUMN_COUNT,
        short_rows,
        long_rows,
    };

    if header_width != COLUMN_COUNT {
        warn!(
            found = header_width,
            expected = COLUMN_COUNT,
            "survey header width differs from positional mapping"
        );
    }
    if short_rows > 0 || long_rows > 0 {
        warn!(short_rows, long_rows, "survey rows with unexpected width");
    }

    report
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always taken as UTF-8; chardet only guesses for the rest.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_some() => other.to_string(),
        other => {
            debug!(detected = other, "unsupported detected encoding, using utf-8");
            "utf-8".to_string()
        }
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// A leading byte order mark is removed. Malformed sequences are replaced.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, SourceError> {
    let codec = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| SourceError::Encoding(format!("unsupported encoding '{}'", encoding)))?;

    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        debug!(encoding, "replaced malformed sequences while decoding");
    }

    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Decode, parse and inspect an export held in memory.
pub fn load_bytes(bytes: &[u8]) -> Result<SurveySource, SourceError> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    let header = inspect(&content);
    let records = parse(&content);
    debug!(records = records.len(), %encoding, "parsed survey export");

    Ok(SurveySource {
        records,
        encoding,
        header,
    })
}

/// Read and parse a survey export from disk.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<SurveySource, SourceError> {
    let bytes = std::fs::read(path.as_ref())?;
    load_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "Timestamp,Recycling,Transport,Water,Payment,Issues,Container,Justify,Consent
2025-01-01,Always,Bike,Shorter showers;Fix leaks,Yes,Plastic waste;Climate change,Yes,Because,Yes
2025-01-02,Never,Car,,No,Plastic waste,No,,Yes";

    #[test]
    fn test_parse_sample() {
        let records = parse(SAMPLE);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, "2025-01-01");
        assert_eq!(records[0].water_conservation, "Shorter showers;Fix leaks");
        assert_eq!(records[0].justification, "Because");
        assert_eq!(records[1].water_conservation, "");
        assert_eq!(records[1].justification, "");
        assert_eq!(records[1].consent, "Yes");
    }

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let fields = split_line(r#"2025-01-01,"Monthly, sometimes weekly",Bus"#);
        assert_eq!(fields, vec!["2025-01-01", "Monthly, sometimes weekly", "Bus"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = split_line("  a , b ,c  ");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_doubled_quotes_toggle() {
        // "" opens and closes immediately, so the comma still splits
        let fields = split_line(r#"say ""hi"",there"#);
        assert_eq!(fields, vec!["say hi", "there"]);
    }

    #[test]
    fn test_unbalanced_quote_merges_rest_of_line() {
        let fields = split_line(r#"a,"b,c,d"#);
        assert_eq!(fields, vec!["a", "b,c,d"]);
    }

    #[test]
    fn test_trailing_blank_lines_skipped() {
        let text = format!("{}\n\n   \n", SAMPLE);
        assert_eq!(parse(&text).len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = SAMPLE.replace('\n', "\r\n");
        let records = parse(&text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].consent, "Yes");
    }

    #[test]
    fn test_short_row_does_not_fail() {
        let records = parse("h\n2025-01-01,Always,Bike");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transportation, "Bike");
        assert_eq!(records[0].water_conservation, "");
        assert_eq!(records[0].consent, "");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("Timestamp,Recycling").is_empty());
    }

    #[test]
    fn test_parse_header_strips_quotes() {
        let header = parse_header(r#""Timestamp", "Consent" ,Other"#);
        assert_eq!(header, vec!["Timestamp", "Consent", "Other"]);
    }

    #[test]
    fn test_inspect_consistent_sample() {
        let report = inspect(SAMPLE);

        assert_eq!(report.columns.len(), 9);
        assert_eq!(report.columns[0], "Timestamp");
        assert!(report.is_consistent());
    }

    #[test]
    fn test_inspect_flags_width_mismatch() {
        let text = "a,b,c\n1,2,3\n1,2,3,4,5,6,7,8,9,10";
        let report = inspect(text);

        assert_eq!(report.columns.len(), 3);
        assert_eq!(report.header_width, 3);
        assert_eq!(report.short_rows, 1);
        assert_eq!(report.long_rows, 1);
        assert!(!report.is_consistent());
        // Lenient parsing is unaffected
        assert_eq!(parse(text).len(), 2);
    }

    #[test]
    fn test_inspect_quoted_header_commas() {
        let text = "Timestamp,\"How often do you recycle (paper, glass)?\",c,d,e,f,g,h,i\n\
                    1,2,3,4,5,6,7,8,9";
        let report = inspect(text);

        // Naive split still breaks the quoted question apart
        assert_eq!(report.columns.len(), 10);
        assert_eq!(report.header_width, 9);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_load_bytes_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(SAMPLE.as_bytes());
        let source = load_bytes(&bytes).unwrap();

        assert_eq!(source.encoding, "utf-8");
        assert_eq!(source.header.columns[0], "Timestamp");
        assert_eq!(source.records.len(), 2);
    }

    #[test]
    fn test_load_bytes_utf8_spanish_answers() {
        let text = "Timestamp,Recycling,Transport,Water,Payment,Issues,Container,Justify,Consent\n\
                    2025-01-01,Siempre,Bus,,Sí,,No,,Yes\n";
        let source = load_bytes(text.as_bytes()).unwrap();

        assert_eq!(source.encoding, "utf-8");
        assert_eq!(source.records[0].eco_friendly_payment, "Sí");
        let stats = crate::analysis::aggregate(&source.records);
        assert_eq!(stats.payment_willingness.get("Sí"), Some(&1));
    }

    #[test]
    fn test_invalid_utf8_goes_to_detection() {
        // "Sí" in ISO-8859-1 is not valid UTF-8
        let mut bytes = b"h\n2025-01-01,Siempre,Bus,,S".to_vec();
        bytes.push(0xED);
        let source = load_bytes(&bytes).unwrap();

        assert_eq!(source.records.len(), 1);
        assert_eq!(source.records[0].transportation, "Bus");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_unknown_encoding_is_error() {
        let result = decode_content(b"abc", "klingon-7");
        assert!(matches!(result, Err(SourceError::Encoding(_))));
    }

    #[test]
    fn test_load_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ECOWEEK.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = load_source(&path).unwrap();
        assert_eq!(source.records.len(), 2);
    }

    #[test]
    fn test_load_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_source(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(SAMPLE), parse(SAMPLE));
    }

    proptest! {
        #[test]
        fn prop_one_record_per_non_blank_line(
            rows in prop::collection::vec("[a-zA-Z0-9 ,;]{0,40}", 0..20)
        ) {
            let text = format!("header\n{}", rows.join("\n"));
            let expected = rows.iter().filter(|r| !r.trim().is_empty()).count();
            prop_assert_eq!(parse(&text).len(), expected);
        }

        #[test]
        fn prop_split_line_never_panics(line in "\\PC{0,80}") {
            let fields = split_line(&line);
            prop_assert!(!fields.is_empty());
        }
    }
}
