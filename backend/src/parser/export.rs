//! Write survey responses back out as CSV.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::SourceError;
use crate::models::{SurveyResponse, COLUMNS};

/// Serialize records with the canonical header, in positional column order.
///
/// Fields containing commas are quoted, so the output parses back to the
/// same values.
pub fn to_csv(records: &[SurveyResponse]) -> Result<String, SourceError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SourceError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| SourceError::Encoding(e.to_string()))
}
