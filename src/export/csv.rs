//! Tabular export of the catalog

use super::{Disposition, ExportArtifact, ExportError, ExportRow};

pub const CSV_FILENAME: &str = "collections.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Header record, in column order
pub const CSV_HEADER: [&str; 3] = ["Collection ID", "Name", "Description"];

/// Render the rows as CSV into an in-memory buffer
///
/// Fields containing the delimiter, a quote or a line break are quoted.
pub fn render_csv(rows: &[ExportRow]) -> Result<ExportArtifact, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for row in rows {
        let id = row.collection_id.to_string();
        writer.write_record([id.as_str(), row.name.as_str(), row.description.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.error().to_string()))?;

    Ok(ExportArtifact {
        filename: CSV_FILENAME,
        content_type: CSV_CONTENT_TYPE,
        disposition: Disposition::Attachment,
        bytes,
    })
}
