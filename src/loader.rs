// Post loader: reads the content column of a CSV export.
//
// Rows are kept in file order. A row is dropped when its text is blank or
// is one of the missing-value spellings that spreadsheet and dataframe
// exports write for empty cells.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::PrepError;

/// Column holding the post text unless the caller names another.
pub const DEFAULT_CONTENT_COLUMN: &str = "post_content";

/// Text a missing value becomes once coerced to a string.
pub const MISSING_VALUE_MARKER: &str = "nan";

/// Cell spellings read as missing values (the pandas `read_csv` defaults).
/// Matched exactly, without trimming or case folding.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load non-empty posts from `path`.
///
/// Fails with `NotFound` if the file is missing and `Validation` if the file
/// can't be parsed or has no `content_column`. A completely empty file
/// yields an empty list.
pub fn load_posts(path: &Path, content_column: &str) -> Result<Vec<String>, PrepError> {
    if !path.exists() {
        return Err(PrepError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(read_failure)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        info!(path = %path.display(), "Input file is empty");
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(bytes.as_slice());

    let headers = reader.headers().map_err(read_failure)?.clone();
    let column_index = headers
        .iter()
        .position(|name| name == content_column)
        .ok_or_else(|| {
            PrepError::Validation(format!(
                "Content column '{content_column}' not found in CSV file."
            ))
        })?;

    let width = headers.len();
    let mut posts = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(read_failure)?;
        if record.len() > width {
            return Err(PrepError::Validation(format!(
                "Failed to read CSV file: row {} has {} fields, expected {}",
                row + 1,
                record.len(),
                width
            )));
        }

        // Short rows have no cell for the column: same as an empty cell
        let text = record.get(column_index).unwrap_or("");
        if is_valid_post(text) {
            posts.push(text.to_string());
        } else {
            dropped += 1;
        }
    }

    debug!(
        path = %path.display(),
        kept = posts.len(),
        dropped,
        "Loaded posts"
    );

    Ok(posts)
}

/// Whether a cell's text survives the load filter.
pub fn is_valid_post(text: &str) -> bool {
    !text.trim().is_empty() && !is_missing_value(text)
}

/// Whether a cell's raw text is one of the missing-value spellings.
pub fn is_missing_value(text: &str) -> bool {
    text == MISSING_VALUE_MARKER || NA_VALUES.contains(&text)
}

fn read_failure(e: impl std::fmt::Display) -> PrepError {
    PrepError::Validation(format!("Failed to read CSV file: {e}"))
}
