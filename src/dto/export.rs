//! Downloaded CSV export of the whole client directory.

use std::io::Write;
use std::path::Path;

/// File name used when the service does not suggest one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "clients.csv";

/// Raw CSV bytes plus the file name suggested by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Keeps only the final path component of a suggested `file_name`.
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        let file_name = safe_file_name(file_name.as_deref().unwrap_or_default());
        Self { file_name, bytes }
    }

    /// Header row of the export.
    pub fn headers(&self) -> Result<Vec<String>, csv::Error> {
        let mut reader = csv::Reader::from_reader(self.bytes.as_slice());
        Ok(reader.headers()?.iter().map(str::to_string).collect())
    }

    /// Number of data rows, excluding the header.
    pub fn row_count(&self) -> Result<usize, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(self.bytes.as_slice());
        let mut count = 0;
        for record in reader.records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    /// Writes the export to `dir`, under its suggested file name.
    ///
    /// The file always lands directly inside `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<std::path::PathBuf> {
        let path = dir.join(safe_file_name(&self.file_name));
        let mut file = std::fs::File::create(&path)?;
        file.write_all(&self.bytes)?;
        file.flush()?;
        Ok(path)
    }
}

/// Reduces a suggested name to a plain file name inside the export directory.
///
/// Directory parts are dropped; empty, `.` and `..` names fall back to
/// [`DEFAULT_EXPORT_FILE_NAME`].
fn safe_file_name(suggested: &str) -> String {
    let trimmed = suggested.trim().trim_matches('"').replace('\\', "/");
    Path::new(&trimmed)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map_or_else(|| DEFAULT_EXPORT_FILE_NAME.to_string(), str::to_string)
}

/// Decodes `%XX` escapes of an RFC 5987 extended value.
fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

/// Extracts the file name from a `Content-Disposition` header value.
///
/// The RFC 6266 `filename*=charset'lang'value` form wins over `filename=`.
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split(';').map(str::trim).collect();

    let extended = parts
        .iter()
        .find_map(|part| part.strip_prefix("filename*="))
        .and_then(|encoded| encoded.splitn(3, '\'').nth(2))
        .and_then(percent_decode);

    extended
        .or_else(|| {
            parts
                .iter()
                .find_map(|part| part.strip_prefix("filename="))
                .map(|name| name.trim_matches('"').to_string())
        })
        .filter(|name| !name.is_empty())
}
