extern crate csv;

use std::fs::File;

#[derive(Debug)]
pub enum CsvError {
    OpenFileError,
    WriteError(String),
}

impl From<CsvError> for String {
    fn from(error: CsvError) -> Self {
        match error {
            CsvError::OpenFileError => "Failed to open file".to_string(),
            CsvError::WriteError(msg) => format!("Write error: {}", msg),
        }
    }
}

/// Appends the outlet discharge series as a two-column CSV, one row per
/// output time, flushed as it goes.
pub struct DischargeWriter {
    writer: csv::Writer<File>,
}

impl DischargeWriter {
    pub fn create(filename: &str) -> Result<DischargeWriter, CsvError> {
        let mut writer = csv::Writer::from_path(filename).map_err(|_| CsvError::OpenFileError)?;
        writer
            .write_record(&["Time", "Q"])
            .map_err(|e| CsvError::WriteError(e.to_string()))?;
        Ok(DischargeWriter { writer })
    }

    pub fn append(&mut self, t: f64, q: f64) -> Result<(), CsvError> {
        self.writer
            .write_record(&[format!("{}", t), format!("{}", q)])
            .map_err(|e| CsvError::WriteError(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| CsvError::WriteError(e.to_string()))
    }
}
