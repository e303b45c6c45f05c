//! Streaming sinks for extracted metadata: one CSV row or one JSON line
//! per deleted record.

use serde::Serialize;
use std::io::{self, Write};

use crate::mft::FileInfo;

/// Column order of the CSV report.
pub const CSV_COLUMNS: [&str; 14] = [
    "File_Name",
    "Name_Length",
    "Size_Data",
    "Size_File_Name",
    "Created_Time",
    "Modified_Time",
    "Access_Time",
    "MFT_Time",
    "File_Name_Created_Time",
    "File_Name_Modified_Time",
    "File_Name_Access_Time",
    "File_Name_MFT_Time",
    "Non_Resident",
    "Data_Runs",
];

/// CSV writer: header first, then one row per record. Absent fields
/// serialize empty.
pub struct CsvWriter<W: Write> {
    inner: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{}", CSV_COLUMNS.join(","))?;
        Ok(Self { inner })
    }

    pub fn write(&mut self, info: &FileInfo) -> io::Result<()> {
        let fields = [
            info.file_name.clone().unwrap_or_default(),
            opt_to_string(&info.name_length),
            opt_to_string(&info.size_data),
            opt_to_string(&info.size_file_name),
            info.created_time.clone().unwrap_or_default(),
            info.modified_time.clone().unwrap_or_default(),
            info.access_time.clone().unwrap_or_default(),
            info.mft_time.clone().unwrap_or_default(),
            info.file_name_created_time.clone().unwrap_or_default(),
            info.file_name_modified_time.clone().unwrap_or_default(),
            info.file_name_access_time.clone().unwrap_or_default(),
            info.file_name_mft_time.clone().unwrap_or_default(),
            opt_to_string(&info.non_resident),
            opt_to_string(&info.data_runs),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape(f)).collect();
        writeln!(self.inner, "{}", row.join(","))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// JSON Lines: one object per record, each terminated by '\n'.
pub struct JsonlWriter<W: Write> {
    inner: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn opt_to_string<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(T::to_string).unwrap_or_default()
}

// Recovered names can contain anything, separators and quotes included.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
