// Sources:
// - https://dubeyko.com/development/FileSystems/NTFS/ntfsdoc.pdf
// - https://en.wikipedia.org/wiki/NTFS

use byteorder::{LittleEndian, ReadBytesExt};
use chrono::{TimeZone, Utc};
use log::{debug, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{Cursor, Seek, SeekFrom};

use crate::error::NtfsError;
use crate::runs::{DataRun, decode_dataruns};

/// Every MFT record occupies one fixed 1 KiB slot.
pub const FILE_RECORD_SIZE: usize = 1024;

/// "FILE", little-endian, at offset 0 of a live record.
pub const FILE_SIGNATURE: u32 = 0x454C_4946;

const END_MARKER: u32 = 0xFFFF_FFFF;

/// Header found at the very beginning of every **FILE** record (offset 0).
///
/// Two header generations exist; `update_sequence_offset == 42` selects the
/// older layout of the trailing update-sequence fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRecordHeader {
    pub magic: u32,
    pub update_sequence_offset: u16,
    pub update_sequence_size: u16,
    pub lsn: u64,
    pub sequence_number: u16,
    pub hard_link_count: u16,
    pub attr_offset: u16,
    pub flags: u16, // bit 0 = in use, bit 1 = directory
    pub bytes_in_use: u32,
    pub bytes_allocated: u32,
    pub ref_num: u32,
    pub ref_seq: u16,
    pub next_attr_id: u16,
    pub update_sequence_number: [u8; 2],
    pub update_sequence_array: Vec<u8>,
}

/// Common part shared by resident and non-resident attribute headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributeHeader {
    pub type_tag: u32,
    pub attr_type: AttributeType,
    pub total_length: u32,
    pub non_resident: bool,
    pub name_length: u8,
    pub name_offset: u16,
    pub flags: u16,
    pub attr_id: u16,
    pub name: Option<String>,
    pub form: AttributeForm,
}

/// The tail of the attribute header, whose shape depends on where the
/// content lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum AttributeForm {
    Resident {
        content_size: u32,
        content_offset: u16,
        indexed_flag: u8,
    },
    NonResident {
        start_vcn: u64,
        last_vcn: u64,
        datarun_offset: u16,
        // Read but never applied: compressed streams are out of scope.
        compression_unit_size: u16,
        allocated_size: u64,
        real_size: u64,
        stream_size: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AttributeType {
    StandardInformation,
    AttributeList,
    FileName,
    ObjectId,
    SecurityDescriptor,
    VolumeName,
    VolumeInformation,
    Data,
    IndexRoot,
    IndexAllocation,
    Bitmap,
    ReparsePoint,
    EaInformation,
    Ea,
    PropertySet,
    LoggedUtilityStream,
    Unknown,
    End,
}

impl From<u32> for AttributeType {
    fn from(value: u32) -> Self {
        use AttributeType::*;
        match value {
            0x10 => StandardInformation,
            0x20 => AttributeList,
            0x30 => FileName,
            0x40 => ObjectId,
            0x50 => SecurityDescriptor,
            0x60 => VolumeName,
            0x70 => VolumeInformation,
            0x80 => Data,
            0x90 => IndexRoot,
            0xA0 => IndexAllocation,
            0xB0 => Bitmap,
            0xC0 => ReparsePoint,
            0xD0 => EaInformation,
            0xE0 => Ea,
            0xF0 => PropertySet,
            0x100 => LoggedUtilityStream,
            END_MARKER => End,
            _ => Unknown,
        }
    }
}

/// Decoded $STANDARD_INFORMATION timestamps (raw FILETIME ticks).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct StandardInformation {
    pub created: u64,
    pub modified: u64,
    pub mft_modified: u64,
    pub accessed: u64,
}

impl StandardInformation {
    fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() < 32 {
            return None;
        }
        let mut c = Cursor::new(raw);
        Some(Self {
            created: c.read_u64::<LittleEndian>().ok()?,
            modified: c.read_u64::<LittleEndian>().ok()?,
            mft_modified: c.read_u64::<LittleEndian>().ok()?,
            accessed: c.read_u64::<LittleEndian>().ok()?,
        })
    }
}

/// Decoded $FILE_NAME content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileName {
    pub created: u64,
    pub modified: u64,
    pub mft_modified: u64,
    pub accessed: u64,
    pub real_size: u64,
    pub name_length: u8, // UTF-16 code units
    pub name: String,
}

impl FileName {
    fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() < 66 {
            return None;
        }
        let mut c = Cursor::new(raw);
        c.seek(SeekFrom::Start(8)).ok()?; // skip parent directory reference
        let created = c.read_u64::<LittleEndian>().ok()?;
        let modified = c.read_u64::<LittleEndian>().ok()?;
        let mft_modified = c.read_u64::<LittleEndian>().ok()?;
        let accessed = c.read_u64::<LittleEndian>().ok()?;
        c.seek(SeekFrom::Start(48)).ok()?;
        let real_size = c.read_u64::<LittleEndian>().ok()?;
        c.seek(SeekFrom::Start(64)).ok()?;
        let name_length = c.read_u8().ok()?;
        let name_raw = raw.get(66..66 + usize::from(name_length) * 2)?;
        let name = decode_utf16le(name_raw)?;
        Some(Self {
            created,
            modified,
            mft_modified,
            accessed,
            real_size,
            name_length,
            name,
        })
    }
}

/// $DATA content. The two variants read their size from different header
/// locations, matching the two on-disk header shapes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum DataContent {
    Resident {
        real_size: u32,
        bytes: Vec<u8>,
    },
    NonResident {
        real_size: u64,
        /// `None` when the run list could not be decoded; the stream is
        /// then unreconstructable but the rest of the record stands.
        runs: Option<Vec<DataRun>>,
    },
}

/// Content decoded for the three attribute types this tool consumes.
/// Everything else is classified by `AttributeHeader::attr_type` only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum AttributeContent {
    StandardInformation(StandardInformation),
    FileName(FileName),
    Data(DataContent),
    Other,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Attribute {
    pub header: AttributeHeader,
    pub content: AttributeContent,
}

/// A fully parsed 1 KiB MFT record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRecord {
    pub id: u64,
    pub header: FileRecordHeader,
    pub attributes: Vec<Attribute>,
}

/// Metadata projected out of one deleted record, in the shape the CSV
/// sink expects. Absent attributes leave their fields empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileInfo {
    #[serde(rename = "File_Name")]
    pub file_name: Option<String>,
    #[serde(rename = "Name_Length")]
    pub name_length: Option<u8>,
    #[serde(rename = "Size_Data")]
    pub size_data: Option<u64>,
    #[serde(rename = "Size_File_Name")]
    pub size_file_name: Option<u64>,
    #[serde(rename = "Created_Time")]
    pub created_time: Option<String>,
    #[serde(rename = "Modified_Time")]
    pub modified_time: Option<String>,
    #[serde(rename = "Access_Time")]
    pub access_time: Option<String>,
    #[serde(rename = "MFT_Time")]
    pub mft_time: Option<String>,
    #[serde(rename = "File_Name_Created_Time")]
    pub file_name_created_time: Option<String>,
    #[serde(rename = "File_Name_Modified_Time")]
    pub file_name_modified_time: Option<String>,
    #[serde(rename = "File_Name_Access_Time")]
    pub file_name_access_time: Option<String>,
    #[serde(rename = "File_Name_MFT_Time")]
    pub file_name_mft_time: Option<String>,
    #[serde(rename = "Non_Resident")]
    pub non_resident: Option<u8>,
    #[serde(rename = "Data_Runs")]
    pub data_runs: Option<usize>,
}

impl FileRecord {
    /// Parse one 1 KiB slot. Shorter input is `InvalidRecordSize`; a
    /// malformed attribute stops the walk but keeps what was decoded
    /// before it.
    pub fn from_bytes(raw: &[u8], identifier: Option<u64>) -> Result<Self, NtfsError> {
        if raw.len() < FILE_RECORD_SIZE {
            return Err(NtfsError::InvalidRecordSize(raw.len()));
        }
        let mut buf = raw[..FILE_RECORD_SIZE].to_vec();

        let header = parse_header(&buf)?;
        apply_fixups(
            &mut buf,
            usize::from(header.update_sequence_offset),
            usize::from(header.update_sequence_size),
        );

        let mut attributes = Vec::new();
        let mut pos = usize::from(header.attr_offset);
        while pos + 4 <= FILE_RECORD_SIZE {
            let tag = u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]);
            if tag == END_MARKER {
                break;
            }
            match parse_attribute(&buf[pos..], pos) {
                Ok(attr) => {
                    let step = attr.header.total_length as usize;
                    attributes.push(attr);
                    pos += step;
                }
                Err(e) => {
                    warn!(
                        "record {}: {}; keeping {} attribute(s)",
                        identifier.unwrap_or(0),
                        e,
                        attributes.len()
                    );
                    break;
                }
            }
        }

        Ok(FileRecord {
            id: identifier.unwrap_or(0),
            header,
            attributes,
        })
    }

    /// First attribute of the given type, if any.
    pub fn get_attribute(&self, attr_type: AttributeType) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.header.attr_type == attr_type)
    }

    pub fn file_name(&self) -> Option<&FileName> {
        match self.get_attribute(AttributeType::FileName)?.content {
            AttributeContent::FileName(ref f) => Some(f),
            _ => None,
        }
    }

    pub fn standard_information(&self) -> Option<&StandardInformation> {
        match self
            .get_attribute(AttributeType::StandardInformation)?
            .content
        {
            AttributeContent::StandardInformation(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&DataContent> {
        match self.get_attribute(AttributeType::Data)?.content {
            AttributeContent::Data(ref d) => Some(d),
            _ => None,
        }
    }

    /// A deleted (unallocated) record worth extracting: valid signature,
    /// no in-use or directory flag, and a surviving $FILE_NAME.
    pub fn is_deleted(&self) -> bool {
        self.header.magic == FILE_SIGNATURE && self.header.flags == 0 && self.file_name().is_some()
    }

    /// Project the record into the flat metadata row the sinks consume.
    pub fn file_info(&self) -> FileInfo {
        let mut info = FileInfo::default();

        if let Some(fname) = self.file_name() {
            info.file_name = Some(fname.name.clone());
            info.name_length = Some(fname.name_length);
            info.size_file_name = Some(fname.real_size);
            info.file_name_created_time = Some(filetime_to_rfc3339(fname.created));
            info.file_name_modified_time = Some(filetime_to_rfc3339(fname.modified));
            info.file_name_access_time = Some(filetime_to_rfc3339(fname.accessed));
            info.file_name_mft_time = Some(filetime_to_rfc3339(fname.mft_modified));
        }

        if let Some(std_info) = self.standard_information() {
            info.created_time = Some(filetime_to_rfc3339(std_info.created));
            info.modified_time = Some(filetime_to_rfc3339(std_info.modified));
            info.access_time = Some(filetime_to_rfc3339(std_info.accessed));
            info.mft_time = Some(filetime_to_rfc3339(std_info.mft_modified));
        }

        match self.data() {
            Some(DataContent::Resident { real_size, .. }) => {
                info.size_data = Some(u64::from(*real_size));
                info.non_resident = Some(0);
            }
            Some(DataContent::NonResident { real_size, runs }) => {
                info.size_data = Some(*real_size);
                info.non_resident = Some(1);
                info.data_runs = runs.as_ref().map(|r| r.len());
            }
            None => {}
        }

        info
    }

    /// Convert record to a human-readable table string.
    pub fn to_string(&self) -> String {
        let mut out = String::new();

        let mut hdr = Table::new();
        hdr.add_row(row!["MFT Entry Header Values"]);
        hdr.add_row(row![b -> "Record", self.id]);
        hdr.add_row(row![b -> "Sequence", self.header.sequence_number]);
        hdr.add_row(row![b -> "$LogFile Sequence Number", self.header.lsn]);
        hdr.add_row(row![b -> "Flags", record_flags_to_string(self.header.flags)]);
        hdr.add_row(row![b -> "Links", self.header.hard_link_count]);
        out.push_str(&hdr.to_string());

        let mut attrs = Table::new();
        attrs.add_row(row!["Attribute", "Name", "Status", "Size"]);
        for a in &self.attributes {
            let (status, size) = match &a.header.form {
                AttributeForm::Resident { content_size, .. } => {
                    ("Resident", u64::from(*content_size))
                }
                AttributeForm::NonResident { real_size, .. } => ("Non-resident", *real_size),
            };
            attrs.add_row(row![
                format!(
                    "{:?} (0x{:X}-#{})",
                    a.header.attr_type, a.header.type_tag, a.header.attr_id
                ),
                a.header.name.clone().unwrap_or_else(|| "N/A".to_string()),
                status,
                size
            ]);
        }
        out.push('\n');
        out.push_str(&attrs.to_string());

        if let Some(std_info) = self.standard_information() {
            let mut t = Table::new();
            t.add_row(row!["$STANDARD_INFORMATION"]);
            t.add_row(row![b -> "Created", filetime_to_rfc3339(std_info.created)]);
            t.add_row(row![b -> "File Modified", filetime_to_rfc3339(std_info.modified)]);
            t.add_row(row![b -> "MFT Modified", filetime_to_rfc3339(std_info.mft_modified)]);
            t.add_row(row![b -> "Accessed", filetime_to_rfc3339(std_info.accessed)]);
            out.push('\n');
            out.push_str(&t.to_string());
        }

        if let Some(fname) = self.file_name() {
            let mut t = Table::new();
            t.add_row(row!["$FILE_NAME"]);
            t.add_row(row![b -> "Name", fname.name.clone()]);
            t.add_row(row![b -> "Actual Size", fname.real_size]);
            t.add_row(row![b -> "Created", filetime_to_rfc3339(fname.created)]);
            t.add_row(row![b -> "Modified", filetime_to_rfc3339(fname.modified)]);
            t.add_row(row![b -> "MFT Modified", filetime_to_rfc3339(fname.mft_modified)]);
            t.add_row(row![b -> "Accessed", filetime_to_rfc3339(fname.accessed)]);
            out.push('\n');
            out.push_str(&t.to_string());
        }

        if let Some(DataContent::NonResident { real_size, runs }) = self.data() {
            let mut t = Table::new();
            t.add_row(row!["$DATA (non-resident)"]);
            t.add_row(row![b -> "Real Size", real_size]);
            match runs {
                Some(runs) => {
                    t.add_row(row![b -> "Runs", runs.len()]);
                    for (i, r) in runs.iter().enumerate() {
                        let target = match r.start_lcn {
                            Some(lcn) => format!("LCN {:#X}", lcn),
                            None => "sparse".to_string(),
                        };
                        t.add_row(row![
                            format!("Run {}", i),
                            format!("{} cluster(s) @ {}", r.length_clusters, target)
                        ]);
                    }
                }
                None => {
                    t.add_row(row![b -> "Runs", "unreconstructable (truncated run list)"]);
                }
            }
            out.push('\n');
            out.push_str(&t.to_string());
        }

        out
    }

    /// Serialize to JSON (uses `serde`).
    pub fn to_json(&self) -> Value {
        json!({
            "header": &self.header,
            "attributes": &self.attributes,
            "file_info": self.file_info(),
        })
    }
}

/*  Private helpers  */

fn parse_header(buf: &[u8]) -> Result<FileRecordHeader, NtfsError> {
    let mut c = Cursor::new(buf);
    let magic = c.read_u32::<LittleEndian>()?;
    let update_sequence_offset = c.read_u16::<LittleEndian>()?;
    let update_sequence_size = c.read_u16::<LittleEndian>()?;
    let lsn = c.read_u64::<LittleEndian>()?;
    let sequence_number = c.read_u16::<LittleEndian>()?;
    let hard_link_count = c.read_u16::<LittleEndian>()?;
    let attr_offset = c.read_u16::<LittleEndian>()?;
    let flags = c.read_u16::<LittleEndian>()?;
    let bytes_in_use = c.read_u32::<LittleEndian>()?;
    let bytes_allocated = c.read_u32::<LittleEndian>()?;
    let ref_num = c.read_u32::<LittleEndian>()?;
    c.seek(SeekFrom::Current(2))?;
    let ref_seq = c.read_u16::<LittleEndian>()?;
    let next_attr_id = c.read_u16::<LittleEndian>()?;

    // Two record-format generations place the trailing update-sequence
    // fields differently.
    let (update_sequence_number, update_sequence_array) = if update_sequence_offset == 42 {
        ([buf[44], buf[45]], buf[46..58].to_vec())
    } else {
        ([buf[50], buf[51]], buf[52..54].to_vec())
    };

    Ok(FileRecordHeader {
        magic,
        update_sequence_offset,
        update_sequence_size,
        lsn,
        sequence_number,
        hard_link_count,
        attr_offset,
        flags,
        bytes_in_use,
        bytes_allocated,
        ref_num,
        ref_seq,
        next_attr_id,
        update_sequence_number,
        update_sequence_array,
    })
}

// At the end of every 512-byte sector NTFS overwrites the last two bytes
// with the Update-Sequence Number. Deleted records frequently carry torn
// multi-sector writes, so a stale USN downgrades to a warning and the
// sector bytes stay as read.
fn apply_fixups(buf: &mut [u8], usa_offset: usize, usa_count: usize) {
    if usa_count < 2 {
        return;
    }
    if usa_offset + 2 * usa_count > buf.len() {
        warn!("USA table outside record, fixups skipped");
        return;
    }

    let usn = [buf[usa_offset], buf[usa_offset + 1]];
    for i in 1..usa_count {
        let sector_end = i * 512 - 2;
        if sector_end + 2 > buf.len() {
            break;
        }
        if buf[sector_end] != usn[0] || buf[sector_end + 1] != usn[1] {
            warn!("stale USN at sector {}, bytes left as read", i);
            continue;
        }
        let fix_pos = usa_offset + 2 * i;
        buf[sector_end] = buf[fix_pos];
        buf[sector_end + 1] = buf[fix_pos + 1];
    }
}

/// Parse one attribute starting at `buf[0]`. `record_offset` only feeds
/// diagnostics.
fn parse_attribute(buf: &[u8], record_offset: usize) -> Result<Attribute, NtfsError> {
    let malformed = |reason: &str| NtfsError::MalformedAttribute {
        offset: record_offset,
        reason: reason.to_string(),
    };

    if buf.len() < 24 {
        return Err(malformed("attribute header does not fit in record"));
    }

    let mut c = Cursor::new(buf);
    let type_tag = c.read_u32::<LittleEndian>()?;
    let total_length = c.read_u32::<LittleEndian>()?;
    let non_resident = c.read_u8()? != 0;
    let name_length = c.read_u8()?;
    let name_offset = c.read_u16::<LittleEndian>()?;
    let flags = c.read_u16::<LittleEndian>()?;
    let attr_id = c.read_u16::<LittleEndian>()?;

    if total_length == 0 {
        return Err(malformed("attribute length is zero"));
    }
    if total_length as usize > buf.len() {
        return Err(malformed("attribute overruns record"));
    }

    let name = if name_length > 0 {
        buf.get(usize::from(name_offset)..usize::from(name_offset) + usize::from(name_length) * 2)
            .and_then(decode_utf16le)
    } else {
        None
    };

    let form = if non_resident {
        if buf.len() < 64 {
            return Err(malformed("non-resident header does not fit in record"));
        }
        let start_vcn = c.read_u64::<LittleEndian>()?;
        let last_vcn = c.read_u64::<LittleEndian>()?;
        let datarun_offset = c.read_u16::<LittleEndian>()?;
        let compression_unit_size = c.read_u16::<LittleEndian>()?;
        c.seek(SeekFrom::Current(4))?;
        let allocated_size = c.read_u64::<LittleEndian>()?;
        let real_size = c.read_u64::<LittleEndian>()?;
        let stream_size = c.read_u64::<LittleEndian>()?;
        if usize::from(datarun_offset) > total_length as usize {
            return Err(malformed("datarun offset outside attribute"));
        }
        AttributeForm::NonResident {
            start_vcn,
            last_vcn,
            datarun_offset,
            compression_unit_size,
            allocated_size,
            real_size,
            stream_size,
        }
    } else {
        let content_size = c.read_u32::<LittleEndian>()?;
        let content_offset = c.read_u16::<LittleEndian>()?;
        let indexed_flag = c.read_u8()?;
        let end = usize::from(content_offset) + content_size as usize;
        if end > total_length as usize {
            return Err(malformed("resident content outside attribute"));
        }
        AttributeForm::Resident {
            content_size,
            content_offset,
            indexed_flag,
        }
    };

    let attr_type = AttributeType::from(type_tag);
    let header = AttributeHeader {
        type_tag,
        attr_type,
        total_length,
        non_resident,
        name_length,
        name_offset,
        flags,
        attr_id,
        name,
        form,
    };

    let content = decode_content(&header, buf);

    Ok(Attribute { header, content })
}

/// Decode content for the attribute types the projection consumes. The
/// resident $DATA size is read from the raw resident-size field at buffer
/// offset 16 while the non-resident size comes from the 64-bit field at
/// offset 48; the two on-disk header shapes differ and both reads are
/// kept as-is.
fn decode_content(header: &AttributeHeader, buf: &[u8]) -> AttributeContent {
    let resident_slice = || -> Option<&[u8]> {
        match header.form {
            AttributeForm::Resident {
                content_size,
                content_offset,
                ..
            } => buf.get(
                usize::from(content_offset)..usize::from(content_offset) + content_size as usize,
            ),
            AttributeForm::NonResident { .. } => None,
        }
    };

    match header.attr_type {
        AttributeType::StandardInformation => resident_slice()
            .and_then(StandardInformation::from_bytes)
            .map(AttributeContent::StandardInformation)
            .unwrap_or(AttributeContent::Other),
        AttributeType::FileName => resident_slice()
            .and_then(FileName::from_bytes)
            .map(AttributeContent::FileName)
            .unwrap_or(AttributeContent::Other),
        AttributeType::Data => match header.form {
            AttributeForm::Resident { .. } => {
                let real_size = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);
                let bytes = resident_slice().map(<[u8]>::to_vec).unwrap_or_default();
                AttributeContent::Data(DataContent::Resident { real_size, bytes })
            }
            AttributeForm::NonResident {
                datarun_offset,
                real_size,
                ..
            } => {
                let raw_runs = &buf[usize::from(datarun_offset)..header.total_length as usize];
                let runs = match decode_dataruns(raw_runs) {
                    Ok(runs) => Some(runs),
                    Err(e) => {
                        warn!("$DATA run list unusable: {}", e);
                        None
                    }
                };
                AttributeContent::Data(DataContent::NonResident { real_size, runs })
            }
        },
        _ => AttributeContent::Other,
    }
}

fn decode_utf16le(raw: &[u8]) -> Option<String> {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    match String::from_utf16(&units) {
        Ok(s) => Some(s),
        Err(_) => {
            debug!("name is not valid UTF-16, decoding lossy");
            Some(String::from_utf16_lossy(&units))
        }
    }
}

/// FILETIME (100 ns ticks since 1601-01-01) to RFC 3339.
pub fn filetime_to_rfc3339(ft: u64) -> String {
    const EPOCH_DELTA_MICROS: i64 = 11_644_473_600_000_000;
    let unix_micros = (ft / 10) as i64 - EPOCH_DELTA_MICROS;
    let secs = unix_micros.div_euclid(1_000_000);
    let nanos = unix_micros.rem_euclid(1_000_000) * 1_000;
    Utc.timestamp_opt(secs, nanos as u32)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Decode MFT record flags.
fn record_flags_to_string(flags: u16) -> String {
    let mut v = Vec::new();
    if flags & 0x0001 != 0 {
        v.push("Allocated")
    }
    if flags & 0x0002 != 0 {
        v.push("Directory")
    }
    if flags & 0x0004 != 0 {
        v.push("System")
    }
    if flags & 0x0008 != 0 {
        v.push("Bad")
    }
    if v.is_empty() {
        "Deleted".into()
    } else {
        v.join(" | ")
    }
}
