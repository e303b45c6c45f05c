// Sources:
// - https://en.wikipedia.org/wiki/NTFS

//! Partition boot sector: the first 512 bytes of the volume, carrying the
//! geometry everything else is computed from.

use byteorder::{LittleEndian, ReadBytesExt};
use log::error;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::error::NtfsError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartitionBootSector {
    pub oem_id: [u8; 8], // "NTFS    " at offset 0x03

    /* BIOS Parameter Block, 0x0B-0x23 */
    pub bytes_per_sector: u16,   // 0x0B
    pub sectors_per_cluster: u8, // 0x0D
    pub reserved_sectors: u16,   // 0x0E
    pub media_descriptor: u8,    // 0x15 (0xF8 = hard disk)
    pub sectors_per_track: u16,  // 0x18
    pub number_of_heads: u16,    // 0x1A
    pub hidden_sectors: u32,     // 0x1C

    /* Extended BPB, 0x28-0x53 */
    pub total_sectors: u64,            // 0x28
    pub mft_cluster: u64,              // 0x30
    pub mft_mirror_cluster: u64,       // 0x38
    pub clusters_per_file_record: i8,  // 0x40 (negative = 2^-n bytes)
    pub clusters_per_index_buffer: i8, // 0x44
    pub volume_serial_number: u64,     // 0x48

    pub end_of_sector_marker: u16, // 0x1FE (0xAA55)
}

impl PartitionBootSector {
    pub const NTFS_OEM_ID: [u8; 8] = *b"NTFS    ";

    /// Parse the 512-byte boot sector.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, NtfsError> {
        if buf.len() < 512 {
            return Err(NtfsError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "boot sector must be at least 512 bytes",
            )));
        }
        let mut c = Cursor::new(buf);

        c.seek(SeekFrom::Start(0x03))?;
        let mut oem_id = [0u8; 8];
        c.read_exact(&mut oem_id)?;

        let bytes_per_sector = c.read_u16::<LittleEndian>()?;
        let sectors_per_cluster = c.read_u8()?;
        let reserved_sectors = c.read_u16::<LittleEndian>()?;
        c.seek(SeekFrom::Current(5))?; // always-zero fields
        let media_descriptor = c.read_u8()?;
        c.seek(SeekFrom::Current(2))?;
        let sectors_per_track = c.read_u16::<LittleEndian>()?;
        let number_of_heads = c.read_u16::<LittleEndian>()?;
        let hidden_sectors = c.read_u32::<LittleEndian>()?;
        c.seek(SeekFrom::Current(8))?;
        let total_sectors = c.read_u64::<LittleEndian>()?;
        let mft_cluster = c.read_u64::<LittleEndian>()?;
        let mft_mirror_cluster = c.read_u64::<LittleEndian>()?;
        let clusters_per_file_record = c.read_i8()?;
        c.seek(SeekFrom::Current(3))?;
        let clusters_per_index_buffer = c.read_i8()?;
        c.seek(SeekFrom::Current(3))?;
        let volume_serial_number = c.read_u64::<LittleEndian>()?;

        c.seek(SeekFrom::Start(0x1FE))?;
        let end_of_sector_marker = c.read_u16::<LittleEndian>()?;

        Ok(Self {
            oem_id,
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            media_descriptor,
            sectors_per_track,
            number_of_heads,
            hidden_sectors,
            total_sectors,
            mft_cluster,
            mft_mirror_cluster,
            clusters_per_file_record,
            clusters_per_index_buffer,
            volume_serial_number,
            end_of_sector_marker,
        })
    }

    pub fn oem_id_is_valid(&self) -> bool {
        self.oem_id == Self::NTFS_OEM_ID
    }

    /// Reject anything that does not carry the NTFS signature. Without
    /// valid geometry no partial recovery is meaningful.
    pub fn validate(&self) -> Result<(), NtfsError> {
        if self.oem_id_is_valid() {
            Ok(())
        } else {
            error!(
                "OEM signature mismatch: {:?}",
                String::from_utf8_lossy(&self.oem_id)
            );
            Err(NtfsError::NotNtfsVolume)
        }
    }

    /// Bytes per cluster.
    pub fn cluster_size(&self) -> u64 {
        u64::from(self.bytes_per_sector) * u64::from(self.sectors_per_cluster)
    }

    /// Byte offset of the first $MFT record, relative to the volume start.
    pub fn mft_address(&self) -> u64 {
        self.cluster_size() * self.mft_cluster
    }

    /// Bytes per file-record segment. Negative values encode 2^-n bytes.
    pub fn file_record_size(&self) -> u32 {
        if self.clusters_per_file_record > 0 {
            self.clusters_per_file_record as u32
                * u32::from(self.sectors_per_cluster)
                * u32::from(self.bytes_per_sector)
        } else {
            1u32 << (-self.clusters_per_file_record as u32)
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }

    pub fn to_string(&self) -> String {
        let mut t = Table::new();
        t.add_row(row!["Partition Boot Sector"]);
        t.add_row(row![b -> "OEM ID", String::from_utf8_lossy(&self.oem_id)]);
        t.add_row(row![b -> "Bytes / Sector", self.bytes_per_sector]);
        t.add_row(row![b -> "Sectors / Cluster", self.sectors_per_cluster]);
        t.add_row(row![b -> "Cluster Size", self.cluster_size()]);
        t.add_row(row![b -> "Total Sectors", self.total_sectors]);
        t.add_row(row![b -> "$MFT Cluster", self.mft_cluster]);
        t.add_row(row![b -> "$MFT Byte Address", format!("{:#X}", self.mft_address())]);
        t.add_row(row![b -> "$MFTMirr Cluster", self.mft_mirror_cluster]);
        t.add_row(row![b -> "File Record Size", self.file_record_size()]);
        t.add_row(row![b -> "Serial Number", format!("{:#X}", self.volume_serial_number)]);
        t.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn parses_geometry_fields() {
        let sector = fixtures::boot_sector(512, 8, 4);
        let pbs = PartitionBootSector::from_bytes(&sector).unwrap();
        assert_eq!(pbs.bytes_per_sector, 512);
        assert_eq!(pbs.sectors_per_cluster, 8);
        assert_eq!(pbs.mft_cluster, 4);
        assert_eq!(pbs.cluster_size(), 4096);
        assert_eq!(pbs.mft_address(), 16384);
        assert!(pbs.validate().is_ok());
    }

    #[test]
    fn rejects_foreign_signature() {
        let mut sector = fixtures::boot_sector(512, 1, 2);
        sector[3..11].copy_from_slice(b"MSDOS5.0");
        let pbs = PartitionBootSector::from_bytes(&sector).unwrap();
        assert!(matches!(pbs.validate(), Err(NtfsError::NotNtfsVolume)));
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(PartitionBootSector::from_bytes(&[0u8; 100]).is_err());
    }

    #[test]
    fn negative_record_size_exponent() {
        let mut sector = fixtures::boot_sector(512, 8, 4);
        sector[0x40] = (-12i8) as u8;
        let pbs = PartitionBootSector::from_bytes(&sector).unwrap();
        assert_eq!(pbs.file_record_size(), 4096);
    }
}
