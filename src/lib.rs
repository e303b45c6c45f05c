// Sources:
// - https://dubeyko.com/development/FileSystems/NTFS/ntfsdoc.pdf
// - https://en.wikipedia.org/wiki/NTFS

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use log::{debug, info, warn};

use error::NtfsError;
use mft::{DataContent, FILE_RECORD_SIZE, FileInfo, FileRecord};
use pbs::PartitionBootSector;
use runs::DataRun;

pub mod error;
pub mod mft;
pub mod output;
pub mod pbs;
pub mod runs;

#[cfg(test)]
pub(crate) mod fixtures;

/// One decode session over a raw NTFS volume. The backing source is
/// opened by the caller and held for the lifetime of the session; all
/// reads are sequential seek-then-read, so no locking is involved.
#[derive(Debug)]
pub struct NtfsVolume<T: Read + Seek> {
    pub pbs: PartitionBootSector,
    pub body: T,
    mft_stream: Option<Vec<u8>>, // Materialized $MFT byte stream
}

impl<T: Read + Seek> NtfsVolume<T> {
    /// Read and validate the boot sector. A foreign signature is fatal;
    /// nothing can be recovered without valid geometry.
    pub fn new(mut body: T) -> Result<Self, NtfsError> {
        let mut sector = vec![0u8; 512];
        body.seek(SeekFrom::Start(0))?;
        body.read_exact(&mut sector)?;
        let pbs = PartitionBootSector::from_bytes(&sector)?;
        pbs.validate()?;
        if pbs.file_record_size() as usize != FILE_RECORD_SIZE {
            warn!(
                "volume declares {}-byte file records, decoding as {}",
                pbs.file_record_size(),
                FILE_RECORD_SIZE
            );
        }
        Ok(Self {
            pbs,
            body,
            mft_stream: None,
        })
    }

    /// Materialize the complete $MFT byte stream if not done yet.
    ///
    /// Record 0 describes the $MFT itself and is always readable directly
    /// at `mft_address()`; its $DATA attribute tells us where the rest of
    /// the table lives.
    fn ensure_mft(&mut self) -> Result<(), NtfsError> {
        if self.mft_stream.is_some() {
            debug!("using cached $MFT stream");
            return Ok(());
        }

        let off0 = self.pbs.mft_address();
        debug!("reading $MFT record 0 at {:#X}", off0);
        self.body.seek(SeekFrom::Start(off0))?;
        let mut buf = vec![0u8; FILE_RECORD_SIZE];
        self.body.read_exact(&mut buf)?;
        let rec0 = FileRecord::from_bytes(&buf, Some(0))?;

        let stream = match rec0.data() {
            Some(DataContent::Resident { bytes, .. }) => bytes.clone(),
            Some(DataContent::NonResident {
                runs: Some(runs), ..
            }) => {
                let runs = runs.clone();
                self.materialize_runs(&runs)?
            }
            Some(DataContent::NonResident { runs: None, .. }) | None => {
                return Err(NtfsError::MftDataMissing);
            }
        };

        info!(
            "$MFT stream materialized: {} bytes, {} record slots",
            stream.len(),
            stream.len() / FILE_RECORD_SIZE
        );
        self.mft_stream = Some(stream);
        Ok(())
    }

    /// Rebuild the byte stream a run list describes, in run order: sparse
    /// runs become zeros, mapped runs are read exactly. A short read is a
    /// `TruncatedSource` failure for the whole reconstruction.
    pub fn materialize_runs(&mut self, runs: &[DataRun]) -> Result<Vec<u8>, NtfsError> {
        let cluster_size = self.pbs.cluster_size();
        let mut out = Vec::new();

        for run in runs {
            let byte_len = (run.length_clusters * cluster_size) as usize;
            match run.start_lcn {
                None => out.extend(std::iter::repeat(0u8).take(byte_len)),
                Some(lcn) => {
                    let offset = lcn * cluster_size;
                    self.body.seek(SeekFrom::Start(offset))?;
                    let mut buf = vec![0u8; byte_len];
                    self.body.read_exact(&mut buf).map_err(|e| {
                        if e.kind() == ErrorKind::UnexpectedEof {
                            NtfsError::TruncatedSource {
                                offset,
                                wanted: byte_len,
                            }
                        } else {
                            NtfsError::Io(e)
                        }
                    })?;
                    out.extend_from_slice(&buf);
                }
            }
        }

        Ok(out)
    }

    /// The materialized $MFT stream, loading it on first use.
    pub fn load_mft(&mut self) -> Result<&[u8], NtfsError> {
        self.ensure_mft()?;
        Ok(self.mft_stream.as_deref().unwrap())
    }

    pub fn mft_records_count(&mut self) -> Result<u64, NtfsError> {
        Ok((self.load_mft()?.len() / FILE_RECORD_SIZE) as u64)
    }

    /// Decode record slot `id` from the materialized stream.
    pub fn record(&mut self, id: u64) -> Result<FileRecord, NtfsError> {
        let start = id as usize * FILE_RECORD_SIZE;
        let stream = self.load_mft()?;
        let slot = stream
            .get(start..start + FILE_RECORD_SIZE)
            .ok_or_else(|| NtfsError::InvalidRecordSize(stream.len().saturating_sub(start)))?;
        FileRecord::from_bytes(slot, Some(id))
    }

    /// Scan every record slot and project the deleted ones.
    ///
    /// Volume-level failures abort with no output; a record that fails to
    /// decode is skipped and the scan continues.
    pub fn deleted_files(&mut self) -> Result<Vec<FileInfo>, NtfsError> {
        self.ensure_mft()?;
        let stream = self.mft_stream.as_deref().unwrap();

        let mut extracted = Vec::new();
        for (id, slot) in stream.chunks_exact(FILE_RECORD_SIZE).enumerate() {
            let record = match FileRecord::from_bytes(slot, Some(id as u64)) {
                Ok(r) => r,
                Err(e) => {
                    debug!("record {} skipped: {}", id, e);
                    continue;
                }
            };
            if record.is_deleted() {
                debug!(
                    "record {} is deleted: {:?}",
                    id,
                    record.file_name().map(|f| f.name.as_str())
                );
                extracted.push(record.file_info());
            }
        }

        info!("{} deleted record(s) extracted", extracted.len());
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CLUSTER: usize = 512; // bytes_per_sector 512 * sectors_per_cluster 1

    /// A small volume: boot sector in cluster 0, $MFT at cluster 4
    /// holding two record slots (its own record plus one deleted file).
    fn synthetic_volume() -> Vec<u8> {
        let mut img = vec![0u8; 64 * 1024];
        img[..512].copy_from_slice(&fixtures::boot_sector(512, 1, 4));

        // $MFT's own record: in use, $DATA = 4 clusters starting at LCN 4.
        let mft_data = fixtures::non_resident_data_attr(&[0x11, 0x04, 0x04, 0x00], 2048);
        let rec0 = fixtures::record_with_attrs(0x01, &[mft_data]);
        img[2048..3072].copy_from_slice(&rec0);

        // Record 1: a deleted file with name, timestamps and resident data.
        let attrs = vec![
            fixtures::resident_attr(0x10, &fixtures::standard_info_content([10, 20, 30, 40])),
            fixtures::resident_attr(
                0x30,
                &fixtures::file_name_content("secret.txt", 1234, [1, 2, 3, 4]),
            ),
            fixtures::resident_attr(0x80, b"top secret"),
        ];
        let rec1 = fixtures::record_with_attrs(0x00, &attrs);
        img[3072..4096].copy_from_slice(&rec1);

        img
    }

    #[test]
    fn bootstrap_and_scan_finds_the_deleted_file() {
        let mut vol = NtfsVolume::new(Cursor::new(synthetic_volume())).unwrap();
        assert_eq!(vol.mft_records_count().unwrap(), 2);

        let files = vol.deleted_files().unwrap();
        assert_eq!(files.len(), 1);
        let info = &files[0];
        assert_eq!(info.file_name.as_deref(), Some("secret.txt"));
        assert_eq!(info.size_file_name, Some(1234));
        assert_eq!(info.size_data, Some(10));
        assert_eq!(info.non_resident, Some(0));
        assert!(info.created_time.is_some());
    }

    #[test]
    fn record_accessor_returns_each_slot() {
        let mut vol = NtfsVolume::new(Cursor::new(synthetic_volume())).unwrap();
        let rec0 = vol.record(0).unwrap();
        assert_eq!(rec0.header.flags, 0x01);
        let rec1 = vol.record(1).unwrap();
        assert!(rec1.is_deleted());
        assert!(vol.record(2).is_err());
    }

    #[test]
    fn foreign_signature_aborts_the_session() {
        let mut img = synthetic_volume();
        img[3..11].copy_from_slice(b"EXFAT   ");
        assert!(matches!(
            NtfsVolume::new(Cursor::new(img)),
            Err(NtfsError::NotNtfsVolume)
        ));
    }

    #[test]
    fn missing_mft_data_attribute_is_fatal() {
        let mut img = synthetic_volume();
        // Rewrite record 0 with no attributes at all.
        let empty = fixtures::record_with_attrs(0x01, &[]);
        img[2048..3072].copy_from_slice(&empty);
        let mut vol = NtfsVolume::new(Cursor::new(img)).unwrap();
        assert!(matches!(
            vol.deleted_files(),
            Err(NtfsError::MftDataMissing)
        ));
    }

    #[test]
    fn reconstruction_concatenates_runs_in_order() {
        let mut img = synthetic_volume();
        // Distinct patterns in clusters 1, 2 and 3.
        for (cluster, byte) in [(1usize, 0xAAu8), (2, 0xBB), (3, 0xCC)] {
            for b in &mut img[cluster * CLUSTER..(cluster + 1) * CLUSTER] {
                *b = byte;
            }
        }
        let mut vol = NtfsVolume::new(Cursor::new(img)).unwrap();

        let runs = [
            DataRun {
                length_clusters: 2,
                start_lcn: Some(2), // clusters 2 and 3
            },
            DataRun {
                length_clusters: 1,
                start_lcn: None, // sparse hole
            },
            DataRun {
                length_clusters: 1,
                start_lcn: Some(1),
            },
        ];
        let stream = vol.materialize_runs(&runs).unwrap();

        let mut expected = Vec::new();
        expected.extend(std::iter::repeat(0xBBu8).take(CLUSTER));
        expected.extend(std::iter::repeat(0xCCu8).take(CLUSTER));
        expected.extend(std::iter::repeat(0u8).take(CLUSTER));
        expected.extend(std::iter::repeat(0xAAu8).take(CLUSTER));
        assert_eq!(stream, expected);
    }

    #[test]
    fn run_past_end_of_source_is_truncated_source() {
        let mut vol = NtfsVolume::new(Cursor::new(synthetic_volume())).unwrap();
        let runs = [DataRun {
            length_clusters: 4,
            start_lcn: Some(1 << 20), // far outside the 64 KiB image
        }];
        assert!(matches!(
            vol.materialize_runs(&runs),
            Err(NtfsError::TruncatedSource { .. })
        ));
    }
}
