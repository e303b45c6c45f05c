//! Hand-built on-disk structures for tests. Layouts follow the NTFS
//! documentation; nothing here is read outside `#[cfg(test)]`.

/// 512-byte boot sector with a valid NTFS signature and the given
/// geometry. File-record size encoded as 2^10 = 1024 bytes.
pub fn boot_sector(bytes_per_sector: u16, sectors_per_cluster: u8, mft_cluster: u64) -> [u8; 512] {
    let mut s = [0u8; 512];
    s[3..11].copy_from_slice(b"NTFS    ");
    s[11..13].copy_from_slice(&bytes_per_sector.to_le_bytes());
    s[13] = sectors_per_cluster;
    s[21] = 0xF8;
    s[0x28..0x30].copy_from_slice(&0x1000u64.to_le_bytes());
    s[0x30..0x38].copy_from_slice(&mft_cluster.to_le_bytes());
    s[0x38..0x40].copy_from_slice(&(mft_cluster + 2).to_le_bytes());
    s[0x40] = (-10i8) as u8;
    s[0x44] = 1;
    s[0x48..0x50].copy_from_slice(&0xDEAD_BEEFu64.to_le_bytes());
    s[0x1FE..0x200].copy_from_slice(&0xAA55u16.to_le_bytes());
    s
}

/// Resident attribute: 24-byte header, content immediately after.
pub fn resident_attr(type_tag: u32, content: &[u8]) -> Vec<u8> {
    let total = 24 + content.len();
    let mut a = vec![0u8; total];
    a[0..4].copy_from_slice(&type_tag.to_le_bytes());
    a[4..8].copy_from_slice(&(total as u32).to_le_bytes());
    a[8] = 0; // resident
    a[16..20].copy_from_slice(&(content.len() as u32).to_le_bytes());
    a[20..22].copy_from_slice(&24u16.to_le_bytes());
    a[24..].copy_from_slice(content);
    a
}

/// Non-resident $DATA attribute: 64-byte header, run list at offset 64.
/// `raw_runs` is written verbatim, terminator included (or deliberately
/// missing).
pub fn non_resident_data_attr(raw_runs: &[u8], real_size: u64) -> Vec<u8> {
    let total = 64 + raw_runs.len();
    let mut a = vec![0u8; total];
    a[0..4].copy_from_slice(&0x80u32.to_le_bytes());
    a[4..8].copy_from_slice(&(total as u32).to_le_bytes());
    a[8] = 1; // non-resident
    a[32..34].copy_from_slice(&64u16.to_le_bytes()); // datarun offset
    a[40..48].copy_from_slice(&real_size.next_multiple_of(512).to_le_bytes());
    a[48..56].copy_from_slice(&real_size.to_le_bytes());
    a[56..64].copy_from_slice(&real_size.to_le_bytes());
    a[64..].copy_from_slice(raw_runs);
    a
}

/// $STANDARD_INFORMATION content: created/modified/mft/accessed ticks.
pub fn standard_info_content(times: [u64; 4]) -> Vec<u8> {
    let mut c = vec![0u8; 48];
    c[0..8].copy_from_slice(&times[0].to_le_bytes());
    c[8..16].copy_from_slice(&times[1].to_le_bytes());
    c[16..24].copy_from_slice(&times[2].to_le_bytes());
    c[24..32].copy_from_slice(&times[3].to_le_bytes());
    c
}

/// $FILE_NAME content with the given name (UTF-16LE), size, and
/// created/modified/mft/accessed ticks.
pub fn file_name_content(name: &str, real_size: u64, times: [u64; 4]) -> Vec<u8> {
    let units: Vec<u16> = name.encode_utf16().collect();
    let mut c = vec![0u8; 66 + units.len() * 2];
    c[8..16].copy_from_slice(&times[0].to_le_bytes());
    c[16..24].copy_from_slice(&times[1].to_le_bytes());
    c[24..32].copy_from_slice(&times[2].to_le_bytes());
    c[32..40].copy_from_slice(&times[3].to_le_bytes());
    c[40..48].copy_from_slice(&real_size.next_multiple_of(512).to_le_bytes());
    c[48..56].copy_from_slice(&real_size.to_le_bytes());
    c[64] = units.len() as u8;
    for (i, u) in units.iter().enumerate() {
        c[66 + i * 2..68 + i * 2].copy_from_slice(&u.to_le_bytes());
    }
    c
}

/// One 1 KiB record slot: FILE signature, the given flags, attributes
/// packed from offset 56, end marker after them. Update-sequence count is
/// zero so no fixups apply.
pub fn record_with_attrs(flags: u16, attrs: &[Vec<u8>]) -> [u8; 1024] {
    let mut r = [0u8; 1024];
    r[0..4].copy_from_slice(b"FILE");
    r[4..6].copy_from_slice(&48u16.to_le_bytes()); // update sequence offset
    r[6..8].copy_from_slice(&0u16.to_le_bytes()); // update sequence count
    r[16..18].copy_from_slice(&1u16.to_le_bytes()); // sequence number
    r[18..20].copy_from_slice(&1u16.to_le_bytes()); // hard links
    r[20..22].copy_from_slice(&56u16.to_le_bytes()); // first attribute
    r[22..24].copy_from_slice(&flags.to_le_bytes());
    r[28..32].copy_from_slice(&1024u32.to_le_bytes()); // allocated

    let mut pos = 56;
    for attr in attrs {
        r[pos..pos + attr.len()].copy_from_slice(attr);
        pos += attr.len();
    }
    r[pos..pos + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    pos += 4;
    r[24..28].copy_from_slice(&(pos as u32).to_le_bytes()); // bytes in use
    r
}
