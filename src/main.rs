use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};

use clap::{Arg, ArgAction, Command, value_parser};
use clap_num::maybe_hex;
use exhume_body::{Body, BodySlice};
use log::{debug, error, info};
use undelete_ntfs::NtfsVolume;
use undelete_ntfs::output::{CsvWriter, JsonlWriter};

fn main() {
    let matches = Command::new("undelete_ntfs")
        .version("0.1.0")
        .author("ForensicXlab")
        .about("Recover deleted file metadata from a raw NTFS volume image.")
        .arg(
            Arg::new("body")
                .short('b')
                .long("body")
                .value_parser(value_parser!(String))
                .required(true)
                .help("The path to the volume image to scan."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(value_parser!(String))
                .required(false)
                .help("The format of the file, either 'raw' or 'ewf'."),
        )
        .arg(
            Arg::new("offset")
                .short('o')
                .long("offset")
                .value_parser(maybe_hex::<u64>)
                .requires("size")
                .help("The NTFS partition starts at this address (decimal or hex)."),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_parser(maybe_hex::<u64>)
                .requires("offset")
                .help("The size of the NTFS partition in sectors (decimal or hex)."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_parser(value_parser!(String))
                .default_value("deleted_files.csv")
                .help("Where to write the deleted-record report."),
        )
        .arg(
            Arg::new("pbs")
                .long("pbs")
                .action(ArgAction::SetTrue)
                .help("Display the partition boot sector information and exit."),
        )
        .arg(
            Arg::new("record")
                .long("record")
                .value_parser(maybe_hex::<u64>)
                .help("Display one MFT record instead of running the scan."),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output as JSON (JSONL for the scan report)."),
        )
        .arg(
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("info")
                .help("Set the log verbosity level"),
        )
        .get_matches();

    // Initialize logger.
    let log_level_str = matches.get_one::<String>("log_level").unwrap();
    let level_filter = match log_level_str.as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new().filter_level(level_filter).init();

    let file_path = matches.get_one::<String>("body").unwrap();
    let auto = String::from("auto");
    let format = matches.get_one::<String>("format").unwrap_or(&auto);

    let mut body = Body::new(file_path.to_owned(), format);
    debug!("Created Body from '{}'", file_path);

    // The volume either fills the image or sits at --offset/--size inside
    // a full disk image.
    match matches.get_one::<u64>("offset").copied() {
        Some(offset) => {
            let size = matches.get_one::<u64>("size").copied().unwrap();
            let partition_size = size * body.get_sector_size() as u64;
            let mut slice = match BodySlice::new(&mut body, offset, partition_size) {
                Ok(sl) => sl,
                Err(e) => {
                    error!("Could not create BodySlice: {}", e);
                    return;
                }
            };
            run(&mut slice, &matches);
        }
        None => run(&mut body, &matches),
    }
}

fn run<T: Read + Seek>(source: T, matches: &clap::ArgMatches) {
    let show_pbs = matches.get_flag("pbs");
    let json_output = matches.get_flag("json");
    let record_id = matches.get_one::<u64>("record").copied();
    let output_path = matches.get_one::<String>("output").unwrap();

    let mut volume = match NtfsVolume::new(source) {
        Ok(vol) => vol,
        Err(e) => {
            error!("Couldn't open NTFS volume: {}", e);
            return;
        }
    };

    if show_pbs {
        if json_output {
            match serde_json::to_string_pretty(&volume.pbs.to_json()) {
                Ok(s) => println!("{}", s),
                Err(e) => error!("Error serializing PBS to JSON: {}", e),
            }
        } else {
            println!("{}", volume.pbs.to_string());
        }
        return;
    }

    if let Some(id) = record_id {
        match volume.record(id) {
            Ok(record) => {
                if json_output {
                    println!("{}", record.to_json());
                } else {
                    println!("{}", record.to_string());
                }
            }
            Err(e) => error!("Could not decode record {}: {}", id, e),
        }
        return;
    }

    let files = match volume.deleted_files() {
        Ok(files) => files,
        Err(e) => {
            error!("Scan failed: {}", e);
            return;
        }
    };

    if files.is_empty() {
        info!("No deleted file metadata found.");
        return;
    }

    let out = match File::create(output_path) {
        Ok(f) => BufWriter::new(f),
        Err(e) => {
            error!("Cannot create '{}': {}", output_path, e);
            return;
        }
    };

    let written = if json_output {
        write_jsonl(out, &files)
    } else {
        write_csv(out, &files)
    };
    match written {
        Ok(()) => println!("{} deleted record(s) written to {}", files.len(), output_path),
        Err(e) => error!("Cannot write report: {}", e),
    }
}

fn write_csv<W: Write>(out: W, files: &[undelete_ntfs::mft::FileInfo]) -> std::io::Result<()> {
    let mut w = CsvWriter::new(out)?;
    for info in files {
        w.write(info)?;
    }
    w.flush()
}

fn write_jsonl<W: Write>(out: W, files: &[undelete_ntfs::mft::FileInfo]) -> std::io::Result<()> {
    let mut w = JsonlWriter::new(out);
    for info in files {
        w.write(info)?;
    }
    w.flush()
}
