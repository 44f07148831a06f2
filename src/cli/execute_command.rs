use crate::cli::{Cli, Commands};
use crate::pickle_engine::{Pickle, PickleSlices};
use crate::utils::format_bytes;
use memmap2::{Mmap, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Executes commands from the CLI against a pickle file.
///
/// A pickle file is zero or more default-header pickles written back to
/// back. `append` adds one pickle at the end; the read commands map the
/// file into memory and walk it with [`PickleSlices`], so no pickle is
/// copied to be inspected.
///
/// # Errors
/// - `NotFound` / `InvalidInput` if a read command targets a missing path.
/// - `InvalidInput` if an appended pickle would exceed `--max-size`.
/// - `InvalidData` if a scanned pickle exceeds `--max-size`, a pickle index
///   is out of range, or a field cannot be decoded.
pub fn execute_command(cli: &Cli) -> io::Result<()> {
    match &cli.command {
        Commands::Append { fields } => {
            let mut pickle = Pickle::new();
            for field in fields {
                field.write_into(&mut pickle);
            }

            if pickle.size() > cli.max_size {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "pickle of {} exceeds the maximum of {}",
                        format_bytes(pickle.size() as u64),
                        format_bytes(cli.max_size as u64)
                    ),
                ));
            }

            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&cli.file)?;
            pickle.write_to(&mut file)?;
            file.flush()?;

            debug!(
                "appended {} byte pickle to {}",
                pickle.size(),
                cli.file.display()
            );
            println!(
                "Appended pickle with {} field(s), {} bytes (crc32 {:08x})",
                fields.len(),
                pickle.size(),
                pickle.checksum()
            );
        }

        Commands::List => {
            let mmap = map_pickle_file(&cli.file)?;
            let scan = scan_pickles(bytes_of(&mmap), cli.max_size)?;

            println!(
                "{:<8} {:>12} {:>12} {:>12} {:>10}",
                "INDEX", "OFFSET", "TOTAL", "PAYLOAD", "CRC32"
            );
            println!("{:-<58}", ""); // Separator

            for (index, (offset, pickle)) in scan.pickles.iter().enumerate() {
                println!(
                    "{:<8} {:>12} {:>12} {:>12} {:>10}",
                    index,
                    offset,
                    pickle.size(),
                    pickle.payload_size(),
                    format!("{:08x}", pickle.checksum())
                );
            }

            if scan.pickles.is_empty() {
                println!("(no complete pickles)");
            }

            if scan.trailing_bytes > 0 {
                println!(
                    "{} trailing byte(s) do not form a complete pickle",
                    scan.trailing_bytes
                );
            }
        }

        Commands::Decode { index, kinds } => {
            let mmap = map_pickle_file(&cli.file)?;
            let scan = scan_pickles(bytes_of(&mmap), cli.max_size)?;

            let (offset, pickle) = scan.pickles.get(*index).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "pickle index {} out of range ({} pickle(s) in file)",
                        index,
                        scan.pickles.len()
                    ),
                )
            })?;

            println!("\n{:=^50}", format!(" PICKLE {} ", index));
            println!("{:<25} {}", "OFFSET:", offset);
            println!("{:<25} {} bytes", "PAYLOAD SIZE:", pickle.payload_size());
            println!("{:-<50}", ""); // Separator

            let mut iter = pickle.iter();
            for (position, kind) in kinds.iter().enumerate() {
                let value = kind.read_from(&mut iter).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "field {} ({:?}) could not be read at payload offset {}",
                            position,
                            kind,
                            iter.offset()
                        ),
                    )
                })?;
                println!("{:<25} {}", format!("FIELD {}:", position), value);
            }

            if !iter.reached_end() {
                println!("{:<25} {} bytes", "UNREAD:", iter.remaining());
            }
            println!("{:=<50}", ""); // Footer
        }

        Commands::Info => {
            let mmap = map_pickle_file(&cli.file)?;
            let bytes = bytes_of(&mmap);
            let scan = scan_pickles(bytes, cli.max_size)?;

            let largest = scan
                .pickles
                .iter()
                .map(|(_, pickle)| pickle.size())
                .max()
                .unwrap_or(0);

            println!("\n{:=^50}", " PICKLE FILE INFO ");
            println!("{:<25} {:?}", "PICKLE FILE:", cli.file);
            println!("{:-<50}", ""); // Separator

            println!("{:<25} {}", "TOTAL SIZE:", format_bytes(bytes.len() as u64));
            println!("{:<25} {}", "PICKLES:", scan.pickles.len());
            println!("{:<25} {}", "LARGEST PICKLE:", format_bytes(largest as u64));
            println!(
                "{:<25} {}",
                "TRAILING BYTES:",
                format_bytes(scan.trailing_bytes as u64)
            );

            println!("{:=<50}", ""); // Footer
        }
    }

    Ok(())
}

struct ScannedPickles<'a> {
    pickles: Vec<(usize, Pickle<'a>)>,
    trailing_bytes: usize,
}

/// Splits a pickle file into zero-copy views, rejecting any pickle larger
/// than `max_size`.
fn scan_pickles(bytes: &[u8], max_size: usize) -> io::Result<ScannedPickles<'_>> {
    let mut slices = PickleSlices::new(bytes);
    let mut pickles = Vec::new();

    for (offset, pickle) in slices.by_ref() {
        if pickle.size() > max_size {
            warn!(
                "pickle at offset {} is {} bytes, over the {} byte limit",
                offset,
                pickle.size(),
                max_size
            );
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "pickle at offset {} exceeds the maximum of {}",
                    offset,
                    format_bytes(max_size as u64)
                ),
            ));
        }
        pickles.push((offset, pickle));
    }

    let trailing_bytes = slices.remainder().len();
    if trailing_bytes > 0 {
        warn!(
            "{} trailing byte(s) after offset {} do not form a complete pickle",
            trailing_bytes,
            slices.offset()
        );
    }

    Ok(ScannedPickles {
        pickles,
        trailing_bytes,
    })
}

/// Maps an existing pickle file read-only. Empty files are not mapped.
///
/// A missing path is `NotFound`. A directory or other non-file path is
/// `InvalidInput`.
///
/// # Safety
/// - This function uses an **unsafe** operation (`memmap2::MmapOptions::map`).
///   The file must not be truncated by another process while the mapping
///   is alive.
fn map_pickle_file(path: &Path) -> io::Result<Option<Mmap>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => io::Error::new(
            io::ErrorKind::NotFound,
            format!("no pickle file at '{}'", path.display()),
        ),
        _ => err,
    })?;

    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' holds no pickles: not a regular file", path.display()),
        ));
    }
    if metadata.len() == 0 {
        return Ok(None);
    }

    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(Some(mmap))
}

fn bytes_of(mmap: &Option<Mmap>) -> &[u8] {
    mmap.as_deref().unwrap_or(&[])
}
