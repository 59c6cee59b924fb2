//! File-based interchange with externally precomputed suffix arrays.
//!
//! An input file holds the symbol sequence as its first line. Next to it, a
//! file named `sa_<input file name>` holds the suffix array as exactly
//! `length` little-endian `i32` values. Trailing bytes past the last value
//! are ignored.

use crate::error::{Error, Result};
use crate::pipeline::{Analysis, CidAnalyzer};
use crate::suffix_array::SuffixArray;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Width of one encoded suffix-array entry.
pub const ENTRY_BYTES: usize = 4;

const PREFIX: &str = "sa_";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Returns the suffix-array file paired with `input`.
pub fn suffix_array_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{PREFIX}{name}"))
}

/// Reads the first line of `path` as raw symbols, without its `\n` terminator.
///
/// Every other byte, `\r` included, is a symbol.
pub fn read_sequence(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut line = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut line)
        .map_err(io_error(path))?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    debug!(path = %path.display(), len = line.len(), "sequence read");
    Ok(line)
}

/// Reads `length` suffix-array entries from `path`.
///
/// Fails with [`Error::ShortRead`] reporting the bytes actually read when the
/// file is too short.
pub fn read_suffix_array(path: &Path, length: usize) -> Result<Vec<u32>> {
    let expected = length * ENTRY_BYTES;
    let file = File::open(path).map_err(io_error(path))?;
    let mut bytes = Vec::with_capacity(expected);
    let read = BufReader::new(file)
        .take(expected as u64)
        .read_to_end(&mut bytes)
        .map_err(io_error(path))?;
    debug!(path = %path.display(), read, expected, "suffix array file read");
    if read < expected {
        return Err(Error::ShortRead {
            path: path.to_path_buf(),
            expected,
            read,
        });
    }

    bytes
        .chunks_exact(ENTRY_BYTES)
        .enumerate()
        .map(|(rank, chunk)| {
            let value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            u32::try_from(value).map_err(|_| {
                Error::invariant(format!("negative suffix array entry {value} at rank {rank}"))
            })
        })
        .collect()
}

/// Writes `sa` in the interchange encoding.
pub fn write_suffix_array(path: &Path, sa: &SuffixArray) -> Result<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    for &pos in sa.as_slice() {
        let value = i32::try_from(pos).map_err(|_| {
            Error::invariant(format!("position {pos} does not fit a 32-bit signed entry"))
        })?;
        writer
            .write_all(&value.to_le_bytes())
            .map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))?;
    Ok(())
}

/// Loads a sequence and its paired suffix array, validating the array.
pub fn load(input: &Path) -> Result<(Vec<u8>, SuffixArray)> {
    let text = read_sequence(input)?;
    if text.is_empty() {
        return Err(Error::empty_sequence());
    }
    let raw = read_suffix_array(&suffix_array_path(input), text.len())?;
    let sa = SuffixArray::from_raw(&text, raw)?;
    Ok((text, sa))
}

/// Runs the pipeline on a sequence file and its paired suffix-array file.
pub fn analyze_file(input: &Path, analyzer: &CidAnalyzer) -> Result<Analysis> {
    let (text, sa) = load(input)?;
    analyzer.analyze_with(&text, &sa)
}
