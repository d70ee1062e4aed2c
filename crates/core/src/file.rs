//! Compression and decompression drivers.
//!
//! The stream functions do the work over any reader/writer pair. The file
//! functions wrap them with atomic output: everything is written into a
//! temporary file next to the destination, which is renamed into place only
//! after the run succeeds. A failed run removes the temporary file, so no
//! complete-looking output is ever left behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::bitio::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::codec::{decode_body, encode_body};
use crate::error::{Error, Result};
use crate::header::{read_header, write_header};
use crate::metrics::{Direction, Metrics};
use crate::symbol::FrequencyCounter;
use crate::tree::CodeTree;

/// Extension appended to compressed files.
pub const COMPRESSED_EXTENSION: &str = "huf";

/// Extension appended when a decompressed name cannot be derived.
pub const FALLBACK_EXTENSION: &str = "out";

/// Compress the file at `path` into `path.huf`.
///
/// # Returns
/// Number of compressed bytes written.
pub fn compress(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metrics = compress_file(path, &compressed_path(path))?;
    Ok(metrics.compressed_bytes)
}

/// Decompress the file at `path` next to it (see [`decompressed_path`]).
///
/// # Returns
/// Number of original bytes written.
pub fn decompress(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metrics = decompress_file(path, &decompressed_path(path))?;
    Ok(metrics.raw_bytes)
}

/// Default output path for compressing `path`: `path` + `.huf`.
pub fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    PathBuf::from(name)
}

/// Default output path for decompressing `path`: `path` without its `.huf`
/// extension, or `path` + `.out` if it has none.
pub fn decompressed_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == COMPRESSED_EXTENSION) {
        path.with_extension("")
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(FALLBACK_EXTENSION);
        PathBuf::from(name)
    }
}

/// Compress `src` into `dst`, replacing `dst` only on success.
pub fn compress_file(src: &Path, dst: &Path) -> Result<Metrics> {
    tracing::debug!("compressing {} -> {}", src.display(), dst.display());

    let source = BufReader::new(File::open(src)?);
    let metrics = write_atomically(dst, |sink| compress_stream(source, sink))?;

    tracing::info!(
        "compressed {} ({} bytes) -> {} ({} bytes)",
        src.display(),
        metrics.raw_bytes,
        dst.display(),
        metrics.compressed_bytes
    );
    Ok(metrics)
}

/// Decompress `src` into `dst`, replacing `dst` only on success.
pub fn decompress_file(src: &Path, dst: &Path) -> Result<Metrics> {
    tracing::debug!("decompressing {} -> {}", src.display(), dst.display());

    let source = File::open(src)?;
    let metrics = write_atomically(dst, |sink| decompress_stream(source, sink)).map_err(|e| {
        if matches!(e, Error::Format(_)) {
            tracing::warn!("rejected {}: {}", src.display(), e);
        }
        e
    })?;

    tracing::info!(
        "decompressed {} ({} bytes) -> {} ({} bytes)",
        src.display(),
        metrics.compressed_bytes,
        dst.display(),
        metrics.raw_bytes
    );
    Ok(metrics)
}

/// Compress everything in `source` into `sink`.
///
/// The source is read twice: once to count bytes, then again from the start
/// to encode them.
///
/// # Errors
/// - `Error::EmptyInput` if the source has no bytes; nothing is written
/// - I/O errors from either side
pub fn compress_stream<R: Read + Seek, W: Write>(mut source: R, sink: W) -> Result<Metrics> {
    let mut metrics = Metrics::new(Direction::Compress);

    let mut counter = FrequencyCounter::new();
    metrics.raw_bytes = counter.observe_reader(&mut source)?;
    let model = counter.finalize();
    if model.is_empty() {
        return Err(Error::EmptyInput);
    }
    tracing::debug!(
        "frequency pass: {} bytes, {} distinct",
        model.total(),
        model.distinct_bytes()
    );

    let tree = CodeTree::build(&model)?;
    let table = CodeTable::from_tree(&tree);
    metrics.distinct_symbols = table.len();
    metrics.max_code_len = table.max_code_len();

    source.rewind()?;

    let mut writer = BitWriter::new(sink);
    metrics.header_bits = write_header(&table, &mut writer)?;
    let summary = encode_body(&mut source, &table, &mut writer)?;
    metrics.compressed_bytes = writer.bit_len().div_ceil(8);
    writer.finish()?;

    if summary.symbols != metrics.raw_bytes {
        tracing::warn!(
            "source changed between passes: counted {} bytes, encoded {}",
            metrics.raw_bytes,
            summary.symbols
        );
    }
    metrics.symbols = summary.symbols;
    metrics.body_bits = summary.body_bits;
    metrics.code_bits = summary.code_bits;

    metrics.complete();
    Ok(metrics)
}

/// Decompress a complete compressed stream from `source` into `sink`.
///
/// Bytes after the end-of-stream code's final byte are not read.
pub fn decompress_stream<R: Read, W: Write>(source: R, sink: W) -> Result<Metrics> {
    let mut metrics = Metrics::new(Direction::Decompress);
    let mut reader = BitReader::new(BufReader::new(source));

    let entries = read_header(&mut reader)?;
    let tree = CodeTree::from_codes(&entries)?;
    metrics.header_bits = reader.bits_read();
    metrics.distinct_symbols = entries.len();
    metrics.max_code_len = entries.iter().map(|e| e.code.len()).max().unwrap_or(0);

    metrics.raw_bytes = decode_body(&mut reader, &tree, sink)?;
    metrics.symbols = metrics.raw_bytes;
    metrics.body_bits = reader.bits_read() - metrics.header_bits;
    metrics.compressed_bytes = reader.bytes_consumed();

    metrics.complete();
    Ok(metrics)
}

/// Run `write` against a temporary file in `dst`'s directory and move the
/// file onto `dst` once it succeeds.
fn write_atomically<T>(
    dst: &Path,
    write: impl FnOnce(BufWriter<&mut File>) -> Result<T>,
) -> Result<T> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = scratch_file(dir)?;
    let value = write(BufWriter::new(tmp.as_file_mut()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(dst).map_err(|e| Error::Io(e.error))?;

    Ok(value)
}

/// Temporary file in `dir` that ends up with the same permissions as one
/// made by `File::create` (0666 less the umask), not tempfile's 0600.
#[cfg(unix)]
fn scratch_file(dir: &Path) -> Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Ok(Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)?)
}

#[cfg(not(unix))]
fn scratch_file(dir: &Path) -> Result<NamedTempFile> {
    Ok(Builder::new().tempfile_in(dir)?)
}
