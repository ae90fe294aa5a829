//! Minimal NPY v1.0 codec for the arrays this tool persists.
//!
//! Exactly two layouts: little-endian f64 matrices (`<f8`, 2-d) and i64
//! vectors (`<i8`, 1-d). The writer emits v1.0 with a 64-byte-aligned
//! header; the reader also accepts v2.0 headers and ignores trailing bytes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use pathline_core::errors::StorageError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn format_err(path: &Path, message: impl Into<String>) -> StorageError {
    StorageError::NpyFormat {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn write_header<W: Write>(w: &mut W, descr: &str, shape: &str) -> std::io::Result<()> {
    let mut header =
        format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape}, }}");
    // magic + version + u16 length + header + newline, padded to 64 bytes
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let pad = (64 - unpadded % 64) % 64;
    header.push_str(&" ".repeat(pad));
    header.push('\n');

    w.write_all(MAGIC)?;
    w.write_all(&[0x01, 0x00])?;
    w.write_all(&(header.len() as u16).to_le_bytes())?;
    w.write_all(header.as_bytes())
}

/// Write a row-major f64 matrix as `<f8`, shape `(rows, cols)`.
pub fn write_f64_matrix(
    path: &Path,
    rows: usize,
    cols: usize,
    values: &[f64],
) -> Result<(), StorageError> {
    if values.len() != rows * cols {
        return Err(format_err(
            path,
            format!(
                "buffer holds {} values for shape ({rows}, {cols})",
                values.len()
            ),
        ));
    }
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut w = BufWriter::new(file);
    write_header(&mut w, "<f8", &format!("({rows}, {cols})")).map_err(|e| io_err(path, e))?;
    for v in values {
        w.write_all(&v.to_le_bytes()).map_err(|e| io_err(path, e))?;
    }
    w.flush().map_err(|e| io_err(path, e))
}

/// Write an i64 vector as `<i8`, shape `(n,)`.
pub fn write_i64_vector(path: &Path, values: &[i64]) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut w = BufWriter::new(file);
    write_header(&mut w, "<i8", &format!("({},)", values.len()))
        .map_err(|e| io_err(path, e))?;
    for v in values {
        w.write_all(&v.to_le_bytes()).map_err(|e| io_err(path, e))?;
    }
    w.flush().map_err(|e| io_err(path, e))
}

struct NpyHeader {
    descr: String,
    shape: Vec<usize>,
}

fn read_header<R: Read>(r: &mut R, path: &Path) -> Result<NpyHeader, StorageError> {
    let mut magic = [0u8; 6];
    r.read_exact(&mut magic).map_err(|e| io_err(path, e))?;
    if &magic != MAGIC {
        return Err(format_err(path, "missing NPY magic"));
    }

    let mut version = [0u8; 2];
    r.read_exact(&mut version).map_err(|e| io_err(path, e))?;
    let header_len = match version[0] {
        1 => {
            let mut b = [0u8; 2];
            r.read_exact(&mut b).map_err(|e| io_err(path, e))?;
            u16::from_le_bytes(b) as usize
        }
        2 => {
            let mut b = [0u8; 4];
            r.read_exact(&mut b).map_err(|e| io_err(path, e))?;
            u32::from_le_bytes(b) as usize
        }
        v => return Err(format_err(path, format!("unsupported NPY version {v}"))),
    };

    let mut raw = vec![0u8; header_len];
    r.read_exact(&mut raw).map_err(|e| io_err(path, e))?;
    let header = String::from_utf8_lossy(&raw);

    if header.contains("'fortran_order': True") {
        return Err(format_err(path, "fortran-order arrays are not supported"));
    }
    let descr = dict_quoted_value(&header, "descr")
        .ok_or_else(|| format_err(path, "header has no 'descr' entry"))?;
    let shape = dict_shape_value(&header)
        .ok_or_else(|| format_err(path, "header has no parsable 'shape' entry"))?;

    Ok(NpyHeader { descr, shape })
}

/// Pull the single-quoted value following `'key':` out of the header dict.
fn dict_quoted_value(header: &str, key: &str) -> Option<String> {
    let pattern = format!("'{key}'");
    let after_key = &header[header.find(&pattern)? + pattern.len()..];
    let after_colon = &after_key[after_key.find(':')? + 1..];
    let start = after_colon.find('\'')? + 1;
    let end = start + after_colon[start..].find('\'')?;
    Some(after_colon[start..end].to_string())
}

/// Parse the `(a, b, ..)` tuple following `'shape':`.
fn dict_shape_value(header: &str) -> Option<Vec<usize>> {
    let after_key = &header[header.find("'shape'")? + "'shape'".len()..];
    let open = after_key.find('(')?;
    let close = open + after_key[open..].find(')')?;
    after_key[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().ok())
        .collect()
}

/// Read a `<f8` 2-d array. Returns `(rows, cols, row-major values)`.
pub fn read_f64_matrix(path: &Path) -> Result<(usize, usize, Vec<f64>), StorageError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut r = BufReader::new(file);
    let header = read_header(&mut r, path)?;
    if header.descr != "<f8" {
        return Err(format_err(
            path,
            format!("expected dtype '<f8', found '{}'", header.descr),
        ));
    }
    let (rows, cols) = match header.shape[..] {
        [rows, cols] => (rows, cols),
        _ => {
            return Err(format_err(
                path,
                format!("expected a 2-d array, found shape {:?}", header.shape),
            ))
        }
    };

    let mut buf = vec![0u8; rows * cols * 8];
    r.read_exact(&mut buf).map_err(|e| io_err(path, e))?;
    let mut values = Vec::with_capacity(rows * cols);
    for chunk in buf.chunks_exact(8) {
        let mut b = [0u8; 8];
        b.copy_from_slice(chunk);
        values.push(f64::from_le_bytes(b));
    }
    Ok((rows, cols, values))
}

/// Read an `<i8` 1-d array.
pub fn read_i64_vector(path: &Path) -> Result<Vec<i64>, StorageError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut r = BufReader::new(file);
    let header = read_header(&mut r, path)?;
    if header.descr != "<i8" {
        return Err(format_err(
            path,
            format!("expected dtype '<i8', found '{}'", header.descr),
        ));
    }
    let n = match header.shape[..] {
        [n] => n,
        _ => {
            return Err(format_err(
                path,
                format!("expected a 1-d array, found shape {:?}", header.shape),
            ))
        }
    };

    let mut buf = vec![0u8; n * 8];
    r.read_exact(&mut buf).map_err(|e| io_err(path, e))?;
    let mut values = Vec::with_capacity(n);
    for chunk in buf.chunks_exact(8) {
        let mut b = [0u8; 8];
        b.copy_from_slice(chunk);
        values.push(i64::from_le_bytes(b));
    }
    Ok(values)
}
