//! Input path records.
//!
//! When no paths are given on the command line, paths are read from
//! standard input, one per record. Records end with `\n`, or with a NUL
//! byte when null-terminated I/O is enabled. Empty records are ignored.
//!
//! Every input path, from either source, has its trailing separators
//! removed (`dir///` becomes `dir`, while `/` stays `/`), so child paths
//! built during recursion never contain doubled separators.

use std::io::{self, BufRead};
use std::path::PathBuf;

/// Read path records from `reader`, split on `delimiter`.
///
/// # Example
///
/// ```
/// use dupescan::scanner::input::read_paths;
/// use std::path::PathBuf;
///
/// let input = &b"a.txt\nsome/dir/\n\n"[..];
/// let paths: Vec<PathBuf> = read_paths(input, b'\n').collect::<Result<_, _>>().unwrap();
/// assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("some/dir")]);
/// ```
pub fn read_paths<R: BufRead>(reader: R, delimiter: u8) -> impl Iterator<Item = io::Result<PathBuf>> {
    reader.split(delimiter).filter_map(|record| match record {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(Ok(path_from_bytes(bytes))),
        Err(e) => Some(Err(e)),
    })
}

/// Remove trailing separators from an input path.
#[must_use]
pub fn strip_trailing_slashes(path: PathBuf) -> PathBuf {
    path_from_bytes(path_into_bytes(path))
}

fn trim_separators(bytes: &mut Vec<u8>) {
    while bytes.len() > 1 && bytes.last().is_some_and(|&b| is_separator(b)) {
        bytes.pop();
    }
}

#[cfg(windows)]
fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

#[cfg(not(windows))]
fn is_separator(byte: u8) -> bool {
    byte == b'/'
}

#[cfg(unix)]
fn path_from_bytes(mut bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    trim_separators(&mut bytes);
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(mut bytes: Vec<u8>) -> PathBuf {
    trim_separators(&mut bytes);
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(unix)]
fn path_into_bytes(path: PathBuf) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    path.into_os_string().into_vec()
}

#[cfg(not(unix))]
fn path_into_bytes(path: PathBuf) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}
