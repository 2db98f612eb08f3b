//! Capability-scoped file reads.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Opens the directory holding `path` and returns it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("'{path}' does not name a file"))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Reads a UTF-8 file.
pub(crate) fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name)
}

/// Returns true when `path` names an existing file.
pub(crate) fn is_file(path: &Utf8Path) -> bool {
    open_parent(path).is_ok_and(|(dir, file_name)| dir.is_file(file_name))
}
