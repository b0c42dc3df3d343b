pub mod rows_io;
pub mod view_io;

use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Serializes `value` as pretty JSON into a staged file next to `path`, then
/// renames it into place. Readers see either the old file or the new one.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(".autofilter-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;

    // A failed rename drops the staged file, which removes it from disk.
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
