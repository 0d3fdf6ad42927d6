// saftq-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Atomically replace `path` with `content`.
///
/// The bytes land in a temp file in the target directory first and are
/// renamed over the destination, so report and export files are never
/// observable half-written. On any failure the old file stays intact.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    // Same directory as the target: rename must not cross filesystems.
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_ref())?;
    tmp.persist(path).map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}
