use std::{fs, path::Path};

use crate::StoreError;

/// Replace `path` with `contents` so that readers see either the old or the new file, never a mix.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, contents).map_err(|e| StoreError::io(tmp, e))?;
    fs::rename(tmp, path).map_err(|e| StoreError::io(path, e))?;

    Ok(())
}

/// Read `path`, treating a missing file as absent.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
