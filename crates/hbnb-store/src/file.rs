use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Collection, ObjectStore, ReloadReport};

/// Object store persisted to a single JSON file.
///
/// The file is read once by [`reload`](ObjectStore::reload) and rewritten in
/// full by every [`persist`](ObjectStore::persist). Writes go to a temporary
/// file in the same directory which is then renamed over the target, so a
/// failed flush never leaves a half-written file behind.
pub struct FileStorage {
    /// Path to the backing file.
    path: PathBuf,
    objects: Collection,
}

impl FileStorage {
    /// Create an empty store backed by `path`. Nothing is read until
    /// [`reload`](ObjectStore::reload).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: Collection::new(),
        }
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no records are held.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Give the replacement file the backing file's current permissions,
    /// or `0644` on Unix when there is no backing file yet. Temp files are
    /// created owner-only.
    fn carry_permissions(&self, tmp: &fs::File) -> io::Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) => tmp.set_permissions(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    tmp.set_permissions(fs::Permissions::from_mode(0o644))?;
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl ObjectStore for FileStorage {
    fn all(&self) -> &Collection {
        &self.objects
    }

    fn all_mut(&mut self) -> &mut Collection {
        &mut self.objects
    }

    fn persist(&self) -> StoreResult<()> {
        let bytes = codec::encode(&self.objects)?;

        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        self.carry_permissions(tmp.as_file())?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        debug!(
            path = %self.path.display(),
            records = self.objects.len(),
            bytes = bytes.len(),
            "store flushed"
        );
        Ok(())
    }

    fn reload(&mut self) -> StoreResult<ReloadReport> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file; starting empty");
                return Ok(ReloadReport::default());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            warn!(path = %self.path.display(), "backing file is empty; starting empty");
            return Ok(ReloadReport::default());
        }

        let staged = codec::decode(&bytes)?;
        let loaded = staged.len();
        self.objects.extend(staged);

        info!(path = %self.path.display(), loaded, "store reloaded");
        Ok(ReloadReport { loaded })
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .field("record_count", &self.objects.len())
            .finish()
    }
}
