//! Write-once archive rooted in a capability-scoped directory.
//!
//! Keys are relative paths of plain segments; the adapter cannot reach outside
//! its root. Objects are created with `create_new`, so an existing object is
//! reported as [`FeedbackArchiveError::AlreadyExists`] and left untouched.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::{ArchiveObject, FeedbackArchive, FeedbackArchiveError};

/// Archive adapter writing one file per object beneath a root directory.
#[derive(Clone)]
pub struct CapStdFeedbackArchive {
    root: Arc<Dir>,
}

impl CapStdFeedbackArchive {
    /// Open (creating if needed) `root` as the archive directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self::from_dir(dir))
    }

    /// Wrap an already opened directory handle.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self {
            root: Arc::new(dir),
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

fn relative_path(key: &str) -> Result<PathBuf, FeedbackArchiveError> {
    let valid = !key.is_empty() && key.split('/').all(is_plain_segment);
    if valid {
        Ok(PathBuf::from(key))
    } else {
        Err(FeedbackArchiveError::invalid_key(key))
    }
}

fn write_new(dir: &Dir, path: &Path, body: &[u8], key: &str) -> Result<(), FeedbackArchiveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        dir.create_dir_all(parent)
            .map_err(|err| FeedbackArchiveError::io(err.to_string()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = match dir.open_with(path, &options) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(FeedbackArchiveError::already_exists(key));
        }
        Err(err) => return Err(FeedbackArchiveError::io(err.to_string())),
    };
    file.write_all(body)
        .and_then(|()| file.sync_all())
        .map_err(|err| FeedbackArchiveError::io(err.to_string()))
}

#[async_trait]
impl FeedbackArchive for CapStdFeedbackArchive {
    async fn put(&self, object: &ArchiveObject) -> Result<(), FeedbackArchiveError> {
        let path = relative_path(&object.key)?;
        let root = Arc::clone(&self.root);
        let key = object.key.clone();
        let body = object.body.clone();
        tokio::task::spawn_blocking(move || write_new(&root, &path, &body, &key))
            .await
            .map_err(|err| FeedbackArchiveError::io(format!("archive task failed: {err}")))?
    }
}
