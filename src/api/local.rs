use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::api::client::{ApiError, ApiResult, ImageSource};

/// [`ImageSource`] reading storage-relative paths from a local directory.
#[derive(Clone, Debug)]
pub struct DirImageSource {
    root: PathBuf,
}

impl DirImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Normalize a storage-relative path: `/` separators, no `.` segments, no absolute paths or
/// parent traversal.
pub fn normalize_rel_path(source: &str) -> ApiResult<String> {
    let s = source.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.trim_start_matches('/').split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ApiError::Decode(format!(
                "image path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(ApiError::Decode("image path must contain a file name".to_string()));
    }
    Ok(out.join("/"))
}

#[async_trait]
impl ImageSource for DirImageSource {
    async fn fetch_image(&self, path: &str) -> ApiResult<Vec<u8>> {
        let rel = normalize_rel_path(path)?;
        let full = self.root.join(Path::new(&rel));
        tokio::fs::read(&full)
            .await
            .map_err(|e| ApiError::Transport(format!("read '{}': {e}", full.display())))
    }
}
