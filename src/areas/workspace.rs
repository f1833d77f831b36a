use anyhow::Context;
use bytes::Bytes;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// File system access for source ingestion.
///
/// Reads are capped: only bytes `[0, cap)` of a file are loaded, and
/// the caller learns whether the cap clipped anything. Raising the cap
/// later simply reads the file again with the larger cap.
#[derive(Debug, Clone)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name for a file: its final path component.
    pub fn file_name(&self, file_path: &Path) -> String {
        file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string())
    }

    /// Read up to `cap` bytes of a file.
    ///
    /// Returns the bytes and whether the file was truncated at the cap.
    pub async fn read_capped(&self, file_path: &Path, cap: usize) -> anyhow::Result<(Bytes, bool)> {
        let file_path = self.path.join(file_path);

        let file = tokio::fs::File::open(&file_path)
            .await
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        let size = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat file: {:?}", file_path))?
            .len();

        let length = (size as usize).min(cap);
        let mut buffer = Vec::with_capacity(length);
        file.take(length as u64)
            .read_to_end(&mut buffer)
            .await
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok((Bytes::from(buffer), size as usize > cap))
    }
}
