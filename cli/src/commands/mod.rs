pub mod labels;
pub mod render;

use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::Serialize;
use suitmap::{DiskSource, DocumentSource};

/// Data root given on the command line.
pub enum DataSource {
    Disk(DiskSource),
    #[cfg(feature = "download")]
    Http(suitmap::HttpSource),
}

impl DataSource {
    pub fn open(root: &str) -> Result<Self> {
        if root.starts_with("http://") || root.starts_with("https://") {
            #[cfg(feature = "download")]
            return Ok(Self::Http(suitmap::HttpSource::new(root)));
            #[cfg(not(feature = "download"))]
            anyhow::bail!("built without the `download` feature; cannot read {root}");
        }
        Ok(Self::Disk(DiskSource::new(root)))
    }
}

impl DocumentSource for DataSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        match self {
            Self::Disk(source) => source.fetch(path).await,
            #[cfg(feature = "download")]
            Self::Http(source) => source.fetch(path).await,
        }
    }
}

/// Pretty-print `value` to `output`, or stdout when none is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(file, value)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
