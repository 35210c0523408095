use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::debug;

/// Name of the slot all sessions are kept in.
pub const SESSIONS_SLOT: &str = "user_sessions.json";

/// Interface for a single named storage slot. A missing slot is not an error, it simply has no
/// contents.
pub trait SlotStorage {
    /// Returns contents of the slot, or `None` if it was never written or got removed.
    fn load(&self) -> impl Future<Output = Result<Option<String>>>;

    /// Replaces contents of the slot.
    fn save(&self, contents: &str) -> impl Future<Output = Result<()>>;

    /// Removes the slot entirely.
    fn remove(&self) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> SlotStorage for T
where
    T::Target: SlotStorage,
{
    fn load(&self) -> impl Future<Output = Result<Option<String>>> {
        self.deref().load()
    }

    fn save(&self, contents: &str) -> impl Future<Output = Result<()>> {
        self.deref().save(contents)
    }

    fn remove(&self) -> impl Future<Output = Result<()>> {
        self.deref().remove()
    }
}

/// Slot backed by a file in the application directory. Reads take a shared lock and writes an
/// exclusive one, so a reader never sees a half-written file. The lock is not held between a load
/// and the following save, so two sessions finishing at the same moment can still lose one of
/// them.
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(SESSIONS_SLOT),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn overwrite(file: &mut File, contents: &str) -> Result<()> {
        file.set_len(0).await?;
        file.rewind().await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

impl SlotStorage for JsonFileSlot {
    async fn load(&self) -> Result<Option<String>> {
        async fn read(path: &Path) -> std::result::Result<String, std::io::Error> {
            debug!("Reading {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut contents = String::new();
            let result = file.read_to_string(&mut contents).await;
            file.unlock_async().await?;
            result?;
            Ok(contents)
        }

        match read(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn save(&self, contents: &str) -> Result<()> {
        debug!("Writing {} bytes into {:?}", contents.len(), self.path);
        // Truncation happens only after the lock is held.
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, contents).await;
        file.unlock_async().await?;
        result
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)?,
        }
    }
}

/// Slot kept in memory. Used where a real file would only get in the way, mostly tests.
#[derive(Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|v| v.clone())
    }

    fn replace(&self, contents: Option<String>) -> Result<()> {
        let mut slot = self
            .contents
            .lock()
            .map_err(|_| anyhow!("Memory slot lock was poisoned"))?;
        *slot = contents;
        Ok(())
    }
}

impl SlotStorage for MemorySlot {
    async fn load(&self) -> Result<Option<String>> {
        let slot = self
            .contents
            .lock()
            .map_err(|_| anyhow!("Memory slot lock was poisoned"))?;
        Ok(slot.clone())
    }

    async fn save(&self, contents: &str) -> Result<()> {
        self.replace(Some(contents.to_owned()))
    }

    async fn remove(&self) -> Result<()> {
        self.replace(None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{JsonFileSlot, MemorySlot, SlotStorage, SESSIONS_SLOT};

    #[tokio::test]
    async fn test_file_slot_missing_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path().to_owned())?;
        assert_eq!(slot.load().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_slot_overwrites_longer_contents() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path().to_owned())?;

        slot.save("[1,2,3,4,5,6,7,8,9]").await?;
        slot.save("[]").await?;

        assert_eq!(slot.load().await?.as_deref(), Some("[]"));
        assert_eq!(slot.path(), dir.path().join(SESSIONS_SLOT));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_slot_remove() -> Result<()> {
        let dir = tempdir()?;
        let slot = JsonFileSlot::new(dir.path().join("nested"))?;

        slot.save("[]").await?;
        assert!(slot.path().exists());

        slot.remove().await?;
        assert!(!slot.path().exists());
        assert_eq!(slot.load().await?, None);

        // Removing an already missing slot is fine.
        slot.remove().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_slot_through_arc() -> Result<()> {
        let slot = Arc::new(MemorySlot::default());
        let shared = slot.clone();

        shared.save("[]").await?;
        assert_eq!(slot.contents().as_deref(), Some("[]"));

        shared.remove().await?;
        assert_eq!(slot.load().await?, None);
        Ok(())
    }
}
