use async_trait::async_trait;
use msglimit_core::{MsgLimitError, MsgLimitResult};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Key-value storage for extension settings.
///
/// Each extension owns one section, addressed by its key. Sections owned by
/// other extensions must survive every write.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the raw section stored under `key`, if any.
    async fn load_section(&self, key: &str) -> MsgLimitResult<Option<Value>>;

    /// Writes `section` under `key`.
    ///
    /// When both the stored and the new section are objects the keys are
    /// merged, so keys this version does not know about are kept.
    async fn save_section(&self, key: &str, section: Value) -> MsgLimitResult<()>;
}

fn merge_into(document: &mut Map<String, Value>, key: &str, section: Value) {
    match section {
        Value::Object(update) => match document.get_mut(key) {
            Some(Value::Object(existing)) => existing.extend(update),
            _ => {
                document.insert(key.to_string(), Value::Object(update));
            }
        },
        other => {
            document.insert(key.to_string(), other);
        }
    }
}

/// Settings document kept as a single pretty-printed JSON file.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Opens the store at `path`, creating the parent directory if needed.
    /// The file itself is created on the first write.
    pub async fn new(path: PathBuf) -> MsgLimitResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> MsgLimitResult<Map<String, Value>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Map::new());
        }
        let data = tokio::fs::read_to_string(&self.path).await?;
        if data.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(MsgLimitError::Settings(format!(
                "Settings file '{}' is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(MsgLimitError::Settings(format!(
                "Failed to parse settings file '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load_section(&self, key: &str) -> MsgLimitResult<Option<Value>> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn save_section(&self, key: &str, section: Value) -> MsgLimitResult<()> {
        let mut document = self.read_document().await?;
        merge_into(&mut document, key, section);
        let json = serde_json::to_string_pretty(&Value::Object(document))?;
        // write-then-rename so a crash never leaves a half-written document
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory store, for tests and for runs that must not touch disk.
#[derive(Default)]
pub struct MemorySettingsStore {
    document: Mutex<Map<String, Value>>,
    saves: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one section.
    pub fn with_section(key: &str, section: Value) -> Self {
        let store = Self::new();
        store.document.lock().insert(key.to_string(), section);
        store
    }

    /// Number of completed `save_section` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the whole document.
    pub fn document(&self) -> Map<String, Value> {
        self.document.lock().clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load_section(&self, key: &str) -> MsgLimitResult<Option<Value>> {
        Ok(self.document.lock().get(key).cloned())
    }

    async fn save_section(&self, key: &str, section: Value) -> MsgLimitResult<()> {
        merge_into(&mut self.document.lock(), key, section);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
