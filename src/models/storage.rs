use crate::error::{Result, StorageError};
use crate::models::{Snippet, SnippetLanguage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Persistence contract for the snippet collection.
pub trait SnippetPersistence {
    /// Loads the persisted snippets. A missing file yields an empty list.
    fn load(&self) -> Result<Vec<Snippet>>;

    fn save(&self, snippets: &[Snippet]) -> Result<()>;
}

/// Older files stored a map of language tag to raw contents.
type LegacySnippets = BTreeMap<String, Vec<String>>;

/// Storage Manager for the flat JSON snippet file
#[derive(Debug, Clone)]
pub struct StorageManager {
    data_file: PathBuf,
}

impl StorageManager {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Default location: `<data dir>/snipbox/snippets.json`
    pub fn default_data_file() -> Result<PathBuf, StorageError> {
        dirs::data_dir()
            .map(|dir| dir.join("snipbox").join("snippets.json"))
            .ok_or(StorageError::NoDataDir)
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Keeps an unreadable file next to the original so a later save does
    /// not destroy it. A backup with identical content is reused.
    fn preserve_corrupt_file(&self, content: &str) -> Option<PathBuf> {
        let file_name = self.data_file.file_name()?.to_string_lossy();
        let prefix = format!("{}.corrupt-", file_name);

        if let Some(existing) = self.find_backup(&prefix, content) {
            debug!(backup = %existing.display(), "malformed snippet file already preserved");
            return Some(existing);
        }

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup = self
            .data_file
            .with_file_name(format!("{}{}", prefix, timestamp));

        match fs::copy(&self.data_file, &backup) {
            Ok(_) => Some(backup),
            Err(err) => {
                warn!(error = %err, "could not preserve malformed snippet file");
                None
            }
        }
    }

    fn find_backup(&self, prefix: &str, content: &str) -> Option<PathBuf> {
        let dir = match self.data_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
            .map(|entry| entry.path())
            .find(|path| fs::read_to_string(path).is_ok_and(|backup| backup == content))
    }
}

impl SnippetPersistence for StorageManager {
    fn load(&self) -> Result<Vec<Snippet>> {
        if !self.data_file.exists() {
            debug!(path = %self.data_file.display(), "no snippet file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.data_file)
            .map_err(|err| StorageError::io(&self.data_file, err))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parse_error = match serde_json::from_str::<Vec<Snippet>>(&content) {
            Ok(snippets) => {
                info!(count = snippets.len(), "loaded snippets");
                return Ok(snippets);
            }
            Err(err) => err,
        };

        if let Ok(legacy) = serde_json::from_str::<LegacySnippets>(&content) {
            let snippets = migrate_legacy(legacy);
            info!(count = snippets.len(), "migrated legacy snippet file");
            return Ok(snippets);
        }

        if let Some(backup) = self.preserve_corrupt_file(&content) {
            warn!(backup = %backup.display(), "malformed snippet file preserved");
        }

        Err(StorageError::Malformed {
            path: self.data_file.clone(),
            source: parse_error,
        }
        .into())
    }

    fn save(&self, snippets: &[Snippet]) -> Result<()> {
        let persistable: Vec<&Snippet> = snippets
            .iter()
            .filter(|snippet| !snippet.content.trim().is_empty())
            .collect();
        if persistable.len() != snippets.len() {
            warn!(
                skipped = snippets.len() - persistable.len(),
                "not persisting empty snippets"
            );
        }

        let content =
            serde_json::to_string_pretty(&persistable).map_err(StorageError::Serialize)?;

        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StorageError::io(parent, err))?;
            }
        }

        // Write next to the target and rename so a failed write never
        // truncates the existing file.
        let tmp_file = self.data_file.with_extension("json.tmp");
        fs::write(&tmp_file, content).map_err(|err| StorageError::io(&tmp_file, err))?;
        fs::rename(&tmp_file, &self.data_file)
            .map_err(|err| StorageError::io(&self.data_file, err))?;

        info!(count = persistable.len(), path = %self.data_file.display(), "saved snippets");
        Ok(())
    }
}

fn migrate_legacy(legacy: LegacySnippets) -> Vec<Snippet> {
    let mut snippets = Vec::new();
    for (tag, contents) in legacy {
        let language = SnippetLanguage::from_tag(&tag);
        for content in contents {
            if content.trim().is_empty() {
                continue;
            }
            let title = format!("Snippet {}", snippets.len() + 1);
            let mut snippet = Snippet::new(title, content, language.clone());
            snippet.id = legacy_id(&tag, snippets.len(), &snippet.content);
            snippets.push(snippet);
        }
    }
    snippets
}

/// Legacy entries have no ids. Deriving one from the entry keeps it stable
/// across loads until the file is rewritten.
fn legacy_id(tag: &str, position: usize, content: &str) -> Uuid {
    let name = format!("{}\0{}\0{}", tag, position, content);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnipError;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> StorageManager {
        StorageManager::new(dir.path().join("snippets.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        let snippets = vec![
            Snippet::new("one".into(), "fn a() {}".into(), SnippetLanguage::Rust),
            Snippet::new("two".into(), "func b() {}".into(), SnippetLanguage::Go),
            Snippet::new(
                "three".into(),
                "x".into(),
                SnippetLanguage::Other("zig".into()),
            ),
        ];

        storage.save(&snippets).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded, snippets);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path().join("nested/deeper/snippets.json"));
        let snippets = vec![Snippet::new("a".into(), "a".into(), SnippetLanguage::Text)];

        storage.save(&snippets).unwrap();
        assert_eq!(storage.load().unwrap().len(), 1);
    }

    #[test]
    fn test_save_skips_empty_content() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        let snippets = vec![
            Snippet::new("a".into(), "keep".into(), SnippetLanguage::Text),
            Snippet::new("b".into(), "   ".into(), SnippetLanguage::Text),
        ];

        storage.save(&snippets).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "keep");
    }

    #[test]
    fn test_legacy_map_is_migrated() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        fs::write(
            storage.data_file(),
            r#"{"go": ["func a(){}", "func b(){}"], "bash": ["ls -la"]}"#,
        )
        .unwrap();

        let loaded = storage.load().unwrap();
        let summary: Vec<_> = loaded
            .iter()
            .map(|s| (s.language.tag(), s.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("bash", "ls -la"), ("go", "func a(){}"), ("go", "func b(){}")]
        );
        assert_eq!(loaded[2].title, "Snippet 3");
    }

    #[test]
    fn test_malformed_file_is_reported_and_preserved() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        fs::write(storage.data_file(), "{ not json").unwrap();

        let result = storage.load();
        assert!(matches!(
            result,
            Err(SnipError::Storage(StorageError::Malformed { .. }))
        ));

        let preserved = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("snippets.json.corrupt-")
            });
        assert!(preserved);
    }

    #[test]
    fn test_save_failure_is_storage_error() {
        let dir = TempDir::new().unwrap();
        // The data file path is an existing directory, so the rename fails.
        let target = dir.path().join("occupied");
        fs::create_dir_all(target.join("child")).unwrap();
        let storage = StorageManager::new(&target);
        let snippets = vec![Snippet::new("a".into(), "a".into(), SnippetLanguage::Text)];

        let result = storage.save(&snippets);
        assert!(matches!(
            result,
            Err(SnipError::Storage(StorageError::Io { .. }))
        ));
    }

    #[test]
    fn test_repeated_malformed_loads_keep_one_backup() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        fs::write(storage.data_file(), "{ not json").unwrap();

        assert!(storage.load().is_err());
        assert!(storage.load().is_err());

        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("snippets.json.corrupt-")
            })
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_legacy_ids_are_stable_across_loads() {
        let dir = TempDir::new().unwrap();
        let storage = manager_in(&dir);
        fs::write(
            storage.data_file(),
            r#"{"go": ["func a(){}", "func a(){}"], "bash": ["ls"]}"#,
        )
        .unwrap();

        let first: Vec<_> = storage.load().unwrap().iter().map(|s| s.id).collect();
        let second: Vec<_> = storage.load().unwrap().iter().map(|s| s.id).collect();

        assert_eq!(first, second);
        let unique: std::collections::HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
