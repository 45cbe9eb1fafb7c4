use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{GalleryError, GalleryResult};
use crate::record::{GraphPatch, GraphRecord};

/// Flat-file store holding the whole graph collection as one JSON array
///
/// Nothing is cached: every call reads the file again, and every mutation
/// rewrites it in full. Concurrent writers are not coordinated, so the last
/// write wins.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store backed by the JSON file at `path`
    ///
    /// Nothing is touched on disk until the first load or save.
    ///
    /// # Arguments
    /// * `path` - Location of the data file; its directory is created on demand
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    /// Location of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_dir(&self) -> GalleryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Read the full collection.
    ///
    /// A missing file is an empty collection. A file that does not parse is
    /// an error and is left untouched on disk.
    pub async fn load_all(&self) -> GalleryResult<Vec<GraphRecord>> {
        self.ensure_dir().await?;

        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<GraphRecord> = serde_json::from_str(&data).map_err(GalleryError::Corrupt)?;
        log::debug!("loaded {} graphs from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Overwrite the backing file with `records`, pretty-printed.
    ///
    /// # Arguments
    /// * `records` - The full collection; whatever was on disk is replaced
    ///
    /// # Errors
    /// * `GalleryError::Encode` if the records cannot be serialized
    /// * `GalleryError::Io` if the directory or file cannot be written
    pub async fn save_all(&self, records: &[GraphRecord]) -> GalleryResult<()> {
        self.ensure_dir().await?;
        let json = serde_json::to_string_pretty(records).map_err(GalleryError::Encode)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Look up a single graph by id
    ///
    /// # Returns
    /// * `GalleryResult<Option<GraphRecord>>` - The graph, `None` if no graph has that id
    pub async fn find(&self, id: &str) -> GalleryResult<Option<GraphRecord>> {
        let records = self.load_all().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    /// Append `record` to the collection and persist it.
    pub async fn insert(&self, record: GraphRecord) -> GalleryResult<GraphRecord> {
        let mut records = self.load_all().await?;
        records.push(record.clone());
        self.save_all(&records).await?;
        log::info!("created graph {} ({})", record.id, record.title);
        Ok(record)
    }

    /// Merge `patch` into the graph with `id`. `None` when no such graph exists.
    pub async fn update(&self, id: &str, patch: GraphPatch) -> GalleryResult<Option<GraphRecord>> {
        let mut records = self.load_all().await?;
        let Some(index) = position(&records, id) else {
            return Ok(None);
        };

        records[index].apply(patch);
        self.save_all(&records).await?;
        log::info!("updated graph {}", id);
        Ok(Some(records[index].clone()))
    }

    /// Remove the graph with `id`, keeping the order of the rest.
    pub async fn remove(&self, id: &str) -> GalleryResult<Option<GraphRecord>> {
        let mut records = self.load_all().await?;
        let Some(index) = position(&records, id) else {
            return Ok(None);
        };

        let removed = records.remove(index);
        self.save_all(&records).await?;
        log::info!("deleted graph {}", id);
        Ok(Some(removed))
    }
}

/// Index of the graph with `id`, if any
pub fn position(records: &[GraphRecord], id: &str) -> Option<usize> {
    records.iter().position(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GraphDraft;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample(id: &str, tags: &[&str]) -> GraphRecord {
        let draft: GraphDraft = serde_json::from_value(json!({
            "id": id,
            "title": format!("Graph {}", id),
            "formula": "y=x^2",
            "type": "2D",
            "tags": tags,
        }))
        .unwrap();
        draft.into_record(Utc::now()).unwrap()
    }

    fn store_in(dir: &TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("data").join("graphs.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_empty_and_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let records = store.load_all().await.unwrap();

        assert!(records.is_empty());
        assert!(dir.path().join("data").is_dir());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let records = vec![sample("b", &["x"]), sample("a", &["y", "x"])];

        store.save_all(&records).await.unwrap();
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, records);

        store.save_all(&loaded).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn saved_file_is_pretty_printed_array() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save_all(&[sample("1", &[])]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"createdAt\""));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_and_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        let result = store.load_all().await;

        assert!(matches!(result, Err(GalleryError::Corrupt(_))));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn insert_update_remove_cycle() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.insert(sample("1", &["a"])).await.unwrap();
        store.insert(sample("2", &["b"])).await.unwrap();
        store.insert(sample("3", &["c"])).await.unwrap();

        let patch = serde_json::from_value(json!({ "author": "Grace" })).unwrap();
        let updated = store.update("2", patch).await.unwrap().unwrap();
        assert_eq!(updated.author, "Grace");
        assert_eq!(updated.title, "Graph 2");

        let removed = store.remove("2").await.unwrap().unwrap();
        assert_eq!(removed.id, "2");
        assert!(store.find("2").await.unwrap().is_none());

        let ids: Vec<String> = store
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn unknown_id_yields_none_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.remove("nope").await.unwrap().is_none());
        assert!(
            store
                .update("nope", GraphPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.path().exists());
    }
}
