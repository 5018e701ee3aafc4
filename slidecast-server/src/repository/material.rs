//! Material Repository
//!
//! The content store owns materials; the pipeline only reads them and writes
//! back the published video location.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use slidecast_core::domain::material::Material;
use sqlx::PgPool;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use uuid::Uuid;

/// Content store adapter
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Find a material by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>, sqlx::Error>;

    /// Record the published video on a material
    ///
    /// Last writer wins. Returns `false` when the material does not exist.
    async fn record_video(
        &self,
        id: Uuid,
        video_url: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// Content store backed by the `materials` table
#[derive(Clone)]
pub struct PgMaterialStore {
    pool: PgPool,
}

impl PgMaterialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialStore for PgMaterialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>, sqlx::Error> {
        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, topic, slides, video_url, video_generated_at
            FROM materials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn record_video(
        &self,
        id: Uuid,
        video_url: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE materials
            SET video_url = $2, video_generated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(video_url)
        .bind(generated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Content store kept in process memory, for tests and database-less runs
#[derive(Default)]
pub struct InMemoryMaterialStore {
    materials: RwLock<HashMap<Uuid, Material>>,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of materials
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let materials: Vec<Material> = serde_json::from_str(&text)?;
        let store = Self::new();
        for material in materials {
            store.insert(material);
        }
        Ok(store)
    }

    pub fn insert(&self, material: Material) {
        self.materials
            .write()
            .unwrap()
            .insert(material.id, material);
    }

    pub fn len(&self) -> usize {
        self.materials.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>, sqlx::Error> {
        Ok(self.materials.read().unwrap().get(&id).cloned())
    }

    async fn record_video(
        &self,
        id: Uuid,
        video_url: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut materials = self.materials.write().unwrap();
        match materials.get_mut(&id) {
            Some(material) => {
                material.video_url = Some(video_url.to_string());
                material.video_generated_at = Some(generated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct MaterialRow {
    id: Uuid,
    title: Option<String>,
    topic: Option<String>,
    slides: JsonValue,
    video_url: Option<String>,
    video_generated_at: Option<DateTime<Utc>>,
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Material {
            id: row.id,
            title: row.title,
            topic: row.topic,
            slides: row.slides,
            video_url: row.video_url,
            video_generated_at: row.video_generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn material() -> Material {
        Material {
            id: Uuid::new_v4(),
            title: Some("Fractions".to_string()),
            topic: None,
            slides: json!(["Intro"]),
            video_url: None,
            video_generated_at: None,
        }
    }

    #[tokio::test]
    async fn test_in_memory_record_video() {
        let store = InMemoryMaterialStore::new();
        let material = material();
        let id = material.id;
        store.insert(material);

        let now = Utc::now();
        assert!(store.record_video(id, "/static/v.mp4", now).await.unwrap());

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.video_url.as_deref(), Some("/static/v.mp4"));
        assert_eq!(stored.video_generated_at, Some(now));
    }

    #[tokio::test]
    async fn test_in_memory_missing_material() {
        let store = InMemoryMaterialStore::new();
        let id = Uuid::new_v4();
        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(!store.record_video(id, "/x.mp4", Utc::now()).await.unwrap());
    }

    #[test]
    fn test_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"6f1c1d9e-4b8e-4f47-9a59-2f7f5a1e8b10","topic":"Photosynthesis","slides":"Light --- Dark"}},
                {{"id":"0b0a3a3e-52a5-4c85-9b8f-8c3c1e1d2f40","title":"No slides yet"}}]"#
        )
        .unwrap();

        let store = InMemoryMaterialStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }
}
