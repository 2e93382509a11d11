use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Disk-backed object store.
///
/// Uploaded blobs (scholarship photos, blog covers) live as flat files under
/// `{dir}/{key}`. `put` is synchronous from the caller's perspective: it does
/// not return until the bytes are on disk. Objects are served back over HTTP
/// from `{public_base}/uploads/{key}`.
pub struct ObjectStore {
    dir: PathBuf,
    public_base: String,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

impl ObjectStore {
    pub async fn new(dir: PathBuf, public_base: String) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Object store directory: {}", dir.display());
        Ok(Self {
            dir,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn storage_dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Store a blob and return its key and public URL.
    ///
    /// Keys are content-addressed: a sha-256 prefix joined with the sanitized
    /// original filename, so re-uploading identical bytes under the same name
    /// is a no-op overwrite and distinct uploads never collide on filename.
    pub async fn put(&self, data: &[u8], name: &str, content_type: &str) -> Result<StoredObject> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let digest = hex::encode(hasher.finalize());

        let key = format!("{}-{}", &digest[..16], sanitize_name(name, content_type));
        let path = self.object_path(&key);
        fs::write(&path, data).await?;

        info!(
            "Stored object {} ({} bytes, {})",
            key,
            data.len(),
            content_type
        );
        Ok(StoredObject {
            url: format!("{}/uploads/{}", self.public_base, key),
            key,
        })
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted object {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Object {} already gone", key);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Filenames come straight from multipart form data; keep only filesystem- and
/// URL-safe characters. A missing extension is filled in from the content
/// type so the HTTP layer can infer the right MIME on the way back out.
fn sanitize_name(name: &str, content_type: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.trim_matches('-').is_empty() {
        cleaned = "upload".to_string();
    }

    if !cleaned.contains('.') {
        let ext = match content_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        };
        cleaned = format!("{}.{}", cleaned, ext);
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn temp_store() -> ObjectStore {
        let dir = std::env::temp_dir().join(format!("sojourn-store-test-{}", Uuid::new_v4()));
        ObjectStore::new(dir, "http://localhost:8000/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn put_writes_bytes_and_builds_url() {
        let store = temp_store().await;
        let stored = store.put(b"pixels", "photo.png", "image/png").await.unwrap();

        assert!(stored.url.starts_with("http://localhost:8000/uploads/"));
        assert!(stored.key.ends_with("photo.png"));

        let on_disk = fs::read(store.object_path(&stored.key)).await.unwrap();
        assert_eq!(on_disk, b"pixels");
    }

    #[tokio::test]
    async fn identical_content_and_name_share_a_key() {
        let store = temp_store().await;
        let a = store.put(b"same", "cover.jpg", "image/jpeg").await.unwrap();
        let b = store.put(b"same", "cover.jpg", "image/jpeg").await.unwrap();
        let c = store.put(b"different", "cover.jpg", "image/jpeg").await.unwrap();

        assert_eq!(a.key, b.key);
        assert_ne!(a.key, c.key);
    }

    #[tokio::test]
    async fn hostile_filenames_are_sanitized() {
        let store = temp_store().await;
        let stored = store
            .put(b"data", "../../etc/passwd", "application/octet-stream")
            .await
            .unwrap();

        assert!(!stored.key.contains('/'));
        assert!(fs::try_exists(store.object_path(&stored.key)).await.unwrap());
    }

    #[tokio::test]
    async fn extension_is_derived_from_content_type() {
        let store = temp_store().await;
        let stored = store.put(b"data", "snapshot", "image/png").await.unwrap();
        assert!(stored.key.ends_with("snapshot.png"));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_objects() {
        let store = temp_store().await;
        let stored = store.put(b"data", "photo.png", "image/png").await.unwrap();

        store.delete(&stored.key).await.unwrap();
        store.delete(&stored.key).await.unwrap();
        assert!(!fs::try_exists(store.object_path(&stored.key)).await.unwrap());
    }
}
