// src/api/captures.rs
use std::path::{Path, PathBuf};

use sha3::{Digest, Sha3_256};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Where uploaded frames land on disk before the face engine reads them.
///
/// Enrollment frames are kept under `enroll/`, named after the hex SHA3-256
/// digest of the username so any username maps to a fixed-length file name.
/// Verification frames get a unique name under `verify/` and are
/// removed once the request is answered.
pub struct ImageCaptures {
    enroll_dir: PathBuf,
    verify_dir: PathBuf,
}

impl ImageCaptures {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            enroll_dir: root.join("enroll"),
            verify_dir: root.join("verify"),
        }
    }

    pub fn enrollment_path(&self, username: &str) -> PathBuf {
        let digest = Sha3_256::digest(username.as_bytes());
        self.enroll_dir.join(format!("{}.jpg", hex::encode(digest)))
    }

    pub async fn save_enrollment(&self, username: &str, image: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.enrollment_path(username);
        write_frame(&self.enroll_dir, &path, image).await?;
        Ok(path)
    }

    pub async fn save_verification(&self, image: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.verify_dir.join(format!("{}.jpg", Uuid::new_v4()));
        write_frame(&self.verify_dir, &path, image).await?;
        Ok(path)
    }

    /// Best-effort removal; a failure is logged and otherwise ignored.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to remove capture {:?}: {}", path, e);
        }
    }
}

async fn write_frame(dir: &Path, path: &Path, image: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir).await?;
    fs::write(path, image).await?;
    debug!("Wrote {} byte frame to {:?}", image.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_enrollment_path_never_uses_raw_username() {
        let captures = ImageCaptures::new("/srv/captures");
        let path = captures.enrollment_path("../../etc/passwd");

        assert_eq!(path.parent().unwrap(), Path::new("/srv/captures/enroll"));
        assert!(!path.to_string_lossy().contains(".."));
    }

    #[tokio::test]
    async fn test_long_username_gets_bounded_file_name() {
        let temp_dir = tempdir().unwrap();
        let captures = ImageCaptures::new(temp_dir.path());
        let username = "a".repeat(200);

        let path = captures.save_enrollment(&username, b"frame").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(name.len(), 64 + ".jpg".len());
        assert_eq!(path, captures.enrollment_path(&username));
        assert_ne!(path, captures.enrollment_path("a"));
    }

    #[tokio::test]
    async fn test_verification_frames_are_unique_and_discardable() {
        let temp_dir = tempdir().unwrap();
        let captures = ImageCaptures::new(temp_dir.path());

        let a = captures.save_verification(b"one").await.unwrap();
        let b = captures.save_verification(b"two").await.unwrap();
        assert_ne!(a, b);

        captures.discard(&a).await;
        assert!(!a.exists());
        assert!(b.exists());

        // Discarding twice only logs
        captures.discard(&a).await;
    }
}
