//! File-based Session Repository
//!
//! Stores each session as `<id>.yaml` under a base directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::clarification::Session;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{apply_list_query, ListSessionsQuery, SessionRepository};

const EXTENSION: &str = "yaml";

/// File-based storage for sessions
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    base_path: PathBuf,
}

impl FileSessionRepository {
    /// Create a repository rooted at `base_path`.
    ///
    /// The directory is created on first write.
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileSessionRepository::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn session_file_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!("{}.{}", id, EXTENSION))
    }

    async fn read_session(path: &Path) -> Result<Session, DomainError> {
        let yaml = fs::read_to_string(path).await.map_err(io_error)?;
        serde_yaml::from_str(&yaml).map_err(|e| {
            DomainError::new(
                ErrorCode::StorageError,
                format!("corrupt session file {}: {}", path.display(), e),
            )
        })
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, e.to_string())
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_path).await.map_err(io_error)?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;

        // Write then rename so readers never see a partial file.
        let path = self.session_file_path(session.id());
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let path = self.session_file_path(id);
        if !fs::try_exists(&path).await.map_err(io_error)? {
            return Ok(None);
        }
        Self::read_session(&path).await.map(Some)
    }

    async fn list(&self, query: ListSessionsQuery) -> Result<Vec<Session>, DomainError> {
        if !fs::try_exists(&self.base_path).await.map_err(io_error)? {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_path).await.map_err(io_error)?;
        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_session(&path).await {
                Ok(session) => sessions.push(session),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable session file");
                }
            }
        }

        Ok(apply_list_query(sessions, query))
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        let path = self.session_file_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clarification::{
        QuestionDraft, Round, RoundDraft, Understanding, DEFAULT_MAX_INPUT_LENGTH,
    };
    use tempfile::TempDir;

    fn test_session() -> Session {
        let mut session = Session::new("A board game cafe", DEFAULT_MAX_INPUT_LENGTH).unwrap();
        let draft = RoundDraft {
            understanding: Understanding {
                main_themes: vec!["hospitality".to_string()],
                remaining_uncertainties: vec!["location".to_string()],
                ..Default::default()
            },
            summary: "Cafe with games".to_string(),
            questions: vec![QuestionDraft::new("Where?", vec!["Downtown", "Campus"], true)],
            should_conclude: false,
            conclusion_reason: None,
        };
        session
            .append_round(Round::from_draft(1, draft, None).unwrap())
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_file_repository_save_and_find() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());
        let session = test_session();

        repo.save(&session).await.unwrap();

        let loaded = repo.find_by_id(session.id()).await.unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn test_file_repository_find_missing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());
        assert!(repo.find_by_id(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_repository_creates_directory_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path().join("nested/sessions"));
        let session = test_session();

        repo.save(&session).await.unwrap();

        assert!(repo.session_file_path(session.id()).exists());
    }

    #[tokio::test]
    async fn test_file_repository_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());
        let session = test_session();
        repo.save(&session).await.unwrap();

        assert!(repo.delete(session.id()).await.unwrap());
        assert!(!repo.delete(session.id()).await.unwrap());
        assert!(repo.find_by_id(session.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_repository_list_skips_foreign_and_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());
        repo.save(&test_session()).await.unwrap();
        repo.save(&test_session()).await.unwrap();

        std::fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(temp_dir.path().join("broken.yaml"), "::: not yaml").unwrap();

        let sessions = repo.list(ListSessionsQuery::default()).await.unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[tokio::test]
    async fn test_file_repository_list_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path().join("absent"));
        assert!(repo.list(ListSessionsQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_repository_overwrites_on_update() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(temp_dir.path());
        let mut session = test_session();
        repo.save(&session).await.unwrap();

        session
            .record_selections(vec![crate::domain::clarification::UserSelection::free_text(
                crate::domain::clarification::QuestionId::new(0),
                "Suburbs",
            )])
            .unwrap();
        repo.save(&session).await.unwrap();

        let loaded = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(loaded.rounds()[0].is_answered());
    }
}
