// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! One JSON document per entity. Uniqueness constraints (message id,
//! username) are enforced by the filesystem via `create_new`, so there
//! is no check-then-insert race. Ownership is deliberately NOT checked
//! here; the API layer is the single source of truth for authorization.
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs as tokio_fs, io::AsyncWriteExt};

use crate::error::AppError;
use forum_common::{Identity, Message};

/// Fields a successful edit writes through to the store.
#[derive(Debug, Clone)]
pub struct MessageEdit {
    pub message: String,
    pub last_edited_at: DateTime<Utc>,
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// All messages in a room, ascending by creation time.
    async fn list_messages(&self, room: &str) -> Result<Vec<Message>, AppError>;

    /// Persist a freshly created message. The message id must be new.
    async fn insert_message(&self, message: &Message) -> Result<(), AppError>;

    /// Look up a message by its id.
    async fn find_message(&self, message_id: &str) -> Result<Option<Message>, AppError>;

    /// Apply an edit patch: replaces the text, marks the message edited
    /// and stamps `last_edited_at`. Fails if the message is gone.
    async fn update_message(
        &self,
        message_id: &str,
        edit: MessageEdit,
    ) -> Result<Message, AppError>;

    /// Hard-remove a message. Returns false when it was not present.
    async fn delete_message(&self, message_id: &str) -> Result<bool, AppError>;

    /// Look up an identity by exact username.
    async fn find_identity(&self, username: &str) -> Result<Option<Identity>, AppError>;

    /// Persist a new identity. Fails with a conflict if the username is
    /// already taken; the check and the insert are a single atomic step.
    async fn create_identity(&self, identity: &Identity) -> Result<(), AppError>;
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("messages"))?;
        fs::create_dir_all(root.join("identities"))?;
        Ok(Self { root })
    }

    fn message_path(&self, message_id: &str) -> PathBuf {
        self.root.join("messages").join(format!("{message_id}.json"))
    }

    // Usernames are free text; the filename key is their URL-safe
    // base64, which keeps uniqueness exact-match and case-sensitive.
    fn identity_path(&self, username: &str) -> PathBuf {
        let key = URL_SAFE_NO_PAD.encode(username.as_bytes());
        self.root.join("identities").join(format!("{key}.json"))
    }

    /// Create a file that must not already exist and write it in full.
    async fn write_new(path: &Path, json: &str) -> Result<(), std::io::Error> {
        let mut file = tokio_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn list_messages(&self, room: &str) -> Result<Vec<Message>, AppError> {
        let dir = self.root.join("messages");
        let mut entries = tokio_fs::read_dir(&dir).await?;
        let mut messages = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio_fs::read_to_string(&path).await?;
            let message: Message = serde_json::from_str(&content)?;
            if message.room == room {
                messages.push(message);
            }
        }

        // oldest first; equal timestamps tie in undefined order
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn insert_message(&self, message: &Message) -> Result<(), AppError> {
        let path = self.message_path(&message.message_id);
        let json = serde_json::to_string_pretty(message)?;

        Self::write_new(&path, &json).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                // ids are generated server-side; a collision is a bug
                AppError::Internal(format!("duplicate message id {}", message.message_id))
            } else {
                AppError::Io(e)
            }
        })
    }

    async fn find_message(&self, message_id: &str) -> Result<Option<Message>, AppError> {
        let path = self.message_path(message_id);

        match tokio_fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn update_message(
        &self,
        message_id: &str,
        edit: MessageEdit,
    ) -> Result<Message, AppError> {
        let Some(mut message) = self.find_message(message_id).await? else {
            return Err(AppError::NotFound("Message not found".to_string()));
        };

        message.message = edit.message;
        message.edited = true;
        message.last_edited_at = Some(edit.last_edited_at);

        let json = serde_json::to_string_pretty(&message)?;
        tokio_fs::write(self.message_path(message_id), json).await?;

        Ok(message)
    }

    async fn delete_message(&self, message_id: &str) -> Result<bool, AppError> {
        match tokio_fs::remove_file(self.message_path(message_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn find_identity(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let path = self.identity_path(username);

        match tokio_fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn create_identity(&self, identity: &Identity) -> Result<(), AppError> {
        let path = self.identity_path(&identity.username);
        let json = serde_json::to_string_pretty(identity)?;

        Self::write_new(&path, &json).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                AppError::Conflict("Username already taken".to_string())
            } else {
                AppError::Io(e)
            }
        })
    }
}
