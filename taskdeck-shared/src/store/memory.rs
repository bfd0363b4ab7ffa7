/// In-memory store implementations
///
/// Mutex-backed implementations of [`CredentialStore`] and [`TaskStore`]
/// used by the test suites and for running the server without Postgres.
/// Each write takes the lock once, so the single-slot refresh-token
/// invariant holds under concurrent logins the same way the row-level
/// update does in Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::credential::CredentialStore;
use super::tasks::TaskStore;
use super::StoreError;
use crate::models::account::{Account, CreateAccount};
use crate::models::comment::{Comment, CreateComment};
use crate::models::task::{CreateTask, Task, TaskStatus};

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, data: CreateAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.values().any(|a| a.email == data.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn set_refresh_token(
        &self,
        account_id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();

        match accounts.get_mut(&account_id) {
            Some(account) => {
                account.refresh_token = token.map(|t| t.to_string());
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory task store
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: Mutex<MemoryTasks>,
}

#[derive(Default)]
struct MemoryTasks {
    tasks: HashMap<Uuid, Task>,
    comments: Vec<Comment>,
    // Assignee handles resolved at task creation; mirrors the accounts join
    // the Postgres implementation performs.
    assignee_emails: HashMap<Uuid, String>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records which login handle owns a task's assignee ID
    ///
    /// The in-memory store has no accounts table to join against, so tests
    /// register the assignee's handle explicitly after creating a task.
    pub fn set_assignee_email(&self, task_id: Uuid, email: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.assignee_emails.insert(task_id, email.to_string());
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn assignee_email(&self, task_id: Uuid) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        match inner.tasks.get(&task_id) {
            Some(task) if task.assignee_id.is_some() => {
                Ok(inner.assignee_emails.get(&task_id).cloned())
            }
            _ => Ok(None),
        }
    }

    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            author_id: data.author_id,
            assignee_id: data.assignee_id,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        match inner.tasks.get_mut(&id) {
            Some(task) => {
                task.status = status;
                task.updated_at = Utc::now();
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let removed = inner.tasks.remove(&id).is_some();
        if removed {
            inner.comments.retain(|c| c.task_id != id);
            inner.assignee_emails.remove(&id);
        }
        Ok(removed)
    }

    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.tasks.contains_key(&data.task_id) {
            return Err(StoreError::Database("task not found".to_string()));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: data.task_id,
            author_id: data.author_id,
            content: data.content,
            created_at: Utc::now(),
        };
        inner.comments.push(comment.clone());

        Ok(comment)
    }

    async fn comments_for_task(
        &self,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
