//! In-memory stores.
//!
//! Records live in `HashMap`s behind `tokio::sync::RwLock`. Nothing is durable;
//! these back the test suite and local runs without PostgreSQL. Each store can
//! be switched into a failing mode to exercise error paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use portal_models::{AccessControlRecord, NewAccessControl, UpdateAccessControl};
use tokio::sync::RwLock;

use super::{AccessControlStore, StoreError, StoreResult, StudentDirectory};

/// Access records keyed by `student_id`.
#[derive(Clone, Default)]
pub struct InMemoryAccessControlStore {
    records: Arc<RwLock<HashMap<i64, AccessControlRecord>>>,
    next_id: Arc<AtomicI64>,
    failing: Arc<AtomicBool>,
}

impl InMemoryAccessControlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = AccessControlRecord>) -> Self {
        let records: HashMap<_, _> = records.into_iter().map(|r| (r.student_id, r)).collect();
        let max_id = records.values().map(|r| r.id).max().unwrap_or(0);
        Self {
            records: Arc::new(RwLock::new(records)),
            next_id: Arc::new(AtomicI64::new(max_id)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the record for its student, as a direct write would.
    pub async fn put(&self, record: AccessControlRecord) {
        self.next_id.fetch_max(record.id, Ordering::SeqCst);
        self.records.write().await.insert(record.student_id, record);
    }

    /// While set, every operation fails with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("access control store".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessControlStore for InMemoryAccessControlStore {
    async fn fetch_by_student_id(
        &self,
        student_id: i64,
    ) -> StoreResult<Option<AccessControlRecord>> {
        self.check_available()?;
        Ok(self.records.read().await.get(&student_id).cloned())
    }

    async fn update(&self, update: &UpdateAccessControl) -> StoreResult<Option<AccessControlRecord>> {
        self.check_available()?;
        let mut records = self.records.write().await;
        let Some(record) = records.values_mut().find(|r| r.id == update.id) else {
            return Ok(None);
        };

        update.apply_to(record);
        record.updated_at = Some(chrono::Utc::now());
        Ok(Some(record.clone()))
    }

    async fn ensure_for_student(
        &self,
        student_id: i64,
        defaults: NewAccessControl,
    ) -> StoreResult<AccessControlRecord> {
        self.check_available()?;
        let mut records = self.records.write().await;
        let record = records.entry(student_id).or_insert_with(|| AccessControlRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            student_id,
            status: defaults.status,
            access_course: defaults.access_course,
            access_library: defaults.access_library,
            access_exams: defaults.access_exams,
            created_at: chrono::Utc::now(),
            updated_at: None,
        });
        Ok(record.clone())
    }
}

/// `user_id -> student_id` links.
#[derive(Clone, Default)]
pub struct InMemoryStudentDirectory {
    links: Arc<RwLock<HashMap<i64, i64>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryStudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(links: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self {
            links: Arc::new(RwLock::new(links.into_iter().collect())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn link(&self, user_id: i64, student_id: i64) {
        self.links.write().await.insert(user_id, student_id);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl StudentDirectory for InMemoryStudentDirectory {
    async fn student_id_for_user(&self, user_id: i64) -> StoreResult<Option<i64>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("student directory".into()));
        }
        Ok(self.links.read().await.get(&user_id).copied())
    }
}
