//! In-memory collaborators for router tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calls::twilio::CallTrigger;
use crate::config::AppConfig;
use crate::notify::mailer::{Alert, Mailer};
use crate::state::AppState;
use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{NewUser, User, UserChanges};

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    pub fail: AtomicBool,
    /// `find_by_email` sees nothing, as when a concurrent insert lands after the lookup.
    pub stale_email_lookup: AtomicBool,
}

impl MemoryUserStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        if self.stale_email_lookup.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            address: user.address,
            phone: user.phone,
            temp: user.temp,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let Some(row) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.username {
            row.username = Some(v);
        }
        if let Some(v) = changes.email {
            row.email = v;
        }
        if let Some(v) = changes.password_hash {
            row.password_hash = v;
        }
        if let Some(v) = changes.address {
            row.address = Some(v);
        }
        if let Some(v) = changes.phone {
            row.phone = Some(v);
        }
        if let Some(v) = changes.temp {
            row.temp = Some(v);
        }
        Ok(Some(row.clone()))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Alert>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_alert(&self, alert: &Alert) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp unavailable");
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCalls {
    pub placed: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl CallTrigger for FakeCalls {
    async fn place_call(&self, to: &str) -> anyhow::Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("provider rejected the call");
        }
        let mut placed = self.placed.lock().unwrap();
        placed.push(to.to_string());
        Ok(format!("CA{:032}", placed.len()))
    }
}

/// An `AppState` wired to fakes, with handles kept for assertions.
pub struct Harness {
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub mailer: Arc<RecordingMailer>,
    pub calls: Arc<FakeCalls>,
}

impl Harness {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|key| (key == "JWT_SECRET").then(|| TEST_SECRET.to_string()))
            .expect("test config");
        let users = Arc::new(MemoryUserStore::default());
        let mailer = Arc::new(RecordingMailer::default());
        let calls = Arc::new(FakeCalls::default());
        let state = AppState::from_parts(&config, users.clone(), mailer.clone(), calls.clone());
        Self {
            state,
            users,
            mailer,
            calls,
        }
    }
}
