//! Transactional store wrapper.
//!
//! Mutations run against a scratch copy of the database; `Ok` swaps it in
//! atomically, `Err` discards it. Version appends and outbox jobs ride the
//! same commit, so a failed mutation writes no version and dispatches no
//! job. Concurrent writers serialize through the lock; the last committed
//! transaction wins, no optimistic-lock conflict is surfaced.

use abp_audit::{Recorder, Trackable, Version};
use abp_core::{Error, JobRequest, UserId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::config::StoreConfig;
use crate::database::Database;

/// Shared handle to the platform state.
#[derive(Debug)]
pub struct Store {
    db: RwLock<Database>,
    recorder: Recorder,
    config: StoreConfig,
}

/// Result of a committed transaction: the closure's value plus the jobs to
/// dispatch fire-and-forget now that the commit is durable.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub jobs: Vec<JobRequest>,
}

impl Store {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::with_database(Database::new(), config)
    }

    #[must_use]
    pub fn with_database(db: Database, config: StoreConfig) -> Self {
        Self {
            db: RwLock::new(db),
            recorder: Recorder::new(config.audit.clone()),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run a read-only closure against the current state.
    pub fn read<T>(&self, f: impl FnOnce(&Database) -> T) -> T {
        f(&self.db.read())
    }

    /// Run a mutation transaction.
    ///
    /// # Errors
    /// Propagates the closure's error; the database is untouched in that
    /// case.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Txn<'_>) -> Result<T, Error>,
    ) -> Result<Committed<T>, Error> {
        let mut guard = self.db.write();
        let mut txn = Txn {
            db: guard.clone(),
            recorder: &self.recorder,
            now: Utc::now(),
            jobs: Vec::new(),
        };

        let value = f(&mut txn)?;

        let Txn { db, jobs, .. } = txn;
        *guard = db;
        drop(guard);

        tracing::debug!(jobs = jobs.len(), "transaction committed");
        Ok(Committed { value, jobs })
    }
}

/// One in-flight transaction.
#[derive(Debug)]
pub struct Txn<'a> {
    db: Database,
    recorder: &'a Recorder,
    now: DateTime<Utc>,
    jobs: Vec<JobRequest>,
}

impl Txn<'_> {
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub const fn db_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Wall-clock instant of the transaction; every timestamp and version
    /// inside one commit shares it.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Stage a job for dispatch after commit.
    pub fn enqueue(&mut self, job: JobRequest) {
        self.jobs.push(job);
    }

    /// Append a create version for `entity`.
    pub fn version_created<T: Trackable>(&mut self, entity: &T, actor: Option<UserId>) {
        let version = self.recorder.created(entity, actor, self.now);
        self.db.versions.push(version);
    }

    /// Append an update version when anything un-ignored changed.
    pub fn version_updated<T: Trackable>(&mut self, before: &T, after: &T, actor: Option<UserId>) {
        if let Some(version) = self.recorder.updated(before, after, actor, self.now) {
            self.db.versions.push(version);
        }
    }

    /// Append a destroy version for `entity`.
    pub fn version_destroyed<T: Trackable>(&mut self, entity: &T, actor: Option<UserId>) {
        let version = self.recorder.destroyed(entity, actor, self.now);
        self.db.versions.push(version);
    }

    /// Append a pre-built version (used when the parent item is resolved
    /// through a live association).
    pub fn push_version(&mut self, version: Version) {
        self.db.versions.push(version);
    }

    /// Build a create version without appending it, for parent adjustment.
    #[must_use]
    pub fn build_created<T: Trackable>(&self, entity: &T, actor: Option<UserId>) -> Version {
        self.recorder.created(entity, actor, self.now)
    }

    /// Build an update version without appending it, for parent adjustment.
    #[must_use]
    pub fn build_updated<T: Trackable>(
        &self,
        before: &T,
        after: &T,
        actor: Option<UserId>,
    ) -> Option<Version> {
        self.recorder.updated(before, after, actor, self.now)
    }
}
