#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use time_tracker::config::TimeTrackerConfig;
use time_tracker::domain::clock::ManualClock;
use time_tracker::domain::passport::Passport;
use time_tracker::domain::ports::{IdentityLookupError, IdentityPort, IdentityProfile};
use time_tracker::TimeTracker;

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    TimeTracker::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

/// File-backed SQLite with a multi-connection pool, the way the server runs by default.
pub async fn create_file_db(dir: &Path) -> DatabaseConnection {
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.join("tracker.db").to_string_lossy().replace('\\', "/")
    );
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(10).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to open file database");
    TimeTracker::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

/// 2024-01-15 09:00:00 UTC
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

pub fn ivanov() -> IdentityProfile {
    IdentityProfile {
        surname: "Ivanov".into(),
        name: "Ivan".into(),
        patronymic: Some("Ivanovich".into()),
        address: "Moscow, Lenina 5".into(),
    }
}

/// In-process identity source that counts lookups.
pub struct StubIdentity {
    profile: Option<IdentityProfile>,
    calls: AtomicUsize,
}

impl StubIdentity {
    pub fn answering(profile: IdentityProfile) -> Self {
        Self {
            profile: Some(profile),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            profile: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityPort for StubIdentity {
    async fn lookup(&self, _passport: &Passport) -> Result<IdentityProfile, IdentityLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or_else(|| IdentityLookupError::Transport("connection refused".into()))
    }
}

pub struct Harness {
    pub db: DatabaseConnection,
    pub module: TimeTracker,
    pub clock: Arc<ManualClock>,
    pub identity: Arc<StubIdentity>,
}

pub async fn harness_with(identity: StubIdentity, cfg: TimeTrackerConfig) -> Harness {
    harness_on(create_test_db().await, identity, cfg)
}

pub fn harness_on(db: DatabaseConnection, identity: StubIdentity, cfg: TimeTrackerConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(t0()));
    let identity = Arc::new(identity);
    let module = TimeTracker::with_parts(db.clone(), identity.clone(), clock.clone(), &cfg);
    Harness {
        db,
        module,
        clock,
        identity,
    }
}

pub async fn harness(identity: StubIdentity) -> Harness {
    harness_with(identity, TimeTrackerConfig::default()).await
}
