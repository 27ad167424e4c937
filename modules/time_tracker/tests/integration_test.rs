//! Integration-style tests for the time_tracker module.
//!
//! Key points:
//! - Each test runs on a fresh in-memory SQLite DB and applies migrations.
//! - The service is wired with SeaORM repositories, a stub identity source and a manual clock.
//! - The local client is tested against the same service.

mod common;

use anyhow::Result;
use chrono::Duration;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use common::{create_file_db, harness, harness_on, harness_with, ivanov, t0, StubIdentity};
use time_tracker::config::TimeTrackerConfig;
use time_tracker::contract::model::{
    HoursWindow, NewUser, StartInterval, TaskHoursSummary, UserFilter, UserUpdate,
};
use time_tracker::contract::TimeTrackerError;
use time_tracker::domain::error::DomainError;
use time_tracker::infra::storage::entity::work_interval;

fn new_user(passport: &str) -> NewUser {
    NewUser {
        passport: passport.to_string(),
    }
}

fn start(user_id: i32, task_id: i32) -> StartInterval {
    StartInterval {
        user_id,
        task_id,
        description: None,
    }
}

fn day_window() -> HoursWindow {
    HoursWindow {
        start: t0() - Duration::hours(9),
        end: t0() + Duration::hours(15),
    }
}

// ---------- IdentityEnrichment ----------

#[tokio::test]
async fn create_user_stores_resolved_profile() -> Result<()> {
    let h = harness(StubIdentity::answering(ivanov())).await;
    let svc = h.module.service();

    let user = svc.create_user(new_user("1234 567890")).await?;
    assert!(user.id > 0);
    assert_eq!(user.passport_serie, "1234");
    assert_eq!(user.passport_number, "567890");
    assert_eq!(user.surname, "Ivanov");
    assert_eq!(user.name, "Ivan");
    assert_eq!(user.patronymic.as_deref(), Some("Ivanovich"));
    assert_eq!(user.address, "Moscow, Lenina 5");
    assert_eq!(h.identity.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_lookup_still_creates_user_with_placeholders() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();

    let user = svc.create_user(new_user("1234 567890")).await?;
    assert_eq!(user.surname, "Unknown");
    assert_eq!(user.name, "Unknown");
    assert_eq!(user.patronymic.as_deref(), Some("Unknown"));
    assert_eq!(user.address, "Unknown");

    let listed = svc.list_users(UserFilter::default()).await?;
    assert_eq!(listed, vec![user]);
    Ok(())
}

#[tokio::test]
async fn malformed_passport_is_rejected_before_lookup() -> Result<()> {
    let h = harness(StubIdentity::answering(ivanov())).await;
    let svc = h.module.service();

    for raw in ["1234567890", "12345 67890", "1234  567890", "abcd efghij", ""] {
        let res = svc.create_user(new_user(raw)).await;
        assert!(
            matches!(res, Err(DomainError::InvalidPassport { .. })),
            "{raw:?} was accepted"
        );
    }
    assert_eq!(h.identity.calls(), 0);
    assert!(svc.list_users(UserFilter::default()).await?.is_empty());
    Ok(())
}

// ---------- plain user CRUD ----------

#[tokio::test]
async fn update_replaces_all_fields() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    let updated = svc
        .update_user(
            user.id,
            UserUpdate {
                passport_serie: "4321".into(),
                passport_number: "098765".into(),
                surname: "Petrov".into(),
                name: "Petr".into(),
                patronymic: None,
                address: "Kazan".into(),
            },
        )
        .await?;
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.passport_serie, "4321");
    assert_eq!(updated.surname, "Petrov");
    assert_eq!(updated.patronymic, None);
    Ok(())
}

#[tokio::test]
async fn update_validates_passport_parts_and_existence() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    let mut update = UserUpdate {
        passport_serie: "12".into(),
        passport_number: "567890".into(),
        surname: "S".into(),
        name: "N".into(),
        patronymic: None,
        address: "A".into(),
    };
    assert!(matches!(
        svc.update_user(user.id, update.clone()).await,
        Err(DomainError::Validation { .. })
    ));

    update.passport_serie = "1234".into();
    assert!(matches!(
        svc.update_user(999, update).await,
        Err(DomainError::UserNotFound { id: 999 })
    ));
    Ok(())
}

#[tokio::test]
async fn delete_user_rules() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let idle = svc.create_user(new_user("1111 111111")).await?;
    let busy = svc.create_user(new_user("2222 222222")).await?;
    svc.start_interval(start(busy.id, 1)).await?;

    svc.delete_user(idle.id).await?;
    assert!(matches!(
        svc.delete_user(idle.id).await,
        Err(DomainError::UserNotFound { .. })
    ));
    assert!(matches!(
        svc.delete_user(busy.id).await,
        Err(DomainError::UserHasIntervals { .. })
    ));

    let left = svc.list_users(UserFilter::default()).await?;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, busy.id);
    Ok(())
}

#[tokio::test]
async fn list_users_filters_and_pages() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let mut ids = Vec::new();
    for (i, (surname, name)) in [("Ivanov", "Ivan"), ("Petrov", "Petr"), ("Sidorov", "Ivan")]
        .into_iter()
        .enumerate()
    {
        let u = svc
            .create_user(new_user(&format!("000{i} 00000{i}")))
            .await?;
        let u = svc
            .update_user(
                u.id,
                UserUpdate {
                    passport_serie: u.passport_serie,
                    passport_number: u.passport_number,
                    surname: surname.into(),
                    name: name.into(),
                    patronymic: None,
                    address: "x".into(),
                },
            )
            .await?;
        ids.push(u.id);
    }

    let ivans = svc
        .list_users(UserFilter {
            filter: Some("Ivan".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(
        ivans.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![ids[0], ids[2]]
    );

    let by_surname = svc
        .list_users(UserFilter {
            filter: Some("trov".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_surname.len(), 1);
    assert_eq!(by_surname[0].id, ids[1]);

    let page = svc
        .list_users(UserFilter {
            filter: None,
            limit: Some(1),
            offset: Some(1),
        })
        .await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, ids[1]);
    Ok(())
}

#[tokio::test]
async fn list_filter_treats_wildcards_literally() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let mut ids = Vec::new();
    for (i, name) in ["Ann_Marie", "AnnXMarie", "100%"].into_iter().enumerate() {
        let u = svc.create_user(new_user(&format!("000{i} 00000{i}"))).await?;
        let u = svc
            .update_user(
                u.id,
                UserUpdate {
                    passport_serie: u.passport_serie,
                    passport_number: u.passport_number,
                    surname: "Smith".into(),
                    name: name.into(),
                    patronymic: None,
                    address: "x".into(),
                },
            )
            .await?;
        ids.push(u.id);
    }

    let find = |needle: &str| {
        let svc = svc.clone();
        let filter = UserFilter {
            filter: Some(needle.to_string()),
            ..Default::default()
        };
        async move { svc.list_users(filter).await }
    };

    let underscore: Vec<i32> = find("n_M").await?.iter().map(|u| u.id).collect();
    assert_eq!(underscore, vec![ids[0]]);

    let percent: Vec<i32> = find("%").await?.iter().map(|u| u.id).collect();
    assert_eq!(percent, vec![ids[2]]);
    Ok(())
}

#[tokio::test]
async fn list_users_limit_is_capped() -> Result<()> {
    let cfg = TimeTrackerConfig {
        max_page_size: 10,
        ..Default::default()
    };
    let h = harness_with(StubIdentity::failing(), cfg).await;
    let res = h
        .module
        .service()
        .list_users(UserFilter {
            limit: Some(11),
            ..Default::default()
        })
        .await;
    assert!(matches!(res, Err(DomainError::Validation { .. })));
    Ok(())
}

// ---------- IntervalTracker ----------

#[tokio::test]
async fn start_then_stop_records_clock_times() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    let opened = svc
        .start_interval(StartInterval {
            user_id: user.id,
            task_id: 7,
            description: Some("code review".into()),
        })
        .await?;
    assert_eq!(opened.start_time, t0());
    assert_eq!(opened.end_time, None);
    assert_eq!(opened.description.as_deref(), Some("code review"));

    h.clock.advance(Duration::minutes(45));
    let closed = svc.stop_interval(user.id, 7).await?;
    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.start_time, t0());
    assert_eq!(closed.end_time, Some(t0() + Duration::minutes(45)));
    assert_eq!(closed.description.as_deref(), Some("code review"));
    Ok(())
}

#[tokio::test]
async fn stop_twice_reports_no_active_interval() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    svc.start_interval(start(user.id, 1)).await?;
    h.clock.advance(Duration::minutes(10));
    let first = svc.stop_interval(user.id, 1).await?;

    h.clock.advance(Duration::minutes(10));
    let second = svc.stop_interval(user.id, 1).await;
    match second {
        Err(e @ DomainError::NoActiveInterval { .. }) => {
            assert!(e.to_string().contains("no active task found to stop"))
        }
        other => panic!("unexpected: {other:?}"),
    }

    // the closed interval kept its original end time
    let summary = svc.task_hours(user.id, day_window()).await?;
    assert_eq!(
        summary,
        vec![TaskHoursSummary {
            task_id: 1,
            hours: (first.end_time.unwrap() - first.start_time).num_seconds() as f64 / 3600.0
        }]
    );
    Ok(())
}

#[tokio::test]
async fn stop_without_start_is_not_found() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let res = h.module.service().stop_interval(1, 1).await;
    assert!(matches!(res, Err(DomainError::NoActiveInterval { .. })));
    Ok(())
}

#[tokio::test]
async fn second_start_for_same_pair_is_rejected() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    svc.start_interval(start(user.id, 1)).await?;
    let dup = svc.start_interval(start(user.id, 1)).await;
    assert!(matches!(
        dup,
        Err(DomainError::DuplicateOpenInterval {
            task_id: 1,
            ..
        })
    ));

    // a different task may run at the same time
    svc.start_interval(start(user.id, 2)).await?;

    // after stopping, the pair can be started again
    svc.stop_interval(user.id, 1).await?;
    svc.start_interval(start(user.id, 1)).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_starts_open_exactly_one_interval() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user_id = svc.create_user(new_user("1234 567890")).await?.id;

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.start_interval(start(user_id, 5)).await })
        })
        .collect();

    let mut opened = 0;
    let mut rejected = 0;
    for attempt in attempts {
        match attempt.await? {
            Ok(_) => opened += 1,
            Err(DomainError::DuplicateOpenInterval { .. }) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(opened, 1);
    assert_eq!(rejected, 7);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_starts_on_file_database_report_duplicates() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let h = harness_on(
        create_file_db(dir.path()).await,
        StubIdentity::failing(),
        TimeTrackerConfig::default(),
    );
    let svc = h.module.service();
    let user_id = svc.create_user(new_user("1234 567890")).await?.id;

    for task_id in 0..20 {
        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.start_interval(start(user_id, task_id)).await })
            })
            .collect();

        let mut opened = 0;
        for attempt in attempts {
            match attempt.await? {
                Ok(_) => opened += 1,
                Err(DomainError::DuplicateOpenInterval { .. }) => {}
                Err(e) => panic!("task {task_id}: unexpected error: {e}"),
            }
        }
        assert_eq!(opened, 1, "task {task_id}");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_stops_on_file_database_close_once() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let h = harness_on(
        create_file_db(dir.path()).await,
        StubIdentity::failing(),
        TimeTrackerConfig::default(),
    );
    let svc = h.module.service();
    let user_id = svc.create_user(new_user("1234 567890")).await?.id;

    for task_id in 0..20 {
        let opened = svc.start_interval(start(user_id, task_id)).await?;
        h.clock.advance(Duration::minutes(1));

        let attempts: Vec<_> = (0..4)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.stop_interval(user_id, task_id).await })
            })
            .collect();

        let mut closed = Vec::new();
        for attempt in attempts {
            match attempt.await? {
                Ok(iv) => closed.push(iv),
                Err(DomainError::NoActiveInterval { .. }) => {}
                Err(e) => panic!("task {task_id}: unexpected error: {e}"),
            }
        }
        assert_eq!(closed.len(), 1, "task {task_id}");
        assert_eq!(closed[0].id, opened.id);
    }
    Ok(())
}

#[tokio::test]
async fn start_for_unknown_user_is_not_found() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let res = h.module.service().start_interval(start(42, 1)).await;
    assert!(matches!(res, Err(DomainError::UserNotFound { id: 42 })));
    Ok(())
}

#[tokio::test]
async fn stop_closes_oldest_when_legacy_data_has_several_open() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    // Simulate rows written before the open-interval guard existed.
    h.db.execute_unprepared("DROP INDEX ux_work_intervals_open")
        .await?;
    let mut ids = Vec::new();
    for offset in [0, 30] {
        let row = work_interval::ActiveModel {
            user_id: Set(user.id),
            task_id: Set(3),
            description: Set(None),
            start_time: Set(t0() + Duration::minutes(offset)),
            end_time: Set(None),
            ..Default::default()
        }
        .insert(&h.db)
        .await?;
        ids.push(row.id);
    }

    h.clock.advance(Duration::hours(1));
    let first = svc.stop_interval(user.id, 3).await?;
    assert_eq!(first.id, ids[0]);
    let second = svc.stop_interval(user.id, 3).await?;
    assert_eq!(second.id, ids[1]);
    assert!(matches!(
        svc.stop_interval(user.id, 3).await,
        Err(DomainError::NoActiveInterval { .. })
    ));
    Ok(())
}

// ---------- HoursAggregator ----------

#[tokio::test]
async fn hours_are_summed_per_task_largest_first() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    // task 10: 2.0h in two runs, task 20: 3.5h
    for (task, minutes) in [(10, 60), (20, 210), (10, 60)] {
        svc.start_interval(start(user.id, task)).await?;
        h.clock.advance(Duration::minutes(minutes));
        svc.stop_interval(user.id, task).await?;
        h.clock.advance(Duration::minutes(5));
    }
    // still running, never counted
    svc.start_interval(start(user.id, 30)).await?;

    let summary = svc.task_hours(user.id, day_window()).await?;
    assert_eq!(
        summary,
        vec![
            TaskHoursSummary {
                task_id: 20,
                hours: 3.5
            },
            TaskHoursSummary {
                task_id: 10,
                hours: 2.0
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn ninety_minutes_is_one_and_a_half_hours() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    svc.start_interval(start(user.id, 7)).await?;
    h.clock.advance(Duration::seconds(5400));
    svc.stop_interval(user.id, 7).await?;

    let summary = svc.task_hours(user.id, day_window()).await?;
    assert_eq!(
        summary,
        vec![TaskHoursSummary {
            task_id: 7,
            hours: 1.5
        }]
    );
    Ok(())
}

#[tokio::test]
async fn window_bounds_are_inclusive() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let user = svc.create_user(new_user("1234 567890")).await?;

    svc.start_interval(start(user.id, 1)).await?;
    h.clock.advance(Duration::hours(1));
    svc.stop_interval(user.id, 1).await?;

    let exact = HoursWindow {
        start: t0(),
        end: t0() + Duration::hours(1),
    };
    assert_eq!(svc.task_hours(user.id, exact).await?.len(), 1);

    let starts_late = HoursWindow {
        start: t0() + Duration::seconds(1),
        end: t0() + Duration::hours(2),
    };
    assert!(svc.task_hours(user.id, starts_late).await?.is_empty());

    let ends_early = HoursWindow {
        start: t0() - Duration::hours(1),
        end: t0() + Duration::minutes(59),
    };
    assert!(svc.task_hours(user.id, ends_early).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn hours_are_scoped_to_the_user() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let svc = h.module.service();
    let alice = svc.create_user(new_user("1111 111111")).await?;
    let bob = svc.create_user(new_user("2222 222222")).await?;

    svc.start_interval(start(alice.id, 1)).await?;
    h.clock.advance(Duration::hours(2));
    svc.stop_interval(alice.id, 1).await?;

    assert!(svc.task_hours(bob.id, day_window()).await?.is_empty());
    assert!(svc.task_hours(9999, day_window()).await?.is_empty());
    assert_eq!(svc.task_hours(alice.id, day_window()).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn inverted_window_is_a_validation_error() -> Result<()> {
    let h = harness(StubIdentity::failing()).await;
    let window = HoursWindow {
        start: t0(),
        end: t0() - Duration::seconds(1),
    };
    let res = h.module.service().task_hours(1, window).await;
    assert!(matches!(res, Err(DomainError::Validation { .. })));
    Ok(())
}

// ---------- local client ----------

#[tokio::test]
async fn local_client_maps_errors_to_contract() -> Result<()> {
    let h = harness(StubIdentity::answering(ivanov())).await;
    let client = h.module.client();

    let user = client.create_user(new_user("1234 567890")).await?;
    assert_eq!(user.surname, "Ivanov");

    assert!(matches!(
        client.create_user(new_user("bad")).await,
        Err(TimeTrackerError::Validation { .. })
    ));

    client.start_interval(start(user.id, 1)).await?;
    assert!(matches!(
        client.start_interval(start(user.id, 1)).await,
        Err(TimeTrackerError::Conflict { .. })
    ));

    h.clock.advance(Duration::minutes(30));
    let closed = client.stop_interval(user.id, 1).await?;
    assert!(closed.end_time.is_some());
    assert!(matches!(
        client.stop_interval(user.id, 1).await,
        Err(TimeTrackerError::NotFound { .. })
    ));

    let summary = client.task_hours(user.id, day_window()).await?;
    assert_eq!(summary[0].hours, 0.5);

    assert!(matches!(
        client.delete_user(user.id).await,
        Err(TimeTrackerError::Conflict { .. })
    ));
    assert_eq!(client.list_users(UserFilter::default()).await?.len(), 1);
    Ok(())
}
