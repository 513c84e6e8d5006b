//! End-to-end properties of the audit trail over the public library API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::NaiveDate;
use tempfile::TempDir;

use usermgmt::audit::{AuditLogEntry, LogAction};
use usermgmt::models::{User, UserId};
use usermgmt::services::UserService;
use usermgmt::storage::file_io::temp_path_for;
use usermgmt::storage::{initialize, CommitError, Repository, Tables};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_user(email: &str) -> User {
    User::new("Grace", "Hopper", email, date(1906, 12, 9))
}

#[test]
fn seeded_store_has_one_create_entry_per_user() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let users = service.get_all_users();
    let logs = service.get_all_logs();
    assert_eq!(users.len(), 11);
    assert_eq!(logs.len(), 11);

    for (user, log) in users.iter().zip(&logs) {
        assert_eq!(log.action, LogAction::Create);
        assert_eq!(log.user_id, user.id);
        assert_eq!(log.new_state, user.to_record());
        assert!(log.prior_state.is_none());
    }

    let ids: Vec<i64> = users.iter().map(|u| u.id.value()).collect();
    assert_eq!(ids, (1..=11).collect::<Vec<_>>());
}

#[test]
fn create_scenario_records_assigned_id() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let mut user = User::new("create", "create", "create@example.com", date(2000, 1, 1));
    assert!(service.add_user(&mut user));
    assert_eq!(user.id, UserId::new(12));

    let logs = service.get_logs_by_user_id(user.id);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, LogAction::Create);
    assert_eq!(logs[0].new_state.forename, "create");
    assert_eq!(service.get_all_logs().len(), 12);
}

#[test]
fn update_scenario_captures_before_and_after() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let mut user = service.get_user_by_id(UserId::new(1)).unwrap();
    let before = user.to_record();
    user.forename = "I'm updated!".to_string();
    assert!(service.update(&user));

    let logs = service.get_logs_by_user_id(UserId::new(1));
    assert_eq!(logs.len(), 2);
    let update = &logs[1];
    assert_eq!(update.action, LogAction::Update);
    assert_eq!(update.prior_state.as_ref(), Some(&before));
    assert_eq!(update.new_state.forename, "I'm updated!");
    assert_eq!(
        update.diff_summary().unwrap(),
        "forename: \"Peter\" -> \"I'm updated!\""
    );
}

#[test]
fn update_prior_state_comes_from_store_not_caller() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let stale = service.get_user_by_id(UserId::new(2)).unwrap();
    let mut first = stale.clone();
    first.surname = "First".to_string();
    assert!(service.update(&first));

    let mut second = stale;
    second.surname = "Second".to_string();
    assert!(service.update(&second));

    let logs = service.get_logs_by_user_id(UserId::new(2));
    assert_eq!(logs[2].prior_state.as_ref().unwrap().surname, "First");
    assert_eq!(logs[2].new_state.surname, "Second");
}

#[test]
fn deleted_user_keeps_its_history() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let stored = service.get_user_by_id(UserId::new(3)).unwrap();
    assert!(service.delete_user_by_id(UserId::new(3)).unwrap());

    assert!(service.get_user_by_id(UserId::new(3)).unwrap_err().is_not_found());
    assert_eq!(service.get_all_users().len(), 10);

    let logs = service.get_logs_by_user_id(UserId::new(3));
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].action, LogAction::Delete);
    assert_eq!(logs[1].new_state, stored.to_record());
    assert!(logs[1].prior_state.is_none());
}

#[test]
fn failed_mutations_leave_no_trace() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);
    let before = repo.snapshot();

    let mut ghost = new_user("ghost@example.com");
    ghost.id = UserId::new(99);
    assert!(!service.update(&ghost));
    assert!(!repo.delete(&ghost));

    assert!(service
        .delete_user_by_id(UserId::new(99))
        .unwrap_err()
        .is_not_found());
    assert_eq!(repo.snapshot(), before);
}

#[test]
fn existing_email_does_not_block_create() {
    let repo = Repository::seeded().unwrap();
    let service = UserService::new(&repo);

    let mut twin = new_user("ploew@example.com");
    assert!(service.add_user(&mut twin));
    assert_eq!(twin.id, UserId::new(12));

    let logs = service.get_logs_by_user_id(twin.id);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, LogAction::Create);
    assert_eq!(logs[0].new_state.email, "ploew@example.com");
    assert_eq!(service.get_all_users().len(), 12);
}

#[test]
fn audit_entries_cannot_be_rewritten() {
    let repo = Repository::seeded().unwrap();
    let mut entry = repo.get_all::<AuditLogEntry>().remove(0);
    entry.action = LogAction::Delete;

    assert!(matches!(
        repo.try_update(&entry),
        Err(CommitError::AppendOnly { .. })
    ));
    assert!(!repo.delete(&entry));
    assert_eq!(repo.get_all::<AuditLogEntry>()[0].action, LogAction::Create);
}

#[test]
fn persist_failure_commits_neither_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let repo = Repository::open(&path).unwrap();
    assert!(initialize(&repo).unwrap());

    std::fs::create_dir(temp_path_for(&path)).unwrap();

    let mut user = service_user(&repo, 4);
    user.email = "changed@example.com".to_string();
    assert!(matches!(
        repo.try_update(&user),
        Err(CommitError::Persist(_))
    ));

    assert_eq!(service_user(&repo, 4).email, "mraines@example.com");
    assert_eq!(repo.count::<AuditLogEntry>(), 11);

    let reopened = Repository::open(&path).unwrap();
    assert_eq!(reopened.snapshot(), repo.snapshot());
}

fn service_user(repo: &Repository, id: i64) -> User {
    UserService::new(repo).get_user_by_id(UserId::new(id)).unwrap()
}

#[test]
fn committed_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    {
        let repo = Repository::open(&path).unwrap();
        let mut user = new_user("grace@example.com");
        assert!(repo.create(&mut user));
        user.is_active = true;
        assert!(repo.update(&user));
    }

    let repo = Repository::open(&path).unwrap();
    let service = UserService::new(&repo);
    let user = service.get_user_by_id(UserId::new(1)).unwrap();
    assert!(user.is_active);

    let actions: Vec<LogAction> = service
        .get_logs_by_user_id(user.id)
        .iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec![LogAction::Create, LogAction::Update]);

    let mut next = new_user("next@example.com");
    assert!(repo.create(&mut next));
    assert_eq!(next.id, UserId::new(2));
}

#[test]
fn concurrent_updates_form_a_consistent_chain() {
    let repo = Repository::seeded().unwrap();
    let writers = 8;

    thread::scope(|scope| {
        for n in 0..writers {
            let repo = &repo;
            scope.spawn(move || {
                let service = UserService::new(repo);
                let mut user = service.get_user_by_id(UserId::new(5)).unwrap();
                user.surname = format!("Writer{}", n);
                assert!(service.update(&user));
            });
        }
    });

    let service = UserService::new(&repo);
    let logs = service.get_logs_by_user_id(UserId::new(5));
    assert_eq!(logs.len(), writers + 1);

    for pair in logs.windows(2) {
        assert_eq!(pair[1].action, LogAction::Update);
        assert_eq!(pair[1].prior_state.as_ref(), Some(&pair[0].new_state));
    }

    let last = logs.last().unwrap();
    let stored = service.get_user_by_id(UserId::new(5)).unwrap();
    assert_eq!(last.new_state, stored.to_record());
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let repo = Repository::in_memory();

    thread::scope(|scope| {
        for n in 0..10 {
            let repo = &repo;
            scope.spawn(move || {
                let mut user = new_user(&format!("user{}@example.com", n));
                assert!(repo.create(&mut user));
            });
        }
    });

    let mut ids: Vec<i64> = repo
        .get_all::<User>()
        .iter()
        .map(|user| user.id.value())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());

    let log_users: Vec<UserId> = repo
        .get_all::<AuditLogEntry>()
        .iter()
        .map(|log| log.user_id)
        .collect();
    let users: Vec<UserId> = repo.get_all::<User>().iter().map(|u| u.id).collect();
    assert_eq!(log_users, users);
}

// Every user has a CREATE entry and matches its latest entry; every logged
// user without a DELETE entry is present, and every deleted one is absent.
fn assert_consistent(tables: &Tables) {
    let logs = tables.user_logs.rows();

    for user in tables.users.rows() {
        let trail: Vec<&AuditLogEntry> = logs.iter().filter(|l| l.user_id == user.id).collect();
        assert_eq!(trail.first().map(|l| l.action), Some(LogAction::Create));

        let latest = trail[trail.len() - 1];
        assert_ne!(latest.action, LogAction::Delete);
        assert_eq!(latest.new_state, user.to_record());
    }

    for log in logs {
        let deleted = logs
            .iter()
            .any(|l| l.user_id == log.user_id && l.action == LogAction::Delete);
        assert_eq!(tables.users.get(log.user_id).is_some(), !deleted);
    }
}

#[test]
fn readers_never_observe_a_partial_commit() {
    let repo = Repository::seeded().unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut checked = 0usize;
            while !done.load(Ordering::Acquire) || checked == 0 {
                assert_consistent(&repo.snapshot());
                checked += 1;
            }
            checked
        });

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let repo = &repo;
                scope.spawn(move || {
                    let service = UserService::new(repo);
                    for i in 0..25 {
                        let mut user = new_user(&format!("w{}-{}@example.com", w, i));
                        assert!(service.add_user(&mut user));

                        user.is_active = true;
                        assert!(service.update(&user));

                        if i % 2 == 0 {
                            assert!(service.delete_user_by_id(user.id).unwrap());
                        }
                    }
                })
            })
            .collect();

        let results: Vec<_> = writers.into_iter().map(|w| w.join()).collect();
        done.store(true, Ordering::Release);
        for result in results {
            result.unwrap();
        }
        assert!(reader.join().unwrap() > 0);
    });

    let tables = repo.snapshot();
    assert_consistent(&tables);
    assert_eq!(tables.users.len(), 11 + 4 * 12);
    assert_eq!(tables.user_logs.len(), 11 + 4 * (25 * 2 + 13));
}
