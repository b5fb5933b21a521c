//! Concurrency tests: several processes and threads sharing one database file.

use assert_cmd::cargo::cargo_bin;
use chrono::NaiveDate;
use diarist::db::{Database, SqliteStore};
use diarist::store::{EntryStore, SessionStore};
use diarist::Interpreter;
use serial_test::serial;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

use test_helpers::TEST_SENDER;

/// Kills and reaps a child process if the test bails out early.
struct ChildProcessGuard {
    child: Option<Child>,
}

impl ChildProcessGuard {
    fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    fn wait_with_output(mut self) -> std::io::Result<std::process::Output> {
        self.child
            .take()
            .expect("child already reaped")
            .wait_with_output()
    }
}

impl Drop for ChildProcessGuard {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Ok(None) = child.try_wait() {
                if let Err(e) = child.kill() {
                    eprintln!("Failed to kill diarist process: {}", e);
                }
            }
            let _ = child.wait();
        }
    }
}

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

#[test]
#[serial]
fn test_parallel_processes_share_database() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("shared.db");

    // Create the schema up front so the processes only race on writes
    let db = Database::open(&db_path).unwrap();
    db.initialize_schema().unwrap();
    drop(db);

    let process_count = 4;
    let adds_per_process = 10;

    let mut guards = Vec::new();
    for p in 0..process_count {
        let mut child = Command::new(cargo_bin("diarist"))
            .env_clear()
            .env("DIARIST_DB", &db_path)
            .env("DIARIST_SENDER", TEST_SENDER)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn diarist");

        let mut input = String::from("select date 1-1-2025\n");
        for i in 0..adds_per_process {
            input.push_str(&format!("add process {} note {}\n", p, i));
        }
        child
            .stdin
            .take()
            .expect("stdin piped")
            .write_all(input.as_bytes())
            .unwrap();

        guards.push(ChildProcessGuard::new(child));
    }

    for guard in guards {
        let output = guard.wait_with_output().unwrap();
        assert!(
            output.status.success(),
            "diarist failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let store = SqliteStore::new(Database::open(&db_path).unwrap());
    let listing = store.list(TEST_SENDER, "default", "1-1-2025").unwrap();
    assert_eq!(listing.len(), process_count * adds_per_process);
}

#[test]
fn test_threads_on_distinct_owners_do_not_interfere() {
    let temp_dir = tempdir().unwrap();
    let db = Database::open(&temp_dir.path().join("threads.db")).unwrap();
    db.initialize_schema().unwrap();
    let interpreter = Arc::new(Interpreter::new(SqliteStore::with_today(db, fixed_today)));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let interpreter = Arc::clone(&interpreter);
            thread::spawn(move || {
                let owner = format!("owner-{}", t);
                let diary = format!("diary-{}", t);
                interpreter
                    .handle(&owner, &format!("create diary {}", diary))
                    .unwrap();
                for i in 0..5 {
                    interpreter
                        .handle(&owner, &format!("add {} note {}", owner, i))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..4 {
        let owner = format!("owner-{}", t);
        let session = interpreter.store().get_or_create(&owner).unwrap();
        assert_eq!(session.current_diary, format!("diary-{}", t));

        let listing = interpreter
            .store()
            .list(&owner, &session.current_diary, "15-3-2025")
            .unwrap();
        assert_eq!(listing.len(), 5);
        assert!(listing.iter().all(|e| e.content.starts_with(&owner)));
    }
}

#[test]
fn test_same_owner_selects_and_adds_from_many_threads() {
    let temp_dir = tempdir().unwrap();
    let db = Database::open(&temp_dir.path().join("same_owner.db")).unwrap();
    db.initialize_schema().unwrap();
    let interpreter = Arc::new(Interpreter::new(SqliteStore::with_today(db, fixed_today)));

    let thread_count = 8;
    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let interpreter = Arc::clone(&interpreter);
            thread::spawn(move || {
                let select = if i % 2 == 0 {
                    format!("select diary d{}", i)
                } else {
                    format!("select date {}-1-2025", i)
                };
                for n in 0..3 {
                    interpreter.handle(TEST_SENDER, &select).unwrap();
                    interpreter
                        .handle(TEST_SENDER, &format!("add thread {} note {}", i, n))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Each field holds a value some thread wrote; neither was reset by the other setter
    let session = interpreter.store().get_or_create(TEST_SENDER).unwrap();
    let written_diaries: Vec<String> = (0..thread_count)
        .filter(|i| i % 2 == 0)
        .map(|i| format!("d{}", i))
        .collect();
    let written_dates: Vec<String> = (0..thread_count)
        .filter(|i| i % 2 == 1)
        .map(|i| format!("{}-1-2025", i))
        .collect();
    assert!(
        written_diaries.contains(&session.current_diary),
        "unexpected diary {}",
        session.current_diary
    );
    assert!(
        written_dates.contains(&session.current_date),
        "unexpected date {}",
        session.current_date
    );

    let conn = interpreter.store().database().get_conn().unwrap();
    let (total, distinct): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COUNT(DISTINCT id) FROM entries WHERE owner = ?1",
            [TEST_SENDER],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(total, (thread_count * 3) as i64);
    assert_eq!(total, distinct);

    let sessions: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sessions WHERE owner = ?1",
            [TEST_SENDER],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sessions, 1);
}
