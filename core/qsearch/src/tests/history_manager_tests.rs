use super::support::*;
use crate::domain::{
    encode_history, EntryRef, HistoryEntry, HistoryError, HistoryList, Notification,
    NotificationKind,
};
use crate::ports::inbound::HistoryIntents;
use crate::usecase::history_manager::HISTORY_KEY;
use crate::usecase::OverlapPolicy;
use common::domain::EntryId;
use common::ports::outbound::LogLevel;
use std::sync::Arc;
use std::time::Duration;

fn queries(entries: &[HistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.query.as_str()).collect()
}

#[test]
fn test_submit_prepends_entry_and_notifies() {
    let h = Harness::default();
    let manager = h.manager();
    h.input.set_text("cats");

    let entry = manager.submit_search("cats").unwrap();

    let entries = manager.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], entry);
    assert_eq!(entry.query, "cats");
    assert_eq!(h.launcher.opened(), vec!["https://www.google.com/search?q=cats"]);
    assert_eq!(h.notifier.sent(), vec![Notification::search_opened("cats")]);
    // 成功時は入力欄がクリアされ、フォーカスも外れている
    assert_eq!(h.input.text(), "");
    assert!(!h.input.is_focused());
    assert!(!manager.is_searching());
}

#[test]
fn test_submit_keeps_query_exactly() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search(" cats & dogs ").unwrap();
    assert_eq!(manager.entries()[0].query, " cats & dogs ");
    assert_eq!(
        h.launcher.opened(),
        vec!["https://www.google.com/search?q=%20cats%20%26%20dogs%20"]
    );
}

#[test]
fn test_empty_query_never_launches_or_mutates() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search("cats").unwrap();
    let writes = h.store.writes();

    let err = manager.submit_search("").unwrap_err();

    assert_eq!(err, HistoryError::empty_query());
    assert_eq!(h.launcher.started(), 1);
    assert_eq!(queries(&manager.entries()), vec!["cats"]);
    assert_eq!(h.store.writes(), writes);
    assert_eq!(h.notifier.sent().len(), 1);
    assert!(!manager.is_searching());
}

#[test]
fn test_launch_failure_leaves_history_unchanged() {
    let h = Harness::new(MemoryStore::default(), RecordingLauncher::failing("no browser"));
    let manager = h.manager();
    h.input.set_text("cats");

    let err = manager.submit_search("cats").unwrap_err();

    assert_eq!(err, HistoryError::Launch("no browser".to_string()));
    assert!(manager.entries().is_empty());
    assert!(!manager.is_searching());
    assert_eq!(
        h.notifier.sent(),
        vec![Notification::launch_failed("no browser")]
    );
    // 失敗時は入力欄の文字列が残る
    assert_eq!(h.input.text(), "cats");
    assert_eq!(h.store.writes(), 0);
    assert_eq!(h.log.messages_at(LogLevel::Warn), vec!["browser launch failed"]);
}

#[test]
fn test_search_again_adds_duplicate_and_keeps_original() {
    let h = Harness::default();
    let manager = h.manager();
    let first = manager.submit_search("cats").unwrap();
    manager.submit_search("dogs").unwrap();

    let again = manager.search_again(&first.query).unwrap();

    let entries = manager.entries();
    assert_eq!(queries(&entries), vec!["cats", "dogs", "cats"]);
    assert_ne!(again.id, first.id);
    assert_eq!(entries[2], first);
}

#[test]
fn test_search_again_ref_by_index_and_unknown_id() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search("cats").unwrap();
    manager.submit_search("dogs").unwrap();

    manager.search_again_ref(&EntryRef::Index(2)).unwrap();
    assert_eq!(queries(&manager.entries()), vec!["cats", "dogs", "cats"]);

    let err = manager
        .search_again_ref(&EntryRef::Id(EntryId::new("missing")))
        .unwrap_err();
    assert_eq!(err, HistoryError::NotFound("missing".to_string()));
    assert_eq!(h.launcher.started(), 3);
}

#[test]
fn test_delete_present_entry_preserves_order() {
    let h = Harness::default();
    let manager = h.manager();
    for q in ["a", "b", "c"] {
        manager.submit_search(q).unwrap();
    }
    let middle = manager.entries()[1].clone();

    assert!(manager.delete_entry(&middle.id).unwrap());

    assert_eq!(queries(&manager.entries()), vec!["c", "a"]);
    assert_eq!(h.notifier.sent().last(), Some(&Notification::entry_deleted()));
}

#[test]
fn test_delete_absent_entry_is_noop_but_notifies() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search("cats").unwrap();
    let before = manager.entries();

    assert!(!manager.delete_entry(&EntryId::new("nope")).unwrap());

    assert_eq!(manager.entries(), before);
    let last = h.notifier.sent().last().cloned().unwrap();
    assert_eq!(last.kind, NotificationKind::Info);
    assert_eq!(last.message, "Search removed from history");
}

#[test]
fn test_clear_all_is_idempotent() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search("cats").unwrap();
    manager.submit_search("dogs").unwrap();

    manager.clear_all().unwrap();
    assert!(manager.entries().is_empty());
    manager.clear_all().unwrap();
    assert!(manager.entries().is_empty());

    let cleared = h
        .notifier
        .sent()
        .into_iter()
        .filter(|n| *n == Notification::history_cleared())
        .count();
    assert_eq!(cleared, 2);
}

#[test]
fn test_cats_dogs_scenario() {
    let h = Harness::default();
    let manager = h.manager();

    manager.submit_search("cats").unwrap();
    manager.submit_search("dogs").unwrap();
    assert_eq!(queries(&manager.entries()), vec!["dogs", "cats"]);

    let cats = manager.entries()[1].clone();
    manager.delete_entry(&cats.id).unwrap();
    assert_eq!(queries(&manager.entries()), vec!["dogs"]);

    manager.clear_all().unwrap();
    assert!(manager.entries().is_empty());

    // 再起動しても空のまま
    let reloaded = h.manager();
    assert!(reloaded.entries().is_empty());
}

#[test]
fn test_persist_then_reload_is_equal() {
    let h = Harness::default();
    let manager = h.manager();
    manager.submit_search("cats").unwrap();
    manager.submit_search("ねこ & dogs").unwrap();

    let reloaded = h.manager();

    assert_eq!(reloaded.entries(), manager.entries());
    let stored = h.store.value(HISTORY_KEY).unwrap();
    let v: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(v["version"], 1);
}

#[test]
fn test_load_legacy_array() {
    let raw = r#"[{"id":"k1","query":"cats","timestamp":"2024-03-01T10:00:00.000Z"}]"#;
    let h = Harness::new(MemoryStore::with_value(HISTORY_KEY, raw), RecordingLauncher::default());
    let manager = h.manager();
    assert_eq!(queries(&manager.entries()), vec!["cats"]);
    assert_eq!(
        h.log.messages_at(LogLevel::Info),
        vec!["migrated unversioned stored history"]
    );
}

#[test]
fn test_corrupt_stored_value_starts_empty() {
    let h = Harness::new(
        MemoryStore::with_value(HISTORY_KEY, "{not json"),
        RecordingLauncher::default(),
    );
    let manager = h.manager();
    assert!(manager.entries().is_empty());
    assert_eq!(
        h.log.messages_at(LogLevel::Warn),
        vec!["discarding unreadable stored history"]
    );

    // 次の書き込みで正しい形式に置き換わる
    manager.submit_search("cats").unwrap();
    assert_eq!(h.manager().entries().len(), 1);
}

#[test]
fn test_store_read_failure_starts_empty() {
    let mut list = HistoryList::new();
    list.prepend(HistoryEntry::new(
        EntryId::new("k1"),
        "cats",
        chrono::Utc::now(),
    ))
    .unwrap();
    let store = MemoryStore::with_value(HISTORY_KEY, &encode_history(&list).unwrap());
    store.set_fail_reads(true);
    let h = Harness::new(store, RecordingLauncher::default());

    assert!(h.manager().entries().is_empty());
    assert_eq!(
        h.log.messages_at(LogLevel::Warn),
        vec!["failed to read stored history; starting empty"]
    );
}

#[test]
fn test_write_failure_keeps_memory_authoritative() {
    let h = Harness::default();
    h.store.set_fail_writes(true);
    let manager = h.manager();

    manager.submit_search("cats").unwrap();

    assert_eq!(queries(&manager.entries()), vec!["cats"]);
    assert_eq!(h.store.value(HISTORY_KEY), None);
    assert_eq!(h.notifier.sent(), vec![Notification::search_opened("cats")]);
    assert_eq!(
        h.log.messages_at(LogLevel::Warn),
        vec!["failed to persist history"]
    );
}

#[test]
fn test_duplicate_id_is_rejected() {
    let mut h = Harness::default();
    h.id_gen = Arc::new(ConstIdGenerator("sameid00"));
    let manager = h.manager();

    manager.submit_search("cats").unwrap();
    let err = manager.submit_search("dogs").unwrap_err();

    assert_eq!(err, HistoryError::DuplicateId(EntryId::new("sameid00")));
    assert_eq!(queries(&manager.entries()), vec!["cats"]);
    assert!(!manager.is_searching());
    // ブラウザは開いているので、履歴に残らなかったことを通知する
    assert_eq!(h.launcher.started(), 2);
    assert_eq!(
        h.notifier.sent(),
        vec![
            Notification::search_opened("cats"),
            Notification::not_recorded("duplicate history entry id 'sameid00'"),
        ]
    );
    assert_eq!(h.notifier.sent()[1].kind, NotificationKind::Error);
    assert_eq!(h.log.messages_at(LogLevel::Warn), vec!["search not recorded"]);
    assert_eq!(h.store.writes(), 1);
}

#[test]
fn test_state_reports_searching_while_launch_in_flight() {
    let h = Harness::new(MemoryStore::default(), RecordingLauncher::held());
    let manager = Arc::new(h.manager());

    let m = Arc::clone(&manager);
    let handle = std::thread::spawn(move || m.submit_search("cats"));
    wait_until(|| h.launcher.started() == 1);

    // 実行中でも state() は待たずに返る
    let state = manager.state();
    assert!(state.is_searching);
    assert!(state.entries.is_empty());

    h.launcher.release();
    handle.join().unwrap().unwrap();
    let state = manager.state();
    assert!(!state.is_searching);
    assert_eq!(state.entries.len(), 1);
}

#[test]
fn test_overlapping_submits_queue_in_call_order() {
    let h = Harness::new(MemoryStore::default(), RecordingLauncher::held());
    let manager = Arc::new(h.manager_with(OverlapPolicy::Queue));

    let m = Arc::clone(&manager);
    let first = std::thread::spawn(move || m.submit_search("first"));
    wait_until(|| h.launcher.started() == 1);

    let m = Arc::clone(&manager);
    let second = std::thread::spawn(move || m.submit_search("second"));
    std::thread::sleep(Duration::from_millis(50));
    // 2 件目は先の操作が終わるまでブラウザを開かない
    assert_eq!(h.launcher.started(), 1);

    h.launcher.release();
    first.join().unwrap().unwrap();
    second.join().unwrap().unwrap();

    assert_eq!(queries(&manager.entries()), vec!["second", "first"]);
    assert_eq!(
        h.launcher.opened(),
        vec![
            "https://www.google.com/search?q=first",
            "https://www.google.com/search?q=second"
        ]
    );
}

#[test]
fn test_overlapping_submit_rejected_when_busy() {
    let h = Harness::new(MemoryStore::default(), RecordingLauncher::held());
    let manager = Arc::new(h.manager_with(OverlapPolicy::Reject));

    let m = Arc::clone(&manager);
    let first = std::thread::spawn(move || m.submit_search("first"));
    wait_until(|| h.launcher.started() == 1);

    assert_eq!(manager.submit_search("second"), Err(HistoryError::Busy));
    assert_eq!(manager.clear_all(), Err(HistoryError::Busy));

    h.launcher.release();
    first.join().unwrap().unwrap();

    assert_eq!(queries(&manager.entries()), vec!["first"]);
    assert_eq!(h.launcher.started(), 1);
    assert_eq!(h.notifier.sent(), vec![Notification::search_opened("first")]);
}

#[test]
fn test_persist_finishes_before_operation_completes() {
    let h = Harness::default();
    h.store.hold_writes();
    let manager = Arc::new(h.manager());

    let m = Arc::clone(&manager);
    let first = std::thread::spawn(move || m.submit_search("first"));
    wait_until(|| h.store.writes() == 1);

    // 保存中は検索中のまま。メモリ上の一覧には既に入っている
    let state = manager.state();
    assert!(state.is_searching);
    assert_eq!(queries(&state.entries), vec!["first"]);

    let m = Arc::clone(&manager);
    let second = std::thread::spawn(move || m.submit_search("second"));
    std::thread::sleep(Duration::from_millis(50));
    // 保存が終わるまで次の操作はブラウザを開かない
    assert_eq!(h.launcher.started(), 1);
    assert!(h.notifier.sent().is_empty());

    h.store.release_writes();
    first.join().unwrap().unwrap();
    second.join().unwrap().unwrap();

    assert!(!manager.is_searching());
    assert_eq!(h.store.writes(), 2);
    assert_eq!(queries(&h.manager().entries()), vec!["second", "first"]);
}

#[test]
fn test_reject_policy_busy_while_persisting() {
    let h = Harness::default();
    h.store.hold_writes();
    let manager = Arc::new(h.manager_with(OverlapPolicy::Reject));

    let m = Arc::clone(&manager);
    let first = std::thread::spawn(move || m.submit_search("first"));
    wait_until(|| h.store.writes() == 1);

    assert!(manager.state().is_searching);
    assert_eq!(manager.clear_all(), Err(HistoryError::Busy));
    assert_eq!(manager.submit_search("second"), Err(HistoryError::Busy));

    h.store.release_writes();
    first.join().unwrap().unwrap();

    assert_eq!(queries(&manager.entries()), vec!["first"]);
    assert_eq!(h.launcher.started(), 1);
    assert_eq!(h.store.writes(), 1);
}
