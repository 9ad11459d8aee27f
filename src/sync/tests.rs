use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use super::{LoadOrigin, SyncEngine};
use crate::cache::LocalCache;
use crate::domain::{AppData, Participant, Trip, TripType, DEFAULT_WEEK_NAME};
use crate::remote::fake::FakeRemote;
use crate::remote::OfflineRemote;

const QUIET: Duration = Duration::from_millis(120);

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("carona-sync-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&root).expect("workspace should be creatable");
        Self { root }
    }

    fn cache(&self) -> LocalCache {
        LocalCache::open(&self.root.join("cache.sqlite")).expect("cache should open")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn sample_doc(week: &str) -> AppData {
    let mut trip = Trip::new("Segunda-feira (03/06)", TripType::Ida);
    trip.participants.push(Participant {
        id: "p-ana".to_string(),
        name: "Ana".to_string(),
        paid: true,
    });
    AppData {
        active_trips: vec![trip],
        current_week_name: week.to_string(),
        ..AppData::default()
    }
}

fn settle() {
    thread::sleep(QUIET * 4);
}

#[test]
fn load_prefers_remote_payload_and_refreshes_cache() {
    let ws = Workspace::new();
    let stale = sample_doc("Semana velha");
    ws.cache().write(&stale);

    let fresh = sample_doc("Semana 03/06/2024 - 07/06/2024");
    let remote = Arc::new(FakeRemote::with_row(fresh.to_value()));
    let engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    assert_eq!(engine.origin(), LoadOrigin::Remote);
    assert_eq!(engine.document(), &fresh);
    assert_eq!(ws.cache().read(), Some(fresh));
    engine.close();
    assert!(remote.writes().is_empty());
}

#[test]
fn load_initializes_absent_remote_row() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::default());
    let engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    assert_eq!(engine.origin(), LoadOrigin::Initialized);
    assert_eq!(engine.document(), &AppData::default());
    assert_eq!(remote.writes(), vec![AppData::default().to_value()]);
    engine.close();
}

#[test]
fn load_falls_back_to_local_cache_when_remote_is_down() {
    let ws = Workspace::new();
    let cached = sample_doc("Semana cache");
    ws.cache().write(&cached);

    let remote = Arc::new(FakeRemote::unreachable());
    let engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    assert_eq!(engine.origin(), LoadOrigin::LocalCache);
    assert_eq!(engine.document(), &cached);
    engine.close();
    assert!(remote.writes().is_empty());
}

#[test]
fn load_yields_empty_document_with_nothing_anywhere() {
    let ws = Workspace::new();
    let engine = SyncEngine::load(ws.cache(), Arc::new(OfflineRemote), QUIET);

    assert_eq!(engine.origin(), LoadOrigin::Empty);
    assert_eq!(engine.document().current_week_name, DEFAULT_WEEK_NAME);
    assert!(engine.document().active_trips.is_empty());
    engine.close();
}

#[test]
fn load_sanitizes_malformed_remote_payload() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(json!({
        "active_trips": "nope",
        "currentWeekName": 42,
        "stray": true
    })));
    let engine = SyncEngine::load(ws.cache(), remote, QUIET);

    assert_eq!(engine.origin(), LoadOrigin::Remote);
    assert_eq!(engine.document(), &AppData::default());
    engine.close();
}

#[test]
fn many_saves_reach_the_remote_as_one_write_with_the_last_document() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(AppData::default().to_value()));
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    let mut last = AppData::default();
    for n in 0..6 {
        last = sample_doc(&format!("Semana {n}"));
        engine.save(last.clone());
        assert_eq!(ws.cache().read(), Some(last.clone()));
    }
    assert!(remote.writes().is_empty());
    assert!(engine.has_pending_push());

    settle();
    assert_eq!(remote.writes(), vec![last.to_value()]);
    assert!(!engine.has_pending_push());
    engine.close();
}

#[test]
fn close_flushes_the_pending_save() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(AppData::default().to_value()));
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), Duration::from_secs(60));

    let doc = sample_doc("Semana final");
    engine.save(doc.clone());
    engine.close();

    assert_eq!(remote.row(), Some(doc.to_value()));
}

#[test]
fn rejected_update_leaves_everything_untouched() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(sample_doc("Semana A").to_value()));
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);
    let before = engine.document().clone();

    let result: Result<(), &str> = engine.update(|doc| {
        doc.active_trips.clear();
        Err("rejected")
    });

    assert_eq!(result, Err("rejected"));
    assert_eq!(engine.document(), &before);
    assert!(!engine.has_pending_push());
    engine.close();
    assert!(remote.writes().is_empty());
}

#[test]
fn accepted_update_saves_the_mutated_copy() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(sample_doc("Semana A").to_value()));
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    let count = engine
        .update(|doc| -> Result<usize, ()> {
            doc.current_week_name = "Semana B".to_string();
            Ok(doc.active_trips.len())
        })
        .expect("update should succeed");

    assert_eq!(count, 1);
    assert_eq!(engine.document().current_week_name, "Semana B");
    engine.close();
    let pushed = remote.row().expect("remote row should exist");
    assert_eq!(pushed["currentWeekName"], json!("Semana B"));
}

#[test]
fn factory_reset_clears_local_state_without_touching_remote() {
    let ws = Workspace::new();
    let original = sample_doc("Semana compartilhada");
    let remote = Arc::new(FakeRemote::with_row(original.to_value()));
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), Duration::from_secs(60));

    engine.save(sample_doc("Semana local"));
    engine.factory_reset();

    assert_eq!(engine.document(), &AppData::default());
    assert!(ws.cache().read().is_none());
    assert!(!engine.has_pending_push());
    engine.close();

    assert!(remote.writes().is_empty());
    assert_eq!(remote.row(), Some(original.to_value()));
}

#[test]
fn remote_failures_do_not_disturb_local_saves() {
    let ws = Workspace::new();
    let remote = Arc::new(FakeRemote::with_row(AppData::default().to_value()));
    remote.set_reject_writes(true);
    let mut engine = SyncEngine::load(ws.cache(), remote.clone(), QUIET);

    let doc = sample_doc("Semana offline");
    engine.save(doc.clone());
    settle();

    assert_eq!(remote.writes().len(), 1);
    assert_eq!(engine.document(), &doc);
    assert_eq!(ws.cache().read(), Some(doc));
    assert!(engine.remote().ping());
    engine.close();
}
