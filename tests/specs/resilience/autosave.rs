//! Editing a form with auto-save and the unsaved-changes guard

use af_engine::{AutoSave, ExitDecision, ExitHooks, UnsavedChangesGuard};
use af_storage::{FileKvStore, KvStore, MemoryKvStore};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use similar_asserts::assert_eq;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TransferForm {
    destination: u32,
    note: String,
}

fn form(destination: u32, note: &str) -> TransferForm {
    TransferForm {
        destination,
        note: note.to_string(),
    }
}

const AUTOSAVE_CONFIG: &str = r#"
[autosave]
debounce = "500ms"
key_prefix = "portal"
"#;

#[tokio::test(start_paused = true)]
async fn draft_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = PortalConfig::parse(AUTOSAVE_CONFIG).unwrap();
    let store = FileKvStore::open(dir.path()).unwrap();

    let autosave: AutoSave<TransferForm, _> =
        AutoSave::from_config("form:transfer", store.clone(), &config.autosave, EventBus::new());
    assert_eq!(autosave.key(), "portal:form:transfer");
    assert_eq!(autosave.interval(), Duration::from_millis(500));

    autosave.push(form(4, "n"));
    autosave.push(form(4, "new office"));
    tokio::time::sleep(Duration::from_millis(600)).await;
    drop(autosave);

    // A fresh page over the same directory restores the draft
    let restored: AutoSave<TransferForm, _> = AutoSave::from_config(
        "form:transfer",
        FileKvStore::open(dir.path()).unwrap(),
        &config.autosave,
        EventBus::new(),
    );
    assert_eq!(restored.load(), Some(form(4, "new office")));

    restored.clear().await;
    assert_eq!(restored.load(), None);
    assert_eq!(store.get("portal:form:transfer").unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn guard_tracks_unsaved_edits_until_submit() {
    let store = MemoryKvStore::new();
    let hooks = ExitHooks::new();
    let autosave = AutoSave::spawn(
        "form:transfer",
        store.clone(),
        Duration::from_millis(500),
        EventBus::new(),
    );
    let guard = UnsavedChangesGuard::install(&hooks, "You have unsaved changes");
    assert_eq!(hooks.request_exit(), ExitDecision::Proceed);

    autosave.push(form(2, "draft"));
    guard.set_dirty(true);
    assert_eq!(
        hooks.request_exit(),
        ExitDecision::Confirm {
            message: "You have unsaved changes".to_string()
        }
    );

    // Submitting: cancel the pending save, drop the draft, clear the guard
    autosave.clear().await;
    guard.set_dirty(false);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(store.writes().is_empty());
    assert_eq!(hooks.request_exit(), ExitDecision::Proceed);

    drop(guard);
    assert_eq!(hooks.guard_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn navigation_away_flushes_pending_edit() {
    let store = MemoryKvStore::new();
    let bus = EventBus::new();
    let mut rx = bus.subscribe_all("spec");
    let autosave = AutoSave::spawn("form:transfer", store.clone(), Duration::from_secs(5), bus);

    autosave.push(form(7, "urgent"));
    autosave.flush().await;

    assert_eq!(autosave.load(), Some(form(7, "urgent")));
    assert_eq!(
        rx.try_recv().unwrap(),
        Event::AutosavePersisted {
            key: "form:transfer".to_string()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn unreadable_draft_starts_empty() {
    let store = MemoryKvStore::new();
    store.set("form:transfer", "{not json").unwrap();
    let autosave: AutoSave<TransferForm, _> = AutoSave::spawn(
        "form:transfer",
        store,
        Duration::from_millis(500),
        EventBus::new(),
    );

    assert_eq!(autosave.load(), None);
}
