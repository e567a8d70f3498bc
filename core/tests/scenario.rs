use chrono::{Duration, Utc};
use taskboard_core::{
    BoardStore, FileBoardRepository, OverdueMonitor, Stage, TaskPatch, ToastKind,
};

#[test]
fn buy_milk_walks_the_whole_board() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let mut store = BoardStore::load(repo);
    let mut monitor = OverdueMonitor::new();

    // Created with no due date, lands in New with today's creation date.
    let id = store.add_task("Buy milk".to_string(), String::new(), None);
    let task = store.find_task(id).unwrap();
    assert_eq!(task.stage, Stage::New);
    assert_eq!(task.created_at.date_naive(), Utc::now().date_naive());

    let now = Utc::now();
    monitor.rescan(store.tasks(), now);
    assert!(monitor.alerts().is_empty());

    // Ongoing with a past due date gets flagged.
    store.move_task(id, Stage::Ongoing);
    store.set_due_date(id, now - Duration::hours(2));
    monitor.rescan(store.tasks(), now);
    assert_eq!(monitor.alerts(), &[id]);

    // Done: completion stamped, no longer flagged.
    store.move_task(id, Stage::Done);
    monitor.rescan(store.tasks(), now + Duration::seconds(1));
    assert!(store.find_task(id).unwrap().completed_at.is_some());
    assert!(monitor.alerts().is_empty());
}

#[test]
fn board_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let mut store = BoardStore::load(repo);
        let id = store.add_task(
            "Write report".to_string(),
            "Q3 numbers".to_string(),
            Some(Utc::now() + Duration::days(2)),
        );
        store.move_task(id, Stage::Ongoing);
        id
    };

    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let store = BoardStore::load(repo);

    let task = store.find_task(id).expect("task should survive reload");
    assert_eq!(task.title, "Write report");
    assert_eq!(task.description, "Q3 numbers");
    assert_eq!(task.stage, Stage::Ongoing);
    assert!(task.due_date.is_some());
    // Toasts are transient and must not come back.
    assert!(store.toasts().is_empty());
}

#[test]
fn corrupt_board_file_starts_empty_and_stays_usable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("board.json"), "][ definitely not json").unwrap();

    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let mut store = BoardStore::load(repo);
    assert!(store.tasks().is_empty());

    // Mutations still work and overwrite the damaged file.
    store.add_task("Fresh start".to_string(), String::new(), None);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.toasts().last().unwrap().kind, ToastKind::Success);

    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let reloaded = BoardStore::load(repo);
    assert_eq!(reloaded.tasks().len(), 1);
}

#[test]
fn timestamps_round_trip_to_second_precision() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let mut store = BoardStore::load(repo);

    let id = store.add_task(
        "Precise".to_string(),
        String::new(),
        Some(Utc::now() + Duration::minutes(90)),
    );
    store.move_task(id, Stage::Done);
    let original = store.find_task(id).unwrap().clone();

    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let reloaded = BoardStore::load(repo);
    let restored = reloaded.find_task(id).unwrap();

    assert_eq!(restored.id, original.id);
    assert_eq!(restored.title, original.title);
    assert_eq!(restored.stage, original.stage);
    assert_eq!(
        restored.created_at.timestamp(),
        original.created_at.timestamp()
    );
    assert_eq!(
        restored.due_date.map(|d| d.timestamp()),
        original.due_date.map(|d| d.timestamp())
    );
    assert_eq!(
        restored.completed_at.map(|d| d.timestamp()),
        original.completed_at.map(|d| d.timestamp())
    );
}

#[test]
fn update_patch_edits_and_clears_fields_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let mut store = BoardStore::load(repo);

    let id = store.add_task(
        "Rename me".to_string(),
        String::new(),
        Some(Utc::now() + Duration::days(1)),
    );
    store.update_task(
        id,
        TaskPatch {
            title: Some("Renamed".to_string()),
            description: Some("now with details".to_string()),
            due_date: Some(None),
        },
    );

    let task = store.find_task(id).unwrap();
    assert_eq!(task.title, "Renamed");
    assert_eq!(task.description, "now with details");
    assert!(task.due_date.is_none());
}
