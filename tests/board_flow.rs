use std::collections::HashSet;
use std::fs;

use taskers::config::Config;
use taskers::filter::{PriorityFilter, StatusFilter};
use taskers::storage::{JsonFile, OnCorrupt};
use taskers::{apply, FilterCriteria, Priority, TaskFields, TaskStore, TodoBoard, TodoError};
use tempfile::TempDir;

#[test]
fn buy_milk_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let file = JsonFile::new(dir.path().join("todos.json"));
    let mut store = TaskStore::from_tasks(file.load().unwrap());
    assert!(store.is_empty());

    let task = store
        .create(TaskFields::titled("Buy milk").with_priority(Priority::Medium))
        .unwrap();
    assert!(!task.completed);
    file.save(store.tasks()).unwrap();

    assert_eq!(file.load().unwrap(), vec![task]);
}

#[test]
fn ids_unique_across_sessions() {
    let dir = TempDir::new().unwrap();
    let config = Config::new(dir.path().join("todos.json"));
    let mut seen = HashSet::new();

    for session in 0..3 {
        let mut board = TodoBoard::open(&config).unwrap();
        for n in 0..4 {
            let task = board.add(TaskFields::titled(format!("s{session} t{n}"))).unwrap();
            assert!(seen.insert(task.id), "id reused: {}", task.id);
        }
        let first = board.tasks()[0].id;
        board.remove(first).unwrap();
    }

    let board = TodoBoard::open(&config).unwrap();
    assert_eq!(board.tasks().len(), 9);
}

#[test]
fn delete_leaves_neighbours_untouched() {
    let dir = TempDir::new().unwrap();
    let mut board = TodoBoard::open(&Config::new(dir.path().join("todos.json"))).unwrap();
    for title in ["a", "b", "c", "d"] {
        board.add(TaskFields::titled(title)).unwrap();
    }
    let before = board.tasks().to_vec();

    board.remove(before[1].id).unwrap();

    let expected = vec![before[0].clone(), before[2].clone(), before[3].clone()];
    assert_eq!(board.tasks(), expected.as_slice());
}

#[test]
fn filters_over_reloaded_collection() {
    let dir = TempDir::new().unwrap();
    let config = Config::new(dir.path().join("todos.json"));
    let mut board = TodoBoard::open(&config).unwrap();
    let high = board
        .add(TaskFields::titled("Renew insurance").with_priority(Priority::High))
        .unwrap();
    board
        .add(TaskFields::titled("Sort photos").with_priority(Priority::Low))
        .unwrap();
    board.toggle(high.id).unwrap();

    let tasks = TodoBoard::open(&config).unwrap().tasks().to_vec();
    let criteria = FilterCriteria {
        priority: PriorityFilter::Only(Priority::High),
        status: StatusFilter::Completed,
        ..Default::default()
    };

    let visible = apply(&tasks, &criteria);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, high.id);
    assert_eq!(apply(&tasks, &FilterCriteria::default()), tasks);
}

#[test]
fn corrupt_file_policy_is_configurable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(&path, r#"[{"title": "no id"}]"#).unwrap();

    let mut config = Config::new(&path);
    assert!(matches!(
        TodoBoard::open(&config),
        Err(TodoError::CorruptStore { .. })
    ));

    config.on_corrupt = OnCorrupt::Reset;
    let board = TodoBoard::open(&config).unwrap();
    assert!(board.tasks().is_empty());
    let moved_aside = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("todos.json.corrupt-"));
    assert!(moved_aside);
}
