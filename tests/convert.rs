use taskboard::backend::RemoteTask;
use taskboard::constants::UNTITLED_TASK;
use taskboard::sync::convert;

fn task(id: &str, status: &str, completed: Option<&str>) -> RemoteTask {
    RemoteTask {
        id: Some(id.to_string()),
        title: Some(format!("Task {id}")),
        status: Some(status.to_string()),
        completed: completed.map(str::to_string),
        ..Default::default()
    }
}

fn ids(tasks: &[taskboard::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_deref().unwrap_or("")).collect()
}

#[test]
fn test_completed_sorted_newest_first_and_capped() {
    let remote = vec![
        task("1", "completed", Some("2024-01-01T00:00:00Z")),
        task("2", "completed", Some("2024-02-01T00:00:00Z")),
        task("3", "completed", None),
    ];

    let (active, completed) = convert(&remote);

    assert!(active.is_empty());
    assert_eq!(ids(&completed), vec!["2", "1"]);
}

#[test]
fn test_active_keeps_remote_order() {
    let remote = vec![
        task("b", "needsAction", None),
        task("x", "completed", Some("2024-03-01T10:00:00.000Z")),
        task("a", "needsAction", None),
        task("c", "needsAction", None),
    ];

    let (active, completed) = convert(&remote);

    assert_eq!(ids(&active), vec!["b", "a", "c"]);
    assert_eq!(ids(&completed), vec!["x"]);
}

#[test]
fn test_missing_status_counts_as_active() {
    let mut record = task("1", "needsAction", None);
    record.status = None;

    let (active, completed) = convert(&[record]);

    assert_eq!(active.len(), 1);
    assert!(completed.is_empty());
}

#[test]
fn test_malformed_timestamp_sorts_last() {
    let remote = vec![
        task("bad", "completed", Some("yesterday-ish")),
        task("old", "completed", Some("2023-06-01T08:00:00Z")),
    ];

    let (_, completed) = convert(&remote);

    assert_eq!(ids(&completed), vec!["old", "bad"]);
    assert!(completed[1].completed_at.is_none());
}

#[test]
fn test_equal_timestamps_keep_remote_order() {
    let remote = vec![
        task("first", "completed", Some("2024-05-05T12:00:00Z")),
        task("second", "completed", Some("2024-05-05T12:00:00Z")),
        task("third", "completed", Some("2024-05-05T12:00:00Z")),
    ];

    let (_, completed) = convert(&remote);

    assert_eq!(ids(&completed), vec!["first", "second"]);
}

#[test]
fn test_offsets_compare_as_instants() {
    let remote = vec![
        // 09:00 UTC
        task("utc", "completed", Some("2024-05-05T09:00:00Z")),
        // 10:00 UTC
        task("plus2", "completed", Some("2024-05-05T12:00:00+02:00")),
    ];

    let (_, completed) = convert(&remote);

    assert_eq!(ids(&completed), vec!["plus2", "utc"]);
}

#[test]
fn test_blank_title_and_missing_notes() {
    let remote = vec![
        RemoteTask {
            id: Some("1".to_string()),
            title: Some("   ".to_string()),
            status: Some("needsAction".to_string()),
            ..Default::default()
        },
        RemoteTask {
            id: Some("2".to_string()),
            title: None,
            notes: Some("call before noon".to_string()),
            status: Some("needsAction".to_string()),
            ..Default::default()
        },
    ];

    let (active, _) = convert(&remote);

    assert_eq!(active[0].title, UNTITLED_TASK);
    assert_eq!(active[0].description, "");
    assert_eq!(active[1].title, UNTITLED_TASK);
    assert_eq!(active[1].description, "call before noon");
}

#[test]
fn test_empty_remote_id_becomes_local() {
    let mut record = task("", "needsAction", None);
    record.title = Some("Draft".to_string());

    let (active, _) = convert(&[record]);

    assert_eq!(active[0].id, None);
    assert!(active[0].is_local());
}

#[test]
fn test_empty_input() {
    let (active, completed) = convert(&[]);
    assert!(active.is_empty());
    assert!(completed.is_empty());
}
