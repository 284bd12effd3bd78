//! Property tests for the task model.
//!
//! Uses proptest to verify:
//! 1. A partial update changes exactly the fields it names.
//! 2. Status and priority strings, known or not, survive a JSON trip verbatim.
//! 3. Arbitrary JSON objects never panic `TaskUpdate` parsing.

use proptest::prelude::*;
use taskflow_proto::task::{NewTask, Priority, Task, TaskId, TaskStatus, TaskUpdate};

/// Strategy for status values, mixing the three columns with arbitrary text.
fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
        "[A-Za-z_]{0,12}".prop_map(TaskStatus::from),
    ]
}

/// Strategy for priority values, mixing the known levels with arbitrary text.
fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        "[A-Za-z_]{0,12}".prop_map(Priority::from),
    ]
}

/// Strategy for a stored task.
fn arb_task() -> impl Strategy<Value = Task> {
    ("[^\x00]{0,32}", "[^\x00]{0,64}", arb_status(), arb_priority()).prop_map(
        |(title, description, status, priority)| {
            Task::from_new(
                TaskId::new(),
                NewTask {
                    title,
                    description,
                    status,
                    priority,
                },
            )
        },
    )
}

/// Strategy for a partial update with each field independently present.
fn arb_update() -> impl Strategy<Value = TaskUpdate> {
    (
        proptest::option::of("[^\x00]{0,32}"),
        proptest::option::of("[^\x00]{0,64}"),
        proptest::option::of(arb_status()),
        proptest::option::of(arb_priority()),
    )
        .prop_map(|(title, description, status, priority)| TaskUpdate {
            title,
            description,
            status,
            priority,
        })
}

proptest! {
    #[test]
    fn partial_update_touches_only_named_fields(task in arb_task(), update in arb_update()) {
        let before = task.clone();
        let mut after = task;
        after.apply_update(update.clone());

        prop_assert_eq!(&after.id, &before.id);
        prop_assert_eq!(&after.title, update.title.as_ref().unwrap_or(&before.title));
        prop_assert_eq!(
            &after.description,
            update.description.as_ref().unwrap_or(&before.description)
        );
        prop_assert_eq!(&after.status, update.status.as_ref().unwrap_or(&before.status));
        prop_assert_eq!(&after.priority, update.priority.as_ref().unwrap_or(&before.priority));
    }

    #[test]
    fn status_string_survives_json(raw in "[A-Za-z_]{0,16}") {
        let status = TaskStatus::from(raw.clone());
        let json = serde_json::to_string(&status).unwrap();
        prop_assert_eq!(json, serde_json::to_string(&raw).unwrap());
    }

    #[test]
    fn priority_string_survives_json(raw in "[A-Za-z_]{0,16}") {
        let priority = Priority::from(raw.clone());
        let back: Priority = serde_json::from_str(&serde_json::to_string(&priority).unwrap()).unwrap();
        prop_assert_eq!(back.as_str(), raw.as_str());
    }

    #[test]
    fn update_parsing_never_panics(keys in prop::collection::vec("[a-z]{1,11}", 0..6), text in "[^\x00]{0,16}") {
        let mut object = serde_json::Map::new();
        for key in keys {
            object.insert(key, serde_json::Value::String(text.clone()));
        }
        let _ = serde_json::from_value::<TaskUpdate>(serde_json::Value::Object(object));
    }
}
