use chrono::Utc;
use linguaflow::{
    ChangeKind, ConversationListStore, ConversationQuery, ConversationStatus, NewConversation,
    StatusFilter, StoreError,
};

fn scenario_store() -> ConversationListStore {
    ConversationListStore::new(vec![
        NewConversation::new("1", "Conversation au restaurant", "Français")
            .with_status(ConversationStatus::Active),
        NewConversation::new("2", "Job interview practice", "Anglais")
            .with_status(ConversationStatus::Completed),
        NewConversation::new("3", "Réservation d'hôtel", "Français")
            .with_status(ConversationStatus::Archived),
    ])
    .unwrap()
}

#[test]
fn test_history_scenario() {
    let mut store = scenario_store();

    let archived = store.list("", StatusFilter::Only(ConversationStatus::Archived));
    assert_eq!(archived.ids(), vec!["3"]);

    store.complete("1").unwrap();
    let completed = store.list("", StatusFilter::Only(ConversationStatus::Completed));
    assert_eq!(completed.ids(), vec!["2", "1"]);

    let previous = store.archive("2").unwrap();
    assert_eq!(previous, ConversationStatus::Completed);
    assert!(store.undo_archive("2", ConversationStatus::Completed));
    assert_eq!(store.get("2").unwrap().status, ConversationStatus::Completed);
}

#[test]
fn test_search_is_case_insensitive() {
    let store = scenario_store();
    assert_eq!(store.list("RESTAURANT", StatusFilter::All).ids(), vec!["1"]);
    assert_eq!(store.list("français", StatusFilter::All).ids(), vec!["1", "3"]);
}

#[test]
fn test_search_and_status_combine() {
    let store = scenario_store();
    let view = store.list("français", StatusFilter::Only(ConversationStatus::Archived));
    assert_eq!(view.ids(), vec!["3"]);

    let view = store.list("interview", StatusFilter::Only(ConversationStatus::Active));
    assert!(view.is_empty());
}

#[test]
fn test_archived_conversation_remains_in_all_view() {
    let mut store = scenario_store();
    store.archive("1").unwrap();

    let all = store.list("", StatusFilter::All).to_vec();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].id, "1");
    assert_eq!(all[2].status, ConversationStatus::Archived);
}

#[test]
fn test_status_change_follows_last_mutation_order() {
    let mut store = scenario_store();

    store.complete("1").unwrap();
    store.resume("3").unwrap();
    assert_eq!(store.list("", StatusFilter::All).ids(), vec!["2", "1", "3"]);

    // Undo is a status change too
    let previous = store.archive("2").unwrap();
    store.resume("1").unwrap();
    assert_eq!(store.list("", StatusFilter::All).ids(), vec!["3", "2", "1"]);
    assert!(store.undo_archive("2", previous));
    assert_eq!(store.list("", StatusFilter::All).ids(), vec!["3", "1", "2"]);
}

#[test]
fn test_archive_undo_round_trip_is_repeatable() {
    let mut store = scenario_store();

    for _ in 0..3 {
        let previous = store.archive("1").unwrap();
        assert_eq!(previous, ConversationStatus::Active);
        assert!(store.undo_archive("1", previous));
        assert_eq!(store.get("1").unwrap().status, ConversationStatus::Active);
    }
}

#[test]
fn test_second_archive_captures_archived() {
    // Last writer wins: the newest ticket says "archived", so undoing it
    // leaves the conversation archived.
    let mut store = scenario_store();
    let first = store.archive("1").unwrap();
    let second = store.archive("1").unwrap();

    assert_eq!(first, ConversationStatus::Active);
    assert_eq!(second, ConversationStatus::Archived);

    assert!(store.undo_archive("1", second));
    assert_eq!(store.get("1").unwrap().status, ConversationStatus::Archived);

    assert!(store.undo_archive("1", first));
    assert_eq!(store.get("1").unwrap().status, ConversationStatus::Active);
}

#[test]
fn test_undo_after_delete_is_noop() {
    let mut store = scenario_store();
    let previous = store.archive("2").unwrap();
    let token = store.mark_delete_pending("2").unwrap();
    store.confirm_delete(token).unwrap();

    assert!(!store.undo_archive("2", previous));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_complete_from_any_status() {
    let mut store = scenario_store();
    assert_eq!(store.complete("3").unwrap(), ConversationStatus::Archived);
    assert_eq!(store.complete("1").unwrap(), ConversationStatus::Active);
    assert_eq!(store.complete("1").unwrap(), ConversationStatus::Completed);
}

#[test]
fn test_resume_and_set_status() {
    let mut store = scenario_store();
    assert_eq!(store.resume("3").unwrap(), ConversationStatus::Archived);
    assert_eq!(store.get("3").unwrap().status, ConversationStatus::Active);

    let previous = store
        .set_status("2", ConversationStatus::Archived)
        .unwrap();
    assert_eq!(previous, ConversationStatus::Completed);
    assert_eq!(store.get("2").unwrap().status, ConversationStatus::Archived);
}

#[test]
fn test_confirm_delete_removes_from_every_view() {
    let mut store = scenario_store();
    let token = store.mark_delete_pending("1").unwrap();

    // Intent alone does not change anything
    assert_eq!(store.len(), 3);

    let removed = store.confirm_delete(token).unwrap();
    assert_eq!(removed.title, "Conversation au restaurant");

    for filter in ["all", "active", "completed", "archived"] {
        let filter: StatusFilter = filter.parse().unwrap();
        assert!(store.list("", filter).iter().all(|c| c.id != "1"));
        assert!(store.list("restaurant", filter).is_empty());
    }
}

#[test]
fn test_confirm_delete_twice_is_stale() {
    let mut store = scenario_store();
    let token = store.mark_delete_pending("3").unwrap();
    store.confirm_delete(token).unwrap();

    let err = store.confirm_delete(token).unwrap_err();
    assert!(matches!(err, StoreError::StaleToken(t) if t == token));
    assert!(err.is_benign());
}

#[test]
fn test_cancel_delete_leaves_collection_unchanged() {
    let mut store = scenario_store();
    let before = store.conversations().to_vec();

    let token = store.mark_delete_pending("2").unwrap();
    assert!(store.cancel_delete(token));

    assert_eq!(store.conversations(), before.as_slice());
}

#[test]
fn test_cancel_after_confirm_has_no_effect() {
    let mut store = scenario_store();
    let token = store.mark_delete_pending("2").unwrap();
    store.confirm_delete(token).unwrap();

    assert!(!store.cancel_delete(token));
    assert!(store.get("2").is_err());
}

#[test]
fn test_operations_on_missing_id() {
    let mut store = scenario_store();

    assert!(matches!(store.archive("x"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.complete("x"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.resume("x"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.mark_delete_pending("x"), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.record_message("x", "hi", Utc::now()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_list_is_pure() {
    let store = scenario_store();
    let first = store.list("o", StatusFilter::All).to_vec();
    let second = store.list("o", StatusFilter::All).to_vec();
    assert_eq!(first, second);
}

#[test]
fn test_query_with_language() {
    let store = scenario_store();
    let query = ConversationQuery::new("", StatusFilter::All).with_language("Anglais");
    assert_eq!(store.query(query).ids(), vec!["2"]);
}

#[test]
fn test_insert_appends_and_notifies() {
    let mut store = scenario_store();
    let mut rx = store.subscribe();

    let conv = store
        .insert(NewConversation::new("4", "Ordering coffee in Spanish", "Espagnol").with_flag("🇪🇸"))
        .unwrap();
    assert_eq!(conv.status, ConversationStatus::Active);
    assert_eq!(store.list("", StatusFilter::All).ids(), vec!["1", "2", "3", "4"]);

    let change = rx.try_recv().unwrap();
    assert_eq!(change.conversation_id, "4");
    assert_eq!(change.kind, ChangeKind::Added);
}

#[test]
fn test_insert_duplicate_id_rejected() {
    let mut store = scenario_store();
    let result = store.insert(NewConversation::new("3", "Again", "Français"));
    assert!(matches!(result, Err(StoreError::DuplicateId(_))));
}

#[test]
fn test_record_message_keeps_position() {
    let mut store = scenario_store();
    store.record_message("2", "Great progress!", Utc::now()).unwrap();

    assert_eq!(store.list("", StatusFilter::All).ids(), vec!["1", "2", "3"]);
    assert_eq!(store.get("2").unwrap().last_message, "Great progress!");
}
