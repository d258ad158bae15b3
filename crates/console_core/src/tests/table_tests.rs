use shared::{domain::RecordId, entities::Client};

use super::*;

fn client(first_name: &str, city: &str) -> Client {
    Client {
        id: RecordId(0),
        uuid: Uuid::new_v4(),
        first_name: first_name.into(),
        last_name: "Tester".into(),
        primary_email: "someone@example.com".into(),
        primary_phone: "555-0100".into(),
        city: Some(city.into()),
        state: None,
        country: None,
    }
}

fn store() -> RecordStore<Client> {
    let mut store = RecordStore::new();
    store.replace(vec![client("Amy", "Austin"), client("Bob", "Boston")]);
    store
}

fn first_names(view: &TableView<Client>) -> Vec<&str> {
    view.rows()
        .iter()
        .map(|record| record.first_name.as_str())
        .collect()
}

#[test]
fn sorting_twice_reverses_then_search_narrows() {
    let store = store();
    let mut view = TableView::new();
    view.rederive(&store);

    view.set_sort("first_name", &store).expect("sort");
    assert_eq!(first_names(&view), vec!["Amy", "Bob"]);
    view.set_sort("first_name", &store).expect("sort");
    assert!(view.sort_reversed());
    assert_eq!(first_names(&view), vec!["Bob", "Amy"]);

    view.set_search("aus", &store);
    assert_eq!(first_names(&view), vec!["Amy"]);
    assert_eq!(view.sort_key(), Some("first_name"));
}

#[test]
fn record_id_is_a_sort_field() {
    let mut store = RecordStore::new();
    let mut later = client("Amy", "Austin");
    later.id = RecordId(10);
    let mut earlier = client("Bob", "Boston");
    earlier.id = RecordId(9);
    store.replace(vec![later, earlier]);

    let mut view = TableView::new();
    view.set_sort("id", &store).expect("id is sortable");
    assert_eq!(first_names(&view), vec!["Bob", "Amy"]);
    view.set_sort("id", &store).expect("id is sortable");
    assert_eq!(first_names(&view), vec!["Amy", "Bob"]);
}

#[test]
fn new_sort_field_resets_direction() {
    let store = store();
    let mut view = TableView::new();
    view.set_sort("first_name", &store).expect("sort");
    view.set_sort("first_name", &store).expect("sort");
    view.set_sort("city", &store).expect("sort");
    assert_eq!(view.sort_key(), Some("city"));
    assert!(!view.sort_reversed());
}

#[test]
fn unknown_sort_field_changes_nothing() {
    let store = store();
    let mut view = TableView::new();
    view.set_sort("city", &store).expect("sort");
    let err = view.set_sort("salary", &store).expect_err("unknown");
    assert!(matches!(err, ListingError::UnknownField { ref field, .. } if field == "salary"));
    assert_eq!(view.sort_key(), Some("city"));
    assert!(!view.sort_reversed());
}

#[test]
fn view_tracks_store_generation() {
    let mut store = store();
    let mut view = TableView::new();
    assert!(!view.is_current(&store));
    view.rederive(&store);
    assert!(view.is_current(&store));

    store.replace(vec![client("Cleo", "Chicago")]);
    assert!(!view.is_current(&store));
    view.rederive(&store);
    assert_eq!(first_names(&view), vec!["Cleo"]);
}

#[test]
fn modes_are_exclusive() {
    let store = store();
    let amy = TableTarget::of(&store.records()[0]);
    let bob = TableTarget::of(&store.records()[1]);
    let mut view = TableView::<Client>::new();

    view.request_edit(amy.clone()).expect("edit from idle");
    assert_eq!(view.mode(), &TableMode::Editing { target: amy.clone() });
    assert!(matches!(
        view.request_delete(bob.clone()),
        Err(ListingError::ViewBusy {
            current: "editing",
            requested: "delete"
        })
    ));
    assert!(view.request_edit(bob.clone()).is_err());
    assert_eq!(view.mode().target(), Some(&amy));

    assert_eq!(view.finish(), Some(amy));
    assert_eq!(view.mode(), &TableMode::Idle);

    view.request_delete(bob.clone()).expect("delete from idle");
    assert_eq!(
        view.cancel(),
        TableMode::ConfirmingDelete { target: bob }
    );
    assert_eq!(view.mode(), &TableMode::Idle);
    assert_eq!(view.finish(), None);
}

#[test]
fn target_names_come_from_the_record() {
    let store = store();
    let target = TableTarget::of(&store.records()[0]);
    assert_eq!(target.name, "Amy");
    assert_eq!(target.uuid, store.records()[0].uuid);
}
