use contacts_core::{Contact, ContactStore, Snapshot, StoreLocation};
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn first_emission_is_current_snapshot() {
    let store = ContactStore::open_in_memory().unwrap();
    store
        .upsert(Contact::new("Ana", "ana@x.com"))
        .await
        .unwrap();

    let mut subscription = store.list_all();
    let first = next(&mut subscription).await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "Ana");
    assert!(first[0].is_assigned());
}

#[tokio::test]
async fn upsert_then_delete_round_trip() {
    let store = ContactStore::open_in_memory().unwrap();
    let mut subscription = store.list_all();
    assert!(next(&mut subscription).await.is_empty());

    store
        .upsert(Contact::new("Ana", "ana@x.com"))
        .await
        .unwrap();
    let inserted = next(&mut subscription).await;
    assert_eq!(inserted.len(), 1);
    let stored = inserted[0].clone();
    assert_eq!((stored.name.as_str(), stored.email.as_str()), ("Ana", "ana@x.com"));

    store.delete(stored).await.unwrap();
    assert!(next(&mut subscription).await.is_empty());
}

#[tokio::test]
async fn delete_without_match_emits_nothing_and_keeps_rows() {
    let store = ContactStore::open_in_memory().unwrap();
    store
        .upsert(Contact::new("Ana", "ana@x.com"))
        .await
        .unwrap();
    let before = store.snapshot();
    let mut subscription = store.list_all();
    next(&mut subscription).await;

    let stale = Contact::with_id(before[0].id, "Ana", "old@x.com");
    store.delete(stale).await.unwrap();

    assert_eq!(store.snapshot(), before);
    assert!(
        timeout(Duration::from_millis(100), subscription.next())
            .await
            .is_err(),
        "no-op delete must not publish a snapshot"
    );
}

#[tokio::test]
async fn sequential_upserts_get_distinct_ids() {
    let store = ContactStore::open_in_memory().unwrap();
    store.upsert(Contact::new("Ana", "a@x.com")).await.unwrap();
    store.upsert(Contact::new("Bob", "b@x.com")).await.unwrap();

    let snapshot = store.snapshot();
    let names: Vec<_> = snapshot.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Bob"]);
    assert_ne!(snapshot[0].id, snapshot[1].id);
}

#[tokio::test]
async fn lagging_subscriber_sees_latest_snapshot() {
    let store = ContactStore::open_in_memory().unwrap();
    let mut subscription = store.list_all();
    next(&mut subscription).await;

    for index in 0..5 {
        store
            .upsert(Contact::new(format!("n{index}"), format!("e{index}")))
            .await
            .unwrap();
    }

    assert_eq!(next(&mut subscription).await.len(), 5);
    assert_eq!(subscription.latest().len(), 5);
}

#[tokio::test]
async fn subscription_ends_when_store_is_dropped() {
    let store = ContactStore::open_in_memory().unwrap();
    let mut subscription = store.list_all();
    next(&mut subscription).await;

    drop(store);

    let ended = timeout(WAIT, subscription.next()).await.unwrap();
    assert!(ended.is_none());
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts_db.sqlite3");

    let store = ContactStore::open(&path).unwrap();
    let id = store
        .upsert_blocking(&Contact::new("Ana", "ana@x.com"))
        .unwrap();
    assert_eq!(store.location(), &StoreLocation::File(path.clone()));
    drop(store);

    let reopened = ContactStore::open(&path).unwrap();
    assert_eq!(
        reopened.snapshot().as_slice(),
        &[Contact::with_id(id, "Ana", "ana@x.com")]
    );
}

#[test]
fn committed_write_succeeds_even_when_snapshot_read_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts_db.sqlite3");
    let store = ContactStore::open(&path).unwrap();

    let other = rusqlite::Connection::open(&path).unwrap();
    other
        .execute(
            "INSERT INTO contacts (id, name, email) VALUES (0, 'bad', 'row');",
            [],
        )
        .unwrap();

    let id = store
        .upsert_blocking(&Contact::new("Ana", "ana@x.com"))
        .unwrap();

    assert!(id > 0);
    assert!(store.snapshot().is_empty(), "previous snapshot stays published");
    let stored: i64 = other
        .query_row("SELECT COUNT(*) FROM contacts WHERE id = ?1;", [id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, 1);
}

async fn next(subscription: &mut contacts_core::ContactSubscription) -> Snapshot {
    timeout(WAIT, subscription.next())
        .await
        .expect("snapshot should arrive")
        .expect("store should still be open")
}
