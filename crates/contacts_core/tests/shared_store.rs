use contacts_core::{Contact, ContactStore, StoreError};
use std::thread;

#[test]
fn shared_store_is_opened_once_and_rejects_other_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts_db.sqlite3");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || ContactStore::shared(&path))
        })
        .collect();
    let stores: Vec<ContactStore> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();

    let id = stores[0]
        .upsert_blocking(&Contact::new("Ana", "ana@x.com"))
        .unwrap();
    for store in &stores {
        assert_eq!(
            store.snapshot().as_slice(),
            &[Contact::with_id(id, "Ana", "ana@x.com")]
        );
    }

    let again = ContactStore::shared(&path).unwrap();
    assert_eq!(again.snapshot().len(), 1);

    let err = ContactStore::shared(dir.path().join("other.sqlite3")).unwrap_err();
    assert!(matches!(err, StoreError::SharedPathConflict { .. }));
    assert!(err.to_string().contains("refusing to switch"));
}
