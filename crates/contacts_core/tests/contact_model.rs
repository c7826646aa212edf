use contacts_core::{is_filled, Contact, UNASSIGNED_CONTACT_ID};

#[test]
fn contact_serialization_uses_expected_fields() {
    let contact = Contact::with_id(7, "Ana", "ana@x.com");

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["email"], "ana@x.com");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn equality_covers_every_field() {
    let stored = Contact::with_id(1, "Ana", "ana@x.com");

    assert_ne!(stored, Contact::with_id(2, "Ana", "ana@x.com"));
    assert_ne!(stored, Contact::with_id(1, "Ana", "other@x.com"));
    assert_eq!(Contact::new("Ana", "ana@x.com").id, UNASSIGNED_CONTACT_ID);
}

#[test]
fn blank_check_has_no_format_rules() {
    assert!(is_filled("not-an-email"));
    assert!(!is_filled(" \u{3000} "));
}
