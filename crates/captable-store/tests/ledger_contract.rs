use captable_model::{InvestorUpdate, DEFAULT_SHARE_PERCENT};
use captable_store::{LedgerError, LedgerStore};

fn store() -> LedgerStore {
    LedgerStore::open_in_memory().expect("open in-memory store")
}

#[test]
fn create_assigns_id_and_timestamp_and_lists_in_id_order() {
    let store = store();
    let first = store
        .create_investor("First", 100.0, Some(10.0))
        .expect("create");
    let second = store
        .create_investor("Second", 200.0, Some(20.0))
        .expect("create");
    assert!(second.id > first.id);
    let listed = store.list_investors().expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn create_coerces_out_of_range_share_to_default() {
    let store = store();
    for bad in [Some(0.0), Some(-3.0), Some(150.0), None] {
        let investor = store.create_investor("x", 0.0, bad).expect("create");
        assert_eq!(investor.share_percent, DEFAULT_SHARE_PERCENT);
    }
    let exact = store.create_investor("y", 0.0, Some(37.0)).expect("create");
    assert_eq!(exact.share_percent, 37.0);
}

#[test]
fn create_rejects_negative_principal() {
    let store = store();
    let err = store
        .create_investor("x", -1.0, Some(10.0))
        .expect_err("negative principal");
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(store.list_investors().expect("list").is_empty());
}

#[test]
fn get_missing_investor_is_not_found() {
    let store = store();
    assert!(matches!(
        store.get_investor(42),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn update_applies_only_present_fields() {
    let store = store();
    let created = store
        .create_investor("Before", 500.0, Some(40.0))
        .expect("create");
    let updated = store
        .update_investor(
            created.id,
            &InvestorUpdate {
                full_name: Some("After".to_string()),
                ..InvestorUpdate::default()
            },
        )
        .expect("update");
    assert_eq!(updated.full_name, "After");
    assert_eq!(updated.invested_amount, 500.0);
    assert_eq!(updated.share_percent, 40.0);
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn update_rejects_out_of_range_share_and_keeps_stored_value() {
    let store = store();
    let created = store
        .create_investor("x", 0.0, Some(40.0))
        .expect("create");
    for bad in [0.0, 150.0] {
        let err = store
            .update_investor(
                created.id,
                &InvestorUpdate {
                    share_percent: Some(bad),
                    ..InvestorUpdate::default()
                },
            )
            .expect_err("out-of-range share");
        assert!(matches!(err, LedgerError::Validation(_)));
    }
    let current = store.get_investor(created.id).expect("get");
    assert_eq!(current.share_percent, 40.0);
}

#[test]
fn update_rejects_negative_principal_before_touching_any_field() {
    let store = store();
    let created = store
        .create_investor("x", 10.0, Some(40.0))
        .expect("create");
    let err = store
        .update_investor(
            created.id,
            &InvestorUpdate {
                full_name: Some("renamed".to_string()),
                invested_amount: Some(-5.0),
                share_percent: None,
            },
        )
        .expect_err("negative principal");
    assert!(matches!(err, LedgerError::Validation(_)));
    let current = store.get_investor(created.id).expect("get");
    assert_eq!(current.full_name, "x");
    assert_eq!(current.invested_amount, 10.0);
}

#[test]
fn update_missing_investor_is_not_found() {
    let store = store();
    let err = store
        .update_investor(
            99,
            &InvestorUpdate {
                full_name: Some("ghost".to_string()),
                ..InvestorUpdate::default()
            },
        )
        .expect_err("missing id");
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[test]
fn delete_removes_row_and_missing_id_is_not_found() {
    let store = store();
    let created = store.create_investor("x", 0.0, Some(10.0)).expect("create");
    store.delete_investor(created.id).expect("delete");
    assert!(matches!(
        store.delete_investor(created.id),
        Err(LedgerError::NotFound(_))
    ));
    assert!(store.list_investors().expect("list").is_empty());
}

#[test]
fn reopening_the_same_file_preserves_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ledger.sqlite3");
    let id = {
        let store = LedgerStore::open(&path).expect("open");
        store
            .create_investor("Durable", 42.0, Some(15.0))
            .expect("create")
            .id
    };
    let reopened = LedgerStore::open(&path).expect("reopen");
    let investor = reopened.get_investor(id).expect("get after reopen");
    assert_eq!(investor.full_name, "Durable");
    assert_eq!(investor.invested_amount, 42.0);
}
