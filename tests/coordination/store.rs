use harvestd::{gateway::types::CutDecision, store::CutResultStore};

use crate::support::cut_decision;

#[test]
fn snapshot_is_an_independent_copy() {
    let store = CutResultStore::new();
    store.append(cut_decision(3, 5, 0.92, CutDecision::CutPlant));

    let before_clear = store.snapshot();
    assert_eq!(before_clear.len(), 1);

    store.clear();
    assert!(store.is_empty());
    assert!(store.snapshot().is_empty());

    // The earlier snapshot is unaffected by the clear.
    assert_eq!(before_clear.len(), 1);
    assert_eq!(before_clear[0].x_coordinate, 3);
}

#[test]
fn append_preserves_arrival_order() {
    let store = CutResultStore::new();
    store.append(cut_decision(1, 1, 0.8, CutDecision::CutPlant));
    store.append(cut_decision(2, 2, 0.9, CutDecision::CutNeighbors));
    store.append(cut_decision(3, 3, 0.7, CutDecision::CutPlant));

    let snapshot = store.snapshot();
    assert_eq!(store.count(), 3);
    let coordinates: Vec<i32> = snapshot.iter().map(|cut| cut.x_coordinate).collect();
    assert_eq!(coordinates, [1, 2, 3]);
}

#[test]
fn new_store_is_empty() {
    let store = CutResultStore::new();
    assert!(store.is_empty());
    assert_eq!(store.count(), 0);
    assert!(store.snapshot().is_empty());
}
