use speedtable::{GeometricLevelGenerator, Inserted, SkipList, SkipListError};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn new() {
    let list: SkipList<i32, i32> = Default::default();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
}

#[test]
fn insert_get_single() {
    let key = 34;
    let value = 433;
    let mut list: SkipList<i32, i32> = Default::default();
    assert_eq!(list.insert(key, value), Ok(Inserted::Added));
    assert_eq!(list.len(), 1);

    assert_eq!(list.get(&key), &[value]);
    assert!(list.contains_key(&key));
    assert!(!list.contains_key(&35));
}

#[test]
fn insert_second_value_same_key() {
    let key = 55;
    let mut list: SkipList<i32, i32> = Default::default();
    assert_eq!(list.insert(key, 1), Ok(Inserted::Added));
    assert_eq!(list.insert(key, 2), Ok(Inserted::Added));

    // Both values live under one key, in insertion order.
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(&key), &[1, 2]);

    let pairs: Vec<(i32, i32)> = list.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, vec![(55, 1), (55, 2)]);
}

#[test]
fn insert_duplicate_pair_is_idempotent() {
    let key = 55;
    let value = 555;
    let mut list: SkipList<i32, i32> = Default::default();

    assert_eq!(list.insert(key, value), Ok(Inserted::Added));
    assert_eq!(list.insert(key, value), Ok(Inserted::Unchanged));

    assert_eq!(list.len(), 1);
    assert_eq!(list.get(&key), &[value]);
}

#[test]
fn unique_list_rejects_existing_key() {
    let mut list: SkipList<i32, i32> = SkipList::new_unique(16);
    assert_eq!(list.insert(1, 10), Ok(Inserted::Added));

    let err = list.insert(1, 11).unwrap_err();
    assert_eq!(err, SkipListError::KeyNotUnique(1));
    assert_eq!(err.into_key(), 1);

    assert_eq!(list.len(), 1);
    assert_eq!(list.get(&1), &[10]);
}

#[test]
fn insert_two_delete() {
    let key_1 = 435;
    let value_1 = 9383;
    let key_2 = 555;
    let value_2 = 9848;
    let mut list: SkipList<i32, i32> = Default::default();
    assert_eq!(list.len(), 0);

    list.insert(key_1, value_1).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list.contains_key(&key_1));
    assert!(!list.contains_key(&key_2));

    list.insert(key_2, value_2).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.contains_key(&key_1));
    assert!(list.contains_key(&key_2));

    assert!(list.delete(&key_1, &value_1));
    assert_eq!(list.len(), 1);
    assert!(!list.contains_key(&key_1));
    assert!(list.contains_key(&key_2));

    list.insert(key_1, value_1).unwrap();
    assert_eq!(list.len(), 2);

    assert!(list.delete(&key_2, &value_2));
    assert_eq!(list.len(), 1);
    assert!(list.contains_key(&key_1));
    assert!(!list.contains_key(&key_2));

    assert!(list.delete(&key_1, &value_1));
    assert_eq!(list.len(), 0);
    assert!(!list.contains_key(&key_1));
}

#[test]
fn delete_empty() {
    let mut list: SkipList<i32, i32> = Default::default();
    assert!(list.is_empty());
    assert!(!list.delete(&3, &0));
    assert!(!list.delete(&32, &0));
    assert!(!list.delete(&22, &0));
}

#[test]
fn delete_value_keeps_node_until_empty() {
    let mut list: SkipList<&str, &str> = Default::default();
    list.insert("hello", "a").unwrap();
    list.insert("hello", "b").unwrap();
    list.insert("goodbye", "c").unwrap();

    let pairs: Vec<(&str, &str)> = list.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, vec![("goodbye", "c"), ("hello", "a"), ("hello", "b")]);

    assert!(list.delete(&"hello", &"a"));
    assert_eq!(list.get(&"hello"), &["b"]);

    assert!(list.delete(&"hello", &"b"));
    assert!(!list.contains_key(&"hello"));

    let pairs: Vec<(&str, &str)> = list.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, vec![("goodbye", "c")]);
}

#[test]
fn delete_wrong_value_reports_not_found() {
    let mut list: SkipList<i32, i32> = Default::default();
    list.insert(1, 10).unwrap();

    assert!(!list.delete(&1, &99));
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(&1), &[10]);
}

#[test]
fn search_ge_lands_on_next_key() {
    let mut list: SkipList<i32, i32> = Default::default();
    list.insert(10, 100).unwrap();
    list.insert(20, 200).unwrap();
    list.insert(20, 201).unwrap();

    assert_eq!(list.search_ge(&5), &[100]);
    assert_eq!(list.search_ge(&10), &[100]);
    assert_eq!(list.search_ge(&11), &[200, 201]);
    assert_eq!(list.search_ge(&20), &[200, 201]);
    assert!(list.search_ge(&21).is_empty());
}

#[test]
fn round_trip_shrinks_back_to_level_one() {
    let generator = GeometricLevelGenerator::with_rng(16, SmallRng::seed_from_u64(0xfeed));
    let mut list: SkipList<u32, u32> =
        SkipList::with_generator(Box::new(generator), false);

    let mut rng = SmallRng::seed_from_u64(0xbeef);
    let mut inserted = std::collections::BTreeSet::new();
    while inserted.len() < 1000 {
        let key: u32 = rng.gen_range(0..u32::MAX);
        if inserted.insert(key) {
            list.insert(key, key + 1).unwrap();
        }
    }
    assert_eq!(list.len(), 1000);
    assert!(list.level() >= 1);

    for key in &inserted {
        assert!(list.delete(key, &(key + 1)));
    }

    assert!(list.is_empty());
    assert_eq!(list.iter().count(), 0);
    assert_eq!(list.level(), 1);
}

#[test]
fn clear_does_not_invalidate() {
    let mut list: SkipList<usize, usize> = Default::default();

    for i in 0..10 {
        list.insert(i, i + 1).unwrap();
    }
    assert_eq!(list.len(), 10);

    list.clear();
    assert_eq!(list.len(), 0);

    for i in 0..10 {
        assert!(!list.contains_key(&i));
        list.insert(i, i + 1).unwrap();
    }
    assert_eq!(list.len(), 10);
}

#[test]
fn with_max_nodes_derives_a_sane_level() {
    let list: SkipList<u32, u32> = SkipList::with_max_nodes(1024, false);
    assert_eq!(list.max_level(), 10);

    let tiny: SkipList<u32, u32> = SkipList::with_max_nodes(1, true);
    assert_eq!(tiny.max_level(), 1);
    assert!(tiny.is_unique());
}

#[test]
fn replace_moves_a_row_value() {
    let mut list: SkipList<String, u32> = Default::default();
    let mut store = Some("old".to_owned());
    list.insert("old".to_owned(), 7).unwrap();

    list.replace(Some("new".to_owned()), &mut store, 7).unwrap();
    assert_eq!(store.as_deref(), Some("new"));
    assert!(!list.contains_key("old"));
    assert_eq!(list.get("new"), &[7]);
}

#[test]
fn format_empty() {
    let list: SkipList<u32, u32> = Default::default();
    assert_eq!(format!("{}", list), "[]");
}

#[test]
fn format_singleton() {
    let mut list: SkipList<u32, u32> = Default::default();
    list.insert(1, 6).unwrap();
    assert_eq!(format!("{}", list), "[1: 6]");
}

#[test]
fn format_multiple() {
    let mut list: SkipList<u32, u32> = Default::default();
    list.insert(2, 6).unwrap();
    list.insert(1, 4).unwrap();
    list.insert(1, 5).unwrap();
    assert_eq!(format!("{}", list), "[1: 4, 1: 5, 2: 6]");
}

#[test]
fn random_insert_delete_interleaved() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut list: SkipList<u32, u32> = Default::default();
    let mut inserted = std::collections::BTreeSet::new();

    for _ in 0..1000 {
        let element: u32 = rng.gen_range(0..u32::MAX);
        if inserted.insert(element) {
            list.insert(element, element + 1).unwrap();
            assert!(list.contains_key(&element));
        }
    }

    let mut remaining = inserted.len();
    for element in &inserted {
        if rng.gen::<bool>() {
            assert!(list.delete(element, &(element + 1)));
            assert!(!list.contains_key(element));
            remaining -= 1;
        }
    }
    assert_eq!(list.len(), remaining);
}
