use std::collections::HashMap;

use lazyseq::{Code, Dictionary, DuplicateKeyPolicy, Lookup, Sequence, ToDictionaryOptions};

#[derive(Debug, Clone, PartialEq)]
struct Row {
    k: &'static str,
    v: i32,
}

fn rows() -> Vec<Row> {
    vec![
        Row { k: "a", v: 1 },
        Row { k: "b", v: 2 },
        Row { k: "a", v: 3 },
    ]
}

#[test]
fn test_lookup_groups_rows() {
    let lookup: Lookup<&str, Row> = Sequence::from_vec(rows()).to_lookup(|r| r.k).unwrap();

    assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    let a = lookup.get(&"a").unwrap().select(|r| r.v).to_vec().unwrap();
    assert_eq!(a, vec![1, 3]);
    let b = lookup.get(&"b").unwrap().select(|r| r.v).to_vec().unwrap();
    assert_eq!(b, vec![2]);

    let err = lookup.get(&"zz").unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[test]
fn test_lookup_sequence_of_groupings() {
    let lookup = Sequence::from_vec(vec![5, 12, 7, 30, 1]).to_lookup(|v| *v >= 10).unwrap();

    let sizes = lookup.sequence().select(|g| g.len()).to_vec().unwrap();
    assert_eq!(sizes, vec![3, 2]);

    let mut groups = lookup.into_sequence();
    assert!(groups.valid().unwrap());
    assert_eq!(groups.key().unwrap(), &false);
    assert_eq!(groups.value().unwrap().values(), &[5, 7, 1]);
    assert_eq!(groups.value().unwrap().sequence().sum(0).unwrap(), 13);
}

#[test]
fn test_grouping_into_sequence() {
    let lookup = Sequence::from_vec(rows()).to_lookup(|r| r.k).unwrap();
    let grouping = lookup.grouping(&"a").unwrap().clone();
    assert_eq!(grouping.key(), &"a");
    let mut values = grouping.into_sequence();
    assert_eq!(values.count().unwrap(), 2);
    assert_eq!(values.last_or_default(Row { k: "", v: 0 }).unwrap().v, 3);
}

#[test]
fn test_to_dictionary_duplicate_key_last_wins() {
    let dict = Sequence::from_pairs(vec![("x", 1), ("x", 2)]).to_dictionary().unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.get(&"x"), Some(&2));
}

#[test]
fn test_to_dictionary_with_capacity_and_policy() {
    let options = ToDictionaryOptions {
        duplicate_keys: DuplicateKeyPolicy::FirstWins,
        initial_capacity: 16,
        ..Default::default()
    };
    let dict = Sequence::from_vec(vec!["apple", "avocado", "banana"])
        .to_dictionary_with(|_, v| v.chars().next(), options)
        .unwrap();
    assert_eq!(dict.get(&Some('a')), Some(&"apple"));
    assert_eq!(dict.get(&Some('b')), Some(&"banana"));
}

#[test]
fn test_dictionary_sequence_roundtrip_keeps_keys() {
    let mut dict = Dictionary::new();
    dict.insert("one".to_string(), 1);
    dict.insert("two".to_string(), 2);
    dict.insert("three".to_string(), 3);

    let odd = dict.sequence().filter(|v| v % 2 == 1).to_dictionary().unwrap();
    assert_eq!(odd.keys().cloned().collect::<Vec<_>>(), vec!["one", "three"]);

    let doubled = dict.into_sequence().select(|v| v * 2).to_dictionary().unwrap();
    assert_eq!(doubled.get_or_err(&"two".to_string()).unwrap(), &4);
    assert!(doubled.get_or_err(&"four".to_string()).unwrap_err().is_not_found());
}

#[test]
fn test_hash_map_as_keyed_source() {
    let map: HashMap<u32, &str> = [(1, "x"), (2, "y"), (3, "z")].into_iter().collect();
    let dict = Sequence::from_map(map.iter()).to_dictionary().unwrap();
    assert_eq!(dict.len(), 3);
    for (k, v) in &map {
        assert_eq!(dict.get(k), Some(v));
    }

    let mut seq = Sequence::from_map(map.iter());
    seq.to_vec().unwrap();
    seq.reset().unwrap();
    assert_eq!(seq.count().unwrap(), 3);
}

#[test]
fn test_lookup_and_dictionary_serialize_in_order() {
    let lookup = Sequence::from_vec(vec![3, 4, 5, 6]).to_lookup(|v| v % 3).unwrap();
    assert_eq!(serde_json::to_string(&lookup).unwrap(), r#"{"0":[3,6],"1":[4],"2":[5]}"#);

    let dict = Sequence::from_pairs(vec![("b", 1), ("a", 2)]).to_dictionary().unwrap();
    assert_eq!(serde_json::to_string(&dict).unwrap(), r#"{"b":1,"a":2}"#);
}
