use std::collections::BTreeMap;

use compare::Compare;

use super::{AvlTreeMap, Color, Error, Node, OrderedMap, RbTreeMap, TraversalOrder};

const N: i32 = 1_000;
const LARGE_N: i32 = 10_000_000;

const SCENARIO_KEYS: [i32; 10] = [34, 67, 89, 123, 3, 7, 9, 2, 0, 999];

fn init_logger() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Trace, simplelog::Config::default());
}

// Keys and balance tags in pre-order.
fn shape<M, B>(map: &M) -> Vec<(i32, B)>
where
    M: OrderedMap<i32, i32, Tag = B>,
    B: Clone,
{
    let mut shape = Vec::new();
    let mut pending: Vec<&Node<i32, i32, B>> = map.root().into_iter().collect();
    while let Some(node) = pending.pop() {
        shape.push((*node.key(), node.tag().clone()));
        pending.extend(node.right());
        pending.extend(node.left());
    }
    shape
}

// Tests shared by both engines. `$map` names the map type.
macro_rules! engine_tests {
    ($engine:ident, $map:ident) => {
        mod $engine {
            use super::*;

            #[test]
            fn test_new() {
                let map_i32 = $map::<i32, ()>::new();
                assert!(map_i32.is_empty());
                map_i32.check_consistency();

                let map_i8 = $map::<i8, ()>::new();
                assert!(map_i8.is_empty());
                map_i8.check_consistency();

                let map_string = $map::<String, String>::new();
                assert!(map_string.is_empty());
                map_string.check_consistency();
            }

            #[test]
            fn test_insert() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
                values.sort();
                values.dedup();

                let mut map = $map::new();
                for value in &values {
                    assert_eq!(map.insert(*value, *value), None);
                    map.check_consistency();
                }
                assert!(map.len() == values.len());

                for value in &values {
                    assert_eq!(map.insert(*value, value.wrapping_add(1)), Some(*value));
                }
                assert!(map.len() == values.len());
                assert_eq!(map.get(&values[0]), Some(&values[0].wrapping_add(1)));
                map.check_consistency();
            }

            #[test]
            fn test_insert_sorted_range() {
                let mut map = $map::new();
                for value in 0..N {
                    assert_eq!(map.insert(value, value), None);
                    map.check_consistency();
                }
                assert!(map.len() == N as usize);
                assert!(map.height() > 0);
                assert!(map.height() < N as usize / 2);
                assert!(map.get(&-42).is_none());
            }

            #[test]
            fn test_insert_shuffled_range() {
                use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

                let mut values: Vec<i32> = (0..N).collect();
                let mut rng = StdRng::seed_from_u64(0);
                values.shuffle(&mut rng);

                let mut map = $map::new();
                for value in &values {
                    assert!(map.insert(*value, "foo").is_none());
                    map.check_consistency();
                }
                assert!(map.len() == values.len());

                for value in &values {
                    assert_eq!(map.insert(*value, "bar"), Some("foo"));
                }
                assert!(map.len() == values.len());
                assert!(map.get(&-42).is_none());
                assert!(map.values().all(|value| *value == "bar"));
            }

            #[test]
            fn test_get() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

                let mut map = $map::new();
                assert!(map.get(&42).is_none());
                for value in &values {
                    map.insert(*value, value.wrapping_add(1));
                }

                for value in &values {
                    let got = map.get(value);
                    assert_eq!(got, Some(&value.wrapping_add(1)));
                    let got = map.get_key_value(value);
                    assert_eq!(got, Some((value, &value.wrapping_add(1))));
                    assert!(map.contains_key(value));
                }
            }

            #[test]
            fn test_clear() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
                values.sort();
                values.dedup();

                let mut map = $map::new();
                for value in &values {
                    map.insert(*value, String::from("foo"));
                }
                assert!(!map.is_empty());
                assert!(map.len() == values.len());

                map.clear();
                assert!(map.is_empty());
                assert!(map.len() == 0);
                assert_eq!(map.height(), 0);

                for value in &values {
                    assert!(map.insert(*value, String::from("bar")).is_none());
                }
                assert!(!map.is_empty());
                assert!(map.len() == values.len());
                map.check_consistency();
            }

            #[test]
            fn test_remove() {
                use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
                values.sort();
                values.dedup();

                let mut map = $map::new();
                for value in &values {
                    map.insert(*value, 42);
                }

                values.shuffle(&mut rng);
                for value in &values {
                    assert!(map.get(value).is_some());
                    assert_eq!(map.remove(value), Ok(42));
                    assert!(map.get(value).is_none());
                    map.check_consistency();
                }
                assert!(map.is_empty());
                assert!(map.len() == 0);
            }

            #[test]
            fn test_remove_missing_key() {
                let mut map: $map<i32, i32> = (0..10).map(|key| (key * 2, key)).collect();
                let before: Vec<_> = map.iter().map(|(key, value)| (*key, *value)).collect();
                assert_eq!(map.remove(&7), Err(Error::KeyNotFound));
                assert_eq!(map.remove_entry(&-1), Err(Error::KeyNotFound));
                assert!(!map.discard(&99));
                assert!(map.iter().map(|(key, value)| (*key, *value)).eq(before.iter().copied()));
                assert!(map.discard(&4));
                assert_eq!(map.len(), before.len() - 1);
                assert!(map.get(&4).is_none());
                map.check_consistency();
            }

            #[test]
            fn test_map_iter() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

                let mut map = $map::new();
                for value in &values {
                    map.insert(*value, value.wrapping_add(42));
                }

                values.sort();
                values.dedup();

                let mut map_iter = map.iter();
                for value in &values {
                    let kv = map_iter.next();
                    assert!(kv.is_some());
                    let (&key, &mapped) = kv.unwrap();
                    assert_eq!(key, *value);
                    assert_eq!(mapped, value.wrapping_add(42));
                }
                assert!(map_iter.next().is_none());

                let mut value_iter = values.iter();
                for (&key, &mapped) in &map {
                    let value = value_iter.next();
                    assert!(value.is_some());
                    let value = value.unwrap();
                    assert_eq!(key, *value);
                    assert_eq!(mapped, value.wrapping_add(42));
                }
                assert!(value_iter.next().is_none());

                assert!(map.keys().eq(values.iter()));
                assert!(map.iter_rev().map(|(key, _)| key).eq(values.iter().rev()));
            }

            #[test]
            fn test_scenario_min_max() {
                let mut map = $map::new();
                for key in SCENARIO_KEYS {
                    map.insert(key, key);
                }
                map.check_consistency();
                assert_eq!(map.min_item(), Ok((&0, &0)));
                assert_eq!(map.max_item(), Ok((&999, &999)));
                assert_eq!(map.min_key(), Ok(&0));
                assert_eq!(map.max_key(), Ok(&999));
            }

            #[test]
            fn test_scenario_remove_single_key() {
                let mut map = $map::new();
                map.insert(50, 50);
                assert_eq!(map.remove(&50), Ok(50));
                assert!(map.is_empty());
                assert_eq!(map.remove(&50), Err(Error::KeyNotFound));
                map.check_consistency();
            }

            #[test]
            fn test_scenario_pop_min_until_empty() {
                let mut map = $map::new();
                for key in SCENARIO_KEYS {
                    map.insert(key, key);
                }
                let mut popped = Vec::new();
                while let Ok((key, value)) = map.pop_min() {
                    assert_eq!(key, value);
                    popped.push(key);
                    map.check_consistency();
                }
                let mut expected = SCENARIO_KEYS.to_vec();
                expected.sort();
                assert_eq!(popped, expected);
                assert_eq!(map.pop_min(), Err(Error::EmptyTree));
            }

            #[test]
            fn test_pop_edges() {
                let mut map: $map<i32, i32> = (0..100).map(|key| (key, -key)).collect();
                assert_eq!(map.pop_max(), Ok((99, -99)));
                assert_eq!(map.pop_min(), Ok((0, 0)));
                map.check_consistency();

                let mut popped = Vec::new();
                while let Ok((key, _)) = map.popitem() {
                    assert!(!map.contains_key(&key));
                    popped.push(key);
                    map.check_consistency();
                }
                popped.sort();
                assert_eq!(popped, (1..99).collect::<Vec<_>>());
                assert_eq!(map.popitem(), Err(Error::EmptyTree));
                assert_eq!(map.pop_max(), Err(Error::EmptyTree));
            }

            #[test]
            fn test_empty_tree_errors() {
                let map = $map::<i32, i32>::new();
                assert_eq!(map.min_item(), Err(Error::EmptyTree));
                assert_eq!(map.max_key(), Err(Error::EmptyTree));
                assert_eq!(map.prev_key(&1), Err(Error::KeyNotFound));
                assert!(map.floor_key(&1).is_err());
                assert!(map.item_at(0).is_none());
                assert!(map.range(..).next().is_none());
            }

            #[test]
            fn test_prev_succ() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut map = $map::new();
                for _ in 0..N {
                    let key: i32 = rng.gen_range(0..N * 10);
                    map.insert(key, ());
                }

                let keys: Vec<i32> = map.keys().copied().collect();
                assert_eq!(map.prev_key(&keys[0]), Err(Error::KeyNotFound));
                assert_eq!(map.succ_key(&keys[keys.len() - 1]), Err(Error::KeyNotFound));
                for pair in keys.windows(2) {
                    assert_eq!(map.succ_key(&pair[0]), Ok(&pair[1]));
                    assert_eq!(map.prev_key(&pair[1]), Ok(&pair[0]));
                }
                for key in &keys[1..] {
                    let prev = *map.prev_key(key).unwrap();
                    assert_eq!(map.succ_key(&prev), Ok(key));
                }
            }

            #[test]
            fn test_floor_ceiling() {
                let map: $map<i32, ()> = (0..50).map(|key| (key * 4, ())).collect();
                assert_eq!(map.floor_key(&9), Ok(&8));
                assert_eq!(map.floor_key(&8), Ok(&8));
                assert_eq!(map.ceiling_key(&9), Ok(&12));
                assert_eq!(map.ceiling_key(&12), Ok(&12));
                assert_eq!(map.floor_key(&-1), Err(Error::KeyNotFound));
                assert_eq!(map.ceiling_key(&197), Err(Error::KeyNotFound));
                assert_eq!(map.floor_item(&1000), Ok((&196, &())));
            }

            #[test]
            fn test_rank() {
                let map: $map<i32, i32> = (0..N).map(|key| (key * 3, key)).collect();
                for index in 0..N {
                    let key = index * 3;
                    assert_eq!(map.index_of(&key), Ok(index as usize));
                    assert_eq!(map.item_at(index as isize), Some((&key, &index)));
                }
                assert_eq!(map.item_at(-1), Some((&((N - 1) * 3), &(N - 1))));
                assert_eq!(map.item_at(-(N as isize)), Some((&0, &0)));
                assert!(map.item_at(N as isize).is_none());
                assert!(map.item_at(-(N as isize) - 1).is_none());
                assert_eq!(map.index_of(&1), Err(Error::KeyNotFound));
            }

            #[test]
            fn test_slices() {
                let map: $map<i32, char> = (0..26).map(|key| (key, (b'a' + key as u8) as char)).collect();
                let word: String = map.value_slice(Some(&7), Some(&12)).copied().collect();
                assert_eq!(word, "hijkl");
                assert_eq!(map.key_slice(None, Some(&3)).copied().collect::<Vec<_>>(), [0, 1, 2]);
                assert_eq!(map.key_slice(Some(&23), None).copied().collect::<Vec<_>>(), [23, 24, 25]);
                assert_eq!(map.item_slice(Some(&5), Some(&6)).collect::<Vec<_>>(), [(&5, &'f')]);
                assert!(map.item_slice(Some(&9), Some(&3)).next().is_none());
                assert_eq!(map.item_slice(None, None).count(), 26);
                assert_eq!(map.range(20..=22).count(), 3);
            }

            #[test]
            fn test_nsmallest_nlargest() {
                let mut map: $map<i32, i32> = (0..20).map(|key| (key, key)).collect();
                assert_eq!(map.nsmallest(3), [(&0, &0), (&1, &1), (&2, &2)]);
                assert_eq!(map.nlargest(2), [(&19, &19), (&18, &18)]);
                assert_eq!(map.nsmallest(100).len(), 20);

                assert_eq!(map.pop_nsmallest(2), [(0, 0), (1, 1)]);
                assert_eq!(map.pop_nlargest(3), [(19, 19), (18, 18), (17, 17)]);
                assert_eq!(map.len(), 15);
                map.check_consistency();
                assert_eq!(map.pop_nlargest(100).len(), 15);
                assert!(map.is_empty());
            }

            #[test]
            fn test_setdefault_update_fromkeys() {
                let mut map = $map::fromkeys(["a", "b", "c"], 0);
                assert_eq!(map.len(), 3);
                assert_eq!(map.setdefault("b", 7), &0);
                assert_eq!(map.setdefault("d", 7), &7);
                map.update([("a", 1), ("e", 5)]);
                let items: Vec<_> = map.iter().map(|(key, value)| (*key, *value)).collect();
                assert_eq!(items, [("a", 1), ("b", 0), ("c", 0), ("d", 7), ("e", 5)]);
                map.check_consistency();
            }

            #[test]
            fn test_traversal_orders() {
                let map: $map<i32, ()> = (1..=7).map(|key| (key, ())).collect();
                let mut in_order = Vec::new();
                map.foreach(TraversalOrder::InOrder, |key, _| in_order.push(*key));
                assert_eq!(in_order, (1..=7).collect::<Vec<_>>());

                let mut pre_order = Vec::new();
                map.foreach(TraversalOrder::PreOrder, |key, _| pre_order.push(*key));
                let mut post_order = Vec::new();
                map.foreach(TraversalOrder::PostOrder, |key, _| post_order.push(*key));
                let mut level_order = Vec::new();
                map.traverse_level_order(|key, _| level_order.push(*key));

                let root = *map.root().unwrap().key();
                assert_eq!(pre_order[0], root);
                assert_eq!(level_order[0], root);
                assert_eq!(post_order[6], root);
                for order in [&mut pre_order, &mut post_order, &mut level_order] {
                    order.sort();
                    assert_eq!(*order, in_order);
                }
            }

            #[test]
            fn test_custom_comparator() {
                let mut map = $map::with_comparator(|a: &i32, b: &i32| b.cmp(a));
                for key in SCENARIO_KEYS {
                    map.insert(key, ());
                }
                map.check_consistency();
                assert_eq!(map.min_key(), Ok(&999));
                assert_eq!(map.max_key(), Ok(&0));
                assert_eq!(map.succ_key(&9), Ok(&7));
                assert_eq!(map.range(&89..&7).map(|(key, _)| *key).collect::<Vec<_>>(), [89, 67, 34, 9]);

                let mut map = $map::with_comparator(compare::natural().rev());
                map.update(SCENARIO_KEYS.iter().map(|key| (*key, ())));
                map.check_consistency();
                let mut descending = SCENARIO_KEYS.to_vec();
                descending.sort_by(|a, b| b.cmp(a));
                assert!(map.keys().copied().eq(descending));
                assert_eq!(map.nsmallest(2), [(&999, &()), (&123, &())]);
                assert_eq!(map.pop_max(), Ok((0, ())));
            }

            #[test]
            fn test_reinsert_keeps_shape() {
                use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

                let mut values: Vec<i32> = (0..N).collect();
                let mut rng = StdRng::seed_from_u64(0);
                values.shuffle(&mut rng);

                let mut map = $map::new();
                for value in &values {
                    map.insert(*value, 0);
                }
                let tagged = shape(&map);
                let mut pre_order = Vec::new();
                map.foreach(TraversalOrder::PreOrder, |key, _| pre_order.push(*key));

                values.shuffle(&mut rng);
                for value in &values {
                    assert_eq!(map.insert(*value, *value), Some(0));
                }
                assert_eq!(shape(&map), tagged);
                let mut reinserted = Vec::new();
                map.foreach(TraversalOrder::PreOrder, |key, value| {
                    assert_eq!(key, value);
                    reinserted.push(*key);
                });
                assert_eq!(reinserted, pre_order);
                map.check_consistency();
            }

            #[test]
            fn test_clone_eq_debug() {
                let map: $map<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
                let mut copy = map.clone();
                copy.check_consistency();
                assert_eq!(map, copy);
                assert_eq!(format!("{:?}", map), r#"{1: "one", 2: "two"}"#);
                copy.insert(3, "three");
                assert_ne!(map, copy);
                assert_eq!($map::<i32, i32>::default(), $map::new());
            }

            #[test]
            fn test_mixed_random_operations() {
                use rand::{rngs::StdRng, Rng, SeedableRng};

                init_logger();
                let mut rng = StdRng::seed_from_u64(0);
                let mut map = $map::new();
                let mut reference = BTreeMap::new();
                for _ in 0..N * 5 {
                    let key: i32 = rng.gen_range(0..N / 4);
                    if rng.gen_bool(0.6) {
                        assert_eq!(map.insert(key, key), reference.insert(key, key));
                    } else {
                        assert_eq!(map.remove(&key).ok(), reference.remove(&key));
                    }
                    assert_eq!(map.len(), reference.len());
                }
                map.check_consistency();
                assert!(map.iter().eq(reference.iter()));
            }

            #[test]
            #[ignore]
            fn test_large() {
                use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

                let mut rng = StdRng::seed_from_u64(0);
                let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

                let mut map = $map::new();
                for value in &values {
                    map.insert(*value, *value);
                }
                map.check_consistency();

                values.shuffle(&mut rng);
                values.resize(values.len() / 2, 0);
                for value in &values {
                    let _ = map.remove(value);
                }
                map.check_consistency();
            }
        }
    };
}

engine_tests!(avl, AvlTreeMap);
engine_tests!(rb, RbTreeMap);

#[test]
fn test_avl_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
        assert_eq!(map.root().unwrap().key(), &2);
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(4, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&4).unwrap();
        map.check_consistency();
        assert_eq!(map.height(), 2);
        assert_eq!(map.root().unwrap().key(), &2);
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
        assert_eq!(map.root().unwrap().key(), &2);
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(4, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&4).unwrap();
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&0).unwrap();
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&0).unwrap();
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
}

#[test]
fn test_avl_remove_two_children() {
    //       4            4
    //     /   \        /   \
    //    2     6  ->  3     6
    //   / \   / \    /     / \
    //  1   3 5   7  1     5   7
    let mut map: AvlTreeMap<i32, ()> = [4, 2, 6, 1, 3, 5, 7].into_iter().map(|key| (key, ())).collect();
    map.check_consistency();
    map.remove(&2).unwrap();
    map.check_consistency();
    assert_eq!(map.height(), 3);
    assert_eq!(map.root().unwrap().left().unwrap().key(), &3);

    // Left side taller: the predecessor takes the place of the root.
    map.remove(&6).unwrap();
    map.remove(&7).unwrap();
    map.check_consistency();
    map.remove(&4).unwrap();
    map.check_consistency();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5]);
}

#[test]
fn test_avl_height_bound() {
    let mut map = AvlTreeMap::new();
    for key in 1..=(1 << 12) - 1 {
        map.insert(key, ());
    }
    map.check_consistency();
    // A perfect tree for 2^12 - 1 ascending keys.
    assert_eq!(map.height(), 12);
    assert_eq!(map.root().map(Node::tag), Some(&12));
    let mut walker = map.walker();
    walker.goto_leaf();
    assert_eq!(walker.node().map(Node::tag), Some(&1));
}

#[test]
fn test_rb_insert_colors() {
    //   1 ->   2
    //    \    / \
    //     2  1   3
    //      \
    //       3
    let mut map = RbTreeMap::new();
    map.insert(1, ());
    map.insert(2, ());
    map.insert(3, ());
    map.check_consistency();
    let root = map.root().unwrap();
    assert_eq!(root.key(), &2);
    assert_eq!(root.tag(), &Color::Black);
    assert_eq!(root.left().unwrap().tag(), &Color::Red);
    assert_eq!(root.right().unwrap().tag(), &Color::Red);
    assert_eq!(map.black_height(), 1);

    // Red uncle: recolor, root stays black.
    map.insert(4, ());
    map.check_consistency();
    let mut walker = map.walker();
    assert_eq!(walker.node().map(Node::tag), Some(&Color::Black));
    walker.go_left();
    assert_eq!(walker.node().map(Node::tag), Some(&Color::Black));
    assert!(walker.goto(&4));
    assert_eq!(walker.node().map(Node::tag), Some(&Color::Red));
    assert_eq!(map.black_height(), 2);
    assert_eq!(map.height(), 3);
}

#[test]
fn test_rb_remove_random_order() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    init_logger();
    let mut rng = StdRng::seed_from_u64(0);
    let mut keys: Vec<i32> = Vec::new();
    while keys.len() < 1000 {
        let key = rng.gen_range(-N * 100..N * 100);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    let mut map = RbTreeMap::new();
    for key in &keys {
        map.insert(*key, key.to_string());
    }
    map.check_consistency();

    keys.shuffle(&mut rng);
    for (removed, key) in keys.iter().enumerate() {
        assert_eq!(map.remove(key), Ok(key.to_string()));
        map.check_consistency();
        assert_eq!(map.len(), keys.len() - removed - 1);
    }
    assert!(map.is_empty());
}

#[test]
fn test_rb_black_height_bound() {
    let mut map = RbTreeMap::new();
    for key in 0..N {
        map.insert(key, ());
        map.check_consistency();
    }
    // Longest path at most twice the shortest.
    assert!(map.height() <= 2 * map.black_height());
}

#[test]
fn test_engines_agree() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut avl = AvlTreeMap::new();
    let mut rb = RbTreeMap::new();
    for _ in 0..N {
        let key: u16 = rng.gen();
        avl.insert(key, ());
        rb.insert(key, ());
    }
    assert!(avl.iter().eq(rb.iter()));
    for _ in 0..N / 2 {
        let key = *avl.item_at(rng.gen_range(0..avl.len() as isize)).unwrap().0;
        assert_eq!(avl.remove(&key), rb.remove(&key));
    }
    assert!(avl.iter().eq(rb.iter()));
    assert!(avl.iter_rev().eq(rb.iter_rev()));
}

mod properties {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::super::{AvlTreeMap, OrderedMap, RbTreeMap};

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i16, u8),
        Remove(i16),
        PopMin,
        PopMax,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (any::<i16>(), any::<u8>()).prop_map(|(key, value)| Op::Insert(key % 64, value)),
            2 => any::<i16>().prop_map(|key| Op::Remove(key % 64)),
            1 => Just(Op::PopMin),
            1 => Just(Op::PopMax),
        ]
    }

    fn apply<M: OrderedMap<i16, u8>>(map: &mut M, reference: &mut BTreeMap<i16, u8>, op: &Op) {
        match *op {
            Op::Insert(key, value) => assert_eq!(map.insert(key, value), reference.insert(key, value)),
            Op::Remove(key) => assert_eq!(map.remove(&key).ok(), reference.remove(&key)),
            Op::PopMin => assert_eq!(map.pop_min().ok(), reference.pop_first()),
            Op::PopMax => assert_eq!(map.pop_max().ok(), reference.pop_last()),
        }
    }

    proptest! {
        #[test]
        fn avl_matches_btree_map(ops in prop::collection::vec(op(), 0..200)) {
            let mut map = AvlTreeMap::new();
            let mut reference = BTreeMap::new();
            for op in &ops {
                apply(&mut map, &mut reference, op);
                map.check_consistency();
            }
            prop_assert!(map.iter().eq(reference.iter()));
        }

        #[test]
        fn rb_matches_btree_map(ops in prop::collection::vec(op(), 0..200)) {
            let mut map = RbTreeMap::new();
            let mut reference = BTreeMap::new();
            for op in &ops {
                apply(&mut map, &mut reference, op);
                map.check_consistency();
            }
            prop_assert!(map.iter().eq(reference.iter()));
        }

        #[test]
        fn range_matches_btree_map(
            keys in prop::collection::btree_set(-100i16..100, 0..60),
            start in -110i16..110,
            end in -110i16..110,
        ) {
            let map: RbTreeMap<i16, ()> = keys.iter().map(|key| (*key, ())).collect();
            let got: Vec<i16> = map.key_slice(Some(&start), Some(&end)).copied().collect();
            let expected: Vec<i16> = if start <= end {
                keys.range(start..end).copied().collect()
            } else {
                Vec::new()
            };
            prop_assert_eq!(got, expected);

            let got: Vec<i16> = map.range(start..=end).map(|(key, _)| *key).collect();
            let expected: Vec<i16> = if start <= end {
                keys.range(start..=end).copied().collect()
            } else {
                Vec::new()
            };
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn floor_ceiling_match_btree_set(
            keys in prop::collection::btree_set(-100i16..100, 1..60),
            probe in -110i16..110,
        ) {
            let map: AvlTreeMap<i16, ()> = keys.iter().map(|key| (*key, ())).collect();
            prop_assert_eq!(map.floor_key(&probe).ok(), keys.range(..=probe).next_back());
            prop_assert_eq!(map.ceiling_key(&probe).ok(), keys.range(probe..).next());
        }
    }
}
