use ordtree::{AvlTreeMap, Error, OrderedMap, RbTreeMap};

fn main() {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    assert_eq!(map.remove(&1), Ok("one"));
    assert!(map.get(&1).is_none());
    assert_eq!(map.remove(&1), Err(Error::KeyNotFound));

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    let mut rb = RbTreeMap::new();
    for x in [34, 67, 89, 123, 3, 7, 9, 2, 0, 999] {
        rb.insert(x, x * x);
    }
    println!("min {:?}, max {:?}", rb.min_item(), rb.max_item());
    println!("after 9 comes {:?}", rb.succ_key(&9));
    println!("[5, 100) = {:?}", rb.key_slice(Some(&5), Some(&100)).collect::<Vec<_>>());

    print!("{{ ");
    while let Ok((k, _)) = rb.pop_min() {
        print!("{k}, ");
    }
    println!("}}");
}
