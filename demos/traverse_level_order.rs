use ordtree::{AvlTreeMap, OrderedMap, RbTreeMap};

fn main() {
    let mut avl = AvlTreeMap::new();
    let mut rb = RbTreeMap::new();
    for (k, v) in [(1, "1"), (2, "2"), (3, "3"), (4, "4"), (5, "5"), (6, "6")] {
        avl.insert(k, v);
        rb.insert(k, v);
    }

    println!("Level-order traversal (AVL):");
    avl.traverse_level_order(|k, v| {
        println!("Key: {}, Value: {}", k, v);
    });

    println!("Level-order traversal (red-black):");
    rb.traverse_level_order(|k, v| {
        println!("Key: {}, Value: {}", k, v);
    });
}
