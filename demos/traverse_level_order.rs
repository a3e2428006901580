use avl_levels::BalancedTree;

fn main() {
    let mut tree = BalancedTree::new();
    for key in 1..=6 {
        tree.insert(key);
    }

    println!("Level-order traversal:");
    tree.traverse_level_order(|key, depth| {
        println!("Depth: {}, Key: {}", depth, key);
    });

    println!("By level:");
    for level in tree.traverse_by_level() {
        println!("{}: {:?}", level.depth, level.keys);
    }
}
