use avl_levels::BalancedTree;

fn main() {
    let mut tree = BalancedTree::new();
    tree.insert(10);
    tree.insert(20);
    tree.insert(30);
    tree.insert(30);
    tree.insert(5);
    tree.insert(15);
    assert!(tree.search(&20));
    tree.delete(&20);
    assert!(!tree.search(&20));

    if let Some(root) = tree.root() {
        println!(
            "root {} (height {}, balance {})",
            root.key(),
            root.height(),
            root.balance_factor()
        );
    }
    for key in [5, 10, 15, 30] {
        println!(
            "{key}: height {:?}, balance {:?}",
            tree.height_of(&key),
            tree.balance_factor(&key)
        );
    }

    print!("{{ ");
    for key in &tree {
        print!("{key}, ");
    }
    println!("}}");
}
