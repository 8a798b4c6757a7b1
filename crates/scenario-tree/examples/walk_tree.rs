use anyhow::Result;
use scenario_tree::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let location = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/example.json").to_string());

    let source = scenario_tree::open_source(&location)?;
    let tree = ScenarioTree::load(source.as_ref())?;

    println!("Scenario: {}", tree.scenario());
    println!("Nodes: {}", tree.node_count());
    println!("World state: {}", tree.world_state().description);

    // Always take the first fork until a leaf is reached
    let mut traversal = Traversal::new();
    loop {
        let choices = traversal.current_choices(&tree);
        if choices.is_empty() {
            break;
        }

        println!("\nChoices:");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, choice.branch_type.label(), choice.title);
        }

        let Some(ticket) = traversal.choose(&tree, 0) else {
            break;
        };
        traversal.commit(&ticket);

        if let Some(node) = traversal.current_node(&tree) {
            println!("-> {} ({})", node.title, node.timeline_date);
            println!("   {}", node.world_update);
        }
    }

    println!("\nPath: {:?}", traversal.path());

    if let Some(last) = traversal.path().last() {
        let rebuilt = tree.path_from_root(last);
        println!("Rebuilt from parents: {:?}", rebuilt);
        assert_eq!(rebuilt.as_slice(), traversal.path());
    }

    while traversal.go_back().is_some() {}
    println!("After walking back: {:?}", traversal.position());

    Ok(())
}
