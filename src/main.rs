// instance_pool
// Reusable-resource pool with sync and async creation

// This is just a binary wrapper - the actual library is in lib.rs
// Run demos with: cargo run --example basic

use instance_pool::{ObjectPool, Placement, TemplateFactory};

fn main() {
    println!("=== instance_pool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let mut pool = ObjectPool::new(TemplateFactory::new("crate"));

    let obj = match pool.rent_with(&Placement::none().with_position([0.0, 1.0, 0.0])) {
        Ok(obj) => obj,
        Err(e) => {
            eprintln!("  Rent failed: {}", e);
            return;
        }
    };
    println!("  Rented: {} at {:?}", obj.value(), obj.placement().position);

    if let Err(e) = pool.return_object(obj) {
        eprintln!("  Return failed: {}", e);
        return;
    }
    println!("  Available after return: {}", pool.count());
}
