//! Basic usage examples for ObjectPool

use instance_pool::{
    ObjectPool, ParentId, Placement, PoolConfiguration, TemplateFactory, UnknownReturnPolicy,
};

#[derive(Debug, Clone)]
struct Enemy {
    kind: &'static str,
    health: u32,
}

fn main() {
    println!("=== instance_pool - Basic Examples ===\n");

    // Example 1: Rent, return, rent again
    simple_pool();

    // Example 2: Placement on rent
    placement();

    // Example 3: Prewarm and clear
    prewarm_and_clear();

    // Example 4: Double return handling
    double_return();

    // Example 5: Metrics
    metrics();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let mut pool = ObjectPool::new(TemplateFactory::new(Enemy { kind: "orc", health: 100 }));

    let first = pool.rent().unwrap();
    println!("   Rented: {:?}", first.value());
    pool.return_object(first.clone()).unwrap();
    println!("   Available after return: {}", pool.count());

    let second = pool.rent().unwrap();
    println!("   Same instance again: {}\n", first == second);
}

fn placement() {
    println!("2. Placement:");
    let mut pool = ObjectPool::new(TemplateFactory::new(Enemy { kind: "archer", health: 60 }));

    let archer = pool
        .rent_with(&Placement::at([10.0, 0.0, -4.0], [0.0, 0.0, 0.0, 1.0]))
        .unwrap();
    println!("   {} spawned at {:?}", archer.value().kind, archer.placement().position);
    pool.return_object(archer).unwrap();

    // Reparenting keeps the last position
    let archer = pool.rent_with(&Placement::under(ParentId(1))).unwrap();
    let state = archer.state();
    println!("   Reused under {:?} at {:?}\n", state.placement.parent, state.placement.position);
}

fn prewarm_and_clear() {
    println!("3. Prewarm and Clear:");
    let config = PoolConfiguration::new().with_warmup(5);
    let factory = TemplateFactory::new(Enemy { kind: "bat", health: 5 });
    let mut pool = ObjectPool::with_config(factory, config).unwrap();

    println!("   Available after warmup: {}", pool.count());
    let bat = pool.rent().unwrap();
    println!("   Bat health: {}", bat.value().health);

    pool.clear().unwrap();
    println!("   Managed after clear: {}", pool.all_objects().len());
    println!("   Rented bat destroyed: {}\n", bat.is_destroyed());
}

fn double_return() {
    println!("4. Double Return:");
    let mut strict = ObjectPool::new(TemplateFactory::new(0u32));
    let obj = strict.rent().unwrap();
    strict.return_object(obj.clone()).unwrap();
    match strict.return_object(obj) {
        Ok(()) => println!("   Strict pool accepted it"),
        Err(e) => println!("   Strict pool: {}", e),
    }

    let config = PoolConfiguration::new().with_unknown_return(UnknownReturnPolicy::Ignore);
    let mut lenient = ObjectPool::with_config(TemplateFactory::new(0u32), config).unwrap();
    let obj = lenient.rent().unwrap();
    lenient.return_object(obj.clone()).unwrap();
    lenient.return_object(obj).unwrap();
    println!("   Lenient pool still holds {} free instance\n", lenient.count());
}

fn metrics() {
    println!("5. Metrics:");
    let mut pool = ObjectPool::new(TemplateFactory::new(Enemy { kind: "slime", health: 20 }));

    for _ in 0..3 {
        let slime = pool.rent().unwrap();
        pool.return_object(slime).unwrap();
    }

    let metrics = pool.export_metrics();
    let mut keys: Vec<_> = metrics.keys().collect();
    keys.sort();
    for key in keys {
        println!("     {}: {}", key, metrics[key]);
    }
}
