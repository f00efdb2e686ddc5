//! Advanced features: callbacks, custom factories, Prometheus export

use instance_pool::{
    CallbackDispatcher, Factory, ObjectPool, Placement, PoolCallbackReceiver, PoolConfiguration,
    PoolResult, ResourceLifecycle,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A resource that implements the hooks itself
#[derive(Debug)]
struct Connection {
    id: usize,
    open: AtomicBool,
    uses: AtomicUsize,
}

impl PoolCallbackReceiver for Connection {
    fn on_rent(&self) {
        self.uses.fetch_add(1, Ordering::Relaxed);
    }

    fn on_return(&self) {
        println!("   Connection-{} parked", self.id);
    }
}

/// Custom factory that opens and closes connections
#[derive(Default)]
struct ConnectionFactory {
    next_id: AtomicUsize,
}

impl ResourceLifecycle for ConnectionFactory {
    type Resource = Connection;

    fn destroy(&self, resource: &Connection) -> PoolResult<()> {
        resource.open.store(false, Ordering::Relaxed);
        println!("   Closed Connection-{}", resource.id);
        Ok(())
    }
}

impl Factory for ConnectionFactory {
    fn create(&self, _placement: &Placement) -> PoolResult<Connection> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        println!("   Opening Connection-{}", id);
        Ok(Connection {
            id,
            open: AtomicBool::new(true),
            uses: AtomicUsize::new(0),
        })
    }
}

fn main() {
    println!("=== instance_pool - Advanced Features ===\n");

    // Example 1: Callbacks
    callbacks();

    // Example 2: Closure factory
    closure_factory();

    // Example 3: Prometheus metrics
    prometheus_export();
}

fn callbacks() {
    println!("1. Callbacks:");

    let config = PoolConfiguration::new()
        .with_callbacks(CallbackDispatcher::new().with_receiver::<Connection>());
    let mut pool = ObjectPool::with_config(ConnectionFactory::default(), config).unwrap();

    let conn = pool.rent().unwrap();
    pool.return_object(conn.clone()).unwrap();
    let conn = pool.rent().unwrap();
    println!("   Connection-{} used {} times", conn.id, conn.uses.load(Ordering::Relaxed));

    pool.dispose().unwrap();
    println!("   Still open after dispose: {}", conn.open.load(Ordering::Relaxed));
    println!();
}

fn closure_factory() {
    println!("2. Closure Factory:");

    let mut pool = ObjectPool::from_fn(|_: &Placement| vec![0u8; 4096]);
    pool.prewarm(3).unwrap();

    let buffer = pool.rent().unwrap();
    println!("   Buffer of {} bytes, {} still free", buffer.len(), pool.count());
    pool.return_object(buffer).unwrap();
    println!();
}

fn prometheus_export() {
    println!("3. Prometheus Metrics Export:");

    let mut pool = ObjectPool::from_fn(|_: &Placement| String::with_capacity(256));
    pool.prewarm(5).unwrap();

    let _obj1 = pool.rent().unwrap();
    let _obj2 = pool.rent().unwrap();

    let mut tags = HashMap::new();
    tags.insert("service".to_string(), "example".to_string());
    tags.insert("env".to_string(), "dev".to_string());

    let prometheus_text = pool.export_metrics_prometheus("example_pool", Some(&tags));
    println!("{}", prometheus_text);
}
