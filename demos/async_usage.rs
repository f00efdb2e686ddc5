//! Async usage examples

use async_trait::async_trait;
use instance_pool::{
    AssetLoader, AsyncAssetLoader, AsyncObjectPool, KeyedLoadFactory, Placement,
    PoolConfiguration, PoolError, PoolResult,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Pretend asset store that takes a while per load and counts live instances
#[derive(Default)]
struct SlowLoader {
    live: Mutex<HashMap<String, usize>>,
}

impl AssetLoader for SlowLoader {
    type Asset = String;

    fn release_instance(&self, asset: &String) -> PoolResult<()> {
        let key = asset.trim_end_matches(" instance");
        match self.live.lock().get_mut(key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(PoolError::factory(format!("{} is not live", key))),
        }
    }
}

#[async_trait]
impl AsyncAssetLoader for SlowLoader {
    async fn instantiate(&self, key: &str, _placement: &Placement) -> PoolResult<String> {
        sleep(Duration::from_millis(50)).await;
        *self.live.lock().entry(key.to_string()).or_default() += 1;
        Ok(format!("{} instance", key))
    }
}

#[tokio::main]
async fn main() {
    println!("=== instance_pool - Async Examples ===\n");

    // Example 1: Async rent
    async_rent().await;

    // Example 2: Cancelled creation
    cancelled_rent().await;

    // Example 3: Prewarm with warmup config
    prewarm().await;

    // Example 4: Dispose releases loads
    dispose().await;
}

async fn async_rent() {
    println!("1. Async Rent:");
    let factory = KeyedLoadFactory::new(SlowLoader::default(), "fx/smoke").unwrap();
    let mut pool = AsyncObjectPool::new(factory);
    let cancel = CancellationToken::new();

    let smoke = pool.rent_async(&cancel).await.unwrap();
    println!("   Loaded: {}", smoke.value());
    pool.return_object(smoke).unwrap();

    let again = pool.rent_async(&cancel).await.unwrap();
    println!("   Reused without loading: {}\n", again.value());
}

async fn cancelled_rent() {
    println!("2. Cancelled Rent:");
    let factory = KeyedLoadFactory::new(SlowLoader::default(), "units/dragon").unwrap();
    let mut pool = AsyncObjectPool::new(factory);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    match pool.rent_async(&cancel).await {
        Ok(_) => println!("   Got a dragon"),
        Err(e) => println!("   Error: {}", e),
    }
    println!("   Managed instances: {}\n", pool.all_objects().len());
}

async fn prewarm() {
    println!("3. Prewarm:");
    let factory = KeyedLoadFactory::new(SlowLoader::default(), "props/barrel").unwrap();
    let cancel = CancellationToken::new();
    let config = PoolConfiguration::new().with_warmup(4);
    let pool = AsyncObjectPool::with_config(factory, config, &cancel)
        .await
        .unwrap();

    println!("   Available after warmup: {}", pool.count());
    println!("   Live loads: {}\n", pool.factory().loader().live.lock()["props/barrel"]);
}

async fn dispose() {
    println!("4. Dispose:");
    let factory = KeyedLoadFactory::new(SlowLoader::default(), "props/crate").unwrap();
    let mut pool = AsyncObjectPool::new(factory);
    let cancel = CancellationToken::new();

    pool.prewarm_async(2, &cancel).await.unwrap();
    let _held = pool.rent_async(&cancel).await.unwrap();

    pool.dispose().unwrap();
    println!("   Live loads after dispose: {}", pool.factory().loader().live.lock()["props/crate"]);

    match pool.rent_async(&cancel).await {
        Ok(_) => println!("   Rented after dispose"),
        Err(e) => println!("   Rent after dispose: {}", e),
    }
}
