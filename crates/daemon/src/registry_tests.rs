use super::*;
use drv_engine::test_support::FakeFactory;
use drv_policy::test_support::Fixed;
use std::time::Duration;

struct TestProvider {
    languages_seen: parking_lot::Mutex<Vec<String>>,
}

impl TestProvider {
    fn new() -> Self {
        Self { languages_seen: parking_lot::Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl PoolFactoryProvider for TestProvider {
    async fn factory_for(&self, language: &str) -> Result<Arc<dyn WorkerFactory>, DaemonError> {
        self.languages_seen.lock().push(language.to_string());
        Ok(FakeFactory::new())
    }

    fn policy_for(&self, _language: &str) -> Box<dyn drv_policy::ScalingPolicy> {
        Box::new(Fixed(1))
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(20)
    }
}

#[tokio::test]
async fn creates_a_pool_lazily_on_first_use() {
    let registry = Registry::new();
    let provider = TestProvider::new();

    assert!(registry.languages().await.is_empty());
    let pool = registry.get_or_create("python", &provider).await.unwrap();
    assert_eq!(pool.state().running, 1);
    assert_eq!(registry.languages().await, vec!["python".to_string()]);
    assert_eq!(provider.languages_seen.lock().len(), 1);

    pool.stop().await.unwrap();
}

#[tokio::test]
async fn a_second_lookup_reuses_the_existing_pool() {
    let registry = Registry::new();
    let provider = TestProvider::new();

    let first = registry.get_or_create("go", &provider).await.unwrap();
    let second = registry.get_or_create("go", &provider).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.languages_seen.lock().len(), 1);

    first.stop().await.unwrap();
}

#[tokio::test]
async fn get_returns_none_for_an_unregistered_language() {
    let registry = Registry::new();
    assert!(registry.get("rust").await.is_none());
}

#[tokio::test]
async fn stop_all_drains_every_pool() {
    let registry = Registry::new();
    let provider = TestProvider::new();

    registry.get_or_create("python", &provider).await.unwrap();
    registry.get_or_create("go", &provider).await.unwrap();

    let states = registry.pool_states().await;
    assert_eq!(states.len(), 2);

    registry.stop_all().await;

    for (_, pool) in registry.pools.read().await.iter() {
        assert!(matches!(pool.stop().await, Err(drv_engine::PoolError::Closed)));
    }
}
