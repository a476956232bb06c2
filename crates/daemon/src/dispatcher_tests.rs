use super::*;
use crate::detect::ExtensionDetector;
use drv_core::test_support::fake_manifest;
use drv_core::DriverReference;
use drv_engine::test_support::FakeFactory;
use drv_policy::test_support::Fixed;
use drv_storage::test_support::FakeTransport;
use std::sync::Arc;
use std::time::Duration;

struct TestProvider {
    factory: Arc<FakeFactory>,
}

impl TestProvider {
    fn new() -> Self {
        Self { factory: FakeFactory::new() }
    }

    fn with_delay(delay: Duration) -> Self {
        Self { factory: FakeFactory::with_delay(delay) }
    }
}

#[async_trait::async_trait]
impl PoolFactoryProvider for TestProvider {
    async fn factory_for(&self, _language: &str) -> Result<Arc<dyn drv_engine::WorkerFactory>, DaemonError> {
        Ok(Arc::clone(&self.factory) as Arc<dyn drv_engine::WorkerFactory>)
    }

    fn policy_for(&self, _language: &str) -> Box<dyn drv_policy::ScalingPolicy> {
        Box::new(Fixed(1))
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(20)
    }
}

fn test_store() -> (Arc<ImageStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(FakeTransport::new());
    let store = Arc::new(ImageStore::new(dir.path(), transport));
    (store, dir)
}

fn test_dispatcher(provider: TestProvider) -> Dispatcher {
    let (store, _dir) = test_store();
    Dispatcher::new(Arc::new(Registry::new()), Arc::new(provider), Arc::new(ExtensionDetector::new()), store)
}

#[tokio::test]
async fn empty_content_short_circuits_without_touching_a_pool() {
    let provider = TestProvider::new();
    let factory = Arc::clone(&provider.factory);
    let dispatcher = test_dispatcher(provider);

    let response = dispatcher
        .parse(ParseRequest {
            filename: "a.py".to_string(),
            language: None,
            content: Vec::new(),
            mode: None,
            timeout_ms: None,
        })
        .await
        .unwrap();

    assert_eq!(response.tree, Vec::<u8>::new());
    assert_eq!(factory.spawned_count(), 0);
}

#[tokio::test]
async fn non_utf8_content_fails_without_touching_a_pool() {
    let provider = TestProvider::new();
    let factory = Arc::clone(&provider.factory);
    let dispatcher = test_dispatcher(provider);

    let err = dispatcher
        .parse(ParseRequest {
            filename: "a.py".to_string(),
            language: Some("python".to_string()),
            content: vec![0xff, 0xfe],
            mode: None,
            timeout_ms: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DaemonError::UnknownEncoding));
    assert_eq!(factory.spawned_count(), 0);
}

#[tokio::test]
async fn unrecognized_filename_without_an_explicit_language_fails_detection() {
    let dispatcher = test_dispatcher(TestProvider::new());

    let err = dispatcher
        .parse(ParseRequest {
            filename: "a.unknownext".to_string(),
            language: None,
            content: b"print(1)".to_vec(),
            mode: None,
            timeout_ms: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DaemonError::LanguageDetection));
}

#[tokio::test]
async fn parse_echoes_content_through_the_pooled_worker() {
    let dispatcher = test_dispatcher(TestProvider::new());

    let response = dispatcher
        .parse(ParseRequest {
            filename: "a.py".to_string(),
            language: None,
            content: b"print(1)".to_vec(),
            mode: None,
            timeout_ms: None,
        })
        .await
        .unwrap();

    assert_eq!(response.tree, b"print(1)");
    assert_eq!(response.language, "python");
}

#[tokio::test]
async fn a_deadline_that_is_never_reached_succeeds_normally() {
    let dispatcher = test_dispatcher(TestProvider::new());

    let response = dispatcher
        .parse(ParseRequest {
            filename: "a.py".to_string(),
            language: None,
            content: b"print(1)".to_vec(),
            mode: None,
            timeout_ms: Some(10_000),
        })
        .await
        .unwrap();

    assert_eq!(response.language, "python");
}

#[tokio::test(start_paused = true)]
async fn an_expired_deadline_eventually_kills_a_hung_worker() {
    let provider = TestProvider::with_delay(Duration::from_secs(60));
    let dispatcher = test_dispatcher(provider).with_grace_period(Duration::from_millis(50));

    let request = ParseRequest {
        filename: "a.py".to_string(),
        language: Some("python".to_string()),
        content: b"print(1)".to_vec(),
        mode: None,
        timeout_ms: Some(10),
    };

    let result = tokio::time::timeout(Duration::from_secs(5), dispatcher.parse(request)).await.unwrap();
    let err = result.unwrap_err();
    assert!(matches!(err, DaemonError::Pool(drv_engine::PoolError::Cancelled)));
}

#[tokio::test]
async fn supported_languages_reports_every_installed_image() {
    let dir = tempfile::tempdir().unwrap();
    let reference = DriverReference::new("docker://bblfsh/python-driver:latest");
    let fake_transport = FakeTransport::new();
    fake_transport.set_manifest(&reference, fake_manifest("python"));
    let store = Arc::new(ImageStore::new(dir.path(), Arc::new(fake_transport)));
    store.install(&reference, false).unwrap();

    let dispatcher = Dispatcher::new(
        Arc::new(Registry::new()),
        Arc::new(TestProvider::new()),
        Arc::new(ExtensionDetector::new()),
        store,
    );

    let languages = dispatcher.supported_languages().await.unwrap();
    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0].language, "python");
}
