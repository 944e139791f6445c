//! Tests for RetryingLoader attempt counting and completion delivery

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rstest::rstest;
use url::Url;

use mediakit::application::{ImageData, ImageDataLoader, LoadError, RetryingLoader};
use mediakit::domain::DomainError;
use mediakit::util::testing;

/// Loader that follows a script of outcomes (true = success) and counts calls.
/// Once the script runs out it keeps failing.
struct ScriptedLoader {
    outcomes: Mutex<VecDeque<bool>>,
    calls: AtomicU32,
}

impl ScriptedLoader {
    fn new(outcomes: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.iter().copied().collect()),
            calls: AtomicU32::new(0),
        })
    }

    fn always_failing() -> Arc<Self> {
        Self::new(&[])
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageDataLoader for ScriptedLoader {
    async fn load_image_data(&self, _url: &Url) -> Result<ImageData, LoadError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let succeed = self.outcomes.lock().unwrap().pop_front().unwrap_or(false);
        if succeed {
            Ok(ImageData::new(vec![attempt as u8]))
        } else {
            Err(LoadError::Failed(format!("attempt {attempt}")))
        }
    }
}

fn url(name: &str) -> Url {
    Url::parse(&format!("https://images.example/{name}")).unwrap()
}

fn failure_message(result: Result<ImageData, LoadError>) -> String {
    match result {
        Err(LoadError::Failed(msg)) => msg,
        other => panic!("expected Failed, got {other:?}"),
    }
}

// ============================================================
// Attempt bound
// ============================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[tokio::test]
async fn given_always_failing_when_loading_then_exactly_k_attempts(#[case] k: u32) {
    testing::init_test_setup();
    let inner = ScriptedLoader::always_failing();
    let loader = RetryingLoader::new(Arc::clone(&inner), k).unwrap();

    let result = loader.load_image_data(&url("a.png")).await;

    assert_eq!(inner.calls(), k);
    assert_eq!(failure_message(result), format!("attempt {k}"));
}

#[rstest]
#[case(1, 1)]
#[case(2, 5)]
#[case(3, 3)]
#[case(4, 10)]
#[tokio::test]
async fn given_success_on_attempt_j_when_loading_then_stops_there(
    #[case] j: u32,
    #[case] k: u32,
) {
    let mut script = vec![false; (j - 1) as usize];
    script.push(true);
    // Later successes must never be consumed
    script.extend(std::iter::repeat(true).take(5));
    let inner = ScriptedLoader::new(&script);
    let loader = RetryingLoader::new(Arc::clone(&inner), k).unwrap();

    let data = loader.load_image_data(&url("a.png")).await.unwrap();

    assert_eq!(inner.calls(), j);
    assert_eq!(data.as_bytes(), &[j as u8]);
}

#[tokio::test]
async fn given_fail_fail_succeed_with_three_attempts_then_success_from_third() {
    let inner = ScriptedLoader::new(&[false, false, true]);
    let loader = RetryingLoader::new(Arc::clone(&inner), 3).unwrap();

    let data = loader.load_image_data(&url("a.png")).await.unwrap();

    assert_eq!(inner.calls(), 3);
    assert_eq!(data.into_inner(), vec![3u8]);
}

#[tokio::test]
async fn given_always_failing_with_two_attempts_then_failure_from_second() {
    let inner = ScriptedLoader::always_failing();
    let loader = RetryingLoader::new(Arc::clone(&inner), 2).unwrap();

    let result = loader.load_image_data(&url("a.png")).await;

    assert_eq!(inner.calls(), 2);
    assert_eq!(failure_message(result), "attempt 2");
}

#[test]
fn given_zero_attempts_when_constructing_then_rejected() {
    let result = RetryingLoader::new(ScriptedLoader::always_failing(), 0);

    assert!(matches!(result, Err(DomainError::InvalidAttemptBound(0))));
}

#[tokio::test]
async fn given_new_call_when_loading_then_counter_restarts_at_one() {
    // First call exhausts its 2 attempts, second call gets a fresh 2
    let inner = ScriptedLoader::new(&[false, false, false, true]);
    let loader = RetryingLoader::new(Arc::clone(&inner), 2).unwrap();

    assert!(loader.load_image_data(&url("a.png")).await.is_err());
    let data = loader.load_image_data(&url("a.png")).await.unwrap();

    assert_eq!(inner.calls(), 4);
    assert_eq!(data.as_bytes(), &[4u8]);
}

#[tokio::test]
async fn given_nested_retry_decorators_when_failing_then_bounds_multiply() {
    let inner = ScriptedLoader::always_failing();
    let loader = RetryingLoader::new(RetryingLoader::new(Arc::clone(&inner), 3).unwrap(), 2).unwrap();

    let result = loader.load_image_data(&url("a.png")).await;

    assert!(result.is_err());
    assert_eq!(inner.calls(), 6);
}

#[tokio::test]
async fn given_delay_when_retrying_then_waits_between_attempts() {
    let inner = ScriptedLoader::always_failing();
    let loader = RetryingLoader::new(Arc::clone(&inner), 3)
        .unwrap()
        .with_delay(Duration::from_millis(20));

    let started = Instant::now();
    let _ = loader.load_image_data(&url("a.png")).await;

    // Two pauses between three attempts, none after the last
    assert!(started.elapsed() >= Duration::from_millis(40));
    assert_eq!(inner.calls(), 3);
}

// ============================================================
// Completion delivery
// ============================================================

#[tokio::test]
async fn given_spawned_load_when_finished_then_callback_runs_exactly_once() {
    let inner = ScriptedLoader::new(&[false, true]);
    let loader = Arc::new(RetryingLoader::new(Arc::clone(&inner), 3).unwrap());
    let completions = Arc::new(AtomicU32::new(0));
    let (tx, rx) = tokio::sync::oneshot::channel();

    {
        let completions = Arc::clone(&completions);
        Arc::clone(&loader).spawn_load(url("a.png"), move |result| {
            completions.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(result.map(ImageData::into_inner));
        });
    }
    let outcome = rx.await.unwrap();
    // Give a stray second delivery the chance to show up
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(inner.calls(), 2);
    assert_eq!(outcome.unwrap(), vec![2u8]);
}

#[tokio::test]
async fn given_spawned_load_when_exhausted_then_callback_gets_failure() {
    let inner = ScriptedLoader::always_failing();
    let loader = Arc::new(RetryingLoader::new(Arc::clone(&inner), 2).unwrap());
    let (tx, rx) = tokio::sync::oneshot::channel();

    loader.spawn_load(url("a.png"), move |result| {
        let _ = tx.send(result);
    });
    let result = rx.await.unwrap();

    assert_eq!(failure_message(result), "attempt 2");
    assert_eq!(inner.calls(), 2);
}

/// Fails every attempt after a pause, so a load is still running when the
/// runtime goes away.
struct SlowFailingLoader;

#[async_trait]
impl ImageDataLoader for SlowFailingLoader {
    async fn load_image_data(&self, _url: &Url) -> Result<ImageData, LoadError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err(LoadError::Failed("slow".to_string()))
    }
}

#[test]
fn given_load_in_flight_when_runtime_shuts_down_then_callback_runs_once_with_cancelled() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let completions = Arc::new(AtomicU32::new(0));
    let outcome = Arc::new(Mutex::new(None));

    {
        let _guard = runtime.enter();
        let loader = Arc::new(RetryingLoader::new(SlowFailingLoader, 3).unwrap());
        let completions = Arc::clone(&completions);
        let outcome = Arc::clone(&outcome);
        loader.spawn_load(url("a.png"), move |result| {
            completions.fetch_add(1, Ordering::SeqCst);
            *outcome.lock().unwrap() = Some(result);
        });
    }
    // Let the first attempt start, then tear the runtime down mid-sequence
    std::thread::sleep(Duration::from_millis(20));
    runtime.shutdown_timeout(Duration::from_secs(1));

    assert_eq!(completions.load(Ordering::SeqCst), 1);
    let outcome = outcome.lock().unwrap().take().unwrap();
    assert!(matches!(outcome, Err(LoadError::Cancelled(_))));
}

// ============================================================
// Concurrent calls keep separate counters
// ============================================================

/// Loader with an independent script per URL path; yields between attempts
/// so concurrent calls interleave.
struct PerUrlLoader {
    scripts: Mutex<HashMap<String, VecDeque<bool>>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl PerUrlLoader {
    fn new(scripts: &[(&str, &[bool])]) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(
                scripts
                    .iter()
                    .map(|(path, outcomes)| (path.to_string(), outcomes.iter().copied().collect()))
                    .collect(),
            ),
            calls: Mutex::new(HashMap::new()),
        })
    }

    fn calls(&self, path: &str) -> u32 {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ImageDataLoader for PerUrlLoader {
    async fn load_image_data(&self, url: &Url) -> Result<ImageData, LoadError> {
        tokio::task::yield_now().await;
        let path = url.path().to_string();
        *self.calls.lock().unwrap().entry(path.clone()).or_insert(0) += 1;
        let succeed = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or(false);
        if succeed {
            Ok(ImageData::new(path.into_bytes()))
        } else {
            Err(LoadError::Failed(path))
        }
    }
}

#[tokio::test]
async fn given_concurrent_loads_on_shared_wrapper_then_counters_are_isolated() {
    let inner = PerUrlLoader::new(&[
        ("/a.png", &[false, false, true][..]),
        ("/b.png", &[false, false, false, true][..]),
    ]);
    let loader = Arc::new(RetryingLoader::new(Arc::clone(&inner), 3).unwrap());

    let url_a = url("a.png");
    let url_b = url("b.png");
    let (a, b) = tokio::join!(
        loader.load_image_data(&url_a),
        loader.load_image_data(&url_b),
    );

    assert_eq!(a.unwrap().as_bytes(), b"/a.png");
    assert!(b.is_err(), "b needs a fourth attempt it never gets");
    assert_eq!(inner.calls("/a.png"), 3);
    assert_eq!(inner.calls("/b.png"), 3);
}
