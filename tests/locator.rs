//! End-to-end acquisition scenarios on a paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use fixvisor::{
    Config, ConfigError, Event, EventKind, GpsProfile, Locator, Outcome, PositionFix,
    ProviderError, ProviderFn, ProviderRef, SIGNAL_NOT_AVAILABLE, SimulatedGps, Subscribe,
};

fn rome() -> PositionFix {
    PositionFix::new(41.9028, 12.4964, 6.0).unwrap()
}

fn counting<F>(calls: Arc<AtomicU32>, on_call: F) -> ProviderRef
where
    F: Fn(u32) -> (Duration, Result<PositionFix, ProviderError>) + Send + Sync + 'static,
{
    ProviderFn::arc("stub", move |_ctx: CancellationToken| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        let (delay, res) = on_call(n);
        async move {
            time::sleep(delay).await;
            res
        }
    })
}

fn locator(provider: ProviderRef) -> Arc<Locator> {
    Locator::builder(Config::default())
        .with_provider(provider)
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, e: &Event) {
        self.kinds.lock().unwrap().push(e.kind);
    }
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_after_five_seconds() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls, |_| (Duration::from_secs(6), Ok(rome()))));

    let started = Instant::now();
    let out = loc.acquire_position().await;

    assert_eq!(
        out,
        Outcome::TimeoutFailure {
            deadline: Duration::from_secs(5)
        }
    );
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_millis(5_050));
}

#[tokio::test(start_paused = true)]
async fn persistent_signal_loss_exhausts_three_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls.clone(), |_| {
        (
            Duration::from_millis(100),
            Err(ProviderError::unavailable(SIGNAL_NOT_AVAILABLE)),
        )
    }));
    let mut events = loc.events();

    let started = Instant::now();
    let out = loc.acquire_position_with_retry(3).await;

    assert_eq!(out, Outcome::domain(SIGNAL_NOT_AVAILABLE));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 3 reads of 100ms plus 2 backoffs of 1s.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2_300) && elapsed < Duration::from_millis(2_400));

    let mut backoffs = 0;
    let mut exhausted = 0;
    while let Ok(ev) = events.try_recv() {
        match ev.kind {
            EventKind::BackoffScheduled => backoffs += 1,
            EventKind::RetriesExhausted => exhausted += 1,
            _ => {}
        }
    }
    assert_eq!((backoffs, exhausted), (2, 1));
}

#[tokio::test(start_paused = true)]
async fn second_attempt_success_stops_retrying() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls.clone(), |n| {
        if n == 1 {
            (
                Duration::from_millis(300),
                Err(ProviderError::unavailable(SIGNAL_NOT_AVAILABLE)),
            )
        } else {
            (Duration::from_millis(300), Ok(rome()))
        }
    }));

    let out = loc.acquire_position_with_retry(3).await;

    assert_eq!(out, Outcome::Success(rome()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn timeouts_are_retried_like_domain_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls.clone(), |n| {
        if n == 1 {
            (Duration::from_secs(60), Ok(rome()))
        } else {
            (Duration::from_millis(10), Ok(rome()))
        }
    }));

    let out = loc.acquire_position_with_retry(2).await;

    assert_eq!(out, Outcome::Success(rome()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn never_completing_provider_is_bounded_by_the_deadline() {
    let provider: ProviderRef = ProviderFn::arc("silent", |_ctx: CancellationToken| async {
        std::future::pending::<Result<PositionFix, ProviderError>>().await
    });
    let loc = locator(provider);

    let started = Instant::now();
    let out = loc.acquire_position_with_retry(2).await;

    assert!(matches!(out, Outcome::TimeoutFailure { .. }));
    // Two deadlines and one backoff, no waiting on the stuck reads.
    assert!(started.elapsed() < Duration::from_millis(11_050));
}

#[tokio::test(start_paused = true)]
async fn each_call_settles_exactly_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls, |_| (Duration::from_millis(5_200), Ok(rome()))));
    let mut events = loc.events();

    let out = loc.acquire_position().await;
    assert!(matches!(out, Outcome::TimeoutFailure { .. }));

    // Let the stubborn read finish inside the release grace.
    time::sleep(Duration::from_secs(1)).await;

    let mut settled = 0;
    let mut late = 0;
    while let Ok(ev) = events.try_recv() {
        match ev.kind {
            EventKind::FixAcquired
            | EventKind::AttemptFailed
            | EventKind::DeadlineHit
            | EventKind::AttemptInterrupted => settled += 1,
            EventKind::LateResultDiscarded => late += 1,
            _ => {}
        }
    }
    assert_eq!((settled, late), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn caller_cancellation_wins_over_a_running_read() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls.clone(), |_| (Duration::from_secs(4), Ok(rome()))));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let out = loc.acquire_position_with_retry_until(3, &cancel).await;

    assert_eq!(out, Outcome::InterruptedFailure);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_millis(1_050));
    assert!(!loc.is_interrupted());
}

#[tokio::test(start_paused = true)]
async fn interrupt_ends_current_and_future_calls() {
    let calls = Arc::new(AtomicU32::new(0));
    let loc = locator(counting(calls.clone(), |_| (Duration::from_secs(3), Ok(rome()))));

    let pending = {
        let loc = Arc::clone(&loc);
        tokio::spawn(async move { loc.acquire_position().await })
    };
    time::sleep(Duration::from_millis(500)).await;
    loc.interrupt();

    assert_eq!(pending.await.unwrap(), Outcome::InterruptedFailure);
    assert!(loc.is_interrupted());
    assert_eq!(loc.acquire_position().await, Outcome::InterruptedFailure);
}

#[tokio::test(start_paused = true)]
async fn simulated_fixes_stay_near_the_base_coordinate() {
    let profile = GpsProfile {
        signal_loss: 0.0,
        ..GpsProfile::default()
    };
    let loc = locator(Arc::new(SimulatedGps::seeded(profile.clone(), 42).unwrap()));

    for _ in 0..5 {
        let out = loc.acquire_position().await;
        let fix = out.fix().copied().expect("default profile fits the deadline");
        let bound = profile.offset_degrees + 1e-9;
        assert!((fix.latitude() - profile.base_latitude).abs() <= bound);
        assert!((fix.longitude() - profile.base_longitude).abs() <= bound);
        assert!((profile.accuracy_min..=profile.accuracy_max).contains(&fix.accuracy_meters()));
    }
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_the_attempt_lifecycle() {
    let recorder = Arc::new(Recorder::default());
    let calls = Arc::new(AtomicU32::new(0));
    let loc = Locator::builder(Config::default())
        .with_provider(counting(calls, |_| (Duration::from_millis(200), Ok(rome()))))
        .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
        .build()
        .unwrap();

    assert!(loc.acquire_position().await.is_success());
    loc.shutdown().await;

    assert_eq!(
        *recorder.kinds.lock().unwrap(),
        vec![EventKind::AttemptStarting, EventKind::FixAcquired]
    );
}

#[tokio::test]
async fn builder_rejects_a_zero_deadline() {
    let cfg = Config {
        deadline: Duration::ZERO,
        ..Config::default()
    };
    let err = Locator::builder(cfg).build().err();
    assert_eq!(err, Some(ConfigError::ZeroDeadline));
}
