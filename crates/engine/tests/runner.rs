use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::StreamExt;
use tokio::sync::oneshot;

use engine::{AsyncOperationRunner, AsyncResource, Outcome, Status};

fn runner() -> AsyncOperationRunner {
    AsyncOperationRunner::try_current().unwrap()
}

#[tokio::test]
async fn success_emits_loading_then_success() {
    let stream = runner().run(|| async { Ok::<_, String>(Outcome::Success(vec![1, 2, 3])) });
    let emitted: Vec<AsyncResource<Vec<i32>>> = stream.collect().await;

    assert_eq!(
        emitted,
        vec![
            AsyncResource::Loading { data: None },
            AsyncResource::Success {
                data: vec![1, 2, 3]
            },
        ]
    );
}

#[tokio::test]
async fn failure_outcome_surfaces_body_and_never_success() {
    let stream = runner().run(|| async {
        Ok::<Outcome<u32>, String>(Outcome::Failure {
            status: 500,
            body: "boom".to_string(),
        })
    });
    let emitted: Vec<_> = stream.collect().await;

    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0].status(), Status::Loading);
    assert_eq!(emitted[1].status(), Status::Error);
    assert!(emitted[1].message().unwrap().contains("boom"));
    assert_eq!(emitted[1].data(), None);
    assert!(emitted.iter().all(|r| r.status() != Status::Success));
}

#[tokio::test]
async fn fault_becomes_error_with_description() {
    let stream = runner().run(|| async { Err::<Outcome<u32>, _>("connection refused") });
    let terminal = stream.terminal().await.unwrap();
    assert_eq!(terminal, AsyncResource::error("connection refused"));
}

#[tokio::test]
async fn panicking_fetch_becomes_error() {
    let stream = runner().run(|| async {
        if true {
            panic!("decoder exploded");
        }
        Ok::<Outcome<u32>, String>(Outcome::Success(1))
    });
    let emitted: Vec<_> = stream.collect().await;

    assert_eq!(emitted.len(), 2);
    assert!(emitted[0].is_loading());
    assert_eq!(emitted[1].message(), Some("decoder exploded"));
}

#[tokio::test]
async fn loading_is_observable_before_fetch_completes() {
    let (release, gate) = oneshot::channel::<()>();
    let mut stream = runner().run(move || async move {
        let _ = gate.await;
        Ok::<_, String>(Outcome::Success("done"))
    });

    assert_eq!(stream.recv().await, Some(AsyncResource::loading()));
    assert_eq!(stream.try_recv(), None);

    release.send(()).unwrap();
    assert_eq!(stream.recv().await, Some(AsyncResource::success("done")));
    assert_eq!(stream.recv().await, None);
}

#[tokio::test]
async fn runs_are_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runner = runner();

    let streams: Vec<_> = (0..3)
        .map(|_| {
            let calls = Arc::clone(&calls);
            runner.run(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(Outcome::Success(n))
            })
        })
        .collect();

    for stream in streams {
        let emitted: Vec<_> = stream.collect().await;
        assert_eq!(emitted.len(), 2);
        assert!(emitted[1].is_terminal());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn dropped_observer_does_not_cancel_fetch() {
    let (done_tx, done_rx) = oneshot::channel::<()>();
    let stream = runner().run(move || async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = done_tx.send(());
        Ok::<_, String>(Outcome::Success(()))
    });
    drop(stream);

    tokio::time::timeout(Duration::from_secs(2), done_rx)
        .await
        .expect("fetch should still complete")
        .unwrap();
}

#[tokio::test]
async fn retaining_run_keeps_previous_data_on_error() {
    let previous = vec!["kept".to_string()];
    let stream = runner().run_retaining(Some(previous.clone()), || async {
        Ok::<Outcome<Vec<String>>, String>(Outcome::Failure {
            status: 503,
            body: String::new(),
        })
    });
    let emitted: Vec<_> = stream.collect().await;

    assert_eq!(
        emitted[0],
        AsyncResource::Loading {
            data: Some(previous.clone())
        }
    );
    assert_eq!(
        emitted[1],
        AsyncResource::Error {
            message: "request failed with status 503".to_string(),
            data: Some(previous),
        }
    );
}
