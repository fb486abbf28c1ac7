//! Races between concurrent reveals of the same paste.

use std::sync::Arc;

use sealbin::store::{MemoryStore, SqliteStore, Store};
use sealbin::{DenyReason, EngineConfig, PasteEngine, PasteOptions, RevealOutcome};

async fn race_two_reveals<S: Store + 'static>(engine: PasteEngine<S>) {
    let engine = Arc::new(engine);
    let created = engine
        .create_paste(
            "single shot",
            PasteOptions {
                burn_after_reading: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let token = created.tokens.read.encode();

    let a = tokio::spawn({
        let engine = Arc::clone(&engine);
        let token = token.clone();
        async move { engine.reveal(&token, None).await.unwrap() }
    });
    let b = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.reveal(&token, None).await.unwrap() }
    });

    let outcomes = [a.await.unwrap(), b.await.unwrap()];
    let delivered = outcomes
        .iter()
        .filter(|o| matches!(o, RevealOutcome::Delivered { .. }))
        .count();
    let consumed = outcomes
        .iter()
        .filter(|o| matches!(o, RevealOutcome::Denied(DenyReason::AlreadyConsumed)))
        .count();
    assert_eq!(delivered, 1, "exactly one racer may receive content");
    assert_eq!(consumed, 1, "the loser must see a consumed denial");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burn_reveals_on_memory() {
    race_two_reveals(PasteEngine::new(MemoryStore::new(), EngineConfig::default())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burn_reveals_on_sqlite() {
    let store = SqliteStore::open_memory().unwrap();
    race_two_reveals(PasteEngine::new(store, EngineConfig::default())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_racers_single_delivery() {
    let engine = Arc::new(PasteEngine::new(MemoryStore::new(), EngineConfig::default()));
    let created = engine
        .create_paste(
            "thundering herd",
            PasteOptions {
                burn_after_reading: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let token = created.tokens.read.encode();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        let token = token.clone();
        handles.push(tokio::spawn(
            async move { engine.reveal(&token, None).await.unwrap() },
        ));
    }

    let mut delivered = 0;
    let mut consumed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            RevealOutcome::Delivered { .. } => delivered += 1,
            RevealOutcome::Denied(DenyReason::AlreadyConsumed) => consumed += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(delivered, 1);
    assert_eq!(consumed, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_plain_reveals_all_delivered() {
    let engine = Arc::new(PasteEngine::new(MemoryStore::new(), EngineConfig::default()));
    let created = engine
        .create_paste("shared", PasteOptions::default())
        .await
        .unwrap();
    let token = created.tokens.read.encode();

    let a = tokio::spawn({
        let engine = Arc::clone(&engine);
        let token = token.clone();
        async move { engine.reveal(&token, None).await.unwrap() }
    });
    let b = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.reveal(&token, None).await.unwrap() }
    });

    for outcome in [a.await.unwrap(), b.await.unwrap()] {
        assert!(matches!(outcome, RevealOutcome::Delivered { .. }));
    }

    let stored = engine.store().get(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 2);
}
