//! Concurrency tests for the session store.
//!
//! These run on the multi-threaded runtime so updates genuinely race.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use throwdown_session::{Metadata, Role, SessionError, SessionId, SessionStatus, SessionStore};

#[derive(Debug, PartialEq)]
enum Refused {
    Store(SessionError),
    AlreadyAccepted,
}

impl From<SessionError> for Refused {
    fn from(err: SessionError) -> Self {
        Self::Store(err)
    }
}

async fn new_session(store: &SessionStore) -> SessionId {
    store
        .create("alice", "bob", Metadata::default())
        .await
        .expect("create")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_lose_no_writes() {
    let store = Arc::new(SessionStore::new());
    let id = new_session(&store).await;

    let tasks = (0..200).map(|i| {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move {
            store
                .update(&id, |s| -> Result<(), Refused> {
                    s.metadata.extra.insert(format!("k{i}"), i.to_string());
                    Ok(())
                })
                .await
        })
    });

    for result in join_all(tasks).await {
        result.expect("task panicked").expect("update failed");
    }

    let session = store.get(&id).await.unwrap();
    assert_eq!(session.metadata.extra.len(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_check_then_set_succeeds_once() {
    let store = Arc::new(SessionStore::new());
    let id = new_session(&store).await;

    let tasks = (0..32).map(|_| {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move {
            store
                .update(&id, |s| {
                    if s.status != SessionStatus::Initiated {
                        return Err(Refused::AlreadyAccepted);
                    }
                    s.status = SessionStatus::Accepted;
                    Ok(())
                })
                .await
        })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let refusals = results
        .iter()
        .filter(|r| matches!(r, Err(Refused::AlreadyAccepted)))
        .count();
    assert_eq!(wins, 1);
    assert_eq!(refusals, 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pair_completion_is_observed_exactly_once() {
    // Many sessions, both sides racing; each session must see exactly
    // one "second move" completion.
    let store = Arc::new(SessionStore::new());
    let mut ids = Vec::new();
    for _ in 0..50 {
        ids.push(new_session(&store).await);
    }

    let mut tasks = Vec::new();
    for id in &ids {
        for role in [Role::Challenger, Role::Target] {
            let store = Arc::clone(&store);
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .update(&id, |s| -> Result<bool, Refused> {
                        s.set_move(role, "rock");
                        let completed = s.moves().is_some() && s.status != SessionStatus::Resolved;
                        if completed {
                            s.status = SessionStatus::Resolved;
                        }
                        Ok(completed)
                    })
                    .await
            }));
        }
    }

    let completions = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked").expect("update failed"))
        .filter(|completed| *completed)
        .count();

    assert_eq!(completions, ids.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sweep_races_updates_without_torn_records() {
    let store = Arc::new(SessionStore::new());
    let mut ids = Vec::new();
    for _ in 0..100 {
        ids.push(new_session(&store).await);
    }

    let sweeper = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            // Zero TTL: everything created before this call is stale.
            store.for_each_expired(Duration::ZERO, |_| {}).await
        })
    };

    let updates = ids.iter().cloned().map(|id| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .update(&id, |s| -> Result<(), Refused> {
                    s.set_move(Role::Challenger, "paper");
                    Ok(())
                })
                .await
        })
    });
    let update_results = join_all(updates).await;
    let evicted = sweeper.await.expect("sweeper panicked");

    // Every update either landed before eviction or found nothing.
    for result in update_results {
        match result.expect("task panicked") {
            Ok(()) | Err(Refused::Store(SessionError::NotFound(_))) => {}
            other => panic!("unexpected result {other:?}"),
        }
    }
    assert_eq!(store.len().await + evicted, ids.len());
    for id in &ids {
        if let Some(session) = store.get(id).await {
            assert_eq!(session.challenger_move.as_deref(), Some("paper"));
        }
    }
}
