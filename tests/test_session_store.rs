//! Unit tests for the session chain store

use task_agents::SessionChainStore;
use task_agents::types::SessionId;

const AGENT: &str = "Code Reviewer";

#[tokio::test]
async fn no_chain_means_no_resume() {
    let store = SessionChainStore::new(None);
    assert!(store.get_resume_session(AGENT, 5).await.is_none());
}

#[tokio::test]
async fn fresh_chain_starts_at_one_exchange() {
    let store = SessionChainStore::new(None);
    store
        .update_chain(AGENT, SessionId::from("s1"), false)
        .await;

    let info = store.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.current_session, SessionId::from("s1"));
    assert_eq!(info.exchange_count, 1);
    assert_eq!(info.previous_count, 0);
}

#[tokio::test]
async fn resumes_increment_and_archive() {
    let store = SessionChainStore::new(None);
    store
        .update_chain(AGENT, SessionId::from("s1"), false)
        .await;
    store.update_chain(AGENT, SessionId::from("s2"), true).await;
    store.update_chain(AGENT, SessionId::from("s3"), true).await;

    let info = store.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.current_session, SessionId::from("s3"));
    assert_eq!(info.exchange_count, 3);
    assert_eq!(info.previous_count, 2);
}

#[tokio::test]
async fn chain_is_evicted_at_the_exchange_bound() {
    let max = 3u32;
    let store = SessionChainStore::new(None);

    // First execution starts fresh
    assert!(store.get_resume_session(AGENT, max).await.is_none());
    store
        .update_chain(AGENT, SessionId::from("s1"), false)
        .await;

    // Exchanges 2..=max resume
    for n in 2..=max {
        let resume = store.get_resume_session(AGENT, max).await;
        assert!(resume.is_some(), "exchange {n} should resume");
        store
            .update_chain(AGENT, SessionId::from(format!("s{n}")), true)
            .await;
    }

    // The chain has reached the bound: next lookup evicts it
    assert!(store.get_resume_session(AGENT, max).await.is_none());
    assert!(store.get_chain_info(AGENT).await.is_none());

    // And the execution after that starts a fresh chain at count 1
    store
        .update_chain(AGENT, SessionId::from("s-fresh"), false)
        .await;
    let info = store.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.exchange_count, 1);
    assert_eq!(info.previous_count, 0);
}

#[tokio::test]
async fn archived_sessions_are_capped() {
    let store = SessionChainStore::new(None);
    store
        .update_chain(AGENT, SessionId::from("s0"), false)
        .await;
    for n in 1..=60 {
        store
            .update_chain(AGENT, SessionId::from(format!("s{n}")), true)
            .await;
    }

    let info = store.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.exchange_count, 61);
    assert_eq!(info.previous_count, 50);
}

#[tokio::test]
async fn resume_flag_without_existing_chain_creates_fresh() {
    let store = SessionChainStore::new(None);
    // was_resume=true but nothing to resume: behaves like a fresh start
    store.update_chain(AGENT, SessionId::from("s1"), true).await;
    let info = store.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.exchange_count, 1);
}

#[tokio::test]
async fn clear_chain_forgets_the_agent() {
    let store = SessionChainStore::new(None);
    store
        .update_chain(AGENT, SessionId::from("s1"), false)
        .await;
    store.clear_chain(AGENT).await;

    assert!(store.get_resume_session(AGENT, 5).await.is_none());
    assert!(store.get_chain_info(AGENT).await.is_none());
}

#[tokio::test]
async fn chains_are_independent_per_agent() {
    let store = SessionChainStore::new(None);
    store
        .update_chain("Agent A", SessionId::from("a1"), false)
        .await;
    store
        .update_chain("Agent B", SessionId::from("b1"), false)
        .await;
    store
        .update_chain("Agent A", SessionId::from("a2"), true)
        .await;

    assert_eq!(
        store.get_chain_info("Agent A").await.unwrap().exchange_count,
        2
    );
    assert_eq!(
        store.get_chain_info("Agent B").await.unwrap().exchange_count,
        1
    );
}

#[tokio::test]
async fn snapshot_round_trips_through_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("sessions.json");

    {
        let store = SessionChainStore::new(Some(path.clone()));
        store
            .update_chain(AGENT, SessionId::from("s1"), false)
            .await;
        store.update_chain(AGENT, SessionId::from("s2"), true).await;
        store
            .update_chain("Writer", SessionId::from("w1"), false)
            .await;
    }

    let reloaded = SessionChainStore::new(Some(path));
    let info = reloaded.get_chain_info(AGENT).await.unwrap();
    assert_eq!(info.current_session, SessionId::from("s2"));
    assert_eq!(info.exchange_count, 2);
    assert_eq!(info.previous_count, 1);

    let writer = reloaded.get_chain_info("Writer").await.unwrap();
    assert_eq!(writer.current_session, SessionId::from("w1"));
    assert_eq!(writer.exchange_count, 1);
}

#[tokio::test]
async fn malformed_snapshot_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let store = SessionChainStore::new(Some(path));
    assert!(store.get_chain_info(AGENT).await.is_none());

    // And the store still accepts new chains afterwards
    store
        .update_chain(AGENT, SessionId::from("s1"), false)
        .await;
    assert_eq!(store.get_chain_info(AGENT).await.unwrap().exchange_count, 1);
}
