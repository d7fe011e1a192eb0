// Integration tests for Pairlink: full engine scenarios, including the
// concurrency guarantees of the matching transition.

use std::sync::Arc;

use pairlink::core::{Engine, EngineError, MatchOutcome, StopOutcome};
use pairlink::models::{ChatEvent, Gender, OutboundEvent, Preference, Profile, UserId};
use pairlink::services::delivery;
use tokio::sync::mpsc::UnboundedReceiver;

fn create_engine() -> (Arc<Engine>, UnboundedReceiver<OutboundEvent>) {
    let (tx, rx) = delivery::channel();
    (Arc::new(Engine::new(tx)), rx)
}

fn profile(gender: Gender, preference: Preference) -> Profile {
    Profile { gender, age: 26, preference }
}

fn drain(rx: &mut UnboundedReceiver<OutboundEvent>) -> Vec<(UserId, ChatEvent)> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push((ev.to, ev.event));
    }
    out
}

/// No user may be waiting and paired at the same time, and every pairing
/// must be symmetric.
async fn assert_consistent(engine: &Engine, users: &[&str]) {
    for &u in users {
        if let Some(partner) = engine.partner_of(u).await {
            assert_eq!(
                engine.partner_of(&partner).await,
                Some(u.to_string()),
                "registry not symmetric for {} <-> {}",
                u,
                partner
            );
            assert!(
                !engine.is_waiting(u).await,
                "{} is both paired and waiting",
                u
            );
        }
    }
}

#[tokio::test]
async fn test_register_then_get_profile_round_trip() {
    let (engine, _rx) = create_engine();
    let p = profile(Gender::Female, Preference::Male);
    engine.register("u1", p);
    assert_eq!(engine.get_profile("u1"), Some(p));

    // Re-registration overwrites wholesale
    let updated = profile(Gender::Female, Preference::Anyone);
    engine.register("u1", updated);
    assert_eq!(engine.get_profile("u1"), Some(updated));
}

#[tokio::test]
async fn test_scenario_female_anyone_meets_male_wanting_female() {
    let (engine, mut rx) = create_engine();
    engine.register("a", profile(Gender::Female, Preference::Anyone));
    engine.register("b", profile(Gender::Male, Preference::Female));

    // B finds nobody and waits
    assert_eq!(engine.request_match("b").await, Ok(MatchOutcome::Waiting));

    // A finds B: B's preference matches A's gender, A takes anyone
    assert_eq!(
        engine.request_match("a").await,
        Ok(MatchOutcome::Matched { partner: "b".to_string() })
    );

    assert_eq!(engine.waiting_count().await, 0);
    assert_eq!(engine.partner_of("a").await, Some("b".to_string()));
    assert_eq!(engine.partner_of("b").await, Some("a".to_string()));

    let events = drain(&mut rx);
    assert!(events.contains(&("a".to_string(), ChatEvent::Matched)));
    assert!(events.contains(&("b".to_string(), ChatEvent::Matched)));
}

#[tokio::test]
async fn test_scenario_message_reaches_partner_exactly_once() {
    let (engine, mut rx) = create_engine();
    engine.register("a", profile(Gender::Female, Preference::Anyone));
    engine.register("b", profile(Gender::Male, Preference::Anyone));
    engine.request_match("a").await.unwrap();
    engine.request_match("b").await.unwrap();
    drain(&mut rx);

    assert!(engine.message("a", "hi").await);

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![("b".to_string(), ChatEvent::Text { body: "hi".to_string() })]
    );
}

#[tokio::test]
async fn test_scenario_next_never_retains_stale_pairing() {
    let (engine, mut rx) = create_engine();
    engine.register("a", profile(Gender::Female, Preference::Anyone));
    engine.register("b", profile(Gender::Male, Preference::Anyone));
    engine.request_match("a").await.unwrap();
    engine.request_match("b").await.unwrap();
    drain(&mut rx);

    let outcome = engine.next("a").await.unwrap();

    // B was notified and unpaired; A holds no stale pairing with B
    assert_eq!(engine.partner_of("b").await, None);
    assert_ne!(engine.partner_of("a").await, Some("b".to_string()));

    // With nobody else around, A transiently waits
    assert_eq!(outcome, MatchOutcome::Waiting);
    assert!(engine.is_waiting("a").await);

    let events = drain(&mut rx);
    assert!(events.contains(&("b".to_string(), ChatEvent::PartnerLeft)));
    assert_consistent(&engine, &["a", "b"]).await;
}

#[tokio::test]
async fn test_scenario_unregistered_user_changes_nothing() {
    let (engine, mut rx) = create_engine();
    engine.register("a", profile(Gender::Female, Preference::Anyone));
    engine.request_match("a").await.unwrap();
    drain(&mut rx);

    let result = engine.request_match("c").await;
    assert_eq!(result, Err(EngineError::NotRegistered("c".to_string())));

    assert_eq!(engine.waiting_count().await, 1);
    assert_eq!(engine.session_count().await, 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_stop_twice_produces_no_second_partner_notification() {
    let (engine, mut rx) = create_engine();
    engine.register("a", profile(Gender::Female, Preference::Anyone));
    engine.register("b", profile(Gender::Male, Preference::Anyone));
    engine.request_match("a").await.unwrap();
    engine.request_match("b").await.unwrap();
    drain(&mut rx);

    assert_eq!(
        engine.stop("a").await,
        StopOutcome::LeftSession { partner: "b".to_string() }
    );
    drain(&mut rx);

    assert_eq!(engine.stop("a").await, StopOutcome::Idle);
    let events = drain(&mut rx);
    assert!(events.iter().all(|(to, _)| to != "b"), "partner notified twice");
}

#[tokio::test]
async fn test_concurrent_requests_from_two_compatible_users_pair_exactly_once() {
    // Run the race many times; a lost update would show up as two waiters
    // or an asymmetric registry.
    for _ in 0..50 {
        let (engine, _rx) = create_engine();
        engine.register("u", profile(Gender::Female, Preference::Anyone));
        engine.register("v", profile(Gender::Male, Preference::Anyone));

        let e1 = engine.clone();
        let e2 = engine.clone();
        let t1 = tokio::spawn(async move { e1.request_match("u").await });
        let t2 = tokio::spawn(async move { e2.request_match("v").await });
        t1.await.unwrap().unwrap();
        t2.await.unwrap().unwrap();

        assert_eq!(engine.session_count().await, 1, "expected exactly one pairing");
        assert_eq!(engine.waiting_count().await, 0, "nobody may be left waiting");
        assert_eq!(engine.partner_of("u").await, Some("v".to_string()));
        assert_eq!(engine.partner_of("v").await, Some("u".to_string()));
    }
}

#[tokio::test]
async fn test_concurrent_match_storm_pairs_everyone_consistently() {
    let (engine, _rx) = create_engine();
    let users: Vec<String> = (0..10).map(|i| format!("user{}", i)).collect();
    for u in &users {
        engine.register(u, profile(Gender::Other, Preference::Anyone));
    }

    let mut tasks = Vec::new();
    for u in users.clone() {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move { engine.request_match(&u).await }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    // 10 mutually compatible users: five sessions, empty pool
    assert_eq!(engine.session_count().await, 5);
    assert_eq!(engine.waiting_count().await, 0);

    let refs: Vec<&str> = users.iter().map(|s| s.as_str()).collect();
    assert_consistent(&engine, &refs).await;
}

#[tokio::test]
async fn test_concurrent_next_storm_keeps_state_consistent() {
    let (engine, _rx) = create_engine();
    let users: Vec<String> = (0..6).map(|i| format!("user{}", i)).collect();
    for u in &users {
        engine.register(u, profile(Gender::Other, Preference::Anyone));
        engine.request_match(u).await.unwrap();
    }
    assert_eq!(engine.session_count().await, 3);

    // Everyone skips to a new partner at once
    let mut tasks = Vec::new();
    for u in users.clone() {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move { engine.next(&u).await }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    let refs: Vec<&str> = users.iter().map(|s| s.as_str()).collect();
    assert_consistent(&engine, &refs).await;

    // Every user is accounted for: either paired or waiting, never both
    let mut paired = 0;
    let mut waiting = 0;
    for u in &users {
        if engine.partner_of(u).await.is_some() {
            paired += 1;
        } else {
            assert!(engine.is_waiting(u).await, "{} fell out of both structures", u);
            waiting += 1;
        }
    }
    assert_eq!(paired + waiting, users.len());
    assert_eq!(paired % 2, 0);
}

#[tokio::test]
async fn test_relay_runs_while_other_sessions_churn() {
    let (engine, mut rx) = create_engine();
    for (id, g) in [("a", Gender::Female), ("b", Gender::Male), ("c", Gender::Other), ("d", Gender::Other)] {
        engine.register(id, profile(g, Preference::Anyone));
    }
    engine.request_match("a").await.unwrap();
    engine.request_match("b").await.unwrap();
    engine.request_match("c").await.unwrap();
    engine.request_match("d").await.unwrap();
    drain(&mut rx);

    // c/d tear down and rematch while a/b exchange messages
    let churn_engine = engine.clone();
    let churn = tokio::spawn(async move {
        for _ in 0..20 {
            churn_engine.next("c").await.unwrap();
            churn_engine.next("d").await.unwrap();
        }
    });

    for i in 0..20 {
        assert!(engine.message("a", &format!("ping {}", i)).await);
    }
    churn.await.unwrap();

    // a/b stayed paired through all of it; every ping was relayed to b, in order
    assert_eq!(engine.partner_of("a").await, Some("b".to_string()));
    let texts: Vec<ChatEvent> = drain(&mut rx)
        .into_iter()
        .filter(|(to, ev)| to == "b" && matches!(ev, ChatEvent::Text { .. }))
        .map(|(_, ev)| ev)
        .collect();
    assert_eq!(texts.len(), 20);
    assert_eq!(texts[0], ChatEvent::Text { body: "ping 0".to_string() });
    assert_eq!(texts[19], ChatEvent::Text { body: "ping 19".to_string() });
}
