mod common;

use chrono::{Duration, Utc};
use common::{harness, seq};
use glyphic_core::UsageLog;
use glyphic_learn::UtteranceContext;

#[test]
fn test_stats_cover_logged_events() {
    let h = harness();
    assert!(h.analytics.log(
        "u1",
        &seq(&["want:actions", "juice:drinks"]),
        &UtteranceContext::default()
    ));
    assert!(h.analytics.log(
        "u1",
        &seq(&["more:descriptors", "cookie:food", "please"]),
        &UtteranceContext::default()
    ));

    let stats = h.analytics.get_usage_stats("u1", 3650);
    assert!(stats.total_symbols_used >= 5);
    assert_eq!(stats.total_utterances, 2);
    assert_eq!(stats.average_utterance_length, 2.5);
    assert_eq!(h.log.len(), 5);
}

#[test]
fn test_sequence_logged_once_is_frequent() {
    let h = harness();
    let now = Utc::now();
    let context = UtteranceContext {
        session_id: Some("s1".to_string()),
        timestamp: Some(now - Duration::minutes(2)),
        ..Default::default()
    };
    h.analytics
        .log("u1", &seq(&["want", "juice"]), &context);

    let sequences = h.analytics.get_frequent_sequences("u1", 1, 10);
    assert_eq!(sequences.len(), 1);
    assert_eq!(sequences[0].labels, vec!["want", "juice"]);
    assert_eq!(sequences[0].count, 1);
}

#[test]
fn test_empty_sequence_is_not_logged() {
    let h = harness();
    assert!(!h.analytics.log("u1", &[], &UtteranceContext::default()));
    assert!(h.log.events_since(None).unwrap().is_empty());
}
