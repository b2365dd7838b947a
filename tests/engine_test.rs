//! Mock engine against real positions: legality, no-move handling and
//! simulated thinking time.

mod common;

use std::time::Duration;

use chess_core::{PositionString, Rules, StandardRules};
use mock_engine::{Difficulty, EngineConfig};

#[tokio::test(start_paused = true)]
async fn test_engine_moves_are_always_legal() {
    let engine = common::seeded_engine(99);
    let mut session = common::session();

    while session.moves().len() < 60 && !session.phase().is_terminal() {
        let position = session.live_position();
        let rules = StandardRules::from_position(&position).unwrap();
        let legal: Vec<String> = rules
            .legal_moves(None)
            .iter()
            .map(|mv| rules.inspect(mv).notation)
            .collect();

        let analysis = engine
            .request_move::<StandardRules>(position, Difficulty::new(1).unwrap())
            .await
            .unwrap()
            .unwrap();

        assert!(legal.contains(&analysis.mv), "{} not legal", analysis.mv);
        session.apply_external_move(&analysis.mv).unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalemate_has_no_move() {
    let stalemate = PositionString::new("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let started = tokio::time::Instant::now();

    let result = common::seeded_engine(1)
        .request_move::<StandardRules>(stalemate, Difficulty::default())
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(started.elapsed() < Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_think_time_scales_with_difficulty() {
    let engine = common::seeded_engine(5);

    for (level, expected_ms) in [(1u8, 1_500u64), (5, 3_500)] {
        let started = tokio::time::Instant::now();
        engine
            .request_move::<StandardRules>(PositionString::initial(), Difficulty::new(level).unwrap())
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(expected_ms));
        assert!(elapsed < Duration::from_millis(expected_ms + 10));
    }
}

#[tokio::test(start_paused = true)]
async fn test_dropped_request_is_abandoned() {
    let engine = mock_engine::MockEngine::new(EngineConfig {
        base_delay_ms: 10_000,
        per_level_delay_ms: 0,
        seed: Some(3),
    });

    let request = engine.request_move::<StandardRules>(PositionString::initial(), Difficulty::default());
    let timed_out = tokio::time::timeout(Duration::from_millis(100), request).await;
    assert!(timed_out.is_err());
}
