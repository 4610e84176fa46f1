/*!
 * End-to-end tests from raw text to scheduled tokens
 */

use std::time::Duration;
use stutter::scheduler::compute_offsets;
use stutter::{PlaybackOptions, ScheduledToken, Scheduler, SchedulerState, TokenPipeline};
use tokio::sync::broadcast;

use crate::common;

async fn next_event(events: &mut broadcast::Receiver<ScheduledToken>) -> ScheduledToken {
    tokio::time::timeout(Duration::from_secs(600), events.recv())
        .await
        .expect("timed out waiting for a token")
        .expect("event channel closed")
}

/// Test that short text passes through the pipeline and plays at steady pace
#[tokio::test(start_paused = true)]
async fn test_pipeline_to_scheduler_withShortText_shouldEmitOnSchedule() {
    common::init_logging();
    let pipeline = TokenPipeline::default();
    let tokens = pipeline.build_tokens("Status message", Some("en"), 13);
    assert_eq!(common::texts(&tokens), vec!["Status", "message"]);

    let scheduler = Scheduler::new();
    let mut events = scheduler.subscribe();
    scheduler.load(tokens, PlaybackOptions::uniform(60));
    scheduler.play();

    let first = next_event(&mut events).await;
    let second = next_event(&mut events).await;
    assert_eq!((first.index, first.token.text.as_str()), (0, "Status"));
    assert_eq!((second.index, second.token.text.as_str()), (1, "message"));
    assert_eq!((first.target_time_ms, second.target_time_ms), (0, 1000));

    let mut state = scheduler.watch_state();
    state
        .wait_for(|s| *s == SchedulerState::Finished)
        .await
        .expect("state channel closed");
}

/// Test that split pieces are scheduled as separate tokens
#[tokio::test(start_paused = true)]
async fn test_pipeline_to_scheduler_withLongWord_shouldPlayEveryPiece() {
    let pipeline = TokenPipeline::default();
    let tokens = pipeline.build_tokens("characterization.", Some("en"), 5);
    assert_eq!(common::texts(&tokens), vec!["char-", "acter-", "iza-", "tion."]);
    assert!(tokens[3].is_sentence_end);
    assert!(tokens[..3].iter().all(|token| !token.is_sentence_end));

    let scheduler = Scheduler::new();
    let mut events = scheduler.subscribe();
    scheduler.load(tokens, PlaybackOptions::uniform(120));
    scheduler.play();

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(next_event(&mut events).await);
    }
    assert_eq!(
        received.iter().map(|e| e.target_time_ms).collect::<Vec<_>>(),
        vec![0, 500, 1000, 1500]
    );
    assert_eq!(received[3].token.text, "tion.");
}

/// Test that offsets are strictly increasing for a realistic paragraph
#[test]
fn test_compute_offsets_withParagraph_shouldIncrease() {
    let pipeline = TokenPipeline::default();
    let text = "The quick brown fox jumps over the lazy dog. In 1999, twenty-three \
                extraordinarily well-prepared participants arrived; nobody expected them!";
    let tokens = pipeline.build_tokens(text, Some("en"), 13);
    let offsets = compute_offsets(&tokens, &PlaybackOptions::default());

    assert_eq!(offsets.len(), tokens.len());
    assert_eq!(offsets[0], 0);
    assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));

    let numeric = tokens
        .iter()
        .find(|token| token.text.starts_with("1999"))
        .expect("number token");
    assert!(numeric.is_other_punctuation);
}

/// Test that every piece of split text fits the limit
#[test]
fn test_build_tokens_withManyLanguages_shouldRespectLimit() {
    let pipeline = TokenPipeline::default();
    let cases = [
        ("Donaudampfschifffahrtsgesellschaftskapitän erzählt", "de"),
        ("anticonstitutionnellement est un mot", "fr"),
        ("incomprehensibilities abound", "en"),
        ("Pneumonoultramicroscopicsilicovolcanoconiosis", "xx"),
    ];

    for (text, tag) in cases {
        let tokens = pipeline.build_tokens(text, Some(tag), 8);
        for token in &tokens {
            let letters = token.text.chars().filter(|c| c.is_alphanumeric()).count();
            assert!(letters <= 8, "{:?} too long for {}", token.text, tag);
        }
        let joined: String = tokens
            .iter()
            .map(|token| token.text.trim_end_matches('-'))
            .collect();
        assert_eq!(joined.replace(' ', ""), text.replace(' ', ""), "lost text for {}", tag);
    }
}

/// Test that speeding up mid-read keeps the shown word and moves on
#[tokio::test(start_paused = true)]
async fn test_update_options_whilePlaying_shouldContinueWithNextToken() {
    let pipeline = TokenPipeline::default();
    let tokens = pipeline.build_tokens("one two three four", Some("en"), 13);

    let scheduler = Scheduler::new();
    let mut events = scheduler.subscribe();
    scheduler.load(tokens, PlaybackOptions::uniform(60));
    scheduler.play();
    assert_eq!(next_event(&mut events).await.index, 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    scheduler.update_options(PlaybackOptions::uniform(120));
    let next = next_event(&mut events).await;
    assert_eq!(next.index, 1);
    assert_eq!(next.token.text, "two");
}
