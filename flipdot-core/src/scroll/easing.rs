//! Inverse-distance easing
//!
//! Far from the destination the scroller steps quickly; close to it each
//! step takes longer, bounded by the configured maximum. Consecutive
//! same-direction instructions count as one continuous move, so a burst of
//! presses accelerates instead of stuttering at every page boundary.

use heapless::Deque;

use super::instruction::ScrollInstruction;
use crate::config::{AnimationConfig, MAX_QUEUED_INSTRUCTIONS};

/// Delay before the next step with `remaining` pixels left to travel
pub fn step_delay(config: &AnimationConfig, remaining: u32) -> u32 {
    let remaining = remaining.max(1);
    (config.k_ms / remaining)
        .max(config.min_step_ms)
        .min(config.max_step_ms)
}

/// Pixels left in the run of same-direction instructions at the queue head
///
/// `progress` is the distance already covered by the head instruction. The
/// result is floored at 1.
pub fn remaining_distance(
    queue: &Deque<ScrollInstruction, MAX_QUEUED_INSTRUCTIONS>,
    progress: u32,
) -> u32 {
    let Some(head) = queue.front() else {
        return 1;
    };
    let run: u32 = queue
        .iter()
        .take_while(|i| i.direction == head.direction)
        .map(|i| i.distance as u32)
        .sum();
    run.saturating_sub(progress).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::Direction;
    use crate::source::SourceId;

    fn queue(steps: &[(u8, Direction)]) -> Deque<ScrollInstruction, MAX_QUEUED_INSTRUCTIONS> {
        let mut q = Deque::new();
        for &(distance, direction) in steps {
            q.push_back(ScrollInstruction::new(SourceId::BLANK, distance, direction))
                .unwrap();
        }
        q
    }

    #[test]
    fn test_delay_curve() {
        let config = AnimationConfig::default();
        assert_eq!(step_delay(&config, 1), 100);
        assert_eq!(step_delay(&config, 4), 25);
        // Clamped at the fast end
        assert_eq!(step_delay(&config, 50), 10);
        // Zero treated as one
        assert_eq!(step_delay(&config, 0), 100);
    }

    #[test]
    fn test_delay_clamped_to_max() {
        let config = AnimationConfig {
            k_ms: 1000,
            ..AnimationConfig::default()
        };
        assert_eq!(step_delay(&config, 1), 200);
        assert_eq!(step_delay(&config, 10), 100);
    }

    #[test]
    fn test_delay_monotonic() {
        let config = AnimationConfig::default();
        let mut last = u32::MAX;
        for remaining in 1..64 {
            let d = step_delay(&config, remaining);
            assert!(d <= last);
            assert!(d >= config.min_step_ms && d <= config.max_step_ms);
            last = d;
        }
    }

    #[test]
    fn test_same_direction_run() {
        use Direction::*;
        let q = queue(&[(7, Forward), (7, Forward), (7, Backward), (7, Forward)]);
        assert_eq!(remaining_distance(&q, 0), 14);
        assert_eq!(remaining_distance(&q, 3), 11);
    }

    #[test]
    fn test_reversal_restarts_easing() {
        use Direction::*;
        let q = queue(&[(7, Backward), (7, Forward)]);
        assert_eq!(remaining_distance(&q, 6), 1);
        assert_eq!(remaining_distance(&q, 7), 1);
        assert_eq!(remaining_distance(&Deque::new(), 0), 1);
    }
}
