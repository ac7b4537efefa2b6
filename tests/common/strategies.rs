use proptest::prelude::*;

/// Strategy for batch limits, including the clamped zero limit
pub fn limit_strategy() -> impl Strategy<Value = usize> {
    0usize..=8
}

/// Strategy for the number of submitted tasks
pub fn task_count_strategy() -> impl Strategy<Value = usize> {
    0usize..=40
}

/// Strategy for a per-task failure pattern
pub fn failure_pattern_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.3), 0..=30)
}

/// Expected batch sizes for `count` tasks grouped by `limit`
pub fn expected_batch_sizes(count: usize, limit: usize) -> Vec<usize> {
    let limit = limit.max(1);
    let mut sizes = vec![limit; count / limit];
    if count % limit != 0 {
        sizes.push(count % limit);
    }
    sizes
}
