use proptest::prelude::*;

use fandag::engine::PriorityQueue;
use fandag::exec::from_fn;
use fandag::graph::{Activity, TaskGraph};

proptest! {
    /// Whatever the push order, pops come out by non-increasing priority and
    /// equal priorities keep their push order.
    #[test]
    fn pops_are_ordered_by_priority_then_push_order(
        priorities in proptest::collection::vec(0u32..6, 0..64)
    ) {
        // Entries only need a task id; the action is never called.
        let mut b = TaskGraph::<usize>::builder();
        let t = b.add_task("t", from_fn(|x: usize| async move { Ok(x) }));

        let queue = PriorityQueue::new();
        for (i, &priority) in priorities.iter().enumerate() {
            queue.push(Activity::new(priority, t, i));
        }
        prop_assert_eq!(queue.outstanding(), priorities.len());

        let popped: Vec<(u32, usize)> = std::iter::from_fn(|| queue.pop())
            .map(|a| (a.priority, a.payload))
            .collect();
        prop_assert_eq!(popped.len(), priorities.len());

        for pair in popped.windows(2) {
            let (p0, i0) = pair[0];
            let (p1, i1) = pair[1];
            prop_assert!(p0 >= p1, "priority went up: {:?}", pair);
            if p0 == p1 {
                prop_assert!(i0 < i1, "tie broken out of push order: {:?}", pair);
            }
        }
    }
}

