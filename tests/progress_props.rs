use narrative_engine::quest::ObjectiveProgress;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Add(u32),
    Reconcile(u32),
    Seconds(f64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u32..20).prop_map(Step::Add),
        (0u32..40).prop_map(Step::Reconcile),
        (0.0f64..5.0).prop_map(Step::Seconds),
    ]
}

proptest! {
    #[test]
    fn progress_never_drops_or_overshoots(target in 1u32..30, steps in prop::collection::vec(step(), 0..40)) {
        let mut progress = ObjectiveProgress::new("objective", target);
        let mut completions = 0;

        for step in steps {
            let before = progress.current;
            let newly = match step {
                Step::Add(n) => progress.add_progress(n),
                Step::Reconcile(n) => progress.reconcile(n),
                Step::Seconds(s) => progress.add_seconds(s),
            };
            if newly {
                completions += 1;
            }
            prop_assert!(progress.current >= before);
            prop_assert!(progress.current <= target);
            prop_assert_eq!(progress.completed, progress.current == target);
        }

        prop_assert!(completions <= 1);
    }
}
