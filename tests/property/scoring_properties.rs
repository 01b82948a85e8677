use hotscore::domain::{EmailMessage, LastAction};
use hotscore::services::{Analyzer, CombineRule, Evaluator, RelationScorer};
use proptest::prelude::*;

const SENDERS: [&str; 4] = ["a@x.com", "Bee <b@x.com>", "c@y.org", "not an address"];

fn message() -> impl Strategy<Value = EmailMessage> {
    (
        0..SENDERS.len(),
        0..SENDERS.len(),
        any::<bool>(),
        prop_oneof![
            Just(LastAction::None),
            Just(LastAction::Replied),
            Just(LastAction::Forwarded),
            Just(LastAction::Other),
        ],
    )
        .prop_map(|(from, to, is_read, action)| {
            EmailMessage::new(SENDERS[from])
                .to(SENDERS[to])
                .cc(SENDERS[(from + to) % SENDERS.len()])
                .read(is_read)
                .action(action)
        })
}

proptest! {
    #[test]
    fn product_dominates_max_dominates_linear(p in 0.0f64..=1.0, q in 0.0f64..=1.0) {
        let product = CombineRule::Product.apply(p, q);
        let max = CombineRule::Max.apply(p, q);
        let linear = CombineRule::Linear.apply(p, q);

        prop_assert!(product >= max, "product {} < max {}", product, max);
        prop_assert!(max >= linear, "max {} < linear {}", max, linear);
        prop_assert!(linear >= p.min(q), "linear {} < min", linear);
        prop_assert!(product <= 1.0);
    }

    #[test]
    fn rules_are_commutative(p in 0.0f64..=1.0, q in 0.0f64..=1.0) {
        for rule in [CombineRule::Linear, CombineRule::Product, CombineRule::Max] {
            prop_assert_eq!(rule.apply(p, q), rule.apply(q, p));
        }
    }

    #[test]
    fn relation_scores_stay_in_bounds(
        training in prop::collection::vec(message(), 0..40),
        probe in prop::collection::vec(message(), 1..10),
    ) {
        let mut scorer = RelationScorer::new();
        scorer.analyze(&training);

        for (_, record) in scorer.address_book().iter() {
            for stats in [record.from, record.to, record.cc] {
                prop_assert!(stats.read + stats.replied <= stats.received);
            }
        }

        let scores = scorer.classify(&probe).unwrap();
        prop_assert_eq!(scores.len(), probe.len());
        prop_assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn parallel_training_is_partition_independent(
        training in prop::collection::vec(message(), 0..40),
        partitions in 1usize..6,
    ) {
        let mut sequential = RelationScorer::new();
        sequential.analyze(&training);
        let mut parallel = RelationScorer::new();
        parallel.analyze_parallel(&training, partitions);

        prop_assert_eq!(sequential.address_book().len(), parallel.address_book().len());
        for (addr, record) in sequential.address_book().iter() {
            prop_assert_eq!(parallel.address_book().lookup(addr), Some(record));
        }
    }

    #[test]
    fn evaluator_partitions_messages(
        labelled in prop::collection::vec((any::<bool>(), 0.0f64..=1.0), 0..50),
        threshold in 0.0f64..=1.0,
    ) {
        let messages: Vec<EmailMessage> = labelled
            .iter()
            .map(|&(is_read, _)| EmailMessage::new("a@x.com").read(is_read))
            .collect();
        let scores: Vec<f64> = labelled.iter().map(|&(_, s)| s).collect();

        let report = Evaluator::new(threshold).evaluate(&messages, &scores).unwrap();

        prop_assert_eq!(report.hot + report.not_hot, report.total);
        prop_assert_eq!(report.read + report.unread, report.total);
        prop_assert!(report.misses <= report.not_hot);
        prop_assert!(report.false_alarms <= report.hot);
        prop_assert_eq!(report.miss_indices.len(), report.misses);
        prop_assert_eq!(report.false_alarm_indices.len(), report.false_alarms);
        prop_assert!((0.0..=1.0).contains(&report.error_rate));
    }
}
