use chrono::{DateTime, TimeDelta, Utc};
use commute_core::{ActivityTracker, DeadlineInputs, Health, compute_deadlines, health};
use proptest::prelude::*;

fn arb_ts() -> impl Strategy<Value = DateTime<Utc>> {
    (1_500_000_000i64..2_000_000_000i64).prop_map(|s| DateTime::from_timestamp(s, 0).unwrap())
}

fn arb_inputs() -> impl Strategy<Value = DeadlineInputs> {
    (
        proptest::option::of(arb_ts()),
        arb_ts(),
        0u32..3_600,
        0u32..3_600,
        0u32..7_200,
        0u32..900,
    )
        .prop_map(
            |(departure_estimate, departure_scheduled, before, after, trip, buffer)| DeadlineInputs {
                departure_estimate,
                departure_scheduled,
                walk_before_seconds: before,
                walk_after_seconds: after,
                trip_average_seconds: trip,
                buffer_seconds: buffer,
            },
        )
}

proptest! {
    #[test]
    fn deadlines_follow_the_formula(inputs in arb_inputs()) {
        let d = compute_deadlines(&inputs);
        let departure = inputs.departure_estimate.unwrap_or(inputs.departure_scheduled);
        prop_assert_eq!(d.departure_time, departure);
        prop_assert_eq!(
            d.get_going_by,
            departure
                - TimeDelta::seconds(i64::from(inputs.walk_before_seconds))
                - TimeDelta::seconds(i64::from(inputs.buffer_seconds))
        );
        prop_assert_eq!(
            d.arrive_by,
            departure
                + TimeDelta::seconds(i64::from(inputs.trip_average_seconds))
                + TimeDelta::seconds(i64::from(inputs.walk_after_seconds))
        );
        prop_assert!(d.get_going_by <= d.departure_time);
        prop_assert!(d.departure_time <= d.arrive_by);
    }

    #[test]
    fn health_score_counts_true_flags(run_active: bool, has_estimated: bool, route_active: bool) {
        let level = health::score(Health { run_active, has_estimated, route_active });
        let expected = u8::from(run_active) + u8::from(has_estimated) + u8::from(route_active);
        prop_assert_eq!(level.score(), expected);
    }

    #[test]
    fn tracker_never_forgets(batches in proptest::collection::vec(
        proptest::collection::vec("[a-z]{1,4}", 0..6), 1..10)
    ) {
        let mut tracker = ActivityTracker::new();
        let mut observed: Vec<String> = Vec::new();
        for batch in &batches {
            tracker.observe(1, batch.iter().map(String::as_str));
            observed.extend(batch.iter().cloned());
            for r in &observed {
                prop_assert!(tracker.was_ever_active(r));
            }
        }
    }
}
