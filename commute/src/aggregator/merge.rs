use commute_core::{
    ActivityTracker, Connection, DeadlineInputs, DepartureBatch, Direction, DirectionId, Health,
    Run, Service, ServiceId, compute_deadlines,
};

/// Run identifiers travelling in `direction_id` that report a live vehicle position.
pub fn active_runs(runs: &[Run], direction_id: DirectionId) -> Vec<&str> {
    runs.iter()
        .filter(|r| r.direction_id == Some(direction_id) && r.has_vehicle_position)
        .filter_map(|r| r.run_ref.as_deref())
        .collect()
}

/// Everything needed to turn one departure batch into services.
pub struct MergeInputs<'a> {
    pub connection: &'a Connection,
    pub direction: &'a Direction,
    pub batch: &'a DepartureBatch,
    /// At least one run of this direction reported a live position this poll.
    pub route_active: bool,
    pub buffer_seconds: u32,
    pub max_results: usize,
}

/// Build the services of one connection's slot range.
///
/// Slot `i` is the departure's index in the bounded window; departures without
/// a usable scheduled time leave their slot empty. `tracker` must already hold
/// this poll's active runs.
pub fn build_services(inputs: &MergeInputs<'_>, tracker: &ActivityTracker) -> Vec<Service> {
    let MergeInputs {
        connection,
        direction,
        batch,
        route_active,
        buffer_seconds,
        max_results,
    } = *inputs;

    let disruptions = batch.disruption_titles();
    let walk_before = connection.walk_to(direction.origin_stop_id);
    let walk_after = connection.walk_to(direction.destination_stop_id);

    batch
        .departures
        .iter()
        .take(max_results)
        .enumerate()
        .filter_map(|(slot, dep)| {
            let scheduled = dep.scheduled?;
            let deadlines = compute_deadlines(&DeadlineInputs {
                departure_estimate: dep.estimated,
                departure_scheduled: scheduled,
                walk_before_seconds: walk_before,
                walk_after_seconds: walk_after,
                trip_average_seconds: connection.duration.avg,
                buffer_seconds,
            });
            let health = Health {
                run_active: dep
                    .run_ref
                    .as_deref()
                    .is_some_and(|r| tracker.was_ever_active(r)),
                has_estimated: dep.estimated.is_some(),
                route_active,
            };
            Some(Service {
                id: ServiceId::new(
                    connection.id,
                    direction.direction_id,
                    direction.origin_stop_id,
                    slot,
                ),
                run_ref: dep.run_ref.clone(),
                route_id: connection.id,
                health,
                scheduled_departure: scheduled,
                departure_time: deadlines.departure_time,
                get_going_by: deadlines.get_going_by,
                arrive_by: deadlines.arrive_by,
                disruptions: disruptions.clone(),
            })
        })
        .collect()
}
