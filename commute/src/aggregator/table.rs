use std::collections::BTreeMap;

use commute_core::{DirectionId, RouteId, Service, ServiceId, StopId};

/// Shared table of derived services keyed by slot.
///
/// The only mutation is [`ServiceTable::replace_range`], which swaps a
/// connection's whole slot range at once.
#[derive(Debug, Default)]
pub struct ServiceTable {
    services: BTreeMap<ServiceId, Service>,
}

impl ServiceTable {
    /// Replace every slot of `route/direction/stop` with `fresh`.
    ///
    /// Slots of the range that are not present in `fresh` are removed; slots of
    /// other ranges are untouched. Services of `fresh` outside the range are ignored.
    pub fn replace_range(
        &mut self,
        route_id: RouteId,
        direction_id: DirectionId,
        stop_id: StopId,
        fresh: Vec<Service>,
    ) {
        let lo = ServiceId::new(route_id, direction_id, stop_id, 0);
        let hi = ServiceId::new(route_id, direction_id, stop_id, usize::MAX);
        let stale: Vec<ServiceId> = self.services.range(lo..=hi).map(|(k, _)| *k).collect();
        for k in stale {
            self.services.remove(&k);
        }
        for s in fresh {
            if s.id.same_range(&lo) {
                self.services.insert(s.id, s);
            }
        }
    }

    /// Copy of every service, in key order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Service> {
        self.services.values().cloned().collect()
    }

    /// Number of services held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }
}
