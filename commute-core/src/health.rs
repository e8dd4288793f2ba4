use commute_types::{Health, HealthLevel};

/// Map health signals to a reliability level: one step per true flag.
#[must_use]
pub const fn score(health: Health) -> HealthLevel {
    let count = health.run_active as u8 + health.has_estimated as u8 + health.route_active as u8;
    HealthLevel::from_score(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(run_active: bool, has_estimated: bool, route_active: bool) -> Health {
        Health {
            run_active,
            has_estimated,
            route_active,
        }
    }

    #[test]
    fn extremes() {
        assert_eq!(score(h(true, true, true)), HealthLevel::Confirmed);
        assert_eq!(score(h(false, false, false)), HealthLevel::Unverified);
    }

    #[test]
    fn any_single_flag_is_weak() {
        for health in [h(true, false, false), h(false, true, false), h(false, false, true)] {
            assert_eq!(score(health), HealthLevel::Weak);
        }
    }
}
