use super::{util, ConflictReport, PlanningStats, StatsOptions};
use crate::model::Mission;
use std::collections::BTreeMap;

pub(super) fn compute_statistics(
    missions: &[&Mission],
    conflicts: &[ConflictReport],
    opts: &StatsOptions,
) -> PlanningStats {
    let total_volunteer_slots: u64 = missions.iter().map(|m| u64::from(m.max_volunteers)).sum();
    let filled_slots: u64 = missions.iter().map(|m| m.inscriptions_count() as u64).sum();

    let mut missions_by_day = BTreeMap::new();
    for mission in missions {
        match mission.start_date_in(&opts.utc_offset) {
            Some(day) => *missions_by_day.entry(day).or_insert(0) += 1,
            None => tracing::warn!(
                mission = mission.id.0,
                start = %mission.start_time,
                "unreadable start time, mission left out of daily counts"
            ),
        }
    }

    PlanningStats {
        total_missions: missions.len(),
        total_volunteer_slots,
        filled_slots,
        coverage_percentage: util::percentage(filled_slots, total_volunteer_slots),
        missions_by_day,
        conflicts_count: conflicts.len(),
    }
}
