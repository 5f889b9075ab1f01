use super::{conflicts, FilterOptions, StatusFilter};
use crate::model::{Mission, MissionId, RosterUser};
use std::collections::HashSet;

fn matches_location(mission: &Mission, wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return true;
    }
    mission
        .location
        .as_deref()
        .is_some_and(|loc| loc.to_lowercase().contains(&wanted))
}

/// Prédicats indépendants du reste du jeu de missions.
fn matches(mission: &Mission, opts: &FilterOptions) -> bool {
    if let Some(from) = opts.start_date {
        if !mission.start_time.get().is_some_and(|start| start >= from) {
            return false;
        }
    }
    if let Some(to) = opts.end_date {
        if !mission.end_time.get().is_some_and(|end| end <= to) {
            return false;
        }
    }
    if let Some(volunteer) = &opts.volunteer_id {
        if !mission.has_volunteer(volunteer) {
            return false;
        }
    }
    if let Some(manager) = &opts.manager_id {
        if mission.manager_id.as_ref() != Some(manager) {
            return false;
        }
    }
    if let Some(location) = &opts.location {
        if !matches_location(mission, location) {
            return false;
        }
    }
    match opts.status {
        StatusFilter::Full => mission.is_full(),
        StatusFilter::Available => !mission.is_full(),
        StatusFilter::All | StatusFilter::Conflicts => true,
    }
}

pub(super) fn filter_missions<'a>(
    missions: &'a [Mission],
    opts: &FilterOptions,
    roster: &[RosterUser],
) -> Vec<&'a Mission> {
    let mut out: Vec<&Mission> = missions.iter().filter(|m| matches(m, opts)).collect();

    if opts.status == StatusFilter::Conflicts {
        let involved: HashSet<MissionId> = conflicts::detect_conflicts(&out, roster)
            .iter()
            .flat_map(|report| &report.conflicts)
            .flat_map(|detail| [detail.mission_a.id, detail.mission_b.id])
            .collect();
        out.retain(|m| involved.contains(&m.id));
    }

    tracing::debug!(total = missions.len(), kept = out.len(), "missions filtered");
    out
}
