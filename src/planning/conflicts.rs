use super::{util, ConflictDetail, ConflictReport};
use crate::model::{Mission, RosterUser, UserId};
use std::collections::HashMap;

/// Index bénévole -> missions, dans l'ordre de première rencontre.
fn missions_by_volunteer<'a>(missions: &[&'a Mission]) -> Vec<(&'a UserId, Vec<&'a Mission>)> {
    let mut index: Vec<(&UserId, Vec<&Mission>)> = Vec::new();
    let mut positions: HashMap<&UserId, usize> = HashMap::new();

    for &mission in missions {
        for assignment in &mission.assignments {
            let pos = *positions.entry(&assignment.user_id).or_insert_with(|| {
                index.push((&assignment.user_id, Vec::new()));
                index.len() - 1
            });
            let assigned = &mut index[pos].1;
            // une mission ne peut pas être en conflit avec elle-même
            if !assigned.iter().any(|m| m.id == mission.id) {
                assigned.push(mission);
            }
        }
    }

    index
}

pub(super) fn detect_conflicts(missions: &[&Mission], roster: &[RosterUser]) -> Vec<ConflictReport> {
    let mut out = Vec::new();

    for (volunteer, assigned) in missions_by_volunteer(missions) {
        if assigned.len() < 2 {
            continue;
        }

        // O(k^2) par bénévole : k reste petit en pratique
        let mut details = Vec::new();
        for (idx, a) in assigned.iter().enumerate() {
            for b in assigned.iter().skip(idx + 1) {
                if let Some((overlap_start, overlap_end)) = util::overlap_window(a, b) {
                    details.push(ConflictDetail {
                        mission_a: (*a).clone(),
                        mission_b: (*b).clone(),
                        overlap_start,
                        overlap_end,
                    });
                }
            }
        }

        if details.is_empty() {
            continue;
        }

        let Some(user) = roster.iter().find(|u| &u.id == volunteer) else {
            tracing::warn!(
                volunteer = volunteer.as_str(),
                conflicts = details.len(),
                "volunteer missing from roster, conflicts dropped"
            );
            continue;
        };

        out.push(ConflictReport {
            volunteer_id: volunteer.clone(),
            volunteer_name: user.display_name(),
            conflicts: details,
        });
    }

    tracing::debug!(missions = missions.len(), reports = out.len(), "conflict detection done");
    out
}
