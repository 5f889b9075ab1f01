//! Moteur de planification : filtrage, conflits, statistiques.
//!
//! Les trois étapes sont des fonctions pures sur un [`Snapshot`] immuable ;
//! chaque passe recalcule tout depuis zéro.

mod conflicts;
mod filter;
mod stats;
mod types;
mod util;

pub use types::{
    ConflictDetail, ConflictReport, FilterOptions, PlanningError, PlanningStats, PlanningView,
    StatsOptions, StatusFilter,
};

use crate::model::{Mission, RosterUser, Snapshot};

/// Missions correspondant à tous les critères, dans l'ordre d'origine.
pub fn filter_missions<'a>(
    missions: &'a [Mission],
    opts: &FilterOptions,
    roster: &[RosterUser],
) -> Vec<&'a Mission> {
    filter::filter_missions(missions, opts, roster)
}

/// Un rapport par bénévole ayant au moins un chevauchement, dans l'ordre
/// de première apparition.
pub fn detect_conflicts(missions: &[&Mission], roster: &[RosterUser]) -> Vec<ConflictReport> {
    conflicts::detect_conflicts(missions, roster)
}

/// Statistiques de couverture ; `conflicts` doit provenir du même jeu filtré.
pub fn compute_statistics(
    missions: &[&Mission],
    conflicts: &[ConflictReport],
    opts: &StatsOptions,
) -> PlanningStats {
    stats::compute_statistics(missions, conflicts, opts)
}

/// Planner : applique le pipeline complet sur un instantané emprunté
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Planner<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn filter(&self, opts: &FilterOptions) -> Vec<&'a Mission> {
        filter_missions(&self.snapshot.missions, opts, &self.snapshot.users)
    }

    pub fn detect_conflicts(&self, missions: &[&Mission]) -> Vec<ConflictReport> {
        detect_conflicts(missions, &self.snapshot.users)
    }

    /// Filtre, puis conflits, puis statistiques (qui dépendent des conflits).
    pub fn evaluate(&self, filter: &FilterOptions, stats: &StatsOptions) -> PlanningView<'a> {
        let missions = self.filter(filter);
        let conflicts = self.detect_conflicts(&missions);
        let stats = compute_statistics(&missions, &conflicts, stats);
        PlanningView {
            missions,
            conflicts,
            stats,
        }
    }
}
