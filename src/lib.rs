#![forbid(unsafe_code)]
//! Benevolat — moteur de planification de missions bénévoles (sans BD).
//!
//! - Filtrage des missions (dates, bénévole, responsable, lieu, remplissage).
//! - Détection des bénévoles inscrits sur des missions qui se chevauchent.
//! - Statistiques de couverture ; import/export CSV et JSON autour.

pub mod io;
pub mod model;
pub mod planning;
pub mod report;
pub mod storage;

pub use model::{Assignment, Mission, MissionId, Role, RosterUser, Snapshot, Timestamp, UserId};
pub use planning::{
    compute_statistics, detect_conflicts, filter_missions, ConflictDetail, ConflictReport,
    FilterOptions, Planner, PlanningError, PlanningStats, PlanningView, StatsOptions,
    StatusFilter,
};
pub use report::{ReportRenderer, TextReport};
pub use storage::{JsonStorage, Storage};
