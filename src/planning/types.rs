use crate::model::{Mission, UserId};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Filtre sur l'état de remplissage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    Full,
    /// Missions impliquées dans au moins un conflit du jeu filtré.
    Conflicts,
}

/// Options de filtrage, combinées en ET. Un champ absent ne contraint rien.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub volunteer_id: Option<UserId>,
    #[serde(default)]
    pub manager_id: Option<UserId>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

/// Options des statistiques
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    /// Décalage du fuseau d'affichage, pour le regroupement par jour.
    pub utc_offset: FixedOffset,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl StatsOptions {
    pub fn with_utc_offset_minutes(minutes: i32) -> Result<Self, PlanningError> {
        let utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(PlanningError::InvalidOffset(minutes))?;
        Ok(Self { utc_offset })
    }
}

/// Un chevauchement entre deux missions d'un même bénévole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictDetail {
    pub mission_a: Mission,
    pub mission_b: Mission,
    pub overlap_start: DateTime<Utc>,
    pub overlap_end: DateTime<Utc>,
}

/// Conflits d'un bénévole, dans l'ordre des paires examinées.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub volunteer_id: UserId,
    pub volunteer_name: String,
    pub conflicts: Vec<ConflictDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlanningStats {
    pub total_missions: usize,
    pub total_volunteer_slots: u64,
    pub filled_slots: u64,
    pub coverage_percentage: u64,
    pub missions_by_day: BTreeMap<NaiveDate, usize>,
    pub conflicts_count: usize,
}

/// Résultat complet d'une passe : jeu filtré, conflits, statistiques.
#[derive(Debug, Clone)]
pub struct PlanningView<'a> {
    pub missions: Vec<&'a Mission>,
    pub conflicts: Vec<ConflictReport>,
    pub stats: PlanningStats,
}

#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("invalid utc offset: {0} minutes")]
    InvalidOffset(i32),
    #[error("invalid date bound: {0}")]
    InvalidDate(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
