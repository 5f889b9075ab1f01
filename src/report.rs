use crate::planning::{ConflictReport, PlanningStats};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt::Write;

/// Permet de customiser le rendu des résultats (texte, markdown, etc.).
pub trait ReportRenderer {
    fn render_conflicts(&self, reports: &[ConflictReport]) -> String;
    fn render_stats(&self, stats: &PlanningStats) -> String;
}

/// Rendu texte brut destiné au terminal.
#[derive(Debug, Clone, Copy)]
pub struct TextReport {
    pub utc_offset: FixedOffset,
}

impl Default for TextReport {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl TextReport {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    fn time(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.utc_offset)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

impl ReportRenderer for TextReport {
    fn render_conflicts(&self, reports: &[ConflictReport]) -> String {
        if reports.is_empty() {
            return "Aucun conflit.\n".to_string();
        }
        let mut out = String::new();
        for report in reports {
            let _ = writeln!(
                out,
                "{} ({}) : {} conflit(s)",
                report.volunteer_name,
                report.volunteer_id,
                report.conflicts.len()
            );
            for detail in &report.conflicts {
                let _ = writeln!(
                    out,
                    "  - #{} {} / #{} {} : {} -> {}",
                    detail.mission_a.id,
                    detail.mission_a.title,
                    detail.mission_b.id,
                    detail.mission_b.title,
                    self.time(detail.overlap_start),
                    self.time(detail.overlap_end)
                );
            }
        }
        out
    }

    fn render_stats(&self, stats: &PlanningStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Missions : {}", stats.total_missions);
        let _ = writeln!(
            out,
            "Places   : {}/{} ({}%)",
            stats.filled_slots, stats.total_volunteer_slots, stats.coverage_percentage
        );
        let _ = writeln!(out, "Conflits : {}", stats.conflicts_count);
        for (day, count) in &stats.missions_by_day {
            let _ = writeln!(out, "  {day} : {count}");
        }
        out
    }
}
