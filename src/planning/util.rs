use crate::model::Mission;
use chrono::{DateTime, Utc};

/// Chevauchement d'intervalles semi-ouverts : des missions bout à bout ne
/// se chevauchent pas.
pub(super) fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Fenêtre commune de deux missions, `None` si elles ne se chevauchent pas
/// ou si un horodatage est illisible.
pub(crate) fn overlap_window(a: &Mission, b: &Mission) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (a_start, a_end) = a.interval()?;
    let (b_start, b_end) = b.interval()?;
    if !overlaps(a_start, a_end, b_start, b_end) {
        return None;
    }
    Some((a_start.max(b_start), a_end.min(b_end)))
}

/// Pourcentage arrondi au demi supérieur, 0 si le total est nul.
pub(super) fn percentage(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part * 200 + total) / (total * 2)
}
