use crate::model::{
    parse_naive_datetime, Assignment, Mission, MissionId, Role, RosterUser, Snapshot, Timestamp,
    UserId,
};
use crate::planning::{ConflictReport, PlanningError, PlanningStats};
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn optional(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required<'r>(rec: &'r StringRecord, idx: usize, field: &str) -> anyhow::Result<&'r str> {
    let value = rec
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("missing {field}"))?;
    if value.is_empty() {
        bail!("empty {field}");
    }
    Ok(value)
}

/// Import de l'annuaire: header `id,first_name,last_name[,role]`.
/// Un id vide est remplacé par un UUID aléatoire.
pub fn import_users_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RosterUser>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = optional(&rec, 0).map_or_else(UserId::random, UserId::new);
        let first_name = required(&rec, 1, "first_name")?;
        let last_name = rec.get(2).map(str::trim).unwrap_or_default();
        let mut user = RosterUser::new(id, first_name, last_name);
        if let Some(role) = optional(&rec, 3) {
            user.role = role
                .parse::<Role>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid role for user {}", user.id))?;
        }
        out.push(user);
    }
    Ok(out)
}

/// Borne de filtre saisie par l'utilisateur : RFC3339, date-heure sans
/// fuseau ou date `YYYY-MM-DD`.
///
/// Sans fuseau explicite, la valeur est lue dans le fuseau d'affichage ; une
/// date seule en borne de fin inclut toute la journée.
pub fn parse_date_bound(
    raw: &str,
    end_of_day: bool,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, PlanningError> {
    let raw = raw.trim();
    let invalid = || PlanningError::InvalidDate(raw.to_string());
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let (local, whole_day) = match parse_naive_datetime(raw) {
        Some(naive) => (naive, false),
        None => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
            (date.and_time(NaiveTime::MIN), true)
        }
    };
    let at = offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(invalid)?
        .with_timezone(&Utc);
    Ok(if end_of_day && whole_day {
        at + Duration::days(1)
    } else {
        at
    })
}

fn strict_timestamp(raw: &str, field: &str) -> anyhow::Result<Timestamp> {
    match Timestamp::parse(raw) {
        ts @ Timestamp::Valid(_) => Ok(ts),
        Timestamp::Malformed(raw) => bail!("invalid {field}: {raw}"),
    }
}

/// Import de missions: header
/// `id,title,start_time,end_time,max_volunteers[,location][,manager_id][,description]`.
pub fn import_missions_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Mission>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: i64 = required(&rec, 0, "id")?.parse().context("mission id")?;
        if !seen.insert(id) {
            bail!("duplicate mission id in csv: {id}");
        }
        let title = required(&rec, 1, "title")?.to_string();
        let start_time = strict_timestamp(required(&rec, 2, "start_time")?, "start_time")?;
        let end_time = strict_timestamp(required(&rec, 3, "end_time")?, "end_time")?;
        if let (Some(start), Some(end)) = (start_time.get(), end_time.get()) {
            if end <= start {
                bail!("mission {id}: end_time must be after start_time");
            }
        }
        let max_volunteers: u32 = required(&rec, 4, "max_volunteers")?
            .parse()
            .with_context(|| format!("mission {id}: max_volunteers"))?;
        out.push(Mission {
            id: MissionId(id),
            title,
            description: optional(&rec, 7),
            location: optional(&rec, 5),
            start_time,
            end_time,
            max_volunteers,
            manager_id: optional(&rec, 6).map(UserId::new),
            assignments: Vec::new(),
        });
    }
    Ok(out)
}

/// Ajoute des missions importées à l'instantané ; les ids restent uniques.
/// Retourne le nombre d'ajouts.
pub fn merge_missions(snapshot: &mut Snapshot, missions: Vec<Mission>) -> anyhow::Result<usize> {
    let existing: HashSet<MissionId> = snapshot.missions.iter().map(|m| m.id).collect();
    if let Some(clash) = missions.iter().find(|m| existing.contains(&m.id)) {
        bail!("mission id already in snapshot: {}", clash.id);
    }
    let added = missions.len();
    snapshot.missions.extend(missions);
    Ok(added)
}

/// Import d'inscriptions: header `mission_id,user_id[,first_name][,last_name][,phone]`.
pub fn import_assignments_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<(MissionId, Assignment)>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mission_id: i64 = required(&rec, 0, "mission_id")?
            .parse()
            .context("mission_id")?;
        let mut assignment = Assignment::new(UserId::new(required(&rec, 1, "user_id")?));
        assignment.first_name = optional(&rec, 2).unwrap_or_default();
        assignment.last_name = optional(&rec, 3).unwrap_or_default();
        assignment.phone = optional(&rec, 4);
        out.push((MissionId(mission_id), assignment));
    }
    Ok(out)
}

/// Rattache des inscriptions aux missions de l'instantané.
///
/// Les noms manquants sont complétés depuis l'annuaire ; une inscription
/// déjà présente n'est pas dupliquée. Retourne le nombre d'ajouts.
pub fn apply_assignments(
    snapshot: &mut Snapshot,
    rows: Vec<(MissionId, Assignment)>,
) -> anyhow::Result<usize> {
    let mut added = 0usize;
    for (mission_id, mut assignment) in rows {
        if assignment.first_name.is_empty() && assignment.last_name.is_empty() {
            if let Some(user) = snapshot.find_user_by_id(&assignment.user_id) {
                assignment.first_name = user.first_name.clone();
                assignment.last_name = user.last_name.clone();
            }
        }
        let mission = snapshot
            .find_mission_mut(mission_id)
            .with_context(|| format!("unknown mission: {mission_id}"))?;
        if mission.has_volunteer(&assignment.user_id) {
            continue;
        }
        mission.assignments.push(assignment);
        added += 1;
    }
    Ok(added)
}

/// Export CSV des missions: header
/// `id,title,start_time,end_time,location,max_volunteers,inscriptions`
pub fn export_missions_csv<P: AsRef<Path>>(path: P, missions: &[&Mission]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "title",
        "start_time",
        "end_time",
        "location",
        "max_volunteers",
        "inscriptions",
    ])?;
    for m in missions {
        w.write_record([
            m.id.to_string().as_str(),
            m.title.as_str(),
            m.start_time.to_string().as_str(),
            m.end_time.to_string().as_str(),
            m.location.as_deref().unwrap_or(""),
            m.max_volunteers.to_string().as_str(),
            m.inscriptions_count().to_string().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des conflits, une ligne par chevauchement: header
/// `volunteer_id,volunteer_name,mission_a,mission_b,overlap_start,overlap_end`
pub fn export_conflicts_csv<P: AsRef<Path>>(
    path: P,
    reports: &[ConflictReport],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "volunteer_id",
        "volunteer_name",
        "mission_a",
        "mission_b",
        "overlap_start",
        "overlap_end",
    ])?;
    for report in reports {
        for detail in &report.conflicts {
            w.write_record([
                report.volunteer_id.as_str(),
                report.volunteer_name.as_str(),
                detail.mission_a.id.to_string().as_str(),
                detail.mission_b.id.to_string().as_str(),
                detail.overlap_start.to_rfc3339().as_str(),
                detail.overlap_end.to_rfc3339().as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export JSON des statistiques (jolie mise en forme)
pub fn export_stats_json<P: AsRef<Path>>(path: P, stats: &PlanningStats) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(stats)?;
    fs::write(path, s)?;
    Ok(())
}
