use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour un utilisateur (bénévole, responsable, admin).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant numérique stable d'une mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(pub i64);

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date-heure ISO sans fuseau (`T` ou espace, secondes optionnelles).
pub(crate) fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Horodatage tel que fourni par la couche de données.
///
/// Une valeur illisible est conservée telle quelle (`Malformed`) : toute
/// comparaison qui l'implique est fausse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    Malformed(String),
}

impl Timestamp {
    /// Parsing tolérant : RFC3339, puis formats ISO sans fuseau (lus en UTC).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Valid(dt.with_timezone(&Utc));
        }
        match parse_naive_datetime(trimmed) {
            Some(naive) => Self::Valid(Utc.from_utc_datetime(&naive)),
            None => Self::Malformed(raw.to_owned()),
        }
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Valid(dt) => Some(*dt),
            Self::Malformed(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Valid(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(dt) => f.write_str(&dt.to_rfc3339()),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Rôle d'un utilisateur de l'annuaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Volunteer,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" | "responsable" => Ok(Self::Manager),
            "volunteer" | "benevole" | "bénévole" | "" => Ok(Self::Volunteer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Entrée minimale de l'annuaire, utilisée pour nommer les bénévoles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
}

impl RosterUser {
    pub fn new<F: Into<String>, L: Into<String>>(id: UserId, first_name: F, last_name: L) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: Role::Volunteer,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Inscription d'un bénévole sur une mission (champs d'affichage dénormalisés).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub user_id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Assignment {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
        }
    }
}

impl From<&RosterUser> for Assignment {
    fn from(user: &RosterUser) -> Self {
        Self {
            user_id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: None,
        }
    }
}

/// Mission planifiable : fenêtre horaire, capacité, inscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub max_volunteers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<UserId>,
    #[serde(default, alias = "inscriptions")]
    pub assignments: Vec<Assignment>,
}

impl Mission {
    pub fn new<T: Into<String>>(
        id: i64,
        title: T,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_volunteers: u32,
    ) -> Self {
        Self {
            id: MissionId(id),
            title: title.into(),
            description: None,
            location: None,
            start_time: Timestamp::Valid(start),
            end_time: Timestamp::Valid(end),
            max_volunteers,
            manager_id: None,
            assignments: Vec::new(),
        }
    }

    /// Intervalle `[start, end)` si les deux bornes sont lisibles.
    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_time.get()?, self.end_time.get()?))
    }

    pub fn inscriptions_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_full(&self) -> bool {
        self.inscriptions_count() >= self.max_volunteers as usize
    }

    pub fn available_slots(&self) -> usize {
        (self.max_volunteers as usize).saturating_sub(self.inscriptions_count())
    }

    pub fn has_volunteer(&self, id: &UserId) -> bool {
        self.assignments.iter().any(|a| &a.user_id == id)
    }

    /// Date calendaire de début dans le fuseau d'affichage.
    pub fn start_date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.start_time
            .get()
            .map(|dt| dt.with_timezone(tz).date_naive())
    }
}

/// Instantané immuable fourni par la couche de données.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<RosterUser>,
    #[serde(default)]
    pub missions: Vec<Mission>,
}

impl Snapshot {
    pub fn find_user_by_id<'a>(&'a self, id: &UserId) -> Option<&'a RosterUser> {
        self.users.iter().find(|u| &u.id == id)
    }
    /// Connu de l'annuaire, inscrit sur une mission ou responsable d'une mission.
    pub fn knows_user(&self, id: &UserId) -> bool {
        self.find_user_by_id(id).is_some()
            || self
                .missions
                .iter()
                .any(|m| m.has_volunteer(id) || m.manager_id.as_ref() == Some(id))
    }
    pub fn find_mission_mut(&mut self, id: MissionId) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parsing_is_lenient() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(
            Timestamp::parse("2025-06-01T12:00:00+02:00"),
            Timestamp::Valid(expected)
        );
        assert_eq!(Timestamp::parse("2025-06-01T10:00:00"), Timestamp::Valid(expected));
        assert_eq!(Timestamp::parse("2025-06-01 10:00"), Timestamp::Valid(expected));
        assert_eq!(
            Timestamp::parse("demain matin"),
            Timestamp::Malformed("demain matin".into())
        );
    }

    #[test]
    fn malformed_timestamp_roundtrips_verbatim() {
        let json = r#"{"id":1,"title":"Accueil","start_time":"??","end_time":"2025-06-01T12:00:00Z","max_volunteers":2}"#;
        let mission: Mission = serde_json::from_str(json).unwrap();
        assert!(!mission.start_time.is_valid());
        assert!(mission.interval().is_none());
        let back = serde_json::to_value(&mission).unwrap();
        assert_eq!(back["start_time"], "??");
    }

    #[test]
    fn inscriptions_alias_and_counts() {
        let json = r#"{"id":7,"title":"Buvette","start_time":"2025-06-01T10:00:00Z","end_time":"2025-06-01T12:00:00Z","max_volunteers":1,"inscriptions":[{"user_id":"u1"}]}"#;
        let mission: Mission = serde_json::from_str(json).unwrap();
        assert_eq!(mission.inscriptions_count(), 1);
        assert!(mission.is_full());
        assert_eq!(mission.available_slots(), 0);
    }

    #[test]
    fn mission_managers_are_known_users() {
        let mut mission = Mission::new(
            1,
            "Accueil",
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            2,
        );
        mission.manager_id = Some(UserId::new("boss"));
        let snapshot = Snapshot {
            users: Vec::new(),
            missions: vec![mission],
        };
        assert!(snapshot.knows_user(&UserId::new("boss")));
        assert!(!snapshot.knows_user(&UserId::new("personne")));
    }

    #[test]
    fn display_name_trims_missing_parts() {
        let user = RosterUser::new(UserId::new("u1"), "Alice", "");
        assert_eq!(user.display_name(), "Alice");
    }
}
