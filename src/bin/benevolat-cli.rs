#![forbid(unsafe_code)]
use anyhow::Result;
use benevolat::{
    io,
    model::{Snapshot, UserId},
    planning::{FilterOptions, Planner, PlanningError, StatsOptions, StatusFilter},
    report::{ReportRenderer, TextReport},
    storage::{JsonStorage, Storage},
};
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des missions bénévoles
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'instantané (annuaire + missions)
    #[arg(long, global = true, default_value = "planning.json")]
    snapshot: String,

    #[command(subcommand)]
    cmd: Commands,
}

/// Critères de filtrage communs
#[derive(Args, Debug)]
struct FilterArgs {
    /// Début au plus tôt (RFC3339 ou YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Fin au plus tard (RFC3339 ou YYYY-MM-DD, journée incluse)
    #[arg(long)]
    to: Option<String>,
    /// Id du bénévole inscrit
    #[arg(long)]
    volunteer: Option<String>,
    /// Id du responsable
    #[arg(long)]
    manager: Option<String>,
    /// Sous-chaîne du lieu (insensible à la casse)
    #[arg(long)]
    location: Option<String>,
    /// État de remplissage (all, available, full, conflicts)
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    status: StatusFilter,
    /// Décalage du fuseau d'affichage, en minutes
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,
}

impl FilterArgs {
    fn resolve(&self, snapshot: &Snapshot) -> Result<(FilterOptions, StatsOptions), PlanningError> {
        let stats = StatsOptions::with_utc_offset_minutes(self.utc_offset_minutes)?;
        let offset = stats.utc_offset;
        let known = |raw: &String| {
            let id = UserId::new(raw);
            if snapshot.knows_user(&id) {
                Ok(id)
            } else {
                Err(PlanningError::UnknownUser(raw.clone()))
            }
        };
        let filter = FilterOptions {
            start_date: self
                .from
                .as_deref()
                .map(|raw| io::parse_date_bound(raw, false, offset))
                .transpose()?,
            end_date: self
                .to
                .as_deref()
                .map(|raw| io::parse_date_bound(raw, true, offset))
                .transpose()?,
            volunteer_id: self.volunteer.as_ref().map(known).transpose()?,
            manager_id: self.manager.as_ref().map(known).transpose()?,
            location: self.location.clone(),
            status: self.status,
        };
        Ok((filter, stats))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer l'annuaire depuis un CSV
    ImportUsers {
        #[arg(long)]
        csv: String,
    },

    /// Importer des missions depuis un CSV
    ImportMissions {
        #[arg(long)]
        csv: String,
    },

    /// Importer des inscriptions depuis un CSV
    ImportAssignments {
        #[arg(long)]
        csv: String,
    },

    /// Lister les missions filtrées et optionnellement les exporter
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les doubles inscriptions
    Check {
        #[command(flatten)]
        filter: FilterArgs,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Statistiques de couverture
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
        /// Export JSON (optionnel)
        #[arg(long)]
        out_json: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.snapshot)?;
    let mut snapshot = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportUsers { csv } => {
            let users = io::import_users_csv(csv)?;
            println!("{} user(s) imported", users.len());
            snapshot.users.extend(users);
            storage.save(&snapshot)?;
            0
        }
        Commands::ImportMissions { csv } => {
            let missions = io::import_missions_csv(csv)?;
            let added = io::merge_missions(&mut snapshot, missions)?;
            println!("{added} mission(s) imported");
            storage.save(&snapshot)?;
            0
        }
        Commands::ImportAssignments { csv } => {
            let rows = io::import_assignments_csv(csv)?;
            let added = io::apply_assignments(&mut snapshot, rows)?;
            println!("{added} assignment(s) imported");
            storage.save(&snapshot)?;
            0
        }
        Commands::List { filter, out_csv } => {
            let (opts, stats_opts) = filter.resolve(&snapshot)?;
            let missions = Planner::new(&snapshot).filter(&opts);
            if let Some(path) = out_csv {
                io::export_missions_csv(path, &missions)?;
            }
            let offset = stats_opts.utc_offset;
            for m in &missions {
                let (start, end) = match m.interval() {
                    Some((s, e)) => (
                        s.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
                        e.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
                    ),
                    None => (m.start_time.to_string(), m.end_time.to_string()),
                };
                println!(
                    "{} | {} | {} → {} | {} | {}/{}",
                    m.id,
                    m.title,
                    start,
                    end,
                    m.location.as_deref().unwrap_or("-"),
                    m.inscriptions_count(),
                    m.max_volunteers
                );
            }
            0
        }
        Commands::Check { filter, report } => {
            let (opts, stats_opts) = filter.resolve(&snapshot)?;
            let planner = Planner::new(&snapshot);
            let missions = planner.filter(&opts);
            let conflicts = planner.detect_conflicts(&missions);
            print!(
                "{}",
                TextReport::new(stats_opts.utc_offset).render_conflicts(&conflicts)
            );
            if let Some(path) = report {
                io::export_conflicts_csv(path, &conflicts)?;
            }
            // Code 2 = WARNING/INCOMPLETE
            if conflicts.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Stats { filter, out_json } => {
            let (opts, stats_opts) = filter.resolve(&snapshot)?;
            let view = Planner::new(&snapshot).evaluate(&opts, &stats_opts);
            print!(
                "{}",
                TextReport::new(stats_opts.utc_offset).render_stats(&view.stats)
            );
            if let Some(path) = out_json {
                io::export_stats_json(path, &view.stats)?;
            }
            0
        }
    };

    std::process::exit(code);
}
