use crate::model::Snapshot;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un instantané depuis un support.
    fn load(&self) -> anyhow::Result<Snapshot>;
    /// Sauvegarde de manière atomique.
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

/// Instantané (annuaire + missions) persisté dans un unique fichier JSON.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge l'instantané, ou un instantané vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Snapshot> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot yet, starting empty");
            return Ok(Snapshot::default());
        }
        self.load()
    }

    /// Le fichier temporaire doit vivre sur le même volume que la cible.
    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let file =
            File::open(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", self.path.display()))?;
        tracing::debug!(
            users = snapshot.users.len(),
            missions = snapshot.missions.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let tmp = NamedTempFile::new_in(self.staging_dir())
            .with_context(|| format!("creating temp file next to {}", self.path.display()))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), missions = snapshot.missions.len(), "snapshot saved");
        Ok(())
    }
}
