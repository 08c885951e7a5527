use std::path::PathBuf;

use crate::{MountEntry, MountOrder, MountSource};

pub const DEFAULT_DATA_ARCHIVE: &str = "./data.zip";
pub const DEFAULT_LOOSE_DIR: &str = "./data/";

/// Sources d'assets à monter au démarrage.
///
/// Ordre de montage (priorité croissante) : archive embarquée, archive
/// `data.zip`, dossier `data/`, puis `extra` dans l'ordre.
#[derive(Debug, Clone)]
pub struct VfsConfig {
    pub builtin: Option<MountSource>,
    pub data_archive: Option<PathBuf>,
    pub loose_dir: Option<PathBuf>,
    pub extra: Vec<MountEntry>,
    /// Refuse de démarrer si aucune source n'a pu être montée.
    pub require_assets: bool,
}

impl Default for VfsConfig {
    fn default() -> Self {
        VfsConfig {
            builtin: None,
            data_archive: Some(PathBuf::from(DEFAULT_DATA_ARCHIVE)),
            loose_dir: Some(PathBuf::from(DEFAULT_LOOSE_DIR)),
            extra: Vec::new(),
            require_assets: false,
        }
    }
}

impl VfsConfig {
    /// Aucune source : à compléter avec les `with_*`.
    pub fn empty() -> Self {
        VfsConfig {
            builtin: None,
            data_archive: None,
            loose_dir: None,
            extra: Vec::new(),
            require_assets: false,
        }
    }

    pub fn with_builtin(mut self, source: MountSource) -> Self {
        self.builtin = Some(source);
        self
    }

    pub fn with_data_archive(mut self, path: Option<PathBuf>) -> Self {
        self.data_archive = path;
        self
    }

    pub fn with_loose_dir(mut self, path: Option<PathBuf>) -> Self {
        self.loose_dir = path;
        self
    }

    pub fn with_mount(mut self, entry: impl Into<MountEntry>) -> Self {
        self.extra.push(entry.into());
        self
    }

    pub fn require_assets(mut self, require: bool) -> Self {
        self.require_assets = require;
        self
    }

    pub fn mount_order(&self) -> MountOrder {
        let mut order = MountOrder::new();

        if let Some(builtin) = &self.builtin {
            order.push(builtin.clone());
        }
        if let Some(path) = &self.data_archive {
            order.push(MountSource::archive(path));
        }
        if let Some(path) = &self.loose_dir {
            order.push(MountSource::directory(path));
        }
        for entry in &self.extra {
            order.push_entry(entry.clone());
        }

        order
    }
}
