use std::{io::Read, sync::Arc};

use anyhow::{Context, Result};

use crate::{LookupError, Vfs};

/// AssetLoader : façade "ouvrir par chemin" utilisée par le jeu.
/// Clonable et partageable entre threads, le VFS n'est plus modifié après la construction.
#[derive(Clone, Default)]
pub struct AssetLoader {
    vfs: Arc<Vfs>,
}

impl AssetLoader {
    pub fn new(vfs: Arc<Vfs>) -> Self {
        AssetLoader { vfs }
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    /// Ouvre une resource. `NotFound` est un cas normal pour un asset optionnel.
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError> {
        self.vfs.open(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.vfs.exists(path)
    }

    /// Nom de la source qui sert ce chemin.
    pub fn which(&self, path: &str) -> Option<&str> {
        self.vfs.which(path)
    }

    /// Charge les bytes d'un path via le VFS.
    pub fn load_bytes(&self, path: &str) -> Result<Vec<u8>, LookupError> {
        self.vfs.read_bytes(path)
    }

    pub fn load_string(&self, path: &str) -> Result<String, LookupError> {
        self.vfs.read_to_string(path)
    }

    /// Charge et décode une image (tout format supporté par `image`).
    pub fn load_image(&self, path: &str) -> Result<image::DynamicImage> {
        let bytes = self
            .load_bytes(path)
            .with_context(|| format!("failed to load image bytes for path {path}"))?;
        image::load_from_memory(&bytes).with_context(|| format!("failed to decode image {path:?}"))
    }
}
