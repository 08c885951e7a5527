use std::sync::Arc;

use anyhow::{Result, bail};

use crate::{AssetLoader, MountOutcome, Resolution, Vfs, VfsConfig, resolve};

/// Engine : résultat du démarrage, contenant le VFS, l'AssetLoader et le journal des montages.
pub struct Engine {
    pub vfs: Arc<Vfs>,
    pub loader: AssetLoader,
    outcomes: Vec<MountOutcome>,
}

impl Default for Engine {
    /// Moteur sans aucune source montée.
    fn default() -> Self {
        let vfs = Arc::new(Vfs::new());
        let loader = AssetLoader::new(vfs.clone());
        Engine {
            vfs,
            loader,
            outcomes: Vec::new(),
        }
    }
}

impl Engine {
    pub const NAME: &str = "Gena";

    /// Monte les sources de `config` et journalise chaque résultat.
    ///
    /// Un VFS vide n'est une erreur que si `config.require_assets` est vrai :
    /// sinon le jeu tourne en mode dégradé.
    pub fn init(config: &VfsConfig) -> Result<Self> {
        log::info!("Starting engine...");

        let Resolution { vfs, outcomes } = resolve(config.mount_order());

        for outcome in &outcomes {
            match outcome {
                MountOutcome::Mounted { source } => log::info!("Mounted {source}"),
                MountOutcome::Failed { source, error } => {
                    log::warn!("Failed to add {source} to search path: {error}")
                }
            }
        }

        if vfs.is_empty() {
            if config.require_assets {
                bail!("no asset source could be mounted ({} tried)", outcomes.len());
            }
            log::warn!("No asset source mounted, every lookup will fail");
        }

        let vfs = Arc::new(vfs);
        let loader = AssetLoader::new(vfs.clone());

        log::info!("Engine initialization complete ({} sources).", vfs.len());
        Ok(Engine {
            vfs,
            loader,
            outcomes,
        })
    }

    /// Résultat de chaque montage, dans l'ordre de montage.
    pub fn outcomes(&self) -> &[MountOutcome] {
        &self.outcomes
    }

    pub fn mounted_count(&self) -> usize {
        self.vfs.len()
    }
}
