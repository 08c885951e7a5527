use std::path::PathBuf;

use assets::{DEFAULT_DATA_ARCHIVE, DEFAULT_LOOSE_DIR, MountSource, VfsConfig};
use clap::Parser;

/// Petit jeu de démonstration : affiche `happy.png` depuis le VFS.
#[derive(Parser, Debug)]
#[command(name = "game", version, long_about = None)]
pub struct Cli {
    /// Ne pas monter l'archive compilée dans l'exécutable
    #[arg(long)]
    pub no_builtin_data: bool,

    /// Ne pas monter l'archive de données
    #[arg(long)]
    pub no_data_zip: bool,

    /// Ne pas monter le dossier de fichiers libres
    #[arg(long)]
    pub no_loose_files: bool,

    /// Archive de données
    #[arg(long, default_value = DEFAULT_DATA_ARCHIVE)]
    pub data_zip: PathBuf,

    /// Dossier de fichiers libres
    #[arg(long, default_value = DEFAULT_LOOSE_DIR)]
    pub data_dir: PathBuf,

    /// Sources supplémentaires (dossier ou .zip), montées après les autres
    #[arg(long = "mount", value_name = "PATH")]
    pub mounts: Vec<PathBuf>,

    /// Quitter si aucune source n'a pu être montée
    #[arg(long)]
    pub require_assets: bool,
}

impl Cli {
    pub fn vfs_config(&self, builtin: MountSource) -> VfsConfig {
        let mut config = VfsConfig::empty()
            .with_data_archive((!self.no_data_zip).then(|| self.data_zip.clone()))
            .with_loose_dir((!self.no_loose_files).then(|| self.data_dir.clone()))
            .require_assets(self.require_assets);

        if !self.no_builtin_data {
            config = config.with_builtin(builtin);
        }

        for path in &self.mounts {
            let source = if path.is_dir() {
                MountSource::directory(path)
            } else {
                MountSource::archive(path)
            };
            config = config.with_mount(source);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> MountSource {
        MountSource::embedded("builtin", b"")
    }

    #[test]
    fn defaults_mount_all_three_sources() {
        let cli = Cli::try_parse_from(["game"]).unwrap();
        let order = cli.vfs_config(builtin()).mount_order();

        assert_eq!(order.len(), 3);
        let sources: Vec<_> = order.iter().map(|e| &e.source).collect();
        assert!(matches!(sources[0], MountSource::EmbeddedBlob { .. }));
        assert!(matches!(
            sources[1],
            MountSource::ArchiveFile(p) if p.as_path() == std::path::Path::new("./data.zip")
        ));
        assert!(matches!(sources[2], MountSource::Directory(_)));
    }

    #[test]
    fn flags_disable_sources() {
        let cli = Cli::try_parse_from(["game", "--no-builtin-data", "--no-data-zip"]).unwrap();
        let config = cli.vfs_config(builtin());

        assert!(config.builtin.is_none());
        assert!(config.data_archive.is_none());
        assert_eq!(config.mount_order().len(), 1);
    }

    #[test]
    fn extra_mounts_pick_kind_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "game",
            "--no-loose-files",
            "--mount",
            dir_arg.as_str(),
            "--mount",
            "mods.zip",
            "--require-assets",
        ])
        .unwrap();
        let config = cli.vfs_config(builtin());

        assert!(config.require_assets);
        assert_eq!(config.extra.len(), 2);
        assert!(matches!(config.extra[0].source, MountSource::Directory(_)));
        assert!(matches!(config.extra[1].source, MountSource::ArchiveFile(_)));
    }
}
