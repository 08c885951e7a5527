use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    path::PathBuf,
};

use crate::{LookupError, normalize, path::strip_mount_point};

/// Trait minimal pour une source montable dans le VFS.
/// Tous les chemins passés aux méthodes sont normalisés et relatifs à la racine
/// de la source (la racine elle-même est `""`).
pub trait FileSystem: Send + Sync + 'static {
    /// Ouvre un fichier en lecture. Un dossier ou un chemin absent donne `NotFound`.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError>;

    /// Vérifie si un fichier ou un dossier existe dans cette source.
    fn exists(&self, path: &str) -> bool;

    /// Vérifie si `path` est un dossier de cette source.
    fn is_dir(&self, path: &str) -> bool;

    /// Nom (pour debug).
    fn name(&self) -> &str;
}

/// Dossier du système de fichiers OS ("loose files").
pub struct DirFs {
    root: PathBuf,
    name: String,
}

impl DirFs {
    /// Exemple : `DirFs::new("./data", "./data/")`
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        DirFs {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve_path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|c| !c.is_empty())
            .fold(self.root.clone(), |abs, c| abs.join(c))
    }
}

impl FileSystem for DirFs {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError> {
        let abs = self.resolve_path(path);
        if abs.is_dir() {
            return Err(LookupError::NotFound(path.to_string()));
        }

        match File::open(&abs) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LookupError::NotFound(path.to_string()))
            }
            Err(error) => Err(LookupError::Io {
                path: path.to_string(),
                error,
            }),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve_path(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.resolve_path(path).is_dir()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Source montée dans le VFS.
struct Mount {
    /// Point de montage normalisé. `""` = racine.
    prefix: String,
    fs: Box<dyn FileSystem>,
}

impl Mount {
    /// Chemin relatif à donner à la source si `path` est sous le point de montage.
    fn relative_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        strip_mount_point(path, &self.prefix)
    }

    /// Le chemin est un ancêtre strict du point de montage (ex. `mods` pour `mods/foo`).
    fn implies_dir(&self, path: &str) -> bool {
        !self.prefix.is_empty()
            && (path.is_empty()
                || self
                    .prefix
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('/')))
    }
}

/// Espace de noms unifié, en lecture seule une fois construit par `resolve`.
/// Priorité : la dernière source montée a la priorité la plus haute.
#[derive(Default)]
pub struct Vfs {
    mounts: Vec<Mount>,
}

impl Vfs {
    /// Crée un Vfs vide : toute recherche donne `NotFound`.
    pub fn new() -> Self {
        Vfs { mounts: Vec::new() }
    }

    /// Empile une source au-dessus des précédentes. Réservé à la construction.
    pub(crate) fn mount(&mut self, prefix: String, fs: Box<dyn FileSystem>) {
        self.mounts.push(Mount { prefix, fs });
    }

    /// Première source (ordre de priorité) qui contient le chemin normalisé.
    fn resolve_mount_for<'a>(&self, path: &'a str) -> Option<(&Mount, &'a str)> {
        self.mounts.iter().rev().find_map(|m| {
            let rel = m.relative_path(path)?;
            m.fs.exists(rel).then_some((m, rel))
        })
    }

    /// Sources candidates pour un fichier, de la plus haute à la plus basse priorité.
    /// Un dossier du même nom dans une source haute ne masque pas le fichier.
    fn file_candidates<'a, 'p>(&'a self, path: &'p str) -> impl Iterator<Item = (&'a Mount, &'p str)> + use<'a, 'p> {
        self.mounts.iter().rev().filter_map(move |m| {
            let rel = m.relative_path(path)?;
            (m.fs.exists(rel) && !m.fs.is_dir(rel)).then_some((m, rel))
        })
    }

    /// Ouvre un fichier du VFS en lecture.
    /// Descend dans l'ordre de priorité jusqu'à la première source qui l'ouvre.
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError> {
        let norm = normalize(path)?;
        for (m, rel) in self.file_candidates(&norm) {
            match m.fs.open(rel) {
                Err(LookupError::NotFound(_)) => continue,
                other => return other,
            }
        }
        Err(LookupError::NotFound(path.to_string()))
    }

    /// Lit des bytes depuis le VFS.
    pub fn read_bytes(&self, path: &str) -> Result<Vec<u8>, LookupError> {
        let mut reader = self.open(path)?;
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|error| LookupError::Io {
                path: path.to_string(),
                error,
            })?;
        Ok(data)
    }

    /// Lit un fichier en tant que texte UTF-8.
    pub fn read_to_string(&self, path: &str) -> Result<String, LookupError> {
        let mut reader = self.open(path)?;
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|error| LookupError::Io {
                path: path.to_string(),
                error,
            })?;
        Ok(text)
    }

    /// Vérifie si un chemin (fichier ou dossier) existe dans le VFS.
    pub fn exists(&self, path: &str) -> bool {
        let Ok(norm) = normalize(path) else {
            return false;
        };
        self.resolve_mount_for(&norm).is_some() || self.mounts.iter().any(|m| m.implies_dir(&norm))
    }

    /// Vérifie si un chemin est un dossier, selon la source qui le fournit.
    pub fn is_dir(&self, path: &str) -> bool {
        let Ok(norm) = normalize(path) else {
            return false;
        };
        if self.mounts.iter().any(|m| m.implies_dir(&norm)) {
            return true;
        }
        self.resolve_mount_for(&norm)
            .is_some_and(|(m, rel)| m.fs.is_dir(rel))
    }

    /// Nom de la source qui servirait ce chemin : celle du fichier s'il y en a un,
    /// sinon celle du dossier.
    pub fn which(&self, path: &str) -> Option<&str> {
        let norm = normalize(path).ok()?;
        self.file_candidates(&norm)
            .next()
            .or_else(|| self.resolve_mount_for(&norm))
            .map(|(m, _)| m.fs.name())
    }

    /// Nombre de sources montées avec succès.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Retourne (point de montage, nom) pour chaque source, de la plus basse à la plus haute priorité.
    pub fn debug_list_mounts(&self) -> Vec<(String, String)> {
        self.mounts
            .iter()
            .map(|m| (m.prefix.clone(), m.fs.name().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn read_through_dir_fs() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sprites")).unwrap();
        std::fs::write(dir.path().join("sprites/hello.txt"), "world").unwrap();

        let mut vfs = Vfs::new();
        vfs.mount(String::new(), Box::new(DirFs::new(dir.path(), "data")));

        assert!(vfs.exists("sprites/hello.txt"));
        assert!(vfs.exists("/sprites/hello.txt"));
        assert!(vfs.is_dir("sprites"));
        assert_eq!(vfs.read_to_string("sprites/hello.txt").unwrap(), "world");
        assert_eq!(vfs.which("sprites/hello.txt"), Some("data"));
    }

    #[test]
    fn mount_priority() {
        // A puis B : B gagne car monté en dernier
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        std::fs::write(dir_a.path().join("x.txt"), "from_a").unwrap();
        std::fs::write(dir_b.path().join("x.txt"), "from_b").unwrap();
        std::fs::write(dir_a.path().join("only_a.txt"), "a").unwrap();

        let mut vfs = Vfs::new();
        vfs.mount(String::new(), Box::new(DirFs::new(dir_a.path(), "A")));
        vfs.mount(String::new(), Box::new(DirFs::new(dir_b.path(), "B")));

        assert_eq!(vfs.read_to_string("x.txt").unwrap(), "from_b");
        // absent de B : on retombe sur A
        assert_eq!(vfs.read_to_string("only_a.txt").unwrap(), "a");
        assert_eq!(vfs.which("only_a.txt"), Some("A"));
        assert_eq!(
            vfs.debug_list_mounts(),
            vec![(String::new(), "A".to_string()), (String::new(), "B".to_string())]
        );
    }

    #[test]
    fn mount_point_restricts_subtree() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "mod").unwrap();

        let mut vfs = Vfs::new();
        vfs.mount("mods/foo".to_string(), Box::new(DirFs::new(dir.path(), "foo")));

        assert_eq!(vfs.read_to_string("mods/foo/a.txt").unwrap(), "mod");
        assert!(vfs.open("a.txt").is_err_and(|e| e.is_not_found()));
        assert!(vfs.is_dir("mods"));
        assert!(vfs.exists("mods/foo"));
        assert!(!vfs.exists("mod"));
    }

    #[test]
    fn directories_and_missing_files_are_not_found() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();

        let mut vfs = Vfs::new();
        vfs.mount(String::new(), Box::new(DirFs::new(dir.path(), "data")));

        assert!(vfs.open("sub").is_err_and(|e| e.is_not_found()));
        assert!(vfs.open("missing.png").is_err_and(|e| e.is_not_found()));
        assert!(matches!(
            vfs.open("../etc/passwd"),
            Err(LookupError::InvalidPath(_))
        ));
        assert!(!vfs.exists("../etc/passwd"));
    }

    #[test]
    fn directory_in_higher_mount_does_not_hide_file() {
        let low = tempdir().unwrap();
        let high = tempdir().unwrap();
        std::fs::write(low.path().join("foo"), "file_in_low").unwrap();
        std::fs::create_dir_all(high.path().join("foo")).unwrap();

        let mut vfs = Vfs::new();
        vfs.mount(String::new(), Box::new(DirFs::new(low.path(), "low")));
        vfs.mount(String::new(), Box::new(DirFs::new(high.path(), "high")));

        assert_eq!(vfs.read_to_string("foo").unwrap(), "file_in_low");
        assert_eq!(vfs.which("foo"), Some("low"));
        assert!(vfs.is_dir("foo"));
    }

    #[test]
    fn empty_vfs_finds_nothing() {
        let vfs = Vfs::new();
        assert!(vfs.is_empty());
        assert!(vfs.open("anything").is_err_and(|e| e.is_not_found()));
        assert!(!vfs.exists("anything"));
        assert_eq!(vfs.which("anything"), None);
    }

    struct CountingFs {
        drops: Arc<AtomicUsize>,
    }

    impl FileSystem for CountingFs {
        fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError> {
            Err(LookupError::NotFound(path.to_string()))
        }

        fn exists(&self, _: &str) -> bool {
            false
        }

        fn is_dir(&self, _: &str) -> bool {
            false
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    impl Drop for CountingFs {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn teardown_releases_every_source_once() {
        let drops = Arc::new(AtomicUsize::new(0));

        let mut vfs = Vfs::new();
        for _ in 0..3 {
            vfs.mount(
                String::new(),
                Box::new(CountingFs {
                    drops: drops.clone(),
                }),
            );
        }
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(vfs);
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }
}
