use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::{BufReader, Cursor},
    path::PathBuf,
};

use crate::{DirFs, FileSystem, MountError, Vfs, ZipFs, normalize};

/// D'où peuvent venir les données. Pure configuration : ne dit rien du succès du montage.
#[derive(Clone)]
pub enum MountSource {
    /// Archive zip compilée dans le programme.
    EmbeddedBlob {
        name: String,
        data: Cow<'static, [u8]>,
    },
    /// Archive zip sur disque.
    ArchiveFile(PathBuf),
    /// Dossier de fichiers libres.
    Directory(PathBuf),
}

impl MountSource {
    pub fn embedded(name: impl Into<String>, data: &'static [u8]) -> Self {
        MountSource::EmbeddedBlob {
            name: name.into(),
            data: Cow::Borrowed(data),
        }
    }

    /// Blob généré par `bin2src` : `size` est la valeur de `<symbol>_size`.
    pub fn embedded_with_size(name: impl Into<String>, data: &'static [u8], size: usize) -> Self {
        Self::embedded(name, &data[..size.min(data.len())])
    }

    pub fn embedded_owned(name: impl Into<String>, data: Vec<u8>) -> Self {
        MountSource::EmbeddedBlob {
            name: name.into(),
            data: Cow::Owned(data),
        }
    }

    pub fn archive(path: impl Into<PathBuf>) -> Self {
        MountSource::ArchiveFile(path.into())
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        MountSource::Directory(path.into())
    }

    /// Description lisible, utilisée dans les `MountOutcome`.
    pub fn describe(&self) -> String {
        match self {
            MountSource::EmbeddedBlob { name, data } => {
                format!("embedded archive {} ({} bytes)", name, data.len())
            }
            MountSource::ArchiveFile(path) => format!("archive {}", path.display()),
            MountSource::Directory(path) => format!("directory {}", path.display()),
        }
    }

    /// Ouvre la source en tant que `FileSystem`.
    fn open(&self) -> Result<Box<dyn FileSystem>, MountError> {
        match self {
            MountSource::EmbeddedBlob { name, data } => {
                let fs = ZipFs::new(Cursor::new(data.clone()), name.clone())
                    .map_err(|e| MountError::FormatInvalid(e.to_string()))?;
                Ok(Box::new(fs))
            }
            MountSource::ArchiveFile(path) => {
                let file = File::open(path).map_err(MountError::SourceUnavailable)?;
                let fs = ZipFs::new(BufReader::new(file), path.display().to_string())
                    .map_err(|e| MountError::FormatInvalid(e.to_string()))?;
                Ok(Box::new(fs))
            }
            MountSource::Directory(path) => {
                let meta = std::fs::metadata(path).map_err(MountError::SourceUnavailable)?;
                if !meta.is_dir() {
                    return Err(MountError::FormatInvalid(format!(
                        "{} is not a directory",
                        path.display()
                    )));
                }
                Ok(Box::new(DirFs::new(path, path.display().to_string())))
            }
        }
    }
}

impl fmt::Debug for MountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Une source et son point de montage (`""` = racine).
#[derive(Debug, Clone)]
pub struct MountEntry {
    pub source: MountSource,
    pub mount_point: String,
}

impl MountEntry {
    pub fn at_root(source: MountSource) -> Self {
        MountEntry {
            source,
            mount_point: String::new(),
        }
    }

    pub fn at(source: MountSource, mount_point: impl Into<String>) -> Self {
        MountEntry {
            source,
            mount_point: mount_point.into(),
        }
    }
}

impl From<MountSource> for MountEntry {
    fn from(source: MountSource) -> Self {
        MountEntry::at_root(source)
    }
}

/// Liste ordonnée des sources, par priorité croissante.
#[derive(Debug, Clone, Default)]
pub struct MountOrder {
    entries: Vec<MountEntry>,
}

impl MountOrder {
    pub fn new() -> Self {
        MountOrder::default()
    }

    /// Ajoute une source à la racine, au-dessus des précédentes.
    pub fn push(&mut self, source: MountSource) -> &mut Self {
        self.entries.push(MountEntry::at_root(source));
        self
    }

    pub fn push_at(&mut self, source: MountSource, mount_point: impl Into<String>) -> &mut Self {
        self.entries.push(MountEntry::at(source, mount_point));
        self
    }

    pub fn push_entry(&mut self, entry: MountEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MountEntry> {
        self.entries.iter()
    }
}

impl<E: Into<MountEntry>> FromIterator<E> for MountOrder {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        MountOrder {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for MountOrder {
    type Item = MountEntry;
    type IntoIter = std::vec::IntoIter<MountEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Résultat du montage d'une source.
#[derive(Debug)]
pub enum MountOutcome {
    Mounted { source: String },
    Failed { source: String, error: MountError },
}

impl MountOutcome {
    pub fn source(&self) -> &str {
        match self {
            MountOutcome::Mounted { source } | MountOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MountOutcome::Failed { .. })
    }
}

/// Namespace construit + journal de chaque tentative, dans l'ordre de montage.
#[derive(Default)]
pub struct Resolution {
    pub vfs: Vfs,
    pub outcomes: Vec<MountOutcome>,
}

impl Resolution {
    pub fn failures(&self) -> impl Iterator<Item = &MountOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn mounted_count(&self) -> usize {
        self.vfs.len()
    }
}

/// Monte chaque source de `order` dans un nouveau VFS.
///
/// Un échec est enregistré et la source suivante est tentée quand même ; les
/// sources déjà montées ne sont jamais touchées. Ne journalise rien.
pub fn resolve(order: MountOrder) -> Resolution {
    let mut resolution = Resolution {
        vfs: Vfs::new(),
        outcomes: Vec::with_capacity(order.len()),
    };

    for entry in order {
        let source = entry.source.describe();

        let mounted = normalize(&entry.mount_point)
            .map_err(|_| MountError::InvalidMountPoint(entry.mount_point.clone()))
            .and_then(|prefix| Ok((prefix, entry.source.open()?)));

        match mounted {
            Ok((prefix, fs)) => {
                resolution.vfs.mount(prefix, fs);
                resolution.outcomes.push(MountOutcome::Mounted { source });
            }
            Err(error) => resolution
                .outcomes
                .push(MountOutcome::Failed { source, error }),
        }
    }

    resolution
}
