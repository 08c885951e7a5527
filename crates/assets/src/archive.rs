use std::{
    collections::{HashMap, HashSet},
    io::{Cursor, Read, Seek},
    sync::{Mutex, PoisonError},
};

use zip::{ZipArchive, result::ZipError};

use crate::{FileSystem, LookupError, normalize};

/// Pré-allocation maximale par entrée. La taille annoncée dans l'en-tête d'une
/// archive externe n'est pas fiable.
const MAX_PREALLOC: usize = 1 << 20;

/// Archive zip montée comme source en lecture seule.
///
/// L'index des entrées est construit au montage ; le lecteur sous-jacent
/// (fichier ou blob en mémoire) reste ouvert jusqu'à la destruction du VFS.
pub struct ZipFs<R> {
    name: String,
    archive: Mutex<ZipArchive<R>>,
    /// chemin normalisé -> nom brut de l'entrée dans l'archive
    files: HashMap<String, String>,
    dirs: HashSet<String>,
}

impl<R: Read + Seek + Send + 'static> ZipFs<R> {
    /// Lit le répertoire central de l'archive.
    pub fn new(reader: R, name: impl Into<String>) -> Result<Self, ZipError> {
        let archive = ZipArchive::new(reader)?;

        let mut files = HashMap::new();
        let mut dirs = HashSet::from([String::new()]);

        let raw_names: Vec<String> = archive.file_names().map(str::to_string).collect();
        for raw in raw_names {
            // entrées avec `..` ou chemin absolu Windows : ignorées
            let Ok(norm) = normalize(&raw) else {
                continue;
            };
            if norm.is_empty() {
                continue;
            }

            let mut parent = norm.as_str();
            while let Some((p, _)) = parent.rsplit_once('/') {
                dirs.insert(p.to_string());
                parent = p;
            }

            if raw.ends_with('/') {
                dirs.insert(norm);
            } else {
                files.insert(norm, raw);
            }
        }

        Ok(ZipFs {
            name: name.into(),
            archive: Mutex::new(archive),
            files,
            dirs,
        })
    }

    /// Nombre de fichiers (hors dossiers) dans l'archive.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl<R: Read + Seek + Send + 'static> FileSystem for ZipFs<R> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, LookupError> {
        let Some(raw) = self.files.get(path) else {
            return Err(LookupError::NotFound(path.to_string()));
        };

        let io_error = |error: std::io::Error| LookupError::Io {
            path: path.to_string(),
            error,
        };

        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entry = archive.by_name(raw).map_err(|e| match e {
            ZipError::FileNotFound => LookupError::NotFound(path.to_string()),
            ZipError::Io(e) => io_error(e),
            other => io_error(std::io::Error::other(other)),
        })?;

        let announced = usize::try_from(entry.size()).unwrap_or(MAX_PREALLOC);
        let mut data = Vec::with_capacity(announced.min(MAX_PREALLOC));
        entry.read_to_end(&mut data).map_err(io_error)?;

        Ok(Box::new(Cursor::new(data)))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
