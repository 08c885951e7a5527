use crate::LookupError;

/// Normalise un chemin du VFS : séparateur `/`, relatif à la racine.
///
/// Un `/` initial, les composants vides et `.` sont ignorés. `..`, `\`, `:`
/// et NUL sont refusés, un dossier monté ne peut donc pas être quitté.
/// La racine est la chaîne vide.
pub fn normalize(path: &str) -> Result<String, LookupError> {
    let mut parts = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(LookupError::InvalidPath(path.to_string())),
            c if c.contains(['\\', ':', '\0']) => {
                return Err(LookupError::InvalidPath(path.to_string()));
            }
            c => parts.push(c),
        }
    }

    Ok(parts.join("/"))
}

/// Chemin restant sous `prefix`, ou `None` si `path` n'est pas dans ce sous-arbre.
/// Les deux chemins doivent déjà être normalisés.
pub(crate) fn strip_mount_point<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    if path == prefix {
        return Some("");
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}
