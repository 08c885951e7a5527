//! VFS en couches pour les assets du jeu.
//!
//! - `resolve` monte une liste ordonnée de sources (archive embarquée, archive
//!   sur disque, dossier) dans un seul espace de noms. Le dernier monté gagne.
//! - Un échec de montage est enregistré dans les `MountOutcome` et n'interrompt
//!   jamais la résolution.
//! - `AssetLoader` est la façade utilisée par le jeu pour ouvrir une resource par chemin.

mod archive;
mod assets;
mod config;
mod engine;
mod error;
mod fs;
mod mount;
mod path;

#[cfg(test)]
mod testing;

pub use archive::*;
pub use assets::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use fs::*;
pub use mount::*;
pub use path::*;
