//! `bin2src` : transforme un fichier binaire quelconque en source compilable.
//!
//! La sortie déclare un tableau d'octets nommé `<symbol>` et une constante
//! `<symbol>_size` contenant le nombre total d'octets lus. Elle est destinée à
//! être incluse telle quelle dans le programme hôte (`include!` en Rust,
//! compilation directe en C).

mod decode;
mod encoder;
mod error;

pub use decode::*;
pub use encoder::*;
pub use error::*;
