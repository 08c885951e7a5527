//! Archive `builtin/` compilée dans l'exécutable (voir `build.rs`).

use assets::MountSource;

include!(concat!(env!("OUT_DIR"), "/builtin_data.rs"));

pub const NAME: &str = "__builtin_data.zip";

pub fn source() -> MountSource {
    MountSource::embedded_with_size(NAME, builtin_data, builtin_data_size)
}
