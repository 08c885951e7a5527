//! Compresse `builtin/` en archive zip puis l'encode avec `bin2src` dans
//! `$OUT_DIR/builtin_data.rs`, inclus par `src/builtin.rs`.

use std::{
    env,
    fs::File,
    io::{self, Seek, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

const SYMBOL: &str = "builtin_data";

fn add_dir<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    base: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {dir:?}"))?
        .collect::<io::Result<Vec<_>>>()?;
    // ordre stable : même binaire pour les mêmes fichiers
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = path
            .strip_prefix(base)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if path.is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
            add_dir(zip, base, &path, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut f = File::open(&path).with_context(|| format!("failed to open {path:?}"))?;
            io::copy(&mut f, zip)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let builtin_dir = manifest_dir.join("builtin");

    println!("cargo:rerun-if-changed={}", builtin_dir.display());

    let zip_path = out_dir.join("builtin_data.zip");
    let mut zip = ZipWriter::new(File::create(&zip_path)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    if builtin_dir.is_dir() {
        add_dir(&mut zip, &builtin_dir, &builtin_dir, options)?;
    }
    zip.finish()?;

    let rs_path = out_dir.join("builtin_data.rs");
    bin2src::encode_file(SYMBOL, &zip_path, &rs_path, bin2src::Language::Rust)
        .with_context(|| format!("bin2src failed on {zip_path:?}"))?;

    Ok(())
}
