use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

/// Construit une archive zip en mémoire. Les noms finissant par `/` sont des dossiers.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}
