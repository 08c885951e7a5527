use std::num::ParseIntError;

/// Relit les littéraux hexadécimaux d'un fragment généré, dans l'ordre d'émission.
///
/// Seules les lignes de données (celles qui commencent par `0x`) sont lues, le
/// nom du symbole ne peut donc pas être confondu avec une valeur.
pub fn decode(source: &str) -> Result<Vec<u8>, ParseIntError> {
    let mut bytes = Vec::new();

    for line in source.lines().filter(|l| l.trim_start().starts_with("0x")) {
        for literal in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let hex = literal.trim_start_matches("0x");
            bytes.push(u8::from_str_radix(hex, 16)?);
        }
    }

    Ok(bytes)
}

/// Retourne la valeur de `<symbol>_size` déclarée dans le fragment.
pub fn parse_size(source: &str, symbol: &str) -> Option<u64> {
    let needle = format!("{symbol}_size");

    source.lines().find_map(|line| {
        let (decl, value) = line.split_once('=')?;
        if decl.split_whitespace().any(|w| w.trim_end_matches(':') == needle) {
            value.trim().trim_end_matches(';').trim().parse().ok()
        } else {
            None
        }
    })
}
