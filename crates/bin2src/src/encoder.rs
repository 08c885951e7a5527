use std::{
    fs::File,
    io::{BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use crate::EncodeError;

/// Taille des blocs lus dans l'entrée. N'influence pas la sortie.
pub const CHUNK_SIZE: usize = 4096;

/// Nombre de littéraux par ligne.
pub const BYTES_PER_ROW: usize = 8;

const RUST_KEYWORDS: &[&str] = &[
    // stricts
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
    // réservés
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
];

/// Dialecte du fragment généré.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    /// `pub static <sym>: &[u8]` + `pub const <sym>_size: usize`, à utiliser avec `include!`.
    #[default]
    Rust,
    /// `const unsigned char <sym>[]` + `size_t <sym>_size`.
    C,
}

impl Language {
    fn header(self) -> &'static str {
        match self {
            Language::Rust => "// @generated by bin2src, do not edit.\n",
            Language::C => "#include <stddef.h>\n",
        }
    }

    fn opener(self, symbol: &str) -> String {
        match self {
            Language::Rust => {
                format!("#[allow(non_upper_case_globals)]\npub static {symbol}: &[u8] = &[\n")
            }
            Language::C => format!("const unsigned char {symbol}[] = {{\n"),
        }
    }

    fn closer(self, total: u64) -> &'static str {
        match self {
            Language::Rust => "];\n",
            // ISO C refuse un initialiseur vide : un élément bidon, `_size` reste à 0
            Language::C if total == 0 => "0 /* empty */\n};\n",
            Language::C => "};\n",
        }
    }

    fn size_decl(self, symbol: &str, total: u64) -> String {
        match self {
            Language::Rust => format!(
                "#[allow(non_upper_case_globals)]\npub const {symbol}_size: usize = {total};\n"
            ),
            Language::C => format!("size_t {symbol}_size = {total};\n\n"),
        }
    }

    fn is_keyword(self, ident: &str) -> bool {
        match self {
            Language::Rust => RUST_KEYWORDS.contains(&ident),
            Language::C => C_KEYWORDS.contains(&ident),
        }
    }
}

/// Vérifie que `symbol` est un identifiant utilisable dans `language`.
pub fn is_valid_symbol(symbol: &str, language: Language) -> bool {
    let mut chars = symbol.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && symbol != "_"
        && !language.is_keyword(symbol)
}

/// Regroupe les littéraux par lignes de `BYTES_PER_ROW`.
/// L'état de la ligne courante survit entre deux blocs lus.
struct RowWriter<W: Write> {
    out: W,
    pending: usize,
}

impl<W: Write> RowWriter<W> {
    fn new(out: W) -> Self {
        RowWriter { out, pending: 0 }
    }

    fn push(&mut self, byte: u8) -> std::io::Result<()> {
        if self.pending > 0 {
            self.out.write_all(b" ")?;
        }
        write!(self.out, "0x{byte:02x},")?;

        self.pending += 1;
        if self.pending == BYTES_PER_ROW {
            self.out.write_all(b"\n")?;
            self.pending = 0;
        }
        Ok(())
    }

    /// Termine la dernière ligne incomplète, s'il y en a une.
    fn finish_row(&mut self) -> std::io::Result<()> {
        if self.pending > 0 {
            self.out.write_all(b"\n")?;
            self.pending = 0;
        }
        Ok(())
    }

    fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn into_inner(self) -> W {
        self.out
    }
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<(), EncodeError> {
    out.write_all(text.as_bytes())
        .map_err(EncodeError::WriteFailed)
}

/// Encodeur configurable. `encode` en est le raccourci usuel.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    language: Language,
    chunk_size: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new(Language::default())
    }
}

impl Encoder {
    pub fn new(language: Language) -> Self {
        Encoder {
            language,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Change la taille des blocs lus (minimum 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Lit `input` jusqu'à la fin et écrit le fragment dans `output`.
    /// Retourne le nombre d'octets lus, égal à la valeur de `<symbol>_size`.
    pub fn encode<R: Read, W: Write>(
        &self,
        symbol: &str,
        mut input: R,
        output: W,
    ) -> Result<u64, EncodeError> {
        if !is_valid_symbol(symbol, self.language) {
            return Err(EncodeError::InvalidSymbol(symbol.to_string()));
        }

        let mut rows = RowWriter::new(output);
        emit(rows.get_mut(), self.language.header())?;
        emit(rows.get_mut(), &self.language.opener(symbol))?;

        let mut buf = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            let read = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(EncodeError::ReadFailed(e)),
            };

            for &byte in &buf[..read] {
                rows.push(byte).map_err(EncodeError::WriteFailed)?;
            }
            total += read as u64;
        }

        rows.finish_row().map_err(EncodeError::WriteFailed)?;

        let mut out = rows.into_inner();
        emit(&mut out, self.language.closer(total))?;
        emit(&mut out, &self.language.size_decl(symbol, total))?;
        out.flush().map_err(EncodeError::WriteFailed)?;

        log::debug!("bin2src: encoded {total} bytes as `{symbol}`");
        Ok(total)
    }
}

/// Encode `input` sous le nom `symbol` dans `output`.
pub fn encode<R: Read, W: Write>(
    symbol: &str,
    input: R,
    output: W,
    language: Language,
) -> Result<u64, EncodeError> {
    Encoder::new(language).encode(symbol, input, output)
}

/// Variante fichier → fichier. Le fichier de sortie est créé ou tronqué.
/// Les deux handles sont fermés sur tous les chemins de sortie.
pub fn encode_file(
    symbol: &str,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    language: Language,
) -> Result<u64, EncodeError> {
    if !is_valid_symbol(symbol, language) {
        return Err(EncodeError::InvalidSymbol(symbol.to_string()));
    }

    let input = input.as_ref();
    let output = output.as_ref();

    let reader = File::open(input).map_err(|source| EncodeError::OpenFailed {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = File::create(output).map_err(|source| EncodeError::OpenFailed {
        path: output.to_path_buf(),
        source,
    })?;

    encode(symbol, reader, BufWriter::new(writer), language)
}
