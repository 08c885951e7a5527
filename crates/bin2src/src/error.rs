use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("opening {path:?} failed")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed")]
    ReadFailed(#[source] std::io::Error),

    #[error("write failed")]
    WriteFailed(#[source] std::io::Error),

    #[error("{0:?} is not a valid identifier")]
    InvalidSymbol(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn cause_is_reported_once() {
        let err = EncodeError::OpenFailed {
            path: PathBuf::from("missing.bin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(err.to_string(), "opening \"missing.bin\" failed");
        assert_eq!(err.source().unwrap().to_string(), "no such file");

        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chain.matches("no such file").count(), 1);
    }
}
