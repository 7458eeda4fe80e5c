use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("missing required credential: set {0}")]
    MissingCredential(String),

    #[error("unknown model family '{0}': expected resnet, dino, or clip")]
    UnknownFamily(String),

    #[error("invalid unit spec '{0}': expected <layer>:<index>")]
    InvalidUnitSpec(String),

    #[error("invalid unit mode '{0}': expected all, random, or manual")]
    InvalidUnitMode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
