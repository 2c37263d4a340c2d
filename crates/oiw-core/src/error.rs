#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
