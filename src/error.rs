pub type PeaklineResult<T> = Result<T, PeaklineError>;

#[derive(thiserror::Error, Debug)]
pub enum PeaklineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PeaklineError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PeaklineError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            PeaklineError::resource("x")
                .to_string()
                .contains("resource error:")
        );
        assert!(
            PeaklineError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PeaklineError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
