/// Errors of the renderer.
///
/// They are reported before any buffer is written.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `(actual, expected)`
    #[error("Validation Error: {0} should be {1}")]
    Validation(String, String),
}

#[cfg(test)]
mod tests {
    #[test]
    fn message() {
        use super::*;

        let error = Error::Validation("The vertex index (3)".into(), "in [0, 3)".into());
        assert_eq!(
            error.to_string(),
            "Validation Error: The vertex index (3) should be in [0, 3)"
        );
    }
}
