// ABOUTME: Container image reference parsing into repository and tag.
// ABOUTME: An absent tag stays absent; nothing defaults to "latest".

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

/// An image reference split into the repository to pull and an optional tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric()
                && c != '/'
                && c != ':'
                && c != '.'
                && c != '-'
                && c != '_'
                && c != '@'
            {
                return Err(ParseImageRefError::InvalidChar(c));
            }
        }

        // A colon followed by a path segment belongs to a registry port
        // (localhost:5000/app), not to a tag.
        let (repository, tag) = match input.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') && !before.contains('@') => {
                (before, Some(after))
            }
            _ => (input, None),
        };

        if repository.is_empty() || repository.ends_with('/') || tag == Some("") {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repository)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}

/// Split an image string into `(repository, tag)`.
pub fn parse_image(input: &str) -> Result<(String, Option<String>), ParseImageRefError> {
    let image = ImageRef::parse(input)?;
    Ok((image.repository, image.tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_kept_in_repository() {
        let img = ImageRef::parse("nginx@sha256:abc123").unwrap();
        assert_eq!(img.repository(), "nginx@sha256:abc123");
        assert!(img.tag().is_none());
    }

    #[test]
    fn trailing_colon_is_rejected() {
        assert!(matches!(
            ImageRef::parse("ubuntu:"),
            Err(ParseImageRefError::InvalidFormat(_))
        ));
    }
}
