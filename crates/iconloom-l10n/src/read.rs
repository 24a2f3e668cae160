//! Outcome of reading a single resource file

/// Result of a best-effort resource read.
///
/// Distinguishes a file that does not exist from one that exists but could
/// not be understood. Neither case is fatal to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRead<T> {
    /// The file existed and was parsed
    Loaded(T),
    /// No file at the given path
    NotFound,
    /// The file existed but could not be decoded or parsed
    Malformed(String),
}

impl<T> ResourceRead<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ResourceRead::Loaded(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceRead::NotFound)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ResourceRead::Malformed(_))
    }

    /// The parsed value, if any
    pub fn loaded(self) -> Option<T> {
        match self {
            ResourceRead::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The parsed value, or the type's empty value for missing/malformed files
    pub fn into_value_or_default(self) -> T
    where
        T: Default,
    {
        self.loaded().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_absent_and_malformed() {
        let missing: ResourceRead<Vec<u8>> = ResourceRead::NotFound;
        let broken: ResourceRead<Vec<u8>> = ResourceRead::Malformed("bad".to_string());
        assert!(missing.is_not_found());
        assert!(broken.is_malformed());
        assert!(missing.into_value_or_default().is_empty());
        assert!(broken.into_value_or_default().is_empty());
    }

    #[test]
    fn test_loaded_value() {
        let read = ResourceRead::Loaded(vec![1u8, 2]);
        assert!(read.is_loaded());
        assert_eq!(read.loaded(), Some(vec![1, 2]));
    }
}
