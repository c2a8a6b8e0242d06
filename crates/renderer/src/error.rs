/// Why graphics initialisation gave up for a window. Neither case is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("Graphics visual unavailable; 3D disabled")]
    ConfigUnavailable,
    #[error("Graphics context creation failed; 3D disabled")]
    ContextCreationFailed(CreationFailure),
}

/// How a context-creation attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreationFailure {
    /// The host returned no context at all.
    #[error("host returned no context")]
    NullHandle,
    /// The host reported errors out of band while the context was created.
    #[error("host rejected context creation: {}", .0.join("; "))]
    Rejected(Vec<String>),
}

impl InitError {
    pub fn creation_failure(&self) -> Option<&CreationFailure> {
        match self {
            InitError::ConfigUnavailable => None,
            InitError::ContextCreationFailed(failure) => Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_class() {
        assert!(InitError::ConfigUnavailable
            .to_string()
            .contains("visual unavailable"));
        let failed = InitError::ContextCreationFailed(CreationFailure::NullHandle);
        assert!(failed.to_string().contains("context creation failed"));
    }

    #[test]
    fn rejection_lists_host_errors() {
        let failure = CreationFailure::Rejected(vec!["BadMatch".into(), "BadValue".into()]);
        assert_eq!(
            failure.to_string(),
            "host rejected context creation: BadMatch; BadValue"
        );
    }
}
