//! Lesson error types

use thiserror::Error;

use crate::catalog::StageKey;
use crate::host::HostError;

/// Errors from lesson commands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LessonError {
    #[error("Unknown chapter: {0}")]
    UnknownChapter(u32),

    #[error("Unknown stage {stage} in chapter {chapter}")]
    UnknownStage { chapter: u32, stage: u32 },

    #[error("Stage {key} is not complete yet")]
    StageIncomplete { key: StageKey },

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(LessonError::UnknownChapter(9).to_string(), "Unknown chapter: 9");
        let err = LessonError::StageIncomplete {
            key: StageKey::new(2, 3),
        };
        assert_eq!(err.to_string(), "Stage 2.3 is not complete yet");
    }

    #[test]
    fn test_from_host_error() {
        let err: LessonError = HostError::Unavailable("3D view".to_string()).into();
        assert!(matches!(err, LessonError::Host(_)));
        assert!(err.to_string().contains("3D view"));
    }
}
