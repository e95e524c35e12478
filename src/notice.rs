//! Transient user-facing messages raised by the controllers.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Maps a notice level to the alert class used by the view layer.
pub fn alert_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Error => "danger",
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_class_mappings() {
        assert_eq!(alert_class(NoticeLevel::Error), "danger");
        assert_eq!(alert_class(NoticeLevel::Success), "success");
        assert_eq!(alert_class(NoticeLevel::Info), "info");
    }
}
