use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// User-visible outcome of a service round-trip. The UI drains these from the
/// store and renders them as toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Renders an error the way the original UI did: field messages line by line
/// for validation failures, the server's own message for conflicts, and the
/// generic localized fallback for everything else.
pub fn describe_api_error(fallback: &str, error: &ApiError) -> String {
    match error {
        ApiError::Validation { fields } if !fields.is_empty() => fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect::<Vec<_>>()
            .join("\n"),
        ApiError::Conflict { message } => message.clone(),
        _ => fallback.to_string(),
    }
}
