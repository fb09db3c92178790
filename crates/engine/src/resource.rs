use std::fmt;

/// Result of a call to an external collaborator (typically an HTTP request).
///
/// A `Failure` is a normal, non-exceptional outcome: the request completed
/// but the server answered with a non-success status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure { status: u16, body: String },
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure { status, body } => Outcome::Failure { status, body },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Loading,
    Success,
    Error,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of one asynchronous operation as seen by a screen.
///
/// Only an `Error` carries a message, and a `Success` always carries data.
/// `Loading` and `Error` may retain the last known value so the screen does
/// not have to clear itself while a refresh is in flight or after it failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsyncResource<T> {
    Loading { data: Option<T> },
    Success { data: T },
    Error { message: String, data: Option<T> },
}

impl<T> AsyncResource<T> {
    pub fn loading() -> Self {
        Self::Loading { data: None }
    }

    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            data: None,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Loading { .. } => Status::Loading,
            Self::Success { .. } => Status::Success,
            Self::Error { .. } => Status::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loading { data } | Self::Error { data, .. } => data.as_ref(),
            Self::Success { data } => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Loading { data } | Self::Error { data, .. } => data,
            Self::Success { data } => Some(data),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// `true` for `Success` and `Error`, the states that end a run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AsyncResource<U> {
        match self {
            Self::Loading { data } => AsyncResource::Loading { data: data.map(f) },
            Self::Success { data } => AsyncResource::Success { data: f(data) },
            Self::Error { message, data } => AsyncResource::Error {
                message,
                data: data.map(f),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_error_has_a_message() {
        assert_eq!(AsyncResource::<u8>::loading().message(), None);
        assert_eq!(AsyncResource::success(1u8).message(), None);
        assert_eq!(AsyncResource::<u8>::error("boom").message(), Some("boom"));
    }

    #[test]
    fn error_can_retain_data() {
        let resource = AsyncResource::Error {
            message: "offline".to_string(),
            data: Some(vec![1, 2]),
        };
        assert_eq!(resource.status(), Status::Error);
        assert_eq!(resource.data(), Some(&vec![1, 2]));
        assert!(resource.is_terminal());
    }

    #[test]
    fn map_keeps_status_and_message() {
        let mapped = AsyncResource::Error {
            message: "offline".to_string(),
            data: Some(2),
        }
        .map(|v| v * 10);
        assert_eq!(mapped.message(), Some("offline"));
        assert_eq!(mapped.into_data(), Some(20));

        let loading = AsyncResource::<i32>::loading().map(|v| v + 1);
        assert!(loading.is_loading());
        assert_eq!(loading.data(), None);
    }

    #[test]
    fn outcome_map_preserves_failure() {
        let failure: Outcome<i32> = Outcome::Failure {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            failure.map(|v| v + 1),
            Outcome::Failure {
                status: 500,
                body: "boom".to_string()
            }
        );
        assert!(Outcome::Success(1).is_success());
    }
}
