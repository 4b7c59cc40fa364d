#![forbid(unsafe_code)]

pub mod calendar;

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct UserId(String);

    impl UserId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, UserIdError> {
            let value = value.into();
            validate_user_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum UserIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl UserIdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "user id must not be empty",
                Self::TooLong => "user id is too long (max 128 chars)",
                Self::InvalidFirstChar => "user id must start with an ASCII letter or digit",
                Self::InvalidChar { .. } => {
                    "user id may only contain ASCII letters, digits, '.', '_', '/' or '-'"
                }
            }
        }
    }

    fn validate_user_id(value: &str) -> Result<(), UserIdError> {
        if value.is_empty() {
            return Err(UserIdError::Empty);
        }
        if value.len() > 128 {
            return Err(UserIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(UserIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(UserIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '/' | '-') {
                continue;
            }
            return Err(UserIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod rollup {
    /// Share of completed tasks as a whole percentage, half-up rounding.
    /// A day with no tasks scores 0, not an error.
    pub fn achievement_rate(completed: usize, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        let rate = (completed * 200 + total) / (total * 2);
        rate.min(100) as u8
    }
}
