use std::fmt;

use heck::ToSnakeCase;

/// A naming convention is a pure function from logical names to column (and
/// table) names. Conventions are pluggable; generation only ever calls
/// [`apply`](Self::apply).
#[derive(Clone, Copy)]
pub struct NamingConvention {
    name: &'static str,
    transform: fn(&str) -> String,
}

impl NamingConvention {
    /// `upVotes` -> `up_votes`, `Votes` -> `votes`.
    pub const SNAKE_CASE: Self = Self {
        name: "snake_case",
        transform: to_snake,
    };

    /// Logical names pass through unchanged.
    pub const AS_IS: Self = Self {
        name: "as_is",
        transform: as_is,
    };

    pub const fn custom(name: &'static str, transform: fn(&str) -> String) -> Self {
        Self { name, transform }
    }

    pub fn apply(&self, logical: &str) -> String {
        (self.transform)(logical)
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::SNAKE_CASE
    }
}

impl fmt::Debug for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamingConvention").field(&self.name).finish()
    }
}

fn to_snake(logical: &str) -> String {
    logical.to_snake_case()
}

fn as_is(logical: &str) -> String {
    logical.to_string()
}
