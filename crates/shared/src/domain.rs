use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(SessionId);

/// Selection pool a session is currently working with.
///
/// The jar keeps its items for the whole session. The wheel is a transient
/// list of options that is reset when the session leaves wheel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Jar,
    Wheel,
}

impl Mode {
    /// Smallest pool a draw is offered for.
    pub fn minimum_items(self) -> usize {
        match self {
            Mode::Jar => 1,
            Mode::Wheel => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Jar => "jar",
            Mode::Wheel => "wheel",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("jar") => Ok(Mode::Jar),
            s if s.eq_ignore_ascii_case("wheel") => Ok(Mode::Wheel),
            other => Err(format!("unknown mode '{other}', expected 'jar' or 'wheel'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Drawing,
    Showing,
}
