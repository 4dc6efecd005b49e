//! Identifier newtypes shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Catalog player identifier
    PlayerId,
    i64
);
id_type!(
    /// Fantasy team identifier
    TeamId,
    i64
);
id_type!(
    /// Account identifier of a team owner
    UserId,
    i64
);
id_type!(
    /// League identifier
    LeagueId,
    i64
);
id_type!(
    /// Transfer offer identifier
    OfferId,
    u64
);
id_type!(
    /// Matchday (round) number
    MatchdayId,
    u32
);
