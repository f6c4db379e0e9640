//! Lifecycle status shared by every persisted entity.
//!
//! Rows are never hard-deleted by the engine; they move through these states
//! instead. Only `active` rows participate in balance-affecting operations.

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntityStatus {
    #[default]
    Active,
    Suspended,
    Archived,
    Deleted,
    Locked,
    Pending,
}

impl EntityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
            Self::Locked => "locked",
            Self::Pending => "pending",
        }
    }

    /// Whether the row may fund or receive balance changes.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl TryFrom<&str> for EntityStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            "locked" => Ok(Self::Locked),
            "pending" => Ok(Self::Pending),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid entity status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_states() {
        for status in [
            EntityStatus::Active,
            EntityStatus::Suspended,
            EntityStatus::Archived,
            EntityStatus::Deleted,
            EntityStatus::Locked,
            EntityStatus::Pending,
        ] {
            assert_eq!(EntityStatus::try_from(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_state() {
        assert!(EntityStatus::try_from("enabled").is_err());
    }
}
