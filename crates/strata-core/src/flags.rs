//! Input-processing flags for fields.

use std::fmt;

/// How a field participates in input processing.
///
/// Flags govern only the input phase: whether the field must appear in the
/// input document and what happens when it does not. They do not affect
/// checkpointing — every field is persisted regardless of flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFlag {
    /// Must be assigned by input (or carry a default); otherwise input
    /// processing fails with the field's full path.
    Required,
    /// May be assigned by input; falls back to the field's default value.
    Optional,
    /// May appear any number of times under one catalog key, or not at all.
    /// Absence of the whole group is legal; present entries keep sibling
    /// name uniqueness and insertion order like any other child.
    OptionalNonunique,
    /// Not assignable from input. Skipped entirely during input processing;
    /// the value is owned by the simulation (initial state, derived data).
    NoWrite,
}

impl InputFlag {
    /// Human-readable label, used in error messages and tree outlines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::OptionalNonunique => "optional-nonunique",
            Self::NoWrite => "no-write",
        }
    }

    /// Whether input processing may assign this field at all.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::NoWrite)
    }
}

impl fmt::Display for InputFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_write_rejects_input() {
        assert!(InputFlag::Required.accepts_input());
        assert!(InputFlag::Optional.accepts_input());
        assert!(InputFlag::OptionalNonunique.accepts_input());
        assert!(!InputFlag::NoWrite.accepts_input());
    }

    #[test]
    fn labels_are_distinct() {
        let labels = [
            InputFlag::Required.label(),
            InputFlag::Optional.label(),
            InputFlag::OptionalNonunique.label(),
            InputFlag::NoWrite.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
