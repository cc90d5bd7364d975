use serde::{Deserialize, Serialize};

/// Checks a generation pass runs around each implementor phase.
///
/// - `check_frame_bounds` validates literal frame facts before a windowed phase.
/// - `check_slot_ownership` rejects emitted code that touches another unit's slots,
///   and resets that leave a slot unassigned (reserving or pushing does not count).
///   Writes during the result phase are rejected regardless of this flag.
/// - `local_prefix` is prepended to locals the pass declares on behalf of implementors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Reject literal frames where `frame_start <= current_row <= frame_end` does not hold
    pub check_frame_bounds: bool,
    /// Scan each phase's statements for slots owned by other units; also gates the reset completeness check
    pub check_slot_ownership: bool,
    /// Prefix for locals the pass declares (result bindings)
    pub local_prefix: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self { check_frame_bounds: true, check_slot_ownership: true, local_prefix: "agg".to_string() }
    }
}

impl CodegenConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// All checks on, with an explicit local prefix.
    pub fn strict(local_prefix: &str) -> Self {
        Self {
            check_frame_bounds: true,
            check_slot_ownership: true,
            local_prefix: local_prefix.to_string(),
        }
    }

    /// No checks; for engines that validate plans elsewhere.
    pub fn relaxed(local_prefix: &str) -> Self {
        Self {
            check_frame_bounds: false,
            check_slot_ownership: false,
            local_prefix: local_prefix.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_from_json() {
        let cfg: CodegenConfig = serde_json::from_str(
            r#"{ "check_frame_bounds": false, "check_slot_ownership": true, "local_prefix": "w" }"#
        ).unwrap();
        assert!(!cfg.check_frame_bounds);
        assert_eq!(cfg.local_prefix, "w");
        assert_eq!(CodegenConfig::new(), CodegenConfig::strict("agg"));
    }
}
