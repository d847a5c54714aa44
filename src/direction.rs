//! # Note Direction Codec
//!
//! Bidirectional mapping between the two engines' note ownership models.
//!
//! The flat format stores ownership absolutely: directions 0-3 belong to the
//! opponent and 4-7 to the player, always. The sectioned format stores
//! ownership relative to the enclosing section's `mustHitSection` flag: the
//! high bit (`stored >= 4`) is set exactly when the note's absolute owner
//! differs from the section's owner.
//!
//! The two functions here are deliberately not inverses of each other.
//! [`to_section_relative`] implements the encoding above. [`to_absolute`]
//! implements what the sectioned engine's own tooling does when flattening:
//! it discards the stored high bit and re-derives ownership purely from the
//! section flag, so every note in a must-hit section comes out as a player
//! note and every note elsewhere as an opponent note. A round trip through
//! both is therefore lossless only when the note's ownership already agreed
//! with its section's owner. [`Decoded::fidelity`] tags which branch was
//! taken so callers and tests can tell faithful round trips from normalized
//! ones.

/// Number of lanes per singer.
pub const LANES: i64 = 4;

/// Whether a flattened-format direction belongs to the player's lane set.
pub fn is_player_direction(direction: i64) -> bool {
    direction >= LANES
}

/// Encode an absolute direction for storage inside a section.
///
/// The stored high bit marks disagreement between the note's owner and the
/// section's owner. A total function over 0-7; callers validate the domain.
///
/// ```
/// use funkconv::direction::to_section_relative;
///
/// // Player note in a player (must-hit) section: ownership agrees, low lane.
/// assert_eq!(to_section_relative(4, true), 0);
/// // Opponent note in a player section: ownership disagrees, high lane.
/// assert_eq!(to_section_relative(0, true), 4);
/// ```
pub fn to_section_relative(direction: i64, is_call_section: bool) -> i64 {
    let lane = direction % LANES;
    let is_player_note = is_player_direction(direction);
    if is_player_note != is_call_section {
        lane + LANES
    } else {
        lane
    }
}

/// How faithfully a stored direction survived decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// The stored ownership agreed with the section owner; re-encoding the
    /// result for the same section reproduces the stored value.
    Exact,
    /// The stored high bit was discarded and ownership re-derived from the
    /// section flag alone; the original per-note ownership is lost.
    Normalized,
}

/// Result of decoding a stored direction back to the absolute model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub direction: i64,
    pub fidelity: Fidelity,
}

/// Decode a stored direction back to an absolute one, normalizing ownership
/// to the section owner.
///
/// This mirrors the flattening convention of the sectioned engine rather
/// than inverting [`to_section_relative`]: the high bit only signals that
/// normalization happened, via [`Fidelity::Normalized`].
pub fn to_absolute(stored: i64, is_call_section: bool) -> Decoded {
    let lane = stored % LANES;
    let direction = if is_call_section { lane + LANES } else { lane };
    let fidelity = if stored >= LANES {
        Fidelity::Normalized
    } else {
        Fidelity::Exact
    };
    Decoded {
        direction,
        fidelity,
    }
}
