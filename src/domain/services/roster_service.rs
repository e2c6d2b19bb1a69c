//! Roster service - validates and orders the participants of a new game.

use std::collections::HashSet;

use rand::Rng;

use crate::domain::entities::{Player, PlayerColor, PALETTE};
use crate::domain::errors::ValidationError;
use crate::domain::services::normalize_player_name;

/// Fewest players a game can start with
pub const MIN_PLAYERS: usize = 2;
/// Most players a game can start with (one per palette color)
pub const MAX_PLAYERS: usize = PALETTE.len();

/// Build a roster from raw names and their colors, keeping input order.
///
/// Names are trimmed. The lower size bound is the caller's responsibility;
/// a seat past the end of the palette without an explicit color fails with
/// `RosterSize`. A seat without a color gets the palette color at its
/// position, and two seats never share a color.
pub fn build_roster<S: AsRef<str>>(
    names: &[S],
    colors: &[PlayerColor],
) -> Result<Vec<Player>, ValidationError> {
    let mut seen = HashSet::with_capacity(names.len());
    let mut used_colors = HashSet::with_capacity(names.len());
    let mut roster = Vec::with_capacity(names.len());

    for (position, raw) in names.iter().enumerate() {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { position });
        }
        if !seen.insert(normalize_player_name(name)) {
            return Err(ValidationError::DuplicateName {
                name: name.to_string(),
            });
        }

        let color = match colors.get(position) {
            Some(color) => *color,
            None => PlayerColor::for_seat(position).ok_or(ValidationError::RosterSize {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: names.len(),
            })?,
        };
        if !used_colors.insert(color) {
            return Err(ValidationError::DuplicateColor(color.as_str().to_string()));
        }
        roster.push(Player::new(name, color));
    }

    Ok(roster)
}

/// Rotate the roster by a uniformly chosen offset in `[0, n)`.
///
/// Relative turn order is preserved; only the first player changes.
pub fn randomize_start_order<R: Rng + ?Sized>(mut roster: Vec<Player>, rng: &mut R) -> Vec<Player> {
    if roster.len() > 1 {
        let offset = rng.gen_range(0..roster.len());
        roster.rotate_left(offset);
    }
    roster
}
