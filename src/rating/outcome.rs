//! Set outcome resolution by majority vote

use crate::error::TrackerError;

/// Return the entry that won the most games.
///
/// With an even number of games two players can tie; the tied player listed
/// first takes the set.
pub fn resolve_set_winner<T>(game_winners: &[T]) -> crate::error::Result<T>
where
    T: PartialEq + Clone,
{
    let mut tallies: Vec<(&T, usize)> = Vec::new();
    for winner in game_winners {
        match tallies.iter_mut().find(|(candidate, _)| *candidate == winner) {
            Some((_, count)) => *count += 1,
            None => tallies.push((winner, 1)),
        }
    }

    // Strict comparison keeps the earliest candidate on ties
    let mut best: Option<(&T, usize)> = None;
    for (candidate, count) in tallies {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }

    best.map(|(winner, _)| winner.clone())
        .ok_or_else(|| TrackerError::invalid_input("cannot resolve a set with no games").into())
}
