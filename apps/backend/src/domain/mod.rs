//! Pure draft rules: snake ordering and the auto-pick ranking.
//!
//! Nothing here touches the store or the clock; the room and the lifecycle
//! service feed these functions durable state and act on the result.

use crate::store::{CatalogMovie, PickSlot};


/// Team order for a given 1-based round: the base permutation on odd rounds,
/// its exact reverse on even rounds.
pub fn snake_order(base: &[i64], round: i32) -> Vec<i64> {
    if round % 2 == 0 {
        base.iter().rev().copied().collect()
    } else {
        base.to_vec()
    }
}

/// Build the full pick sequence for a draft: `rounds` snake rounds over the
/// base order, pick numbers contiguous from 1.
pub fn build_pick_sequence(team_ids: &[i64], rounds: u32) -> Vec<PickSlot> {
    let mut slots = Vec::with_capacity(team_ids.len() * rounds as usize);
    let mut pick_number = 1;
    for round in 1..=rounds as i32 {
        for team_id in snake_order(team_ids, round) {
            slots.push(PickSlot {
                round,
                pick_number,
                team_id,
            });
            pick_number += 1;
        }
    }
    slots
}

/// Auto-pick ranking: highest budget wins, ties broken by lowest movie id so
/// identical inputs always select the same movie.
pub fn best_available(catalog: &[CatalogMovie]) -> Option<&CatalogMovie> {
    catalog
        .iter()
        .max_by_key(|movie| (movie.budget, std::cmp::Reverse(movie.id)))
}
