//! Static position evaluation.

use fanorona_core::{CELL_VALUE, Position};

/// Score a position from the side to move's perspective.
///
/// Material dominates at 100 points per piece, with a small positional
/// term favoring the center and the strong intersections. When ahead
/// with a single enemy piece left, an attraction term pulls the army
/// toward it so the search does not shuffle in won endgames.
pub(crate) fn evaluate(pos: &Position) -> i32 {
    let my_count = pos.my().count() as i32;
    let opp_count = pos.opp().count() as i32;
    let mut score = (my_count - opp_count) * 100;
    for cell in pos.my() {
        score += CELL_VALUE[cell.index()];
    }
    for cell in pos.opp() {
        score -= CELL_VALUE[cell.index()];
    }
    if my_count > opp_count
        && opp_count == 1
        && let Some(target) = pos.opp().first()
    {
        let mut distance = 0;
        for cell in pos.my() {
            distance += cell.manhattan(target);
        }
        score -= distance * 2;
    }
    score
}
