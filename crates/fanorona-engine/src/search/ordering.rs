//! Move ordering for the root and interior nodes.

use fanorona_core::Move;

use crate::search::heuristics::HistoryTable;

/// Order interior moves: the remembered best action first, then by
/// capture count (weighted well above any history score) and history.
pub(crate) fn sort_moves(moves: &mut [Move], tt_action: i32, history: &HistoryTable) {
    moves.sort_by_key(|mv| {
        if mv.action as i32 == tt_action {
            i64::MIN
        } else {
            -(mv.victims.len() as i64 * 1000 + history.score(mv) as i64)
        }
    });
}

/// First-iteration root order: biggest captures first.
pub(crate) fn sort_root_initial(moves: &mut [Move]) {
    moves.sort_by(|a, b| b.victims.len().cmp(&a.victims.len()));
}

/// Later-iteration root order: last iteration's best move in front,
/// the rest by capture count.
pub(crate) fn sort_root_fronting(moves: &mut [Move], last_best: u16) {
    moves.sort_by_key(|mv| {
        if mv.action == last_best {
            (0, 0)
        } else {
            (1, -(mv.victims.len() as i64))
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{sort_moves, sort_root_fronting, sort_root_initial};
    use crate::search::heuristics::HistoryTable;
    use fanorona_core::{Position, generate_moves};

    #[test]
    fn root_initial_puts_big_captures_first() {
        let mut moves = generate_moves(&Position::starting());
        sort_root_initial(&mut moves);
        for pair in moves.windows(2) {
            assert!(pair[0].victims.len() >= pair[1].victims.len());
        }
    }

    #[test]
    fn fronting_moves_best_to_front() {
        let mut moves = generate_moves(&Position::starting());
        sort_root_fronting(&mut moves, 530);
        assert_eq!(moves[0].action, 530);
        for pair in moves[1..].windows(2) {
            assert!(pair[0].victims.len() >= pair[1].victims.len());
        }
    }

    #[test]
    fn tt_action_beats_captures() {
        let history = HistoryTable::new();
        let mut moves = generate_moves(&Position::starting());
        // 170 takes one piece; 241 takes two, but 170 is the remembered best.
        sort_moves(&mut moves, 170, &history);
        assert_eq!(moves[0].action, 170);
        assert_eq!(moves[1].victims.len(), 2);
    }
}
