use tictactoe_engine::strategy::{PerfectStrategy, Strategy};
use tictactoe_engine::win_detector::check_win_from_move;
use tictactoe_engine::{Board, BotInput, Mark, SessionRng};

#[derive(Default)]
struct Tally {
    games: usize,
    losses: usize,
}

/// Walks every line of opponent play against the strategy.
fn explore(strategy: &mut PerfectStrategy, board: &mut Board, ai: Mark, to_move: Mark, tally: &mut Tally) {
    if to_move == ai {
        let mut input = BotInput::new(board.clone(), 3, ai).unwrap();
        let choice = strategy.select_move(&mut input, 0).unwrap();
        board.place(choice.position, ai);
        if check_win_from_move(board, choice.position, 3).is_some() || board.empty_count() == 0 {
            tally.games += 1;
        } else {
            explore(strategy, board, ai, ai.opponent().unwrap(), tally);
        }
        board.clear(choice.position);
        return;
    }

    for pos in board.available_moves() {
        board.place(pos, to_move);
        if check_win_from_move(board, pos, 3).is_some() {
            tally.games += 1;
            tally.losses += 1;
        } else if board.empty_count() == 0 {
            tally.games += 1;
        } else {
            explore(strategy, board, ai, ai, tally);
        }
        board.clear(pos);
    }
}

#[test]
fn test_perfect_never_loses_as_x() {
    let mut strategy = PerfectStrategy::new(SessionRng::new(17));
    let mut board = Board::new(3).unwrap();
    let mut tally = Tally::default();
    explore(&mut strategy, &mut board, Mark::X, Mark::X, &mut tally);
    assert!(tally.games > 0);
    assert_eq!(tally.losses, 0);
}

#[test]
fn test_perfect_never_loses_as_o() {
    for seed in [1, 2, 3] {
        let mut strategy = PerfectStrategy::new(SessionRng::new(seed));
        let mut board = Board::new(3).unwrap();
        let mut tally = Tally::default();
        explore(&mut strategy, &mut board, Mark::O, Mark::X, &mut tally);
        assert!(tally.games > 0);
        assert_eq!(tally.losses, 0, "seed {}", seed);
    }
}
