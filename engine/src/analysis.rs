//! Post-game review: grades every played move against the engine's choice.

use std::fmt;

use serde::Serialize;

use crate::board::Board;
use crate::difficulty::Difficulty;
use crate::dispatcher::AIEngine;
use crate::error::EngineError;
use crate::game::{Game, PlayedMove};
use crate::strategy::BotInput;
use crate::types::{Mark, Position};

pub const REVIEW_DIFFICULTY: Difficulty = Difficulty::Expert;
pub const REVIEW_THINKING_TIME_MS: u64 = 5000;

const GOOD_MOVE_QUALITY: f64 = 0.8;
const MISTAKE_QUALITY: f64 = 0.5;
const BLUNDER_QUALITY: f64 = 0.2;
const TOP_MISTAKES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveReview {
    pub move_number: usize,
    pub player: Mark,
    pub actual: Position,
    pub best: Position,
    pub is_best_move: bool,
    pub quality: f64,
    pub evaluation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mistake {
    pub move_number: usize,
    pub player: Mark,
    pub played: Position,
    pub better_move: Position,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accuracy {
    pub x: f64,
    pub o: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    pub moves: Vec<MoveReview>,
    pub mistakes: Vec<Mistake>,
    pub accuracy: Accuracy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveAnalysis {
    pub quality: f64,
    pub is_best_move: bool,
    pub best_move: Position,
    pub evaluation: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Expert,
    Advanced,
    Intermediate,
    Beginner,
    Novice,
}

impl Rating {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 0.9 {
            Rating::Expert
        } else if accuracy >= 0.7 {
            Rating::Advanced
        } else if accuracy >= 0.5 {
            Rating::Intermediate
        } else if accuracy >= 0.3 {
            Rating::Beginner
        } else {
            Rating::Novice
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rating::Expert => "Expert",
            Rating::Advanced => "Advanced",
            Rating::Intermediate => "Intermediate",
            Rating::Beginner => "Beginner",
            Rating::Novice => "Novice",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_moves: usize,
    pub mistakes: usize,
    pub accuracy_x: String,
    pub accuracy_o: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameReport {
    pub summary: ReportSummary,
    pub rating: Rating,
    pub top_mistakes: Vec<Mistake>,
    pub recommendations: Vec<String>,
}

/// 1.0 for the engine's own move; otherwise shrinks as the position gets sharper.
pub fn move_quality(actual: Position, best: Position, best_evaluation: f64) -> f64 {
    if actual == best {
        return 1.0;
    }
    (0.5 - best_evaluation.abs() * 0.1).max(0.0)
}

fn mistake_reason(quality: f64) -> &'static str {
    if quality < BLUNDER_QUALITY {
        "Very weak move, the advantage slips away"
    } else if quality < MISTAKE_QUALITY {
        "Weak move, a better option exists"
    } else {
        "Average move"
    }
}

fn move_suggestion(quality: f64) -> &'static str {
    if quality >= 0.9 {
        "Excellent move!"
    } else if quality >= 0.7 {
        "Good move"
    } else if quality >= 0.5 {
        "Average move"
    } else if quality >= 0.3 {
        "Weak move, consider other options"
    } else {
        "Very weak move, look for a better one"
    }
}

/// Replays `moves` from an empty board, reviewing each one before it is played.
pub fn analyze_game(
    engine: &mut AIEngine,
    moves: &[PlayedMove],
    size: usize,
    win_count: usize,
) -> Result<GameAnalysis, EngineError> {
    let mut game = Game::new(size, win_count)?;
    let mut reviews = Vec::with_capacity(moves.len());
    let mut mistakes = Vec::new();
    let mut totals = [0usize; 2];
    let mut good = [0usize; 2];

    for (index, played) in moves.iter().enumerate() {
        let mut input = game.bot_input()?;
        let best = engine.select_move(&mut input, REVIEW_DIFFICULTY, REVIEW_THINKING_TIME_MS)?;
        game.place_mark(played.mark, played.position)?;

        let best_position = best.position();
        let quality = move_quality(played.position, best_position, best.evaluation);
        let move_number = index + 1;
        let side = usize::from(played.mark == Mark::O);

        totals[side] += 1;
        if quality >= GOOD_MOVE_QUALITY {
            good[side] += 1;
        }

        if quality < MISTAKE_QUALITY {
            mistakes.push(Mistake {
                move_number,
                player: played.mark,
                played: played.position,
                better_move: best_position,
                reason: mistake_reason(quality).to_string(),
            });
        }

        reviews.push(MoveReview {
            move_number,
            player: played.mark,
            actual: played.position,
            best: best_position,
            is_best_move: played.position == best_position,
            quality,
            evaluation: best.evaluation,
        });
    }

    let share = |side: usize| {
        if totals[side] == 0 {
            0.0
        } else {
            good[side] as f64 / totals[side] as f64
        }
    };

    crate::log_debug!(
        "Reviewed {} moves, {} mistakes",
        reviews.len(),
        mistakes.len()
    );

    Ok(GameAnalysis {
        moves: reviews,
        mistakes,
        accuracy: Accuracy {
            x: share(0),
            o: share(1),
        },
    })
}

/// Grades a single candidate move for `player` on `board`.
pub fn analyze_move(
    engine: &mut AIEngine,
    board: &Board,
    win_count: usize,
    position: Position,
    player: Mark,
) -> Result<MoveAnalysis, EngineError> {
    let mut input = BotInput::new(board.clone(), win_count, player)?;
    let best = engine.select_move(&mut input, REVIEW_DIFFICULTY, REVIEW_THINKING_TIME_MS)?;
    let best_move = best.position();
    let quality = move_quality(position, best_move, best.evaluation);

    Ok(MoveAnalysis {
        quality,
        is_best_move: position == best_move,
        best_move,
        evaluation: best.evaluation,
        suggestion: move_suggestion(quality).to_string(),
    })
}

pub fn generate_report(analysis: &GameAnalysis) -> GameReport {
    let accuracy = analysis.accuracy;
    let mut recommendations = Vec::new();

    if accuracy.x < 0.5 || accuracy.o < 0.5 {
        recommendations.push("Take more time to think each move through".to_string());
    }
    if analysis.mistakes.len() > 3 {
        recommendations.push("Try to anticipate your opponent's replies".to_string());
    }
    if analysis.mistakes.iter().any(|mistake| mistake.move_number <= 3) {
        recommendations.push("Focus on a stronger opening".to_string());
    }

    GameReport {
        summary: ReportSummary {
            total_moves: analysis.moves.len(),
            mistakes: analysis.mistakes.len(),
            accuracy_x: format!("{:.1}%", accuracy.x * 100.0),
            accuracy_o: format!("{:.1}%", accuracy.o * 100.0),
        },
        rating: Rating::from_accuracy((accuracy.x + accuracy.o) / 2.0),
        top_mistakes: analysis.mistakes.iter().take(TOP_MISTAKES).cloned().collect(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn engine() -> AIEngine {
        AIEngine::from_config(&EngineConfig {
            seed: Some(3),
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn moves(list: &[(Mark, usize, usize)]) -> Vec<PlayedMove> {
        list.iter()
            .map(|&(mark, row, col)| PlayedMove {
                mark,
                position: Position::new(row, col),
            })
            .collect()
    }

    #[test]
    fn test_move_quality() {
        let a = Position::new(0, 0);
        let b = Position::new(1, 1);
        assert_eq!(move_quality(a, a, 50.0), 1.0);
        assert_eq!(move_quality(a, b, 0.0), 0.5);
        assert!((move_quality(a, b, -2.0) - 0.3).abs() < 1e-9);
        assert_eq!(move_quality(a, b, 100.0), 0.0);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_accuracy(0.95), Rating::Expert);
        assert_eq!(Rating::from_accuracy(0.7), Rating::Advanced);
        assert_eq!(Rating::from_accuracy(0.5), Rating::Intermediate);
        assert_eq!(Rating::from_accuracy(0.3), Rating::Beginner);
        assert_eq!(Rating::from_accuracy(0.1), Rating::Novice);
    }

    #[test]
    fn test_missed_win_is_mistake() {
        let mut engine = engine();
        // X can finish the top row on move 5 but plays elsewhere.
        let played = moves(&[
            (Mark::X, 0, 0),
            (Mark::O, 1, 0),
            (Mark::X, 0, 1),
            (Mark::O, 1, 1),
            (Mark::X, 2, 2),
        ]);
        let analysis = analyze_game(&mut engine, &played, 3, 3).unwrap();
        assert_eq!(analysis.moves.len(), 5);

        let last = &analysis.moves[4];
        assert_eq!(last.best, Position::new(0, 2));
        assert!(!last.is_best_move);
        assert_eq!(last.quality, 0.0);

        let mistake = analysis.mistakes.iter().find(|m| m.move_number == 5).unwrap();
        assert_eq!(mistake.better_move, Position::new(0, 2));
        assert_eq!(mistake.player, Mark::X);
    }

    #[test]
    fn test_illegal_move_list_fails() {
        let mut engine = engine();
        let played = moves(&[(Mark::X, 0, 0), (Mark::X, 1, 1)]);
        assert!(matches!(
            analyze_game(&mut engine, &played, 3, 3),
            Err(EngineError::NotYourTurn { .. })
        ));
    }

    #[test]
    fn test_report_summary() {
        let analysis = GameAnalysis {
            moves: Vec::new(),
            mistakes: (1..=5)
                .map(|move_number| Mistake {
                    move_number,
                    player: Mark::X,
                    played: Position::new(0, 0),
                    better_move: Position::new(1, 1),
                    reason: mistake_reason(0.1).to_string(),
                })
                .collect(),
            accuracy: Accuracy { x: 0.25, o: 1.0 },
        };
        let report = generate_report(&analysis);
        assert_eq!(report.summary.accuracy_x, "25.0%");
        assert_eq!(report.summary.accuracy_o, "100.0%");
        assert_eq!(report.rating, Rating::Intermediate);
        assert_eq!(report.top_mistakes.len(), 3);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_analyze_single_move() {
        let mut engine = engine();
        let board = Board::parse("XX./OO./...").unwrap();
        let best = analyze_move(&mut engine, &board, 3, Position::new(0, 2), Mark::X).unwrap();
        assert!(best.is_best_move);
        assert_eq!(best.quality, 1.0);
        assert_eq!(best.suggestion, "Excellent move!");

        let weak = analyze_move(&mut engine, &board, 3, Position::new(2, 2), Mark::X).unwrap();
        assert!(!weak.is_best_move);
        assert_eq!(weak.best_move, Position::new(0, 2));
    }
}
