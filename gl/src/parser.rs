//! Intention parser
//!
//! Turns a typed block into goal-tagged intentions, one per non-blank line:
//!
//! ```text
//! 1) run 5k
//! 2,1) call mom about the garden
//! -) clean the flat
//! ```
//!
//! Everything before the first `)` is a comma-separated list of goal codes.
//! Scanning stops at the first token that is not a number, which leaves the
//! line without goals. A number that does not name a loaded goal rejects the
//! whole block.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::domain::{GoalTable, Intention};

/// Why a block of text was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: no goal prefix, expected `<codes>) <intention>` but got {text:?}")]
    MissingSeparator { line: usize, text: String },

    #[error("line {line}: invalid goal code {code:?} ({available} goals loaded)")]
    InvalidGoalCode { line: usize, code: String, available: usize },

    #[error("no intentions entered")]
    NoIntentions,
}

/// Parse `text` into intentions for `day`
///
/// Either every line parses or nothing is returned. Positions follow line order.
pub fn parse_intentions(goals: &GoalTable, text: &str, day: NaiveDate) -> Result<Vec<Intention>, ParseError> {
    debug!(goal_count = goals.len(), %day, "parse_intentions: called");
    let mut intentions = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        let Some((prefix, _body)) = line.split_once(')') else {
            debug!(line_no, "parse_intentions: missing separator");
            return Err(ParseError::MissingSeparator {
                line: line_no,
                text: line.to_string(),
            });
        };

        let mut goal_ids = Vec::new();
        for token in prefix.split(',').map(str::trim) {
            let Ok(code) = token.parse::<i64>() else {
                // non-numeric code: the line has no goals
                goal_ids.clear();
                break;
            };
            let goal = goals.by_code(code).ok_or_else(|| ParseError::InvalidGoalCode {
                line: line_no,
                code: token.to_string(),
                available: goals.len(),
            })?;
            goal_ids.push(goal.id);
        }

        let mut intention = Intention::new(line, day).with_goals(goal_ids);
        intention.position = intentions.len() as i64;
        intentions.push(intention);
    }

    if intentions.is_empty() {
        return Err(ParseError::NoIntentions);
    }
    debug!(count = intentions.len(), "parse_intentions: parsed");
    Ok(intentions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, GoalId};
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn goals(n: i64) -> GoalTable {
        GoalTable::new(
            (1..=n)
                .map(|i| Goal {
                    id: GoalId(100 + i),
                    name: format!("goal {i}"),
                    description: String::new(),
                    number: i,
                    color: String::new(),
                    archived: false,
                    created_at: 0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_parses_codes_in_order() {
        let parsed = parse_intentions(&goals(2), "1) buy milk\n2,1) call mom", day()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].goals, vec![GoalId(101)]);
        assert_eq!(parsed[1].goals, vec![GoalId(102), GoalId(101)]);
        assert_eq!(parsed[1].content, "2,1) call mom");
        assert!(parsed.iter().all(|i| i.day == day()));
        assert_eq!(parsed.iter().map(|i| i.position).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_duplicate_codes_are_kept() {
        let parsed = parse_intentions(&goals(2), "2, 2 ) twice", day()).unwrap();
        assert_eq!(parsed[0].goals, vec![GoalId(102), GoalId(102)]);
    }

    #[test]
    fn test_non_numeric_prefix_means_no_goal() {
        let parsed = parse_intentions(&goals(2), "foo) no goal here", day()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].goals.is_empty());
    }

    #[test]
    fn test_non_numeric_token_clears_earlier_codes() {
        let parsed = parse_intentions(&goals(2), "1,x,2) mixed", day()).unwrap();
        assert!(parsed[0].goals.is_empty());
    }

    #[test]
    fn test_empty_prefix_means_no_goal() {
        let parsed = parse_intentions(&goals(1), ") tidy up", day()).unwrap();
        assert!(parsed[0].goals.is_empty());
    }

    #[test]
    fn test_out_of_range_code_fails_whole_block() {
        let err = parse_intentions(&goals(2), "1) fine\n3) out of range", day()).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidGoalCode {
                line: 2,
                code: "3".to_string(),
                available: 2
            }
        );
    }

    #[test]
    fn test_zero_and_negative_codes_are_invalid() {
        assert!(matches!(
            parse_intentions(&goals(2), "0) nothing", day()),
            Err(ParseError::InvalidGoalCode { .. })
        ));
        assert!(matches!(
            parse_intentions(&goals(2), "-1) nothing", day()),
            Err(ParseError::InvalidGoalCode { .. })
        ));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_intentions(&goals(2), "no-paren-here", day()).unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator { line: 1, .. }));
    }

    #[test]
    fn test_blank_input_has_no_intentions() {
        assert_eq!(parse_intentions(&goals(2), "\n\n", day()), Err(ParseError::NoIntentions));
        assert_eq!(parse_intentions(&goals(2), "   \n\t", day()), Err(ParseError::NoIntentions));
    }

    #[test]
    fn test_blank_lines_skipped_and_lines_trimmed() {
        let parsed = parse_intentions(&goals(1), "\n   1) run  \n\n", day()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].content, "1) run");
    }

    #[test]
    fn test_error_message_names_the_line() {
        let err = parse_intentions(&goals(1), "1) ok\nbroken", day()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    proptest! {
        #[test]
        fn prop_valid_codes_resolve_in_order(
            lines in prop::collection::vec((prop::collection::vec(1i64..=4, 0..4), "[a-z ]{1,12}"), 1..8)
        ) {
            let text: String = lines
                .iter()
                .map(|(codes, body)| {
                    let prefix = if codes.is_empty() {
                        "-".to_string()
                    } else {
                        codes.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
                    };
                    format!("{prefix}) {body}\n")
                })
                .collect();

            let parsed = parse_intentions(&goals(4), &text, day()).unwrap();
            prop_assert_eq!(parsed.len(), lines.len());
            for (intention, (codes, _)) in parsed.iter().zip(&lines) {
                let expected: Vec<GoalId> = codes.iter().map(|c| GoalId(100 + c)).collect();
                prop_assert_eq!(&intention.goals, &expected);
            }
        }
    }
}
