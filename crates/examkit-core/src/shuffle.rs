//! Deterministic Fisher–Yates shuffling and per-student paper ordering.
//!
//! The algorithm works on any in-memory slice; the JSON form of an option
//! list is handled by [`shuffle_options_json`] only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ShuffleError;
use crate::model::QuestionRecord;
use crate::rng::SeededRng;
use crate::seed::{build_question_seed, build_student_exam_seed};

/// Return a shuffled copy of `items`, leaving the input untouched.
///
/// Consumes exactly `items.len() - 1` draws (none for 0 or 1 items).
pub fn shuffled_copy<T: Clone>(items: &[T], mut draw: impl FnMut() -> f64) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = ((draw() * (i + 1) as f64) as usize).min(i);
        out.swap(i, j);
    }
    out
}

/// Shuffle a JSON-encoded option array with a generator seeded from `seed`.
///
/// Elements are treated opaquely; their fields and key order are preserved.
pub fn shuffle_options_json(encoded_options: &str, seed: &str) -> Result<String, ShuffleError> {
    let options: Vec<Value> =
        serde_json::from_str(encoded_options).map_err(ShuffleError::Decode)?;
    let mut rng = SeededRng::new(seed);
    let shuffled = shuffled_copy(&options, || rng.next_f64());
    serde_json::to_string(&shuffled).map_err(ShuffleError::Encode)
}

/// Question order for one student, using the exam-level seed.
pub fn shuffle_questions_for_student<T: Clone>(
    exam_id: &str,
    student_id: &str,
    questions: &[T],
) -> Vec<T> {
    let mut rng = SeededRng::new(&build_student_exam_seed(exam_id, student_id));
    shuffled_copy(questions, || rng.next_f64())
}

/// A question placed on one student's paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedQuestion {
    /// Question identifier.
    pub question_id: String,
    /// 1-based position on the student's paper.
    pub position: usize,
    /// Options in the order this student sees them.
    pub options: Vec<Value>,
}

/// Build one student's paper: question order from the exam seed, option
/// order from each question's own seed.
pub fn personalize_paper(
    exam_id: &str,
    student_id: &str,
    questions: &[QuestionRecord],
) -> Vec<PersonalizedQuestion> {
    shuffle_questions_for_student(exam_id, student_id, questions)
        .into_iter()
        .enumerate()
        .map(|(idx, q)| {
            let mut rng = SeededRng::new(&build_question_seed(exam_id, student_id, &q.id));
            PersonalizedQuestion {
                options: shuffled_copy(&q.options, || rng.next_f64()),
                question_id: q.id,
                position: idx + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn sorted<T: Ord + Clone>(v: &[T]) -> Vec<T> {
        let mut v = v.to_vec();
        v.sort();
        v
    }

    fn question(id: &str, options: &[&str]) -> QuestionRecord {
        QuestionRecord {
            exam_id: "exam1".into(),
            id: id.into(),
            difficulty: Difficulty::Medium,
            text: String::new(),
            options: options
                .iter()
                .enumerate()
                .map(|(i, t)| serde_json::json!({"text": t, "isCorrect": i == 0}))
                .collect(),
        }
    }

    #[test]
    fn shuffled_copy_is_permutation_and_input_untouched() {
        let input: Vec<u32> = (0..50).collect();
        let snapshot = input.clone();
        let mut rng = SeededRng::new("exam1::student1");
        let out = shuffled_copy(&input, || rng.next_f64());
        assert_eq!(input, snapshot);
        assert_eq!(out.len(), input.len());
        assert_eq!(sorted(&out), input);
        assert_ne!(out, input);
    }

    #[test]
    fn shuffled_copy_consumes_len_minus_one_draws() {
        for len in 0..10usize {
            let items: Vec<usize> = (0..len).collect();
            let mut calls = 0usize;
            let _ = shuffled_copy(&items, || {
                calls += 1;
                0.5
            });
            assert_eq!(calls, len.saturating_sub(1), "len {len}");
        }
    }

    #[test]
    fn shuffled_copy_tolerates_draw_of_almost_one() {
        let items = vec!['a', 'b', 'c', 'd'];
        let out = shuffled_copy(&items, || 0.999_999_999_9);
        assert_eq!(sorted(&out), items);
    }

    #[test]
    fn shuffled_copy_single_and_empty() {
        let empty: Vec<i32> = Vec::new();
        assert!(shuffled_copy(&empty, || 0.3).is_empty());
        assert_eq!(shuffled_copy(&vec![7], || 0.3), vec![7]);
    }

    #[test]
    fn shuffled_copy_same_seed_same_order() {
        let items: Vec<u32> = (0..20).collect();
        let mut a = SeededRng::new("s");
        let mut b = SeededRng::new("s");
        assert_eq!(
            shuffled_copy(&items, || a.next_f64()),
            shuffled_copy(&items, || b.next_f64())
        );
    }

    #[test]
    fn options_json_is_byte_identical_across_calls() {
        let json = r#"[{"text":"A","isCorrect":true},{"text":"B","isCorrect":false},{"text":"C","isCorrect":false},{"text":"D","isCorrect":false}]"#;
        let first = shuffle_options_json(json, "exam1::student1::q1").unwrap();
        let second = shuffle_options_json(json, "exam1::student1::q1").unwrap();
        assert_eq!(first, second);

        let decoded: Vec<Value> = serde_json::from_str(&first).unwrap();
        assert_eq!(decoded.len(), 4);
    }

    #[test]
    fn options_json_preserves_unknown_fields_and_key_order() {
        let json = r#"[{"zeta":1,"text":"A","isCorrect":true},{"zeta":2,"text":"B","isCorrect":false}]"#;
        let out = shuffle_options_json(json, "seed").unwrap();
        assert!(out.contains(r#"{"zeta":1,"text":"A","isCorrect":true}"#));
        assert!(out.contains(r#"{"zeta":2,"text":"B","isCorrect":false}"#));
    }

    #[test]
    fn options_json_rejects_malformed_input() {
        let err = shuffle_options_json("[{\"text\": ", "seed").unwrap_err();
        assert!(err.is_decode());
        let err = shuffle_options_json(r#"{"text":"A"}"#, "seed").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn options_json_empty_array() {
        assert_eq!(shuffle_options_json("[]", "seed").unwrap(), "[]");
    }

    #[test]
    fn paper_is_stable_per_student() {
        let questions: Vec<QuestionRecord> = (1..=8)
            .map(|i| question(&format!("q{i}"), &["A", "B", "C", "D"]))
            .collect();
        let first = personalize_paper("exam1", "student1", &questions);
        let again = personalize_paper("exam1", "student1", &questions);
        let ids = |p: &[PersonalizedQuestion]| -> Vec<String> {
            p.iter().map(|q| q.question_id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&again));
        assert_eq!(first.iter().map(|q| q.position).collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());

        let mut all_ids = ids(&first);
        all_ids.sort();
        let mut expected: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        expected.sort();
        assert_eq!(all_ids, expected);
    }

    #[test]
    fn paper_options_match_json_adapter() {
        let questions = vec![question("q1", &["A", "B", "C", "D", "E"])];
        let paper = personalize_paper("exam1", "student9", &questions);
        let encoded = serde_json::to_string(&questions[0].options).unwrap();
        let via_json =
            shuffle_options_json(&encoded, &build_question_seed("exam1", "student9", "q1")).unwrap();
        assert_eq!(serde_json::to_string(&paper[0].options).unwrap(), via_json);
    }

    #[test]
    fn students_get_different_orders() {
        let questions: Vec<QuestionRecord> = (1..=12)
            .map(|i| question(&format!("q{i}"), &["A", "B"]))
            .collect();
        let orders: std::collections::HashSet<Vec<String>> = (0..10)
            .map(|s| {
                personalize_paper("exam1", &format!("student{s}"), &questions)
                    .into_iter()
                    .map(|q| q.question_id)
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1, "every student received the same order");
    }
}
