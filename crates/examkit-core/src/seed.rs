//! Seed construction for per-student content ordering.
//!
//! A seed is a plain string built from stable identifiers. The question-order
//! shuffle for a student uses `exam::student`; each option shuffle appends the
//! question id so no two shuffles share a stream.

/// Delimiter placed between identifier segments.
pub const SEED_DELIMITER: &str = "::";

/// Seed for the exam-level question order of one student.
pub fn build_student_exam_seed(exam_id: &str, student_id: &str) -> String {
    format!("{exam_id}{SEED_DELIMITER}{student_id}")
}

/// Seed for the option order of one question as seen by one student.
pub fn build_question_seed(exam_id: &str, student_id: &str, question_id: &str) -> String {
    format!("{exam_id}{SEED_DELIMITER}{student_id}{SEED_DELIMITER}{question_id}")
}

/// Hash a seed string to a 32-bit generator state (FNV-1a).
///
/// Not a security primitive: collisions are tolerated.
pub fn hash_string_to_seed(s: &str) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    let mut hash = FNV_OFFSET;
    for b in s.as_bytes() {
        hash = (hash ^ u32::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}
