use super::RawSubmission;

/// Answers that qualify a lead for the Techo Propio housing bonus.
const QUALIFYING_ANSWERS: [&str; 4] = ["si", "si", "no", "no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityVerdict {
    Qualified,
    Unqualified,
}

/// Exact, case-sensitive match on all four answers. Missing answers fail.
pub fn evaluate(submission: &RawSubmission) -> EligibilityVerdict {
    let qualified = submission
        .answers()
        .iter()
        .zip(QUALIFYING_ANSWERS)
        .all(|(given, expected)| *given == Some(expected));

    if qualified {
        EligibilityVerdict::Qualified
    } else {
        EligibilityVerdict::Unqualified
    }
}
