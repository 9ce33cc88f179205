//! Stage 2: map the three organisational context answers to a weighting profile.
//!
//! The rule table is ordered and the first matching rule wins:
//!
//! | # | ctx1 | ctx2 | ctx3 | Profile |
//! |---|------|------|------|---------|
//! | 1 | no   | no   | no   | `weighting0` |
//! | 2 | yes  | no   | no   | `weighting1` |
//! | 3 | no   | yes  | no   | `weighting2` |
//! | 4 | no   | no   | yes  | `weighting3` |
//! | 5 | yes  | yes  | no   | `weighting2` |
//! | 6 | ctx1 or ctx2 | | yes | `weighting3` |
//! | 7 | yes  | yes  | yes  | `weighting3` |
//!
//! Rule 7 is subsumed by rule 6. Enumerating all eight triples shows every one
//! is matched, so selection is total and returns a profile rather than an `Option`.

use crate::types::{ContextAnswers, WeightingId};

/// Select the weighting profile for the given stage-2 answers.
pub fn select_weighting(context: ContextAnswers) -> WeightingId {
    let [ctx1, ctx2, ctx3] = context.0;
    match (ctx1, ctx2, ctx3) {
        (false, false, false) => WeightingId::Weighting0,
        (true, false, false) => WeightingId::Weighting1,
        (false, true, false) => WeightingId::Weighting2,
        (false, false, true) => WeightingId::Weighting3,
        (true, true, false) => WeightingId::Weighting2,
        (true, _, true) | (_, true, true) => WeightingId::Weighting3,
    }
}
