//! Property-based tests for the scoring engine.

use proptest::prelude::*;

use dki::adjust::apply_delta;
use dki::aggregate::{rank_totals, weighted_total};
use dki::constants::*;
use dki::types::{
    Answer, ContextAnswers, Criterion, Polarity, ScoreVector, Stage3Response, WeightingProfile,
};
use dki::validator::{validate_responses, AbortReason};
use dki::weighting::select_weighting;

/// Strategy: a valid score vector (each score 1-6).
fn scores_strategy() -> impl Strategy<Value = [i32; CRITERION_COUNT]> {
    prop::array::uniform5(SCORE_MIN..=SCORE_MAX)
}

/// Strategy: a non-negative weighting profile.
fn profile_strategy() -> impl Strategy<Value = [f64; CRITERION_COUNT]> {
    prop::array::uniform5(0.0..5.0f64)
}

/// Strategy: a criterion.
fn criterion_strategy() -> impl Strategy<Value = Criterion> {
    (0..CRITERION_COUNT).prop_map(|i| Criterion::ALL[i])
}

/// Strategy: a stage-3 answer.
fn answer_strategy() -> impl Strategy<Value = Answer> {
    prop_oneof![Just(Answer::Yes), Just(Answer::No), Just(Answer::Unsure)]
}

fn responses(answers: &[Answer]) -> Vec<Stage3Response> {
    answers
        .iter()
        .enumerate()
        .map(|(i, &answer)| Stage3Response {
            question: i as u32 + 1,
            answer,
        })
        .collect()
}

proptest! {
    // 1. Any sequence of deltas keeps every score inside [1, 6]
    #[test]
    fn adjusted_scores_stay_in_range(
        start in scores_strategy(),
        deltas in prop::collection::vec((criterion_strategy(), -10..=10i32), 0..40),
    ) {
        let mut s = ScoreVector(start);
        for (c, d) in deltas {
            apply_delta(&mut s, c, d);
            prop_assert!(s.is_in_range(), "scores={:?}", s.0);
        }
    }

    // 2. Weighting selection is a pure function of the three context answers
    #[test]
    fn weighting_deterministic(a in any::<bool>(), b in any::<bool>(), c in any::<bool>()) {
        let ctx = ContextAnswers::new(a, b, c);
        prop_assert_eq!(select_weighting(ctx), select_weighting(ctx));
    }

    // 3. Regulated industry with any other context flag always selects weighting3
    #[test]
    fn regulated_with_other_flag_is_weighting3(a in any::<bool>(), b in any::<bool>()) {
        prop_assume!(a || b);
        let w = select_weighting(ContextAnswers::new(a, b, true));
        prop_assert_eq!(w.as_str(), "weighting3");
    }

    // 4. The unsure budget: more than two "not sure" answers always abort,
    //    and the abort records exactly the answers up to the third one
    #[test]
    fn excessive_unsure_aborts(answers in prop::collection::vec(answer_strategy(), 1..20)) {
        let total = answers.len();
        let unsure = answers.iter().filter(|a| **a == Answer::Unsure).count();
        match validate_responses(total, responses(&answers)) {
            Ok(kept) => {
                prop_assert!(unsure <= MAX_UNSURE_ANSWERS);
                prop_assert_eq!(kept.len(), total);
                let definite = total - unsure;
                prop_assert!(definite as f64 >= MIN_DEFINITE_RATIO * total as f64);
            }
            Err(abort) => match abort.reason {
                AbortReason::ExcessiveUnsure => {
                    prop_assert!(unsure > MAX_UNSURE_ANSWERS);
                    let last = abort.responses.last().map(|r| r.answer);
                    prop_assert_eq!(last, Some(Answer::Unsure));
                    let seen = abort.responses.iter().filter(|r| r.answer == Answer::Unsure).count();
                    prop_assert_eq!(seen, MAX_UNSURE_ANSWERS + 1);
                }
                AbortReason::InsufficientDefinite { definite, total: t } => {
                    prop_assert_eq!(t, total);
                    prop_assert!((definite as f64) < MIN_DEFINITE_RATIO * total as f64);
                }
                AbortReason::Incomplete { .. } => {
                    prop_assert!(false, "a full answer sheet was reported incomplete");
                }
            },
        }
    }

    // 5. Nine questions with at most two "not sure" answers never abort
    #[test]
    fn nine_questions_two_unsure_pass(
        definite in prop::collection::vec(any::<bool>(), 9),
        unsure_positions in prop::collection::btree_set(0..9usize, 0..=2),
    ) {
        let answers: Vec<Answer> = (0..9)
            .map(|i| {
                if unsure_positions.contains(&i) {
                    Answer::Unsure
                } else if definite[i] {
                    Answer::Yes
                } else {
                    Answer::No
                }
            })
            .collect();
        prop_assert!(validate_responses(9, responses(&answers)).is_ok());
    }

    // 6. A scheme that is at least as good on every criterion, polarity
    //    considered, ranks at least as high
    #[test]
    fn dominance_preserved(
        base in scores_strategy(),
        bumps in prop::array::uniform5(0..=5i32),
        weights in profile_strategy(),
    ) {
        let worse = ScoreVector(base);
        let mut better = worse;
        for c in Criterion::ALL {
            let d = bumps[c.index()];
            let d = match c.polarity() {
                Polarity::Direct => d,
                Polarity::Inverted => -d,
            };
            apply_delta(&mut better, c, d);
        }
        let profile = WeightingProfile(weights);
        let totals = [weighted_total(&worse, &profile), weighted_total(&better, &profile)];
        prop_assert!(totals[1] >= totals[0]);
        // Ties keep catalog order, so only a strict win reorders.
        let order = rank_totals(&totals);
        if totals[1] > totals[0] {
            prop_assert_eq!(order, vec![1, 0]);
        } else {
            prop_assert_eq!(order, vec![0, 1]);
        }
    }

    // 7. Changing the weight of an inverted criterion cannot change the gap
    //    between two schemes with equal raw scores on it
    #[test]
    fn inverted_weight_irrelevant_when_equal(
        a in scores_strategy(),
        b in scores_strategy(),
        weights in profile_strategy(),
        new_weight in 0.0..5.0f64,
        inverted in prop_oneof![Just(Criterion::D), Just(Criterion::E)],
    ) {
        let mut b = b;
        b[inverted.index()] = a[inverted.index()];
        let (a, b) = (ScoreVector(a), ScoreVector(b));
        let p1 = WeightingProfile(weights);
        let mut p2 = p1;
        p2.0[inverted.index()] = new_weight;
        let gap1 = weighted_total(&a, &p1) - weighted_total(&b, &p1);
        let gap2 = weighted_total(&a, &p2) - weighted_total(&b, &p2);
        prop_assert!((gap1 - gap2).abs() < 1e-9, "gap1={gap1} gap2={gap2}");
        if gap1.abs() > 1e-6 {
            prop_assert_eq!(gap1 > 0.0, gap2 > 0.0);
        }
    }

    // 8. Ranking is a permutation, sorted by descending total
    #[test]
    fn ranking_sorted_permutation(totals in prop::collection::vec(-100.0..100.0f64, 0..12)) {
        let order = rank_totals(&totals);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..totals.len()).collect::<Vec<_>>());
        for w in order.windows(2) {
            prop_assert!(totals[w[0]] >= totals[w[1]]);
            if totals[w[0]] == totals[w[1]] {
                prop_assert!(w[0] < w[1]);
            }
        }
    }

    // 9. Weighted totals are bounded by the weight sum times the score range
    #[test]
    fn total_bounded(scores in scores_strategy(), weights in profile_strategy()) {
        let profile = WeightingProfile(weights);
        let sum: f64 = weights.iter().sum();
        let total = weighted_total(&ScoreVector(scores), &profile);
        prop_assert!(total >= sum * SCORE_MIN as f64 - 1e-9);
        prop_assert!(total <= sum * SCORE_MAX as f64 + 1e-9);
    }
}
