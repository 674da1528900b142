use consult_lens::analysis::{relevance::cosine, DocumentIndex, RelevanceScorer};
use proptest::prelude::*;

const BILL: &str = "Section 1. The board shall publish remuneration of every director. \
Section 2. Penalty for late filing of annual returns. \
Section 3. Shareholder meetings may be held online. \
Section 4. The board shall publish remuneration of every director.";

fn comment_words() -> impl Strategy<Value = String> {
    let vocabulary = prop::sample::select(vec![
        "board", "director", "penalty", "filing", "online", "meetings", "returns", "weather",
        "remuneration", "shareholder", "publish", "late", "annual", "fees",
    ]);
    prop::collection::vec(vocabulary, 0..12).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn scores_lie_in_unit_interval_and_best_is_first_argmax(text in comment_words()) {
        let index = DocumentIndex::build("Bill", BILL).unwrap();
        let result = RelevanceScorer::new(&index, 1.5).score_text(&text);
        prop_assert_eq!(result.per_section_scores.len(), index.len());
        for score in result.per_section_scores.values() {
            prop_assert!((0.0..=1.0).contains(score));
        }
        let best = result.best_section_id.unwrap();
        let top = result.per_section_scores[&best];
        prop_assert_eq!(top, result.score);
        for (id, score) in &result.per_section_scores {
            prop_assert!(*score <= top);
            if *id < best {
                prop_assert!(*score < top);
            }
        }
    }

    #[test]
    fn scaling_the_comment_vector_keeps_scores(text in comment_words(), factor in 0.01f64..100.0) {
        let index = DocumentIndex::build("Bill", BILL).unwrap();
        let scorer = RelevanceScorer::new(&index, 1.5);
        let vector = scorer.comment_vector(&text);
        let plain = scorer.score_vector(&vector);
        let scaled = scorer.score_vector(&vector.scaled(factor));
        for (id, score) in &plain.per_section_scores {
            prop_assert!((score - scaled.per_section_scores[id]).abs() < 1e-9);
        }
    }

    #[test]
    fn scoring_is_deterministic(text in comment_words()) {
        let index = DocumentIndex::build("Bill", BILL).unwrap();
        let scorer = RelevanceScorer::new(&index, 1.5);
        prop_assert_eq!(scorer.score_text(&text), scorer.score_text(&text));
    }
}

#[test]
fn duplicate_sections_tie_break_to_lowest_index() {
    let index = DocumentIndex::build("Bill", BILL).unwrap();
    let result = RelevanceScorer::new(&index, 1.5).score_text("board remuneration director");
    assert_eq!(result.best_section_id, Some(0));
    assert_eq!(result.per_section_scores[&0], result.per_section_scores[&3]);
}

#[test]
fn cosine_of_empty_vector_is_zero() {
    let index = DocumentIndex::build("Bill", BILL).unwrap();
    let empty = index.vectorize("weather");
    assert_eq!(cosine(&empty, &index.sections()[0].term_vector), 0.0);
}
