//! Best-effort label extraction from free-form model output.

use factline_types::{LabelSet, Verdict};

/// Return the first candidate that appears in `model_output`
/// (case-insensitive substring match, in caller order), or the raw output
/// unchanged when none does.
pub fn extract_label(model_output: &str, candidates: &[&str]) -> String {
    let haystack = model_output.to_lowercase();
    candidates
        .iter()
        .find(|label| haystack.contains(&label.to_lowercase()))
        .map(|label| label.to_string())
        .unwrap_or_else(|| model_output.to_string())
}

/// Extract a label and turn it into a [`Verdict`].
///
/// A matched candidate becomes `FakeNews` when it carries the fake marker
/// and `TrueNews` otherwise. No match yields `Unresolved` with the raw
/// output.
pub fn resolve_verdict(model_output: &str, labels: &LabelSet) -> Verdict {
    let candidates = labels.candidates();
    let label = extract_label(model_output, &candidates);

    if !candidates.contains(&label.as_str()) {
        tracing::warn!(
            output_len = model_output.len(),
            "model output matched no candidate label"
        );
        return Verdict::Unresolved(label);
    }

    Verdict::from_flag(labels.contains_fake_marker(&label))
}
