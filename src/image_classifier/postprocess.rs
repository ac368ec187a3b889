use crate::image_classifier::confidence::adjust_confidence;
use crate::image_classifier::interface::Prediction;
use crate::model_loader::metadata::LabelMetadata;

const DISTRIBUTION_TOLERANCE: f32 = 1e-3;

pub fn is_probability_distribution(values: &[f32]) -> bool {
    if values.is_empty() || !values.iter().all(|v| (0.0..=1.0).contains(v)) {
        return false;
    }
    let sum: f32 = values.iter().sum();
    (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE
}

/// Numerically stable softmax. `None` when the input is empty or the result is not finite.
pub fn softmax(values: &[f32]) -> Option<Vec<f32>> {
    if values.is_empty() {
        return None;
    }

    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    let probabilities: Vec<f32> = exps.iter().map(|e| e / sum).collect();

    if probabilities.iter().all(|p| p.is_finite()) {
        Some(probabilities)
    } else {
        None
    }
}

/// Best-effort normalization: keep a valid distribution, otherwise softmax,
/// otherwise the raw values.
pub fn normalize(values: Vec<f32>) -> Vec<f32> {
    if is_probability_distribution(&values) {
        return values;
    }
    softmax(&values).unwrap_or(values)
}

/// Descending by probability. Stable, so the lower index wins ties. NaN ranks last.
pub fn rank(probabilities: &[f32]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = probabilities
        .iter()
        .enumerate()
        .map(|(index, probability)| (index, f64::from(*probability)))
        .collect();

    let key = |p: f64| if p.is_nan() { f64::NEG_INFINITY } else { p };
    indexed.sort_by(|a, b| key(b.1).total_cmp(&key(a.1)));
    indexed
}

pub fn label_for(index: usize, labels: Option<&LabelMetadata>) -> String {
    labels
        .and_then(|metadata| metadata.label(index))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Class {}", index))
}

pub fn top_predictions(
    ranked: Vec<(usize, f64)>,
    top_k: usize,
    labels: Option<&LabelMetadata>,
) -> Vec<Prediction> {
    ranked
        .into_iter()
        .take(top_k)
        .map(|(index, probability)| Prediction {
            index,
            label: label_for(index, labels),
            probability: adjust_confidence(probability),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_is_kept() {
        let values = vec![0.1, 0.7, 0.2];
        assert!(is_probability_distribution(&values));
        assert_eq!(normalize(values.clone()), values);
    }

    #[test]
    fn test_logits_are_softmaxed() {
        let normalized = normalize(vec![1.0, 2.0, 3.0]);

        let sum: f32 = normalized.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(normalized[2] > normalized[1] && normalized[1] > normalized[0]);
        assert!((normalized[2] - 0.665_240_9).abs() < 1e-5);
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probabilities = softmax(&[1000.0, 1000.0]).unwrap();
        assert_eq!(probabilities, vec![0.5, 0.5]);
    }

    #[test]
    fn test_softmax_failure_falls_back_to_raw() {
        assert_eq!(softmax(&[]), None);
        assert_eq!(softmax(&[f32::INFINITY, 1.0]), None);

        let normalized = normalize(vec![f32::INFINITY, 1.0]);
        assert_eq!(normalized[0], f32::INFINITY);
        assert_eq!(normalized[1], 1.0);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranked = rank(&[0.25, 0.5, 0.25]);
        let order: Vec<usize> = ranked.iter().map(|(index, _)| *index).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_rank_puts_nan_last() {
        let ranked = rank(&[f32::NAN, 0.1, 0.9]);
        let order: Vec<usize> = ranked.iter().map(|(index, _)| *index).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_labels_fall_back_to_class_index() {
        let metadata = LabelMetadata::from_labels(vec!["Serous".to_string()]);

        assert_eq!(label_for(0, Some(&metadata)), "Serous");
        assert_eq!(label_for(3, Some(&metadata)), "Class 3");
        assert_eq!(label_for(0, None), "Class 0");
        assert_eq!(label_for(2, Some(&LabelMetadata::default())), "Class 2");
    }

    #[test]
    fn test_model_score_of_forty_percent_is_shown_unchanged() {
        let ranked = rank(&normalize(vec![0.4, 0.6]));

        let predictions = top_predictions(ranked, 2, None);

        assert_eq!(predictions[1].index, 0);
        assert_eq!(predictions[1].probability, f64::from(0.4_f32));
    }

    #[test]
    fn test_top_predictions_adjusts_confidence() {
        let ranked = rank(&[0.2, 0.55, 0.25]);

        let predictions = top_predictions(ranked, 2, None);

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].index, 1);
        assert_eq!(predictions[0].label, "Class 1");
        assert_eq!(predictions[0].probability, f64::from(0.55_f32));
        assert_eq!(predictions[1].index, 2);
        assert!((predictions[1].probability - 0.8125).abs() < 1e-6);
    }
}
