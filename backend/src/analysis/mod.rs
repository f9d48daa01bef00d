//! Frequency tables over survey responses.
//!
//! Single-choice answers are counted verbatim, blank answers included.
//! Multi-choice answers are split on `;`, trimmed, and empty segments are
//! dropped. No case folding or synonym merging is done.

use crate::models::{AggregationResult, Histogram, RankedEntry, SurveyResponse};

/// Number of issues highlighted on the statistics page.
pub const TOP_ISSUES: usize = 3;

/// Build every frequency table in a single pass.
///
/// # Example
/// ```
/// use ecoweek::{aggregate, parse};
///
/// let text = "header\n2025-01-01,Always,Bike,Fix leaks;Shorter showers\n";
/// let result = aggregate(&parse(text));
///
/// assert_eq!(result.total_responses, 1);
/// assert_eq!(result.water_conservation_stats["Fix leaks"], 1);
/// assert_eq!(result.payment_willingness[""], 1);
/// ```
pub fn aggregate(records: &[SurveyResponse]) -> AggregationResult {
    let mut result = AggregationResult {
        total_responses: records.len() as u64,
        ..Default::default()
    };

    for r in records {
        count_single(&mut result.recycling_stats, &r.recycling_frequency);
        count_single(&mut result.transportation_stats, &r.transportation);
        count_single(&mut result.payment_willingness, &r.eco_friendly_payment);
        count_single(&mut result.container_willingness, &r.bring_own_container);
        count_multi(&mut result.water_conservation_stats, &r.water_conservation);
        count_multi(&mut result.environmental_issues, &r.environmental_issues);
    }

    result
}

fn count_single(histogram: &mut Histogram, value: &str) {
    *histogram.entry(value.to_string()).or_insert(0) += 1;
}

fn count_multi(histogram: &mut Histogram, value: &str) {
    for item in value.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        *histogram.entry(item.to_string()).or_insert(0) += 1;
    }
}

/// Rounded percentage, 0 when there is nothing to divide by.
pub fn percentage(value: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u32
}

/// Percentage with two decimals, `"0.00"` when there is nothing to divide by.
pub fn percentage_full(value: u64, total: u64) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    // Ties round up, so 3.125 reads as 3.13 rather than the half-even 3.12
    let hundredths = (value as f64 * 10_000.0 / total as f64).round();
    format!("{:.2}", hundredths / 100.0)
}

/// Histogram rows by descending count, ties broken by label.
pub fn ranked(histogram: &Histogram, total: u64) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = histogram
        .iter()
        .map(|(label, &count)| RankedEntry {
            label: label.clone(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    // BTreeMap iteration is already label-ordered and the sort is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// The `n` most reported environmental issues.
pub fn top_environmental_issues(result: &AggregationResult, n: usize) -> Vec<RankedEntry> {
    let mut top = ranked(&result.environmental_issues, result.total_responses);
    top.truncate(n);
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE: &str = "Timestamp,Recycling,Transport,Water,Payment,Issues,Container,Justify,Consent
2025-01-01,Always,Bike,Shorter showers;Fix leaks,Yes,Plastic waste;Climate change,Yes,Because,Yes
2025-01-02,Never,Car,,No,Plastic waste,No,,Yes";

    fn histogram(pairs: &[(&str, u64)]) -> Histogram {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_sample_aggregation() {
        let result = aggregate(&parse(SAMPLE));

        assert_eq!(result.total_responses, 2);
        assert_eq!(result.recycling_stats, histogram(&[("Always", 1), ("Never", 1)]));
        assert_eq!(
            result.water_conservation_stats,
            histogram(&[("Shorter showers", 1), ("Fix leaks", 1)])
        );
        assert_eq!(
            result.environmental_issues,
            histogram(&[("Plastic waste", 2), ("Climate change", 1)])
        );
        assert_eq!(result.container_willingness, histogram(&[("Yes", 1), ("No", 1)]));
        assert_eq!(result.transportation_stats, histogram(&[("Bike", 1), ("Car", 1)]));
        assert_eq!(result.payment_willingness, histogram(&[("Yes", 1), ("No", 1)]));
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[]);
        assert_eq!(result, AggregationResult::default());
    }

    #[test]
    fn test_blank_single_choice_counted_as_empty_key() {
        let result = aggregate(&parse("h\n2025-01-01,,Bus"));

        assert_eq!(result.recycling_stats, histogram(&[("", 1)]));
        assert_eq!(result.transportation_stats, histogram(&[("Bus", 1)]));
        assert!(result.water_conservation_stats.is_empty());
    }

    #[test]
    fn test_multi_choice_trims_and_drops_empty_segments() {
        let record = SurveyResponse {
            environmental_issues: " Plastic waste ;; ;Deforestation;".into(),
            ..Default::default()
        };
        let result = aggregate(&[record]);

        assert_eq!(
            result.environmental_issues,
            histogram(&[("Plastic waste", 1), ("Deforestation", 1)])
        );
    }

    #[test]
    fn test_no_case_folding() {
        let records = vec![
            SurveyResponse { transportation: "Bike".into(), ..Default::default() },
            SurveyResponse { transportation: "bike".into(), ..Default::default() },
        ];
        let result = aggregate(&records);

        assert_eq!(result.transportation_stats.len(), 2);
    }

    #[test]
    fn test_trailing_blank_line_not_counted() {
        let text = format!("{}\n\n", SAMPLE);
        assert_eq!(aggregate(&parse(&text)).total_responses, 2);
    }

    #[test]
    fn test_percentages() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage_full(1, 3), "33.33");
        assert_eq!(percentage_full(0, 0), "0.00");
        assert_eq!(percentage_full(1, 32), "3.13");
        assert_eq!(percentage_full(5, 32), "15.63");
        assert_eq!(percentage_full(32, 32), "100.00");
    }

    #[test]
    fn test_ranked_orders_by_count_then_label() {
        let h = histogram(&[("b", 1), ("a", 1), ("c", 5)]);
        let labels: Vec<_> = ranked(&h, 5).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_top_environmental_issues() {
        let result = aggregate(&parse(SAMPLE));
        let top = top_environmental_issues(&result, 1);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, "Plastic waste");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].percentage, 100);
    }

    fn row() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-zA-Z ;]{0,12}", 0..12).prop_map(|f| f.join(","))
    }

    proptest! {
        #[test]
        fn prop_totals_and_histogram_shape(rows in prop::collection::vec(row(), 0..25)) {
            let text = format!("header\n{}", rows.join("\n"));
            let non_blank = rows.iter().filter(|r| !r.trim().is_empty()).count() as u64;
            let result = aggregate(&parse(&text));

            prop_assert_eq!(result.total_responses, non_blank);

            for single in [
                &result.recycling_stats,
                &result.transportation_stats,
                &result.payment_willingness,
                &result.container_willingness,
            ] {
                prop_assert_eq!(single.values().sum::<u64>(), result.total_responses);
            }

            for multi in [&result.water_conservation_stats, &result.environmental_issues] {
                for key in multi.keys() {
                    prop_assert!(!key.is_empty());
                    prop_assert_eq!(key.trim(), key.as_str());
                }
            }
        }

        #[test]
        fn prop_aggregate_is_idempotent(rows in prop::collection::vec(row(), 0..10)) {
            let text = format!("header\n{}", rows.join("\n"));
            prop_assert_eq!(aggregate(&parse(&text)), aggregate(&parse(&text)));
        }
    }
}
