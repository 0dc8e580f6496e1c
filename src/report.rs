//! Summaries of recorded durations.
//!
//! A [`Report`] turns the contents of a [`DurationStore`] into one
//! [`TagSummary`] per tag, carrying the sample count and arithmetic mean. It
//! renders as plain text for terminals or as JSON for anything downstream.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::DurationError;
use crate::recorder::{DurationStore, mean_of};

/// Order in which tag summaries are listed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Tag name order.
    #[default]
    Default,
    /// Fastest mean first.
    Ascending,
    /// Slowest mean first.
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub order: SortOrder,
    /// Include every individual sample, not just the mean.
    pub verbose: bool,
}

impl ReportOptions {
    /// Parse options from JSON, e.g. `{"order": "descending", "verbose": true}`.
    pub fn from_json(text: &str) -> Result<Self, DurationError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_order(mut self, order: &str) -> Result<Self, DurationError> {
        self.order = SortOrder::from_str(order)?;
        Ok(self)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub samples: usize,
    pub mean_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<Vec<f64>>,
}

impl TagSummary {
    fn build(tag: &str, samples: Vec<f64>, verbose: bool) -> Result<Self, DurationError> {
        let mean_seconds = mean_of(tag, &samples)?;
        Ok(Self {
            tag: tag.to_string(),
            samples: samples.len(),
            mean_seconds,
            durations: verbose.then_some(samples),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<TagSummary>,
    #[serde(skip)]
    options: ReportOptions,
}

impl Report {
    /// Summarize the named tags. Fails on the first tag that is unknown or
    /// has no samples.
    pub fn for_tags<T: AsRef<str>>(
        store: &DurationStore,
        tags: &[T],
        options: ReportOptions,
    ) -> Result<Self, DurationError> {
        let entries = tags
            .iter()
            .map(|tag| {
                let tag = tag.as_ref();
                TagSummary::build(tag, store.durations(tag)?, options.verbose)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::ordered(entries, options))
    }

    /// Summarize every tag that has at least one sample.
    pub fn all(store: &DurationStore, options: ReportOptions) -> Result<Self, DurationError> {
        let mut entries = Vec::new();
        for (tag, samples) in store.snapshot()? {
            if samples.is_empty() {
                debug!(event = "Report", phase = "Skip", tag = tag.as_str());
                continue;
            }
            entries.push(TagSummary::build(&tag, samples, options.verbose)?);
        }
        Ok(Self::ordered(entries, options))
    }

    fn ordered(mut entries: Vec<TagSummary>, options: ReportOptions) -> Self {
        match options.order {
            SortOrder::Default => {}
            SortOrder::Ascending => {
                entries.sort_by(|a, b| a.mean_seconds.total_cmp(&b.mean_seconds))
            }
            SortOrder::Descending => {
                entries.sort_by(|a, b| b.mean_seconds.total_cmp(&a.mean_seconds))
            }
        }
        Self { entries, options }
    }

    pub fn render_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let mut lines = vec![format!(
                    "{} takes on average: {:.6} seconds",
                    entry.tag, entry.mean_seconds
                )];
                if let Some(durations) = &entry.durations {
                    lines.extend(
                        durations
                            .iter()
                            .enumerate()
                            .map(|(i, secs)| format!("{i}: {secs:.6} seconds")),
                    );
                }
                lines.join("\n")
            })
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, DurationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DurationError::SerializationError(e.to_string()))
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn sample_store() -> DurationStore {
        let store = DurationStore::new();
        for (tag, secs) in [
            ("operatorPlus", 0.5),
            ("operatorPlus", 1.5),
            ("boostJoin", 0.25),
            ("stringStream", 2.0),
        ] {
            store.record(tag, secs).unwrap();
        }
        store
    }

    fn tag_order(report: &Report) -> Vec<&str> {
        report.entries.iter().map(|e| e.tag.as_str()).collect()
    }

    #[parameterized(
        default_is_tag_order = { SortOrder::Default, vec!["boostJoin", "operatorPlus", "stringStream"] },
        ascending_by_mean = { SortOrder::Ascending, vec!["boostJoin", "operatorPlus", "stringStream"] },
        descending_by_mean = { SortOrder::Descending, vec!["stringStream", "operatorPlus", "boostJoin"] },
    )]
    fn test_report_ordering(order: SortOrder, expected: Vec<&str>) {
        let options = ReportOptions {
            order,
            verbose: false,
        };
        let report = Report::all(&sample_store(), options).unwrap();
        assert_eq!(tag_order(&report), expected);
    }

    #[test]
    fn test_render_text_summary() {
        let report = Report::all(&sample_store(), ReportOptions::default()).unwrap();
        insta::assert_snapshot!(report.render_text(), @r"
        boostJoin takes on average: 0.250000 seconds
        operatorPlus takes on average: 1.000000 seconds
        stringStream takes on average: 2.000000 seconds
        ");
    }

    #[test]
    fn test_render_text_verbose() {
        let options = ReportOptions::default().verbose(true);
        let report = Report::for_tags(&sample_store(), &["operatorPlus"], options).unwrap();
        insta::assert_snapshot!(report.to_string(), @r"
        operatorPlus takes on average: 1.000000 seconds
        0: 0.500000 seconds
        1: 1.500000 seconds
        ");
    }

    #[test]
    fn test_for_tags_unknown_tag() {
        let err = Report::for_tags(&sample_store(), &["missing"], ReportOptions::default())
            .unwrap_err();
        assert_eq!(err, DurationError::UnknownTag("missing".to_string()));
    }

    #[test]
    fn test_for_tags_empty_tag() {
        let store = sample_store();
        store.declare("idle").unwrap();
        let err = Report::for_tags(&store, &["idle"], ReportOptions::default()).unwrap_err();
        assert_eq!(err, DurationError::EmptyTag("idle".to_string()));
    }

    #[test]
    fn test_all_skips_empty_tags() {
        let store = sample_store();
        store.declare("idle").unwrap();
        let report = Report::all(&store, ReportOptions::default()).unwrap();
        assert!(!tag_order(&report).contains(&"idle"));
        assert_eq!(report.entries.len(), 3);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report::for_tags(&sample_store(), &["boostJoin"], ReportOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["entries"][0]["tag"], "boostJoin");
        assert_eq!(value["entries"][0]["samples"], 1);
        assert_eq!(value["entries"][0]["mean_seconds"], 0.25);
        assert!(value["entries"][0].get("durations").is_none());
        assert!(value.get("options").is_none());
    }

    #[parameterized(
        lowercase = { "descending", SortOrder::Descending },
        mixed_case = { "Ascending", SortOrder::Ascending },
        default = { "default", SortOrder::Default },
    )]
    fn test_sort_order_from_str(input: &str, expected: SortOrder) {
        let options = ReportOptions::default().with_order(input).unwrap();
        assert_eq!(options.order, expected);
        assert_eq!(expected.to_string(), input.to_lowercase());
    }

    #[test]
    fn test_invalid_sort_order() {
        let err = ReportOptions::default().with_order("sideways").unwrap_err();
        assert!(matches!(err, DurationError::InvalidOptions(_)));
    }

    #[test]
    fn test_options_from_json() {
        let options = ReportOptions::from_json(r#"{"order": "descending"}"#).unwrap();
        assert_eq!(options.order, SortOrder::Descending);
        assert!(!options.verbose);

        let options = ReportOptions::from_json("{}").unwrap();
        assert_eq!(options, ReportOptions::default());

        assert!(matches!(
            ReportOptions::from_json(r#"{"order": 3}"#),
            Err(DurationError::InvalidOptions(_))
        ));
    }
}
