use normalizer::IssueRecord;

/// Records carrying the `marker` label (exact, case-sensitive), in input order.
pub fn select_published<'a>(records: &'a [IssueRecord], marker: &str) -> Vec<&'a IssueRecord> {
    records
        .iter()
        .filter(|record| record.has_label(marker))
        .collect()
}
