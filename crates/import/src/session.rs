use ledgerlift_core::{ConversionProfile, Record};

use crate::convert::{convert_batch, BatchConversion, RawFile};

/// Holds the raw exports and the reference export currently loaded, plus the
/// conversion of those inputs. Every change reruns learning and conversion
/// from scratch; when the inputs stop being convertible the previous result
/// is dropped rather than left stale.
#[derive(Debug, Default)]
pub struct ConversionSession {
    profile: ConversionProfile,
    raw_files: Vec<RawFile>,
    reference: Vec<Record>,
    result: Option<BatchConversion>,
}

impl ConversionSession {
    pub fn new(profile: ConversionProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> &ConversionProfile {
        &self.profile
    }

    pub fn raw_files(&self) -> &[RawFile] {
        &self.raw_files
    }

    pub fn reference(&self) -> &[Record] {
        &self.reference
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    /// Latest conversion, or `None` when there is nothing to convert yet.
    pub fn result(&self) -> Option<&BatchConversion> {
        self.result.as_ref()
    }

    pub fn add_raw_files(&mut self, files: impl IntoIterator<Item = RawFile>) {
        self.raw_files.extend(files);
        self.recompute();
    }

    /// Removes the raw export at `index`. Out-of-range indices are ignored.
    pub fn remove_raw_file(&mut self, index: usize) -> Option<RawFile> {
        if index >= self.raw_files.len() {
            return None;
        }
        let removed = self.raw_files.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Replaces the reference export. An upload always replaces, never appends.
    pub fn set_reference(&mut self, reference: Vec<Record>) {
        self.reference = reference;
        self.recompute();
    }

    pub fn reset(&mut self) {
        self.raw_files.clear();
        self.reference.clear();
        self.result = None;
    }

    fn recompute(&mut self) {
        self.result = convert_batch(&self.raw_files, &self.reference, &self.profile);
        if self.result.is_none() {
            tracing::debug!(
                raw_files = self.raw_files.len(),
                reference_rows = self.reference.len(),
                "conversion not ready"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    fn reference() -> Vec<Record> {
        vec![record(&[("Merchant", "Shell"), ("Category", "Gas")])]
    }

    fn file(name: &str, merchants: &[&str]) -> RawFile {
        RawFile::new(
            name,
            merchants
                .iter()
                .map(|&m| record(&[("Merchant Name", m), ("Amount", "-1.00")]))
                .collect(),
        )
    }

    #[test]
    fn raw_files_alone_are_not_ready() {
        let mut s = ConversionSession::default();
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        assert!(s.result().is_none());
    }

    #[test]
    fn reference_upload_triggers_conversion() {
        let mut s = ConversionSession::default();
        s.add_raw_files([file("jan.csv", &["Shell", "Esso"])]);
        s.set_reference(reference());
        let result = s.result().unwrap();
        assert_eq!(result.combined.total_rows, 2);
        assert_eq!(result.combined.categorized_rows, 1);
    }

    #[test]
    fn adding_files_reconverts_everything() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        s.add_raw_files([file("feb.csv", &["Shell", "Esso"])]);
        let result = s.result().unwrap();
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.combined.total_rows, 3);
    }

    #[test]
    fn removing_last_file_clears_result() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        assert!(s.result().is_some());

        let removed = s.remove_raw_file(0).unwrap();
        assert_eq!(removed.name, "jan.csv");
        assert!(s.result().is_none());
    }

    #[test]
    fn removing_one_of_two_files_keeps_the_other() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"]), file("feb.csv", &["Esso"])]);
        s.remove_raw_file(0);
        let result = s.result().unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].name, "feb.csv");
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        assert!(s.remove_raw_file(5).is_none());
        assert!(s.result().is_some());
    }

    #[test]
    fn empty_reference_upload_clears_stale_result() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        s.set_reference(Vec::new());
        assert!(s.result().is_none());
        assert_eq!(s.raw_files().len(), 1);
    }

    #[test]
    fn reset_clears_inputs_and_result() {
        let mut s = ConversionSession::default();
        s.set_reference(reference());
        s.add_raw_files([file("jan.csv", &["Shell"])]);
        s.reset();
        assert!(s.result().is_none());
        assert!(s.raw_files().is_empty());
        assert_eq!(s.reference_len(), 0);
    }
}
