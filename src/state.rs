use crate::data::chart::{ChartData, ChartSpec};
use crate::data::edit::EditOp;
use crate::data::export::{export, ExportArtifact, ExportRequest};
use crate::data::loader::{load_table, UploadedFile};
use crate::data::model::Table;
use crate::data::pipeline::{run, FileOptions, Processed};
use crate::error::{ChartError, ParseError, SerializationError, TableError};

// ---------------------------------------------------------------------------
// One uploaded file
// ---------------------------------------------------------------------------

/// An uploaded file, its loaded table, its options and the latest pass.
pub struct FileSession {
    pub upload: UploadedFile,
    /// Table as loaded, or why loading failed.  Loaded once per upload.
    pub source: Result<Table, ParseError>,
    pub options: FileOptions,
    /// Latest processing pass; `None` when loading failed.
    pub output: Option<Result<Processed, TableError>>,
}

impl FileSession {
    pub fn new(upload: UploadedFile) -> Self {
        let source = load_table(&upload);
        let options = match &source {
            Ok(table) => FileOptions::for_table(table),
            Err(e) => {
                log::error!("Failed to load '{}': {e}", upload.name);
                FileOptions::default()
            }
        };
        let mut session = FileSession {
            upload,
            source,
            options,
            output: None,
        };
        session.reprocess();
        session
    }

    pub fn name(&self) -> &str {
        &self.upload.name
    }

    /// Rerun the whole pipeline from the loaded table.
    pub fn reprocess(&mut self) {
        let Ok(source) = &self.source else {
            self.output = None;
            return;
        };
        let result = run(source, &self.options);
        match &result {
            Ok(processed) => {
                log::info!(
                    "Processed '{}': {:?}",
                    self.upload.name,
                    processed.report
                );
                // Projection or edits may have removed a charted column.
                if let Some(spec) = &self.options.chart {
                    let fitted = spec.fit_to(&processed.table);
                    if fitted.as_ref() != Some(spec) {
                        log::debug!("Chart for '{}' now {fitted:?}", self.upload.name);
                        self.options.chart = fitted;
                    }
                }
            }
            Err(e) => log::error!("Processing '{}' failed: {e}", self.upload.name),
        }
        self.output = Some(result);
    }

    /// Apply a change to the options and reprocess.
    pub fn update(&mut self, change: impl FnOnce(&mut FileOptions)) {
        change(&mut self.options);
        self.reprocess();
    }

    /// Record an edit made through the grid.
    pub fn push_edit(&mut self, op: EditOp) {
        self.update(|opts| opts.edits.push(op));
    }

    /// The processed table, when loading and processing succeeded.
    pub fn table(&self) -> Option<&Table> {
        match &self.output {
            Some(Ok(processed)) => Some(&processed.table),
            _ => None,
        }
    }

    /// The loaded table with edits applied.
    pub fn edited(&self) -> Option<&Table> {
        match &self.output {
            Some(Ok(processed)) => Some(&processed.edited),
            _ => None,
        }
    }

    /// Turn the chart on with default axes, or off.  Stays off when the
    /// processed table has no numeric column.
    pub fn toggle_chart(&mut self, on: bool) {
        let spec = if on {
            self.table().and_then(ChartSpec::default_for)
        } else {
            None
        };
        self.options.chart = spec;
    }

    /// Chart for the current table, if the chart toggle is on.
    pub fn chart(&self) -> Option<Result<ChartData, ChartError>> {
        let spec = self.options.chart.as_ref()?;
        let table = self.table()?;
        Some(spec.build(table))
    }

    /// Encode the processed table in the selected export format.
    pub fn export(&self) -> Option<Result<ExportArtifact, SerializationError>> {
        let table = self.table()?;
        let request = ExportRequest::new(&self.upload.name, self.options.export_format);
        Some(export(table, &request))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// All files uploaded during this run.  Files never share state.
#[derive(Default)]
pub struct Session {
    pub files: Vec<FileSession>,
}

impl Session {
    /// Add an upload.  A file with the same name replaces the earlier one.
    /// Returns the index of the file.
    pub fn add_upload(&mut self, upload: UploadedFile) -> usize {
        let file = FileSession::new(upload);
        match self.files.iter().position(|f| f.name() == file.name()) {
            Some(idx) => {
                self.files[idx] = file;
                idx
            }
            None => {
                self.files.push(file);
                self.files.len() - 1
            }
        }
    }

    pub fn remove(&mut self, idx: usize) {
        if idx < self.files.len() {
            self.files.remove(idx);
        }
    }

    /// Names of the files that failed to load, with the reason.
    pub fn failures(&self) -> Vec<(&str, &ParseError)> {
        self.files
            .iter()
            .filter_map(|f| f.source.as_ref().err().map(|e| (f.name(), e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::ExportFormat;

    fn upload(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn parse_failure_does_not_affect_other_files() {
        let mut session = Session::default();
        session.add_upload(upload("good.csv", "a,b\n1,2\n"));
        session.add_upload(upload("bad.csv", "a\n1,2\n"));

        let failures = session.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "bad.csv");
        assert!(session.files[1].table().is_none());
        assert_eq!(session.files[0].table().unwrap().n_rows(), 1);
    }

    #[test]
    fn reupload_replaces_by_name() {
        let mut session = Session::default();
        session.add_upload(upload("data.csv", "a\n1\n"));
        let idx = session.add_upload(upload("data.csv", "a\n1\n2\n"));
        assert_eq!(idx, 0);
        assert_eq!(session.files.len(), 1);
        assert_eq!(session.files[0].table().unwrap().n_rows(), 2);
    }

    #[test]
    fn columns_default_to_all() {
        let file = FileSession::new(upload("data.csv", "a,b,c\n1,2,3\n"));
        assert_eq!(file.options.selected_columns, vec!["a", "b", "c"]);
    }

    #[test]
    fn chart_toggle_needs_numeric_column() {
        let mut text_only = FileSession::new(upload("names.csv", "name\nx\n"));
        text_only.toggle_chart(true);
        assert!(text_only.chart().is_none());

        let mut numeric = FileSession::new(upload("nums.csv", "name,n\nx,1\n"));
        numeric.toggle_chart(true);
        let chart = numeric.chart().unwrap().unwrap();
        assert_eq!(chart.points, vec![[0.0, 1.0]]);
    }

    #[test]
    fn chart_follows_column_selection() {
        let mut file = FileSession::new(upload("data.csv", "name,n,m\nx,1,2\ny,3,4\n"));
        file.toggle_chart(true);
        assert_eq!(file.options.chart.as_ref().unwrap().y_column, "n");

        file.update(|opts| opts.selected_columns = vec!["name".into(), "m".into()]);
        let spec = file.options.chart.as_ref().unwrap();
        assert_eq!(spec.x_column, "name");
        assert_eq!(spec.y_column, "m");
        let chart = file.chart().unwrap().unwrap();
        assert_eq!(chart.points, vec![[0.0, 2.0], [1.0, 4.0]]);

        file.update(|opts| opts.selected_columns = vec!["name".into()]);
        assert_eq!(file.options.chart, None);
        assert!(file.chart().is_none());
    }

    #[test]
    fn export_uses_selected_format() {
        let mut file = FileSession::new(upload("data.csv", "a\n1\n"));
        file.update(|opts| opts.export_format = ExportFormat::Excel);
        let artifact = file.export().unwrap().unwrap();
        assert_eq!(artifact.file_name, "data.xlsx");
        assert_eq!(artifact.mime_type, ExportFormat::Excel.mime_type());
    }
}
