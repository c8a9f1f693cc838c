//! Panel data delivered by the host on every data update

use arrow::record_batch::RecordBatch;

/// One host data-update event: the query results for the panel
#[derive(Debug, Clone, Default)]
pub struct PanelData {
    /// Result frames in the order the queries produced them
    pub series: Vec<RecordBatch>,
}

impl PanelData {
    pub fn new(series: Vec<RecordBatch>) -> Self {
        Self { series }
    }

    /// True when the update carries no frames at all
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl From<RecordBatch> for PanelData {
    fn from(batch: RecordBatch) -> Self {
        Self { series: vec![batch] }
    }
}
