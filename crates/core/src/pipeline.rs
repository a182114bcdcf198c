use crate::assembler::SheetReport;
use crate::config::PipelineConfig;
use crate::enrich::{EnrichedRecord, FileInfo, RecordEnricher};
use crate::error::Result;
use crate::workbook::{WorkbookAggregator, WorkbookSource};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Enriched records of one workbook plus the per-sheet reports.
#[derive(Debug, Clone)]
pub struct WorkbookOutput {
    pub records: Vec<EnrichedRecord>,
    pub sheets: Vec<SheetReport>,
}

impl WorkbookOutput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of one workbook within a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub file: FileInfo,
    pub result: Result<WorkbookOutput>,
}

/// End-to-end extraction and enrichment of order book workbooks.
///
/// The configuration is shared read-only, so one pipeline can be cloned
/// across threads and each workbook processed independently.
#[derive(Debug, Clone, Default)]
pub struct OrderBookPipeline {
    config: Arc<PipelineConfig>,
}

impl OrderBookPipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        OrderBookPipeline {
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract and enrich one workbook.
    ///
    /// # Errors
    ///
    /// Returns an error only when the workbook's sheets cannot be listed.
    pub fn process_workbook<S: WorkbookSource + ?Sized>(
        &self,
        file: &FileInfo,
        source: &mut S,
    ) -> Result<WorkbookOutput> {
        info!(file = %file.name, location = %file.location.display(), "processing workbook");
        let extraction = WorkbookAggregator::new(&self.config).aggregate(source)?;

        if extraction.table.is_empty() {
            warn!(file = %file.name, "no data extracted");
        } else {
            info!(file = %file.name, rows = extraction.table.row_count(), "extracted rows");
        }

        let records = RecordEnricher::new(&self.config).enrich(&extraction.table, file);
        Ok(WorkbookOutput {
            records,
            sheets: extraction.sheets,
        })
    }

    /// Process workbooks in order; a failing workbook does not stop the rest.
    pub fn process_batch<I, S>(&self, workbooks: I) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = (FileInfo, Result<S>)>,
        S: WorkbookSource,
    {
        workbooks
            .into_iter()
            .map(|(file, opened)| {
                let result =
                    opened.and_then(|mut source| self.process_workbook(&file, &mut source));
                if let Err(e) = &result {
                    error!(file = %file.name, error = %e, "error processing workbook");
                }
                BatchItem { file, result }
            })
            .collect()
    }
}
