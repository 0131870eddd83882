/*!
 * Memory Manager Defragmentation
 * Coalescing of consecutive free blocks
 */

use super::super::types::DefragReport;
use super::MemoryManager;
use tracing::{info, instrument};

impl MemoryManager {
    /// Run one left-to-right pass merging every run of consecutive free
    /// blocks into a single free block
    ///
    /// Allocated blocks are separators and never move. Merging is
    /// transitive within the pass, so afterwards no two neighbouring
    /// entries are both free.
    #[instrument(level = "debug", skip(self), fields(manager = self.id))]
    pub fn defragment(&mut self) -> DefragReport {
        let blocks_before = self.table.len();
        let merged = self.table.coalesce();

        let report = DefragReport {
            blocks_before,
            blocks_after: self.table.len(),
            largest_free_block: self.table.largest_free(),
        };
        self.counters.add_defragmentation(merged);

        info!(
            blocks_before = report.blocks_before,
            blocks_after = report.blocks_after,
            largest_free = report.largest_free_block,
            "Defragmentation complete: merged {} free blocks",
            report.merged()
        );

        debug_assert!(self.validate().is_ok());
        report
    }
}
