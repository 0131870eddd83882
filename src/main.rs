/*!
 * memsim - Main Entry Point
 *
 * Replays a scripted sequence of operations against one memory manager:
 *
 *   memsim [--json] alloc 40 alloc 40 free 1 free 2 alloc 90 stats
 *
 * `free K` releases the K-th successful allocation (1-based).
 * Capacity comes from MEMSIM_CAPACITY (default 1MB).
 */

use anyhow::{bail, Context, Result};
use memsim::core::limits::{CAPACITY_ENV, DEFAULT_CAPACITY};
use memsim::memory::{validation, Handle, MemoryError, MemoryManager};
use memsim::init_tracing;
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Alloc(i64),
    Free(usize),
    Defrag,
    Stats,
    Table,
}

fn parse_script(args: &[String]) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    let mut iter = args.iter();

    while let Some(word) = iter.next() {
        let op = match word.as_str() {
            "alloc" => {
                let raw = iter.next().context("alloc requires a size")?;
                Op::Alloc(raw.parse().with_context(|| format!("invalid size: {raw}"))?)
            }
            "free" => {
                let raw = iter.next().context("free requires an allocation index")?;
                Op::Free(raw.parse().with_context(|| format!("invalid index: {raw}"))?)
            }
            "defrag" => Op::Defrag,
            "stats" => Op::Stats,
            "table" => Op::Table,
            other => bail!("unknown operation: {other}"),
        };
        ops.push(op);
    }

    Ok(ops)
}

fn configured_capacity() -> Result<usize> {
    match std::env::var(CAPACITY_ENV) {
        Ok(raw) => {
            let raw: i64 = raw
                .parse()
                .with_context(|| format!("{CAPACITY_ENV} is not an integer: {raw}"))?;
            Ok(validation::capacity(raw)?)
        }
        Err(_) => Ok(DEFAULT_CAPACITY),
    }
}

struct Session {
    manager: MemoryManager,
    issued: Vec<Handle>,
    json: bool,
}

impl Session {
    fn run(&mut self, op: &Op) -> Result<()> {
        match op {
            Op::Alloc(raw) => {
                let result = validation::size(*raw).and_then(|size| self.manager.allocate(size));
                match result {
                    Ok(handle) => {
                        self.issued.push(handle);
                        let block = self
                            .manager
                            .block(handle)
                            .context("allocated handle has no block")?;
                        self.emit(
                            json!({ "op": "alloc", "index": self.issued.len(), "block": block }),
                            format!("alloc #{} -> {} {}", self.issued.len(), handle, block),
                        );
                    }
                    Err(err) => self.report("alloc", &err),
                }
            }
            Op::Free(index) => {
                let handle = index
                    .checked_sub(1)
                    .and_then(|i| self.issued.get(i))
                    .copied()
                    .with_context(|| format!("no allocation #{index} in this script"))?;
                match self.manager.free(handle) {
                    Ok(()) => self.emit(
                        json!({ "op": "free", "index": index }),
                        format!("free #{index} ({handle})"),
                    ),
                    Err(err) => self.report("free", &err),
                }
            }
            Op::Defrag => {
                let report = self.manager.defragment();
                self.emit(
                    json!({ "op": "defrag", "report": report }),
                    format!(
                        "defrag: {} -> {} blocks (largest free {})",
                        report.blocks_before, report.blocks_after, report.largest_free_block
                    ),
                );
            }
            Op::Stats => {
                let stats = self.manager.stats();
                self.emit(
                    json!({ "op": "stats", "stats": stats, "pressure": stats.pressure }),
                    format!(
                        "stats: capacity={} used={} free={} free_blocks={} largest_free={} ({:.1}% used, {})",
                        stats.capacity,
                        stats.used_total,
                        stats.free_total,
                        stats.free_block_count,
                        stats.largest_free_block,
                        stats.usage_percentage(),
                        stats.pressure
                    ),
                );
            }
            Op::Table => {
                let layout: String = self.manager.blocks().iter().map(ToString::to_string).collect();
                self.emit(
                    json!({ "op": "table", "blocks": self.manager.blocks() }),
                    format!("table: {layout}"),
                );
            }
        }
        Ok(())
    }

    /// Allocator errors are reported and the script carries on
    fn report(&self, op: &str, err: &MemoryError) {
        self.emit(
            json!({ "op": op, "error": err }),
            format!("{op} failed:\n{:?}", miette::Report::new(err.clone())),
        );
    }

    fn emit(&self, value: serde_json::Value, text: String) {
        if self.json {
            println!("{value}");
        } else {
            println!("{text}");
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().terminal_links(false).build())
    }))?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = match args.iter().position(|a| a == "--json") {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    };

    let script = parse_script(&args)?;
    let capacity = configured_capacity()?;
    info!(capacity, ops = script.len(), "Replaying allocation script");

    let mut session = Session {
        manager: MemoryManager::new(capacity)?,
        issued: Vec::new(),
        json,
    };
    for op in &script {
        session.run(op)?;
    }

    Ok(())
}
