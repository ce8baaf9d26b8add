//! Runtime statistics sampling.

use crate::agent::alloc_stats;
use crate::metric::Gauge;
use std::collections::HashMap;
use sysinfo::{Pid, System};
use uuid::Uuid;

/// Gauge holding a fresh random number on every poll, so the server can
/// tell the agent is alive even when nothing else changes.
pub const RANDOM_VALUE: &str = "RandomValue";

/// Samples host and process statistics into a gauge map.
pub struct RuntimeSampler {
    system: System,
    pid: Option<Pid>,
}

impl RuntimeSampler {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Take a full sample. Every call returns a complete, new map.
    pub fn sample(&mut self) -> HashMap<String, Gauge> {
        self.system.refresh_memory();
        self.system.refresh_cpu();

        let mut gauges = HashMap::new();
        let mut set = |name: &str, value: Gauge| {
            gauges.insert(name.to_string(), value);
        };

        set("TotalMemory", self.system.total_memory() as Gauge);
        set("UsedMemory", self.system.used_memory() as Gauge);
        set("FreeMemory", self.system.free_memory() as Gauge);
        set("AvailableMemory", self.system.available_memory() as Gauge);
        set("TotalSwap", self.system.total_swap() as Gauge);
        set("UsedSwap", self.system.used_swap() as Gauge);
        set("FreeSwap", self.system.free_swap() as Gauge);

        set("CPUCount", self.system.cpus().len() as Gauge);
        set("CPUUtilization", self.system.global_cpu_info().cpu_usage() as Gauge);

        let load = System::load_average();
        set("LoadAverage1", load.one);
        set("LoadAverage5", load.five);
        set("LoadAverage15", load.fifteen);
        set("Uptime", System::uptime() as Gauge);

        if let Some(pid) = self.pid {
            if self.system.refresh_process(pid) {
                if let Some(process) = self.system.process(pid) {
                    let disk = process.disk_usage();
                    set("ProcessMemory", process.memory() as Gauge);
                    set("ProcessVirtualMemory", process.virtual_memory() as Gauge);
                    set("ProcessCPUUsage", process.cpu_usage() as Gauge);
                    set("ProcessRunTime", process.run_time() as Gauge);
                    set("ProcessDiskRead", disk.total_read_bytes as Gauge);
                    set("ProcessDiskWritten", disk.total_written_bytes as Gauge);
                }
            }
        }

        let heap = alloc_stats();
        set("Alloc", heap.alloc as Gauge);
        set("TotalAlloc", heap.total_alloc as Gauge);
        set("Mallocs", heap.mallocs as Gauge);
        set("Frees", heap.frees as Gauge);
        set("HeapObjects", heap.heap_objects() as Gauge);

        set(RANDOM_VALUE, random_value());

        gauges
    }
}

impl Default for RuntimeSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Random value in `[0, 100)`.
pub fn random_value() -> Gauge {
    // The top 48 bits of a v4 UUID are random.
    let bits = (Uuid::new_v4().as_u128() >> 80) as u64;
    bits as Gauge / (1u64 << 48) as Gauge * 100.0
}
