//! Host CPU description, used only to label the CPU panel.

use sysinfo::System;

#[derive(Debug, Clone)]
pub struct HostInfo {
    pub cpu_model: String,
    pub logical_cores: usize,
}

impl HostInfo {
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        let cpu_model = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".into());

        Self {
            cpu_model,
            logical_cores: sys.cpus().len(),
        }
    }

    /// "AMD Ryzen 7 5800X, 16 cores"
    pub fn label(&self) -> String {
        format!("{}, {} cores", self.cpu_model, self.logical_cores)
    }
}
