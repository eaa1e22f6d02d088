const MIN_EFFECTIVE_SCALE: f64 = 0.1;
const MAX_EFFECTIVE_SCALE: f64 = 5.0;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Process-wide density configuration, injected at construction.
///
/// Replaces the hidden class-level override of older widget designs with an
/// explicit value the embedder owns and passes to every instance it creates.
pub struct ProcessConfig {
    density_override: Option<f64>,
}

impl ProcessConfig {
    /// Configuration with no override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the process-wide density override.
    ///
    /// Non-positive values count as unset.
    pub fn set_density_override(&mut self, density: Option<f64>) {
        self.density_override = density.filter(|d| *d > 0.0);
    }

    /// Current process-wide density override, if set.
    pub fn density_override(&self) -> Option<f64> {
        self.density_override
    }
}

/// Resolve the effective density from the three precedence levels.
///
/// Per-instance override (when `> 0`) wins over the process-wide override,
/// which wins over the platform default.
pub fn resolve_density(
    instance_override: Option<f64>,
    process: &ProcessConfig,
    platform_default: f64,
) -> f64 {
    instance_override
        .filter(|d| *d > 0.0)
        .or_else(|| process.density_override())
        .unwrap_or(platform_default)
}

/// Density-correction scale, clamped to `[0.1, 5.0]`.
///
/// A non-positive resolved density cannot produce a meaningful ratio and
/// resolves to `1.0`.
pub fn effective_scale(target_density: f64, resolved_density: f64) -> f64 {
    if resolved_density <= 0.0 {
        return 1.0;
    }
    (target_density / resolved_density).clamp(MIN_EFFECTIVE_SCALE, MAX_EFFECTIVE_SCALE)
}

#[cfg(test)]
#[path = "../tests/unit/density.rs"]
mod tests;
