//! Prometheus metrics fed from lifecycle events.

use prometheus::{Counter, Histogram, Registry};

use crate::error::Result;
use crate::lifecycle::LifecycleEvent;
use crate::registry::PluginStatus;
use crate::status::Action;

/// Configuration for effect metrics collection.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Metric prefix for all effect metrics.
    pub prefix: String,
    /// Whether to collect the cook duration histogram.
    pub detailed_timing: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            prefix: "mesh_effect".to_string(),
            detailed_timing: true,
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metric prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable detailed timing.
    pub fn with_detailed_timing(mut self, enabled: bool) -> Self {
        self.detailed_timing = enabled;
        self
    }
}

/// Effect metrics collector.
pub struct EffectMetrics {
    config: MetricsConfig,
    registry: Registry,
    plugins_loaded: Counter,
    load_failures: Counter,
    action_failures: Counter,
    descriptors_released: Counter,
    instances_released: Counter,
    cook_duration: Histogram,
}

impl EffectMetrics {
    /// Create a new metrics collector with the given configuration.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        let registry = Registry::new();

        let plugins_loaded = Counter::new(
            format!("{}_plugins_loaded_total", config.prefix),
            "Total number of plugins loaded",
        )?;

        let load_failures = Counter::new(
            format!("{}_load_failures_total", config.prefix),
            "Total number of plugins that failed to load",
        )?;

        let action_failures = Counter::new(
            format!("{}_action_failures_total", config.prefix),
            "Total number of actions that returned a failure status",
        )?;

        let descriptors_released = Counter::new(
            format!("{}_descriptors_released_total", config.prefix),
            "Total number of effect descriptors released",
        )?;

        let instances_released = Counter::new(
            format!("{}_instances_released_total", config.prefix),
            "Total number of effect instances released",
        )?;

        let cook_duration = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                format!("{}_cook_duration_seconds", config.prefix),
                "Cook action duration in seconds",
            )
            .buckets(vec![0.0001, 0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;

        registry.register(Box::new(plugins_loaded.clone()))?;
        registry.register(Box::new(load_failures.clone()))?;
        registry.register(Box::new(action_failures.clone()))?;
        registry.register(Box::new(descriptors_released.clone()))?;
        registry.register(Box::new(instances_released.clone()))?;
        registry.register(Box::new(cook_duration.clone()))?;

        Ok(Self {
            config,
            registry,
            plugins_loaded,
            load_failures,
            action_failures,
            descriptors_released,
            instances_released,
            cook_duration,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Get the Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Update metrics from a lifecycle event.
    pub fn record_event(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::ActionDispatched {
                action,
                status,
                elapsed,
                ..
            } => {
                if action.is_failure(*status) {
                    self.action_failures.inc();
                }
                if *action == Action::Cook && self.config.detailed_timing {
                    self.cook_duration.observe(elapsed.as_secs_f64());
                }
            }
            LifecycleEvent::StatusChanged { to, .. } => match to {
                PluginStatus::Ok => self.plugins_loaded.inc(),
                PluginStatus::Error => self.load_failures.inc(),
                PluginStatus::NotLoaded => {}
            },
            LifecycleEvent::DescriptorReleased { .. } => self.descriptors_released.inc(),
            LifecycleEvent::InstanceReleased { .. } => self.instances_released.inc(),
        }
    }

    /// Get the total number of plugins loaded.
    pub fn plugins_loaded_total(&self) -> u64 {
        self.plugins_loaded.get() as u64
    }

    /// Get the total number of failed loads.
    pub fn load_failures_total(&self) -> u64 {
        self.load_failures.get() as u64
    }

    /// Get the total number of failed actions.
    pub fn action_failures_total(&self) -> u64 {
        self.action_failures.get() as u64
    }

    /// Get the total number of released descriptors.
    pub fn descriptors_released_total(&self) -> u64 {
        self.descriptors_released.get() as u64
    }

    /// Get the total number of released instances.
    pub fn instances_released_total(&self) -> u64 {
        self.instances_released.get() as u64
    }

    /// Get the number of cook durations observed.
    pub fn cooks_observed(&self) -> u64 {
        self.cook_duration.get_sample_count()
    }
}

impl std::fmt::Debug for EffectMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectMetrics")
            .field("config", &self.config)
            .field("plugins_loaded", &self.plugins_loaded_total())
            .field("action_failures", &self.action_failures_total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::status::Status;

    #[test]
    fn test_metrics_config_builder() {
        let config = MetricsConfig::new()
            .with_prefix("test")
            .with_detailed_timing(false);

        assert_eq!(config.prefix, "test");
        assert!(!config.detailed_timing);
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = EffectMetrics::new(MetricsConfig::default()).unwrap();
        let dispatched = |action, status| LifecycleEvent::ActionDispatched {
            plugin: "p".to_string(),
            action,
            status,
            elapsed: Duration::from_millis(2),
            at: Instant::now(),
        };

        metrics.record_event(&LifecycleEvent::StatusChanged {
            plugin: "p".to_string(),
            from: PluginStatus::NotLoaded,
            to: PluginStatus::Ok,
            at: Instant::now(),
        });
        metrics.record_event(&dispatched(Action::Cook, Status::Ok));
        metrics.record_event(&dispatched(Action::Cook, Status::Failed));
        metrics.record_event(&dispatched(Action::DestroyInstance, Status::Failed));
        metrics.record_event(&LifecycleEvent::InstanceReleased {
            plugin: "p".to_string(),
            at: Instant::now(),
        });

        assert_eq!(metrics.plugins_loaded_total(), 1);
        assert_eq!(metrics.action_failures_total(), 1);
        assert_eq!(metrics.instances_released_total(), 1);
        assert_eq!(metrics.descriptors_released_total(), 0);
        assert_eq!(metrics.cooks_observed(), 2);
    }
}
