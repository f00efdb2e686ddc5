//! Metrics collection and export for pools

use std::collections::HashMap;

#[cfg(feature = "metrics")]
use serde::{Deserialize, Serialize};

/// Metrics snapshot for a pool
///
/// # Examples
///
/// ```
/// use instance_pool::{ObjectPool, Placement};
///
/// let mut pool = ObjectPool::from_fn(|_: &Placement| String::from("sprite"));
///
/// let handle = pool.rent().unwrap();
/// pool.return_object(handle).unwrap();
/// let _again = pool.rent().unwrap();
///
/// let metrics = pool.get_metrics();
/// assert_eq!(metrics.total_created, 1);
/// assert_eq!(metrics.total_rented, 2);
/// assert_eq!(metrics.total_reused, 1);
/// assert_eq!(metrics.rented_objects, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "metrics", derive(Serialize, Deserialize))]
pub struct PoolMetrics {
    /// Instances created through the factory
    pub total_created: usize,

    /// Successful rents, reuse and fresh creation alike
    pub total_rented: usize,

    /// Rents served from the free set
    pub total_reused: usize,

    /// Instances handed back to the free set
    pub total_returned: usize,

    /// Instances torn down by clear or dispose
    pub total_destroyed: usize,

    /// Current rented set size
    pub rented_objects: usize,

    /// Current free set size
    pub available_objects: usize,

    /// Current all-managed set size
    pub managed_objects: usize,

    /// Share of rents served without creating (0.0 to 1.0)
    pub reuse_ratio: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_created".to_string(), self.total_created.to_string());
        metrics.insert("total_rented".to_string(), self.total_rented.to_string());
        metrics.insert("total_reused".to_string(), self.total_reused.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("total_destroyed".to_string(), self.total_destroyed.to_string());
        metrics.insert("rented_objects".to_string(), self.rented_objects.to_string());
        metrics.insert("available_objects".to_string(), self.available_objects.to_string());
        metrics.insert("managed_objects".to_string(), self.managed_objects.to_string());
        metrics.insert("reuse_ratio".to_string(), format!("{:.2}", self.reuse_ratio));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use instance_pool::{ObjectPool, Placement};
    /// use std::collections::HashMap;
    ///
    /// let mut pool = ObjectPool::from_fn(|_: &Placement| 0u64);
    /// pool.prewarm(2).unwrap();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("scene".to_string(), "arena".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("bullets", Some(&tags));
    /// let expected = "instancepool_objects_available{pool=\"bullets\",scene=\"arena\"} 2";
    /// assert!(output.contains(expected));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        let gauges = [
            ("instancepool_objects_rented", "Current rented objects", metrics.rented_objects),
            (
                "instancepool_objects_available",
                "Current available objects",
                metrics.available_objects,
            ),
            ("instancepool_objects_managed", "Current managed objects", metrics.managed_objects),
        ];
        for (name, help, value) in gauges {
            Self::push_metric(&mut output, name, help, "gauge", &labels, value);
        }

        output.push_str(
            "# HELP instancepool_reuse_ratio Share of rents served from the free set\n",
        );
        output.push_str("# TYPE instancepool_reuse_ratio gauge\n");
        output.push_str(&format!(
            "instancepool_reuse_ratio{{{}}} {:.2}\n",
            labels, metrics.reuse_ratio
        ));

        // Counter metrics
        let counters = [
            ("instancepool_objects_created_total", "Total objects created", metrics.total_created),
            ("instancepool_objects_rented_total", "Total objects rented", metrics.total_rented),
            (
                "instancepool_objects_returned_total",
                "Total objects returned",
                metrics.total_returned,
            ),
            (
                "instancepool_objects_destroyed_total",
                "Total objects destroyed",
                metrics.total_destroyed,
            ),
        ];
        for (name, help, value) in counters {
            Self::push_metric(&mut output, name, help, "counter", &labels, value);
        }

        output
    }

    fn push_metric(
        output: &mut String,
        name: &str,
        help: &str,
        kind: &str,
        labels: &str,
        value: usize,
    ) {
        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} {}\n", name, kind));
        output.push_str(&format!("{}{{{}}} {}\n", name, labels, value));
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort();
            for (key, value) in sorted {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal counters kept next to the pool state
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    pub total_created: usize,
    pub total_rented: usize,
    pub total_reused: usize,
    pub total_returned: usize,
    pub total_destroyed: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, rented: usize, available: usize, managed: usize) -> PoolMetrics {
        let reuse_ratio = if self.total_rented > 0 {
            self.total_reused as f64 / self.total_rented as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_created: self.total_created,
            total_rented: self.total_rented,
            total_reused: self.total_reused,
            total_returned: self.total_returned,
            total_destroyed: self.total_destroyed,
            rented_objects: rented,
            available_objects: available,
            managed_objects: managed,
            reuse_ratio,
        }
    }
}
