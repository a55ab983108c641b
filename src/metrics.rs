//! Engine-agnostic metrics collection for octree update statistics.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use volume_octree::metrics::{UpdateMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // After each completed device_update:
//! metrics.record_update(&stats);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::update::UpdateStats;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  /// Get the number of values in the window.
  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  /// Check if the window is empty.
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Clear all values.
  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate over values (oldest to newest).
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Get the most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  /// Compute the average of all values.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      let sum: u64 = self.buffer.iter().sum();
      sum as f64 / self.buffer.len() as f64
    }
  }

  /// Get min and max values.
  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds of frames at 60fps
  }
}

/// Per-frame octree update statistics with rolling timing history.
#[derive(Debug, Clone)]
pub struct UpdateMetrics {
  /// Rolling window of phase-A (bound refresh) times in microseconds.
  pub bounds_timings: RollingWindow<u64>,
  /// Rolling window of phase-B (rebuild + flatten) times in microseconds.
  pub rebuild_timings: RollingWindow<u64>,

  /// Active volume count in the last completed update.
  pub last_volumes_active: usize,
  /// Nodes that truncated their volume list in the last update.
  pub last_overflowed_nodes: usize,
  /// Total updates recorded this session.
  pub total_updates: u64,
  /// Updates that reported at least one truncated node.
  pub updates_with_overflow: u64,
}

impl Default for UpdateMetrics {
  fn default() -> Self {
    Self {
      bounds_timings: RollingWindow::new(128),
      rebuild_timings: RollingWindow::new(128),
      last_volumes_active: 0,
      last_overflowed_nodes: 0,
      total_updates: 0,
      updates_with_overflow: 0,
    }
  }
}

impl UpdateMetrics {
  /// Create new metrics with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one completed update. No-op while collection is disabled.
  pub fn record_update(&mut self, stats: &UpdateStats) {
    if !is_enabled() {
      return;
    }

    self.bounds_timings.push(stats.bounds_time_us);
    self.rebuild_timings.push(stats.rebuild_time_us);
    self.last_volumes_active = stats.volumes_active;
    self.last_overflowed_nodes = stats.overflowed_nodes;
    self.total_updates += 1;
    if stats.overflowed_nodes > 0 {
      self.updates_with_overflow += 1;
    }
  }

  /// Reset all metrics to zero.
  pub fn reset(&mut self) {
    *self = Self::default();
  }
}
