//! Runtime snap settings resource with per-subscriber change queues.

use std::path::PathBuf;

use bevy::prelude::*;

use super::{SnapConfig, SnapType};

/// Which setting changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    EnableSnap,
    EnableSnapTracking,
    SnapType,
    SnapDistance,
    TrackingZ,
    TrackingAngle,
    EnableGrid,
    GridSpacing,
    TrackingDwell,
}

impl SettingKey {
    pub const ALL: [SettingKey; 9] = [
        SettingKey::EnableSnap,
        SettingKey::EnableSnapTracking,
        SettingKey::SnapType,
        SettingKey::SnapDistance,
        SettingKey::TrackingZ,
        SettingKey::TrackingAngle,
        SettingKey::EnableGrid,
        SettingKey::GridSpacing,
        SettingKey::TrackingDwell,
    ];

    /// Whether cached tracking axes or guides built under the old value are stale.
    pub fn invalidates_snap_cache(&self) -> bool {
        !matches!(self, SettingKey::GridSpacing | SettingKey::TrackingDwell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    pending: Vec<SettingKey>,
}

/// Runtime snap configuration resource
#[derive(Resource, Debug)]
pub struct SnapSettings {
    data: SnapConfig,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

impl SnapSettings {
    pub fn new(data: SnapConfig) -> Self {
        Self {
            data,
            config_path: crate::paths::config_file(),
            dirty: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.data
    }

    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            pending: Vec::new(),
        });
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drain the changes recorded for `id` since its last call.
    pub fn take_changes(&mut self, id: SubscriptionId) -> Vec<SettingKey> {
        self.subscribers
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| std::mem::take(&mut s.pending))
            .unwrap_or_default()
    }

    /// Swap in freshly loaded data, notifying every field that differs.
    pub fn replace(&mut self, data: SnapConfig) {
        let old = std::mem::replace(&mut self.data, data);
        let changed: Vec<SettingKey> = SettingKey::ALL
            .into_iter()
            .filter(|key| !field_equal(&old, &self.data, *key))
            .collect();
        for key in changed {
            self.notify(key);
        }
    }

    pub fn set_enable_snap(&mut self, value: bool) {
        if self.data.enable_snap != value {
            self.data.enable_snap = value;
            self.notify(SettingKey::EnableSnap);
        }
    }

    pub fn set_enable_snap_tracking(&mut self, value: bool) {
        if self.data.enable_snap_tracking != value {
            self.data.enable_snap_tracking = value;
            self.notify(SettingKey::EnableSnapTracking);
        }
    }

    pub fn set_snap_type(&mut self, value: SnapType) {
        if self.data.snap_type != value {
            self.data.snap_type = value;
            self.notify(SettingKey::SnapType);
        }
    }

    pub fn set_snap_distance(&mut self, value: f32) {
        let value = value.max(0.0);
        if self.data.snap_distance != value {
            self.data.snap_distance = value;
            self.notify(SettingKey::SnapDistance);
        }
    }

    pub fn set_tracking_z(&mut self, value: bool) {
        if self.data.tracking_z != value {
            self.data.tracking_z = value;
            self.notify(SettingKey::TrackingZ);
        }
    }

    pub fn set_tracking_angle(&mut self, value: Option<f32>) {
        if self.data.tracking_angle != value {
            self.data.tracking_angle = value;
            self.notify(SettingKey::TrackingAngle);
        }
    }

    pub fn set_enable_grid(&mut self, value: bool) {
        if self.data.enable_grid != value {
            self.data.enable_grid = value;
            self.notify(SettingKey::EnableGrid);
        }
    }

    pub fn set_grid_spacing(&mut self, value: f32) {
        if self.data.grid_spacing != value && value > 0.0 {
            self.data.grid_spacing = value;
            self.notify(SettingKey::GridSpacing);
        }
    }

    pub fn set_tracking_dwell_ms(&mut self, value: u64) {
        if self.data.tracking_dwell_ms != value {
            self.data.tracking_dwell_ms = value;
            self.notify(SettingKey::TrackingDwell);
        }
    }

    fn notify(&mut self, key: SettingKey) {
        self.dirty = true;
        debug!("Snap setting changed: {:?}", key);
        for subscriber in &mut self.subscribers {
            if !subscriber.pending.contains(&key) {
                subscriber.pending.push(key);
            }
        }
    }
}

fn field_equal(a: &SnapConfig, b: &SnapConfig, key: SettingKey) -> bool {
    match key {
        SettingKey::EnableSnap => a.enable_snap == b.enable_snap,
        SettingKey::EnableSnapTracking => a.enable_snap_tracking == b.enable_snap_tracking,
        SettingKey::SnapType => a.snap_type == b.snap_type,
        SettingKey::SnapDistance => a.snap_distance == b.snap_distance,
        SettingKey::TrackingZ => a.tracking_z == b.tracking_z,
        SettingKey::TrackingAngle => a.tracking_angle == b.tracking_angle,
        SettingKey::EnableGrid => a.enable_grid == b.enable_grid,
        SettingKey::GridSpacing => a.grid_spacing == b.grid_spacing,
        SettingKey::TrackingDwell => a.tracking_dwell_ms == b.tracking_dwell_ms,
    }
}
