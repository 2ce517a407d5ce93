// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

use uuid::Uuid;

/// Stable identifier for a discovered device.
///
/// Derived as a UUID v5 from a key naming the pool and the output, so the
/// same hardware maps to the same id across restarts.
///
/// # Examples
///
/// ```
/// use klereo_lib::device::DeviceId;
///
/// let a = DeviceId::for_output(12345, 0);
/// let b = DeviceId::for_output(12345, 0);
/// assert_eq!(a, b);
/// assert_ne!(a, DeviceId::for_heater(12345));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Derives an identifier from an arbitrary key.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }

    /// Identifier of the switch exposing output `output_index` of `pool_id`.
    #[must_use]
    pub fn for_output(pool_id: u64, output_index: u32) -> Self {
        Self::from_key(&Self::output_key(pool_id, output_index))
    }

    /// Identifier of the heater of `pool_id`.
    #[must_use]
    pub fn for_heater(pool_id: u64) -> Self {
        Self::from_key(&Self::heater_key(pool_id))
    }

    /// Key an output id is derived from.
    #[must_use]
    pub fn output_key(pool_id: u64, output_index: u32) -> String {
        format!("klereo-{pool_id}-output-{output_index}")
    }

    /// Key a heater id is derived from.
    #[must_use]
    pub fn heater_key(pool_id: u64) -> String {
        format!("klereo-{pool_id}-heater")
    }

    /// Creates a device identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 characters are enough to tell devices apart in logs
        let short = &self.0.to_string()[..8];
        write!(f, "DeviceId({short}...)")
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DeviceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DeviceId> for Uuid {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(DeviceId::for_output(1, 2), DeviceId::for_output(1, 2));
        assert_eq!(
            DeviceId::for_output(1, 2),
            DeviceId::from_key("klereo-1-output-2")
        );
    }

    #[test]
    fn ids_differ_per_output_and_pool() {
        assert_ne!(DeviceId::for_output(1, 2), DeviceId::for_output(1, 3));
        assert_ne!(DeviceId::for_output(1, 2), DeviceId::for_output(2, 2));
        assert_ne!(DeviceId::for_output(1, 4), DeviceId::for_heater(1));
    }

    #[test]
    fn ids_are_version_5() {
        assert_eq!(DeviceId::for_heater(7).as_uuid().get_version_num(), 5);
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", DeviceId::for_heater(1));
        assert!(debug.starts_with("DeviceId("));
        assert!(debug.ends_with("...)"));
    }

    #[test]
    fn hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        let id = DeviceId::for_output(1, 0);
        set.insert(id);
        assert!(set.contains(&DeviceId::for_output(1, 0)));
    }
}
