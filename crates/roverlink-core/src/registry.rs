//! Device ownership registry.
//!
//! Single authority over device records, ownership grants, and release
//! cooldowns. Every mutation runs under one mutex, so concurrent
//! assume/leave/unregister calls never observe a torn ownership state, and
//! removing a device atomically invalidates its id for all later lookups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::id::{ClientId, DeviceId};
use crate::link::ConnectionHandle;

/// Release-cooldown settings.
///
/// A window starts on every release and is refreshed if the same device id
/// is released again before expiry. Which operations consult the window is
/// configurable; expired entries are swept lazily on the next mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// Suppression window after a release. Zero disables the guard.
    pub window: Duration,

    /// Refuse `assume` of a cooling device.
    pub gate_assume: bool,

    /// Refuse admission of a cooling device id.
    pub gate_register: bool,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(5000),
            gate_assume: true,
            gate_register: true,
        }
    }
}

/// Listing snapshot of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
    pub owned: bool,
}

/// What `unregister` undid, for the caller to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unregistered {
    pub name: String,

    /// Owner whose grant was force-released, if anyone held one.
    pub former_owner: Option<ClientId>,
}

struct DeviceRecord {
    name: String,
    owner: Option<ClientId>,
    link: ConnectionHandle,
    registered_at: DateTime<Utc>,
}

#[derive(Default)]
struct RegistryState {
    devices: HashMap<DeviceId, DeviceRecord>,
    owned_by: HashMap<ClientId, DeviceId>,
    cooldowns: HashMap<DeviceId, Instant>,
}

/// Single source of truth for device identity, ownership, and cooldowns.
pub struct DeviceRegistry {
    state: Mutex<RegistryState>,
    policy: CooldownPolicy,
}

impl DeviceRegistry {
    /// Create an empty registry with the given cooldown policy.
    pub fn new(policy: CooldownPolicy) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            policy,
        }
    }

    /// Register a new device connection.
    ///
    /// Mints a fresh id, derives a display name from it, and stores an
    /// unowned record holding the device's outbound link.
    pub fn register(&self, link: ConnectionHandle) -> DeviceId {
        // Fresh ids cannot collide in practice; the loop covers the
        // admission gate refusing an id that is still live or cooling.
        loop {
            let id = DeviceId::new();
            if self.admit(id.clone(), link.clone()).is_ok() {
                return id;
            }
        }
    }

    /// Admission path shared by [`register`](Self::register).
    ///
    /// Refuses an id that is already registered and, when the policy gates
    /// registration, an id under an active cooldown. Relevant for device
    /// identities that survive reconnects.
    fn admit(&self, id: DeviceId, link: ConnectionHandle) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        Self::sweep(&mut state);

        if state.devices.contains_key(&id) {
            return Err(RegistryError::DeviceBusy(id));
        }
        if self.policy.gate_register && state.cooldowns.contains_key(&id) {
            debug!(device = %id, "registration refused, id is cooling down");
            return Err(RegistryError::DeviceInCooldown(id));
        }

        let name = format!("rover-{}", id.short());
        info!(device = %id, name = %name, "device registered");
        state.devices.insert(
            id,
            DeviceRecord {
                name,
                owner: None,
                link,
                registered_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove a device record.
    ///
    /// If the device was owned the grant is force-released through the same
    /// transition as [`leave`](Self::leave), cooldown included. Returns
    /// `None` if the id is unknown, which close paths treat as already done.
    pub fn unregister(&self, id: &DeviceId) -> Option<Unregistered> {
        let mut state = self.state.lock();
        Self::sweep(&mut state);

        let record = state.devices.remove(id)?;
        let former_owner = record.owner;
        if let Some(owner) = &former_owner {
            state.owned_by.remove(owner);
            Self::start_cooldown(&mut state, id.clone(), self.policy.window);
        }

        let connected_secs = (Utc::now() - record.registered_at).num_seconds();
        info!(device = %id, name = %record.name, connected_secs, "device unregistered");
        Some(Unregistered {
            name: record.name,
            former_owner,
        })
    }

    /// Grant exclusive control of a device to a client.
    ///
    /// Fails if the device is unknown, already owned by a different client,
    /// or under an active cooldown. Re-assuming a device the client already
    /// owns succeeds and changes nothing.
    pub fn assume(&self, id: &DeviceId, client: &ClientId) -> Result<DeviceInfo, RegistryError> {
        let mut state = self.state.lock();
        Self::sweep(&mut state);

        let name = match state.devices.get(id) {
            None => return Err(RegistryError::DeviceNotFound(id.clone())),
            Some(record) => {
                if record.owner.as_ref().is_some_and(|owner| owner != client) {
                    return Err(RegistryError::DeviceBusy(id.clone()));
                }
                record.name.clone()
            }
        };

        if self.policy.gate_assume && state.cooldowns.contains_key(id) {
            return Err(RegistryError::DeviceInCooldown(id.clone()));
        }

        if let Some(record) = state.devices.get_mut(id) {
            record.owner = Some(client.clone());
        }
        if let Some(previous) = state.owned_by.insert(client.clone(), id.clone()) {
            if previous != *id {
                // A client controls at most one device; a stale earlier
                // grant is released here so the two maps never disagree.
                if let Some(old) = state.devices.get_mut(&previous) {
                    old.owner = None;
                }
                Self::start_cooldown(&mut state, previous, self.policy.window);
            }
        }

        info!(device = %id, client = %client, "device assumed");
        Ok(DeviceInfo {
            id: id.clone(),
            name,
            owned: true,
        })
    }

    /// Release a device held by the calling client and start its cooldown.
    pub fn leave(&self, id: &DeviceId, client: &ClientId) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        Self::sweep(&mut state);

        let record = state
            .devices
            .get_mut(id)
            .ok_or_else(|| RegistryError::DeviceNotFound(id.clone()))?;
        if record.owner.as_ref() != Some(client) {
            return Err(RegistryError::NotOwner(id.clone()));
        }

        record.owner = None;
        state.owned_by.remove(client);
        Self::start_cooldown(&mut state, id.clone(), self.policy.window);
        info!(device = %id, client = %client, "device released");
        Ok(())
    }

    /// Release whatever device the client owns, if any.
    ///
    /// Same transition as [`leave`](Self::leave); used by client disconnect
    /// paths that do not know which device the client held.
    pub fn release_owned_by(&self, client: &ClientId) -> Option<DeviceId> {
        let mut state = self.state.lock();
        Self::sweep(&mut state);

        let id = state.owned_by.remove(client)?;
        if let Some(record) = state.devices.get_mut(&id) {
            record.owner = None;
        }
        Self::start_cooldown(&mut state, id.clone(), self.policy.window);
        info!(device = %id, client = %client, "device released on disconnect");
        Some(id)
    }

    /// Snapshot of every registered device, in stable id order.
    pub fn list_devices(&self) -> Vec<DeviceInfo> {
        let state = self.state.lock();
        let mut devices: Vec<DeviceInfo> = state
            .devices
            .iter()
            .map(|(id, record)| DeviceInfo {
                id: id.clone(),
                name: record.name.clone(),
                owned: record.owner.is_some(),
            })
            .collect();
        devices.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        devices
    }

    /// Current owner of a device, if any.
    pub fn owner_of(&self, id: &DeviceId) -> Option<ClientId> {
        self.state.lock().devices.get(id)?.owner.clone()
    }

    /// Device currently owned by a client, if any.
    pub fn device_owned_by(&self, client: &ClientId) -> Option<DeviceId> {
        self.state.lock().owned_by.get(client).cloned()
    }

    /// Outbound link of a registered device.
    ///
    /// `None` once the device is unregistered; senders treat that as an
    /// ordinary no-op, the device is simply gone.
    pub fn device_link(&self, id: &DeviceId) -> Option<ConnectionHandle> {
        Some(self.state.lock().devices.get(id)?.link.clone())
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.state.lock().devices.len()
    }

    fn start_cooldown(state: &mut RegistryState, id: DeviceId, window: Duration) {
        if window.is_zero() {
            return;
        }
        // Overwriting refreshes the window for a repeated release.
        state.cooldowns.insert(id, Instant::now() + window);
    }

    fn sweep(state: &mut RegistryState) {
        if state.cooldowns.is_empty() {
            return;
        }
        let now = Instant::now();
        state.cooldowns.retain(|_, expires_at| *expires_at > now);
    }
}
