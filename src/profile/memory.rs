//! In-memory profile store

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{ProfileFields, ProfileRecord, ProfileStore};
use crate::identity::IdentityId;
use crate::types::ProfileError;

/// Kind of fault to inject on upcoming writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFault {
    Network,
    WriteConflict,
}

pub struct InMemoryProfileStore {
    profiles: DashMap<IdentityId, ProfileRecord>,
    latency: Option<Duration>,
    /// Remaining writes to fail, and how
    faults: Mutex<(usize, InjectedFault)>,
    put_calls: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
            latency: None,
            faults: Mutex::new((0, InjectedFault::Network)),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Delay every write by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `count` writes fail with `fault`
    pub fn fail_next_writes(&self, count: usize, fault: InjectedFault) {
        if let Ok(mut faults) = self.faults.lock() {
            *faults = (count, fault);
        }
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn put_profile(
        &self,
        identity_id: &IdentityId,
        fields: &ProfileFields,
    ) -> Result<(), ProfileError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let injected = match self.faults.lock() {
            Ok(mut faults) if faults.0 > 0 => {
                faults.0 -= 1;
                Some(faults.1)
            }
            _ => None,
        };
        if let Some(fault) = injected {
            return Err(match fault {
                InjectedFault::Network => ProfileError::Network("simulated outage".into()),
                InjectedFault::WriteConflict => {
                    ProfileError::WriteConflict("simulated conflict".into())
                }
            });
        }

        self.profiles.insert(
            identity_id.clone(),
            ProfileRecord::new(identity_id.clone(), fields.clone()),
        );
        Ok(())
    }

    async fn get_profile(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<ProfileRecord>, ProfileError> {
        Ok(self.profiles.get(identity_id).map(|r| r.value().clone()))
    }
}
