//! Per-material render leases
//!
//! At most one render per material runs at a time. A second request for the
//! same material is refused while the first holds the lease.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::service::error::{PipelineError, Result};

#[derive(Debug, Clone, Default)]
pub struct RenderLeases {
    active: Arc<Mutex<HashSet<Uuid>>>,
}

impl RenderLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lease for `material_id`, released when the guard drops
    pub fn try_acquire(&self, material_id: Uuid) -> Result<RenderLease> {
        if !self.active.lock().unwrap().insert(material_id) {
            return Err(PipelineError::RenderInProgress(material_id));
        }
        Ok(RenderLease {
            active: Arc::clone(&self.active),
            material_id,
        })
    }

    pub fn is_held(&self, material_id: Uuid) -> bool {
        self.active.lock().unwrap().contains(&material_id)
    }
}

#[derive(Debug)]
pub struct RenderLease {
    active: Arc<Mutex<HashSet<Uuid>>>,
    material_id: Uuid,
}

impl Drop for RenderLease {
    fn drop(&mut self) {
        self.active.lock().unwrap().remove(&self.material_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_is_exclusive_per_material() {
        let leases = RenderLeases::new();
        let id = Uuid::new_v4();

        let lease = leases.try_acquire(id).unwrap();
        assert!(matches!(
            leases.try_acquire(id),
            Err(PipelineError::RenderInProgress(held)) if held == id
        ));
        // Other materials are unaffected
        assert!(leases.try_acquire(Uuid::new_v4()).is_ok());

        drop(lease);
        assert!(!leases.is_held(id));
        assert!(leases.try_acquire(id).is_ok());
    }
}
