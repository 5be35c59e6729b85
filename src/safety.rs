//! Door fault latch.
//!
//! The controller raises faults from inside its tick (motion stall,
//! clock regression) and the latch accumulates them in a bitmask.
//!
//! ## Fault lifecycle
//!
//! 1. A stalled motion or regressive timestamp sets the fault bit.
//! 2. The FSM has already resolved the condition to a known state with the
//!    actuator stopped; the bit only *reports* what happened.
//! 3. The bit stays latched across later successful cycles so the
//!    embedding system can surface it through telemetry.
//! 4. An operator command clears individual bits or the whole mask.
//!
//! Unlike a hard interlock, an active fault never blocks the door: a new
//! presence still opens it.

use crate::error::DoorFault;
use log::{error, info};

/// Latched fault bitmask with per-fault occurrence counters.
#[derive(Debug, Clone, Default)]
pub struct FaultLatch {
    faults: u8,
    /// How many times each fault has been raised, indexed by bit position.
    counts: [u32; DoorFault::ALL.len()],
}

impl FaultLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `fault`.  Returns `true` if it was not already set.
    pub fn raise(&mut self, fault: DoorFault) -> bool {
        let idx = fault.mask().trailing_zeros() as usize;
        self.counts[idx] = self.counts[idx].saturating_add(1);

        if self.faults & fault.mask() == 0 {
            error!("DOOR FAULT SET: {fault}");
            self.faults |= fault.mask();
            true
        } else {
            false
        }
    }

    /// Clear a single fault.  Returns `true` if it was set.
    pub fn clear(&mut self, fault: DoorFault) -> bool {
        if self.faults & fault.mask() != 0 {
            info!("DOOR FAULT CLEARED: {fault}");
            self.faults &= !fault.mask();
            true
        } else {
            false
        }
    }

    /// Clear every latched fault.  Occurrence counters are kept.
    pub fn clear_all(&mut self) {
        for fault in DoorFault::ALL {
            self.clear(fault);
        }
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** fault is latched.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    /// Check if a specific fault is latched.
    pub fn has_fault(&self, fault: DoorFault) -> bool {
        self.faults & fault.mask() != 0
    }

    /// Total number of times `fault` has been raised since construction.
    pub fn count(&self, fault: DoorFault) -> u32 {
        self.counts[fault.mask().trailing_zeros() as usize]
    }
}
