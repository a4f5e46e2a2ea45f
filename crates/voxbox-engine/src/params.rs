//! Parameter snapshot shared between the control and audio threads.

use std::sync::Arc;

use arc_swap::ArcSwap;
use voxbox_config::EffectParameters;

/// The current [`EffectParameters`], published as whole snapshots.
///
/// The control thread replaces the snapshot with a single pointer swap; the
/// audio thread copies it out once per block. A reader therefore sees either
/// the old tuple or the new one, never a mix of fields.
#[derive(Debug)]
pub struct ParamStore {
    current: ArcSwap<EffectParameters>,
}

impl ParamStore {
    /// Create a store holding `params`.
    pub fn new(params: EffectParameters) -> Self {
        Self {
            current: ArcSwap::from_pointee(params),
        }
    }

    /// Copy out the current snapshot (wait-free).
    pub fn load(&self) -> EffectParameters {
        **self.current.load()
    }

    /// Publish a new snapshot.
    pub fn store(&self, params: EffectParameters) {
        self.current.store(Arc::new(params));
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(EffectParameters::default())
    }
}
