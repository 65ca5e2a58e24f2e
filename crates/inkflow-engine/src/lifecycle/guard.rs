use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Host application state as published by the platform runtime.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppPhase {
    /// Visible and focused.
    Active,
    /// Visible but not focused. Drawing continues.
    Inactive,
    /// Hidden or suspended. The graphics state must not be touched.
    Background,
}

impl AppPhase {
    #[inline]
    const fn to_u8(self) -> u8 {
        match self {
            AppPhase::Active => 0,
            AppPhase::Inactive => 1,
            AppPhase::Background => 2,
        }
    }

    #[inline]
    const fn from_u8(v: u8) -> Self {
        match v {
            0 => AppPhase::Active,
            1 => AppPhase::Inactive,
            _ => AppPhase::Background,
        }
    }
}

/// The one question the render loop asks before touching the display.
pub trait SuspendGuard {
    fn is_suspended(&self) -> bool;
}

/// Shared, lock-free view of the current `AppPhase`.
///
/// Clones observe the same state. The platform runtime is the only writer;
/// render code reads it through `SuspendGuard`.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Arc<AtomicU8>,
}

impl Lifecycle {
    pub fn new(initial: AppPhase) -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(initial.to_u8())),
        }
    }

    #[inline]
    pub fn phase(&self) -> AppPhase {
        AppPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Publishes a new phase. Returns the previous one.
    pub fn set(&self, phase: AppPhase) -> AppPhase {
        let prev = AppPhase::from_u8(self.phase.swap(phase.to_u8(), Ordering::AcqRel));
        if prev != phase {
            log::debug!("app phase {prev:?} -> {phase:?}");
        }
        prev
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(AppPhase::Active)
    }
}

impl SuspendGuard for Lifecycle {
    #[inline]
    fn is_suspended(&self) -> bool {
        self.phase() == AppPhase::Background
    }
}

/// Never suspends. For headless rendering.
#[derive(Debug, Copy, Clone, Default)]
pub struct AlwaysActive;

impl SuspendGuard for AlwaysActive {
    #[inline]
    fn is_suspended(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_background_suspends() {
        let lc = Lifecycle::default();
        assert!(!lc.is_suspended());

        lc.set(AppPhase::Inactive);
        assert!(!lc.is_suspended());

        lc.set(AppPhase::Background);
        assert!(lc.is_suspended());
    }

    #[test]
    fn clones_share_state() {
        let writer = Lifecycle::new(AppPhase::Background);
        let reader = writer.clone();

        assert_eq!(writer.set(AppPhase::Active), AppPhase::Background);
        assert_eq!(reader.phase(), AppPhase::Active);
    }

    #[test]
    fn state_is_visible_across_threads() {
        let lc = Lifecycle::default();
        let remote = lc.clone();
        std::thread::spawn(move || {
            remote.set(AppPhase::Background);
        })
        .join()
        .unwrap();
        assert!(lc.is_suspended());
    }
}
