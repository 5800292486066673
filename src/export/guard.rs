use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::render::{RenderTarget, TargetSize};

/// Set while an export sequence is running
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag, or `None` if it is already set
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }
}

/// Clears the busy flag when dropped
#[derive(Debug)]
pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Pixel density and logical size of a render target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub pixel_ratio: f32,
    pub size: TargetSize,
}

impl TargetState {
    pub fn capture<T: RenderTarget + ?Sized>(target: &T) -> Self {
        Self {
            pixel_ratio: target.pixel_ratio(),
            size: target.size(),
        }
    }
}

/// Exclusive borrow of a render target that puts its captured state back on drop,
/// including while unwinding.
pub struct TargetStateGuard<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
    saved: TargetState,
}

impl<'a, T: RenderTarget + ?Sized> TargetStateGuard<'a, T> {
    pub fn capture(target: &'a mut T) -> Self {
        let saved = TargetState::capture(&*target);
        Self { target, saved }
    }

    pub fn saved(&self) -> TargetState {
        self.saved
    }
}

impl<T: RenderTarget + ?Sized> Deref for TargetStateGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for TargetStateGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for TargetStateGuard<'_, T> {
    fn drop(&mut self) {
        self.target.set_size(self.saved.size);
        self.target.set_pixel_ratio(self.saved.pixel_ratio);
        log::debug!(
            "restored render target to {}x{} @ {}x",
            self.saved.size.width,
            self.saved.size.height,
            self.saved.pixel_ratio
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareTarget;

    #[test]
    fn test_busy_flag_is_exclusive() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_set());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_state_guard_restores_on_drop() {
        let mut target = SoftwareTarget::new(TargetSize::new(640, 360), 2.0);
        {
            let mut guard = TargetStateGuard::capture(&mut target);
            guard.set_pixel_ratio(1.0);
            guard.set_size(TargetSize::new(7680, 4320));
            assert_eq!(guard.drawing_buffer_size(), TargetSize::new(7680, 4320));
            assert_eq!(guard.saved().size, TargetSize::new(640, 360));
        }
        assert_eq!(target.size(), TargetSize::new(640, 360));
        assert_eq!(target.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_state_guard_restores_while_unwinding() {
        let mut target = SoftwareTarget::new(TargetSize::new(100, 50), 1.5);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = TargetStateGuard::capture(&mut target);
            guard.set_size(TargetSize::new(1, 1));
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(target.size(), TargetSize::new(100, 50));
        assert_eq!(target.pixel_ratio(), 1.5);
    }
}
