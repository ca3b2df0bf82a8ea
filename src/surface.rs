use crate::error::SurfaceError;
use crate::raster::Bitmap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct SurfaceState {
    /// The live display surface, present between created and destroyed.
    display: Option<Bitmap>,
    /// Off-screen cache holding the full composited result, kept across
    /// surface teardown so snapshots stay available.
    cache: Option<Bitmap>,
}

/// Owns the persistent cache bitmap and its binding to the display surface.
/// Frame access is scoped: the lock is released on every exit path, so a
/// failed frame never wedges later rendering.
#[derive(Debug, Default)]
pub struct SurfaceHolder {
    state: Mutex<SurfaceState>,
}

impl SurfaceHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_created(&self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let mut state = self.state();
        state.display = Some(Bitmap::new(width, height));
        state.cache = Some(Bitmap::new(width, height));
        debug!(width, height, "surface created");
        Ok(())
    }

    pub fn surface_changed(&self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let mut state = self.state();
        let same_size = state
            .cache
            .as_ref()
            .is_some_and(|c| (c.width(), c.height()) == (width, height));
        if !same_size {
            state.display = Some(Bitmap::new(width, height));
            state.cache = Some(Bitmap::new(width, height));
            debug!(width, height, "surface resized");
        }
        Ok(())
    }

    pub fn surface_destroyed(&self) {
        self.state().display = None;
        debug!("surface destroyed");
    }

    /// Acquire both targets for one frame. The closure gets the cache and,
    /// while the display surface exists, the display. Errors when no surface
    /// was ever created.
    pub fn with_frame<R>(
        &self,
        frame: impl FnOnce(&mut Bitmap, Option<&mut Bitmap>) -> R,
    ) -> Result<R, SurfaceError> {
        let mut state = self.state();
        let SurfaceState { display, cache } = &mut *state;
        match cache {
            Some(cache) => Ok(frame(cache, display.as_mut())),
            None => Err(SurfaceError::Unavailable),
        }
    }

    /// Clone of the persistent cache, for export.
    pub fn snapshot(&self) -> Option<Bitmap> {
        self.state().cache.clone()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surface_is_rejected() {
        let holder = SurfaceHolder::new();
        assert_eq!(
            holder.surface_created(0, 240),
            Err(SurfaceError::InvalidSize {
                width: 0,
                height: 240
            })
        );
        assert!(holder.snapshot().is_none());
        assert_eq!(
            holder.with_frame(|_, _| ()).unwrap_err(),
            SurfaceError::Unavailable
        );
    }

    #[test]
    fn frame_access_before_creation_fails_without_wedging() {
        let holder = SurfaceHolder::new();
        assert!(holder.with_frame(|_, _| ()).is_err());
        holder.surface_created(8, 8).unwrap();
        assert!(holder.with_frame(|_, _| ()).is_ok());
    }

    #[test]
    fn cache_survives_surface_teardown() {
        let holder = SurfaceHolder::new();
        holder.surface_created(8, 8).unwrap();
        holder
            .with_frame(|cache, display| {
                assert!(display.is_some());
                cache.copy_from(&Bitmap::new(8, 8));
            })
            .unwrap();
        holder.surface_destroyed();
        assert!(holder.snapshot().is_some());
        holder
            .with_frame(|_, display| assert!(display.is_none()))
            .unwrap();
    }

    #[test]
    fn resize_reallocates_only_on_dimension_change() {
        let holder = SurfaceHolder::new();
        holder.surface_created(8, 8).unwrap();
        holder.surface_changed(8, 8).unwrap();
        holder.surface_changed(16, 4).unwrap();
        let snap = holder.snapshot().unwrap();
        assert_eq!((snap.width(), snap.height()), (16, 4));
    }
}
