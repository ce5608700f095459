//! Gesture interpreter: turns pan, pinch, double-tap and zoom-button input
//! into transform updates.
//!
//! # Interaction Model
//!
//! At most one gesture owns the interaction at a time ([`ActiveGesture`]).
//! Live updates are applied relative to the last committed state and are not
//! clamped, so the image follows the finger. Ending a gesture commits: the
//! translation is clamped for the current scale and the result becomes the
//! baseline for the next gesture.
//!
//! Zoom buttons and double-tap animate the scale. Their commit runs on the
//! first [`CropEditor::tick`] at or after the animation deadline, or on
//! [`CropEditor::settle`]. Between those points the displayed transform may
//! briefly sit outside the translation bounds.

use std::fmt;
use std::time::Duration;

use log::debug;

use super::animation::ZoomAnimation;
use super::bounds::clamp_translation;
use super::state::{ScaleLimits, TransformState};
use crate::config::CropConfig;
use crate::error::CropError;
use crate::geometry::{CropFrame, ImageSize};
use crate::resolve::{CropPlan, CropStrategy};

/// Scales closer than this are treated as equal when toggling zoom.
const SCALE_EPSILON: f64 = 1e-6;

/// Kinds of input that can drive the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Pan,
    Pinch,
    DoubleTap,
    ZoomButton,
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureKind::Pan => "pan",
            GestureKind::Pinch => "pinch",
            GestureKind::DoubleTap => "double-tap",
            GestureKind::ZoomButton => "zoom-button",
        };
        f.write_str(name)
    }
}

/// Direction of a zoom-button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// The gesture currently owning the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActiveGesture {
    #[default]
    Idle,
    Pan,
    Pinch,
    /// Animated zoom started by a double-tap or a zoom button.
    Zoom(ZoomAnimation),
}

impl ActiveGesture {
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            ActiveGesture::Idle => None,
            ActiveGesture::Pan => Some(GestureKind::Pan),
            ActiveGesture::Pinch => Some(GestureKind::Pinch),
            ActiveGesture::Zoom(animation) => Some(animation.source),
        }
    }
}

/// Interactive crop transform for one loaded image.
#[derive(Debug, Clone)]
pub struct CropEditor {
    image: ImageSize,
    frame: CropFrame,
    limits: ScaleLimits,
    fit_scale: f64,
    zoom_step: f64,
    double_tap_multiplier: f64,
    animation_duration: Duration,
    live: TransformState,
    committed: TransformState,
    active: ActiveGesture,
}

impl CropEditor {
    /// Load `image` into `frame`, centered at the fit scale.
    ///
    /// The fit scale is the coverage scale capped at `initial_scale_cap`, then
    /// brought back into the scale limits, so the initial state always covers
    /// the frame.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidState` if the image has a zero dimension.
    pub fn new(image: ImageSize, frame: CropFrame, config: &CropConfig) -> Result<Self, CropError> {
        if image.is_empty() {
            return Err(CropError::InvalidState(format!(
                "cannot crop an unmeasured image ({}x{})",
                image.width, image.height
            )));
        }

        let limits = ScaleLimits::for_image(image, frame, config.min_scale_floor, config.max_scale);
        let fit_scale = limits.clamp(limits.coverage_scale().min(config.initial_scale_cap));
        let initial = TransformState::centered(fit_scale);

        debug!(
            "crop editor loaded {}x{} image into {} frame (fit {:.4}, limits {:.4}..={:.4})",
            image.width,
            image.height,
            frame.side(),
            fit_scale,
            limits.min,
            limits.max
        );

        Ok(Self {
            image,
            frame,
            limits,
            fit_scale,
            zoom_step: config.zoom_step,
            double_tap_multiplier: config.double_tap_multiplier,
            animation_duration: config.zoom_animation(),
            live: initial,
            committed: initial,
            active: ActiveGesture::Idle,
        })
    }

    pub fn image(&self) -> ImageSize {
        self.image
    }

    pub fn frame(&self) -> CropFrame {
        self.frame
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    /// Transform to render this frame (may be mid-gesture and unclamped).
    pub fn displayed(&self) -> TransformState {
        self.live
    }

    /// Last committed transform. Always covers the frame.
    pub fn committed(&self) -> TransformState {
        self.committed
    }

    pub fn active(&self) -> ActiveGesture {
        self.active
    }

    /// True when no gesture or animation is in flight.
    pub fn is_settled(&self) -> bool {
        self.active == ActiveGesture::Idle
    }

    pub fn pan_begin(&mut self) -> Result<(), CropError> {
        self.begin(GestureKind::Pan)?;
        self.active = ActiveGesture::Pan;
        Ok(())
    }

    /// Move the image by the gesture's total translation since it began.
    pub fn pan_update(&mut self, dx: f64, dy: f64) -> Result<(), CropError> {
        self.expect_active(GestureKind::Pan)?;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(CropError::InvalidState(format!(
                "pan delta must be finite, got ({dx}, {dy})"
            )));
        }
        self.live.translation = self.committed.translation.offset(dx, dy);
        Ok(())
    }

    pub fn pan_end(&mut self) -> Result<(), CropError> {
        self.expect_active(GestureKind::Pan)?;
        self.commit();
        Ok(())
    }

    pub fn pinch_begin(&mut self) -> Result<(), CropError> {
        self.begin(GestureKind::Pinch)?;
        self.active = ActiveGesture::Pinch;
        Ok(())
    }

    /// Scale by `ratio` relative to the scale at pinch start, within limits.
    pub fn pinch_update(&mut self, ratio: f64) -> Result<(), CropError> {
        self.expect_active(GestureKind::Pinch)?;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CropError::InvalidState(format!(
                "pinch ratio must be positive, got {ratio}"
            )));
        }
        self.live.scale = self.limits.clamp(self.committed.scale * ratio);
        Ok(())
    }

    pub fn pinch_end(&mut self) -> Result<(), CropError> {
        self.expect_active(GestureKind::Pinch)?;
        self.commit();
        Ok(())
    }

    /// Toggle between the fit scale and the zoomed scale
    /// (`fit * double_tap_multiplier`, within limits).
    pub fn double_tap(&mut self, now: Duration) -> Result<(), CropError> {
        self.begin(GestureKind::DoubleTap)?;
        let zoomed = self.limits.clamp(self.fit_scale * self.double_tap_multiplier);
        let target = if self.committed.scale < zoomed - SCALE_EPSILON {
            zoomed
        } else {
            self.fit_scale
        };
        self.animate_to(target, now, GestureKind::DoubleTap);
        Ok(())
    }

    /// Zoom-button press: multiply or divide the scale by the zoom step.
    pub fn zoom(&mut self, direction: ZoomDirection, now: Duration) -> Result<(), CropError> {
        self.begin(GestureKind::ZoomButton)?;
        let requested = match direction {
            ZoomDirection::In => self.committed.scale * self.zoom_step,
            ZoomDirection::Out => self.committed.scale / self.zoom_step,
        };
        self.animate_to(self.limits.clamp(requested), now, GestureKind::ZoomButton);
        Ok(())
    }

    /// Advance a running zoom animation to `now`.
    ///
    /// Returns `true` while the animation is still running. On the first tick
    /// at or past the deadline the final scale is applied and committed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let ActiveGesture::Zoom(animation) = self.active else {
            return false;
        };
        if animation.is_finished(now) {
            self.live.scale = animation.to;
            self.commit();
            false
        } else {
            self.live.scale = animation.scale_at(now);
            true
        }
    }

    /// Finish whatever is in flight and commit it.
    ///
    /// Pan and pinch keep their last live value; an animation jumps to its
    /// target. A no-op when already settled.
    pub fn settle(&mut self) {
        match self.active {
            ActiveGesture::Idle => {}
            ActiveGesture::Pan | ActiveGesture::Pinch => self.commit(),
            ActiveGesture::Zoom(animation) => {
                self.live.scale = animation.to;
                self.commit();
            }
        }
    }

    /// Drop any in-flight gesture and return to the centered fit state.
    pub fn reset(&mut self) {
        let initial = TransformState::centered(self.fit_scale);
        self.live = initial;
        self.committed = initial;
        self.active = ActiveGesture::Idle;
    }

    /// Resolve the committed transform into a crop plan.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidState` while a gesture or animation is in
    /// flight (call [`settle`](Self::settle) first), or whatever the strategy
    /// reports for degenerate geometry.
    pub fn resolve(&self, strategy: &dyn CropStrategy) -> Result<CropPlan, CropError> {
        if let Some(kind) = self.active.kind() {
            return Err(CropError::InvalidState(format!(
                "cannot resolve while {kind} gesture is active"
            )));
        }
        strategy.resolve(self.image, &self.committed, self.frame)
    }

    fn begin(&mut self, requested: GestureKind) -> Result<(), CropError> {
        match self.active {
            ActiveGesture::Idle => Ok(()),
            ActiveGesture::Zoom(_) => {
                // Programmatic zooms never block the user
                self.settle();
                Ok(())
            }
            ActiveGesture::Pan | ActiveGesture::Pinch => {
                let active = self.active.kind().unwrap_or(requested);
                debug!("rejecting {requested} gesture, {active} owns the interaction");
                Err(CropError::GestureConflict { active, requested })
            }
        }
    }

    fn expect_active(&self, kind: GestureKind) -> Result<(), CropError> {
        if self.active.kind() == Some(kind) {
            return Ok(());
        }
        Err(CropError::InvalidState(format!(
            "{kind} update received without an active {kind} gesture"
        )))
    }

    fn animate_to(&mut self, target: f64, now: Duration, source: GestureKind) {
        if (target - self.committed.scale).abs() < SCALE_EPSILON {
            self.commit();
            return;
        }
        let animation = ZoomAnimation::new(
            self.committed.scale,
            target,
            now,
            self.animation_duration,
            source,
        );
        self.active = ActiveGesture::Zoom(animation);
        self.tick(now);
    }

    fn commit(&mut self) {
        self.live.translation =
            clamp_translation(self.live.translation, self.live.scale, self.image, self.frame);
        self.committed = self.live;
        self.active = ActiveGesture::Idle;
        debug!(
            "committed transform: scale {:.4}, translate ({:.1}, {:.1})",
            self.committed.scale, self.committed.translation.x, self.committed.translation.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Translation;
    use crate::resolve::DirectRectCrop;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn editor(width: u32, height: u32) -> CropEditor {
        let frame = CropFrame::new(300.0).unwrap();
        CropEditor::new(ImageSize::new(width, height), frame, &CropConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state_covers_frame() {
        let ed = editor(1000, 2000);
        assert!((ed.fit_scale() - 0.3).abs() < 1e-12);
        let state = ed.committed();
        assert_eq!(state.translation, Translation::ZERO);
        assert!(state.covers(ed.image(), ed.frame()));
        let (w, h) = state.scaled_size(ed.image());
        assert!(w >= 300.0 - 1e-9 && h >= 300.0 - 1e-9);
    }

    #[test]
    fn test_initial_scale_cap_never_breaks_coverage() {
        // Coverage needs 3x; the 1.2 cap must not shrink it below that
        let ed = editor(100, 100);
        assert_eq!(ed.fit_scale(), 3.0);
        assert!(ed.committed().covers(ed.image(), ed.frame()));
    }

    #[test]
    fn test_unmeasured_image_rejected() {
        let frame = CropFrame::new(300.0).unwrap();
        let result = CropEditor::new(ImageSize::new(0, 500), frame, &CropConfig::default());
        assert!(matches!(result, Err(CropError::InvalidState(_))));
    }

    #[test]
    fn test_pan_is_relative_to_committed() {
        let mut ed = editor(600, 600);
        ed.pan_begin().unwrap();
        ed.pan_update(20.0, 10.0).unwrap();
        ed.pan_update(40.0, 15.0).unwrap();
        assert_eq!(ed.displayed().translation, Translation::new(40.0, 15.0));
        ed.pan_end().unwrap();

        ed.pan_begin().unwrap();
        ed.pan_update(5.0, 5.0).unwrap();
        assert_eq!(ed.displayed().translation, Translation::new(45.0, 20.0));
    }

    #[test]
    fn test_pan_live_updates_are_unclamped() {
        let mut ed = editor(600, 600);
        ed.pan_begin().unwrap();
        ed.pan_update(10_000.0, 0.0).unwrap();
        assert_eq!(ed.displayed().translation.x, 10_000.0);
        // Committed state is untouched mid-gesture
        assert_eq!(ed.committed().translation, Translation::ZERO);
    }

    #[test]
    fn test_pan_commit_clamps() {
        let mut ed = editor(300, 300);
        ed.pinch_begin().unwrap();
        ed.pinch_update(5.0).unwrap();
        ed.pinch_end().unwrap();
        assert_eq!(ed.committed().scale, 2.5);

        ed.pan_begin().unwrap();
        ed.pan_update(10_000.0, 0.0).unwrap();
        ed.pan_end().unwrap();

        // 300 * 2.5 = 750; (750 - 300) / 2 = 225
        assert_eq!(ed.committed().translation.x, 225.0);
        assert_eq!(ed.displayed().translation.x, 225.0);
    }

    #[test]
    fn test_pinch_clamped_to_max() {
        let mut ed = editor(300, 300);
        ed.pinch_begin().unwrap();
        ed.pinch_update(5.0).unwrap();
        assert_eq!(ed.displayed().scale, 2.5);
    }

    #[test]
    fn test_pinch_clamped_to_min() {
        let mut ed = editor(1000, 2000);
        ed.pinch_begin().unwrap();
        ed.pinch_update(0.1).unwrap();
        assert_eq!(ed.displayed().scale, ed.limits().min);
        ed.pinch_end().unwrap();
        assert!(ed.committed().covers(ed.image(), ed.frame()));
    }

    #[test]
    fn test_pinch_ratio_relative_to_start() {
        let mut ed = editor(300, 300);
        ed.pinch_begin().unwrap();
        ed.pinch_update(1.5).unwrap();
        ed.pinch_end().unwrap();
        ed.pinch_begin().unwrap();
        ed.pinch_update(1.5).unwrap();
        assert!((ed.displayed().scale - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_pinch_end_reclamps_translation() {
        let mut ed = editor(300, 300);
        ed.pinch_begin().unwrap();
        ed.pinch_update(2.5).unwrap();
        ed.pinch_end().unwrap();
        ed.pan_begin().unwrap();
        ed.pan_update(200.0, -200.0).unwrap();
        ed.pan_end().unwrap();

        // Zoom back out: the old translation is now out of bounds
        ed.pinch_begin().unwrap();
        ed.pinch_update(0.5).unwrap();
        ed.pinch_end().unwrap();
        assert_eq!(ed.committed().scale, 1.25);
        // (375 - 300) / 2 = 37.5
        assert_eq!(ed.committed().translation, Translation::new(37.5, -37.5));
    }

    #[test]
    fn test_invalid_pinch_ratio() {
        let mut ed = editor(300, 300);
        ed.pinch_begin().unwrap();
        assert!(ed.pinch_update(0.0).is_err());
        assert!(ed.pinch_update(f64::NAN).is_err());
        assert_eq!(ed.displayed().scale, 1.0);
    }

    #[test]
    fn test_gestures_are_mutually_exclusive() {
        let mut ed = editor(600, 600);
        ed.pan_begin().unwrap();
        let err = ed.pinch_begin().unwrap_err();
        assert_eq!(
            err,
            CropError::GestureConflict {
                active: GestureKind::Pan,
                requested: GestureKind::Pinch,
            }
        );
        assert!(ed.double_tap(ms(0)).is_err());
        assert!(ed.zoom(ZoomDirection::In, ms(0)).is_err());
        assert_eq!(ed.active(), ActiveGesture::Pan);
    }

    #[test]
    fn test_update_without_begin() {
        let mut ed = editor(600, 600);
        assert!(matches!(ed.pan_update(1.0, 1.0), Err(CropError::InvalidState(_))));
        assert!(matches!(ed.pinch_end(), Err(CropError::InvalidState(_))));
        ed.pan_begin().unwrap();
        assert!(matches!(ed.pinch_update(1.2), Err(CropError::InvalidState(_))));
    }

    #[test]
    fn test_double_tap_toggles_between_fit_and_zoomed() {
        let mut ed = editor(600, 600);
        let fit = ed.fit_scale();
        assert_eq!(fit, 0.5);

        ed.double_tap(ms(0)).unwrap();
        assert!(!ed.is_settled());
        assert!(ed.tick(ms(100)));
        assert!(!ed.tick(ms(200)));
        assert_eq!(ed.committed().scale, 1.0);

        ed.double_tap(ms(1000)).unwrap();
        ed.tick(ms(1250));
        assert_eq!(ed.committed().scale, fit);
    }

    #[test]
    fn test_double_tap_from_pinched_scale_returns_to_fit() {
        let mut ed = editor(600, 600);
        ed.pinch_begin().unwrap();
        ed.pinch_update(4.0).unwrap();
        ed.pinch_end().unwrap();
        assert_eq!(ed.committed().scale, 2.0);

        ed.double_tap(ms(0)).unwrap();
        ed.settle();
        assert_eq!(ed.committed().scale, 0.5);
    }

    #[test]
    fn test_animation_is_eased_and_deferred() {
        let mut ed = editor(600, 600);
        ed.zoom(ZoomDirection::In, ms(0)).unwrap();
        // Displayed scale moves, committed waits for the deadline
        ed.tick(ms(100));
        let mid = ed.displayed().scale;
        assert!(mid > 0.5 && mid < 0.6);
        assert_eq!(ed.committed().scale, 0.5);

        ed.tick(ms(200));
        assert!((ed.committed().scale - 0.6).abs() < 1e-12);
        assert!(ed.is_settled());
    }

    #[test]
    fn test_zoom_out_commit_reclamps_translation() {
        let mut ed = editor(600, 600);
        ed.pinch_begin().unwrap();
        ed.pinch_update(2.0).unwrap();
        ed.pinch_end().unwrap();
        ed.pan_begin().unwrap();
        ed.pan_update(300.0, 0.0).unwrap();
        ed.pan_end().unwrap();
        assert_eq!(ed.committed().translation.x, 150.0);

        ed.zoom(ZoomDirection::Out, ms(0)).unwrap();
        // Mid-animation the displayed translation is stale
        ed.tick(ms(150));
        assert_eq!(ed.displayed().translation.x, 150.0);

        ed.tick(ms(400));
        let state = ed.committed();
        let max_x = (600.0 * state.scale - 300.0) / 2.0;
        assert!((state.translation.x - max_x).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut ed = editor(300, 300);
        ed.zoom(ZoomDirection::Out, ms(0)).unwrap();
        // Already at min: nothing to animate
        assert!(ed.is_settled());
        assert_eq!(ed.committed().scale, 1.0);

        for i in 0..20 {
            ed.zoom(ZoomDirection::In, ms(i * 10)).unwrap();
        }
        ed.settle();
        assert_eq!(ed.committed().scale, 2.5);
    }

    #[test]
    fn test_pan_interrupts_animation() {
        let mut ed = editor(600, 600);
        ed.zoom(ZoomDirection::In, ms(0)).unwrap();
        ed.pan_begin().unwrap();
        assert!((ed.committed().scale - 0.6).abs() < 1e-12);
        assert_eq!(ed.active(), ActiveGesture::Pan);
    }

    #[test]
    fn test_settle_and_reset() {
        let mut ed = editor(600, 600);
        ed.pan_begin().unwrap();
        ed.pan_update(-500.0, 0.0).unwrap();
        ed.settle();
        assert!(ed.is_settled());
        assert_eq!(ed.committed().translation.x, 0.0);

        ed.pinch_begin().unwrap();
        ed.pinch_update(3.0).unwrap();
        ed.reset();
        assert!(ed.is_settled());
        assert_eq!(ed.committed(), TransformState::centered(ed.fit_scale()));
    }

    #[test]
    fn test_resolve_requires_settled_state() {
        let mut ed = editor(600, 600);
        ed.pan_begin().unwrap();
        assert!(matches!(ed.resolve(&DirectRectCrop), Err(CropError::InvalidState(_))));
        ed.pan_end().unwrap();
        assert!(ed.resolve(&DirectRectCrop).is_ok());
    }

    #[test]
    fn test_tick_without_animation() {
        let mut ed = editor(600, 600);
        assert!(!ed.tick(ms(10)));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
