//! The point-pick session: pointer and keyboard events in, one 3D point (or a
//! cancellation) out.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;

use crate::config::{SnapConfig, SnapSettings, SubscriptionId};
use crate::geometry::Workplane;
use crate::notify::{NotificationBus, TipLevel};
use crate::pick::controller::CompletionController;
use crate::pick::input::{CoordinateInput, InputError, PointInput};
use crate::snap::{ObjectSnap, PlaneSnap, Snap, SnapContext, SnapResult, TrackingSnap};
use crate::view::{DetectedShape, ShapeFilter, ShapeType, SnapView, ViewId};
use crate::visual::{MeshData, PointStyle, TempVisuals, VisualContext};

pub type PointValidator = Arc<dyn Fn(Vec3) -> bool + Send + Sync>;
/// Builds preview geometry for the candidate point (`None` before the first snap).
pub type PreviewFn = Arc<dyn Fn(Option<Vec3>) -> Vec<MeshData> + Send + Sync>;
pub type PromptFn = Arc<dyn Fn(&SnapResult) -> String + Send + Sync>;
pub type FeatureGuard = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    Idle,
    Snapping,
    Inputting,
    Completed,
    Cancelled,
}

impl PickState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PickState::Completed | PickState::Cancelled)
    }
}

/// How a session ended. `Completed(None)` means "stop here" (Enter with no point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    Completed(Option<Vec3>),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keys a session reacts to, already translated from the platform key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKey {
    Escape,
    Enter,
    Char(char),
}

/// Whether a character starts numeric entry.
pub fn starts_input(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | '#' | '@')
}

/// A named fixed point checked before any provider.
#[derive(Clone)]
pub struct FeaturePoint {
    pub point: Vec3,
    pub prompt: String,
    pub when: Option<FeatureGuard>,
}

impl FeaturePoint {
    pub fn new(point: Vec3, prompt: impl Into<String>) -> Self {
        Self {
            point,
            prompt: prompt.into(),
            when: None,
        }
    }

    pub fn when(mut self, guard: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.when = Some(Arc::new(guard));
        self
    }

    fn applies(&self) -> bool {
        self.when.as_ref().is_none_or(|guard| guard())
    }
}

impl fmt::Debug for FeaturePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeaturePoint")
            .field("point", &self.point)
            .field("prompt", &self.prompt)
            .field("guarded", &self.when.is_some())
            .finish()
    }
}

/// What one pick asks for.
#[derive(Clone, Default)]
pub struct PointSnapData {
    pub ref_point: Option<Vec3>,
    pub validator: Option<PointValidator>,
    pub preview: Option<PreviewFn>,
    pub prompt: Option<PromptFn>,
    pub feature_points: Vec<FeaturePoint>,
    pub filter: Option<ShapeFilter>,
    pub plane: Option<Workplane>,
}

impl PointSnapData {
    pub fn with_ref_point(mut self, point: Vec3) -> Self {
        self.ref_point = Some(point);
        self
    }

    pub fn with_validator(mut self, validator: impl Fn(Vec3) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn with_preview(
        mut self,
        preview: impl Fn(Option<Vec3>) -> Vec<MeshData> + Send + Sync + 'static,
    ) -> Self {
        self.preview = Some(Arc::new(preview));
        self
    }

    pub fn with_prompt(mut self, prompt: impl Fn(&SnapResult) -> String + Send + Sync + 'static) -> Self {
        self.prompt = Some(Arc::new(prompt));
        self
    }

    pub fn with_feature_point(mut self, feature: FeaturePoint) -> Self {
        self.feature_points.push(feature);
        self
    }

    fn accepts(&self, point: Vec3) -> bool {
        self.validator.as_ref().is_none_or(|validate| validate(point))
    }
}

impl fmt::Debug for PointSnapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointSnapData")
            .field("ref_point", &self.ref_point)
            .field("validator", &self.validator.is_some())
            .field("preview", &self.preview.is_some())
            .field("prompt", &self.prompt.is_some())
            .field("feature_points", &self.feature_points)
            .field("plane", &self.plane)
            .finish()
    }
}

/// The collaborators a session talks to during one call.
pub struct PickEnv<'a> {
    pub visual: &'a mut dyn VisualContext,
    pub bus: &'a mut dyn NotificationBus,
    pub settings: &'a mut SnapSettings,
    pub now: Duration,
}

/// Prompt text for a snap: `info -> distance`, either part alone, or nothing.
pub fn default_prompt(snapped: &SnapResult) -> Option<String> {
    let distance = snapped
        .offset_distance()
        .map(|d| format!("{:.*}", crate::constants::PROMPT_DECIMALS, d));
    match (&snapped.info, distance) {
        (Some(info), Some(distance)) => Some(format!("{info} -> {distance}")),
        (Some(info), None) => Some(info.clone()),
        (None, Some(distance)) => Some(distance),
        (None, None) => None,
    }
}

/// One point-picking interaction.
///
/// Every call takes the [`PickEnv`] it should act on. Once the session has
/// completed or been cancelled every call is a no-op.
pub struct SnapEventHandler {
    state: PickState,
    data: PointSnapData,
    snaps: Vec<Box<dyn Snap>>,
    input: Box<dyn PointInput>,
    snapped: Option<SnapResult>,
    preview: TempVisuals,
    controller: CompletionController,
    outcome: Option<PickOutcome>,
    subscription: Option<SubscriptionId>,
    view: ViewId,
}

impl fmt::Debug for SnapEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snaps: Vec<_> = self.snaps.iter().map(|s| s.name()).collect();
        f.debug_struct("SnapEventHandler")
            .field("state", &self.state)
            .field("data", &self.data)
            .field("snaps", &snaps)
            .field("snapped", &self.snapped)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl SnapEventHandler {
    pub fn new(
        data: PointSnapData,
        snaps: Vec<Box<dyn Snap>>,
        input: Box<dyn PointInput>,
        env: &mut PickEnv<'_>,
    ) -> Self {
        let mut handler = Self {
            state: PickState::Idle,
            data,
            snaps,
            input,
            snapped: None,
            preview: TempVisuals::default(),
            controller: CompletionController::default(),
            outcome: None,
            subscription: Some(env.settings.subscribe()),
            view: ViewId::default(),
        };
        handler.show_preview(env.visual);
        debug!("Pick session started: {:?}", handler.data);
        handler
    }

    /// A pick with the standard providers: geometry features, tracking, then the plane.
    pub fn for_point(data: PointSnapData, env: &mut PickEnv<'_>) -> Self {
        let snaps: Vec<Box<dyn Snap>> = vec![
            Box::new(ObjectSnap::new(data.ref_point)),
            Box::new(TrackingSnap::new(data.ref_point)),
            Box::new(PlaneSnap::new(data.plane, data.ref_point)),
        ];
        let input = CoordinateInput {
            reference_point: data.ref_point,
            plane: data.plane,
        };
        Self::new(data, snaps, Box::new(input), env)
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn snapped(&self) -> Option<&SnapResult> {
        self.snapped.as_ref()
    }

    pub fn outcome(&self) -> Option<PickOutcome> {
        self.outcome
    }

    pub fn on_completed(&mut self, callback: impl FnOnce() + Send + Sync + 'static) {
        self.controller.on_completed(callback);
    }

    pub fn on_cancelled(&mut self, callback: impl FnOnce() + Send + Sync + 'static) {
        self.controller.on_cancelled(callback);
    }

    pub fn pointer_move(&mut self, view: &dyn SnapView, mx: f32, my: f32, env: &mut PickEnv<'_>) {
        if self.state.is_terminal() {
            return;
        }
        if self.state == PickState::Idle {
            self.state = PickState::Snapping;
        }
        self.sync_settings(env);
        self.view = view.id();

        self.preview.release_all(env.visual);
        for snap in &mut self.snaps {
            snap.remove_dynamic_object(env.visual);
        }

        let config = env.settings.config().clone();
        let shapes = self.detect(view, mx, my);
        let ctx = SnapContext {
            view,
            mx,
            my,
            shapes: &shapes,
            config: &config,
            now: env.now,
        };

        let mut snapped = self
            .feature_point(view, mx, my, &config)
            .or_else(|| self.provider_snap(&ctx, env.visual));
        if let Some(result) = &mut snapped
            && result.ref_point.is_none()
        {
            result.ref_point = self.data.ref_point;
        }
        for snap in &mut self.snaps {
            snap.handle_snapped(&ctx, env.visual, snapped.as_ref());
        }
        self.snapped = snapped;

        self.show_prompt(env.bus);
        self.show_preview(env.visual);
    }

    /// Primary release accepts the current snap. A session that never saw a
    /// move (touch input) snaps at the release position first.
    pub fn pointer_up(
        &mut self,
        view: &dyn SnapView,
        mx: f32,
        my: f32,
        button: PointerButton,
        env: &mut PickEnv<'_>,
    ) {
        if self.state.is_terminal() || button != PointerButton::Primary {
            return;
        }
        if self.state == PickState::Idle {
            self.pointer_move(view, mx, my, env);
        }
        if self.snapped.is_some() {
            self.finish(env);
        }
    }

    /// Returns true if the key was consumed.
    pub fn key_down(&mut self, key: PickKey, env: &mut PickEnv<'_>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match key {
            PickKey::Escape => {
                self.cancel(env);
                true
            }
            PickKey::Enter => {
                self.snapped = None;
                self.finish(env);
                true
            }
            PickKey::Char(c) if starts_input(c) => {
                if self.state != PickState::Inputting {
                    self.state = PickState::Inputting;
                    env.bus.show_input(&c.to_string());
                }
                true
            }
            PickKey::Char(_) => false,
        }
    }

    /// Text submitted from the entry box opened by [`Self::key_down`].
    ///
    /// Errors are shown as toasts and leave the session waiting for more input.
    pub fn submit_input(
        &mut self,
        view: &dyn SnapView,
        text: &str,
        env: &mut PickEnv<'_>,
    ) -> Result<Vec3, InputError> {
        if self.state != PickState::Inputting {
            return Err(InputError::NotAccepting);
        }
        match self.parse_input(view, text) {
            Ok(point) => {
                let mut result = SnapResult::at(view.id(), point);
                result.ref_point = self.data.ref_point;
                self.snapped = Some(result);
                self.finish(env);
                Ok(point)
            }
            Err(error) => {
                info!("Rejected input {:?}: {}", text, error);
                env.bus.show_toast(&error.to_string());
                Err(error)
            }
        }
    }

    /// Close the entry box without submitting and go back to snapping.
    pub fn dismiss_input(&mut self, env: &mut PickEnv<'_>) {
        if self.state == PickState::Inputting {
            self.state = PickState::Snapping;
            env.bus.clear_input();
        }
    }

    /// Per-frame poll for time-based feedback and settings changes.
    pub fn update(&mut self, env: &mut PickEnv<'_>) {
        if self.state.is_terminal() {
            return;
        }
        self.sync_settings(env);
        for snap in &mut self.snaps {
            snap.update(env.now, env.visual);
        }
    }

    /// Returns false if the session had already ended.
    pub fn cancel(&mut self, env: &mut PickEnv<'_>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.snapped = None;
        self.state = PickState::Cancelled;
        self.outcome = Some(PickOutcome::Cancelled);
        self.cleanup(env);
        debug!("Pick session cancelled");
        self.controller.cancel()
    }

    /// Complete with the current snap (possibly none). Returns false if the
    /// session had already ended.
    pub fn finish(&mut self, env: &mut PickEnv<'_>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let point = self.snapped.as_ref().map(|s| s.point);
        self.state = PickState::Completed;
        self.outcome = Some(PickOutcome::Completed(point));
        self.cleanup(env);
        debug!("Pick session completed at {:?}", point);
        self.controller.success()
    }

    /// Release everything the session holds. Safe to call any number of times.
    fn cleanup(&mut self, env: &mut PickEnv<'_>) {
        env.bus.clear_float_tip();
        env.bus.clear_input();
        self.preview.release_all(env.visual);
        for snap in &mut self.snaps {
            snap.clear(env.visual);
        }
        if let Some(id) = self.subscription.take() {
            env.settings.unsubscribe(id);
        }
    }

    fn parse_input(&self, view: &dyn SnapView, text: &str) -> Result<Vec3, InputError> {
        if let Some(error) = self.input.input_error(text, self.snapped.as_ref()) {
            return Err(error);
        }
        let point = self.input.point_from_input(view, text, self.snapped.as_ref())?;
        if !self.data.accepts(point) {
            return Err(InputError::PointRejected);
        }
        Ok(point)
    }

    fn detect(&self, view: &dyn SnapView, mx: f32, my: f32) -> Vec<DetectedShape> {
        let filter = self.data.filter.as_ref();
        let mut shapes = view.detect_shapes(ShapeType::Vertex, mx, my, filter);
        shapes.extend(view.detect_shapes(ShapeType::Edge, mx, my, filter));
        shapes
    }

    fn feature_point(&self, view: &dyn SnapView, mx: f32, my: f32, config: &SnapConfig) -> Option<SnapResult> {
        self.data
            .feature_points
            .iter()
            .filter(|f| f.applies())
            .map(|f| (view.screen_distance(mx, my, f.point), f))
            .filter(|(distance, _)| *distance <= config.snap_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, f)| SnapResult::at(view.id(), f.point).with_info(f.prompt.clone()))
    }

    fn provider_snap(&mut self, ctx: &SnapContext<'_>, visual: &mut dyn VisualContext) -> Option<SnapResult> {
        for snap in &mut self.snaps {
            let Some(result) = snap.snap(ctx, visual) else {
                continue;
            };
            if self.data.accepts(result.point) {
                trace!("Snapped by {} at {:?}", snap.name(), result.point);
                return Some(result);
            }
            snap.remove_dynamic_object(visual);
        }
        None
    }

    fn show_prompt(&self, bus: &mut dyn NotificationBus) {
        let text = self.snapped.as_ref().and_then(|snapped| match &self.data.prompt {
            Some(prompt) => Some(prompt(snapped)),
            None => default_prompt(snapped),
        });
        match text {
            Some(text) => bus.show_float_tip(TipLevel::Info, &text),
            None => bus.clear_float_tip(),
        }
    }

    fn show_preview(&mut self, visual: &mut dyn VisualContext) {
        let point = self.snapped.as_ref().map(|s| s.point);
        if let Some(point) = point {
            let marker = MeshData::Point {
                position: point,
                style: PointStyle::Snap,
            };
            self.preview.display(self.view, visual, marker, None);
        }
        if let Some(preview) = &self.data.preview {
            for mesh in preview(point) {
                self.preview.display(self.view, visual, mesh, None);
            }
        }
    }

    fn sync_settings(&mut self, env: &mut PickEnv<'_>) {
        let Some(id) = self.subscription else {
            return;
        };
        let changes = env.settings.take_changes(id);
        if changes.iter().any(|key| key.invalidates_snap_cache()) {
            debug!("Snap settings changed ({:?}), clearing provider caches", changes);
            for snap in &mut self.snaps {
                snap.clear(env.visual);
            }
        }
    }
}
