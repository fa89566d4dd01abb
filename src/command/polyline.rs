//! Polyline drawing: a chain of point picks, each referencing the previous point.

use bevy::prelude::*;

use crate::pick::{FeaturePoint, PickEnv, PickOutcome, PointSnapData, SnapEventHandler};
use crate::visual::MeshData;

/// Points closer than this to the previous one are rejected
const MIN_SEGMENT_LENGTH: f32 = 1.0e-4;

#[derive(Resource, Debug, Default)]
pub struct PolylineCommand {
    session: Option<SnapEventHandler>,
    points: Vec<Vec3>,
}

impl PolylineCommand {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn session_mut(&mut self) -> Option<&mut SnapEventHandler> {
        self.session.as_mut()
    }

    pub fn begin(&mut self, env: &mut PickEnv<'_>) {
        if let Some(session) = &mut self.session {
            session.cancel(env);
        }
        self.points.clear();
        self.next_pick(env);
    }

    /// Act on a finished pick. Returns the points of the finished polyline
    /// once the command ends with at least one segment.
    pub fn advance(&mut self, env: &mut PickEnv<'_>) -> Option<Vec<Vec3>> {
        let outcome = self.session.as_ref()?.outcome()?;
        match outcome {
            PickOutcome::Completed(Some(point)) => {
                let closes = self.points.len() >= 3 && self.points[0].distance(point) < MIN_SEGMENT_LENGTH;
                self.points.push(point);
                if closes {
                    return self.finish();
                }
                self.next_pick(env);
                None
            }
            PickOutcome::Completed(None) | PickOutcome::Cancelled => self.finish(),
        }
    }

    fn finish(&mut self) -> Option<Vec<Vec3>> {
        self.session = None;
        let points = std::mem::take(&mut self.points);
        debug!("Polyline command ended with {} points", points.len());
        (points.len() >= 2).then_some(points)
    }

    fn next_pick(&mut self, env: &mut PickEnv<'_>) {
        self.session = Some(SnapEventHandler::for_point(self.snap_data(), env));
    }

    fn snap_data(&self) -> PointSnapData {
        let mut data = PointSnapData::default();
        let Some(&last) = self.points.last() else {
            return data;
        };

        data = data
            .with_ref_point(last)
            .with_validator(move |p| p.distance(last) > MIN_SEGMENT_LENGTH);

        let drawn = self.points.clone();
        data = data.with_preview(move |candidate| {
            let mut points = drawn.clone();
            points.extend(candidate);
            if points.len() < 2 {
                return Vec::new();
            }
            vec![MeshData::Polyline {
                points,
                highlight: false,
            }]
        });

        if self.points.len() >= 3 {
            data = data.with_feature_point(FeaturePoint::new(self.points[0], "Close"));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::SnapSettings;
    use crate::pick::{PickKey, PointerButton};
    use crate::testing::{TestBus, TestView, TestVisuals};

    #[derive(Default)]
    struct Harness {
        visual: TestVisuals,
        bus: TestBus,
        settings: SnapSettings,
    }

    impl Harness {
        fn env(&mut self) -> PickEnv<'_> {
            PickEnv {
                visual: &mut self.visual,
                bus: &mut self.bus,
                settings: &mut self.settings,
                now: Duration::ZERO,
            }
        }
    }

    fn click(
        command: &mut PolylineCommand,
        h: &mut Harness,
        view: &TestView,
        world: (f32, f32),
    ) -> Option<Vec<Vec3>> {
        let (mx, my) = view.screen(world.0, world.1);
        let mut env = h.env();
        let session = command.session_mut()?;
        session.pointer_move(view, mx, my, &mut env);
        session.pointer_up(view, mx, my, PointerButton::Primary, &mut env);
        command.advance(&mut env)
    }

    fn assert_near(actual: Vec3, expected: Vec3) {
        assert!(actual.distance(expected) < 1e-4, "expected {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn test_points_chain_and_track_from_previous() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());

        assert!(click(&mut command, &mut h, &view, (2.0, 3.0)).is_none());
        assert!(click(&mut command, &mut h, &view, (10.0, 3.4)).is_none());

        assert_eq!(command.points().len(), 2);
        assert_near(command.points()[0], Vec3::new(2.0, 3.0, 0.0));
        // Tracked along X from the first point
        assert_near(command.points()[1], Vec3::new(10.0, 3.0, 0.0));
        assert!(command.is_active());
    }

    #[test]
    fn test_enter_finishes_with_points() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());
        click(&mut command, &mut h, &view, (0.0, 0.0));
        click(&mut command, &mut h, &view, (5.0, 5.0));

        let finished = {
            let mut env = h.env();
            command.session_mut().unwrap().key_down(PickKey::Enter, &mut env);
            command.advance(&mut env)
        };

        assert_eq!(finished.map(|p| p.len()), Some(2));
        assert!(!command.is_active());
        assert_eq!(h.visual.live_count(), 0);
        assert_eq!(h.settings.subscriber_count(), 0);
    }

    #[test]
    fn test_escape_with_one_point_draws_nothing() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());
        click(&mut command, &mut h, &view, (0.0, 0.0));

        let finished = {
            let mut env = h.env();
            command.session_mut().unwrap().key_down(PickKey::Escape, &mut env);
            command.advance(&mut env)
        };

        assert!(finished.is_none());
        assert!(!command.is_active());
        assert!(command.points().is_empty());
    }

    #[test]
    fn test_clicking_first_point_closes() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());
        click(&mut command, &mut h, &view, (0.0, 0.0));
        click(&mut command, &mut h, &view, (8.0, 0.0));
        click(&mut command, &mut h, &view, (8.0, 6.0));

        let finished = click(&mut command, &mut h, &view, (0.2, 0.1)).unwrap();

        assert_eq!(finished.len(), 4);
        assert_eq!(finished[3], finished[0]);
        assert!(!command.is_active());
    }

    #[test]
    fn test_same_point_twice_is_rejected() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());
        click(&mut command, &mut h, &view, (4.0, 4.0));

        // The validator rejects every provider at the previous point
        click(&mut command, &mut h, &view, (4.0, 4.0));

        assert_eq!(command.points().len(), 1);
        assert!(command.is_active());
    }

    #[test]
    fn test_preview_follows_candidate() {
        let view = TestView::new();
        let mut h = Harness::default();
        let mut command = PolylineCommand::default();
        command.begin(&mut h.env());
        click(&mut command, &mut h, &view, (0.0, 0.0));

        let (mx, my) = view.screen(5.0, 5.0);
        let mut env = h.env();
        command.session_mut().unwrap().pointer_move(&view, mx, my, &mut env);

        let previews: Vec<_> = h
            .visual
            .meshes
            .values()
            .filter(|m| matches!(m, MeshData::Polyline { highlight: false, .. }))
            .collect();
        assert_eq!(previews.len(), 1);
    }
}
