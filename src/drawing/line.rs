//! Built-in straight line shape.

use std::any::Any;

use crate::constants::HIT_TOLERANCE_PIXELS;
use crate::document::DrawingLayer;
use crate::geometry::{Color, UnitPoint, UnitRect};
use crate::persistence::property::{
    parse_color_property, parse_float_property, parse_point_property,
};
use crate::persistence::{Properties, PropertyError, PropertyValue};

use super::{Canvas, DrawObject, NodePoint, ObjectId, SnapKind, SnapPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    id: ObjectId,
    pub p1: UnitPoint,
    pub p2: UnitPoint,
    pub width: f64,
    pub color: Color,
    selected: bool,
}

impl Line {
    pub const OBJECT_TYPE: &'static str = "line";

    pub fn new(p1: UnitPoint, p2: UnitPoint) -> Self {
        Self {
            p1,
            p2,
            ..Default::default()
        }
    }

    pub fn endpoint(&self, end: LineEnd) -> UnitPoint {
        match end {
            LineEnd::Start => self.p1,
            LineEnd::End => self.p2,
        }
    }

    pub fn set_endpoint(&mut self, end: LineEnd, point: UnitPoint) {
        match end {
            LineEnd::Start => self.p1 = point,
            LineEnd::End => self.p2 = point,
        }
    }

    fn bounds(&self) -> UnitRect {
        UnitRect::from_corners(self.p1, self.p2)
    }

    /// Closest point on the segment to `point`
    fn nearest_point(&self, point: UnitPoint) -> UnitPoint {
        let d = self.p2 - self.p1;
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq == 0.0 {
            return self.p1;
        }
        let t = (((point.x - self.p1.x) * d.x + (point.y - self.p1.y) * d.y) / len_sq).clamp(0.0, 1.0);
        UnitPoint::new(self.p1.x + t * d.x, self.p1.y + t * d.y)
    }

    fn crosses_rect_edge(&self, rect: &UnitRect) -> bool {
        let corners = [
            rect.min,
            UnitPoint::new(rect.max.x, rect.min.y),
            rect.max,
            UnitPoint::new(rect.min.x, rect.max.y),
        ];
        (0..4).any(|i| segments_intersect(self.p1, self.p2, corners[i], corners[(i + 1) % 4]))
    }
}

impl Default for Line {
    fn default() -> Self {
        Self {
            id: ObjectId::new(),
            p1: UnitPoint::ZERO,
            p2: UnitPoint::ZERO,
            width: 0.0,
            color: Color::WHITE,
            selected: false,
        }
    }
}

fn cross(o: UnitPoint, a: UnitPoint, b: UnitPoint) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn segments_intersect(a1: UnitPoint, a2: UnitPoint, b1: UnitPoint, b2: UnitPoint) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    let on_segment = |p: UnitPoint, q: UnitPoint, r: UnitPoint| {
        UnitRect::from_corners(p, q).contains(r)
    };
    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

impl Properties for Line {
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("P1", self.p1.into()),
            ("P2", self.p2.into()),
            ("Width", self.width.into()),
            ("Color", self.color.into()),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "P1" => self.p1 = parse_point_property(name, value)?,
            "P2" => self.p2 = parse_point_property(name, value)?,
            "Width" => self.width = parse_float_property(name, value)?,
            "Color" => self.color = parse_color_property(name, value)?,
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

impl DrawObject for Line {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn object_type(&self) -> &'static str {
        Self::OBJECT_TYPE
    }

    fn clone_object(&self) -> Box<dyn DrawObject> {
        Box::new(Line {
            id: ObjectId::new(),
            selected: false,
            ..self.clone()
        })
    }

    fn move_by(&mut self, offset: UnitPoint) {
        self.p1 = self.p1 + offset;
        self.p2 = self.p2 + offset;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn object_in_rectangle(&self, _canvas: &dyn Canvas, rect: &UnitRect, any_point: bool) -> bool {
        if !any_point {
            return rect.contains_rect(&self.bounds());
        }
        rect.contains(self.p1) || rect.contains(self.p2) || self.crosses_rect_edge(rect)
    }

    fn point_in_object(&self, canvas: &dyn Canvas, point: UnitPoint) -> bool {
        let tolerance = canvas.to_unit(HIT_TOLERANCE_PIXELS) + self.width / 2.0;
        self.nearest_point(point).distance(point) <= tolerance
    }

    fn snap_point(
        &self,
        canvas: &dyn Canvas,
        point: UnitPoint,
        _candidates: &[&dyn DrawObject],
        running: &[SnapKind],
        user: Option<SnapKind>,
    ) -> Option<SnapPoint> {
        let tolerance = canvas.to_unit(HIT_TOLERANCE_PIXELS);
        let kinds: &[SnapKind] = match &user {
            Some(kind) => std::slice::from_ref(kind),
            None => running,
        };
        kinds.iter().find_map(|&kind| {
            let candidate = match kind {
                SnapKind::Endpoint => [self.p1, self.p2]
                    .into_iter()
                    .filter(|p| p.distance(point) <= tolerance)
                    .min_by(|a, b| a.distance(point).total_cmp(&b.distance(point))),
                SnapKind::Midpoint => {
                    let mid = self.p1.midpoint(self.p2);
                    (mid.distance(point) <= tolerance).then_some(mid)
                }
                SnapKind::Nearest => Some(self.nearest_point(point)),
                SnapKind::Center | SnapKind::Quadrant => None,
            };
            candidate.map(|p| SnapPoint {
                kind,
                point: p,
                owner: self.id,
            })
        })
    }

    fn initialize_from_model(&mut self, point: UnitPoint, layer: &DrawingLayer, snap: Option<&SnapPoint>) {
        let start = snap.map(|s| s.point).unwrap_or(point);
        self.p1 = start;
        self.p2 = start;
        self.width = layer.width;
        self.color = layer.color;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Which end of a [`Line`] a node handle drags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

/// Endpoint handle for a [`Line`]
#[derive(Debug, Clone)]
pub struct LineNode {
    owner: ObjectId,
    end: LineEnd,
    original: Option<UnitPoint>,
    finished: Option<UnitPoint>,
}

impl LineNode {
    pub fn new(owner: ObjectId, end: LineEnd) -> Self {
        Self {
            owner,
            end,
            original: None,
            finished: None,
        }
    }

    fn line_mut(target: &mut dyn DrawObject) -> Option<&mut Line> {
        target.as_any_mut().downcast_mut::<Line>()
    }
}

impl NodePoint for LineNode {
    fn owner(&self) -> ObjectId {
        self.owner
    }

    fn set_position(&mut self, target: &mut dyn DrawObject, position: UnitPoint) {
        let end = self.end;
        if let Some(line) = Self::line_mut(target) {
            self.original.get_or_insert(line.endpoint(end));
            line.set_endpoint(end, position);
        }
    }

    fn finish(&mut self, target: &mut dyn DrawObject) {
        let end = self.end;
        if let Some(line) = Self::line_mut(target) {
            self.finished = Some(line.endpoint(end));
        }
    }

    fn undo(&mut self, target: &mut dyn DrawObject) {
        let (end, original) = (self.end, self.original);
        if let (Some(line), Some(point)) = (Self::line_mut(target), original) {
            line.set_endpoint(end, point);
        }
    }

    fn redo(&mut self, target: &mut dyn DrawObject) {
        let (end, finished) = (self.end, self.finished);
        if let (Some(line), Some(point)) = (Self::line_mut(target), finished) {
            line.set_endpoint(end, point);
        }
    }
}
