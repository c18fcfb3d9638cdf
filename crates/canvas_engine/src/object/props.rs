//! Construction properties and the dynamic property bag
//!
//! [`ObjectProps`] carries the initial values handed to a
//! [`Composer`](super::Composer). Recognized keys have typed fields; any other
//! key lands in `extra` and is copied verbatim onto the object as a user
//! property.
//!
//! [`GameObject::get`] and [`GameObject::set`] give a uniform by-name view of
//! an object, routing known names to the typed accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::game_object::DrawFn;
use super::{Capabilities, ChildOptions, GameObject};
use crate::foundation::math::Point;
use crate::render::{Context, SharedContext};

/// Names derived from other state; writes to them are ignored
const READ_ONLY: [&str; 5] = ["viewX", "viewY", "scaledWidth", "scaledHeight", "finalOpacity"];

/// Value stored in the property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Boolean flag
    Bool(bool),
    /// Number
    Number(f32),
    /// Text, e.g. a type tag or color
    Text(String),
    /// x/y pair
    Point(Point),
}

impl PropValue {
    /// Numeric value, if this is a number
    pub const fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Boolean value, if this is a flag
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Point> for PropValue {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

/// Initial properties for a new object
///
/// `children`, `render` and `scale` are not plain assignments: children are
/// attached through `add_child`, `scale` goes through `set_scale`, and
/// `render` replaces the draw function.
///
/// Serialized as a flat key/value map. Keys without a typed field land in
/// `extra`, so a RON struct such as `(x: 10.0, type: "enemy")` or a TOML
/// table loads directly.
#[derive(Default)]
pub struct ObjectProps {
    /// X position
    pub x: Option<f32>,
    /// Y position
    pub y: Option<f32>,
    /// Width
    pub width: Option<f32>,
    /// Height
    pub height: Option<f32>,
    /// Horizontal velocity
    pub dx: Option<f32>,
    /// Vertical velocity
    pub dy: Option<f32>,
    /// Horizontal acceleration
    pub ddx: Option<f32>,
    /// Vertical acceleration
    pub ddy: Option<f32>,
    /// Rotation in radians
    pub rotation: Option<f32>,
    /// Anchor
    pub anchor: Option<Point>,
    /// Scale
    pub scale: Option<Point>,
    /// Opacity
    pub opacity: Option<f32>,
    /// Horizontal camera offset
    pub sx: Option<f32>,
    /// Vertical camera offset
    pub sy: Option<f32>,
    /// Time-to-live
    pub ttl: Option<f32>,
    /// Drawing backend, overriding the composer's (not serialized)
    pub context: Option<SharedContext>,
    /// Children to attach (not serialized)
    pub children: Vec<GameObject>,
    /// Draw override (not serialized)
    pub render: Option<DrawFn>,
    /// Any other key, copied verbatim
    pub extra: BTreeMap<String, PropValue>,
}

impl fmt::Debug for ObjectProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectProps")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("children", &self.children.len())
            .field("render", &self.render.is_some())
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

impl ObjectProps {
    /// Empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Builder pattern: Set size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder pattern: Set velocity
    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.dx = Some(dx);
        self.dy = Some(dy);
        self
    }

    /// Builder pattern: Set acceleration
    pub fn with_acceleration(mut self, ddx: f32, ddy: f32) -> Self {
        self.ddx = Some(ddx);
        self.ddy = Some(ddy);
        self
    }

    /// Builder pattern: Set rotation (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Builder pattern: Set anchor
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = Some(Point::new(x, y));
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.scale = Some(Point::new(x, y));
        self
    }

    /// Builder pattern: Set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Builder pattern: Set camera offset
    pub fn with_camera(mut self, sx: f32, sy: f32) -> Self {
        self.sx = Some(sx);
        self.sy = Some(sy);
        self
    }

    /// Builder pattern: Set time-to-live
    pub fn with_ttl(mut self, ttl: f32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Builder pattern: Set drawing backend
    pub fn with_context(mut self, context: SharedContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Builder pattern: Add a child
    pub fn with_child(mut self, child: GameObject) -> Self {
        self.children.push(child);
        self
    }

    /// Builder pattern: Replace the draw function
    pub fn with_render(mut self, render: impl Fn(&GameObject, &mut dyn Context) + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    /// Builder pattern: Add an arbitrary user property
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Plain numeric properties, in assignment order
    fn scalars(&self) -> [(&'static str, Option<f32>); 13] {
        [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("dx", self.dx),
            ("dy", self.dy),
            ("ddx", self.ddx),
            ("ddy", self.ddy),
            ("rotation", self.rotation),
            ("opacity", self.opacity),
            ("sx", self.sx),
            ("sy", self.sy),
            ("ttl", self.ttl),
        ]
    }

    fn scalar_mut(&mut self, name: &str) -> Option<&mut Option<f32>> {
        let slot = match name {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "width" => &mut self.width,
            "height" => &mut self.height,
            "dx" => &mut self.dx,
            "dy" => &mut self.dy,
            "ddx" => &mut self.ddx,
            "ddy" => &mut self.ddy,
            "rotation" => &mut self.rotation,
            "opacity" => &mut self.opacity,
            "sx" => &mut self.sx,
            "sy" => &mut self.sy,
            "ttl" => &mut self.ttl,
            _ => return None,
        };
        Some(slot)
    }
}

impl Serialize for ObjectProps {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.scalars() {
            if let Some(value) = value {
                map.serialize_entry(name, &value)?;
            }
        }
        if let Some(anchor) = &self.anchor {
            map.serialize_entry("anchor", anchor)?;
        }
        if let Some(scale) = &self.scale {
            map.serialize_entry("scale", scale)?;
        }
        for (name, value) in &self.extra {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectProps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ObjectPropsVisitor)
    }
}

/// Property name; read through `deserialize_str` so RON struct fields
/// (identifiers) and map keys (strings) both work
struct PropName(String);

impl<'de> Deserialize<'de> for PropName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(PropNameVisitor)
    }
}

struct PropNameVisitor;

impl Visitor<'_> for PropNameVisitor {
    type Value = PropName;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a property name")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PropName(value.to_owned()))
    }
}

struct ObjectPropsVisitor;

impl<'de> Visitor<'de> for ObjectPropsVisitor {
    type Value = ObjectProps;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a struct or map of object properties")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut props = ObjectProps::default();
        while let Some(PropName(name)) = map.next_key()? {
            match name.as_str() {
                "anchor" => props.anchor = Some(map.next_value()?),
                "scale" => props.scale = Some(map.next_value()?),
                other => match props.scalar_mut(other) {
                    Some(slot) => *slot = Some(map.next_value()?),
                    None => {
                        let value = map.next_value()?;
                        props.extra.insert(other.to_owned(), value);
                    }
                },
            }
        }
        Ok(props)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(ObjectProps::default())
    }
}

impl GameObject {
    /// Assign construction properties.
    ///
    /// Scalars are assigned first through [`set`](Self::set), so accessor
    /// side effects run and properties of absent fragments become user
    /// properties. Then anchor, scale via `set_scale`, the context and draw
    /// override, extra keys, and finally children via `add_child`, so they
    /// are reparented against the final position and scale.
    pub(crate) fn apply_props(&mut self, props: ObjectProps) {
        for (name, value) in props.scalars() {
            if let Some(value) = value {
                self.set(name, value);
            }
        }

        let ObjectProps {
            anchor,
            scale,
            context,
            children,
            render,
            extra,
            ..
        } = props;

        if let Some(anchor) = anchor {
            self.set("anchor", anchor);
        }
        if let Some(scale) = scale {
            self.set("scale", scale);
        }

        if let Some(context) = context {
            self.context = Some(context);
        }
        if let Some(render) = render {
            self.draw_fn = Some(render);
        }

        for (name, value) in extra {
            self.set(&name, value);
        }

        if !children.is_empty() && !self.has(Capabilities::GROUP) {
            log::warn!(
                "{} was given {} children but has no group capability; dropping them",
                self.id,
                children.len()
            );
            return;
        }
        for child in children {
            self.attach(child, ChildOptions::default());
        }
    }

    /// User property stored verbatim on the object
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    /// Read any property by name.
    ///
    /// Properties of absent fragments read as `None` unless a user property
    /// of the same name was stored.
    pub fn get(&self, name: &str) -> Option<PropValue> {
        let typed = match name {
            "x" => Some(self.x()),
            "y" => Some(self.y()),
            "width" => Some(self.width),
            "height" => Some(self.height),
            "dx" => self.dx(),
            "dy" => self.dy(),
            "ddx" => self.ddx(),
            "ddy" => self.ddy(),
            "rotation" => self.rotation,
            "opacity" => self.opacity(),
            "finalOpacity" => self.final_opacity(),
            "sx" => self.sx(),
            "sy" => self.sy(),
            "viewX" => self.view_x(),
            "viewY" => self.view_y(),
            "scaledWidth" => self.scaled_width(),
            "scaledHeight" => self.scaled_height(),
            "ttl" => self.ttl,
            _ => None,
        };
        let typed = typed.map(PropValue::Number).or_else(|| match name {
            "anchor" => self.anchor.map(PropValue::Point),
            "scale" => self.scale.map(PropValue::Point),
            _ => None,
        });

        typed.or_else(|| self.props.get(name).cloned())
    }

    /// Write any property by name.
    ///
    /// Known names go through their typed setter, so fan-out and other side
    /// effects happen. Read-only derived names ignore the write. Names of
    /// absent fragments, and unknown names, are stored as user properties.
    pub fn set(&mut self, name: &str, value: impl Into<PropValue>) {
        let value = value.into();
        if READ_ONLY.contains(&name) {
            log::trace!("Ignoring write to read-only '{}' on {}", name, self.id);
            return;
        }

        let handled = match (name, &value) {
            ("x", PropValue::Number(v)) => {
                self.set_x(*v);
                true
            }
            ("y", PropValue::Number(v)) => {
                self.set_y(*v);
                true
            }
            ("width", PropValue::Number(v)) => {
                self.set_width(*v);
                true
            }
            ("height", PropValue::Number(v)) => {
                self.set_height(*v);
                true
            }
            ("dx", PropValue::Number(v)) if self.velocity.is_some() => {
                self.set_dx(*v);
                true
            }
            ("dy", PropValue::Number(v)) if self.velocity.is_some() => {
                self.set_dy(*v);
                true
            }
            ("ddx", PropValue::Number(v)) if self.acceleration.is_some() => {
                self.set_ddx(*v);
                true
            }
            ("ddy", PropValue::Number(v)) if self.acceleration.is_some() => {
                self.set_ddy(*v);
                true
            }
            ("rotation", PropValue::Number(v)) if self.rotation.is_some() => {
                self.set_rotation(*v);
                true
            }
            ("opacity", PropValue::Number(v)) if self.opacity.is_some() => {
                self.set_opacity(*v);
                true
            }
            ("sx", PropValue::Number(v)) if self.camera.is_some() => {
                self.set_sx(*v);
                true
            }
            ("sy", PropValue::Number(v)) if self.camera.is_some() => {
                self.set_sy(*v);
                true
            }
            ("ttl", PropValue::Number(v)) if self.ttl.is_some() => {
                self.set_ttl(*v);
                true
            }
            ("anchor", PropValue::Point(p)) if self.anchor.is_some() => {
                self.set_anchor(*p);
                true
            }
            ("scale", PropValue::Point(p)) => self.set_scale(p.x, p.y).is_ok(),
            _ => false,
        };

        if !handled {
            self.props.insert(name.to_owned(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Composer;

    #[test]
    fn test_unknown_keys_are_copied_verbatim() {
        let object = Composer::new(Capabilities::all())
            .build(ObjectProps::new().with_prop("type", "asteroid").with_prop("points", 50.0));

        assert_eq!(object.get("type"), Some(PropValue::Text("asteroid".to_owned())));
        assert_eq!(object.prop("points").and_then(PropValue::as_number), Some(50.0));
    }

    #[test]
    fn test_read_only_names_ignore_writes() {
        let mut object = Composer::new(Capabilities::all())
            .build(ObjectProps::new().with_position(10.0, 20.0).with_size(4.0, 4.0));

        object.set("viewX", 99.0);
        object.set("scaledWidth", 99.0);
        object.set("finalOpacity", 0.1);

        assert_eq!(object.get("viewX"), Some(PropValue::Number(10.0)));
        assert_eq!(object.get("scaledWidth"), Some(PropValue::Number(4.0)));
        assert_eq!(object.get("finalOpacity"), Some(PropValue::Number(1.0)));
        assert_eq!(object.prop("viewX"), None);
    }

    #[test]
    fn test_absent_fragment_property_becomes_user_property() {
        let mut object = Composer::new(Capabilities::RECT).build(ObjectProps::new().with_rotation(1.0));

        assert_eq!(object.rotation(), None);
        assert_eq!(object.get("rotation"), Some(PropValue::Number(1.0)));

        object.set("opacity", 0.5);
        assert_eq!(object.opacity(), None);
        assert_eq!(object.get("opacity"), Some(PropValue::Number(0.5)));
    }

    #[test]
    fn test_set_by_name_routes_through_setters() {
        let mut object = Composer::new(Capabilities::all()).build(ObjectProps::default());

        object.set("x", 3.0);
        object.set("scale", Point::new(2.0, 3.0));
        object.set("anchor", Point::new(0.5, 0.5));

        assert_eq!(object.x(), 3.0);
        assert_eq!(object.scale(), Some(Point::new(2.0, 3.0)));
        assert_eq!(object.get("anchor"), Some(PropValue::Point(Point::new(0.5, 0.5))));
        assert!(object.prop("scale").is_none());
    }

    #[test]
    fn test_children_without_group_are_dropped() {
        let child = Composer::new(Capabilities::RECT).build(ObjectProps::default());
        let object = Composer::new(Capabilities::RECT).build(ObjectProps::new().with_child(child));

        assert!(object.children().is_empty());
    }

    #[test]
    fn test_props_deserialize_from_toml() {
        let props: ObjectProps = toml::from_str(
            r#"
            x = 10.0
            y = 20.0
            ttl = 30.0
            scale = { x = 2.0, y = 2.0 }
            type = "enemy"
            boss = true
            "#,
        )
        .unwrap();

        assert_eq!(props.x, Some(10.0));
        assert_eq!(props.y, Some(20.0));
        assert_eq!(props.scale, Some(Point::splat(2.0)));
        assert_eq!(props.extra.get("type"), Some(&PropValue::Text("enemy".to_owned())));
        assert_eq!(props.extra.get("boss").and_then(PropValue::as_bool), Some(true));

        let object = Composer::new(Capabilities::all()).build(props);
        assert_eq!(object.ttl(), Some(30.0));
        assert_eq!(object.scaled_width(), Some(0.0));
        assert_eq!(object.get("type"), Some(PropValue::Text("enemy".to_owned())));
    }

    #[test]
    fn test_props_deserialize_from_ron_struct() {
        let props: ObjectProps =
            ron::from_str(r#"(x: 10.0, y: 20.0, scale: (x: 2.0, y: 3.0), type: "enemy", boss: true)"#).unwrap();

        assert_eq!(props.x, Some(10.0));
        assert_eq!(props.y, Some(20.0));
        assert_eq!(props.scale, Some(Point::new(2.0, 3.0)));
        assert_eq!(props.extra.get("type").and_then(PropValue::as_text), Some("enemy"));
        assert_eq!(props.extra.get("boss").and_then(PropValue::as_bool), Some(true));
        assert_eq!(props.width, None);
    }

    #[test]
    fn test_props_ron_round_trip() {
        let props = ObjectProps::new()
            .with_position(1.5, -2.0)
            .with_ttl(30.0)
            .with_anchor(0.5, 0.5)
            .with_prop("type", "comet")
            .with_prop("points", 25.0);

        let text = ron::to_string(&props).unwrap();
        let loaded: ObjectProps = ron::from_str(&text).unwrap();

        assert_eq!(loaded.x, Some(1.5));
        assert_eq!(loaded.y, Some(-2.0));
        assert_eq!(loaded.ttl, Some(30.0));
        assert_eq!(loaded.anchor, Some(Point::splat(0.5)));
        assert_eq!(loaded.scale, None);
        assert_eq!(loaded.extra, props.extra);
    }
}
