//! Behaviour-level tests across fragments

mod fan_out;

use crate::object::{Capabilities, Composer, GameObject, ObjectProps};

/// Object with every fragment installed
fn full(props: ObjectProps) -> GameObject {
    Composer::new(Capabilities::all()).build(props)
}
