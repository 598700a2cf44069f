//! Shared tree fixtures covering every element kind and buffer layout.

use strata_core::InputFlag;
use strata_store::Group;

/// Build the fixture topology: groups and fields only, default contents.
///
/// ```text
/// problem/
///   time (f64 scalar)
///   cycle (i64 scalar)
///   regionA/
///     pressure (f64, per-entity)
///     velocity (f32, per-entity x 3)
///     material1/
///       components (f64, fixed extent 3)
///   regionB/
///     cellType (i32, per-entity)
/// ```
pub fn sample_tree_topology() -> Group {
    let mut root = Group::new("problem");
    root.register_field::<f64>("time")
        .expect("fresh group")
        .set_description("Simulation time [s]");
    root.register_field::<i64>("cycle").expect("fresh group");

    let region_a = root.register_group::<Group>("regionA").expect("fresh group");
    region_a
        .register_field::<f64>("pressure")
        .expect("fresh group")
        .set_per_entity();
    region_a
        .register_field::<f32>("velocity")
        .expect("fresh group")
        .set_components(3);
    let material = region_a
        .register_group::<Group>("material1")
        .expect("fresh group");
    material
        .register_field::<f64>("components")
        .expect("fresh group")
        .set_extent(3)
        .set_input_flag(InputFlag::Required);

    let region_b = root.register_group::<Group>("regionB").expect("fresh group");
    region_b
        .register_field::<i32>("cellType")
        .expect("fresh group")
        .set_per_entity();

    root
}

/// Build the fixture tree with distinctive, non-default contents in every
/// buffer (shapes included), for round-trip comparisons.
pub fn sample_tree() -> Group {
    let mut root = sample_tree_topology();
    root.get_array_mut::<f64>("time")
        .expect("fixture field")
        .set_value(0.75);
    root.get_array_mut::<i64>("cycle")
        .expect("fixture field")
        .set_value(42);

    let region_a = root
        .get_group_mut::<Group>("regionA")
        .expect("fixture group");
    region_a.resize(4);
    for (i, v) in region_a
        .get_array_mut::<f64>("pressure")
        .expect("fixture field")
        .values_mut()
        .iter_mut()
        .enumerate()
    {
        *v = 1.5 * (i + 1) as f64;
    }
    for (i, v) in region_a
        .get_array_mut::<f32>("velocity")
        .expect("fixture field")
        .values_mut()
        .iter_mut()
        .enumerate()
    {
        *v = -(i as f32) * 0.25;
    }
    let material = region_a
        .get_group_mut::<Group>("material1")
        .expect("fixture group");
    material
        .register_field::<f64>("components")
        .expect("fixture field")
        .assign_slice(&[1e-15, 2e-15, 3e-15]);

    let region_b = root
        .get_group_mut::<Group>("regionB")
        .expect("fixture group");
    region_b.resize(2);
    region_b
        .get_array_mut::<i32>("cellType")
        .expect("fixture field")
        .values_mut()
        .copy_from_slice(&[7, -3]);

    root
}
