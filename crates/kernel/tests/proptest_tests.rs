//! Property-based tests for mount kernel invariants using the `proptest` crate.

use proptest::prelude::*;

use mount_kernel::catalog::{Catalog, PatternSpec, RingSpec};
use mount_kernel::config::{BuildConfig, MeshConfig};
use mount_kernel::mesh::{FairingLayout, FairingOptions, PlateLayout, build_fairing_mesh_with, build_plate_mesh, levels_for_height};
use mount_kernel::nodes::{NodeLayout, place_nodes};
use mount_kernel::profile::{ProfileSample, compute_base_shape, extended_radius};
use mount_kernel::build_all;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary ring, including empty rings and rings on the axis.
fn arb_ring() -> impl Strategy<Value = RingSpec> {
    (0u32..8, 0.0f64..3.0, -180.0f64..180.0, 0.01f64..2.0, 0u32..4)
        .prop_map(|(count, radius, offset, node_radius, size)| RingSpec::new(count, radius, offset, node_radius, size))
}

fn arb_pattern() -> impl Strategy<Value = PatternSpec> {
    prop::collection::vec(arb_ring(), 0..3).prop_map(|rings| {
        rings
            .into_iter()
            .fold(PatternSpec::new("arb"), PatternSpec::with_ring)
    })
}

fn arb_sides() -> impl Strategy<Value = usize> {
    3usize..72
}

/// A profile that never dips below `top`.
fn arb_profile(top: f64) -> impl Strategy<Value = ProfileSample> {
    (arb_pattern(), arb_sides()).prop_map(move |(pattern, sides)| {
        compute_base_shape(top, &pattern, sides).expect("valid inputs")
    })
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. Base shape never dips below the deck radius
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn base_shape_bounded_below_by_top_radius(
        top in 0.0f64..3.0,
        pattern in arb_pattern(),
        sides in arb_sides(),
    ) {
        let shape = compute_base_shape(top, &pattern, sides).unwrap();
        prop_assert_eq!(shape.sides(), sides);
        for &r in shape.radii() {
            prop_assert!(r >= top, "radius {} below top radius {}", r, top);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. A contribution, when present, is never negative
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn extended_radius_is_non_negative(
        ring in arb_ring(),
        theta in -std::f64::consts::PI..std::f64::consts::PI,
    ) {
        for p in 0..ring.count {
            if let Some(r) = extended_radius(theta, &ring, p) {
                prop_assert!(r >= 0.0, "negative contribution {}", r);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Plate indices stay in range and counts follow the layout formulas
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plate_layout_matches_formula(
        shape in arb_profile(0.625),
        side_height in prop_oneof![Just(0.0), 0.05f64..2.0],
        flange_height in 0.0f64..0.5,
    ) {
        let mesh = build_plate_mesh(0.625, &shape, side_height, flange_height).unwrap();
        let layout = PlateLayout::new(shape.sides(), levels_for_height(side_height));
        prop_assert_eq!(mesh.vertex_count(), layout.vertex_count());
        prop_assert_eq!(mesh.triangle_count(), layout.triangle_count());
        prop_assert!(mesh.validate().is_ok());
        prop_assert_eq!(mesh.normals.len(), mesh.vertex_count());
        prop_assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        prop_assert_eq!(mesh.tangents.len(), mesh.vertex_count());
    }
}

// ---------------------------------------------------------------------------
// 4. Seam duplicates share one normal
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plate_seam_normals_match(
        shape in arb_profile(0.625),
        side_height in 0.05f64..2.0,
    ) {
        let mesh = build_plate_mesh(0.625, &shape, side_height, 0.1).unwrap();
        let layout = PlateLayout::new(shape.sides(), levels_for_height(side_height));
        for k in 0..layout.levels {
            let start = layout.level(k) as usize;
            let end = start + shape.sides();
            prop_assert!((mesh.normals[start] - mesh.normals[end]).norm() < TOL);
        }
    }
}

// ---------------------------------------------------------------------------
// 5. Fairing triangle counts for open and closed shells
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fairing_layout_matches_formula(
        shape in arb_profile(0.625),
        height in 0.0f64..3.0,
        close_shell in any::<bool>(),
    ) {
        let options = FairingOptions { close_shell, ..FairingOptions::default() };
        let mesh = build_fairing_mesh_with(&shape, 0.6, -0.2, -0.2 - height, &options).unwrap();
        let layout = FairingLayout::new(shape.sides(), levels_for_height(height));
        prop_assert_eq!(mesh.vertex_count(), layout.vertex_count());
        prop_assert_eq!(mesh.triangle_count(), layout.triangle_count(close_shell));
        prop_assert!(mesh.validate().is_ok());
    }
}

// ---------------------------------------------------------------------------
// 6. Node placement is idempotent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn place_nodes_idempotent(
        pattern in arb_pattern(),
        plate_depth in 0.0f64..5.0,
        extra in 0.0f64..5.0,
        scale in 0.1f64..4.0,
    ) {
        let layout = NodeLayout {
            plate_depth,
            bottom_depth: plate_depth + extra,
            top_size: 1,
            bottom_size: 1,
            scale,
        };
        let first = place_nodes(Some(&pattern), &layout);
        let second = place_nodes(Some(&pattern), &layout);
        prop_assert_eq!(first.len(), 2 + pattern.point_count());
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// 7. Selecting k, k+1, then k again restores the build
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn pattern_round_trip_restores_build(
        k in 0usize..8,
        top_size in 0usize..4,
        bottom_size in 0usize..4,
    ) {
        let catalog = Catalog::standard();
        let mesh = MeshConfig::coarse();
        let config = BuildConfig { top_size, bottom_size, ..BuildConfig::default() }.with_pattern(Some(k));

        let first = build_all(&catalog, &mesh, &config).unwrap();
        let next = build_all(&catalog, &mesh, &config.next_pattern(catalog.pattern_count())).unwrap();
        let back = build_all(&catalog, &mesh, &next.config.with_pattern(Some(k))).unwrap();

        prop_assert_eq!(&back.base_shape, &first.base_shape);
        prop_assert_eq!(&back.nodes, &first.nodes);
        prop_assert_eq!(&back.fairing, &first.fairing);
    }
}

// ---------------------------------------------------------------------------
// 8. Persisted config keeps the pattern selection, sentinel included
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn persisted_pattern_survives(pattern in prop::option::of(0usize..1000)) {
        let config = BuildConfig::default().with_pattern(pattern);
        let json = config.to_json().unwrap();
        prop_assert_eq!(BuildConfig::from_json(&json).unwrap().pattern, pattern);
    }
}
