// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel operations chained the way the topology passes chain them.

use approx::assert_relative_eq;
use plan_lite_geometry::{
    buffer_mitre, difference, largest_piece, make_valid, minimum_rotated_rectangle, overlap_area,
    pole_of_inaccessibility, simplify_polygon, total_area, Point2, Polygon2D, DEFAULT_MITRE_LIMIT,
};

/// 8x5 room with a notch cut out of the north-east corner
fn notched_room() -> Polygon2D {
    Polygon2D::from_coords(&[
        (0.0, 0.0),
        (8.0, 0.0),
        (8.0, 3.0),
        (6.0, 3.0),
        (6.0, 5.0),
        (0.0, 5.0),
    ])
}

#[test]
fn buffered_room_closes_gap_to_wall() {
    let room = notched_room();
    let wall_face = Polygon2D::rectangle(-0.22, 0.0, -0.02, 5.0);
    assert_eq!(overlap_area(&room, &wall_face), 0.0);

    let grown = largest_piece(buffer_mitre(&room, 0.05, DEFAULT_MITRE_LIMIT).unwrap()).unwrap();
    assert!(grown.is_valid());
    assert_relative_eq!(overlap_area(&grown, &wall_face), 0.03 * 5.0, epsilon = 1e-6);
    // Reflex corner of the notch stays a right angle
    assert!(grown.contains_point(&Point2::new(6.04, 3.04)));
    assert!(!grown.contains_point(&Point2::new(6.1, 3.1)));
}

#[test]
fn furniture_free_region_and_its_label_point() {
    let room = notched_room();
    let sofa = Polygon2D::rectangle(0.0, 0.0, 3.0, 1.0);
    let wardrobe = Polygon2D::rectangle(0.0, 4.4, 2.0, 5.0);

    let free = difference(&room, &[sofa.clone(), wardrobe.clone()]).unwrap();
    assert_relative_eq!(total_area(&free), room.area() - 3.0 - 1.2, epsilon = 1e-6);

    let region = simplify_polygon(&largest_piece(free).unwrap(), 0.01);
    assert!(region.is_valid());
    let anchor = pole_of_inaccessibility(&region, 0.01).unwrap();
    assert!(region.contains_point(&anchor));
    assert!(!sofa.contains_point(&anchor));
    assert!(!wardrobe.contains_point(&anchor));
}

#[test]
fn repaired_footprint_has_a_rectangle() {
    // Bow-tie door footprint drawn with crossed corners
    let crossed = Polygon2D::from_coords(&[(0.0, 0.0), (1.0, 0.2), (1.0, 0.0), (0.0, 0.2)]);
    assert!(!crossed.is_valid());

    let pieces = make_valid(&crossed).unwrap();
    assert_eq!(pieces.len(), 2);
    assert!(pieces.iter().all(|p| p.is_valid()));

    let rect = minimum_rotated_rectangle(&crossed).unwrap();
    assert_relative_eq!(rect.length, 1.0, epsilon = 1e-9);
    assert_relative_eq!(rect.width, 0.2, epsilon = 1e-9);
}
