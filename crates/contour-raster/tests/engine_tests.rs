//! Integration tests for nearest-contour search and rasterization.

use contour_raster::{
    CellMask, ElevationRange, Extent, GridAlignment, LineStrip, Point, RasterArea, RasterConfig,
    RasterError, Rasterizer, SpatialIndex, NO_DATA,
};
use test_utils::{
    assert_approx_eq, bbox, create_horizontal_contours, diagonal_strip, parallel_pair,
    split_middle_level, to_bbox, unit_extent,
};

fn grid4() -> RasterConfig {
    RasterConfig::default().with_grid_size(4)
}

fn unit_area(width: usize, height: usize) -> RasterArea {
    RasterArea::new(to_bbox(bbox::UNIT), width, height).unwrap()
}

/// Horizontal line with a vertex every 1/8 along x.
fn dense_line(id: i32, elevation: f64, y: f64) -> LineStrip {
    LineStrip::new(
        id,
        elevation,
        (0..=8).map(|k| Point::new(k as f64 / 8.0, y)).collect(),
    )
    .unwrap()
}

// ============================================================================
// Point queries
// ============================================================================

#[test]
fn test_diagonal_scenario() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    // On the segment: exact hit found one ring out in cell (3, 3)
    assert_eq!(raster.find_elevation(&Point::new(0.5, 0.5)), 100.0);
    // Off the segment, only one level anywhere
    assert_eq!(raster.find_elevation(&Point::new(0.1, 0.9)), 100.0);
}

#[test]
fn test_exact_hit_at_vertex() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    assert_eq!(raster.find_elevation(&Point::new(0.5, 0.75)), 100.0);
    assert_eq!(raster.find_elevation(&Point::new(0.25, 0.25)), 0.0);
    assert_eq!(raster.find_elevation(&Point::new(1.0, 0.25)), 0.0);
}

#[test]
fn test_equidistant_contours_average() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    for x in [0.3, 0.5, 0.6, 0.9] {
        assert_eq!(raster.find_elevation(&Point::new(x, 0.5)), 50.0, "x = {}", x);
    }
}

#[test]
fn test_interpolation_is_monotone_between_levels() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    let low = raster.find_elevation(&Point::new(0.5, 0.4));
    let mid = raster.find_elevation(&Point::new(0.5, 0.5));
    let high = raster.find_elevation(&Point::new(0.5, 0.6));
    assert!(0.0 < low && low < mid && mid < high && high < 100.0);
}

#[test]
fn test_heights_climb_through_stacked_levels() {
    // Lines at y = 0.2, 0.4, 0.6, 0.8 with elevations 0, 10, 20, 30
    let strips = create_horizontal_contours(4, 1.0, 1.0, 10.0, 9);
    let index = SpatialIndex::build(&strips, unit_extent(), 8, Default::default());
    let raster = Rasterizer::unmasked(&index, RasterConfig::default().with_grid_size(8)).unwrap();

    for pair in strips.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let (a, b) = (lower.points[4], upper.points[4]);

        assert_eq!(raster.find_elevation(&a), lower.elevation);
        assert_eq!(raster.find_elevation(&b), upper.elevation);

        let mid = raster.find_elevation(&Point::new(0.5, (a.y + b.y) / 2.0));
        assert!(
            mid > lower.elevation && mid < upper.elevation,
            "{} not between {} and {}",
            mid,
            lower.elevation,
            upper.elevation
        );
    }
}

#[test]
fn test_split_strips_act_as_one_level() {
    let strips = split_middle_level();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    // Shared vertex of the two middle strips
    assert_eq!(raster.find_elevation(&Point::new(0.5, 0.5)), 50.0);
    // Halfway between the 0 and 50 lines
    assert_approx_eq!(raster.find_elevation(&Point::new(0.5, 0.35)), 25.0, 1e-9);
}

#[test]
fn test_points_outside_extent_clamp_to_grid() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    assert_eq!(raster.find_elevation(&Point::new(1.5, 1.5)), 100.0);
    assert_eq!(raster.find_elevation(&Point::new(-3.0, -3.0)), 100.0);
}

#[test]
fn test_overrun_rings_widen_the_search() {
    let strips = vec![dense_line(1, 0.0, 0.05), dense_line(2, 100.0, 0.95)];
    let index = SpatialIndex::build(&strips, unit_extent(), 8, Default::default());
    let query = Point::new(0.5, 0.1);

    let mut narrow = RasterConfig::default().with_grid_size(8);
    narrow.overrun_rings = 0;
    let raster = Rasterizer::unmasked(&index, narrow).unwrap();
    assert_eq!(raster.find_elevation(&query), 0.0);

    let mut wide = RasterConfig::default().with_grid_size(8);
    wide.overrun_rings = 8;
    let raster = Rasterizer::unmasked(&index, wide).unwrap();
    let e = raster.find_elevation(&query);
    assert!(e > 0.0 && e < 1.0, "got {}", e);
}

#[test]
fn test_exact_hit_epsilon_is_configurable() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());

    let mut config = grid4();
    config.exact_hit_epsilon = 0.01;
    let raster = Rasterizer::unmasked(&index, config).unwrap();

    // 0.05 from the upper line: within sqrt(0.01) = 0.1
    assert_eq!(raster.find_elevation(&Point::new(0.5, 0.7)), 100.0);
}

#[test]
fn test_world_extent_scales_coordinates() {
    let strips = vec![
        LineStrip::new(1, 10.0, vec![Point::new(0.0, 100.0), Point::new(1000.0, 100.0)]).unwrap(),
        LineStrip::new(2, 20.0, vec![Point::new(0.0, 300.0), Point::new(1000.0, 300.0)]).unwrap(),
    ];
    let extent = Extent::new(1000.0, 400.0).unwrap();
    let index = SpatialIndex::build(&strips, extent, 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    assert_eq!(raster.find_elevation(&Point::new(500.0, 100.0)), 10.0);
    assert_eq!(raster.find_elevation(&Point::new(500.0, 200.0)), 15.0);
}

// ============================================================================
// Exclusion masks
// ============================================================================

#[test]
fn test_excluded_cell_yields_no_data() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let mask = CellMask::from_cells(4, [(2, 2)]);
    let raster = Rasterizer::new(&index, &mask, grid4()).unwrap();

    assert_eq!(raster.find_elevation(&Point::new(0.6, 0.6)), NO_DATA);
    assert_eq!(raster.find_elevation(&Point::new(0.4, 0.6)), 100.0);
}

#[test]
fn test_grid_alignment_moves_points_between_cells() {
    let strips = diagonal_strip();
    let mask = CellMask::from_cells(4, [(2, 2)]);
    let query = Point::new(0.45, 0.6);

    let plain = SpatialIndex::build(&strips, unit_extent(), 4, GridAlignment::default());
    let raster = Rasterizer::new(&plain, &mask, grid4()).unwrap();
    assert_eq!(raster.find_elevation(&query), 100.0);
    let (plain_heights, plain_summary) = raster.rasterize_to_vec(&unit_area(8, 8)).unwrap();

    let alignment = GridAlignment::new(0.125, 0.0);
    let shifted = SpatialIndex::build(&strips, unit_extent(), 4, alignment);
    let mut config = grid4();
    config.grid_alignment = alignment;
    let raster = Rasterizer::new(&shifted, &mask, config).unwrap();
    // 0.45 + 0.125 lands in column 2
    assert_eq!(raster.find_elevation(&query), NO_DATA);
    let (shifted_heights, shifted_summary) = raster.rasterize_to_vec(&unit_area(8, 8)).unwrap();

    // The excluded block moves one pixel column to the left
    assert_eq!(plain_heights[4 * 8 + 3], 100.0);
    assert_eq!(shifted_heights[4 * 8 + 3], NO_DATA);
    assert_eq!(plain_heights[4 * 8 + 5], NO_DATA);
    assert_eq!(shifted_heights[4 * 8 + 5], 100.0);
    assert_eq!(plain_summary.no_data_pixels, 4);
    assert_eq!(shifted_summary.no_data_pixels, 4);
}

#[test]
fn test_mask_grid_must_match_index() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let mask = CellMask::from_cells(8, [(5, 5)]);

    let result = Rasterizer::new(&index, &mask, RasterConfig::default().with_grid_size(8));
    assert!(matches!(result, Err(RasterError::Config(_))));
}

#[test]
fn test_no_data_excluded_from_range() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let mask = CellMask::from_cells(4, [(2, 2)]);
    let raster = Rasterizer::new(&index, &mask, grid4()).unwrap();

    let (heights, summary) = raster.rasterize_to_vec(&unit_area(8, 8)).unwrap();

    // Pixels 4 and 5 along each axis have centres inside cell 2
    for row in 0..8 {
        for col in 0..8 {
            let expected = if (4..6).contains(&row) && (4..6).contains(&col) {
                NO_DATA
            } else {
                100.0
            };
            assert_eq!(heights[row * 8 + col], expected, "pixel ({}, {})", col, row);
        }
    }
    assert_eq!(summary.no_data_pixels, 4);
    assert_eq!(summary.pixels, 64);
    assert_eq!(summary.range, Some(ElevationRange { min: 100.0, max: 100.0 }));
}

#[test]
fn test_excluded_cells_are_skipped_during_search() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    // The upper line is only registered in row 3
    let mask = CellMask::from_cells(4, (0..4).map(|cx| (cx, 3)));
    let raster = Rasterizer::new(&index, &mask, grid4()).unwrap();

    let (heights, summary) = raster.rasterize_to_vec(&unit_area(8, 8)).unwrap();
    assert!(heights[..48].iter().all(|&h| h == 0.0));
    assert!(heights[48..].iter().all(|&h| h == NO_DATA));
    assert_eq!(summary.range, Some(ElevationRange { min: 0.0, max: 0.0 }));
}

#[test]
fn test_fully_excluded_raster_has_no_range() {
    let strips = parallel_pair();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let everything = |_cx: usize, _cy: usize| true;
    let raster = Rasterizer::new(&index, &everything, grid4()).unwrap();

    let (heights, summary) = raster.rasterize_to_vec(&unit_area(5, 3)).unwrap();
    assert!(heights.iter().all(|&h| h == NO_DATA));
    assert_eq!(summary.range, None);
    assert_eq!(summary.no_data_pixels, 15);
}

// ============================================================================
// Rasterization
// ============================================================================

#[test]
fn test_rasterize_matches_point_queries() {
    let strips = split_middle_level();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();
    let area = RasterArea::new(to_bbox(bbox::LOWER_LEFT), 6, 5).unwrap();

    let (heights, _) = raster.rasterize_to_vec(&area).unwrap();
    for row in 0..5 {
        for col in 0..6 {
            let expected = raster.find_elevation(&area.pixel_center(col, row));
            assert_eq!(heights[row * 6 + col].to_bits(), expected.to_bits());
        }
    }
}

#[test]
fn test_rasterize_range_tracks_extremes() {
    let strips = split_middle_level();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    let (heights, summary) = raster.rasterize_to_vec(&unit_area(16, 16)).unwrap();
    let range = summary.range.unwrap();
    let min = heights.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = heights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(range.min, min);
    assert_eq!(range.max, max);
    assert!(range.min >= 0.0 && range.max <= 100.0);
    assert_eq!(summary.no_data_pixels, 0);
}

#[test]
fn test_rasterize_rejects_mismatched_buffer() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    let mut out = vec![0.0; 10];
    assert!(raster.rasterize(&unit_area(4, 4), &mut out).is_err());
}

// ============================================================================
// Line mask
// ============================================================================

#[test]
fn test_line_mask_marks_pixels_near_indexed_segments() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let raster = Rasterizer::unmasked(&index, grid4()).unwrap();

    let mut mask = vec![false; 64];
    let hits = raster.rasterize_line_mask(&unit_area(8, 8), &mut mask).unwrap();

    // Only the endpoint cells (0, 0) and (3, 3) hold the segment
    let set: Vec<(usize, usize)> = (0..64).filter(|&i| mask[i]).map(|i| (i % 8, i / 8)).collect();
    assert_eq!(set, vec![(0, 0), (1, 1), (6, 6), (7, 7)]);
    assert_eq!(hits, 4);
}

#[test]
fn test_line_mask_skips_excluded_cells() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let cells = CellMask::from_cells(4, [(0, 0)]);
    let raster = Rasterizer::new(&index, &cells, grid4()).unwrap();

    let mut mask = vec![false; 64];
    let hits = raster.rasterize_line_mask(&unit_area(8, 8), &mut mask).unwrap();
    assert_eq!(hits, 2);
    assert!(mask[6 * 8 + 6] && mask[7 * 8 + 7]);
}

#[test]
fn test_line_mask_wiggle_widens_lines() {
    let strips = diagonal_strip();
    let index = SpatialIndex::build(&strips, unit_extent(), 4, Default::default());
    let mut config = grid4();
    config.line_mask_wiggle = 1.0;
    let raster = Rasterizer::unmasked(&index, config).unwrap();

    let mut mask = vec![false; 64];
    let hits = raster.rasterize_line_mask(&unit_area(8, 8), &mut mask).unwrap();

    // Off-diagonal neighbours are 0.088 away, inside one pixel pitch
    assert!(mask[1] && mask[8]);
    assert!(hits > 4);
}
