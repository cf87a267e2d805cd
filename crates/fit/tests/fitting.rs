//! Integration tests for fitting point clouds onto targets

use rstest::{fixture, rstest};
use thermofit_fit::{
    fit_data, fit_regions, merge_max, Error, Fitter, Method, SourceCloud, Targets,
};

/// Simple linear congruential generator so the clouds are reproducible
fn pseudo_random(seed: u64, n: usize) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn linear_field(p: &[f64; 3]) -> f64 {
    7.0 + 2.0 * p[0] - 3.0 * p[1] + 0.5 * p[2]
}

/// 5x5x5 grid on [0, 4] with every point nudged by up to 0.2
#[fixture]
fn jittered() -> Vec<[f64; 3]> {
    let jitter = pseudo_random(1234, 3 * 125);
    let mut points = Vec::new();
    for k in 0..5 {
        for j in 0..5 {
            for i in 0..5 {
                let n = points.len();
                points.push([
                    i as f64 + 0.4 * (jitter[3 * n] - 0.5),
                    j as f64 + 0.4 * (jitter[3 * n + 1] - 0.5),
                    k as f64 + 0.4 * (jitter[3 * n + 2] - 0.5),
                ]);
            }
        }
    }
    points
}

/// Regular grid on [0, 1] with plenty of cospherical points
#[fixture]
fn grid() -> Vec<[f64; 3]> {
    let mut points = Vec::new();
    for k in 0..4 {
        for j in 0..4 {
            for i in 0..4 {
                points.push([i as f64 / 3.0, j as f64 / 3.0, k as f64 / 3.0]);
            }
        }
    }
    points
}

fn interior_targets(lower: f64, upper: f64, n: usize) -> Targets {
    let coords = pseudo_random(99, 3 * n)
        .chunks_exact(3)
        .map(|c| {
            [
                lower + (upper - lower) * c[0],
                lower + (upper - lower) * c[1],
                lower + (upper - lower) * c[2],
            ]
        })
        .collect::<Vec<[f64; 3]>>();

    // deliberately shuffled indices
    let indices = (0..n).map(|i| (i * 7919) % n + 1).collect::<Vec<usize>>();
    let ids = indices.iter().map(|i| 1000 + *i as u64).collect();
    Targets::new(ids, indices, coords).unwrap()
}

#[rstest]
fn every_target_once_and_sorted(jittered: Vec<[f64; 3]>) {
    let values = jittered.iter().map(linear_field).collect();
    let cloud = SourceCloud::new(jittered, values).unwrap();

    // a mix of interior and far away targets
    let mut coords = interior_targets(0.2, 3.8, 50).coords().to_vec();
    coords.push([-10.0, 2.0, 2.0]);
    coords.push([2.0, 50.0, 2.0]);
    let n = coords.len();
    let indices = (1..=n).rev().collect::<Vec<usize>>();
    let ids = (0..n as u64).collect::<Vec<u64>>();
    let targets = Targets::new(ids, indices, coords).unwrap();

    let records = Fitter::new().fit(&cloud, &targets).unwrap();
    assert_eq!(records.len(), n);
    assert!(records.windows(2).all(|w| w[0].index < w[1].index));
    assert_eq!(records.iter().filter(|r| r.is_extrapolated()).count(), 2);

    // ids and coordinates are carried with their index
    for r in &records {
        let original = n - r.index;
        assert_eq!(r.id, original as u64);
        assert_eq!(r.coords(), targets.coords()[original]);
    }
}

#[rstest]
fn linear_fields_are_exact(jittered: Vec<[f64; 3]>) {
    let values = jittered.iter().map(linear_field).collect();
    let cloud = SourceCloud::new(jittered, values).unwrap();
    let targets = interior_targets(0.2, 3.8, 200);

    let records = Fitter::new().fit(&cloud, &targets).unwrap();
    for r in &records {
        assert_eq!(r.method, Method::Interpolated);
        let expected = linear_field(&r.coords());
        assert!(
            (r.value - expected).abs() < 1e-9,
            "node {} fitted {} expected {}",
            r.index,
            r.value,
            expected
        );
    }
}

#[rstest]
#[case(0.0)]
#[case(-4.5)]
#[case(1.0e6)]
fn constant_fields_stay_constant(grid: Vec<[f64; 3]>, #[case] constant: f64) {
    let n = grid.len();
    let cloud = SourceCloud::new(grid, vec![constant; n]).unwrap();

    // inside and well outside the cloud
    let mut coords = interior_targets(0.0, 1.0, 40).coords().to_vec();
    coords.extend([[2.0, 2.0, 2.0], [-1.0, 0.5, 0.5], [0.5, 0.5, 3.0]]);
    let m = coords.len();
    let targets = Targets::new(vec![0; m], (1..=m).collect(), coords).unwrap();

    for r in Fitter::new().fit(&cloud, &targets).unwrap() {
        assert!((r.value - constant).abs() <= 1e-12 * constant.abs().max(1.0));
    }
}

#[rstest]
fn source_points_reproduce_their_values(grid: Vec<[f64; 3]>) {
    let values = grid.iter().map(linear_field).collect::<Vec<f64>>();
    let n = grid.len();
    let records = fit_data(
        &grid,
        &values,
        &vec![1; n],
        &(1..=n).collect::<Vec<usize>>(),
        &grid,
    )
    .unwrap();

    for (r, v) in records.iter().zip(&values) {
        assert!((r.value - v).abs() < 1e-9);
    }
}

#[rstest]
#[case(1.0e-12, Method::Interpolated)] // rounding noise on the hull
#[case(0.0, Method::Interpolated)] // exactly on the hull
#[case(1.0e-3, Method::Extrapolated)] // genuinely outside
fn hull_tolerance(grid: Vec<[f64; 3]>, #[case] offset: f64, #[case] method: Method) {
    let values = grid.iter().map(linear_field).collect::<Vec<f64>>();
    let p = [0.4, 0.55, 1.0 + offset];
    let records = fit_data(&grid, &values, &[1], &[1], &[p]).unwrap();

    assert_eq!(records[0].method, method);
    if method == Method::Interpolated {
        assert!((records[0].value - linear_field(&p)).abs() < 1e-9);
    }
}

#[rstest]
#[case([0.4, 0.55, 1.0], [0.0, 0.0, 1.0])] // top
#[case([0.0, 0.3, 0.7], [-1.0, 0.0, 0.0])] // left
#[case([0.8, 1.0, 0.15], [0.0, 1.0, 0.0])] // back
fn extrapolation_is_continuous_at_the_hull(
    grid: Vec<[f64; 3]>,
    #[case] on_hull: [f64; 3],
    #[case] normal: [f64; 3],
    #[values(1.0e-3, 1.0e-6)] offset: f64,
) {
    let values = grid.iter().map(linear_field).collect::<Vec<f64>>();
    let outside = [
        on_hull[0] + offset * normal[0],
        on_hull[1] + offset * normal[1],
        on_hull[2] + offset * normal[2],
    ];
    let records = fit_data(&grid, &values, &[1, 2], &[1, 2], &[on_hull, outside]).unwrap();
    assert_eq!(records[0].method, Method::Interpolated);
    assert_eq!(records[1].method, Method::Extrapolated);

    // weighting never strays further than its neighbours do from the hull point
    let spacing = 1.0 / 3.0;
    let gradient = (2.0_f64.powi(2) + 3.0_f64.powi(2) + 0.5_f64.powi(2)).sqrt();
    let jump = (records[1].value - records[0].value).abs();
    assert!(
        jump < 1.5 * spacing * gradient,
        "jump of {jump} across the hull at {on_hull:?}"
    );
}

#[rstest]
#[case([1.0, 0.01, 0.01])] // cladding-like slab
#[case([1.0, 1.0, 1.0e-3])] // plate
fn thin_clouds_interpolate_everywhere(#[case] extent: [f64; 3]) {
    let mut source = Vec::new();
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                source.push([
                    i as f64 * extent[0],
                    j as f64 * extent[1],
                    k as f64 * extent[2],
                ]);
            }
        }
    }
    for c in pseudo_random(5, 3 * 500).chunks_exact(3) {
        source.push([
            extent[0] * (0.001 + 0.998 * c[0]),
            extent[1] * (0.001 + 0.998 * c[1]),
            extent[2] * (0.001 + 0.998 * c[2]),
        ]);
    }
    let values = source.iter().map(linear_field).collect();
    let cloud = SourceCloud::new(source, values).unwrap();

    // 1% in from every side
    let coords = pseudo_random(11, 3 * 5000)
        .chunks_exact(3)
        .map(|c| {
            [
                extent[0] * (0.01 + 0.98 * c[0]),
                extent[1] * (0.01 + 0.98 * c[1]),
                extent[2] * (0.01 + 0.98 * c[2]),
            ]
        })
        .collect::<Vec<[f64; 3]>>();
    let n = coords.len();
    let targets = Targets::new(vec![0; n], (1..=n).collect(), coords).unwrap();

    for r in Fitter::new().fit(&cloud, &targets).unwrap() {
        assert_eq!(r.method, Method::Interpolated, "node {} at {:?}", r.index, r.coords());
        assert!((r.value - linear_field(&r.coords())).abs() < 1e-9);
    }
}

#[test]
fn far_point_is_idw_of_three_nearest() {
    let source = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    let values = [0.0, 10.0, 20.0, 30.0];

    // nearest three are (1,0,0), (0,1,0), (0,0,1) at different distances
    let p = [3.0, 2.0, 1.0];
    let records = fit_data(&source, &values, &[1], &[1], &[p]).unwrap();

    let d = |q: [f64; 3]| -> f64 {
        ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2)).sqrt()
    };
    let (d1, d2, d3) = (d(source[1]), d(source[2]), d(source[3]));
    let expected = (10.0 / d1 + 20.0 / d2 + 30.0 / d3) / (1.0 / d1 + 1.0 / d2 + 1.0 / d3);

    assert_eq!(records[0].method, Method::Extrapolated);
    assert!((records[0].value - expected).abs() < 1e-12);
}

#[test]
fn duplicate_indices_keep_input_order() {
    let source = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    let records = fit_data(
        &source,
        &[1.0; 4],
        &[30, 10, 20],
        &[5, 5, 1],
        &[[0.1; 3], [0.2; 3], [0.0; 3]],
    )
    .unwrap();

    let ids = records.iter().map(|r| r.id).collect::<Vec<u64>>();
    assert_eq!(ids, vec![20, 30, 10]);
}

#[rstest]
#[case(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])] // too few
#[case(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]])] // coplanar
#[case(vec![[0.0; 3], [1.0; 3], [2.0; 3], [3.0; 3]])] // collinear
fn degenerate_sources(#[case] source: Vec<[f64; 3]>) {
    let values = vec![1.0; source.len()];
    let result = fit_data(&source, &values, &[1], &[1], &[[0.1; 3]]);
    assert!(matches!(result, Err(Error::DegenerateInput(_))));
}

#[rstest]
fn regions_then_merge(grid: Vec<[f64; 3]>) {
    let n = grid.len();
    let low = SourceCloud::new(grid.clone(), vec![1.0; n]).unwrap();
    let high = SourceCloud::new(grid, vec![2.0; n]).unwrap();

    // node 2 is on the interface between the two regions
    let first = Targets::new(vec![1, 2], vec![1, 2], vec![[0.1; 3], [0.5; 3]]).unwrap();
    let second = Targets::new(vec![2, 3], vec![2, 3], vec![[0.5; 3], [0.9; 3]]).unwrap();

    let fitter = Fitter::builder().disable_progress(true).build();
    let results = fit_regions(&fitter, &[(low, first), (high, second)]).unwrap();
    assert_eq!(results.len(), 2);
    assert!((results[0][1].value - 1.0).abs() < 1e-12);

    let merged = merge_max(&results);
    let values = merged.iter().map(|r| r.value).collect::<Vec<f64>>();
    assert_eq!(merged.len(), 3);
    assert!((values[0] - 1.0).abs() < 1e-12);
    assert!((values[1] - 2.0).abs() < 1e-12);
    assert!((values[2] - 2.0).abs() < 1e-12);
}
