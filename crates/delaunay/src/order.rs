//! Spatial ordering of insertion points

// thermofit modules
use thermofit_utils::Bounds;

/// Bits of resolution per axis in the Morton code
const BITS: u32 = 10;

/// Point indices sorted along a Z-order (Morton) curve
///
/// Inserting points in spatially coherent order keeps the walk from the
/// previous insertion short. Ties are broken by index so the order, and
/// therefore the triangulation, is deterministic.
pub(crate) fn morton_order(points: &[[f64; 3]], bounds: &Bounds) -> Vec<usize> {
    let extent = bounds.extent();
    let max_cell = ((1u64 << BITS) - 1) as f64;

    let quantise = |p: &[f64; 3], axis: usize| -> u64 {
        if extent[axis] > 0.0 {
            (((p[axis] - bounds.lower[axis]) / extent[axis]) * max_cell).round() as u64
        } else {
            0
        }
    };

    let mut keyed = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let code = spread(quantise(p, 0))
                | (spread(quantise(p, 1)) << 1)
                | (spread(quantise(p, 2)) << 2);
            (code, i)
        })
        .collect::<Vec<(u64, usize)>>();

    keyed.sort_unstable();
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Spread the lowest 10 bits so there are two zero bits between each
fn spread(value: u64) -> u64 {
    let mut v = value & 0x3ff;
    v = (v | (v << 16)) & 0x0300_00ff;
    v = (v | (v << 8)) & 0x0300_f00f;
    v = (v | (v << 4)) & 0x030c_30c3;
    v = (v | (v << 2)) & 0x0924_9249;
    v
}
