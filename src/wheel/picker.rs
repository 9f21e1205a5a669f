use super::FULL_TURN;
use super::geometry::angle_of;
use rand::Rng;

/// Uniform pick over `[0, n)`. `None` for an empty wheel.
pub fn pick_index<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<usize> {
    (n > 0).then(|| rng.random_range(0..n))
}

/// The whole-degree rotation that puts item `index` of `n` under the indicator.
///
/// Slot `index` sits at `index * 360 / n`, so the disc has to turn by the rest
/// of the circle. Rounding up keeps the floored slot angle at exactly 0 when
/// `n` does not divide 360.
pub fn rotation_for(index: usize, n: usize) -> u16 {
    if n == 0 {
        return 0;
    }
    let turn = FULL_TURN as usize;
    (((n - index % n) * turn).div_ceil(n) % turn) as u16
}

/// The displayable position currently sitting at angle 0, if any.
pub fn indicated_index(rotation: u16, offsets: &[f64]) -> Option<usize> {
    offsets
        .iter()
        .position(|&offset| angle_of(rotation, offset) == 0)
}
