//! Closed-wall (no-flux) boundary handling.
//!
//! Every domain edge is a solid wall: the velocity component normal to the
//! edge is zero. On the C-grid only the eastern `u` faces and northern `v`
//! faces carry explicit boundary velocities; the western and southern
//! walls are enforced implicitly by the zero-flux treatment of the first
//! column/row in the continuity update (see `solver::stepper`). Elevation
//! at edge cells needs no separate treatment either, because the edge
//! flux differences are already one-sided.

use crate::field::Field2D;

/// Zero the wall-normal boundary velocities.
///
/// Applied every step after the momentum update so boundary values never
/// lag the interior.
pub fn close_walls(u: &mut Field2D, v: &mut Field2D) {
    let (nx, ny) = u.shape();
    for j in 0..ny {
        u[(nx - 1, j)] = 0.0;
    }
    for i in 0..nx {
        v[(i, ny - 1)] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_walls_zeroes_normal_components() {
        let mut u = Field2D::filled(4, 5, 1.0);
        let mut v = Field2D::filled(4, 5, -2.0);
        close_walls(&mut u, &mut v);
        for j in 0..5 {
            assert_eq!(u[(3, j)], 0.0);
        }
        for i in 0..4 {
            assert_eq!(v[(i, 4)], 0.0);
        }
        // Interior untouched.
        assert_eq!(u[(1, 2)], 1.0);
        assert_eq!(v[(2, 1)], -2.0);
    }
}
