// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.
use glam::Vec2;

/// One of the two world axes. Resolution runs once per axis, x first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Y => Vec2::Y,
        }
    }

    pub fn component(self, v: Vec2) -> f32 {
        v[self.index()]
    }

    pub fn with_component(self, mut v: Vec2, value: f32) -> Vec2 {
        v[self.index()] = value;
        v
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

pub fn swap_components(v: Vec2) -> Vec2 {
    Vec2::new(v.y, v.x)
}

/// Sign of `value`, with zero mapped to +1.
pub fn sign_or_one(value: f32) -> f32 {
    if value == 0.0 { 1.0 } else { value.signum() }
}

/// The axis a collision normal lies on, if it has exactly one non-zero component.
pub fn axis_of(normal: Vec2) -> Option<Axis> {
    if normal.x != 0.0 && normal.y == 0.0 {
        Some(Axis::X)
    } else if normal.y != 0.0 && normal.x == 0.0 {
        Some(Axis::Y)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_access() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(Axis::X.component(v), 3.0);
        assert_eq!(Axis::Y.component(v), -4.0);
        assert_eq!(Axis::Y.with_component(v, 7.0), Vec2::new(3.0, 7.0));
    }

    #[test]
    fn swap_and_sign() {
        assert_eq!(swap_components(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0));
        assert_eq!(sign_or_one(0.0), 1.0);
        assert_eq!(sign_or_one(-2.5), -1.0);
    }

    #[test]
    fn axis_of_rejects_diagonals() {
        assert_eq!(axis_of(Vec2::new(0.0, -1.0)), Some(Axis::Y));
        assert_eq!(axis_of(Vec2::new(1.0, 1.0)), None);
        assert_eq!(axis_of(Vec2::ZERO), None);
    }
}
