use glam::Vec2;

/// Velocity state carried by kinematic bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub velocity: Vec2,
    pub pushable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyType {
    /// Overlap notification only, never blocks anything.
    Region,
    Static,
    Kinematic(KinematicState),
}

/// Resolution precedence class of a rigid body.
///
/// Declaration order is precedence order: candidates are ranked static first,
/// then unpushable, then pushable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mobility {
    Static,
    KinematicUnpushable,
    KinematicPushable,
}

impl Mobility {
    pub fn precedence(self) -> u8 {
        match self {
            Mobility::Static => 0,
            Mobility::KinematicUnpushable => 1,
            Mobility::KinematicPushable => 2,
        }
    }

    pub fn is_kinematic(self) -> bool {
        !matches!(self, Mobility::Static)
    }

    pub fn is_pushable(self) -> bool {
        matches!(self, Mobility::KinematicPushable)
    }
}

impl BodyType {
    /// `None` for regions, which take no part in rigid resolution.
    pub fn mobility(&self) -> Option<Mobility> {
        match self {
            BodyType::Region => None,
            BodyType::Static => Some(Mobility::Static),
            BodyType::Kinematic(state) if state.pushable => Some(Mobility::KinematicPushable),
            BodyType::Kinematic(_) => Some(Mobility::KinematicUnpushable),
        }
    }

    pub fn is_rigid(&self) -> bool {
        !matches!(self, BodyType::Region)
    }

    pub fn velocity(&self) -> Vec2 {
        match self {
            BodyType::Kinematic(state) => state.velocity,
            _ => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobility_from_body_type() {
        let pushable = BodyType::Kinematic(KinematicState {
            velocity: Vec2::ONE,
            pushable: true,
        });
        let unpushable = BodyType::Kinematic(KinematicState {
            velocity: Vec2::ONE,
            pushable: false,
        });
        assert_eq!(BodyType::Region.mobility(), None);
        assert_eq!(BodyType::Static.mobility(), Some(Mobility::Static));
        assert_eq!(pushable.mobility(), Some(Mobility::KinematicPushable));
        assert_eq!(unpushable.mobility(), Some(Mobility::KinematicUnpushable));
    }

    #[test]
    fn precedence_matches_ordering() {
        let mut classes = vec![
            Mobility::KinematicPushable,
            Mobility::Static,
            Mobility::KinematicUnpushable,
        ];
        classes.sort();
        assert_eq!(
            classes,
            vec![
                Mobility::Static,
                Mobility::KinematicUnpushable,
                Mobility::KinematicPushable
            ]
        );
        assert!(Mobility::Static.precedence() < Mobility::KinematicPushable.precedence());
    }

    #[test]
    fn only_kinematic_bodies_have_velocity() {
        assert_eq!(BodyType::Static.velocity(), Vec2::ZERO);
        let moving = BodyType::Kinematic(KinematicState {
            velocity: Vec2::new(1.0, -2.0),
            pushable: true,
        });
        assert_eq!(moving.velocity(), Vec2::new(1.0, -2.0));
    }
}
