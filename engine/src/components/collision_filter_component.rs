/// Layer/mask bitfields deciding which bodies see each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    pub layer: u32,
    pub mask: u32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: 0b1,
            mask: 0b1,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: u32, mask: u32) -> Self {
        Self { layer, mask }
    }

    /// Two filters interact when either one's layer is in the other's mask.
    pub fn interacts(&self, other: &CollisionFilter) -> bool {
        (self.layer & other.mask) != 0 || (other.layer & self.mask) != 0
    }

    pub fn set_layer_bit(&mut self, level: u32, on: bool) {
        self.layer = with_bit(self.layer, level, on);
    }

    pub fn set_mask_bit(&mut self, level: u32, on: bool) {
        self.mask = with_bit(self.mask, level, on);
    }
}

fn with_bit(bits: u32, level: u32, on: bool) -> u32 {
    let Some(flag) = 1u32.checked_shl(level) else {
        log::warn!("collision bit {} is out of range, ignoring", level);
        return bits;
    };
    if on { bits | flag } else { bits & !flag }
}
