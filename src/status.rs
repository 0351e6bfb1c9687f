/// Flags carried by every element's attribute payload.
///
/// A freshly created element is visible and has every other flag cleared.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Status {
    flags: u8,
}

macro_rules! status_flags {
    ($($bit:literal => $get:ident, $set:ident;)*) => {
        impl Status {
            $(
                pub fn $get(&self) -> bool {
                    self.flags & (1 << $bit) != 0
                }

                pub fn $set(&mut self, flag: bool) {
                    if flag {
                        self.flags |= 1 << $bit;
                    } else {
                        self.flags &= !(1 << $bit);
                    }
                }
            )*
        }
    };
}

status_flags! {
    0 => marked, set_marked;
    1 => hidden, set_hidden;
    2 => selected, set_selected;
    3 => locked, set_locked;
    4 => feature, set_feature;
    5 => tagged, set_tagged;
}

impl Status {
    pub fn visible(&self) -> bool {
        !self.hidden()
    }

    /// Clear all flags.
    pub fn reset(&mut self) {
        self.flags = 0;
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn t_status_flags_independent() {
        let mut s = Status::default();
        assert!(s.visible());
        s.set_marked(true);
        s.set_hidden(true);
        assert!(s.marked() && s.hidden() && !s.visible());
        assert!(!s.selected() && !s.locked() && !s.feature() && !s.tagged());
        s.set_marked(false);
        assert!(!s.marked() && s.hidden());
        s.set_tagged(true);
        assert!(s.tagged() && !s.feature());
        s.reset();
        assert_eq!(s, Status::default());
    }
}
