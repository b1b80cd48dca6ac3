//! Turns the `position` section into class flags and CSS custom properties for the launcher.

use serde::Serialize;

use crate::domain::appearance::{Corner, Horizontal, Position, Vertical};

pub const CLASS_PREFIX: &str = "chatdock";
pub const VAR_OFFSET_X: &str = "--chatdock-offset-x";
pub const VAR_OFFSET_Y: &str = "--chatdock-offset-y";
pub const VAR_Z_INDEX: &str = "--chatdock-z-index";
pub const VAR_MOBILE_OFFSET_X: &str = "--chatdock-mobile-offset-x";
pub const VAR_MOBILE_OFFSET_Y: &str = "--chatdock-mobile-offset-y";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CornerFlags {
    pub vertical: &'static str,
    pub horizontal: &'static str,
}

impl CornerFlags {
    pub fn for_corner(corner: Corner) -> Self {
        Self {
            vertical: match corner.vertical() {
                Vertical::Top => "top",
                Vertical::Bottom => "bottom",
            },
            horizontal: match corner.horizontal() {
                Horizontal::Left => "left",
                Horizontal::Right => "right",
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MobileDirectives {
    pub flags: CornerFlags,
    pub offset_x: u16,
    pub offset_y: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionDirectives {
    pub flags: CornerFlags,
    pub offset_x: u16,
    pub offset_y: u16,
    pub z_index: i32,
    /// Present only when the mobile override is switched on.
    pub mobile: Option<MobileDirectives>,
}

pub fn resolve(position: &Position) -> PositionDirectives {
    let mobile = position.mobile_override.then(|| MobileDirectives {
        flags: CornerFlags::for_corner(position.mobile_corner),
        offset_x: position.mobile_offset_x,
        offset_y: position.mobile_offset_y,
    });

    PositionDirectives {
        flags: CornerFlags::for_corner(position.corner),
        offset_x: position.offset_x,
        offset_y: position.offset_y,
        z_index: position.z_index,
        mobile,
    }
}

impl PositionDirectives {
    pub fn use_mobile(&self) -> bool {
        self.mobile.is_some()
    }

    /// Class list in a fixed order: desktop pair, then mobile pair and the mobile switch.
    pub fn classes(&self) -> Vec<String> {
        let mut classes = vec![
            format!("{CLASS_PREFIX}--{}", self.flags.vertical),
            format!("{CLASS_PREFIX}--{}", self.flags.horizontal),
        ];
        if let Some(mobile) = &self.mobile {
            classes.push(format!("{CLASS_PREFIX}--mobile-{}", mobile.flags.vertical));
            classes.push(format!("{CLASS_PREFIX}--mobile-{}", mobile.flags.horizontal));
            classes.push(format!("{CLASS_PREFIX}--use-mobile"));
        }
        classes
    }

    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let mut variables = vec![
            (VAR_OFFSET_X, format!("{}px", self.offset_x)),
            (VAR_OFFSET_Y, format!("{}px", self.offset_y)),
            (VAR_Z_INDEX, self.z_index.to_string()),
        ];
        if let Some(mobile) = &self.mobile {
            variables.push((VAR_MOBILE_OFFSET_X, format!("{}px", mobile.offset_x)));
            variables.push((VAR_MOBILE_OFFSET_Y, format!("{}px", mobile.offset_y)));
        }
        variables
    }

    pub fn class_attribute(&self) -> String {
        self.classes().join(" ")
    }

    pub fn style_attribute(&self) -> String {
        self.css_variables()
            .into_iter()
            .map(|(name, value)| format!("{name}:{value};"))
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, CornerFlags};
    use crate::domain::appearance::{Corner, Position};

    #[test]
    fn every_corner_maps_to_one_consistent_flag_pair() {
        for corner in Corner::ALL {
            let flags = CornerFlags::for_corner(*corner);
            assert!(matches!(flags.vertical, "top" | "bottom"));
            assert!(matches!(flags.horizontal, "left" | "right"));

            let wire = corner.as_str();
            assert!(wire.contains(flags.vertical), "{wire}");
            assert!(wire.contains(flags.horizontal), "{wire}");
        }
    }

    #[test]
    fn desktop_only_position_has_three_variables() {
        let directives = resolve(&Position::default());

        assert!(!directives.use_mobile());
        assert_eq!(directives.classes(), vec!["chatdock--bottom", "chatdock--right"]);
        assert_eq!(
            directives.style_attribute(),
            "--chatdock-offset-x:20px;--chatdock-offset-y:20px;--chatdock-z-index:9999;"
        );
    }

    #[test]
    fn mobile_override_adds_second_pair_and_switch() {
        let position = Position {
            corner: Corner::TopLeft,
            mobile_override: true,
            mobile_corner: Corner::BottomRight,
            mobile_offset_x: 4,
            mobile_offset_y: 6,
            ..Position::default()
        };
        let directives = resolve(&position);

        assert_eq!(
            directives.class_attribute(),
            "chatdock--top chatdock--left chatdock--mobile-bottom chatdock--mobile-right \
             chatdock--use-mobile"
        );
        assert_eq!(directives.css_variables().len(), 5);
        assert!(directives.style_attribute().ends_with("--chatdock-mobile-offset-y:6px;"));
    }

    #[test]
    fn resolution_is_idempotent() {
        for corner in Corner::ALL {
            let position =
                Position { corner: *corner, mobile_override: true, ..Position::default() };
            let first = resolve(&position);
            let second = resolve(&position);
            assert_eq!(first, second);
            assert_eq!(first.style_attribute(), second.style_attribute());
            assert_eq!(first.class_attribute(), second.class_attribute());
        }
    }
}
