//! Navigation menu domain model and the default menu-set table.
//!
//! Default menus per module kind are data, not code branches: adding
//! a module kind means adding a row to [`default_menu_set`].

use serde::{Deserialize, Serialize};

use super::module::ModuleKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperMenu {
    /// Opaque unique key; the public identifier for this menu entry.
    pub menu_key: String,
    pub module_mapper_key: String,
    pub name: String,
    /// Discriminator, unique per mapper.
    pub menu_type: String,
    pub route_name: String,
    /// Display order.
    pub position: u32,
    pub main_menu: bool,
    pub footer_menu: bool,
    pub home_page: bool,
    pub public_menu: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenu {
    pub menu_key: String,
    pub module_mapper_key: String,
    pub name: String,
    pub menu_type: String,
    pub route_name: String,
    pub position: u32,
    pub main_menu: bool,
    pub footer_menu: bool,
    pub home_page: bool,
    pub public_menu: bool,
}

/// One entry of a default menu set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSeed {
    pub menu_type: &'static str,
    pub route_name: &'static str,
    pub position: u32,
}

const WEBSITE_MENUS: &[MenuSeed] = &[
    MenuSeed { menu_type: "NEWS", route_name: "/news", position: 1 },
    MenuSeed { menu_type: "EVENTS", route_name: "/events", position: 2 },
    MenuSeed { menu_type: "NEWSSUBSCRIPTION", route_name: "/news-subscription", position: 3 },
    MenuSeed { menu_type: "ALBUM", route_name: "/album", position: 4 },
    MenuSeed { menu_type: "ABOUTUS", route_name: "/about-us", position: 5 },
];

const EDUCATION_MENUS: &[MenuSeed] = &[
    MenuSeed { menu_type: "ALUMNI", route_name: "/alumni", position: 6 },
    MenuSeed { menu_type: "PROGRAMS", route_name: "/programs", position: 7 },
    MenuSeed { menu_type: "FACILITIES", route_name: "/facilities", position: 8 },
];

const JOURNAL_MENUS: &[MenuSeed] = &[
    MenuSeed { menu_type: "JOURNAL_ARCHIVES", route_name: "/journal/archives", position: 6 },
    MenuSeed { menu_type: "JOURNAL_COMING", route_name: "/journal/coming", position: 7 },
    MenuSeed { menu_type: "JOURNAL_PAGE", route_name: "/journal/page", position: 8 },
    MenuSeed { menu_type: "JOURNAL_CURRENT", route_name: "/journal/current", position: 9 },
];

const JOURNAL_INDEX_MENUS: &[MenuSeed] = &[
    MenuSeed {
        menu_type: "JOURNAL_INDEX_REGISTRATION",
        route_name: "/journal-index/registration",
        position: 6,
    },
    MenuSeed {
        menu_type: "JOURNAL_INDEX_SEARCH",
        route_name: "/journal-index/search",
        position: 7,
    },
];

/// The fixed default menu set seeded when a module of the given kind
/// is granted to a company. Kinds without a specialized set get the
/// generic website set.
pub fn default_menu_set(kind: ModuleKind) -> &'static [MenuSeed] {
    match kind {
        ModuleKind::Education => EDUCATION_MENUS,
        ModuleKind::Journal => JOURNAL_MENUS,
        ModuleKind::JournalIndex => JOURNAL_INDEX_MENUS,
        ModuleKind::Website | ModuleKind::Review => WEBSITE_MENUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn education_set_occupies_positions_6_to_8() {
        let seeds = default_menu_set(ModuleKind::Education);
        assert_eq!(seeds.len(), 3);
        assert_eq!(
            seeds.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![6, 7, 8]
        );
    }

    #[test]
    fn journal_set_has_four_entries() {
        let seeds = default_menu_set(ModuleKind::Journal);
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[3].menu_type, "JOURNAL_CURRENT");
        assert_eq!(seeds[3].position, 9);
    }

    #[test]
    fn unspecialized_kinds_fall_back_to_website_set() {
        assert_eq!(
            default_menu_set(ModuleKind::Review),
            default_menu_set(ModuleKind::Website)
        );
        assert_eq!(default_menu_set(ModuleKind::Website).len(), 5);
    }

    #[test]
    fn menu_types_are_unique_within_each_set() {
        for kind in ModuleKind::all() {
            let seeds = default_menu_set(kind);
            for (i, a) in seeds.iter().enumerate() {
                for b in &seeds[i + 1..] {
                    assert_ne!(a.menu_type, b.menu_type);
                }
            }
        }
    }
}
