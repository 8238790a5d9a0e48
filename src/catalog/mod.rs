//! Menu Catalog
//!
//! Static in-memory catalog: category → items with whole-ruble prices.
//! No mutation, no persistence — the menu ships with the binary.

/// A single dish with its price in whole rubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub price: i64,
}

/// A menu category with its dishes.
#[derive(Debug, Clone, Copy)]
pub struct MenuCategory {
    pub name: &'static str,
    pub items: &'static [MenuItem],
}

const MENU: &[MenuCategory] = &[
    MenuCategory {
        name: "Закуски",
        items: &[
            MenuItem { name: "Брускетта", price: 320 },
            MenuItem { name: "Салат Цезарь", price: 450 },
        ],
    },
    MenuCategory {
        name: "Основные",
        items: &[
            MenuItem { name: "Стейк рибай", price: 1200 },
            MenuItem { name: "Лосось гриль", price: 980 },
        ],
    },
    MenuCategory {
        name: "Десерты",
        items: &[
            MenuItem { name: "Тирамису", price: 380 },
            MenuItem { name: "Панна котта", price: 340 },
        ],
    },
];

/// Read-only menu lookup.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    categories: &'static [MenuCategory],
}

impl Catalog {
    pub fn new() -> Self {
        Self { categories: MENU }
    }

    /// Category names, in menu order.
    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories.iter().map(|c| c.name)
    }

    /// Items of one category. Unknown categories yield an empty slice.
    pub fn items(&self, category: &str) -> &'static [MenuItem] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.items)
            .unwrap_or(&[])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
