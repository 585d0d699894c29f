//! Process-wide table of value and shorthand managers.

use crate::managers::ValueManager;
use crate::managers::color::{COLOR_MANAGERS, ColorManager, PAINT_MANAGERS};
use crate::managers::font::{
    FontFamilyManager, FontSizeManager, FontStretchManager, FontWeightManager,
};
use crate::managers::identifier::{IDENTIFIER_MANAGERS, TextDecorationManager};
use crate::managers::length::{ANGLE_MANAGERS, DashArrayManager, LENGTH_MANAGERS, NUMBER_MANAGERS};
use crate::managers::reference::{ColorProfileManager, CursorManager, URI_MANAGERS};
use crate::managers::shape::{ClipManager, EnableBackgroundManager};
use crate::shorthand::{BOX_SHORTHANDS, MarkerShorthandManager, ShorthandManager};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Managers indexed by property index, plus the shorthands.
pub struct ValueManagerRegistry {
    managers: Vec<Box<dyn ValueManager>>,
    indices: HashMap<&'static str, usize>,
    shorthands: HashMap<&'static str, Box<dyn ShorthandManager>>,
    font_size_index: usize,
    color_index: usize,
}

static REGISTRY: Lazy<ValueManagerRegistry> = Lazy::new(ValueManagerRegistry::standard);

/// The shared registry, built on first use.
pub fn registry() -> &'static ValueManagerRegistry {
    &REGISTRY
}

impl ValueManagerRegistry {
    /// Every supported property. `font-size` and `color` come first since most
    /// relative values are computed from them.
    fn standard() -> Self {
        let mut registry = Self {
            managers: Vec::new(),
            indices: HashMap::new(),
            shorthands: HashMap::new(),
            font_size_index: 0,
            color_index: 0,
        };
        registry.font_size_index = registry.register(FontSizeManager);
        registry.color_index = registry.register(ColorManager::COLOR);
        registry.register(FontWeightManager);
        registry.register(FontStretchManager);
        registry.register(FontFamilyManager);
        registry.register(CursorManager);
        registry.register(ColorProfileManager);
        registry.register(TextDecorationManager);
        registry.register(DashArrayManager);
        registry.register(ClipManager);
        registry.register(EnableBackgroundManager);
        for manager in IDENTIFIER_MANAGERS {
            registry.register(*manager);
        }
        for manager in LENGTH_MANAGERS {
            registry.register(*manager);
        }
        for manager in NUMBER_MANAGERS {
            registry.register(*manager);
        }
        for manager in ANGLE_MANAGERS {
            registry.register(*manager);
        }
        for manager in COLOR_MANAGERS {
            registry.register(*manager);
        }
        for manager in PAINT_MANAGERS {
            registry.register(*manager);
        }
        for manager in URI_MANAGERS {
            registry.register(*manager);
        }
        for shorthand in BOX_SHORTHANDS {
            registry.register_shorthand(shorthand);
        }
        registry.register_shorthand(MarkerShorthandManager);
        log::debug!(
            "registered {} properties and {} shorthands",
            registry.managers.len(),
            registry.shorthands.len()
        );
        registry
    }

    fn register<M: ValueManager + 'static>(&mut self, manager: M) -> usize {
        let index = self.managers.len();
        self.indices.insert(manager.property_name(), index);
        self.managers.push(Box::new(manager));
        index
    }

    fn register_shorthand<S: ShorthandManager + 'static>(&mut self, shorthand: S) {
        self.shorthands
            .insert(shorthand.property_name(), Box::new(shorthand));
    }

    /// Number of longhand properties.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Index of a longhand property, ignoring ASCII case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices
            .get(name)
            .or_else(|| self.indices.get(name.to_ascii_lowercase().as_str()))
            .copied()
    }

    pub fn manager(&self, index: usize) -> Option<&dyn ValueManager> {
        self.managers.get(index).map(AsRef::as_ref)
    }

    pub fn manager_by_name(&self, name: &str) -> Option<&dyn ValueManager> {
        self.index_of(name).and_then(|index| self.manager(index))
    }

    /// Shorthand registered under `name`, ignoring ASCII case.
    pub fn shorthand(&self, name: &str) -> Option<&dyn ShorthandManager> {
        self.shorthands
            .get(name)
            .or_else(|| self.shorthands.get(name.to_ascii_lowercase().as_str()))
            .map(AsRef::as_ref)
    }

    pub const fn font_size_index(&self) -> usize {
        self.font_size_index
    }

    pub const fn color_index(&self) -> usize {
        self.color_index
    }

    /// Longhand managers in index order.
    pub fn managers(&self) -> impl Iterator<Item = &dyn ValueManager> {
        self.managers.iter().map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::registry;

    #[test]
    fn every_property_has_one_index() {
        let table = registry();
        assert_eq!(table.index_of("font-size"), Some(table.font_size_index()));
        assert_eq!(table.index_of("COLOR"), Some(table.color_index()));
        for (index, manager) in table.managers().enumerate() {
            assert_eq!(table.index_of(manager.property_name()), Some(index));
        }
        assert!(table.index_of("margin").is_none());
        assert!(table.shorthand("Margin").is_some());
        assert!(table.shorthand("margin-top").is_none());
    }

    #[test]
    fn shorthands_expand_to_known_longhands() {
        let table = registry();
        for name in ["margin", "padding", "marker"] {
            let longhands = table.shorthand(name).map(|shorthand| shorthand.longhands());
            assert!(longhands.is_some_and(|names| {
                names.iter().all(|longhand| table.index_of(longhand).is_some())
            }));
        }
    }
}
