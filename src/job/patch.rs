//! Wholesale config updates.
//!
//! Wizard steps never mutate the shared [`MigrationConfig`] in place: each
//! edit is described as a [`ConfigPatch`] and applied through the pure
//! [`apply`] function, which returns a new document. Step views always
//! render from a single consistent value, and an edit history is just a
//! list of patches that can be replayed in tests.

use tracing::warn;

use super::{
    ConnectionPair, DataSource, MapStep, MigrateItem, MigrationConfig, MigrationSettings,
};
use crate::expr::Expression;
use crate::load::LoadStep;

/// One wizard edit.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigPatch {
    /// Rename the job / change its description.
    JobDetails { name: String, description: String },
    /// Select the source/destination connection pair.
    Connections(ConnectionPair),
    /// Replace the migration-wide settings.
    GlobalSettings(MigrationSettings),
    /// Append a migrate item.
    AddItem(MigrateItem),
    /// Remove the migrate item at `index`.
    RemoveItem { index: usize },
    /// Replace the source selection of the item at `index`.
    ItemSource { index: usize, source: DataSource },
    /// Replace the destination selection of the item at `index`.
    ItemDestination { index: usize, destination: DataSource },
    /// Replace the join chain of the item at `index`.
    ItemLoad { index: usize, load: LoadStep },
    /// Replace the column mappings of the item at `index`.
    ItemMap { index: usize, map: MapStep },
    /// Replace the filter expression of the item at `index`.
    ItemFilter {
        index: usize,
        expression: Option<Expression>,
    },
    /// Replace the per-item settings of the item at `index`.
    ItemSettings {
        index: usize,
        settings: MigrationSettings,
    },
}

/// Apply a patch, producing the next config version.
///
/// Never mutates `config`. An out-of-range item index returns the config
/// unchanged with a warning - the stale index means the view that issued
/// the patch was already behind, and dropping the edit is the consistent
/// outcome.
pub fn apply(config: &MigrationConfig, patch: ConfigPatch) -> MigrationConfig {
    let mut next = config.clone();

    match patch {
        ConfigPatch::JobDetails { name, description } => {
            next.name = name;
            next.description = description;
        }
        ConfigPatch::Connections(connections) => next.connections = connections,
        ConfigPatch::GlobalSettings(settings) => next.migration.settings = settings,
        ConfigPatch::AddItem(item) => next.migration.migrate_items.push(item),
        ConfigPatch::RemoveItem { index } => {
            if index < next.migration.migrate_items.len() {
                next.migration.migrate_items.remove(index);
            } else {
                warn!(index, "remove_item index out of range");
            }
        }
        ConfigPatch::ItemSource { index, source } => {
            with_item(&mut next, index, |item| item.source = source);
        }
        ConfigPatch::ItemDestination { index, destination } => {
            with_item(&mut next, index, |item| item.destination = destination);
        }
        ConfigPatch::ItemLoad { index, load } => {
            with_item(&mut next, index, |item| item.load = load);
        }
        ConfigPatch::ItemMap { index, map } => {
            with_item(&mut next, index, |item| item.map = map);
        }
        ConfigPatch::ItemFilter { index, expression } => {
            with_item(&mut next, index, |item| item.filter.expression = expression);
        }
        ConfigPatch::ItemSettings { index, settings } => {
            with_item(&mut next, index, |item| item.settings = settings);
        }
    }

    next
}

fn with_item<F: FnOnce(&mut MigrateItem)>(config: &mut MigrationConfig, index: usize, edit: F) {
    match config.migration.migrate_items.get_mut(index) {
        Some(item) => edit(item),
        None => warn!(index, "item patch index out of range"),
    }
}
