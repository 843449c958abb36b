//! Built-in schema for the arcade game catalog database layout

use crate::column::{ColumnDescriptor, EnumMapping, FieldRef, ValueType};
use crate::error::Result;
use crate::join::JoinSpec;
use crate::schema::{Schema, SchemaDefinition};

pub const BASE_TABLE: &str = "Games";

fn driver_status() -> ValueType {
    ValueType::Enum {
        labels: EnumMapping::new([(0, "good"), (1, "imperfect"), (2, "preliminary")]),
    }
}

fn number(column: ColumnDescriptor) -> ColumnDescriptor {
    column.with_type(ValueType::Number)
}

/// Column set in display order
pub fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::virtual_column("details", "Details"),
        ColumnDescriptor::field("name", "Name", "Games", "name"),
        ColumnDescriptor::field("description", "Description", "Games", "description"),
        number(ColumnDescriptor::field("year", "Year", "Games", "year")),
        ColumnDescriptor::field("manufacturer", "Manufacturer", "Manufacturers", "name"),
        ColumnDescriptor::field("parent", "Parent", "Parents", "name"),
        ColumnDescriptor::field("clone_of", "Clone Of", "Games", "clone_of")
            .with_type(ValueType::GameId)
            .unsortable(),
        ColumnDescriptor::field("status", "Status", "Drivers", "status")
            .with_type(driver_status()),
        ColumnDescriptor::field("emulation", "Emulation", "Drivers", "emulation")
            .with_type(driver_status()),
        ColumnDescriptor::field("savestate", "Save State", "Drivers", "savestate").with_type(
            ValueType::Enum {
                labels: EnumMapping::new([(0, "unsupported"), (1, "supported")]),
            },
        ),
        ColumnDescriptor::field("category", "Category", "Categories", "name"),
        ColumnDescriptor::field("series", "Series", "Series", "name"),
        ColumnDescriptor::field("language", "Language", "Languages", "name"),
        number(ColumnDescriptor::field("players", "Players", "Inputs", "players")),
        number(ColumnDescriptor::field("buttons", "Buttons", "Inputs", "buttons")),
        ColumnDescriptor::field("control", "Control", "Controls", "type"),
        ColumnDescriptor::field("orientation", "Orientation", "Displays", "rotate").with_type(
            ValueType::Enum {
                labels: EnumMapping::new([
                    (0, "horizontal"),
                    (90, "vertical"),
                    (180, "horizontal (flipped)"),
                    (270, "vertical (flipped)"),
                ]),
            },
        ),
        number(ColumnDescriptor::field("refresh", "Refresh", "Displays", "refresh")),
    ]
}

/// Join catalog; link tables come before the tables they reach
pub fn joins() -> Vec<JoinSpec> {
    vec![
        JoinSpec::new(
            "Manufacturers",
            "LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id",
        ),
        JoinSpec::new(
            "Parents",
            "LEFT JOIN Games AS Parents ON Parents.id = Games.clone_of",
        )
        .alias_of("Games"),
        JoinSpec::new("Drivers", "LEFT JOIN Drivers ON Drivers.game_id = Games.id"),
        JoinSpec::new(
            "GameCategories",
            "LEFT JOIN GameCategories ON GameCategories.game_id = Games.id",
        ),
        JoinSpec::new(
            "Categories",
            "LEFT JOIN Categories ON Categories.id = GameCategories.category_id",
        )
        .depends_on("GameCategories"),
        JoinSpec::new(
            "GameSeries",
            "LEFT JOIN GameSeries ON GameSeries.game_id = Games.id",
        ),
        JoinSpec::new("Series", "LEFT JOIN Series ON Series.id = GameSeries.series_id")
            .depends_on("GameSeries"),
        JoinSpec::new(
            "GameLanguages",
            "LEFT JOIN GameLanguages ON GameLanguages.game_id = Games.id",
        ),
        JoinSpec::new(
            "Languages",
            "LEFT JOIN Languages ON Languages.id = GameLanguages.language_id",
        )
        .depends_on("GameLanguages"),
        JoinSpec::new("Inputs", "LEFT JOIN Inputs ON Inputs.game_id = Games.id"),
        JoinSpec::new("Controls", "LEFT JOIN Controls ON Controls.input_id = Inputs.id")
            .depends_on("Inputs"),
        JoinSpec::new("Displays", "LEFT JOIN Displays ON Displays.game_id = Games.id"),
    ]
}

pub fn definition() -> SchemaDefinition {
    SchemaDefinition {
        base_table: BASE_TABLE.to_string(),
        required_fields: vec![
            FieldRef::new(BASE_TABLE, "id"),
            FieldRef::new(BASE_TABLE, "screenshot"),
            FieldRef::new(BASE_TABLE, "romset"),
            FieldRef::new(BASE_TABLE, "system"),
        ],
        columns: columns(),
        joins: joins(),
    }
}

/// The built-in game catalog schema
pub fn schema() -> Result<Schema> {
    Schema::from_definition(definition())
}
