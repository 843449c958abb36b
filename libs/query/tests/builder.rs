//! SELECT generation against the built-in schema

use arcadex_query::{QueryBuilder, SortSpec};
use arcadex_schema::{builtin, Schema};

const REQUIRED: &str = "Games.id, Games.screenshot, Games.romset, Games.system";

fn schema() -> Schema {
    builtin::schema().unwrap()
}

#[test]
fn test_base_table_columns_need_no_joins() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name", "year"])
        .build();
    assert_eq!(
        query.sql,
        format!("SELECT {}, Games.name, Games.year FROM Games", REQUIRED)
    );
    assert_eq!(query.required, 4);
    assert_eq!(query.columns, vec!["name", "year"]);
    assert_eq!(query.value_index("year"), Some(5));
    assert_eq!(query.value_index("manufacturer"), None);
}

#[test]
fn test_joins_in_dependency_order() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["category", "manufacturer", "control", "players"])
        .build();
    assert_eq!(
        query.sql,
        format!(
            "SELECT {}, Categories.name, Manufacturers.name, Controls.type, Inputs.players \
             FROM Games \
             LEFT JOIN GameCategories ON GameCategories.game_id = Games.id \
             LEFT JOIN Categories ON Categories.id = GameCategories.category_id \
             LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id \
             LEFT JOIN Inputs ON Inputs.game_id = Games.id \
             LEFT JOIN Controls ON Controls.input_id = Inputs.id",
            REQUIRED
        )
    );
}

#[test]
fn test_each_join_emitted_once() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["players", "control", "buttons", "status", "emulation"])
        .with_sort(vec![SortSpec::ascending("players")])
        .with_where("Inputs.buttons > 1 AND Drivers.status = 0")
        .build();
    assert_eq!(query.sql.matches("LEFT JOIN Inputs ").count(), 1);
    assert_eq!(query.sql.matches("LEFT JOIN Drivers ").count(), 1);
    assert_eq!(query.sql.matches("LEFT JOIN Controls ").count(), 1);
    let inputs = query.sql.find("LEFT JOIN Inputs ").unwrap();
    let controls = query.sql.find("LEFT JOIN Controls ").unwrap();
    assert!(inputs < controls);
}

#[test]
fn test_only_referenced_tables_are_joined() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name", "manufacturer"])
        .build();
    assert!(query.sql.contains("LEFT JOIN Manufacturers"));
    assert!(!query.sql.contains("Drivers"));
    assert!(!query.sql.contains("Categories"));
}

#[test]
fn test_blank_where_is_omitted() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name"])
        .with_where("   ")
        .build();
    assert!(!query.sql.contains("WHERE"));
}

#[test]
fn test_where_joins_hidden_columns() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name"])
        .with_where("Categories.name = 'Maze'")
        .build();
    assert_eq!(
        query.sql,
        format!(
            "SELECT {}, Games.name FROM Games \
             LEFT JOIN GameCategories ON GameCategories.game_id = Games.id \
             LEFT JOIN Categories ON Categories.id = GameCategories.category_id \
             WHERE Categories.name = 'Maze'",
            REQUIRED
        )
    );
}

#[test]
fn test_unparsable_where_is_passed_through() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name"])
        .with_where("year IN (1980, 1981)")
        .build();
    assert_eq!(
        query.sql,
        format!(
            "SELECT {}, Games.name FROM Games WHERE year IN (1980, 1981)",
            REQUIRED
        )
    );
}

#[test]
fn test_order_by() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name"])
        .with_sort(vec![
            SortSpec::descending("year"),
            SortSpec::ascending("clone_of"),
            SortSpec::ascending("nosuchcolumn"),
            SortSpec::ascending("manufacturer"),
        ])
        .build();
    assert_eq!(
        query.sql,
        format!(
            "SELECT {}, Games.name FROM Games \
             LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id \
             ORDER BY Games.year DESC, Manufacturers.name ASC",
            REQUIRED
        )
    );
}

#[test]
fn test_ui_only_unknown_and_repeated_columns() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["details", "name", "nosuchcolumn", "name"])
        .build();
    assert_eq!(query.columns, vec!["name"]);
    assert_eq!(
        query.sql,
        format!("SELECT {}, Games.name FROM Games", REQUIRED)
    );
}

#[test]
fn test_regex_literal_sent_as_quoted_string() {
    let schema = schema();
    let query = QueryBuilder::new(&schema)
        .with_columns(["name"])
        .with_where("Games.name REGEXP /^pac/")
        .build();
    assert_eq!(
        query.sql,
        format!(
            "SELECT {}, Games.name FROM Games WHERE Games.name REGEXP '^pac'",
            REQUIRED
        )
    );
}

#[test]
fn test_join_found_when_table_case_differs() {
    let schema = Schema::from_json(
        r#"{
            "base_table": "Games",
            "required_fields": [{"table": "Games", "field": "id"}],
            "columns": [
                {"id": "manufacturer", "label": "Manufacturer",
                 "source": {"table": "manufacturers", "field": "name"}}
            ],
            "joins": [
                {"table": "Manufacturers",
                 "clause": "LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id"}
            ]
        }"#,
    )
    .unwrap();
    let query = QueryBuilder::new(&schema)
        .with_columns(["manufacturer"])
        .build();
    assert_eq!(
        query.sql,
        "SELECT Games.id, manufacturers.name FROM Games \
         LEFT JOIN Manufacturers ON Manufacturers.id = Games.manufacturer_id"
    );
}
