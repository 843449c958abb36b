#![allow(dead_code)]

use arcadex_query::SqliteExecutor;

/// Game catalog fixture. The Series and Languages tables (and their link
/// tables) are missing on purpose, like in a partially imported catalog.
pub const CATALOG: &str = r#"
CREATE TABLE Games (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    year INTEGER,
    manufacturer_id INTEGER,
    clone_of INTEGER,
    screenshot TEXT,
    romset TEXT,
    system TEXT
);
CREATE TABLE Manufacturers (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE Drivers (game_id INTEGER, status INTEGER, emulation INTEGER, savestate INTEGER);
CREATE TABLE GameCategories (game_id INTEGER, category_id INTEGER);
CREATE TABLE Categories (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE Inputs (id INTEGER PRIMARY KEY, game_id INTEGER, players INTEGER, buttons INTEGER);
CREATE TABLE Controls (input_id INTEGER, type TEXT);
CREATE TABLE Displays (game_id INTEGER, rotate INTEGER, refresh REAL);

INSERT INTO Manufacturers VALUES (1, 'Namco'), (2, 'Midway'), (3, 'Taito');
INSERT INTO Categories VALUES (1, 'Maze'), (2, 'Breakout'), (3, 'Shooter');

INSERT INTO Games VALUES
    (1, 'pacman', 'Pac-Man', 1980, 1, NULL, 'pacman.png', 'pacman', 'arcade'),
    (2, 'mspacman', 'Ms. Pac-Man', 1981, 2, NULL, 'mspacman.png', 'mspacman', 'arcade'),
    (3, 'puckman', 'Puck Man', 1980, 1, 1, 'puckman.png', 'puckman', 'arcade'),
    (4, 'arkanoid', 'Arkanoid', 1986, 3, NULL, 'arkanoid.png', 'arkanoid', 'arcade'),
    (5, 'galaga', 'Galaga', 1981, 1, NULL, 'galaga.png', 'galaga', 'arcade');

INSERT INTO GameCategories VALUES (1, 1), (2, 1), (3, 1), (4, 2), (5, 3);
INSERT INTO Drivers VALUES
    (1, 0, 0, 1), (2, 0, 0, 1), (3, 0, 0, 0), (4, 1, 1, 0), (5, 0, 0, 1);
INSERT INTO Inputs VALUES (1, 1, 2, 0), (2, 2, 2, 0), (3, 3, 2, 0), (4, 4, 2, 1), (5, 5, 2, 1);
INSERT INTO Controls VALUES
    (1, 'joy4way'), (2, 'joy4way'), (3, 'joy4way'), (4, 'dial'), (5, 'joy2way');
INSERT INTO Displays VALUES
    (1, 90, 60.61), (2, 90, 60.61), (3, 90, 60.61), (4, 270, 59.18), (5, 90, 60.61);
"#;

pub fn catalog_db() -> SqliteExecutor {
    let db = SqliteExecutor::open_in_memory().unwrap();
    db.execute_batch(CATALOG).unwrap();
    db
}
