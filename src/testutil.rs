use crate::ddl::DdlCatalog;

/// A small schema with a generated column, a composite primary key,
/// storing and unique indexes, and a single-table view.
pub const MUSIC_DDL: &str = r#"
CREATE TABLE Singers (
    SingerId BIGINT NOT NULL,
    FirstName VARCHAR(1024),
    LastName VARCHAR(1024),
    FullName VARCHAR(2048) GENERATED ALWAYS AS (FirstName) STORED,
    PRIMARY KEY (SingerId)
);

CREATE TABLE Albums (
    SingerId BIGINT NOT NULL,
    AlbumId BIGINT NOT NULL,
    AlbumTitle VARCHAR(1024),
    ReleaseYear BIGINT,
    PRIMARY KEY (SingerId, AlbumId)
);

CREATE INDEX AlbumsByTitle ON Albums (AlbumTitle) INCLUDE (ReleaseYear);
CREATE UNIQUE INDEX AlbumsBySingerTitle ON Albums (SingerId, AlbumTitle);

CREATE VIEW SingerNames AS SELECT SingerId, FirstName, LastName FROM Singers;
"#;

/// Build a catalog with the generic dialect, panicking on any error.
pub fn ddl_catalog(sql: &str) -> DdlCatalog {
    DdlCatalog::from_sql(sql, "generic").unwrap()
}
