//! Common test utilities and helpers
//!
//! Builds a throwaway SQLite copy of the research schema, seeded with a few
//! extremophiles and projects, and exposes every catalog view on it.

#![allow(dead_code)]

use biodash_core::ConnectionParameters;
use biodash_store::{SqliteStore, Store};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::sync::Arc;
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE Ecosystem (
    EcosystemID INTEGER PRIMARY KEY,
    EcosystemName TEXT NOT NULL,
    Type TEXT NOT NULL
);

CREATE TABLE Organism (
    OrganismID INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    Domain TEXT NOT NULL,
    Phylum TEXT,
    Genus TEXT,
    Species TEXT,
    EcosystemID INTEGER REFERENCES Ecosystem (EcosystemID),
    OptimalTemp REAL
);

CREATE TABLE EnvironmentalCondition (
    ConditionID INTEGER PRIMARY KEY,
    OrganismID INTEGER NOT NULL REFERENCES Organism (OrganismID),
    MinTemp REAL,
    MaxTemp REAL,
    pH REAL,
    Salinity REAL
);

CREATE TABLE ProjectInfo (
    ProjectID INTEGER PRIMARY KEY,
    Title TEXT NOT NULL,
    Description TEXT,
    StartDate TEXT,
    EndDate TEXT,
    Funding REAL
);

CREATE TABLE ProjectStatus (
    ProjectID INTEGER PRIMARY KEY REFERENCES ProjectInfo (ProjectID),
    Status TEXT NOT NULL
);

CREATE TABLE Organism_ResearchProject (
    OrganismID INTEGER NOT NULL REFERENCES Organism (OrganismID),
    ProjectID INTEGER NOT NULL REFERENCES ProjectInfo (ProjectID)
);

INSERT INTO Ecosystem VALUES
    (1, 'Hot spring', 'Aquatic'),
    (2, 'Deep-sea vent', 'Aquatic'),
    (3, 'Salt flat', 'Terrestrial'),
    (4, 'Glacier', 'Terrestrial');

INSERT INTO Organism VALUES
    (1, 'Thermus aquaticus', 'Bacteria', 'Deinococcota', 'Thermus', 'aquaticus', 1, 70.0),
    (2, 'Pyrococcus furiosus', 'Archaea', 'Euryarchaeota', 'Pyrococcus', 'furiosus', 2, 100.0),
    (3, 'Halobacterium salinarum', 'Archaea', 'Euryarchaeota', 'Halobacterium', 'salinarum', 3, 42.0),
    (4, 'Chlamydomonas nivalis', 'Eukarya', 'Chlorophyta', 'Chlamydomonas', 'nivalis', 4, 4.0),
    (5, 'Bacillus infernus', 'Bacteria', 'Bacillota', 'Bacillus', 'infernus', 2, 61.0);

INSERT INTO EnvironmentalCondition VALUES
    (1, 1, 50.0, 80.0, 7.5, 0.1),
    (2, 2, 70.0, 103.0, 7.0, 3.5),
    (3, 3, 20.0, 55.0, 7.2, 25.0),
    (4, 4, -2.0, 10.0, 6.0, 0.0);

INSERT INTO ProjectInfo VALUES
    (1, 'Hydrothermal Vent Metagenomics', 'Sequencing vent communities', '2021-01-01', '2024-06-30', 3.0),
    (2, 'Thermophilic Bacteria Enzymes', 'Heat-stable polymerases', '2019-03-01', '2022-03-01', 5.0),
    (3, 'Salt Flat Survey', 'Halophile sampling', '2024-01-01', '2025-12-31', 1.2);

INSERT INTO ProjectStatus VALUES
    (1, 'Active'),
    (2, 'Completed'),
    (3, 'Planned');

INSERT INTO Organism_ResearchProject VALUES
    (2, 1),
    (5, 1),
    (1, 2),
    (3, 3);

CREATE VIEW Organism_Profile AS
SELECT o.OrganismID, o.Name, o.Domain, o.Genus, o.Species, e.EcosystemName, o.OptimalTemp
FROM Organism o
LEFT JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID;

CREATE VIEW Student_Organism_Taxonomy_Ecosystem AS
SELECT o.Name, o.Domain, o.Phylum, o.Genus, o.Species, e.EcosystemName
FROM Organism o
LEFT JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
ORDER BY o.OrganismID;

CREATE VIEW Student_Avg_Optimum_Temp_By_Ecosystem AS
SELECT e.EcosystemName, AVG(o.OptimalTemp) AS AverageOptimalTemp
FROM Organism o
JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
GROUP BY e.EcosystemName
ORDER BY e.EcosystemName;

CREATE VIEW Researcher_Extreme_Temperature_Organisms AS
SELECT o.Name, o.OptimalTemp
FROM Organism o
WHERE o.OptimalTemp >= 80 OR o.OptimalTemp <= 10;

CREATE VIEW Researcher_Funding_Aquatic_Projects AS
SELECT DISTINCT p.Title AS ProjectTitle, p.Funding AS TotalFunding, e.EcosystemName
FROM ProjectInfo p
JOIN Organism_ResearchProject orp ON p.ProjectID = orp.ProjectID
JOIN Organism o ON orp.OrganismID = o.OrganismID
JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
WHERE e.Type = 'Aquatic';

CREATE VIEW Researcher_Organisms_Projects_Domain_Ecosystem AS
SELECT o.Domain, e.EcosystemName,
       COUNT(DISTINCT o.OrganismID) AS OrganismCount,
       COUNT(DISTINCT orp.ProjectID) AS ProjectCount
FROM Organism o
LEFT JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
LEFT JOIN Organism_ResearchProject orp ON o.OrganismID = orp.OrganismID
GROUP BY o.Domain, e.EcosystemName;

CREATE VIEW Researcher_Organism_Temperature_Project AS
SELECT o.Name AS OrganismName, o.OptimalTemp AS AverageOptimumTemp, p.Title AS ProjectTitle
FROM Organism o
JOIN Organism_ResearchProject orp ON o.OrganismID = orp.OrganismID
JOIN ProjectInfo p ON orp.ProjectID = p.ProjectID;

CREATE VIEW Admin_Projects_Status_OrganismCount AS
SELECT p.Title AS ProjectTitle, ps.Status AS ProjectStatus, COUNT(orp.OrganismID) AS OrganismCount
FROM ProjectInfo p
JOIN ProjectStatus ps ON p.ProjectID = ps.ProjectID
LEFT JOIN Organism_ResearchProject orp ON p.ProjectID = orp.ProjectID
GROUP BY p.ProjectID, p.Title, ps.Status;

CREATE VIEW Admin_Organisms_Without_Projects AS
SELECT o.Name, o.Domain
FROM Organism o
WHERE o.OrganismID NOT IN (SELECT OrganismID FROM Organism_ResearchProject);

CREATE VIEW Admin_Project_Duration_Organisms AS
SELECT p.Title AS ProjectTitle,
       CAST(julianday(p.EndDate) - julianday(p.StartDate) AS INTEGER) AS DurationDays,
       o.Name AS OrganismName
FROM ProjectInfo p
JOIN Organism_ResearchProject orp ON p.ProjectID = orp.ProjectID
JOIN Organism o ON orp.OrganismID = o.OrganismID;

CREATE VIEW Admin_Temperature_Stats_By_Ecosystem AS
SELECT e.EcosystemName,
       MIN(o.OptimalTemp) AS MinTemp,
       MAX(o.OptimalTemp) AS MaxTemp,
       AVG(o.OptimalTemp) AS AvgTemp
FROM Organism o
JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
GROUP BY e.EcosystemName;

CREATE VIEW Admin_High_Funded_Projects AS
SELECT p.Title AS ProjectTitle, p.Funding AS TotalFunding, ps.Status AS ProjectStatus,
       o.Name AS OrganismName, o.Domain, e.EcosystemName
FROM ProjectInfo p
JOIN ProjectStatus ps ON p.ProjectID = ps.ProjectID
JOIN Organism_ResearchProject orp ON p.ProjectID = orp.ProjectID
JOIN Organism o ON orp.OrganismID = o.OrganismID
LEFT JOIN Ecosystem e ON o.EcosystemID = e.EcosystemID
WHERE p.Funding > 2;
"#;

/// Create the seeded database in a temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the database is used.
pub async fn research_db() -> (TempDir, ConnectionParameters) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ProjectDB.sqlite");

    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .expect("Failed to create fixture database");
    sqlx::raw_sql(SCHEMA)
        .execute(&mut conn)
        .await
        .expect("Failed to seed fixture database");
    conn.close().await.expect("Failed to close fixture database");

    let params = ConnectionParameters::new("localhost", "root", "password", path.to_string_lossy());
    (dir, params)
}

pub fn sqlite_store() -> Arc<dyn Store> {
    Arc::new(SqliteStore::new())
}

/// Parameters pointing at a database file that does not exist
pub fn missing_db(dir: &TempDir) -> ConnectionParameters {
    ConnectionParameters::new(
        "localhost",
        "root",
        "password",
        dir.path().join("absent.sqlite").to_string_lossy(),
    )
}
