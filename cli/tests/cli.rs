//! Tests of the oxel binary.
#![expect(clippy::unwrap_used)]

use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

const ONTOLOGY: &str = r"
@prefix : <http://example.com/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:r a owl:ObjectProperty .
:A rdfs:subClassOf :B , [ a owl:Restriction ; owl:onProperty :r ; owl:someValuesFrom :C ] .
:B rdfs:subClassOf :D .
:E owl:equivalentClass [ a owl:Restriction ; owl:onProperty :r ; owl:someValuesFrom :C ] .
:F rdfs:subClassOf :A , :G .
:G owl:disjointWith :B .
:a a :A .
";

fn oxel() -> Command {
    Command::cargo_bin("oxel").unwrap()
}

fn ontology_file() -> NamedTempFile {
    let file = NamedTempFile::new("ontology.ttl").unwrap();
    file.write_str(ONTOLOGY).unwrap();
    file
}

#[test]
fn cli_help() {
    oxel()
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn cli_classify() {
    let file = ontology_file();
    oxel()
        .arg("classify")
        .arg("--file")
        .arg(file.path())
        .arg("--workers")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SubClassOf(<http://example.com/A> <http://example.com/B>)",
        ))
        .stdout(predicate::str::contains(
            "SubClassOf(<http://example.com/A> <http://example.com/E>)",
        ))
        .stdout(predicate::str::contains(
            "SubClassOf(<http://example.com/B> <http://example.com/D>)",
        ))
        .stdout(predicate::str::contains("<http://example.com/F>").and(
            predicate::str::contains("EquivalentClasses(<http://example.com/F>"),
        ));
}

#[test]
fn cli_classify_to_file() {
    let file = ontology_file();
    let output = NamedTempFile::new("taxonomy.ofn").unwrap();
    oxel()
        .arg("classify")
        .arg("-f")
        .arg(file.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout("");
    output.assert(predicate::str::contains(
        "SubClassOf(<http://example.com/A> <http://example.com/B>)",
    ));
}

#[test]
fn cli_classify_from_stdin() {
    oxel()
        .arg("classify")
        .arg("--format")
        .arg("ttl")
        .write_stdin(ONTOLOGY)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SubClassOf(<http://example.com/B> <http://example.com/D>)",
        ));
}

#[test]
fn cli_stdin_requires_format() {
    oxel()
        .arg("classify")
        .write_stdin(ONTOLOGY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--format"));
}

#[test]
fn cli_consistency() {
    let file = ontology_file();
    oxel()
        .arg("consistency")
        .arg("--file")
        .arg(file.path())
        .assert()
        .success()
        .stdout("consistent\n");

    let inconsistent = NamedTempFile::new("inconsistent.ttl").unwrap();
    inconsistent
        .write_str(&format!("{ONTOLOGY}\n:b a :F ."))
        .unwrap();
    oxel()
        .arg("consistency")
        .arg("--file")
        .arg(inconsistent.path())
        .assert()
        .success()
        .stdout("inconsistent\n");
    oxel()
        .arg("realize")
        .arg("--file")
        .arg(inconsistent.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("inconsistent"));
}

#[test]
fn cli_satisfiable() {
    let file = ontology_file();
    oxel()
        .arg("satisfiable")
        .arg("--file")
        .arg(file.path())
        .arg("--class")
        .arg("http://example.com/A")
        .assert()
        .success()
        .stdout("satisfiable\n");
    oxel()
        .arg("satisfiable")
        .arg("--file")
        .arg(file.path())
        .arg("--class")
        .arg("http://example.com/F")
        .assert()
        .success()
        .stdout("unsatisfiable\n");
    oxel()
        .arg("satisfiable")
        .arg("--file")
        .arg(file.path())
        .arg("--class")
        .arg("http://example.com/Unknown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not occur"));
}

#[test]
fn cli_realize() {
    let file = ontology_file();
    oxel()
        .arg("realize")
        .arg("--file")
        .arg(file.path())
        .arg("--stats")
        .assert()
        .success()
        .stdout("ClassAssertion(<http://example.com/A> <http://example.com/a>)\n")
        .stderr(predicate::str::contains("contexts created"));
}

#[test]
fn cli_timeout() {
    let file = ontology_file();
    oxel()
        .arg("classify")
        .arg("--file")
        .arg(file.path())
        .arg("--timeout")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not finish"));
}

#[test]
fn cli_unreadable_input() {
    oxel()
        .arg("classify")
        .arg("--file")
        .arg("/nonexistent/ontology.ttl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));

    let broken = NamedTempFile::new("broken.ttl").unwrap();
    broken.write_str("<http://example.com/A> <").unwrap();
    oxel()
        .arg("classify")
        .arg("--file")
        .arg(broken.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn cli_json_logs() {
    let file = ontology_file();
    oxel()
        .arg("consistency")
        .arg("--file")
        .arg(file.path())
        .arg("--log-format")
        .arg("json")
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("\"saturation finished\""));
}
