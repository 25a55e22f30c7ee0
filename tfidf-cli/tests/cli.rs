//! CLI integration tests for the tfidf binary
//!
//! These tests check exit codes and the key parts of each command's output.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use std::path::Path;

/// Corpus directory with three small stories
fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("dragons.txt")
        .write_str("The dragon guarded the castle. The dragon slept on gold.")
        .unwrap();
    dir.child("knights.txt")
        .write_str("A knight rode to the castle to fight the dragon.")
        .unwrap();
    dir.child("cooking.txt")
        .write_str("Slow cooking makes the stew rich. Stew needs time.")
        .unwrap();
    dir
}

/// A tfidf command with HOME isolated and no inherited index path
fn tfidf(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tfidf").unwrap();
    cmd.env("HOME", home).env_remove("TFIDF_INDEX_PATH");
    cmd
}

/// Index `corpus` into `index` with the given index type
fn build(home: &Path, corpus: &Path, index: &Path, index_type: &str) {
    tfidf(home)
        .args(["--index-type", index_type, "--index-path"])
        .arg(index)
        .arg("index")
        .arg(corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 3 documents"))
        .stdout(predicate::str::contains("Size on disk: "));
}

mod index {
    use super::*;

    #[test]
    fn writes_json_index() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.child("index.json");

        build(out.path(), corpus.path(), index.path(), "json");

        index.assert(predicate::path::exists());
        index.assert(predicate::str::contains("\"dragon\""));
        index.assert(predicate::str::contains("\"metadata\""));
    }

    #[test]
    fn writes_database_index() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.child("index.sqlite");

        build(out.path(), corpus.path(), index.path(), "db");

        index.assert(predicate::path::exists());
    }

    #[test]
    fn respects_limit() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .arg("--index-path")
            .arg(out.path().join("index.json"))
            .args(["index", "--limit", "2"])
            .arg(corpus.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 2 documents"));
    }

    #[test]
    fn zero_limit_indexes_everything() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .arg("--index-path")
            .arg(out.path().join("index.json"))
            .args(["index", "--limit", "0"])
            .arg(corpus.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 3 documents"));
    }

    #[test]
    fn fails_for_missing_directory() {
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .arg("--index-path")
            .arg(out.path().join("index.json"))
            .arg("index")
            .arg(out.path().join("missing"))
            .assert()
            .failure();
    }

    #[test]
    fn rejects_unknown_index_type() {
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .args(["--index-type", "csv", "status"])
            .assert()
            .failure();
    }
}

mod search {
    use super::*;

    #[test]
    fn finds_matching_documents() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .args(["search", "stew"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cooking.txt"))
            .stdout(predicate::str::contains("dragons.txt").not());
    }

    #[test]
    fn reports_unknown_words() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .args(["search", "spaceship"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Words not in index: spaceship"))
            .stdout(predicate::str::contains("No results"));
    }

    #[test]
    fn json_output() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        let output = tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .args(["search", "dragon castle", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["total"], 2);
        let results = value["results"].as_array().unwrap();
        assert!(results[0]["id"].as_str().unwrap().ends_with("knights.txt"));
        assert_eq!(results[0]["rank"], 1);
        assert_eq!(results[0]["diff"], 1.0);
    }

    #[test]
    fn searches_database_index() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.sqlite");
        build(out.path(), corpus.path(), &index, "db");

        tfidf(out.path())
            .args(["--index-type", "db", "--index-path"])
            .arg(&index)
            .args(["search", "knight"])
            .assert()
            .success()
            .stdout(predicate::str::contains("knights.txt"));
    }

    #[test]
    fn fails_without_index() {
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .arg("--index-path")
            .arg(out.path().join("nope.json"))
            .args(["search", "dragon"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No index found"));
    }
}

mod keywords {
    use super::*;

    #[test]
    fn unknown_words_rank_first() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        let output = tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .args(["keywords", "stew spaceship", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let keywords = value.as_array().unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0]["word"], "spaceship");
        assert_eq!(keywords[0]["score"], 0.0);
        assert_eq!(keywords[1]["word"], "stew");
    }
}

mod status {
    use super::*;

    #[test]
    fn shows_statistics() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Documents: 3"))
            .stdout(predicate::str::contains("Smoothing: off"))
            .stdout(predicate::str::is_match(r"Size on disk: \d+\.\d{2} MB").unwrap());
    }

    #[test]
    fn shows_database_size() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.sqlite");
        build(out.path(), corpus.path(), &index, "db");

        tfidf(out.path())
            .args(["--index-type", "db", "--index-path"])
            .arg(&index)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Size on disk: "));
    }

    #[test]
    fn reports_missing_index() {
        let out = TempDir::new().unwrap();

        tfidf(out.path())
            .arg("--index-path")
            .arg(out.path().join("nope.json"))
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("No index found"));
    }
}

mod interactive {
    use super::*;

    #[test]
    fn answers_queries_until_empty_line() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .arg("interactive")
            .write_stdin("knight\n:k stew spaceship\n\nstew\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Q? "))
            .stdout(predicate::str::contains("knights.txt"))
            .stdout(predicate::str::contains(" * spaceship"))
            .stdout(predicate::str::contains("cooking.txt").not());
    }

    #[test]
    fn stops_at_end_of_input() {
        let corpus = corpus();
        let out = TempDir::new().unwrap();
        let index = out.path().join("index.json");
        build(out.path(), corpus.path(), &index, "json");

        tfidf(out.path())
            .arg("--index-path")
            .arg(&index)
            .arg("interactive")
            .write_stdin("stew\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("cooking.txt"));
    }
}
