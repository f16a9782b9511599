//! Integration tests for the ssi CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command with config isolated to `root`
    fn ssi(root: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("ssi");
        cmd.current_dir(root)
            .env_remove("SSI_CONFIG")
            .arg("--no-local")
            .arg("--config")
            .arg(root.join("config.toml"));
        cmd
    }

    fn site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let html = tmp.path().join("html");
        fs::create_dir_all(html.join("partials")).unwrap();
        fs::create_dir_all(html.join("blog")).unwrap();
        fs::write(html.join("partials/nav.html"), "<nav>home</nav>").unwrap();
        fs::write(
            html.join("partials/header.html"),
            "<header><!--#include file=\"nav.html\" --></header>",
        )
        .unwrap();
        fs::write(
            html.join("index.html"),
            "<body><!--#include virtual=\"partials/header.html\" --></body>",
        )
        .unwrap();
        fs::write(
            html.join("blog/post.html"),
            "<article><!--#include file=\"../partials/nav.html\" --></article>",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("ssi")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("server-side includes"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("ssi")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ssi"));
    }

    #[test]
    fn config_show() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[resolver]"))
            .stdout(predicate::str::contains("[build]"));
    }

    #[test]
    fn config_path() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_writes_file() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["config", "init"])
            .assert()
            .success();

        let written = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
        assert!(written.contains("[cache]"));
    }

    #[test]
    fn local_config_overrides_global() {
        let tmp = site();
        fs::write(
            tmp.path().join("ssi.toml"),
            "[resolver]\nerror_message = \"<!-- missing -->\"\n",
        )
        .unwrap();
        fs::write(tmp.path().join("html/broken.html"), "a<!--#include file=\"nope.html\" -->b")
            .unwrap();

        let mut cmd = cargo_bin_cmd!("ssi");
        cmd.current_dir(tmp.path())
            .env_remove("SSI_CONFIG")
            .arg("--config")
            .arg(tmp.path().join("config.toml"))
            .args(["render", "html/broken.html"])
            .assert()
            .success()
            .stdout("a<!-- missing -->b");
    }

    #[test]
    fn build_writes_output() {
        let tmp = site();
        let root = tmp.path();

        ssi(root)
            .args(["build", "--format", "plain", "--base-dir"])
            .arg(root.join("html"))
            .arg("--dest")
            .arg(root.join("out"))
            .arg(root.join("html/index.html"))
            .arg(root.join("html/blog/post.html"))
            .assert()
            .success()
            .stdout(predicate::str::contains("index.html"));

        assert_eq!(
            fs::read_to_string(root.join("out/index.html")).unwrap(),
            "<body><header><nav>home</nav></header></body>"
        );
        assert_eq!(
            fs::read_to_string(root.join("out/blog/post.html")).unwrap(),
            "<article><nav>home</nav></article>"
        );
    }

    #[test]
    fn build_json_report() {
        let tmp = site();
        let root = tmp.path();

        ssi(root)
            .args(["build", "--format", "json", "--base-dir"])
            .arg(root.join("html"))
            .arg("--dest")
            .arg(root.join("out"))
            .arg(root.join("html/index.html"))
            .arg(root.join("html/missing.html"))
            .assert()
            .success()
            .stdout(predicate::str::contains("\"status\": \"written\""))
            .stdout(predicate::str::contains("\"status\": \"skipped\""));
    }

    #[test]
    fn build_without_sources_fails() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No source files given"));
    }

    #[test]
    fn build_persists_cache_records() {
        let tmp = site();
        let root = tmp.path();

        ssi(root)
            .args(["build", "--cache", "--format", "plain", "--base-dir"])
            .arg(root.join("html"))
            .arg("--dest")
            .arg(root.join("out"))
            .arg(root.join("html/index.html"))
            .assert()
            .success();

        ssi(root)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("header"));

        ssi(root)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success();

        ssi(root)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn render_file() {
        let tmp = site();
        let root = tmp.path();

        ssi(root)
            .args(["render", "--base-dir"])
            .arg(root.join("html"))
            .arg(root.join("html/index.html"))
            .assert()
            .success()
            .stdout("<body><header><nav>home</nav></header></body>");
    }

    #[test]
    fn render_stdin() {
        let tmp = site();
        let root = tmp.path();

        ssi(root)
            .args(["render", "-", "--base-dir"])
            .arg(root.join("html"))
            .write_stdin("x<!--#include virtual=\"partials/nav.html\" -->y")
            .assert()
            .success()
            .stdout("x<nav>home</nav>y");
    }

    #[test]
    fn render_cycle_substitutes_error_text() {
        let tmp = TempDir::new().unwrap();
        let html = tmp.path().join("html");
        fs::create_dir_all(&html).unwrap();
        fs::write(html.join("a.html"), "A<!--#include file=\"b.html\" -->").unwrap();
        fs::write(html.join("b.html"), "B<!--#include file=\"a.html\" -->").unwrap();

        ssi(tmp.path())
            .args(["render", "--base-dir"])
            .arg(&html)
            .arg(html.join("a.html"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "[There was an error processing this include]",
            ));
    }

    #[test]
    fn render_missing_file() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["render", "does-not-exist.html"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Source file not found"));
    }

    #[test]
    fn cache_path() {
        let tmp = TempDir::new().unwrap();
        ssi(tmp.path())
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(".ssiCache"));
    }
}
