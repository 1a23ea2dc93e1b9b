//! Integration tests for the `wdash` binary.
//!
//! Every test runs the real binary against its own temporary config and data
//! directories, so saved dashboards never leak between tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WDASH_BIN: &str = env!("CARGO_BIN_EXE_wdash");

/// Isolated XDG home for one test.
struct Home {
    dir: TempDir,
}

impl Home {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn config_file(&self) -> PathBuf {
        self.config_home().join("widget-dashboard/config.toml")
    }

    /// Writes `content` as the config file.
    fn write_config(&self, content: &str) {
        let path = self.config_file();
        fs::create_dir_all(path.parent().expect("config file has a parent"))
            .expect("create config dir");
        fs::write(path, content).expect("write config");
    }

    fn wdash(&self) -> Command {
        let mut cmd = Command::new(WDASH_BIN);
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env_remove("WDASH_LOG");
        cmd
    }
}

#[test]
fn widgets_list_shows_the_default_dashboard() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widget1"))
        .stdout(predicate::str::contains("Recent Customers"))
        .stdout(predicate::str::contains("Key Metrics"));
}

#[test]
fn added_widget_is_saved_below_the_others() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "add", "stats", "Quota"])
        .assert()
        .success()
        .stdout("widget6\n");

    home.wdash()
        .args(["layout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 columns, 6 widgets"))
        .stdout(predicate::str::contains("widget6    x=0  y=4  w=6  h=2"));

    assert!(home.data_home().join("widget-dashboard").is_dir());
}

#[test]
fn add_rejects_a_blank_title() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "add", "table", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title must not be blank"));
}

#[test]
fn expand_then_restore_round_trips_the_size() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "expand", "widget3"])
        .assert()
        .success()
        .stdout("widget3 is now 12x2\n");

    home.wdash()
        .args(["layout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widget3    x=0  y=2  w=12 h=2"));

    home.wdash()
        .args(["widgets", "restore", "widget3"])
        .assert()
        .success()
        .stdout("widget3 is now 4x2\n");
}

#[test]
fn toggle_and_remove_report_unknown_ids() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "toggle", "widget2"])
        .assert()
        .success()
        .stdout("widget2 hidden\n");

    home.wdash()
        .args(["widgets", "remove", "widget99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no widget widget99"));
}

#[test]
fn reset_brings_back_the_default_widgets() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "remove", "widget1"])
        .assert()
        .success();
    home.wdash()
        .args(["widgets", "reset"])
        .assert()
        .success()
        .stdout("Reset dashboard of user1\n");
    home.wdash()
        .args(["widgets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recent Customers"));
}

#[test]
fn hidden_widgets_cannot_be_expanded() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "toggle", "widget3"])
        .assert()
        .success();
    home.wdash()
        .args(["widgets", "expand", "widget3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no visible widget widget3"));
}

#[test]
fn hidden_widgets_leave_the_layout() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "toggle", "widget5"])
        .assert()
        .success();
    home.wdash()
        .args(["layout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 widgets"))
        .stdout(predicate::str::contains("widget5").not());
}

#[test]
fn layout_at_narrow_column_counts_fits_every_widget() {
    let home = Home::new();
    home.wdash()
        .args(["layout", "--cols", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 columns, 5 widgets"))
        .stdout(predicate::str::contains("w=6").not());
}

#[test]
fn dashboards_are_kept_per_user() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "remove", "widget1", "--user", "user2"])
        .assert()
        .success();

    home.wdash()
        .args(["widgets", "list", "--user", "user2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recent Customers").not());

    home.wdash()
        .args(["widgets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recent Customers"));
}

#[test]
fn unknown_user_is_an_error() {
    let home = Home::new();
    home.wdash()
        .args(["widgets", "list", "--user", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown user: nobody"));
}

#[test]
fn users_switch_changes_the_current_user() {
    let home = Home::new();
    home.wdash()
        .args(["users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* user1"));

    home.wdash()
        .args(["users", "switch", "user2"])
        .assert()
        .success()
        .stdout("Switched to Jane Smith (user2)\n");

    home.wdash()
        .args(["users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* user2"))
        .stdout(predicate::str::contains("  user1"));

    home.wdash()
        .args(["users", "switch", "user9"])
        .assert()
        .failure();
}

#[test]
fn data_prints_one_line_per_record() {
    let home = Home::new();
    home.write_config("[data]\nlatency = \"0ms\"\n");
    home.wdash()
        .args(["data", "customers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@example.com"));
}

#[test]
fn config_path_follows_xdg_config_home() {
    let home = Home::new();
    home.wdash()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widget-dashboard/config.toml"))
        .stdout(predicate::str::contains(
            home.config_home().to_string_lossy().to_string(),
        ));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let home = Home::new();
    home.wdash()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));
    assert!(home.config_file().exists());

    home.wdash()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    home.wdash().args(["config", "init", "--force"]).assert().success();
    assert!(home.config_file().with_extension("toml.backup").exists());
}

#[test]
fn generated_config_validates() {
    let home = Home::new();
    home.wdash().args(["config", "init"]).assert().success();
    home.wdash()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_show_prints_effective_values() {
    let home = Home::new();
    home.write_config("[notifications]\nduration = \"2s\"\n");
    home.wdash()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duration = \"2s\""))
        .stdout(predicate::str::contains("tick_rate = \"250ms\""));
}

#[test]
fn invalid_config_stops_every_command() {
    let home = Home::new();
    home.write_config("[grid]\nlg = 50\n");
    home.wdash()
        .args(["widgets", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
    home.wdash()
        .args(["config", "validate"])
        .assert()
        .failure();
}

#[test]
fn explicit_config_file_must_exist() {
    let home = Home::new();
    let missing = home.dir.path().join("missing.toml");
    home.wdash()
        .args(["layout", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
