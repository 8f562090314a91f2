//! Tests for configuration loading from files

mod common;

use std::fs;

use common::{CORRIDOR, write_cartpole_fixture, write_maze_fixture};
use tabular_rl::{
    Error,
    app::{KeyValueConfig, RunConfig},
    environment::{EnvironmentConfig, EnvironmentKind},
    q_learning::AgentKind,
};
use tempfile::tempdir;

#[test]
fn test_maze_config_from_file() {
    let tmp = tempdir().unwrap();
    let path = write_maze_fixture(tmp.path(), "Sarsa", CORRIDOR, "");

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.agent, AgentKind::Sarsa);
    assert_eq!(config.environment.kind(), EnvironmentKind::Maze);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.training.max_episode, 200);
    assert_eq!(config.returns_path, tmp.path().join("returns.txt"));
    match &config.environment {
        EnvironmentConfig::Maze { grid, rewards } => {
            assert_eq!((grid.height(), grid.width()), (3, 5));
            assert_eq!(rewards.goal_reward, 10.0);
        }
        other => panic!("expected maze, got {other:?}"),
    }
}

#[test]
fn test_relative_maze_path_uses_config_directory() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("runs");
    fs::create_dir(&nested).unwrap();
    let path = write_maze_fixture(&nested, "Q-learning", CORRIDOR, "");

    // The maze sits next to the config, not in the working directory.
    assert!(RunConfig::from_file(&path).is_ok());
}

#[test]
fn test_cartpole_config_from_file() {
    let tmp = tempdir().unwrap();
    let path = write_cartpole_fixture(tmp.path(), "");

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.agent, AgentKind::Sarsa);
    match &config.environment {
        EnvironmentConfig::Cartpole(cartpole) => {
            assert_eq!(cartpole.bins.state_size().unwrap(), 6 * 8 * 4 * 4);
            assert_eq!(cartpole.physics.frames_per_second, 50.0);
        }
        other => panic!("expected cartpole, got {other:?}"),
    }
}

#[test]
fn test_missing_numeric_key_is_fatal() {
    let tmp = tempdir().unwrap();
    let path = write_maze_fixture(tmp.path(), "Sarsa", CORRIDOR, "");
    let text = fs::read_to_string(&path)
        .unwrap()
        .replace("AGENT_GAMMA=0.9\n", "");
    fs::write(&path, text).unwrap();

    let err = RunConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::MissingConfigKey { ref key } if key == "AGENT_GAMMA"));
}

#[test]
fn test_malformed_value_is_fatal() {
    let tmp = tempdir().unwrap();
    let path = write_maze_fixture(tmp.path(), "Sarsa", CORRIDOR, "RL_MAX_STEP=lots");

    let err = RunConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref key, .. } if key == "RL_MAX_STEP"));
}

#[test]
fn test_malformed_line_reports_line_number() {
    let err = KeyValueConfig::parse("AGENT_NAME=Sarsa\n# fine\nAGENT_ALPHA 0.5\n").unwrap_err();
    assert!(matches!(err, Error::ConfigSyntax { line_number: 3, .. }));
}

#[test]
fn test_unknown_names_are_rejected() {
    let tmp = tempdir().unwrap();
    let path = write_maze_fixture(tmp.path(), "Expected-SARSA", CORRIDOR, "");
    assert!(matches!(
        RunConfig::from_file(&path),
        Err(Error::ParseAgentKind { .. })
    ));

    let path = write_maze_fixture(tmp.path(), "Sarsa", CORRIDOR, "ENV_NAME=Pendulum");
    assert!(matches!(
        RunConfig::from_file(&path),
        Err(Error::ParseEnvironmentKind { .. })
    ));
}

#[test]
fn test_unwalled_maze_is_rejected() {
    let tmp = tempdir().unwrap();
    let path = write_maze_fixture(tmp.path(), "Sarsa", "#####\n#....\n#####\n", "");
    assert!(matches!(
        RunConfig::from_file(&path),
        Err(Error::InvalidMaze { .. })
    ));
}

#[test]
fn test_missing_config_file() {
    let tmp = tempdir().unwrap();
    assert!(matches!(
        RunConfig::from_file(tmp.path().join("absent.conf")),
        Err(Error::Io { .. })
    ));
}
